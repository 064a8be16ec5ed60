use mwt1_codec::{crc8, encode, frame_layout};

use crate::cmd::InspectArgs;
use crate::exit::{codec_error, CliResult, SUCCESS};
use crate::output::{print_layout, sections, OutputFormat};

pub fn run(args: InspectArgs, format: OutputFormat) -> CliResult<i32> {
    let payload = args.payload.resolve()?;
    let config = args.modulation.packet_config();

    let layout =
        frame_layout(payload.len(), &config).map_err(|err| codec_error("inspect failed", err))?;
    let frame = encode(&payload, &config).map_err(|err| codec_error("inspect failed", err))?;

    let sections = sections(&frame, &layout);
    print_layout(payload.len(), crc8(&payload), &frame, &sections, format);
    Ok(SUCCESS)
}
