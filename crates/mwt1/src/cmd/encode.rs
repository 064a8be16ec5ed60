use mwt1_codec::{crc8, encode};
use tracing::debug;

use crate::cmd::EncodeArgs;
use crate::exit::{codec_error, CliResult, SUCCESS};
use crate::output::{print_encoded, EncodedFrame, OutputFormat};

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let payload = args.payload.resolve()?;
    let config = args.modulation.packet_config();

    let frame = encode(&payload, &config).map_err(|err| codec_error("encode failed", err))?;
    debug!(
        payload_len = payload.len(),
        frame_len = frame.len(),
        "payload encoded"
    );

    print_encoded(
        &EncodedFrame {
            frame: &frame,
            payload_size: payload.len(),
            checksum: crc8(&payload),
            samples_per_symbol: config.samples_per_symbol,
            bits_per_symbol: config.bits_per_symbol,
            padded: config.pad_for_transport,
        },
        format,
    );

    Ok(SUCCESS)
}
