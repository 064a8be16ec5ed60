use clap::{Args, Subcommand};
use std::fs;
use std::path::PathBuf;

use mwt1_codec::PacketConfig;

use crate::exit::{io_error, CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod inspect;
pub mod transmit;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode one payload into a frame.
    Encode(EncodeArgs),
    /// Decode one frame and verify its checksum.
    Decode(DecodeArgs),
    /// Show the section layout of a payload's frame.
    Inspect(InspectArgs),
    /// Stream payloads through the transmit queue into a sink.
    Transmit(TransmitArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Inspect(args) => inspect::run(args, format),
        Command::Transmit(args) => transmit::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug, Clone, Copy)]
pub struct ModulationArgs {
    /// Samples the modulator emits per symbol.
    #[arg(
        long,
        env = "MWT1_SAMPLES_PER_SYMBOL",
        default_value_t = 2,
        value_name = "N"
    )]
    pub samples_per_symbol: usize,
    /// Bits carried per modulated symbol.
    #[arg(long, env = "MWT1_BITS_PER_SYMBOL", default_value_t = 1, value_name = "N")]
    pub bits_per_symbol: usize,
    /// Skip transport alignment padding.
    #[arg(long)]
    pub no_pad: bool,
}

impl ModulationArgs {
    pub fn packet_config(&self) -> PacketConfig {
        let config = PacketConfig::new(self.samples_per_symbol, self.bits_per_symbol);
        if self.no_pad {
            config.without_padding()
        } else {
            config
        }
    }
}

#[derive(Args, Debug)]
pub struct PayloadArgs {
    /// Payload as a UTF-8 string.
    #[arg(long, conflicts_with_all = ["hex", "file"])]
    pub data: Option<String>,
    /// Payload as hex digits.
    #[arg(long, conflicts_with_all = ["data", "file"])]
    pub hex: Option<String>,
    /// Read payload from file.
    #[arg(long, conflicts_with_all = ["data", "hex"])]
    pub file: Option<PathBuf>,
}

impl PayloadArgs {
    /// Payload bytes; empty when no source is given.
    pub fn resolve(&self) -> CliResult<Vec<u8>> {
        if let Some(data) = &self.data {
            return Ok(data.as_bytes().to_vec());
        }
        if let Some(hex) = &self.hex {
            return parse_hex(hex).map_err(|err| CliError::new(USAGE, format!("--hex: {err}")));
        }
        if let Some(path) = &self.file {
            return fs::read(path)
                .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
        }
        Ok(Vec::new())
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    #[command(flatten)]
    pub payload: PayloadArgs,
    #[command(flatten)]
    pub modulation: ModulationArgs,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Frame as hex digits.
    #[arg(long, conflicts_with = "file", required_unless_present = "file")]
    pub hex: Option<String>,
    /// Read the frame from file.
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    #[command(flatten)]
    pub payload: PayloadArgs,
    #[command(flatten)]
    pub modulation: ModulationArgs,
}

#[derive(Args, Debug)]
pub struct TransmitArgs {
    /// Read payloads from file, one per line. Default: stdin.
    #[arg(long, short = 'i')]
    pub input: Option<PathBuf>,
    /// Write frames to file.
    #[arg(long, short = 'o', conflicts_with = "socket")]
    pub output: Option<PathBuf>,
    /// Write frames to a modulator listening on a Unix socket.
    #[arg(long, conflicts_with = "output")]
    pub socket: Option<PathBuf>,
    /// Input lines are hex encoded.
    #[arg(long)]
    pub hex: bool,
    /// Frames that may wait before input reading blocks.
    #[arg(long, default_value_t = mwt1_tx::DEFAULT_QUEUE_LIMIT, value_name = "N")]
    pub queue_limit: usize,
    /// Discard queued frames on Ctrl-C instead of draining them.
    #[arg(long)]
    pub abort_on_interrupt: bool,
    /// Give up when the modulator stops reading for this long (e.g. 5s, 500ms).
    #[arg(long, requires = "socket", value_name = "DURATION")]
    pub write_timeout: Option<String>,
    #[command(flatten)]
    pub modulation: ModulationArgs,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Decode hex digits; ASCII whitespace and a leading `0x` are ignored.
pub fn parse_hex(input: &str) -> Result<Vec<u8>, hex::FromHexError> {
    let input = input.trim();
    let input = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input);
    let digits: String = input.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    hex::decode(digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hex_accepts_prefix_and_spaces() {
        assert_eq!(parse_hex("0x68 69").unwrap(), b"hi");
        assert_eq!(parse_hex("DEADbeef").unwrap(), [0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(parse_hex("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn parse_hex_rejects_malformed_input() {
        assert_eq!(parse_hex("abc"), Err(hex::FromHexError::OddLength));
        assert!(matches!(
            parse_hex("zz"),
            Err(hex::FromHexError::InvalidHexCharacter { c: 'z', .. })
        ));
    }

    #[test]
    fn no_pad_disables_alignment() {
        let args = ModulationArgs {
            samples_per_symbol: 8,
            bits_per_symbol: 1,
            no_pad: true,
        };
        let config = args.packet_config();
        assert!(!config.pad_for_transport);
        assert_eq!(config.samples_per_symbol, 8);
    }
}
