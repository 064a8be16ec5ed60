use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use mwt1_codec::{DecodedFrame, FrameLayout};
use mwt1_tx::TxStats;
use serde::Serialize;

#[derive(Clone, Debug, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
    Hex,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct EncodedOutput<'a> {
    schema_id: &'a str,
    payload_size: usize,
    frame_size: usize,
    checksum: String,
    samples_per_symbol: usize,
    bits_per_symbol: usize,
    padded: bool,
    frame: String,
}

/// Frame produced by `encode`, with the parameters that shaped it.
pub struct EncodedFrame<'a> {
    pub frame: &'a [u8],
    pub payload_size: usize,
    pub checksum: u8,
    pub samples_per_symbol: usize,
    pub bits_per_symbol: usize,
    pub padded: bool,
}

pub fn print_encoded(encoded: &EncodedFrame<'_>, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = EncodedOutput {
                schema_id: "mwt1/cli/v1/frame-encoded",
                payload_size: encoded.payload_size,
                frame_size: encoded.frame.len(),
                checksum: format!("0x{:02x}", encoded.checksum),
                samples_per_symbol: encoded.samples_per_symbol,
                bits_per_symbol: encoded.bits_per_symbol,
                padded: encoded.padded,
                frame: to_hex(encoded.frame),
            };
            print_json(&out);
        }
        OutputFormat::Table => {
            let mut table = new_table(vec!["PAYLOAD", "FRAME", "CRC", "SPS", "BPS", "PADDED"]);
            table.add_row(vec![
                encoded.payload_size.to_string(),
                encoded.frame.len().to_string(),
                format!("0x{:02x}", encoded.checksum),
                encoded.samples_per_symbol.to_string(),
                encoded.bits_per_symbol.to_string(),
                encoded.padded.to_string(),
            ]);
            println!("{table}");
            println!("{}", to_hex(encoded.frame));
        }
        OutputFormat::Pretty => {
            println!(
                "payload={} frame={} crc=0x{:02x} sps={} bps={} padded={}",
                encoded.payload_size,
                encoded.frame.len(),
                encoded.checksum,
                encoded.samples_per_symbol,
                encoded.bits_per_symbol,
                encoded.padded
            );
            println!("{}", to_hex(encoded.frame));
        }
        OutputFormat::Raw => print_raw(encoded.frame),
        OutputFormat::Hex => println!("{}", to_hex(encoded.frame)),
    }
}

#[derive(Serialize)]
struct DecodedOutput<'a> {
    schema_id: &'a str,
    frame_size: usize,
    payload_size: usize,
    checksum: String,
    payload: String,
    payload_hex: String,
}

pub fn print_decoded(decoded: &DecodedFrame, frame_size: usize, format: OutputFormat) {
    let payload = decoded.payload.as_ref();
    match format {
        OutputFormat::Json => {
            let out = DecodedOutput {
                schema_id: "mwt1/cli/v1/frame-decoded",
                frame_size,
                payload_size: payload.len(),
                checksum: format!("0x{:02x}", decoded.checksum),
                payload: payload_preview(payload),
                payload_hex: to_hex(payload),
            };
            print_json(&out);
        }
        OutputFormat::Table => {
            let mut table = new_table(vec!["FRAME", "PAYLOAD", "CRC", "DATA"]);
            table.add_row(vec![
                frame_size.to_string(),
                payload.len().to_string(),
                format!("0x{:02x}", decoded.checksum),
                payload_preview(payload),
            ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "frame={} payload={} crc=0x{:02x} data={}",
                frame_size,
                payload.len(),
                decoded.checksum,
                payload_preview(payload)
            );
        }
        OutputFormat::Raw => print_raw(payload),
        OutputFormat::Hex => println!("{}", to_hex(payload)),
    }
}

/// One contiguous section of a frame.
#[derive(Serialize)]
pub struct Section {
    pub name: &'static str,
    pub offset: usize,
    pub len: usize,
    pub hex: String,
}

/// Sections of a frame in wire order. Empty sections are skipped.
pub fn sections(frame: &[u8], layout: &FrameLayout) -> Vec<Section> {
    let spans = [
        ("preamble", layout.preamble),
        ("access_code", layout.access_code),
        ("body", layout.body),
        ("trailer", layout.trailer),
        ("alignment", layout.alignment),
    ];
    let mut offset = 0;
    let mut out = Vec::with_capacity(spans.len());
    for (name, len) in spans {
        if len == 0 {
            continue;
        }
        let end = (offset + len).min(frame.len());
        out.push(Section {
            name,
            offset,
            len,
            hex: to_hex(&frame[offset.min(end)..end]),
        });
        offset += len;
    }
    out
}

#[derive(Serialize)]
struct LayoutOutput<'a> {
    schema_id: &'a str,
    payload_size: usize,
    checksum: String,
    frame_size: usize,
    sections: &'a [Section],
}

pub fn print_layout(
    payload_size: usize,
    checksum: u8,
    frame: &[u8],
    sections: &[Section],
    format: OutputFormat,
) {
    match format {
        OutputFormat::Json => {
            let out = LayoutOutput {
                schema_id: "mwt1/cli/v1/frame-layout",
                payload_size,
                checksum: format!("0x{checksum:02x}"),
                frame_size: frame.len(),
                sections,
            };
            print_json(&out);
        }
        OutputFormat::Table => {
            let mut table = new_table(vec!["SECTION", "OFFSET", "LEN", "BYTES"]);
            for section in sections {
                table.add_row(vec![
                    section.name.to_string(),
                    section.offset.to_string(),
                    section.len.to_string(),
                    section.hex.clone(),
                ]);
            }
            println!("{table}");
            println!(
                "payload={payload_size} crc=0x{checksum:02x} total={}",
                frame.len()
            );
        }
        OutputFormat::Pretty => {
            for section in sections {
                println!(
                    "{:<12} @{:<5} len={:<5} {}",
                    section.name, section.offset, section.len, section.hex
                );
            }
            println!(
                "payload={payload_size} crc=0x{checksum:02x} total={}",
                frame.len()
            );
        }
        OutputFormat::Raw => print_raw(frame),
        OutputFormat::Hex => println!("{}", to_hex(frame)),
    }
}

#[derive(Serialize)]
struct StatsOutput<'a> {
    schema_id: &'a str,
    sink: &'a str,
    frames_written: u64,
    bytes_written: u64,
    frames_dropped: u64,
}

/// Transmit reports go to stderr when stdout is the sink.
pub fn print_stats(stats: &TxStats, sink: &str, format: OutputFormat, to_stderr: bool) {
    let text = match format {
        OutputFormat::Json | OutputFormat::Raw | OutputFormat::Hex => {
            let out = StatsOutput {
                schema_id: "mwt1/cli/v1/transmit-stats",
                sink,
                frames_written: stats.frames_written,
                bytes_written: stats.bytes_written,
                frames_dropped: stats.frames_dropped,
            };
            serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
        }
        OutputFormat::Table => {
            let mut table = new_table(vec!["SINK", "FRAMES", "BYTES", "DROPPED"]);
            table.add_row(vec![
                sink.to_string(),
                stats.frames_written.to_string(),
                stats.bytes_written.to_string(),
                stats.frames_dropped.to_string(),
            ]);
            table.to_string()
        }
        OutputFormat::Pretty => format!(
            "sink={sink} frames={} bytes={} dropped={}",
            stats.frames_written, stats.bytes_written, stats.frames_dropped
        ),
    };
    if to_stderr {
        eprintln!("{text}");
    } else {
        println!("{text}");
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

pub fn to_hex(data: &[u8]) -> String {
    hex::encode(data)
}

fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn payload_preview(payload: &[u8]) -> String {
    match std::str::from_utf8(payload) {
        Ok(text) => text.to_string(),
        Err(_) => format!("<binary {} bytes>", payload.len()),
    }
}
