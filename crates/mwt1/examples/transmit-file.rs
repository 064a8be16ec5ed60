//! Push a few payloads through the transmit queue into a file, then decode
//! the file back.
//!
//! Run with:
//!   cargo run --example transmit-file
//!
//! The file is what a file-source block in a modulator flowgraph would read.

use std::fs;

use mwt1::codec::{decode_frame, frame_layout};
use mwt1::transport::SinkStream;
use mwt1::tx::{spawn, TxConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::temp_dir().join(format!("mwt1-frames-{}.bin", std::process::id()));
    let config = TxConfig::default();
    let packet = config.packet;

    let (encoder, worker) = spawn(SinkStream::create(&path)?, config)?;
    let payloads = ["hello", "world", "mwt1 over the air"];
    for payload in payloads {
        encoder.send_pkt(payload.as_bytes())?;
    }
    let stats = worker.shutdown()?;
    eprintln!(
        "Wrote {} frames ({} bytes) to {}",
        stats.frames_written,
        stats.bytes_written,
        path.display()
    );

    let wire = fs::read(&path)?;
    let mut offset = 0;
    for payload in payloads {
        let len = frame_layout(payload.len(), &packet)?.total();
        let decoded = decode_frame(&wire[offset..offset + len])?;
        eprintln!(
            "frame @{offset}: {len} bytes, crc=0x{:02x}, payload={:?}",
            decoded.checksum,
            String::from_utf8_lossy(&decoded.payload)
        );
        offset += len;
    }

    let _ = fs::remove_file(&path);
    Ok(())
}
