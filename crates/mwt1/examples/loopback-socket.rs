//! Stand in for a modulator on a Unix socket and feed it frames.
//!
//! Run with:
//!   cargo run --example loopback-socket
//!
//! The same socket can be fed from the CLI:
//!   cargo run --features cli -- transmit --socket /tmp/mwt1.sock

#[cfg(unix)]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::fs;
    use std::io::Read;
    use std::thread;

    use mwt1::codec::{decode_frame, frame_layout, PacketConfig};
    use mwt1::transport::UnixDomainSocket;
    use mwt1::tx::{spawn, TxConfig};

    let sock_dir = std::env::temp_dir().join(format!("mwt1-loopback-{}", std::process::id()));
    fs::create_dir_all(&sock_dir)?;
    let sock_path = sock_dir.join("modulator.sock");

    let listener = UnixDomainSocket::bind(&sock_path)?;
    eprintln!("Modulator listening on {}", sock_path.display());

    let receiver = thread::spawn(move || -> std::io::Result<Vec<u8>> {
        let mut stream = listener.accept().map_err(std::io::Error::other)?;
        let mut wire = Vec::new();
        stream.read_to_end(&mut wire)?;
        Ok(wire)
    });

    let packet = PacketConfig::new(8, 1);
    let (encoder, worker) = spawn(UnixDomainSocket::connect(&sock_path)?, TxConfig::new(packet))?;
    encoder.send_pkt(b"ping")?;
    encoder.send_pkt(b"pong")?;
    let stats = worker.shutdown()?;
    eprintln!("Sent {} frames", stats.frames_written);

    let wire = receiver.join().map_err(|_| "receiver panicked")??;
    let first = frame_layout(4, &packet)?.total();
    for frame in [&wire[..first], &wire[first..]] {
        let decoded = decode_frame(frame)?;
        eprintln!("Modulator got {:?}", String::from_utf8_lossy(&decoded.payload));
    }

    let _ = fs::remove_dir_all(&sock_dir);
    Ok(())
}

#[cfg(not(unix))]
fn main() {
    eprintln!("loopback-socket requires Unix domain sockets");
}
