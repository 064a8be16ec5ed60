#![cfg(feature = "cli")]

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "mwt1cli-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn mwt1(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mwt1"))
        .args(["--log-level", "error"])
        .args(args)
        .env_remove("MWT1_SAMPLES_PER_SYMBOL")
        .env_remove("MWT1_BITS_PER_SYMBOL")
        .env_remove("MWT1_LOG")
        .output()
        .expect("mwt1 should run")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

#[test]
fn encode_hex_matches_reference_frame() {
    let output = mwt1(&["--format", "hex", "encode", "--data", "hi"]);
    assert!(output.status.success());

    let expected = format!(
        "{}{}{}{}",
        "aa".repeat(16),
        "ff00ff00",
        "99a999c995",
        "00".repeat(15)
    );
    assert_eq!(stdout(&output), expected);
}

#[test]
fn encode_json_reports_sizes() {
    let output = mwt1(&[
        "--format",
        "json",
        "encode",
        "--data",
        "hello",
        "--samples-per-symbol",
        "3",
    ]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("mwt1/cli/v1/frame-encoded"));
    assert!(text.contains("\"payload_size\":5"));
    assert!(text.contains("\"frame_size\":48"));
    assert!(text.contains("\"checksum\":\"0xcd\""));
}

#[test]
fn modulation_can_come_from_environment() {
    let output = Command::new(env!("CARGO_BIN_EXE_mwt1"))
        .args(["--log-level", "error", "--format", "json", "encode", "--data", "hello"])
        .env("MWT1_SAMPLES_PER_SYMBOL", "3")
        .env_remove("MWT1_BITS_PER_SYMBOL")
        .env_remove("MWT1_LOG")
        .output()
        .expect("mwt1 should run");
    assert!(output.status.success());
    assert!(stdout(&output).contains("\"frame_size\":48"));
}

#[test]
fn raw_encode_writes_frame_bytes() {
    let output = mwt1(&["--format", "raw", "encode", "--data", "hi", "--no-pad"]);
    assert!(output.status.success());
    assert_eq!(output.stdout.len(), 35);
    assert_eq!(&output.stdout[16..20], &[0xff, 0x00, 0xff, 0x00]);
}

#[test]
fn decode_recovers_encoded_payload() {
    let encoded = mwt1(&["--format", "hex", "encode", "--data", "hello"]);
    let frame = stdout(&encoded);

    let output = mwt1(&["--format", "json", "decode", "--hex", &frame]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("\"payload\":\"hello\""));
    assert!(text.contains("\"checksum\":\"0xcd\""));
}

#[test]
fn corrupted_frame_exits_data_invalid() {
    let encoded = mwt1(&["--format", "hex", "encode", "--data", "hello"]);
    let mut frame = stdout(&encoded);
    // First body byte sits at hex offset 40; swap it for another valid
    // codeword pair so only the checksum can catch it.
    frame.replace_range(40..42, "9a");

    let output = mwt1(&["decode", "--hex", &frame]);
    assert_eq!(output.status.code(), Some(60));
    assert!(String::from_utf8_lossy(&output.stderr).contains("decode failed"));
}

#[test]
fn frame_without_sync_exits_data_invalid() {
    let output = mwt1(&["decode", "--hex", "00112233"]);
    assert_eq!(output.status.code(), Some(60));
}

#[test]
fn oversized_payload_exits_data_invalid() {
    let dir = unique_temp_dir("oversized");
    let path = dir.join("payload.bin");
    std::fs::write(&path, vec![0x42u8; 4097]).unwrap();

    let output = mwt1(&["encode", "--file", path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(60));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn zero_samples_per_symbol_is_usage_error() {
    let output = mwt1(&["encode", "--data", "hi", "--samples-per-symbol", "0"]);
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn huge_modulation_values_are_usage_errors() {
    let max = usize::MAX.to_string();

    let output = mwt1(&["encode", "--data", "hi", "--bits-per-symbol", &max]);
    assert_eq!(output.status.code(), Some(64));
    assert!(String::from_utf8_lossy(&output.stderr).contains("alignment block too large"));

    let output = mwt1(&["--format", "hex", "encode", "--data", "hi", "--samples-per-symbol", &max]);
    assert!(output.status.success());
}

#[test]
fn inspect_lists_sections() {
    let output = mwt1(&["--format", "json", "inspect", "--data", "hi"]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("mwt1/cli/v1/frame-layout"));
    assert!(text.contains("\"name\":\"body\""));
    assert!(text.contains("\"hex\":\"99a999c995\""));
    assert!(text.contains("\"frame_size\":40"));
}

#[test]
fn transmit_file_to_file() {
    let dir = unique_temp_dir("transmit");
    let input = dir.join("payloads.txt");
    let frames = dir.join("frames.bin");
    std::fs::write(&input, "hi\nhello\n").unwrap();

    let output = mwt1(&[
        "--format",
        "json",
        "transmit",
        "--input",
        input.to_str().unwrap(),
        "--output",
        frames.to_str().unwrap(),
    ]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("\"frames_written\":2"));

    // "hi" pads to 40 bytes and "hello" to 40 at the default modulation.
    let wire = std::fs::read(&frames).unwrap();
    assert_eq!(wire.len(), 80);

    let first = mwt1(&[
        "--format",
        "raw",
        "decode",
        "--file",
        frames.to_str().unwrap(),
    ]);
    assert!(first.status.success());
    assert_eq!(first.stdout, b"hi");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn transmit_stdin_hex_to_stdout() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_mwt1"))
        .args(["--log-level", "error", "--format", "json", "transmit", "--hex", "--no-pad"])
        .env_remove("MWT1_SAMPLES_PER_SYMBOL")
        .env_remove("MWT1_BITS_PER_SYMBOL")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("transmit should start");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"6869\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    assert_eq!(output.stdout.len(), 35);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("\"frames_written\":1"));
}

#[test]
fn transmit_rejects_bad_hex_line() {
    let dir = unique_temp_dir("badhex");
    let input = dir.join("payloads.txt");
    std::fs::write(&input, "6869\nnot hex\n").unwrap();

    let output = mwt1(&[
        "transmit",
        "--hex",
        "--input",
        input.to_str().unwrap(),
        "--output",
        dir.join("frames.bin").to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(64));
    assert!(String::from_utf8_lossy(&output.stderr).contains("line 2"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn transmit_rejects_zero_write_timeout() {
    let dir = unique_temp_dir("zerotimeout");
    let output = mwt1(&[
        "transmit",
        "--socket",
        dir.join("mod.sock").to_str().unwrap(),
        "--write-timeout",
        "0s",
    ]);
    assert_eq!(output.status.code(), Some(64));
    assert!(String::from_utf8_lossy(&output.stderr).contains("greater than zero"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[cfg(unix)]
#[test]
fn stalled_modulator_times_out() {
    let dir = unique_temp_dir("stall");
    let sock_path = dir.join("mod.sock");
    let input = dir.join("payloads.txt");
    // Never accepted or read, so the socket buffer fills up.
    let _listener = std::os::unix::net::UnixListener::bind(&sock_path).unwrap();
    let line = "x".repeat(200);
    let payloads: String = (0..5000).map(|_| format!("{line}\n")).collect();
    std::fs::write(&input, payloads).unwrap();

    let output = mwt1(&[
        "transmit",
        "--input",
        input.to_str().unwrap(),
        "--socket",
        sock_path.to_str().unwrap(),
        "--write-timeout",
        "200ms",
    ]);
    assert_eq!(output.status.code(), Some(124));
    assert!(String::from_utf8_lossy(&output.stderr).contains("timed out"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn version_prints_package_version() {
    let output = mwt1(&["version"]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        format!("mwt1 {}", env!("CARGO_PKG_VERSION"))
    );
}
