use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use mwt1_transport::SinkStream;
use mwt1_tx::{spawn, PacketEncoder, ShutdownPolicy, TxConfig};
use tracing::{debug, info};

use crate::cmd::{parse_hex, TransmitArgs};
use crate::exit::{
    io_error, transport_error, tx_error, CliError, CliResult, INTERNAL, SUCCESS, USAGE,
};
use crate::output::{print_stats, OutputFormat};

pub fn run(args: TransmitArgs, format: OutputFormat) -> CliResult<i32> {
    let policy = if args.abort_on_interrupt {
        ShutdownPolicy::Abort
    } else {
        ShutdownPolicy::Drain
    };
    let config = TxConfig {
        queue_limit: args.queue_limit,
        packet: args.modulation.packet_config(),
        shutdown: ShutdownPolicy::Drain,
    };

    let input = open_input(args.input.as_deref())?;
    let (sink, sink_name) = open_sink(&args)?;
    let sink_is_stdout = args.output.is_none() && args.socket.is_none();

    info!(sink = %sink_name, kind = sink.kind(), "transmitting");
    let (encoder, worker) = spawn(sink, config).map_err(|err| tx_error("transmit failed", err))?;

    let interrupted = Arc::new(AtomicBool::new(false));
    install_ctrlc_handler(encoder.clone(), policy, interrupted.clone())?;

    let hex = args.hex;
    let reader = thread::Builder::new()
        .name("mwt1-input".to_string())
        .spawn(move || {
            let result = feed(input, hex, &encoder);
            encoder.close();
            result
        })
        .map_err(|err| io_error("failed to start input reader", err))?;

    // Returns once the queue closes: end of input, bad input, or Ctrl-C.
    let stats = worker
        .join()
        .map_err(|err| tx_error("transmit failed", err))?;

    if !interrupted.load(Ordering::SeqCst) {
        let submitted = reader
            .join()
            .map_err(|_| CliError::new(INTERNAL, "input reader panicked"))??;
        debug!(submitted, "input exhausted");
    }

    print_stats(&stats, &sink_name, format, sink_is_stdout);
    Ok(SUCCESS)
}

fn open_input(path: Option<&Path>) -> CliResult<Box<dyn BufRead + Send>> {
    match path {
        Some(path) => {
            let file = File::open(path)
                .map_err(|err| io_error(&format!("failed opening {}", path.display()), err))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(BufReader::new(io::stdin()))),
    }
}

fn open_sink(args: &TransmitArgs) -> CliResult<(SinkStream, String)> {
    if let Some(path) = &args.output {
        let sink = SinkStream::create(path)
            .map_err(|err| transport_error(&format!("failed opening {}", path.display()), err))?;
        return Ok((sink, path.display().to_string()));
    }
    if let Some(path) = &args.socket {
        let timeout = args
            .write_timeout
            .as_deref()
            .map(parse_duration)
            .transpose()?;
        return connect_socket(path, timeout);
    }
    Ok((SinkStream::stdout(), "stdout".to_string()))
}

#[cfg(unix)]
fn connect_socket(path: &Path, timeout: Option<Duration>) -> CliResult<(SinkStream, String)> {
    let sink = mwt1_transport::UnixDomainSocket::connect(path)
        .map_err(|err| transport_error("connect failed", err))?;
    sink.set_write_timeout(timeout)
        .map_err(|err| transport_error("failed setting write timeout", err))?;
    Ok((sink, format!("unix:{}", path.display())))
}

#[cfg(not(unix))]
fn connect_socket(
    _path: &Path,
    _timeout: Option<Duration>,
) -> CliResult<(SinkStream, String)> {
    Err(CliError::new(
        USAGE,
        "--socket requires Unix domain socket support",
    ))
}

fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, millis) = if let Some(num) = input.strip_suffix("ms") {
        (num, true)
    } else if let Some(num) = input.strip_suffix('s') {
        (num, false)
    } else {
        (input, false)
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;
    if value == 0 {
        // A zero socket timeout is rejected by the OS.
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    Ok(if millis {
        Duration::from_millis(value)
    } else {
        Duration::from_secs(value)
    })
}

/// Submit one payload per input line. Blank lines are skipped. Returns the
/// number of payloads submitted.
fn feed<R: BufRead>(mut input: R, hex: bool, encoder: &PacketEncoder) -> CliResult<u64> {
    let mut line = Vec::new();
    let mut line_no = 0u64;
    let mut submitted = 0u64;

    loop {
        line.clear();
        let read = input
            .read_until(b'\n', &mut line)
            .map_err(|err| io_error("failed reading input", err))?;
        if read == 0 {
            return Ok(submitted);
        }
        line_no += 1;

        let payload = trim_line_ending(&line);
        if payload.is_empty() {
            continue;
        }

        let payload = if hex {
            let text = String::from_utf8_lossy(payload);
            parse_hex(&text)
                .map_err(|err| CliError::new(USAGE, format!("line {line_no}: {err}")))?
        } else {
            payload.to_vec()
        };

        encoder
            .send_pkt(&payload)
            .map_err(|err| tx_error(&format!("line {line_no}"), err))?;
        submitted += 1;
    }
}

fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

fn install_ctrlc_handler(
    encoder: PacketEncoder,
    policy: ShutdownPolicy,
    interrupted: Arc<AtomicBool>,
) -> CliResult<()> {
    ctrlc::set_handler(move || {
        interrupted.store(true, Ordering::SeqCst);
        encoder.close_with(policy);
        let _ = writeln!(io::stderr(), "interrupted; closing transmit queue");
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}
