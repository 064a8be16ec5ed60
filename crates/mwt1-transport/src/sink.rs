use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::error::Result;

/// A byte sink a modulator reads frames from.
///
/// Frames are written whole; the sink never sees a partial frame unless the
/// underlying write fails.
pub struct SinkStream {
    inner: SinkStreamInner,
}

enum SinkStreamInner {
    File(std::fs::File),
    Stdout(std::io::Stdout),
    #[cfg(unix)]
    Unix(std::os::unix::net::UnixStream),
}

impl Write for SinkStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &mut self.inner {
            SinkStreamInner::File(file) => file.write(buf),
            SinkStreamInner::Stdout(out) => out.write(buf),
            #[cfg(unix)]
            SinkStreamInner::Unix(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &mut self.inner {
            SinkStreamInner::File(file) => file.flush(),
            SinkStreamInner::Stdout(out) => out.flush(),
            #[cfg(unix)]
            SinkStreamInner::Unix(stream) => stream.flush(),
        }
    }
}

impl SinkStream {
    /// Create (or truncate) a file sink, e.g. a FIFO a flowgraph reads from.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::create(path)?;
        debug!(?path, "opened file sink");
        Ok(Self {
            inner: SinkStreamInner::File(file),
        })
    }

    /// Sink writing to this process's stdout.
    pub fn stdout() -> Self {
        Self {
            inner: SinkStreamInner::Stdout(std::io::stdout()),
        }
    }

    #[cfg(unix)]
    pub(crate) fn from_unix(stream: std::os::unix::net::UnixStream) -> Self {
        Self {
            inner: SinkStreamInner::Unix(stream),
        }
    }

    /// Set a write timeout where the sink supports one (sockets only).
    pub fn set_write_timeout(&self, timeout: Option<std::time::Duration>) -> Result<()> {
        match &self.inner {
            #[cfg(unix)]
            SinkStreamInner::Unix(stream) => stream.set_write_timeout(timeout).map_err(Into::into),
            _ => Ok(()),
        }
    }

    /// Sink kind for diagnostics.
    pub fn kind(&self) -> &'static str {
        match &self.inner {
            SinkStreamInner::File(_) => "file",
            SinkStreamInner::Stdout(_) => "stdout",
            #[cfg(unix)]
            SinkStreamInner::Unix(_) => "unix",
        }
    }
}

impl std::fmt::Debug for SinkStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SinkStream")
            .field("kind", &self.kind())
            .finish()
    }
}
