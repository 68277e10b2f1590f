//! Line readers for child process output.
//!
//! yt-dlp and ffmpeg can emit non-UTF8 bytes (titles, locale-dependent
//! messages). `BufReader::lines()` would stop on the first invalid byte, so
//! lines are read as bytes and decoded lossily.

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

/// Which pipe a line came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

impl StreamKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        }
    }
}

/// One decoded line of child output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputLine {
    pub kind: StreamKind,
    pub text: String,
}

/// Forward every line of `stream` to `tx` until EOF or the receiver goes away.
///
/// Carriage returns also split lines, so in-place progress bars arrive as
/// separate updates.
pub fn spawn_line_reader(
    stream: impl AsyncRead + Unpin + Send + 'static,
    kind: StreamKind,
    tx: mpsc::Sender<OutputLine>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut reader = BufReader::new(stream);
        let mut buf: Vec<u8> = Vec::with_capacity(1024);

        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    let decoded = String::from_utf8_lossy(&buf);
                    for segment in decoded.split(['\n', '\r']) {
                        if segment.trim().is_empty() {
                            continue;
                        }
                        let line = OutputLine {
                            kind,
                            text: segment.to_string(),
                        };
                        if tx.send(line).await.is_err() {
                            debug!(stream = kind.as_str(), "line receiver dropped");
                            return;
                        }
                    }
                }
                Err(e) => {
                    debug!(stream = kind.as_str(), error = %e, "line reader exiting due to read error");
                    break;
                }
            }
        }

        debug!(stream = kind.as_str(), "line reader task exiting");
    })
}
