//! Raw-mode terminal plumbing for the binary.
//!
//! The engine itself never touches the terminal: it reads a stream of
//! [`InputEvent`]s and writes frames to an [`Output`](crate::Output). This
//! module supplies both ends for a real TTY.

use super::decoder::decode;
use crate::app::InputEvent;
use futures::channel::mpsc::{self, UnboundedReceiver};
use std::io::{self, Read, Write};
use std::thread;

const CTRL_C: u8 = 0x03;
const CTRL_D: u8 = 0x04;
const READ_BUFFER_SIZE: usize = 1024;

/// Keeps the terminal in raw mode while alive.
#[derive(Debug)]
pub struct Terminal {
    active: bool,
}

impl Terminal {
    /// Switches the terminal to raw mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal attributes cannot be changed, e.g.
    /// when stdin is not a TTY.
    pub fn enter_raw_mode() -> io::Result<Self> {
        crossterm::terminal::enable_raw_mode()?;
        tracing::debug!("terminal switched to raw mode");
        Ok(Self { active: true })
    }

    /// Restores the terminal early. Dropping the guard does the same.
    pub fn restore(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        if let Err(e) = crossterm::terminal::disable_raw_mode() {
            tracing::debug!(error = %e, "failed to leave raw mode");
        }
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        self.restore();
    }
}

/// Spawns a thread that reads stdin and forwards decoded events.
///
/// The stream ends on EOF, on a read error, when a chunk contains Ctrl+C or
/// Ctrl+D, or when the receiver is dropped.
#[must_use]
pub fn spawn_input_reader() -> UnboundedReceiver<InputEvent> {
    let (tx, rx) = mpsc::unbounded();

    thread::spawn(move || {
        let stdin = io::stdin();
        let mut stdin = stdin.lock();
        let mut buffer = [0_u8; READ_BUFFER_SIZE];

        loop {
            let n = match stdin.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    tracing::debug!(error = %e, "stdin read failed");
                    break;
                }
            };

            let chunk = &buffer[..n];
            if chunk.contains(&CTRL_C) || chunk.contains(&CTRL_D) {
                tracing::debug!("interrupt received, closing input");
                break;
            }

            for event in decode(chunk) {
                if tx.unbounded_send(event).is_err() {
                    return;
                }
            }
        }
    });

    rx
}

/// Output adapter for raw mode, where `\n` no longer returns the carriage.
///
/// Every `\n` written through it reaches the inner writer as `\r\n`.
#[derive(Debug)]
pub struct RawWriter<W> {
    inner: W,
}

impl<W: Write> RawWriter<W> {
    pub const fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for RawWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut lines = buf.split(|&b| b == b'\n');
        if let Some(first) = lines.next() {
            self.inner.write_all(first)?;
        }
        for line in lines {
            self.inner.write_all(b"\r\n")?;
            self.inner.write_all(line)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
