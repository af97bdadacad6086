//! In-memory handle implementation for testing.

use std::io::{self, Write};
use std::sync::Arc;

use parking_lot::Mutex;

use super::LogHandle;

/// In-memory destination for testing.
///
/// Clones share the same buffer, so a test keeps one clone and hands the
/// other to an `OutputTarget`. The sink can pretend to be an interactive
/// console to exercise the colorized path.
#[derive(Debug, Clone)]
pub struct InMemorySink {
    id: String,
    terminal: bool,
    buf: Arc<Mutex<Vec<u8>>>,
    writes: Arc<Mutex<usize>>,
}

impl InMemorySink {
    /// Create a new empty, non-interactive in-memory sink.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            terminal: false,
            buf: Arc::new(Mutex::new(Vec::new())),
            writes: Arc::new(Mutex::new(0)),
        }
    }

    /// Create a new empty sink that reports itself as an interactive console.
    pub fn terminal(id: impl Into<String>) -> Self {
        Self {
            terminal: true,
            ..Self::new(id)
        }
    }

    /// Get the contents of the sink as bytes.
    pub fn contents(&self) -> Vec<u8> {
        self.buf.lock().clone()
    }

    /// Get the contents of the sink as a string.
    pub fn contents_string(&self) -> String {
        String::from_utf8_lossy(&self.contents()).into_owned()
    }

    /// Number of `write` calls the sink has received.
    pub fn write_count(&self) -> usize {
        *self.writes.lock()
    }

    /// Clear the sink contents.
    pub fn clear(&self) {
        self.buf.lock().clear();
        *self.writes.lock() = 0;
    }
}

impl Write for InMemorySink {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.lock().extend_from_slice(data);
        *self.writes.lock() += 1;
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl LogHandle for InMemorySink {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_terminal(&self) -> bool {
        self.terminal
    }
}
