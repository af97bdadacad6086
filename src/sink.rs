//! `std::io::Write` intake for an output target.

use std::io::{self, Write};

use crate::target::OutputTarget;

const NEWLINE: u8 = b'\n';

/// Write adapter that turns arbitrary byte spans into lines.
///
/// Each `\n` in the input completes the calling thread's current line; bytes
/// after the last `\n` stay buffered until a later write or `end_line`.
/// Writes never fail: a destination error loses the line instead.
#[derive(Debug, Clone)]
pub struct LoggerSink {
    target: OutputTarget,
}

impl LoggerSink {
    pub fn new(target: OutputTarget) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &OutputTarget {
        &self.target
    }

    /// Complete the calling thread's line, delivering it even if empty.
    pub fn end_line(&self) {
        self.target.flush_line();
    }
}

impl Write for LoggerSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut segments = buf.split(|&b| b == NEWLINE).peekable();
        while let Some(segment) = segments.next() {
            if !segment.is_empty() {
                self.target.append(segment);
            }
            if segments.peek().is_some() {
                self.target.flush_line();
            }
        }
        Ok(buf.len())
    }

    /// Flushes the destination handle only; a partial line stays buffered.
    fn flush(&mut self) -> io::Result<()> {
        self.target.flush_handle();
        Ok(())
    }
}
