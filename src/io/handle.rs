//! Destination handle trait definition.

use std::fmt::Debug;
use std::io::{self, Write};

/// Trait for writable log destinations.
///
/// A handle is either opened by an `OutputTarget` itself (and then closed by
/// it) or supplied by the caller, in which case the caller keeps ownership of
/// the underlying stream: dropping the handle must not close it.
pub trait LogHandle: Write + Send + Debug {
    /// Returns an identifier for this destination.
    ///
    /// Convention: "-" for stdout, "stderr" for stderr, file path for files.
    fn id(&self) -> &str;

    /// Whether the destination is an interactive console that understands
    /// color sequences.
    fn is_terminal(&self) -> bool;

    /// Position the handle at end-of-file.
    ///
    /// Returns `Ok(false)` for destinations that cannot seek.
    fn seek_to_end(&mut self) -> io::Result<bool> {
        Ok(false)
    }
}
