//! Destination handles for output targets.
//!
//! This module provides:
//! - `LogHandle`: Trait for writable destinations (console device or file)
//! - Standard implementations for stdout/stderr and files
//! - An in-memory implementation for testing

mod handle;
mod memory;
mod std_io;

pub use handle::LogHandle;
pub use memory::InMemorySink;
pub use std_io::{FileHandle, SharedFile, StderrHandle, StdoutHandle};
