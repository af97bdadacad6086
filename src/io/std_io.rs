//! Standard handle implementations for stdout/stderr and files.

use std::fs::{File, OpenOptions};
use std::io::{self, IsTerminal, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::Arc;

use super::LogHandle;

/// Handle writing to the process stdout. Dropping it leaves stdout open.
#[derive(Debug)]
pub struct StdoutHandle {
    out: io::Stdout,
}

impl StdoutHandle {
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }
}

impl Default for StdoutHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for StdoutHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.out.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

impl LogHandle for StdoutHandle {
    fn id(&self) -> &str {
        "-"
    }

    fn is_terminal(&self) -> bool {
        self.out.is_terminal()
    }
}

/// Handle writing to the process stderr. Dropping it leaves stderr open.
#[derive(Debug)]
pub struct StderrHandle {
    err: io::Stderr,
}

impl StderrHandle {
    pub fn new() -> Self {
        Self { err: io::stderr() }
    }
}

impl Default for StderrHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for StderrHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.err.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.err.flush()
    }
}

impl LogHandle for StderrHandle {
    fn id(&self) -> &str {
        "stderr"
    }

    fn is_terminal(&self) -> bool {
        self.err.is_terminal()
    }
}

/// A file exclusively owned by the handle; dropping it closes the file.
#[derive(Debug)]
pub struct FileHandle {
    id: String,
    file: File,
}

impl FileHandle {
    /// Open `path` for appending, creating it if absent.
    pub fn open_append(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            id: path.to_string_lossy().into_owned(),
            file,
        })
    }
}

impl Write for FileHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl LogHandle for FileHandle {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_terminal(&self) -> bool {
        self.file.is_terminal()
    }

    fn seek_to_end(&mut self) -> io::Result<bool> {
        self.file.seek(SeekFrom::End(0))?;
        Ok(true)
    }
}

/// A file the caller keeps open; the handle only holds a shared reference.
#[derive(Debug, Clone)]
pub struct SharedFile {
    id: String,
    file: Arc<File>,
}

impl SharedFile {
    pub fn new(id: impl Into<String>, file: Arc<File>) -> Self {
        Self {
            id: id.into(),
            file,
        }
    }
}

impl Write for SharedFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        (&*self.file).write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        (&*self.file).flush()
    }
}

impl LogHandle for SharedFile {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_terminal(&self) -> bool {
        self.file.is_terminal()
    }

    fn seek_to_end(&mut self) -> io::Result<bool> {
        (&*self.file).seek(SeekFrom::End(0))?;
        Ok(true)
    }
}
