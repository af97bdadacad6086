//! Character-encoding conversion for interactive consoles.

use std::fmt::Debug;

use crate::error::LogError;

/// Converts buffered text from the host encoding to the console's display encoding.
///
/// A transcoder is consulted only for interactive consoles, only when its two
/// encodings differ, and only for lines containing non-ASCII bytes. A failed
/// conversion falls back to writing the original bytes.
pub trait Transcoder: Send + Sync + Debug {
    /// Name of the encoding buffered text is in.
    fn source_encoding(&self) -> &str;

    /// Name of the encoding the console displays.
    fn console_encoding(&self) -> &str;

    fn transcode(&self, text: &[u8]) -> Result<Vec<u8>, LogError>;

    /// Whether text needs converting at all.
    fn is_identity(&self) -> bool {
        self.source_encoding()
            .eq_ignore_ascii_case(self.console_encoding())
    }
}

/// Transcode `text` if needed, or `None` to write it unchanged.
pub(crate) fn transcode_line(transcoder: &dyn Transcoder, text: &[u8]) -> Option<Vec<u8>> {
    if transcoder.is_identity() || text.is_ascii() {
        return None;
    }
    transcoder.transcode(text).ok()
}
