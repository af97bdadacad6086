//! Per-thread line assembly.
//!
//! Every thread that writes to an `OutputTarget` gets its own `LineBuffer`,
//! created lazily on first use and kept in thread-local storage keyed by the
//! target. A buffer is never shared or moved to another thread, so appending
//! needs no synchronization; only delivery of a finished line goes through
//! the target's lock.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::sync::Weak;
use std::sync::atomic::{AtomicU32, Ordering};

/// Maximum number of content bytes (excluding the timestamp prefix) held
/// before a line is force-split.
pub const LINE_LIMIT: usize = 1000;

/// Line terminator appended to every delivered line.
#[cfg(windows)]
pub const LINE_TERMINATOR: &[u8] = b"\r\n";
#[cfg(not(windows))]
pub const LINE_TERMINATOR: &[u8] = b"\n";

/// Receiver of completed lines.
pub trait LineDelivery {
    /// Whether new lines start with a timestamp and thread tag.
    fn prepend_time(&self) -> bool;

    /// Write one completed line, without terminator, to the destination.
    ///
    /// The implementation may append to `line`; the buffer is cleared afterwards.
    fn deliver(&self, line: &mut Vec<u8>);
}

/// Accumulates one logical line for the owning thread.
#[derive(Debug, Default)]
pub struct LineBuffer {
    text: Vec<u8>,
    prefix_len: usize,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Bytes pending delivery, including any timestamp prefix.
    pub fn pending(&self) -> &[u8] {
        &self.text
    }

    /// Number of content bytes, excluding the prefix.
    pub fn content_len(&self) -> usize {
        self.text.len() - self.prefix_len
    }

    pub fn prefix_written(&self) -> bool {
        self.prefix_len > 0
    }

    /// Append `bytes` to the line in progress.
    ///
    /// Content never exceeds `LINE_LIMIT` bytes: when the limit is reached the
    /// line is delivered and the rest continues on a fresh line, which gets
    /// its own prefix.
    pub fn append<D: LineDelivery + ?Sized>(&mut self, mut bytes: &[u8], out: &D) {
        while !bytes.is_empty() {
            if self.content_len() == LINE_LIMIT {
                self.flush(out);
            }
            if self.text.is_empty() && out.prepend_time() {
                self.write_prefix();
            }
            let room = LINE_LIMIT - self.content_len();
            let (chunk, rest) = bytes.split_at(room.min(bytes.len()));
            self.text.extend_from_slice(chunk);
            bytes = rest;
        }
    }

    /// Deliver the line in progress, even if empty, and start a new one.
    pub fn flush<D: LineDelivery + ?Sized>(&mut self, out: &D) {
        out.deliver(&mut self.text);
        self.clear();
    }

    /// Remove and return the pending line, leaving the buffer empty.
    pub fn take(&mut self) -> Vec<u8> {
        self.prefix_len = 0;
        std::mem::take(&mut self.text)
    }

    fn clear(&mut self) {
        self.text.clear();
        self.prefix_len = 0;
    }

    fn write_prefix(&mut self) {
        let now = chrono::Local::now();
        // Writing into a Vec cannot fail.
        let _ = write!(
            self.text,
            "{} [{:08x}] ",
            now.format("%H:%M:%S%.3f"),
            thread_tag()
        );
        self.prefix_len = self.text.len();
    }
}

static NEXT_THREAD_TAG: AtomicU32 = AtomicU32::new(1);

thread_local! {
    static THREAD_TAG: u32 = NEXT_THREAD_TAG.fetch_add(1, Ordering::Relaxed);
    static BUFFERS: RefCell<HashMap<u64, Slot>> = RefCell::new(HashMap::new());
}

/// Small numeric identifier of the calling thread, stable for its lifetime.
pub fn thread_tag() -> u32 {
    THREAD_TAG.try_with(|tag| *tag).unwrap_or(0)
}

/// A thread's buffer for one target.
///
/// Holds a weak reference so a thread exiting with a partial line can still
/// deliver it, as long as the target is alive.
struct Slot {
    owner: Weak<dyn SlotOwner>,
    buffer: LineBuffer,
}

/// What a slot needs from its target to flush on thread exit.
pub(crate) trait SlotOwner: LineDelivery + Send + Sync {}

impl<T: LineDelivery + Send + Sync> SlotOwner for T {}

impl Drop for Slot {
    fn drop(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        if let Some(owner) = self.owner.upgrade() {
            self.buffer.flush(&*owner);
        }
    }
}

/// Run `f` with the calling thread's buffer for target `key`.
///
/// Falls back to a temporary buffer when the registry is unavailable (during
/// thread teardown, or when a destination write re-enters the logger); such
/// a buffer is flushed before returning if it holds content.
pub(crate) fn with_buffer<R>(
    key: u64,
    owner: &Weak<dyn SlotOwner>,
    out: &dyn LineDelivery,
    mut f: impl FnMut(&mut LineBuffer) -> R,
) -> R {
    let registered = BUFFERS.try_with(|buffers| {
        let mut buffers = buffers.try_borrow_mut().ok()?;
        if !buffers.contains_key(&key) {
            // Targets dropped on other threads leave their slots behind here.
            buffers.retain(|_, slot| slot.owner.strong_count() > 0);
        }
        let slot = buffers.entry(key).or_insert_with(|| Slot {
            owner: owner.clone(),
            buffer: LineBuffer::new(),
        });
        Some(f(&mut slot.buffer))
    });
    if let Ok(Some(result)) = registered {
        return result;
    }

    let mut temp = LineBuffer::new();
    let result = f(&mut temp);
    if !temp.is_empty() {
        temp.flush(out);
    }
    result
}

/// Take the calling thread's pending line for target `key`, if any.
pub(crate) fn take_pending(key: u64) -> Option<Vec<u8>> {
    BUFFERS
        .try_with(|buffers| {
            let mut buffers = buffers.try_borrow_mut().ok()?;
            let slot = buffers.get_mut(&key)?;
            (!slot.buffer.is_empty()).then(|| slot.buffer.take())
        })
        .ok()
        .flatten()
}

/// Forget the calling thread's buffer for target `key`, returning it.
pub(crate) fn release(key: u64) -> Option<LineBuffer> {
    BUFFERS
        .try_with(|buffers| {
            let mut buffers = buffers.try_borrow_mut().ok()?;
            let mut slot = buffers.remove(&key)?;
            Some(std::mem::take(&mut slot.buffer))
        })
        .ok()
        .flatten()
}

/// Number of slots the calling thread currently holds.
#[cfg(test)]
pub(crate) fn slot_count() -> usize {
    BUFFERS.with(|buffers| buffers.borrow().len())
}
