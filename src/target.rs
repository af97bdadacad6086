//! The shared output destination of one stream role.
//!
//! An `OutputTarget` owns the write handle, knows whether the handle is a
//! color-capable console, and serializes every line delivery and every
//! redirection behind one lock. Redirection first delivers the calling
//! thread's partial line to the old destination, so no line straddles a
//! destination change.

use std::fmt;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock, Weak};

use parking_lot::Mutex;

use crate::buffer::{self, LINE_TERMINATOR, LineBuffer, LineDelivery, SlotOwner};
use crate::color::{ColorEncoder, ColorSpec};
use crate::error::{LogError, Result};
use crate::io::{FileHandle, LogHandle};
use crate::transcode::{Transcoder, transcode_line};

static NEXT_TARGET_KEY: AtomicU64 = AtomicU64::new(1);

static CONSOLE_LOCK: LazyLock<OutputLock> = LazyLock::new(OutputLock::new);

/// Serializes line deliveries across every target that holds a clone of it.
///
/// Targets sharing a physical destination (both roles on stderr, say) must
/// share a lock, or one line's color set/text/reset writes can interleave
/// with another's. `OutputLock::console()` is the process-wide lock every
/// target uses unless told otherwise.
#[derive(Debug, Clone)]
pub struct OutputLock(Arc<Mutex<()>>);

impl OutputLock {
    /// A fresh lock, shared only with its clones.
    pub fn new() -> Self {
        Self(Arc::new(Mutex::new(())))
    }

    /// The process-wide console lock.
    pub fn console() -> Self {
        CONSOLE_LOCK.clone()
    }

    /// Whether both handles guard deliveries with the same lock.
    pub fn same_as(&self, other: &OutputLock) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for OutputLock {
    fn default() -> Self {
        Self::new()
    }
}

/// Decoration state of a target, derived from its current handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetMode {
    /// An interactive console; lines get the custom color.
    Colored,
    /// A handle supplied by the caller that is not a console (pipe, file).
    Plain,
    /// A file opened by the target itself.
    OwnedFile,
}

/// Construction options for an `OutputTarget`.
#[derive(Debug, Clone)]
pub struct TargetOptions {
    /// Prefix each line with a timestamp and thread tag
    pub timestamps: bool,
    /// Custom color for colorized lines
    pub color: Option<ColorSpec>,
    /// How colors are turned into bytes
    pub encoder: ColorEncoder,
    /// Console encoding converter
    pub transcoder: Option<Arc<dyn Transcoder>>,
    /// Lock serializing deliveries with other targets
    pub output_lock: OutputLock,
}

impl Default for TargetOptions {
    fn default() -> Self {
        Self {
            timestamps: true,
            color: None,
            encoder: ColorEncoder::default(),
            transcoder: None,
            output_lock: OutputLock::console(),
        }
    }
}

impl TargetOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the timestamp prefix.
    pub fn with_timestamps(mut self, timestamps: bool) -> Self {
        self.timestamps = timestamps;
        self
    }

    /// Set the custom color.
    pub fn with_color(mut self, color: Option<ColorSpec>) -> Self {
        self.color = color;
        self
    }

    /// Set the color encoder.
    pub fn with_encoder(mut self, encoder: ColorEncoder) -> Self {
        self.encoder = encoder;
        self
    }

    /// Set the console transcoder.
    pub fn with_transcoder(mut self, transcoder: Arc<dyn Transcoder>) -> Self {
        self.transcoder = Some(transcoder);
        self
    }

    /// Share delivery serialization with other targets holding `lock`.
    pub fn with_output_lock(mut self, lock: OutputLock) -> Self {
        self.output_lock = lock;
        self
    }
}

struct State {
    handle: Box<dyn LogHandle>,
    owns_handle: bool,
    supports_color: bool,
    custom_color: Option<ColorSpec>,
}

impl State {
    /// Write failures lose the line; they are never reported.
    fn write(&mut self, bytes: &[u8]) {
        let _ = self.handle.write_all(bytes);
    }
}

struct Inner {
    key: u64,
    timestamps: bool,
    encoder: ColorEncoder,
    transcoder: Option<Arc<dyn Transcoder>>,
    output_lock: OutputLock,
    // Lock order: `state` before `output_lock`.
    state: Mutex<State>,
}

impl Inner {
    fn deliver_locked(&self, state: &mut State, line: &mut Vec<u8>) {
        let _output = self.output_lock.0.lock();
        if !state.supports_color {
            line.extend_from_slice(LINE_TERMINATOR);
            state.write(line);
            return;
        }

        if line.is_empty() {
            state.write(LINE_TERMINATOR);
            return;
        }

        let set = state
            .custom_color
            .map(|color| self.encoder.encode(color))
            .unwrap_or_default();
        if !set.is_empty() {
            state.write(&set);
        }
        match self
            .transcoder
            .as_deref()
            .and_then(|t| transcode_line(t, line.as_slice()))
        {
            Some(converted) => state.write(&converted),
            None => state.write(line),
        }
        if !set.is_empty() {
            state.write(self.encoder.reset());
        }
        state.write(LINE_TERMINATOR);
    }
}

impl LineDelivery for Inner {
    fn prepend_time(&self) -> bool {
        self.timestamps
    }

    fn deliver(&self, line: &mut Vec<u8>) {
        let mut state = self.state.lock();
        self.deliver_locked(&mut state, line);
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(mut pending) = buffer::release(self.key) {
            if !pending.is_empty() {
                pending.flush(&*self);
            }
        }
        let state = self.state.get_mut();
        let _ = state.handle.flush();
    }
}

/// A shared, thread-safe log destination.
///
/// Cloning is cheap; clones refer to the same destination.
#[derive(Clone)]
pub struct OutputTarget {
    inner: Arc<Inner>,
}

impl OutputTarget {
    /// Create a target writing to `handle`, which stays owned by the caller's side.
    ///
    /// Color support is probed from the handle.
    pub fn new(handle: Box<dyn LogHandle>, options: TargetOptions) -> Self {
        let supports_color = handle.is_terminal();
        Self {
            inner: Arc::new(Inner {
                key: NEXT_TARGET_KEY.fetch_add(1, Ordering::Relaxed),
                timestamps: options.timestamps,
                encoder: options.encoder,
                transcoder: options.transcoder,
                output_lock: options.output_lock,
                state: Mutex::new(State {
                    handle,
                    owns_handle: false,
                    supports_color,
                    custom_color: options.color.filter(|c| !c.is_empty()),
                }),
            }),
        }
    }

    /// Identifier of the current destination.
    pub fn id(&self) -> String {
        self.inner.state.lock().handle.id().to_string()
    }

    pub fn mode(&self) -> TargetMode {
        let state = self.inner.state.lock();
        if state.owns_handle {
            TargetMode::OwnedFile
        } else if state.supports_color {
            TargetMode::Colored
        } else {
            TargetMode::Plain
        }
    }

    pub fn supports_color(&self) -> bool {
        self.inner.state.lock().supports_color
    }

    /// Whether the target opened its handle itself and will close it.
    pub fn owns_handle(&self) -> bool {
        self.inner.state.lock().owns_handle
    }

    pub fn timestamps(&self) -> bool {
        self.inner.timestamps
    }

    /// The lock this target's deliveries are serialized with.
    pub fn output_lock(&self) -> &OutputLock {
        &self.inner.output_lock
    }

    pub fn color(&self) -> Option<ColorSpec> {
        self.inner.state.lock().custom_color
    }

    /// Set the color of the next flushed lines. `None` or an empty spec disables decoration.
    pub fn set_color(&self, color: Option<ColorSpec>) {
        self.inner.state.lock().custom_color = color.filter(|c| !c.is_empty());
    }

    /// Write `bytes` to the destination as-is, without decoration or terminator.
    pub fn write_line(&self, bytes: &[u8]) {
        let mut state = self.inner.state.lock();
        let _output = self.inner.output_lock.0.lock();
        state.write(bytes);
    }

    /// Append `bytes` to the calling thread's line in progress.
    pub fn append(&self, bytes: &[u8]) {
        self.with_line_buffer(|line, out| line.append(bytes, out));
    }

    /// Complete the calling thread's line and deliver it, even if empty.
    pub fn flush_line(&self) {
        self.with_line_buffer(|line, out| line.flush(out));
    }

    /// Flush the destination handle's own buffers, if it has any.
    pub fn flush_handle(&self) {
        let _ = self.inner.state.lock().handle.flush();
    }

    /// Redirect output to the file at `path`, opened for appending and created if absent.
    ///
    /// On failure the current destination stays active. On success the
    /// calling thread's partial line is delivered to the old destination, the
    /// old handle is closed if this target opened it, and the file becomes
    /// the new, undecorated destination.
    pub fn redirect(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut handle = FileHandle::open_append(path)
            .map_err(|source| LogError::Open {
                target: path.to_string_lossy().into_owned(),
                source,
            })?;
        // Append mode already writes at the end.
        let _ = handle.seek_to_end();
        self.install(Box::new(handle), true, false);
        Ok(())
    }

    /// Redirect output to a handle the caller keeps ownership of.
    ///
    /// Color support is probed from the handle. A non-console handle that can
    /// seek is positioned at its end so concurrent writers do not overwrite
    /// each other's tail.
    pub fn redirect_handle(&self, mut handle: Box<dyn LogHandle>) {
        let supports_color = handle.is_terminal();
        if !supports_color {
            let _ = handle.seek_to_end();
        }
        self.install(handle, false, supports_color);
    }

    fn install(&self, handle: Box<dyn LogHandle>, owns_handle: bool, supports_color: bool) {
        let pending = buffer::take_pending(self.inner.key);

        let previous = {
            let mut state = self.inner.state.lock();
            if let Some(mut line) = pending {
                self.inner.deliver_locked(&mut state, &mut line);
            }
            let mut previous = std::mem::replace(&mut state.handle, handle);
            let _ = previous.flush();
            state.owns_handle = owns_handle;
            state.supports_color = supports_color;
            previous
        };
        // Owned files close here; caller-supplied handles only release their reference.
        drop(previous);
    }

    fn with_line_buffer<R>(&self, mut f: impl FnMut(&mut LineBuffer, &dyn LineDelivery) -> R) -> R {
        let owner: Weak<dyn SlotOwner> = Arc::downgrade(&self.inner) as Weak<dyn SlotOwner>;
        let out: &dyn LineDelivery = &*self.inner;
        buffer::with_buffer(self.inner.key, &owner, out, |line| f(line, out))
    }
}

impl fmt::Debug for OutputTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("OutputTarget")
            .field("handle", &state.handle)
            .field("owns_handle", &state.owns_handle)
            .field("supports_color", &state.supports_color)
            .field("custom_color", &state.custom_color)
            .field("timestamps", &self.inner.timestamps)
            .finish()
    }
}
