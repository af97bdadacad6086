//! # linesink
//!
//! A process-wide, thread-safe line logging sink.
//!
//! ## Overview
//!
//! linesink provides:
//! - **Per-thread line assembly**: Each thread builds its own lines; concurrent
//!   writers never interleave inside a line
//! - **Bounded lines**: Lines are force-split at 1000 content bytes, each piece
//!   with its own timestamp prefix
//! - **Color decoration**: Console destinations get a per-role color, applied
//!   atomically with respect to other writers
//! - **Live redirection**: Switch a role to a file or another handle without
//!   losing the partial line in progress
//! - **`log` integration**: `Logger` is a `log::Log` backend with level gating
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use linesink::{Logger, Severity, StreamRole};
//!
//! fn main() -> Result<(), linesink::LogError> {
//!     let logger = Logger::builder()
//!         .with_level(Severity::Debug)
//!         .build()?
//!         .install()?;
//!
//!     log::info!("starting up");
//!     logger.redirect(StreamRole::Log, "app.log")?;
//!     log::debug!("now written to app.log");
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Line format
//!
//! With timestamps enabled every line starts with `HH:MM:SS.mmm [tttttttt] `,
//! where `tttttttt` is a per-thread tag in hex. On an interactive console a
//! colored line is written as: color sequence, text, reset sequence, line
//! terminator, all under the target's lock. Files and pipes receive the text
//! and terminator in a single write.
//!
//! ## Features
//!
//! - `json` - Load `LoggerConfig` from JSON
//! - `yaml` - Load `LoggerConfig` from YAML
//! - `miette` - Pretty error reporting with miette

pub mod buffer;
pub mod builder;
pub mod color;
pub mod config;
pub mod error;
pub mod io;
pub mod logger;
pub mod severity;
pub mod sink;
pub mod target;
pub mod transcode;

// Re-exports for convenience
pub use buffer::{LINE_LIMIT, LINE_TERMINATOR, LineBuffer, LineDelivery};
pub use builder::LoggerBuilder;
pub use color::{Color, ColorEncoder, ColorSpec};
pub use config::{LoggerConfig, RoleConfig};
pub use error::LogError;
pub use io::{FileHandle, InMemorySink, LogHandle, SharedFile, StderrHandle, StdoutHandle};
pub use logger::{Logger, crit, set_error_color, set_log_color};
pub use severity::{Severity, StreamRole};
pub use sink::LoggerSink;
pub use target::{OutputLock, OutputTarget, TargetMode, TargetOptions};
pub use transcode::Transcoder;

/// Build a Logger from a LoggerConfig.
pub fn build_logger_from_config(config: &LoggerConfig) -> error::Result<Logger> {
    LoggerBuilder::from_config(config)?.build()
}

// Miette re-exports
#[cfg(feature = "miette")]
pub use error::LogDiagnostic;
