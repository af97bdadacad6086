//! Error types for linesink administrative operations.
//!
//! Only administrative operations (redirection, building, configuration and
//! installation) return `LogError`. The write/flush path never surfaces
//! errors: a failed low-level write is a lost line, not a failure of the
//! hosting process.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LogError {
    /// A redirection target could not be opened; the previous destination stays active.
    #[error("failed to open {target}: {source}")]
    Open {
        /// Path of the destination
        target: String,
        /// The underlying error
        #[source]
        source: io::Error,
    },

    /// The injected transcoder rejected the text.
    #[error("transcoding failed: {0}")]
    Transcode(String),

    /// A configuration value could not be interpreted.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A logger, or another `log` backend, was already installed for this process.
    #[error("a process-wide logger is already installed")]
    AlreadyInstalled,
}

pub type Result<T> = std::result::Result<T, LogError>;

#[cfg(feature = "miette")]
mod miette_impl;

#[cfg(feature = "miette")]
pub use miette_impl::*;
