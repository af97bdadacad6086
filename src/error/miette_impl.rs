//! Miette integration for pretty error reporting.

use miette::{Diagnostic, Severity};
use thiserror::Error;

use super::LogError;

/// A diagnostic wrapper for logger errors compatible with miette.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
pub struct LogDiagnostic {
    /// The error message
    pub message: String,

    #[source]
    /// The underlying error source
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,

    #[help]
    /// Help text for the user
    pub help: Option<String>,

    #[diagnostic(severity)]
    /// Severity level
    pub severity: Severity,
}

impl From<LogError> for LogDiagnostic {
    fn from(e: LogError) -> Self {
        match e {
            LogError::Open { target, source } => LogDiagnostic {
                message: format!("cannot open '{target}'"),
                source: Some(Box::new(source)),
                help: Some("The previous destination is still active".into()),
                severity: Severity::Error,
            },
            LogError::Transcode(msg) => LogDiagnostic {
                message: format!("transcoding failed: {msg}"),
                source: None,
                help: None,
                severity: Severity::Warning,
            },
            LogError::InvalidConfig(msg) => LogDiagnostic {
                message: format!("invalid configuration: {msg}"),
                source: None,
                help: Some("Check the level and color names in your logger config".into()),
                severity: Severity::Error,
            },
            LogError::AlreadyInstalled => LogDiagnostic {
                message: "a process-wide logger is already installed".into(),
                source: None,
                help: Some("Only one `log` backend can be registered per process".into()),
                severity: Severity::Error,
            },
        }
    }
}

impl From<LogError> for miette::Report {
    fn from(e: LogError) -> Self {
        miette::Report::new(LogDiagnostic::from(e))
    }
}
