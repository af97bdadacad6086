//! Ordered severities and the stream roles they are routed to.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::LogError;

/// Message severity, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Severity {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Crit,
}

impl Severity {
    pub const ALL: [Severity; 6] = [
        Severity::Trace,
        Severity::Debug,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
        Severity::Crit,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Trace => "trace",
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
            Severity::Crit => "crit",
        }
    }

    /// The stream this severity is written to.
    ///
    /// Informational severities share one stream; warnings and worse go to
    /// the error stream.
    pub fn role(self) -> StreamRole {
        if self >= Severity::Warn {
            StreamRole::Error
        } else {
            StreamRole::Log
        }
    }

    /// The closest `log` filter that lets this severity and everything above it through.
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Severity::Trace => log::LevelFilter::Trace,
            Severity::Debug => log::LevelFilter::Debug,
            Severity::Info => log::LevelFilter::Info,
            Severity::Warn => log::LevelFilter::Warn,
            Severity::Error | Severity::Crit => log::LevelFilter::Error,
        }
    }
}

impl From<log::Level> for Severity {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Trace => Severity::Trace,
            log::Level::Debug => Severity::Debug,
            log::Level::Info => Severity::Info,
            log::Level::Warn => Severity::Warn,
            log::Level::Error => Severity::Error,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" | "everything" => Ok(Severity::Trace),
            "debug" => Ok(Severity::Debug),
            "info" => Ok(Severity::Info),
            "warn" | "warning" => Ok(Severity::Warn),
            "error" => Ok(Severity::Error),
            "crit" | "critical" => Ok(Severity::Crit),
            other => Err(LogError::InvalidConfig(format!("unknown level '{other}'"))),
        }
    }
}

impl TryFrom<String> for Severity {
    type Error = LogError;

    fn try_from(s: String) -> Result<Self, LogError> {
        s.parse()
    }
}

/// A logical output channel, each bound to its own `OutputTarget`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamRole {
    /// Informational output (trace, debug, info)
    Log,
    /// Warnings, errors and critical messages
    Error,
}

impl fmt::Display for StreamRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamRole::Log => write!(f, "log"),
            StreamRole::Error => write!(f, "error"),
        }
    }
}
