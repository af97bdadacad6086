//! Deserializable logger settings.

use std::path::PathBuf;

use serde::Deserialize;

use crate::color::ColorSpec;
use crate::error::Result;
use crate::severity::Severity;

/// Configuration for the whole logger.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Minimum severity written: "trace", "debug", "info", "warn", "error", "crit"
    pub level: Severity,
    /// Prefix lines with a timestamp and thread tag
    pub timestamps: bool,
    /// Informational stream settings
    pub log: RoleConfig,
    /// Error stream settings
    pub error: RoleConfig,
}

/// Configuration for a single stream role.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoleConfig {
    /// Color name such as "bright white on red"; "none" disables decoration,
    /// absent keeps the role's default
    #[serde(default)]
    pub color: Option<String>,
    /// File to redirect the role to at startup
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: Severity::Info,
            timestamps: true,
            log: RoleConfig::default(),
            error: RoleConfig::default(),
        }
    }
}

impl LoggerConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum severity.
    pub fn with_level(mut self, level: Severity) -> Self {
        self.level = level;
        self
    }

    /// Enable or disable timestamps.
    pub fn with_timestamps(mut self, timestamps: bool) -> Self {
        self.timestamps = timestamps;
        self
    }

    /// Set the informational stream settings.
    pub fn with_log(mut self, role: RoleConfig) -> Self {
        self.log = role;
        self
    }

    /// Set the error stream settings.
    pub fn with_error(mut self, role: RoleConfig) -> Self {
        self.error = role;
        self
    }

    /// Parse a configuration from JSON.
    #[cfg(feature = "json")]
    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| crate::error::LogError::InvalidConfig(e.to_string()))
    }

    /// Parse a configuration from YAML.
    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        serde_yaml::from_str(s).map_err(|e| crate::error::LogError::InvalidConfig(e.to_string()))
    }
}

impl RoleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the color name.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Set the redirection file.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// The configured color: `None` keeps the default, `Some(None)` disables decoration.
    pub fn color_spec(&self) -> Result<Option<Option<ColorSpec>>> {
        match &self.color {
            None => Ok(None),
            Some(name) => {
                let spec: ColorSpec = name.parse()?;
                Ok(Some((!spec.is_empty()).then_some(spec)))
            }
        }
    }
}
