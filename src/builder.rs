//! Builder for creating Logger instances.

use std::path::PathBuf;
use std::sync::Arc;

use crate::color::{ColorEncoder, ColorSpec};
use crate::config::{LoggerConfig, RoleConfig};
use crate::error::Result;
use crate::io::{LogHandle, StderrHandle};
use crate::logger::Logger;
use crate::severity::{Severity, StreamRole};
use crate::target::{OutputLock, OutputTarget, TargetOptions};
use crate::transcode::Transcoder;

#[derive(Debug)]
struct RoleSetup {
    color: Option<ColorSpec>,
    handle: Option<Box<dyn LogHandle>>,
    file: Option<PathBuf>,
}

impl RoleSetup {
    fn new(color: ColorSpec) -> Self {
        Self {
            color: Some(color),
            handle: None,
            file: None,
        }
    }
}

#[derive(Debug)]
pub struct LoggerBuilder {
    level: Severity,
    timestamps: bool,
    encoder: ColorEncoder,
    transcoder: Option<Arc<dyn Transcoder>>,
    output_lock: OutputLock,
    log: RoleSetup,
    error: RoleSetup,
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggerBuilder {
    /// Both roles write to stderr; informational lines are bright white,
    /// error lines bright white on red.
    pub fn new() -> Self {
        Self {
            level: Severity::Info,
            timestamps: true,
            encoder: ColorEncoder::Ansi,
            transcoder: None,
            output_lock: OutputLock::console(),
            log: RoleSetup::new(ColorSpec::default_log()),
            error: RoleSetup::new(ColorSpec::default_error()),
        }
    }

    /// Create a builder from a deserialized configuration.
    pub fn from_config(config: &LoggerConfig) -> Result<Self> {
        let mut builder = Self::new()
            .with_level(config.level)
            .with_timestamps(config.timestamps);
        builder.apply_role(StreamRole::Log, &config.log)?;
        builder.apply_role(StreamRole::Error, &config.error)?;
        Ok(builder)
    }

    fn apply_role(&mut self, role: StreamRole, config: &RoleConfig) -> Result<()> {
        let setup = self.setup_mut(role);
        if let Some(color) = config.color_spec()? {
            setup.color = color;
        }
        if let Some(path) = &config.file {
            setup.file = Some(path.clone());
        }
        Ok(())
    }

    fn setup_mut(&mut self, role: StreamRole) -> &mut RoleSetup {
        match role {
            StreamRole::Log => &mut self.log,
            StreamRole::Error => &mut self.error,
        }
    }

    pub fn with_level(mut self, level: Severity) -> Self {
        self.level = level;
        self
    }

    pub fn with_timestamps(mut self, timestamps: bool) -> Self {
        self.timestamps = timestamps;
        self
    }

    pub fn with_encoder(mut self, encoder: ColorEncoder) -> Self {
        self.encoder = encoder;
        self
    }

    pub fn with_transcoder(mut self, transcoder: Arc<dyn Transcoder>) -> Self {
        self.transcoder = Some(transcoder);
        self
    }

    /// Serialize both roles with `lock` instead of the process-wide console lock.
    pub fn with_output_lock(mut self, lock: OutputLock) -> Self {
        self.output_lock = lock;
        self
    }

    /// Set the custom color of a role; `None` disables decoration.
    pub fn with_color(mut self, role: StreamRole, color: Option<ColorSpec>) -> Self {
        self.setup_mut(role).color = color;
        self
    }

    /// Write a role to a caller-owned handle instead of stderr.
    pub fn with_handle(mut self, role: StreamRole, handle: Box<dyn LogHandle>) -> Self {
        self.setup_mut(role).handle = Some(handle);
        self
    }

    /// Redirect a role to a file when the logger is built.
    pub fn redirect_to(mut self, role: StreamRole, path: impl Into<PathBuf>) -> Self {
        self.setup_mut(role).file = Some(path.into());
        self
    }

    pub fn build(self) -> Result<Logger> {
        let LoggerBuilder {
            level,
            timestamps,
            encoder,
            transcoder,
            output_lock,
            log,
            error,
        } = self;

        let options = |color: Option<ColorSpec>| {
            let options = TargetOptions::new()
                .with_timestamps(timestamps)
                .with_color(color)
                .with_encoder(encoder)
                .with_output_lock(output_lock.clone());
            match &transcoder {
                Some(t) => options.with_transcoder(Arc::clone(t)),
                None => options,
            }
        };

        let log_options = options(log.color);
        let error_options = options(error.color);
        Ok(Logger::new(
            level,
            build_target(log, log_options)?,
            build_target(error, error_options)?,
        ))
    }
}

fn build_target(setup: RoleSetup, options: TargetOptions) -> Result<OutputTarget> {
    let handle = setup
        .handle
        .unwrap_or_else(|| Box::new(StderrHandle::new()) as Box<dyn LogHandle>);
    let target = OutputTarget::new(handle, options);
    if let Some(path) = setup.file {
        target.redirect(path)?;
    }
    Ok(target)
}
