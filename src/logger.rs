//! The process-wide pair of stream roles.

use std::fmt;
use std::io::Write;
use std::path::Path;
use std::sync::OnceLock;

use crate::builder::LoggerBuilder;
use crate::color::ColorSpec;
use crate::error::{LogError, Result};
use crate::io::LogHandle;
use crate::severity::{Severity, StreamRole};
use crate::sink::LoggerSink;
use crate::target::OutputTarget;

static GLOBAL: OnceLock<Logger> = OnceLock::new();

/// An informational and an error `OutputTarget` plus a minimum severity.
#[derive(Debug)]
pub struct Logger {
    level: Severity,
    log: OutputTarget,
    error: OutputTarget,
}

impl Logger {
    pub fn new(level: Severity, log: OutputTarget, error: OutputTarget) -> Self {
        Self { level, log, error }
    }

    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    pub fn level(&self) -> Severity {
        self.level
    }

    /// Whether messages of `severity` are written. Check before formatting.
    pub fn is_active(&self, severity: Severity) -> bool {
        severity >= self.level
    }

    pub fn target(&self, role: StreamRole) -> &OutputTarget {
        match role {
            StreamRole::Log => &self.log,
            StreamRole::Error => &self.error,
        }
    }

    /// A write adapter for `role`.
    pub fn sink(&self, role: StreamRole) -> LoggerSink {
        LoggerSink::new(self.target(role).clone())
    }

    /// A write adapter for the role `severity` is routed to.
    pub fn stream(&self, severity: Severity) -> LoggerSink {
        self.sink(severity.role())
    }

    /// Write one message as a complete line, if `severity` is active.
    pub fn log_at(&self, severity: Severity, args: fmt::Arguments<'_>) {
        if !self.is_active(severity) {
            return;
        }
        let mut sink = self.stream(severity);
        let _ = writeln!(sink, "{args}");
    }

    /// Change the decoration of the next lines of `role`.
    pub fn set_color(&self, role: StreamRole, color: Option<ColorSpec>) {
        self.target(role).set_color(color);
    }

    /// Redirect `role` to a file; on failure the previous destination stays active.
    pub fn redirect(&self, role: StreamRole, path: impl AsRef<Path>) -> Result<()> {
        self.target(role).redirect(path)
    }

    /// Redirect `role` to a handle the caller keeps ownership of.
    pub fn redirect_handle(&self, role: StreamRole, handle: Box<dyn LogHandle>) {
        self.target(role).redirect_handle(handle);
    }

    /// Make this logger the process-wide logger and the `log` crate backend.
    ///
    /// Fails without side effects if this or any other `log` backend is
    /// already registered.
    pub fn install(self) -> Result<&'static Logger> {
        let level = self.level;
        log::set_logger(&FORWARDER).map_err(|_| LogError::AlreadyInstalled)?;
        // `set_logger` succeeds once per process, so the slot is still empty.
        GLOBAL.set(self).map_err(|_| LogError::AlreadyInstalled)?;
        let logger = GLOBAL.get().ok_or(LogError::AlreadyInstalled)?;
        log::set_max_level(level.to_level_filter());
        Ok(logger)
    }

    /// The installed process-wide logger, if any.
    pub fn global() -> Option<&'static Logger> {
        GLOBAL.get()
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        self.is_active(metadata.level().into())
    }

    fn log(&self, record: &log::Record<'_>) {
        self.log_at(record.level().into(), *record.args());
    }

    fn flush(&self) {
        self.log.flush_handle();
        self.error.flush_handle();
    }
}

static FORWARDER: Forwarder = Forwarder;

/// The registered `log` backend; forwards to the installed logger.
struct Forwarder;

impl log::Log for Forwarder {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        Logger::global().is_some_and(|logger| log::Log::enabled(logger, metadata))
    }

    fn log(&self, record: &log::Record<'_>) {
        if let Some(logger) = Logger::global() {
            log::Log::log(logger, record);
        }
    }

    fn flush(&self) {
        if let Some(logger) = Logger::global() {
            log::Log::flush(logger);
        }
    }
}

/// Set the informational color of the installed logger; no-op if none is installed.
pub fn set_log_color(color: Option<ColorSpec>) {
    if let Some(logger) = Logger::global() {
        logger.set_color(StreamRole::Log, color);
    }
}

/// Set the error color of the installed logger; no-op if none is installed.
pub fn set_error_color(color: Option<ColorSpec>) {
    if let Some(logger) = Logger::global() {
        logger.set_color(StreamRole::Error, color);
    }
}

/// Log a critical message through the installed logger.
///
/// `log` has no level above error, so critical messages bypass it.
pub fn crit(args: fmt::Arguments<'_>) {
    if let Some(logger) = Logger::global() {
        logger.log_at(Severity::Crit, args);
    }
}
