//! Configuration types for the logger.
//!
//! This module provides:
//! - `LoggerConfig`: Level, timestamp and per-role settings
//! - `RoleConfig`: Color and file redirection of one stream role

mod settings;

pub use settings::{LoggerConfig, RoleConfig};
