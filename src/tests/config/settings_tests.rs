//! Tests for LoggerConfig parsing and role settings.

use crate::{Color, ColorSpec, LoggerConfig, RoleConfig, Severity};

#[test]
fn empty_json_uses_defaults() {
    let cfg: LoggerConfig = serde_json::from_str("{}").unwrap();

    assert_eq!(cfg.level, Severity::Info);
    assert!(cfg.timestamps);
    assert!(cfg.log.color.is_none());
    assert!(cfg.error.file.is_none());
}

#[test]
fn parse_full_config() {
    let json = r#"{
        "level": "Debug",
        "timestamps": false,
        "log": { "color": "green" },
        "error": { "color": "none", "file": "errors.log" }
    }"#;

    let cfg: LoggerConfig = serde_json::from_str(json).unwrap();

    assert_eq!(cfg.level, Severity::Debug);
    assert!(!cfg.timestamps);
    assert_eq!(
        cfg.log.color_spec().unwrap(),
        Some(Some(ColorSpec::empty().fg(Color::Green)))
    );
    assert_eq!(cfg.error.color_spec().unwrap(), Some(None));
    assert_eq!(
        cfg.error.file.as_deref(),
        Some(std::path::Path::new("errors.log"))
    );
}

#[test]
fn unknown_level_is_rejected() {
    let res: Result<LoggerConfig, _> = serde_json::from_str(r#"{ "level": "loud" }"#);
    assert!(res.is_err());
}

#[test]
fn absent_color_keeps_default() {
    assert_eq!(RoleConfig::new().color_spec().unwrap(), None);
}

#[test]
fn bad_color_name_is_an_error() {
    let role = RoleConfig::new().with_color("ultraviolet");
    assert!(role.color_spec().is_err());
}

#[test]
fn builder_style_construction() {
    let cfg = LoggerConfig::new()
        .with_level(Severity::Warn)
        .with_timestamps(false)
        .with_error(RoleConfig::new().with_file("e.log"));

    assert_eq!(cfg.level, Severity::Warn);
    assert!(!cfg.timestamps);
    assert!(cfg.error.file.is_some());
    assert!(cfg.log.file.is_none());
}
