//! Tests for ColorSpec construction, attribute words and parsing.

use crate::{Color, ColorSpec};

#[test]
fn attribute_word_round_trips() {
    for word in 0u16..=0xff {
        let spec = ColorSpec::from_attribute(word);
        assert_eq!(spec.to_attribute(), word);
        assert!(spec.foreground().is_some());
        assert!(spec.background().is_some());
    }
}

#[test]
fn attribute_word_decodes_components() {
    // bright white foreground on red background
    let spec = ColorSpec::from_attribute(0x0004 << 4 | 0x0007 | 0x0008);

    assert_eq!(spec.foreground(), Some(Color::White));
    assert_eq!(spec.background(), Some(Color::Red));
    assert!(spec.is_bright_fg());
    assert!(!spec.is_bright_bg());
    assert_eq!(spec, ColorSpec::default_error());
}

#[test]
fn replacing_a_color_clears_the_old_bits() {
    let spec = ColorSpec::empty().fg(Color::White).fg(Color::Blue);
    assert_eq!(spec.foreground(), Some(Color::Blue));
}

#[test]
fn empty_spec_has_no_components() {
    let spec = ColorSpec::empty();
    assert!(spec.is_empty());
    assert_eq!(spec.foreground(), None);
    assert_eq!(spec.background(), None);
}

#[test]
fn parse_names() {
    assert_eq!("none".parse::<ColorSpec>().unwrap(), ColorSpec::empty());
    assert_eq!(
        "red".parse::<ColorSpec>().unwrap(),
        ColorSpec::empty().fg(Color::Red)
    );
    assert_eq!(
        "Bright White on Red".parse::<ColorSpec>().unwrap(),
        ColorSpec::default_error()
    );
    assert_eq!(
        "on bright blue".parse::<ColorSpec>().unwrap(),
        ColorSpec::empty().bg(Color::Blue).bright_bg()
    );
}

#[test]
fn parse_rejects_unknown_names() {
    assert!("purple".parse::<ColorSpec>().is_err());
    assert!("red on".parse::<ColorSpec>().is_err());
}

#[test]
fn display_parses_back() {
    let specs = [
        ColorSpec::empty(),
        ColorSpec::default_log(),
        ColorSpec::default_error(),
        ColorSpec::empty().bg(Color::Green).bright_bg(),
        ColorSpec::empty().bright_fg(),
    ];
    for spec in specs {
        let text = spec.to_string();
        assert_eq!(text.parse::<ColorSpec>().unwrap(), spec, "{text}");
    }
}
