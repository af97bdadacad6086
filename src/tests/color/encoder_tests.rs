//! Tests for color sequence encoding.

use crate::color::ANSI_RESET;
use crate::{Color, ColorEncoder, ColorSpec};

fn ansi(spec: ColorSpec) -> String {
    String::from_utf8(ColorEncoder::Ansi.encode(spec)).unwrap()
}

#[test]
fn empty_spec_encodes_to_nothing() {
    assert!(ColorEncoder::Ansi.encode(ColorSpec::empty()).is_empty());
}

#[test]
fn foreground_only() {
    assert_eq!(ansi(ColorSpec::empty().fg(Color::Red)), "\x1b[31m");
    assert_eq!(ansi(ColorSpec::empty().fg(Color::Cyan)), "\x1b[36m");
}

#[test]
fn background_only() {
    assert_eq!(ansi(ColorSpec::empty().bg(Color::Blue)), "\x1b[44m");
}

#[test]
fn foreground_background_and_bright() {
    assert_eq!(ansi(ColorSpec::default_error()), "\x1b[37;41;1m");
    assert_eq!(ansi(ColorSpec::default_log()), "\x1b[37;1m");
}

#[test]
fn bright_without_colors_is_minimal() {
    assert_eq!(ansi(ColorSpec::empty().bright_fg()), "\x1b[1m");
    assert_eq!(ansi(ColorSpec::empty().bright_bg()), "\x1b[1m");
}

#[test]
fn black_is_a_real_color() {
    assert_eq!(ansi(ColorSpec::empty().fg(Color::Black)), "\x1b[30m");
    assert_eq!(ansi(ColorSpec::from_attribute(0)), "\x1b[30;40m");
}

#[test]
fn every_color_maps_to_a_distinct_code() {
    let mut codes: Vec<String> = [
        Color::Black,
        Color::Blue,
        Color::Green,
        Color::Cyan,
        Color::Red,
        Color::Magenta,
        Color::Yellow,
        Color::White,
    ]
    .into_iter()
    .map(|c| ansi(ColorSpec::empty().fg(c)))
    .collect();
    codes.sort();
    codes.dedup();
    assert_eq!(codes.len(), 8);
}

#[test]
fn plain_encoder_never_decorates() {
    assert!(ColorEncoder::Plain.encode(ColorSpec::default_error()).is_empty());
    assert!(ColorEncoder::Plain.reset().is_empty());
    assert_eq!(ColorEncoder::Ansi.reset(), ANSI_RESET);
}
