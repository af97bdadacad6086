//! Symbolic console colors and their encoding into output sequences.
//!
//! This module provides:
//! - `Color`: One of the eight basic console colors
//! - `ColorSpec`: A foreground/background/bright bitmask
//! - `ColorEncoder`: Maps a `ColorSpec` to the bytes that switch a console to it
//!
//! `ColorSpec` uses the bit layout of the console attribute word (blue = 0x1,
//! green = 0x2, red = 0x4, bright = 0x8, background shifted by four), so a
//! spec converts to and from that word without loss.

use std::fmt;
use std::str::FromStr;

use crate::error::LogError;

const BLUE: u16 = 0x0001;
const GREEN: u16 = 0x0002;
const RED: u16 = 0x0004;
const FG_MASK: u16 = RED | GREEN | BLUE;
const FG_BRIGHT: u16 = 0x0008;
const BG_SHIFT: u16 = 4;
const BG_MASK: u16 = FG_MASK << BG_SHIFT;
const BG_BRIGHT: u16 = 0x0080;
const ATTRIBUTE_MASK: u16 = FG_MASK | FG_BRIGHT | BG_MASK | BG_BRIGHT;
// Outside the attribute word: distinguish "black" from "unset".
const FG_SET: u16 = 0x0100;
const BG_SET: u16 = 0x0200;

/// ANSI SGR sequence that returns the console to its default attributes.
pub const ANSI_RESET: &[u8] = b"\x1b[0m";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    Blue,
    Green,
    Cyan,
    Red,
    Magenta,
    Yellow,
    White,
}

impl Color {
    const ALL: [Color; 8] = [
        Color::Black,
        Color::Blue,
        Color::Green,
        Color::Cyan,
        Color::Red,
        Color::Magenta,
        Color::Yellow,
        Color::White,
    ];

    /// The three attribute-word bits (red, green, blue) of this color.
    pub fn bits(self) -> u16 {
        match self {
            Color::Black => 0,
            Color::Blue => BLUE,
            Color::Green => GREEN,
            Color::Cyan => GREEN | BLUE,
            Color::Red => RED,
            Color::Magenta => RED | BLUE,
            Color::Yellow => RED | GREEN,
            Color::White => RED | GREEN | BLUE,
        }
    }

    fn from_bits(bits: u16) -> Color {
        Color::ALL[(bits & FG_MASK) as usize]
    }

    /// Index in the ANSI palette (30 + index for foreground, 40 + index for background).
    pub fn ansi_index(self) -> u8 {
        match self {
            Color::Black => 0,
            Color::Red => 1,
            Color::Green => 2,
            Color::Yellow => 3,
            Color::Blue => 4,
            Color::Magenta => 5,
            Color::Cyan => 6,
            Color::White => 7,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::Black => "black",
            Color::Blue => "blue",
            Color::Green => "green",
            Color::Cyan => "cyan",
            Color::Red => "red",
            Color::Magenta => "magenta",
            Color::Yellow => "yellow",
            Color::White => "white",
        }
    }
}

impl FromStr for Color {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| LogError::InvalidConfig(format!("unknown color '{s}'")))
    }
}

/// A foreground/background/bright color request.
///
/// The empty spec requests no attribute change at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ColorSpec(u16);

impl ColorSpec {
    pub const fn empty() -> Self {
        ColorSpec(0)
    }

    /// Build a spec from a console attribute word.
    ///
    /// The word always names both a foreground and a background, so both are
    /// marked as set even when their bits are zero (black).
    pub const fn from_attribute(word: u16) -> Self {
        ColorSpec((word & ATTRIBUTE_MASK) | FG_SET | BG_SET)
    }

    /// The console attribute word for this spec. Unset colors map to black.
    pub const fn to_attribute(self) -> u16 {
        self.0 & ATTRIBUTE_MASK
    }

    pub fn fg(self, color: Color) -> Self {
        ColorSpec((self.0 & !FG_MASK) | color.bits() | FG_SET)
    }

    pub fn bg(self, color: Color) -> Self {
        ColorSpec((self.0 & !BG_MASK) | (color.bits() << BG_SHIFT) | BG_SET)
    }

    pub fn bright_fg(self) -> Self {
        ColorSpec(self.0 | FG_BRIGHT)
    }

    pub fn bright_bg(self) -> Self {
        ColorSpec(self.0 | BG_BRIGHT)
    }

    pub fn foreground(self) -> Option<Color> {
        (self.0 & FG_SET != 0).then(|| Color::from_bits(self.0))
    }

    pub fn background(self) -> Option<Color> {
        (self.0 & BG_SET != 0).then(|| Color::from_bits(self.0 >> BG_SHIFT))
    }

    pub fn is_bright_fg(self) -> bool {
        self.0 & FG_BRIGHT != 0
    }

    pub fn is_bright_bg(self) -> bool {
        self.0 & BG_BRIGHT != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Default decoration of the informational stream: bright white.
    pub fn default_log() -> Self {
        ColorSpec::empty().fg(Color::White).bright_fg()
    }

    /// Default decoration of the error stream: bright white on red.
    pub fn default_error() -> Self {
        ColorSpec::empty().fg(Color::White).bright_fg().bg(Color::Red)
    }
}

impl fmt::Display for ColorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let mut words: Vec<&str> = Vec::new();
        if self.is_bright_fg() {
            words.push("bright");
        }
        if let Some(fg) = self.foreground() {
            words.push(fg.name());
        }
        if let Some(bg) = self.background() {
            words.push("on");
            if self.is_bright_bg() {
                words.push("bright");
            }
            words.push(bg.name());
        } else if self.is_bright_bg() {
            words.push("on bright");
        }
        f.write_str(&words.join(" "))
    }
}

impl FromStr for ColorSpec {
    type Err = LogError;

    /// Parses `"none"`, `"red"`, `"bright white on red"`, `"on bright blue"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("none") {
            return Ok(ColorSpec::empty());
        }

        let lower = s.to_ascii_lowercase();
        let (fg_part, bg_part) = match lower.split_once("on") {
            Some((fg, bg)) if fg.is_empty() || fg.ends_with(' ') => (fg.trim(), Some(bg.trim())),
            _ => (lower.as_str(), None),
        };

        let mut spec = ColorSpec::empty();
        for word in fg_part.split_whitespace() {
            spec = match word {
                "bright" => spec.bright_fg(),
                name => spec.fg(name.parse()?),
            };
        }
        if let Some(bg_part) = bg_part {
            if bg_part.is_empty() {
                return Err(LogError::InvalidConfig(format!(
                    "missing background color in '{s}'"
                )));
            }
            for word in bg_part.split_whitespace() {
                spec = match word {
                    "bright" => spec.bright_bg(),
                    name => spec.bg(name.parse()?),
                };
            }
        }
        Ok(spec)
    }
}

/// Encodes a `ColorSpec` into the bytes a console interprets as an attribute change.
///
/// Callers never branch on the platform; they hold one encoder and ask it for
/// the set and reset sequences. An empty set sequence means "nothing was
/// applied, nothing to restore".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorEncoder {
    /// ANSI SGR escape sequences (`ESC [ ... m`).
    #[default]
    Ansi,
    /// Never decorates; every spec encodes to an empty sequence.
    Plain,
}

impl ColorEncoder {
    pub fn encode(&self, spec: ColorSpec) -> Vec<u8> {
        match self {
            ColorEncoder::Ansi => encode_ansi(spec),
            ColorEncoder::Plain => Vec::new(),
        }
    }

    /// The sequence that undoes a non-empty `encode` result.
    pub fn reset(&self) -> &'static [u8] {
        match self {
            ColorEncoder::Ansi => ANSI_RESET,
            ColorEncoder::Plain => b"",
        }
    }
}

fn encode_ansi(spec: ColorSpec) -> Vec<u8> {
    const PREFIX: &[u8] = b"\x1b[";

    fn push_code(seq: &mut Vec<u8>, code: &str) {
        if seq.len() != PREFIX.len() {
            seq.push(b';');
        }
        seq.extend_from_slice(code.as_bytes());
    }

    let mut seq = PREFIX.to_vec();

    if let Some(fg) = spec.foreground() {
        push_code(&mut seq, &(30 + fg.ansi_index()).to_string());
    }
    if let Some(bg) = spec.background() {
        push_code(&mut seq, &(40 + bg.ansi_index()).to_string());
    }
    if spec.is_bright_fg() || spec.is_bright_bg() {
        push_code(&mut seq, "1");
    }

    // A bare prefix carries no attribute; collapse it.
    if seq.len() == PREFIX.len() {
        return Vec::new();
    }
    seq.push(b'm');
    seq
}
