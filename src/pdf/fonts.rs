//! Base-14 fonts and the metrics needed to measure and wrap text.
//!
//! Only standard Type1 fonts are used, so nothing is embedded and every
//! viewer renders them. Page text is written in `WinAnsiEncoding`; characters
//! it cannot represent are drawn as `?`. Widths are the AFM advance widths
//! (1/1000 em) for printable ASCII. Accented Latin-1 letters measure as their
//! base letter and other non-ASCII symbols as `o`.

use std::fmt;
use std::str::FromStr;

use lopdf::{Object, StringFormat};
use serde::Deserialize;

const FIRST_CHAR: u32 = 32;
const LAST_CHAR: u32 = 126;

#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

const COURIER_WIDTH: u16 = 600;

/// ASCII stand-ins used for the widths of WinAnsi codes 0xC0..=0xFF
const LATIN1_LETTER_METRICS: &[u8; 64] =
    b"AAAAAAWCEEEEIIIIDNOOOOO+OUUUUYPbaaaaaamceeeeiiiionooooo+ouuuuypy";

/// WinAnsiEncoding codes 0x80..=0x9F, which differ from Latin-1
const WIN_ANSI_EXTRAS: [(char, u8); 27] = [
    ('\u{20ac}', 0x80),
    ('\u{201a}', 0x82),
    ('\u{0192}', 0x83),
    ('\u{201e}', 0x84),
    ('\u{2026}', 0x85),
    ('\u{2020}', 0x86),
    ('\u{2021}', 0x87),
    ('\u{02c6}', 0x88),
    ('\u{2030}', 0x89),
    ('\u{0160}', 0x8a),
    ('\u{2039}', 0x8b),
    ('\u{0152}', 0x8c),
    ('\u{017d}', 0x8e),
    ('\u{2018}', 0x91),
    ('\u{2019}', 0x92),
    ('\u{201c}', 0x93),
    ('\u{201d}', 0x94),
    ('\u{2022}', 0x95),
    ('\u{2013}', 0x96),
    ('\u{2014}', 0x97),
    ('\u{02dc}', 0x98),
    ('\u{2122}', 0x99),
    ('\u{0161}', 0x9a),
    ('\u{203a}', 0x9b),
    ('\u{0153}', 0x9c),
    ('\u{017e}', 0x9e),
    ('\u{0178}', 0x9f),
];

/// Standard PDF fonts available to templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum StandardFont {
    #[default]
    Helvetica,
    HelveticaBold,
    Courier,
    /// Check marks for checkbox appearances
    ZapfDingbats,
}

impl StandardFont {
    /// PostScript name written as `BaseFont`
    pub fn base_font(&self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
            Self::Courier => "Courier",
            Self::ZapfDingbats => "ZapfDingbats",
        }
    }

    /// Key under `/Resources /Font` and in AcroForm default appearances
    pub fn resource_name(&self) -> &'static str {
        match self {
            Self::Helvetica => "Helv",
            Self::HelveticaBold => "HeBo",
            Self::Courier => "Cour",
            Self::ZapfDingbats => "ZaDb",
        }
    }

    /// Advance width of one character in 1/1000 em
    fn char_width(&self, ch: char) -> u16 {
        let index = (metric_char(ch) as u32 - FIRST_CHAR) as usize;
        match self {
            Self::Helvetica => HELVETICA_WIDTHS[index],
            Self::HelveticaBold => HELVETICA_BOLD_WIDTHS[index],
            Self::Courier => COURIER_WIDTH,
            // Dingbats are only used for single glyphs inside fixed boxes
            Self::ZapfDingbats => 788,
        }
    }

    /// Width of `text` in points at `size`
    pub fn string_width(&self, text: &str, size: f32) -> f32 {
        let units: u32 = text.chars().map(|c| u32::from(self.char_width(c))).sum();
        units as f32 * size / 1000.0
    }

    /// Greedy word wrap of `text` into lines no wider than `max_width`.
    ///
    /// A single word wider than `max_width` is kept whole on its own line.
    pub fn wrap_text(&self, text: &str, size: f32, max_width: f32) -> Vec<String> {
        let mut lines = Vec::new();
        let mut current = String::new();

        for word in text.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
                continue;
            }
            let candidate = format!("{current} {word}");
            if self.string_width(&candidate, size) <= max_width {
                current = candidate;
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }
}

/// WinAnsiEncoding byte for `ch`, if the encoding has one
fn win_ansi_byte(ch: char) -> Option<u8> {
    match ch as u32 {
        code @ (FIRST_CHAR..=LAST_CHAR | 0xa0..=0xff) => u8::try_from(code).ok(),
        _ => WIN_ANSI_EXTRAS
            .iter()
            .find(|(extra, _)| *extra == ch)
            .map(|(_, byte)| *byte),
    }
}

/// Printable ASCII character whose width stands in for `ch`
fn metric_char(ch: char) -> char {
    match win_ansi_byte(ch) {
        Some(byte @ 0x20..=0x7e) => char::from(byte),
        Some(0xa0) => ' ',
        Some(byte @ 0xc0..=0xff) => char::from(LATIN1_LETTER_METRICS[usize::from(byte - 0xc0)]),
        Some(_) => 'o',
        None => '?',
    }
}

/// Encode page text for the simple fonts, `?` for anything unmappable
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| win_ansi_byte(c).unwrap_or(b'?'))
        .collect()
}

/// PDF text string for document metadata and field tooltips.
///
/// Printable ASCII is written as a literal; anything else as UTF-16BE with
/// a byte order mark.
pub fn text_string(text: &str) -> Object {
    if text.chars().all(|c| (FIRST_CHAR..=LAST_CHAR).contains(&(c as u32))) {
        return Object::string_literal(text);
    }
    let mut bytes = vec![0xfe, 0xff];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

impl FromStr for StandardFont {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "helvetica" => Ok(Self::Helvetica),
            "helvetica-bold" => Ok(Self::HelveticaBold),
            "courier" => Ok(Self::Courier),
            _ => Err(format!(
                "Unsupported font: {s} (expected Helvetica, Helvetica-Bold or Courier)"
            )),
        }
    }
}

impl TryFrom<String> for StandardFont {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for StandardFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base_font())
    }
}
