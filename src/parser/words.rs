//! Word-level scanning of a single program line.
//!
//! Comment `( ... )` and bracket `[ ... ]` regions are masked with spaces
//! before scanning, so byte offsets in the masked text match the source line.

use super::Patterns;
use crate::model::{AuxLetter, CodeWord};
use std::ops::Range;

/// Coordinate axis letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    I,
    J,
}

impl Axis {
    fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'X' => Some(Axis::X),
            'Y' => Some(Axis::Y),
            'I' => Some(Axis::I),
            'J' => Some(Axis::J),
            _ => None,
        }
    }
}

/// A coordinate word and the byte range of its numeric literal.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateWord {
    pub axis: Axis,
    pub value: Option<f64>,
    pub span: Range<usize>,
}

/// Parse a numeric field, rejecting empty and non-finite input.
pub fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Replace comment and bracket regions with spaces, keeping byte length.
pub fn mask_comments(line: &str) -> String {
    let mut depth_paren = 0usize;
    let mut depth_bracket = 0usize;
    let bytes: Vec<u8> = line
        .bytes()
        .map(|b| {
            match b {
                b'(' => depth_paren += 1,
                b'[' => depth_bracket += 1,
                _ => {}
            }
            let masked = depth_paren > 0 || depth_bracket > 0;
            match b {
                b')' => depth_paren = depth_paren.saturating_sub(1),
                b']' => depth_bracket = depth_bracket.saturating_sub(1),
                _ => {}
            }
            if masked {
                b' '
            } else {
                b
            }
        })
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Whether the byte before `start` is a letter or underscore.
fn glued_to_word(text: &str, start: usize) -> bool {
    text[..start]
        .chars()
        .next_back()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
}

/// Find G/M/T words in masked text.
pub fn scan_codes(patterns: &Patterns, masked: &str) -> Vec<CodeWord> {
    patterns
        .code_word
        .captures_iter(masked)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            if glued_to_word(masked, whole.start()) {
                return None;
            }
            let letter = AuxLetter::from_char(whole.as_str().chars().next()?)?;
            let value = parse_number(caps.get(1)?.as_str())?;
            Some(CodeWord::new(letter, value))
        })
        .collect()
}

/// Find X/Y/I/J words in masked text.
pub fn scan_coordinates(patterns: &Patterns, masked: &str) -> Vec<CoordinateWord> {
    patterns
        .coordinate
        .captures_iter(masked)
        .filter_map(|caps| {
            let letter = caps.get(1)?;
            if glued_to_word(masked, letter.start()) {
                return None;
            }
            let axis = Axis::from_char(letter.as_str().chars().next()?)?;
            let number = caps.get(2)?;
            Some(CoordinateWord {
                axis,
                value: parse_number(number.as_str()),
                span: number.range(),
            })
        })
        .collect()
}
