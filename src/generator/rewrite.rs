//! Targeted substitutions applied to individual program lines.
//!
//! Each rewrite returns `None` when the line needs no change, so untouched
//! lines are emitted byte-for-byte.

use crate::config::{float_cmp, keys, COORD_DECIMALS};
use crate::model::{MetadataMap, Sheet};
use crate::parser::{mask_comments, parse_number, scan_coordinates, Axis, Patterns};
use std::ops::Range;

/// Replace byte ranges of `line`. Ranges must not overlap.
pub fn splice(line: &str, mut edits: Vec<(Range<usize>, String)>) -> String {
    edits.sort_by_key(|(range, _)| range.start);
    let mut out = String::with_capacity(line.len() + 16);
    let mut cursor = 0;
    for (range, text) in edits {
        out.push_str(&line[cursor..range.start]);
        out.push_str(&text);
        cursor = range.end;
    }
    out.push_str(&line[cursor..]);
    out
}

/// Format an offset coordinate with fixed decimals.
pub fn format_coord(value: f64) -> String {
    let text = format!("{:.*}", COORD_DECIMALS, value);
    if text.starts_with('-') && text[1..].chars().all(|c| c == '0' || c == '.') {
        text[1..].to_string()
    } else {
        text
    }
}

/// Format a changed `(*SHEET` field: whole numbers keep one decimal.
pub fn format_sheet_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// Rebuild the `(*SHEET` fields from the sheet's current values.
///
/// Fields whose value did not change keep their source spelling. Unset
/// values never force a rewrite.
pub fn rewrite_sheet_header(patterns: &Patterns, line: &str, sheet: &Sheet) -> Option<String> {
    let (Some(width), Some(height)) = (sheet.program_width, sheet.program_height) else {
        return None;
    };
    let caps = patterns.sheet_header.captures(line)?;
    let body = caps.name("body")?;
    let tokens: Vec<&str> = body.as_str().split_whitespace().collect();
    let mut changed = false;

    let mut numeric = |idx: usize, value: f64| match tokens.get(idx) {
        Some(token) if parse_number(token).is_some_and(|v| float_cmp::approx_eq(v, value)) => {
            token.to_string()
        }
        _ => {
            changed = true;
            format_sheet_value(value)
        }
    };
    let mut fields = vec![numeric(0, width), numeric(1, height)];
    let thickness = sheet.thickness.map(|t| numeric(2, t));

    let existing = |idx: usize, default: &str| {
        tokens
            .get(idx)
            .map(|t| t.to_string())
            .unwrap_or_else(|| default.to_string())
    };
    fields.push(thickness.unwrap_or_else(|| existing(2, "0")));
    fields.push(match sheet.cut_count {
        Some(count) => match tokens.get(3) {
            Some(token) if parse_number(token) == Some(f64::from(count)) => token.to_string(),
            _ => {
                changed = true;
                count.to_string()
            }
        },
        None => existing(3, "1"),
    });

    for (offset, key) in keys::SHEET_PARAMS.iter().enumerate() {
        let token = tokens.get(4 + offset).copied();
        let value = match sheet.metadata.get(key) {
            Some(value) if !value.is_empty() => {
                changed |= token != Some(value);
                Some(value)
            }
            _ => token,
        };
        if let Some(value) = value {
            fields.push(value.to_string());
        }
    }

    if !changed {
        return None;
    }

    let raw = body.as_str();
    let rest = raw.trim_start();
    let lead = &raw[..raw.len() - rest.len()];
    let trail = &rest[rest.trim_end().len()..];
    let new_body = format!("{}{}{}", lead, fields.join(" "), trail);
    Some(splice(line, vec![(body.range(), new_body)]))
}

/// Write current P-code values from `metadata` back into a `*N` line.
pub fn rewrite_pcodes(patterns: &Patterns, line: &str, metadata: &MetadataMap) -> Option<String> {
    let mut edits = Vec::new();

    if let Some(caps) = patterns.pcode_triple.captures(line) {
        for (group, key) in [(1, keys::P660), (2, keys::P150), (3, keys::P151)] {
            if let (Some(m), Some(value)) = (caps.get(group), metadata.get(key)) {
                if m.as_str() != value {
                    edits.push((m.range(), value.to_string()));
                }
            }
        }
    } else {
        for caps in patterns.pcode_pair.captures_iter(line) {
            let key = format!("P{}", &caps[1]);
            if let (Some(m), Some(value)) = (caps.get(2), metadata.get(&key)) {
                if m.as_str() != value {
                    edits.push((m.range(), value.to_string()));
                }
            }
        }
    }

    if edits.is_empty() {
        None
    } else {
        Some(splice(line, edits))
    }
}

/// Add a placement offset to every X/Y literal outside comments.
///
/// I/J are relative to the arc start and stay as written.
pub fn offset_coordinates(patterns: &Patterns, line: &str, dx: f64, dy: f64) -> Option<String> {
    let masked = mask_comments(line);
    let edits: Vec<_> = scan_coordinates(patterns, &masked)
        .into_iter()
        .filter_map(|word| {
            let value = word.value?;
            let shifted = match word.axis {
                Axis::X => value + dx,
                Axis::Y => value + dy,
                Axis::I | Axis::J => return None,
            };
            Some((word.span, format_coord(shifted)))
        })
        .collect();

    if edits.is_empty() {
        None
    } else {
        Some(splice(line, edits))
    }
}
