//! Nesting placement of part copies on a sheet.

use crate::error::{GncError, Result};
use crate::model::{Part, Sheet};
use crate::parser::parse_number;
use tracing::debug;

/// Shift a part's placement by `(dx, dy)`.
pub fn translate_part(part: &mut Part, dx: f64, dy: f64) {
    part.x += dx;
    part.y += dy;
}

/// Build a sheet holding one copy of `source.parts[part_index]` per position.
///
/// Sheet fields, metadata and header lines are carried over from `source`.
/// Copies are renumbered 1..n and lose any placeholder flag. The result is
/// marked nested, so generation renumbers its sequence labels.
pub fn place_copies(source: &Sheet, part_index: usize, positions: &[(f64, f64)]) -> Result<Sheet> {
    let template = source
        .parts
        .get(part_index)
        .ok_or(GncError::PartNotFound {
            index: part_index,
            available: source.parts.len(),
        })?;

    let mut sheet = Sheet {
        parts: Vec::with_capacity(positions.len()),
        nested: true,
        ..source.clone()
    };

    for &(x, y) in positions {
        let mut copy = template.clone();
        copy.placeholder = false;
        copy.x = x;
        copy.y = y;
        sheet.parts.push(copy);
    }
    sheet.renumber_parts();

    debug!(
        "Placed {} cop{} of '{}' on {}",
        positions.len(),
        if positions.len() == 1 { "y" } else { "ies" },
        template.display_name(),
        sheet.name
    );
    Ok(sheet)
}

/// Parse an `X,Y` placement argument.
pub fn parse_position(value: &str) -> Result<(f64, f64)> {
    let invalid = || GncError::InvalidPlacement {
        value: value.to_string(),
    };
    let (x, y) = value.split_once(',').ok_or_else(invalid)?;
    let x = parse_number(x).ok_or_else(invalid)?;
    let y = parse_number(y).ok_or_else(invalid)?;
    Ok((x, y))
}
