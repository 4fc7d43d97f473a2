//! Validation of parsed sheets and generated output.

use crate::config::{float_cmp, EPS};
use crate::model::Sheet;
use crate::parser::Patterns;

/// Validation result with warnings.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Whether validation passed.
    pub passed: bool,
    /// Warning messages.
    pub warnings: Vec<String>,
    /// Error messages.
    pub errors: Vec<String>,
}

impl ValidationResult {
    /// Create a passing result.
    pub fn ok() -> Self {
        Self {
            passed: true,
            ..Default::default()
        }
    }

    /// Add a warning.
    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Add an error.
    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
        self.passed = false;
    }

    /// Merge another result into this one.
    pub fn merge(&mut self, other: ValidationResult) {
        self.warnings.extend(other.warnings);
        self.errors.extend(other.errors);
        if !other.passed {
            self.passed = false;
        }
    }
}

/// Validate a parsed (and possibly edited) sheet.
pub fn validate_sheet(sheet: &Sheet) -> ValidationResult {
    let mut result = ValidationResult::ok();

    if sheet.parts.is_empty() {
        result.add_error(format!("{}: No parts found", sheet.name));
        return result;
    }

    if sheet.program_width.is_none() || sheet.program_height.is_none() {
        result.add_warning(format!("{}: Missing (*SHEET dimensions", sheet.name));
    }

    for part in &sheet.parts {
        let label = format!("Part {} ('{}')", part.id, part.display_name());

        if part.placeholder {
            result.add_warning(format!("{}: No PART NAME tag", label));
        }

        if part.corner_count() == 0 {
            result.add_warning(format!("{}: No motion commands", label));
        }

        for contour in &part.contours {
            for cmd in contour.commands.iter().filter(|c| c.is_arc()) {
                let radius = cmd.i.unwrap_or(0.0).hypot(cmd.j.unwrap_or(0.0));
                if float_cmp::approx_zero(radius) {
                    result.add_warning(format!(
                        "{}, Contour {}, line {}: Arc with zero radius",
                        label, contour.id, cmd.line_number
                    ));
                }
            }
        }

        if let (Some(width), Some(height)) = (sheet.program_width, sheet.program_height) {
            if !float_cmp::in_range(part.x, 0.0, width) || !float_cmp::in_range(part.y, 0.0, height) {
                result.add_warning(format!(
                    "{}: Placement ({}, {}) is outside the sheet ({} x {})",
                    label, part.x, part.y, width, height
                ));
            }
        }
    }

    result.merge(validate_coordinates(sheet));
    result
}

/// Check sequence consistency of generated program text.
///
/// Every line with both an N label and an `SSD[SD.Cr_Nb1=..]` tag must
/// carry the same number in each. Labels should strictly increase.
pub fn validate_output(content: &str) -> ValidationResult {
    let patterns = Patterns::new();
    let mut result = ValidationResult::ok();
    let mut previous: Option<u64> = None;

    for (idx, line) in content.lines().enumerate() {
        let Some(label) = patterns
            .n_label
            .captures(line)
            .and_then(|c| c[1].parse::<u64>().ok())
        else {
            continue;
        };

        if let Some(ssd) = patterns
            .ssd
            .captures(line)
            .and_then(|c| c[1].parse::<u64>().ok())
        {
            if ssd != label {
                result.add_error(format!(
                    "Line {}: N{} does not match SSD value {}",
                    idx + 1,
                    label,
                    ssd
                ));
            }
        }

        if let Some(prev) = previous.filter(|prev| label <= *prev) {
            result.add_warning(format!(
                "Line {}: N{} does not follow N{}",
                idx + 1,
                label,
                prev
            ));
        }
        previous = Some(label);
    }

    result
}

/// Largest coordinate magnitude treated as sane, in program units.
const MAX_COORD: f64 = 1.0e6;

/// Flag coordinates that are clearly corrupt (beyond one kilometre).
pub fn validate_coordinates(sheet: &Sheet) -> ValidationResult {
    let mut result = ValidationResult::ok();
    for part in &sheet.parts {
        for contour in &part.contours {
            for cmd in &contour.commands {
                let extreme = [cmd.x, cmd.y, cmd.i, cmd.j]
                    .into_iter()
                    .flatten()
                    .any(|v| v.abs() > MAX_COORD + EPS);
                if extreme {
                    result.add_error(format!(
                        "Part {}, line {}: Coordinate out of range in '{}'",
                        part.id,
                        cmd.line_number,
                        cmd.original_text.trim()
                    ));
                }
            }
        }
    }
    result
}
