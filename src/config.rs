//! Configuration constants and settings for GNC handling.

use serde::{Deserialize, Serialize};

/// Floating-point comparison epsilon.
pub const EPS: f64 = 0.0001;

/// Default thumbnail width and height in pixels.
pub const DEFAULT_THUMBNAIL_SIZE: u32 = 200;

/// Blank border kept around thumbnail geometry, in pixels.
pub const THUMBNAIL_PADDING: f64 = 10.0;

/// Fraction of the padded area the geometry may fill.
pub const THUMBNAIL_MARGIN: f64 = 0.95;

/// Number of leading lines scanned when inferring N-code numbering.
pub const N_CODE_SCAN_LINES: usize = 200;

/// First N label when the source gave none.
pub const DEFAULT_N_CODE_START: u32 = 10;

/// N label increment when the source gave none.
pub const DEFAULT_N_CODE_STEP: u32 = 10;

/// Decimals written for offset coordinates.
pub const COORD_DECIMALS: usize = 3;

/// Well-known metadata keys.
pub mod keys {
    /// Sequence tag in the `_801` P-code triple.
    pub const P660: &str = "P660";
    /// Second `_801` P-code.
    pub const P150: &str = "P150";
    /// Third `_801` P-code.
    pub const P151: &str = "P151";
    /// Raw fifth field of the `(*SHEET` header.
    pub const SHEET_PARAM_5: &str = "sheet_param_5";
    /// Raw sixth field of the `(*SHEET` header.
    pub const SHEET_PARAM_6: &str = "sheet_param_6";
    /// Raw seventh field of the `(*SHEET` header.
    pub const SHEET_PARAM_7: &str = "sheet_param_7";
    /// First N label found in the source.
    pub const N_CODE_START: &str = "n_code_start";
    /// Distance between the first two N labels.
    pub const N_CODE_STEP: &str = "n_code_step";
    /// Machine model from `(*MODEL ...)`.
    pub const MODEL: &str = "model";
    /// Part name tag.
    pub const PART_NAME: &str = "PART NAME";

    /// Keys holding the `(*SHEET` trailing fields, in order.
    pub const SHEET_PARAMS: [&str; 3] = [SHEET_PARAM_5, SHEET_PARAM_6, SHEET_PARAM_7];
}

/// Source dialect of a GNC program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Dialect {
    /// Office-exported programs (the common case).
    #[default]
    Office,
    /// Programs pulled from the machine controller (`%` start or `_801` name).
    Machine,
}

impl Dialect {
    /// Detect the dialect from file content and name.
    pub fn detect(content: &str, filename: &str) -> Self {
        if content.starts_with('%') || filename.contains("_801") {
            Dialect::Machine
        } else {
            Dialect::Office
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::Office => write!(f, "office"),
            Dialect::Machine => write!(f, "machine"),
        }
    }
}

/// Line terminator used by a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    /// Detect the terminator used by `content`.
    pub fn detect(content: &str) -> Self {
        if content.contains("\r\n") {
            LineEnding::CrLf
        } else {
            LineEnding::Lf
        }
    }

    /// The terminator text.
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// When the generator rewrites N labels, SSD tags and contour numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RenumberMode {
    /// Renumber only sheets of placed copies.
    #[default]
    Auto,
    /// Always renumber.
    Always,
    /// Never renumber; N labels are emitted as parsed.
    Never,
}

/// Generator settings.
#[derive(Debug, Clone, Default)]
pub struct GeneratorConfig {
    /// Sequence renumbering policy.
    pub renumber: RenumberMode,
}

impl GeneratorConfig {
    /// Create a generator configuration with the given renumbering policy.
    pub fn new(renumber: RenumberMode) -> Self {
        Self { renumber }
    }
}

/// Thumbnail rendering settings.
#[derive(Debug, Clone, Copy)]
pub struct ThumbnailConfig {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Border around the geometry, in pixels.
    pub padding: f64,
    /// Fill fraction of the padded area.
    pub margin: f64,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_THUMBNAIL_SIZE,
            height: DEFAULT_THUMBNAIL_SIZE,
            padding: THUMBNAIL_PADDING,
            margin: THUMBNAIL_MARGIN,
        }
    }
}

impl ThumbnailConfig {
    /// Create a square thumbnail configuration.
    pub fn square(size: u32) -> Self {
        Self {
            width: size,
            height: size,
            ..Default::default()
        }
    }
}

/// Utility functions for floating-point comparisons.
pub mod float_cmp {
    use super::EPS;

    /// Check if two floats are approximately equal.
    #[inline]
    pub fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    /// Check if a float is approximately zero.
    #[inline]
    pub fn approx_zero(a: f64) -> bool {
        a.abs() < EPS
    }

    /// Check if a is in range [min, max] with epsilon tolerance.
    #[inline]
    pub fn in_range(a: f64, min: f64, max: f64) -> bool {
        a >= min - EPS && a <= max + EPS
    }
}

/// Utility functions for angle operations.
pub mod angle {
    use std::f64::consts::TAU;

    /// Normalize an angle in radians to `[0, 2π)`.
    #[inline]
    pub fn normalize_radians(angle: f64) -> f64 {
        let a = angle.rem_euclid(TAU);
        if a >= TAU {
            0.0
        } else {
            a
        }
    }
}
