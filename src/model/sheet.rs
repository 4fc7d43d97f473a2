//! Sheet - a complete cutting program for one metal sheet.

use super::{Command, MetadataMap, Part};
use crate::config::{keys, Dialect, LineEnding};
use serde::{Deserialize, Serialize};

/// Summary counts for a sheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetStats {
    pub total_parts: usize,
    pub total_contours: usize,
    pub total_corners: usize,
}

/// Parsed GNC program.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sheet {
    // === Source ===
    /// File name the program was parsed from.
    pub name: String,
    /// Source dialect.
    pub dialect: Dialect,

    // === Sheet header ===
    /// Material from `(Material: ...)`.
    pub material: Option<String>,
    /// Material thickness.
    pub thickness: Option<f64>,
    /// Program width from `(*SHEET`.
    pub program_width: Option<f64>,
    /// Program height from `(*SHEET`.
    pub program_height: Option<f64>,
    /// Number of sheets to cut.
    pub cut_count: Option<u32>,
    /// Sheet-level metadata (header P-codes, raw header fields, N-code numbering).
    pub metadata: MetadataMap,

    // === Content ===
    /// Lines preceding the first part.
    pub header_commands: Vec<Command>,
    /// Parts in source order.
    pub parts: Vec<Part>,
    /// Parts are placed copies of one source part.
    #[serde(default)]
    pub nested: bool,

    // === Layout ===
    /// Line terminator of the source.
    #[serde(default)]
    pub line_ending: LineEnding,
    /// Whether the source ended with a line terminator.
    #[serde(default)]
    pub trailing_newline: bool,
    /// Blank lines after the last command.
    #[serde(default)]
    pub trailing_blank_lines: usize,
}

impl Sheet {
    /// Create an empty sheet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn total_parts(&self) -> usize {
        self.parts.len()
    }

    pub fn total_contours(&self) -> usize {
        self.parts.iter().map(|p| p.contour_count()).sum()
    }

    /// Compute summary counts.
    pub fn stats(&self) -> SheetStats {
        SheetStats {
            total_parts: self.total_parts(),
            total_contours: self.total_contours(),
            total_corners: self.parts.iter().map(|p| p.corner_count()).sum(),
        }
    }

    /// First N label of the source program.
    pub fn n_code_start(&self) -> Option<u32> {
        self.metadata.get(keys::N_CODE_START)?.parse().ok()
    }

    /// Increment between N labels of the source program.
    pub fn n_code_step(&self) -> Option<u32> {
        self.metadata.get(keys::N_CODE_STEP)?.parse().ok()
    }

    /// Reassign part ids 1..n in list order.
    pub fn renumber_parts(&mut self) {
        for (idx, part) in self.parts.iter_mut().enumerate() {
            part.id = idx as u32 + 1;
        }
    }
}
