//! Part - one nested piece on the sheet.

use super::{Contour, MetadataMap};
use serde::{Deserialize, Serialize};

/// One piece, introduced by a `(PART NAME:...)` tag.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Part {
    /// Sequential id in discovery order, starting at 1.
    pub id: u32,
    /// Trimmed name from the tag.
    pub name: Option<String>,
    /// Placement offset along X, added to X literals on regeneration.
    pub x: f64,
    /// Placement offset along Y, added to Y literals on regeneration.
    pub y: f64,
    /// Tags from the part preamble.
    pub metadata: MetadataMap,
    /// Contours in source order.
    pub contours: Vec<Contour>,
    /// Synthesized for content found before any named part.
    #[serde(default)]
    pub placeholder: bool,
}

impl Part {
    /// Create a named part.
    pub fn new(id: u32, name: Option<String>) -> Self {
        Self {
            id,
            name,
            ..Default::default()
        }
    }

    /// Create the stand-in part for content preceding the first part tag.
    pub fn placeholder(id: u32, filename: &str) -> Self {
        Self {
            id,
            name: Some(format!("{} (Auto)", filename)),
            placeholder: true,
            ..Default::default()
        }
    }

    /// Display name, falling back to the id.
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("Part {}", self.id))
    }

    pub fn contour_count(&self) -> usize {
        self.contours.len()
    }

    /// Total motion lines across all contours.
    pub fn corner_count(&self) -> usize {
        self.contours.iter().map(|c| c.corner_count()).sum()
    }

    /// Whether the part has a non-zero placement offset.
    pub fn is_offset(&self) -> bool {
        self.x != 0.0 || self.y != 0.0
    }
}
