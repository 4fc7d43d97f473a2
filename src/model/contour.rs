//! Contour - one cutting path inside a part.

use super::{Command, MetadataMap};
use serde::{Deserialize, Serialize};

/// A cutting path, usually introduced by a `(=== CONTOUR n ===)` separator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Contour {
    /// Label from the separator, or 0/1 for synthesized contours.
    pub id: u32,
    /// Lines belonging to this contour, in source order.
    pub commands: Vec<Command>,
    /// P-code values found on `*N` lines inside this contour.
    pub metadata: MetadataMap,
    /// Whether the contour was opened by a separator line.
    #[serde(default)]
    pub from_separator: bool,
}

impl Contour {
    /// Create an empty contour.
    pub fn new(id: u32, from_separator: bool) -> Self {
        Self {
            id,
            from_separator,
            ..Default::default()
        }
    }

    /// Number of motion lines (explicit or modal).
    pub fn corner_count(&self) -> usize {
        self.commands.iter().filter(|c| c.is_motion()).count()
    }
}
