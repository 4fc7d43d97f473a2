//! Bounding box of a part's toolpath.

use crate::model::Part;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in program units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// A box holding a single point.
    pub fn from_point(x: f64, y: f64) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    /// Grow the box to include a point.
    pub fn include(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Compute the toolpath bounds of a part.
///
/// Each contour starts from (0, 0); X and Y are modal and persist until a
/// line supplies a new value. Only lines carrying X or Y are counted.
/// Returns `None` when no coordinate was ever set.
pub fn calculate_bounds(part: &Part) -> Option<Bounds> {
    let mut bounds: Option<Bounds> = None;

    for contour in &part.contours {
        let (mut x, mut y) = (0.0, 0.0);
        for cmd in &contour.commands {
            if cmd.x.is_none() && cmd.y.is_none() {
                continue;
            }
            x = cmd.x.unwrap_or(x);
            y = cmd.y.unwrap_or(y);
            match bounds.as_mut() {
                Some(b) => b.include(x, y),
                None => bounds = Some(Bounds::from_point(x, y)),
            }
        }
    }

    bounds
}
