//! Thumbnail rendering of part toolpaths.

mod bounds;
mod path;
mod svg;

pub use bounds::{calculate_bounds, Bounds};
pub use path::{render_thumbnail, render_thumbnail_with, Thumbnail};
pub use svg::{placeholder_svg, thumbnail_svg, write_thumbnail};
