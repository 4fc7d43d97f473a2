//! GNC program parser module.

mod gnc;
mod patterns;
mod scan;
mod words;

pub use gnc::{collapse_placeholder, parse_gnc_file, GncParser};
pub use patterns::Patterns;
pub use scan::{default_contour_id, transition, Effect, LineEvent, ScanState};
pub use words::{mask_comments, parse_number, scan_codes, scan_coordinates, Axis, CoordinateWord};
