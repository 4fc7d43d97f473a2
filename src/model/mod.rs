//! Data model for GNC cutting programs.

mod command;
mod contour;
mod metadata;
mod part;
mod sheet;

pub use command::{AuxLetter, CodeWord, Command, CommandKind, MotionCode};
pub use contour::Contour;
pub use metadata::MetadataMap;
pub use part::Part;
pub use sheet::{Sheet, SheetStats};
