//! GNC program generator module.

mod gnc;
mod renumber;
mod rewrite;
mod writer;

pub use gnc::{generate_gnc, save_gnc_file, write_program, GncGenerator, SaveReport};
pub use renumber::Renumberer;
pub use rewrite::{format_coord, format_sheet_value, offset_coordinates, rewrite_pcodes, rewrite_sheet_header};
pub use writer::ProgramWriter;
