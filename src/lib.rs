//! gnc-convert-rs - Parse, nest, regenerate and preview GNC cutting programs.
//!
//! GNC programs drive sheet-metal cutting machines. This library parses
//! program text into a Sheet/Part/Contour/Command tree, regenerates the text
//! after placement or metadata edits, and renders part toolpaths as SVG
//! thumbnails.
//!
//! # Example
//!
//! ```no_run
//! use gnc_convert_rs::{generate, parse, render_thumbnail};
//!
//! let content = std::fs::read_to_string("sheet.gnc").unwrap();
//! let mut sheet = parse(&content, "sheet.gnc");
//! sheet.parts[0].x = 100.0;
//! let program = generate(&sheet);
//! let thumbnail = render_thumbnail(&sheet.parts[0], 200, 200);
//! println!("{}\n{:?}", program, thumbnail.path);
//! ```

pub mod config;
pub mod error;
pub mod generator;
pub mod model;
pub mod parser;
pub mod render;
pub mod transform;
pub mod validation;

use std::path::Path;

// Re-exports for convenience
pub use config::{Dialect, GeneratorConfig, LineEnding, RenumberMode, ThumbnailConfig};
pub use error::{GncError, Result};
pub use generator::{save_gnc_file, GncGenerator, SaveReport};
pub use model::{Command, CommandKind, Contour, MetadataMap, MotionCode, Part, Sheet};
pub use parser::{parse_gnc_file, GncParser};
pub use render::{calculate_bounds, write_thumbnail, Bounds, Thumbnail};
pub use transform::{place_copies, translate_part};
pub use validation::{validate_output, validate_sheet, ValidationResult};

/// Parse GNC program text. Never fails.
pub fn parse(content: &str, filename: &str) -> Sheet {
    GncParser::new().parse(content, filename)
}

/// Regenerate program text with default settings.
pub fn generate(sheet: &Sheet) -> String {
    generator::generate_gnc(sheet)
}

/// Render a part's toolpath as SVG path data.
pub fn render_thumbnail(part: &Part, width: u32, height: u32) -> Thumbnail {
    render::render_thumbnail(part, width, height)
}

/// Nest copies of one part from a GNC file and generate the new program.
///
/// This is the main high-level function that performs the full pipeline:
/// 1. Parse the input file
/// 2. Place one copy of the part per position
/// 3. Validate the sheet (warnings are logged)
/// 4. Generate the program text
///
/// # Arguments
///
/// * `input_path` - Path to the source GNC file
/// * `part_index` - Zero-based index of the part to copy
/// * `positions` - Placement offsets, one per copy
/// * `config` - Generator settings
///
/// # Returns
///
/// The generated program text.
pub fn nest_gnc_file(
    input_path: &Path,
    part_index: usize,
    positions: &[(f64, f64)],
    config: &GeneratorConfig,
) -> Result<String> {
    let source = parse_gnc_file(input_path)?;
    let sheet = place_copies(&source, part_index, positions)?;

    let validation = validate_sheet(&sheet);
    for warning in &validation.warnings {
        tracing::warn!("{}", warning);
    }
    for err in &validation.errors {
        tracing::error!("{}", err);
    }

    Ok(GncGenerator::new(config.clone()).generate(&sheet))
}
