//! GNC program generation.
//!
//! Output is rebuilt from each command's original text. Only targeted
//! substitutions are applied, so an unmodified sheet regenerates its source
//! exactly.

use super::rewrite::{offset_coordinates, rewrite_pcodes, rewrite_sheet_header};
use super::writer::ProgramWriter;
use crate::config::{GeneratorConfig, RenumberMode, DEFAULT_N_CODE_START, DEFAULT_N_CODE_STEP};
use crate::error::{GncError, Result};
use crate::model::{Command, MetadataMap, Sheet};
use crate::parser::Patterns;
use serde::Serialize;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Context a line is emitted in.
struct LineContext<'a> {
    /// P-code values owning this line (contour or sheet).
    metadata: &'a MetadataMap,
    /// Placement offset of the owning part, if non-zero.
    offset: Option<(f64, f64)>,
}

/// Generator for GNC program text.
#[derive(Debug, Clone, Default)]
pub struct GncGenerator {
    patterns: Patterns,
    config: GeneratorConfig,
}

impl GncGenerator {
    /// Create a generator with the given settings.
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            patterns: Patterns::new(),
            config,
        }
    }

    /// Whether this sheet gets fresh N labels, SSD tags and contour numbers.
    pub fn should_renumber(&self, sheet: &Sheet) -> bool {
        match self.config.renumber {
            RenumberMode::Always => true,
            RenumberMode::Never => false,
            RenumberMode::Auto => sheet.nested,
        }
    }

    /// Generate program text for a sheet.
    pub fn generate(&self, sheet: &Sheet) -> String {
        let mut writer = ProgramWriter::new(&self.patterns, sheet.line_ending);
        if self.should_renumber(sheet) {
            let start = sheet.n_code_start().unwrap_or(DEFAULT_N_CODE_START);
            let step = sheet
                .n_code_step()
                .filter(|s| *s > 0)
                .unwrap_or(DEFAULT_N_CODE_STEP);
            debug!("Renumbering {} from N{} step {}", sheet.name, start, step);
            writer = writer.with_renumbering(start, step);
        }

        let header = LineContext {
            metadata: &sheet.metadata,
            offset: None,
        };
        for command in &sheet.header_commands {
            self.emit(&mut writer, command, sheet, &header);
        }

        for part in &sheet.parts {
            let offset = part.is_offset().then_some((part.x, part.y));
            for contour in &part.contours {
                let ctx = LineContext {
                    metadata: &contour.metadata,
                    offset,
                };
                for command in &contour.commands {
                    self.emit(&mut writer, command, sheet, &ctx);
                }
            }
        }

        writer.write_blank(sheet.trailing_blank_lines);
        if sheet.trailing_newline {
            writer.write_terminator();
        }
        writer.take_output()
    }

    fn emit(&self, writer: &mut ProgramWriter, command: &Command, sheet: &Sheet, ctx: &LineContext) {
        writer.write_blank(command.blank_lines_before);
        let line = self.rewrite_line(command, sheet, ctx);
        writer.write_line(&line);
    }

    /// Apply the sheet header, P-code and offset substitutions to one line.
    fn rewrite_line<'c>(&self, command: &'c Command, sheet: &Sheet, ctx: &LineContext) -> Cow<'c, str> {
        let mut text = Cow::Borrowed(command.original_text.as_str());

        if text.contains("(*SHEET") {
            if let Some(updated) = rewrite_sheet_header(&self.patterns, &text, sheet) {
                text = Cow::Owned(updated);
            }
        }

        if text.trim_start().starts_with("*N") {
            if let Some(updated) = rewrite_pcodes(&self.patterns, &text, ctx.metadata) {
                text = Cow::Owned(updated);
            }
        }

        if let Some((dx, dy)) = ctx.offset {
            if !command.is_metadata() {
                if let Some(updated) = offset_coordinates(&self.patterns, &text, dx, dy) {
                    text = Cow::Owned(updated);
                }
            }
        }

        text
    }
}

/// Generate program text with default settings.
pub fn generate_gnc(sheet: &Sheet) -> String {
    GncGenerator::default().generate(sheet)
}

/// Outcome of writing a program to disk.
#[derive(Debug, Clone, Serialize)]
pub struct SaveReport {
    /// Written file.
    pub path: PathBuf,
    /// Bytes written.
    pub size: usize,
}

/// Generate a sheet and write it to `path`.
///
/// Refuses to replace an existing file unless `overwrite` is set.
pub fn save_gnc_file(
    sheet: &Sheet,
    path: &Path,
    overwrite: bool,
    config: &GeneratorConfig,
) -> Result<SaveReport> {
    let content = GncGenerator::new(config.clone()).generate(sheet);
    write_program(path, &content, overwrite)
}

/// Write already generated program text to `path`.
pub fn write_program(path: &Path, content: &str, overwrite: bool) -> Result<SaveReport> {
    if path.exists() && !overwrite {
        return Err(GncError::FileExists {
            path: path.to_path_buf(),
        });
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(path, content)?;
    info!("Wrote {} ({} bytes)", path.display(), content.len());

    Ok(SaveReport {
        path: path.to_path_buf(),
        size: content.len(),
    })
}
