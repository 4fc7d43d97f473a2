//! GNC program parser.

use super::scan::{transition, Effect, LineEvent, ScanState};
use super::words::{mask_comments, parse_number, scan_codes, scan_coordinates, Axis};
use super::Patterns;
use crate::config::{keys, Dialect, LineEnding, DEFAULT_N_CODE_STEP, N_CODE_SCAN_LINES};
use crate::error::{GncError, Result};
use crate::model::{Command, CommandKind, Contour, Part, Sheet};
use std::path::Path;
use tracing::debug;

/// A classified line: its structural event, the command and any P-codes.
struct ClassifiedLine {
    event: LineEvent,
    command: Command,
    pcodes: Vec<(String, String)>,
}

/// Parser for GNC cutting programs.
#[derive(Debug, Clone, Default)]
pub struct GncParser {
    patterns: Patterns,
}

impl GncParser {
    /// Create a parser with freshly compiled patterns.
    pub fn new() -> Self {
        Self {
            patterns: Patterns::new(),
        }
    }

    /// Parse program text into a sheet tree.
    ///
    /// Never fails: unrecognized lines are kept as metadata so that
    /// regeneration reproduces them.
    pub fn parse(&self, content: &str, filename: &str) -> Sheet {
        let mut builder = SheetBuilder::new(filename);
        builder.sheet.dialect = Dialect::detect(content, filename);
        builder.sheet.line_ending = LineEnding::detect(content);
        builder.sheet.trailing_newline = content.ends_with('\n');

        let mut pending_blank = 0;
        for (idx, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                pending_blank += 1;
                continue;
            }

            self.capture_sheet_tags(line, &mut builder.sheet);

            let mut classified = self.classify(line, idx + 1);
            classified.command.blank_lines_before = pending_blank;
            pending_blank = 0;
            builder.feed(classified);
        }

        let mut sheet = builder.finish(pending_blank);
        self.infer_n_codes(content, &mut sheet);

        let stats = sheet.stats();
        debug!(
            "Parsed {}: {} part(s), {} contour(s), {} corner(s), dialect {}",
            sheet.name, stats.total_parts, stats.total_contours, stats.total_corners, sheet.dialect
        );
        sheet
    }

    /// Pick up sheet-level tags anywhere in the program.
    fn capture_sheet_tags(&self, line: &str, sheet: &mut Sheet) {
        if let Some(caps) = self.patterns.sheet_header.captures(line) {
            let fields: Vec<&str> = caps["body"].split_whitespace().collect();
            let field = |idx: usize| fields.get(idx).and_then(|f| parse_number(f));

            sheet.program_width = field(0).or(sheet.program_width);
            sheet.program_height = field(1).or(sheet.program_height);
            if let Some(thickness) = field(2) {
                sheet.thickness = Some(thickness);
            }
            if let Some(count) = field(3) {
                if count >= 0.0 && count.fract() == 0.0 {
                    sheet.cut_count = Some(count as u32);
                }
            }
            for (key, raw) in keys::SHEET_PARAMS.iter().zip(fields.iter().skip(4)) {
                sheet.metadata.insert(*key, *raw);
            }
        }

        if let Some(caps) = self.patterns.model.captures(line) {
            sheet.metadata.insert(keys::MODEL, &caps[1]);
        }

        if let Some(caps) = self.patterns.material.captures(line) {
            let material = caps[1].trim();
            if !material.is_empty() {
                sheet.material = Some(material.to_string());
            }
        }

        // The (*SHEET thickness wins over the THICKNESS= tag.
        if sheet.thickness.is_none() {
            if let Some(caps) = self.patterns.thickness.captures(line) {
                sheet.thickness = parse_number(&caps[1]);
            }
        }
    }

    /// Classify one non-blank line.
    fn classify(&self, line: &str, line_number: usize) -> ClassifiedLine {
        if let Some(caps) = self.patterns.part_name.captures(line) {
            let name = caps[1].trim();
            let name = (!name.is_empty()).then(|| name.to_string());
            return ClassifiedLine {
                event: LineEvent::PartStart { name },
                command: Command::metadata(line_number, line),
                pcodes: Vec::new(),
            };
        }

        if let Some(id) = self
            .patterns
            .contour
            .captures(line)
            .and_then(|caps| caps[1].parse::<u32>().ok())
        {
            return ClassifiedLine {
                event: LineEvent::ContourStart { id },
                command: Command::metadata(line_number, line),
                pcodes: Vec::new(),
            };
        }

        let trimmed = line.trim();
        let mut pcodes = Vec::new();
        if trimmed.starts_with("*N") {
            pcodes = self.extract_pcodes(trimmed);
            if !self.patterns.motion_hint.is_match(trimmed) {
                return ClassifiedLine {
                    event: LineEvent::Content {
                        metadata: true,
                        motion: false,
                        tag: None,
                    },
                    command: Command::metadata(line_number, line),
                    pcodes,
                };
            }
        }

        let command = self.build_command(line, line_number);
        let tag = if command.is_metadata() {
            self.patterns
                .tag
                .captures(line)
                .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        } else {
            None
        };

        ClassifiedLine {
            event: LineEvent::Content {
                metadata: command.is_metadata(),
                motion: command.is_motion(),
                tag,
            },
            command,
            pcodes,
        }
    }

    /// Extract P-code pairs, preferring the `_801` triple.
    fn extract_pcodes(&self, line: &str) -> Vec<(String, String)> {
        if let Some(caps) = self.patterns.pcode_triple.captures(line) {
            return vec![
                (keys::P660.to_string(), caps[1].to_string()),
                (keys::P150.to_string(), caps[2].to_string()),
                (keys::P151.to_string(), caps[3].to_string()),
            ];
        }
        self.patterns
            .pcode_pair
            .captures_iter(line)
            .map(|caps| (format!("P{}", &caps[1]), caps[2].to_string()))
            .collect()
    }

    /// Scan codes and coordinates into a command.
    fn build_command(&self, line: &str, line_number: usize) -> Command {
        let masked = mask_comments(line);
        let codes = scan_codes(&self.patterns, &masked);
        let coords = scan_coordinates(&self.patterns, &masked);

        let kind = if let Some(motion) = codes.iter().find_map(|c| c.motion()) {
            CommandKind::Motion(motion)
        } else if let Some(first) = codes.first() {
            CommandKind::Aux {
                letter: first.letter,
                value: first.value,
            }
        } else if !coords.is_empty() {
            CommandKind::Modal
        } else {
            CommandKind::Metadata
        };

        let mut command = Command::new(kind, line_number, line);
        command.codes = codes;
        for word in coords {
            let slot = match word.axis {
                Axis::X => &mut command.x,
                Axis::Y => &mut command.y,
                Axis::I => &mut command.i,
                Axis::J => &mut command.j,
            };
            if slot.is_none() {
                *slot = word.value;
            }
        }
        command
    }

    /// Record the first N label and the step to the second one.
    fn infer_n_codes(&self, content: &str, sheet: &mut Sheet) {
        let mut labels = content
            .lines()
            .take(N_CODE_SCAN_LINES)
            .filter_map(|line| self.patterns.n_label.captures(line))
            .filter_map(|caps| caps[1].parse::<u32>().ok());

        let Some(start) = labels.next() else {
            return;
        };
        let step = match labels.next() {
            Some(second) if second > start => second - start,
            _ => DEFAULT_N_CODE_STEP,
        };

        sheet.metadata.insert(keys::N_CODE_START, start.to_string());
        sheet.metadata.insert(keys::N_CODE_STEP, step.to_string());
    }
}

/// Applies scan effects to a growing sheet.
struct SheetBuilder<'a> {
    sheet: Sheet,
    filename: &'a str,
    state: ScanState,
}

impl<'a> SheetBuilder<'a> {
    fn new(filename: &'a str) -> Self {
        Self {
            sheet: Sheet::new(filename),
            filename,
            state: ScanState::NoPart,
        }
    }

    fn feed(&mut self, line: ClassifiedLine) {
        let (next, effects) = transition(self.state, line.event);
        self.state = next;

        let mut command = Some(line.command);
        for effect in effects {
            self.apply(effect, &mut command);
        }

        for (key, value) in line.pcodes {
            match self.current_contour() {
                Some(contour) => contour.metadata.insert(key, value),
                None => self.sheet.metadata.insert(key, value),
            }
        }
    }

    fn apply(&mut self, effect: Effect, command: &mut Option<Command>) {
        match effect {
            Effect::PushHeader => {
                if let Some(mut cmd) = command.take() {
                    cmd.kind = CommandKind::Header;
                    self.sheet.header_commands.push(cmd);
                }
            }
            Effect::OpenPlaceholder => {
                let id = self.next_part_id();
                self.sheet.parts.push(Part::placeholder(id, self.filename));
            }
            Effect::OpenPart { name } => {
                let mut part = Part::new(self.next_part_id(), name);
                if let Some(name) = &part.name {
                    part.metadata.insert(keys::PART_NAME, name.clone());
                }
                self.sheet.parts.push(part);
            }
            Effect::OpenContour { id, from_separator } => {
                if let Some(part) = self.sheet.parts.last_mut() {
                    part.contours.push(Contour::new(id, from_separator));
                }
            }
            Effect::Append => {
                if let (Some(contour), Some(cmd)) = (self.current_contour(), command.take()) {
                    contour.commands.push(cmd);
                }
            }
            Effect::TagPart { key, value } => {
                if let Some(part) = self.sheet.parts.last_mut() {
                    part.metadata.insert(key, value);
                }
            }
        }
    }

    fn next_part_id(&self) -> u32 {
        self.sheet.parts.len() as u32 + 1
    }

    fn current_contour(&mut self) -> Option<&mut Contour> {
        self.sheet.parts.last_mut()?.contours.last_mut()
    }

    fn finish(mut self, trailing_blank_lines: usize) -> Sheet {
        self.sheet.trailing_blank_lines = trailing_blank_lines;
        collapse_placeholder(&mut self.sheet);
        self.sheet.renumber_parts();
        self.sheet
    }
}

/// Fold a leading placeholder part into the first named part.
///
/// The placeholder's contours are prepended. When the placeholder ends and
/// the named part begins with unlabelled id-0 contours, the two are merged.
pub fn collapse_placeholder(sheet: &mut Sheet) {
    let collapsible = sheet.parts.len() >= 2
        && sheet.parts[0].placeholder
        && !sheet.parts[1].placeholder;
    if !collapsible {
        return;
    }

    let placeholder = sheet.parts.remove(0);
    let target = &mut sheet.parts[0];
    let boundary = placeholder.contours.len();

    let mut contours = placeholder.contours;
    contours.append(&mut target.contours);

    let is_default = |c: &Contour| c.id == 0 && !c.from_separator;
    if boundary > 0
        && boundary < contours.len()
        && is_default(&contours[boundary - 1])
        && is_default(&contours[boundary])
    {
        let tail = contours.remove(boundary);
        let head = &mut contours[boundary - 1];
        head.commands.extend(tail.commands);
        for (key, value) in tail.metadata.iter() {
            head.metadata.insert(key, value);
        }
    }

    debug!(
        "Merged placeholder part into '{}' ({} leading contour(s))",
        target.display_name(),
        boundary
    );
    target.contours = contours;
}

/// Parse a GNC file from disk.
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected.
pub fn parse_gnc_file(path: &Path) -> Result<Sheet> {
    use std::fs;

    if !path.exists() {
        return Err(GncError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let bytes = fs::read(path)?;
    let content = String::from_utf8_lossy(&bytes);

    if content.trim().is_empty() {
        return Err(GncError::EmptyFile {
            path: path.to_path_buf(),
        });
    }

    let filename = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("program.gnc");

    Ok(GncParser::new().parse(&content, filename))
}
