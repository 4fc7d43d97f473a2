//! Program text writer.

use super::renumber::Renumberer;
use crate::config::LineEnding;
use crate::parser::Patterns;

/// Accumulates output lines, optionally renumbering them on the way in.
pub struct ProgramWriter<'a> {
    patterns: &'a Patterns,
    /// Line terminator placed between lines.
    line_ending: LineEnding,
    /// Sequence counters when renumbering is active.
    renumberer: Option<Renumberer>,
    /// Output buffer.
    buffer: String,
    /// Whether anything has been written yet.
    started: bool,
}

impl<'a> ProgramWriter<'a> {
    /// Create a writer that emits lines unchanged.
    pub fn new(patterns: &'a Patterns, line_ending: LineEnding) -> Self {
        Self {
            patterns,
            line_ending,
            renumberer: None,
            buffer: String::new(),
            started: false,
        }
    }

    /// Renumber N labels from `start` by `step`, and contour separators from 1.
    pub fn with_renumbering(mut self, start: u32, step: u32) -> Self {
        self.renumberer = Some(Renumberer::new(start, step));
        self
    }

    /// Take the generated text.
    pub fn take_output(self) -> String {
        self.buffer
    }

    fn separator(&mut self) {
        if self.started {
            self.buffer.push_str(self.line_ending.as_str());
        }
        self.started = true;
    }

    /// Write one program line.
    pub fn write_line(&mut self, content: &str) {
        self.separator();
        let patterns = self.patterns;
        let renumbered = self
            .renumberer
            .as_mut()
            .and_then(|r| r.apply(patterns, content));
        self.buffer
            .push_str(renumbered.as_deref().unwrap_or(content));
    }

    /// Write `count` empty lines.
    pub fn write_blank(&mut self, count: usize) {
        for _ in 0..count {
            self.separator();
        }
    }

    /// Terminate the last line.
    pub fn write_terminator(&mut self) {
        self.buffer.push_str(self.line_ending.as_str());
    }
}
