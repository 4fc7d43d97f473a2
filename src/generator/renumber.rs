//! Sequence renumbering for nested output.

use super::rewrite::splice;
use crate::parser::Patterns;

/// Running counters for N labels and contour separators.
#[derive(Debug, Clone)]
pub struct Renumberer {
    next_label: u32,
    step: u32,
    next_contour: u32,
}

impl Renumberer {
    /// Start N labels at `start`, advancing by `step`.
    pub fn new(start: u32, step: u32) -> Self {
        Self {
            next_label: start,
            step: step.max(1),
            next_contour: 1,
        }
    }

    /// Relabel one line.
    ///
    /// Replaces the separator number, the leading N label, and the
    /// `SSD[SD.Cr_Nb1=..]` value (set to the new label). Only digits change.
    pub fn apply(&mut self, patterns: &Patterns, line: &str) -> Option<String> {
        let mut edits = Vec::new();

        if let Some(digits) = patterns.contour.captures(line).and_then(|c| c.get(1)) {
            edits.push((digits.range(), self.next_contour.to_string()));
            self.next_contour += 1;
        }

        if let Some(digits) = patterns.n_label.captures(line).and_then(|c| c.get(1)) {
            let label = self.next_label;
            self.next_label = self.next_label.saturating_add(self.step);
            edits.push((digits.range(), label.to_string()));

            if let Some(ssd) = patterns.ssd.captures(line).and_then(|c| c.get(1)) {
                edits.push((ssd.range(), label.to_string()));
            }
        }

        if edits.is_empty() {
            None
        } else {
            Some(splice(line, edits))
        }
    }
}
