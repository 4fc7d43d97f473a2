//! One parsed program line.

use serde::{Deserialize, Serialize};

/// Toolpath motion codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionCode {
    /// Rapid traverse.
    G00,
    /// Linear cut.
    G01,
    /// Clockwise arc.
    G02,
    /// Counter-clockwise arc.
    G03,
}

impl MotionCode {
    /// Map a G-code value to a motion code.
    pub fn from_value(value: f64) -> Option<Self> {
        if value.fract() != 0.0 {
            return None;
        }
        match value as i64 {
            0 => Some(MotionCode::G00),
            1 => Some(MotionCode::G01),
            2 => Some(MotionCode::G02),
            3 => Some(MotionCode::G03),
            _ => None,
        }
    }

    pub fn is_arc(&self) -> bool {
        matches!(self, MotionCode::G02 | MotionCode::G03)
    }
}

impl std::fmt::Display for MotionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MotionCode::G00 => write!(f, "G00"),
            MotionCode::G01 => write!(f, "G01"),
            MotionCode::G02 => write!(f, "G02"),
            MotionCode::G03 => write!(f, "G03"),
        }
    }
}

/// Letter of a non-motion code word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuxLetter {
    G,
    M,
    T,
}

impl AuxLetter {
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'G' => Some(AuxLetter::G),
            'M' => Some(AuxLetter::M),
            'T' => Some(AuxLetter::T),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            AuxLetter::G => 'G',
            AuxLetter::M => 'M',
            AuxLetter::T => 'T',
        }
    }
}

/// A single G/M/T word found on a line, e.g. `G41` or `M08`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CodeWord {
    pub letter: AuxLetter,
    pub value: f64,
}

impl CodeWord {
    pub fn new(letter: AuxLetter, value: f64) -> Self {
        Self { letter, value }
    }

    /// Motion code carried by this word, if it is G00-G03.
    pub fn motion(&self) -> Option<MotionCode> {
        match self.letter {
            AuxLetter::G => MotionCode::from_value(self.value),
            _ => None,
        }
    }
}

impl std::fmt::Display for CodeWord {
    /// Normalized form: two-digit integers (`G01`, `M08`), decimals kept (`G70.1`).
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.value.fract() == 0.0 {
            write!(f, "{}{:02}", self.letter.as_char(), self.value as i64)
        } else {
            write!(f, "{}{}", self.letter.as_char(), self.value)
        }
    }
}

/// Classification of a program line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CommandKind {
    /// G00-G03 toolpath motion.
    Motion(MotionCode),
    /// Any other G, M or T code.
    Aux { letter: AuxLetter, value: f64 },
    /// Coordinates without a code; continues the previous motion mode.
    Modal,
    /// Comments, tags, separators and P-code lines.
    Metadata,
    /// Lines found before any part or contour context.
    Header,
}

impl std::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandKind::Motion(code) => write!(f, "{}", code),
            CommandKind::Aux { letter, value } => write!(f, "{}", CodeWord::new(*letter, *value)),
            CommandKind::Modal => write!(f, "MODAL"),
            CommandKind::Metadata => write!(f, "METADATA"),
            CommandKind::Header => write!(f, "HEADER"),
        }
    }
}

/// One non-blank source line with the fields extracted from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Command {
    /// Line classification.
    pub kind: CommandKind,
    /// Every G/M/T word on the line, in source order.
    #[serde(default)]
    pub codes: Vec<CodeWord>,
    /// X coordinate.
    pub x: Option<f64>,
    /// Y coordinate.
    pub y: Option<f64>,
    /// Arc center X offset, relative to the start point.
    pub i: Option<f64>,
    /// Arc center Y offset, relative to the start point.
    pub j: Option<f64>,
    /// 1-based source line number.
    pub line_number: usize,
    /// Exact source text, used verbatim on regeneration.
    pub original_text: String,
    /// Blank source lines directly above this one.
    #[serde(default)]
    pub blank_lines_before: usize,
}

impl Command {
    /// Create a command with no codes or coordinates.
    pub fn new(kind: CommandKind, line_number: usize, original_text: impl Into<String>) -> Self {
        Self {
            kind,
            codes: Vec::new(),
            x: None,
            y: None,
            i: None,
            j: None,
            line_number,
            original_text: original_text.into(),
            blank_lines_before: 0,
        }
    }

    /// Create a metadata command.
    pub fn metadata(line_number: usize, original_text: impl Into<String>) -> Self {
        Self::new(CommandKind::Metadata, line_number, original_text)
    }

    /// Motion code, if this is a G00-G03 line.
    pub fn motion_code(&self) -> Option<MotionCode> {
        match self.kind {
            CommandKind::Motion(code) => Some(code),
            _ => None,
        }
    }

    /// Whether this line moves the tool (explicit motion or modal continuation).
    pub fn is_motion(&self) -> bool {
        matches!(self.kind, CommandKind::Motion(_) | CommandKind::Modal)
    }

    pub fn is_arc(&self) -> bool {
        self.motion_code().is_some_and(|c| c.is_arc())
    }

    pub fn is_metadata(&self) -> bool {
        matches!(self.kind, CommandKind::Metadata | CommandKind::Header)
    }

    pub fn has_coordinates(&self) -> bool {
        self.x.is_some() || self.y.is_some() || self.i.is_some() || self.j.is_some()
    }

    /// Whether the line carries the given G/M/T word anywhere.
    pub fn has_code(&self, letter: AuxLetter, value: f64) -> bool {
        self.codes
            .iter()
            .any(|c| c.letter == letter && c.value == value)
    }
}
