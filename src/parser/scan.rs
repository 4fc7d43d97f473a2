//! Structural state machine for the single-pass scan.
//!
//! Each classified line becomes a [`LineEvent`]. [`transition`] maps the
//! current [`ScanState`] and the event to the next state plus the
//! [`Effect`]s the sheet builder must apply, in order.

/// Where the scan currently is in the part/contour hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanState {
    /// No part opened yet; metadata goes to the sheet header.
    #[default]
    NoPart,
    /// A contour is open. `preamble` marks the contour opened by a part tag.
    InContour { preamble: bool },
}

/// Structural meaning of a line.
#[derive(Debug, Clone, PartialEq)]
pub enum LineEvent {
    /// `(PART NAME:...)`.
    PartStart { name: Option<String> },
    /// `(=== CONTOUR n ===)`.
    ContourStart { id: u32 },
    /// Anything else.
    Content {
        /// Whether the line is a comment/tag rather than machine code.
        metadata: bool,
        /// Whether the line moves the tool.
        motion: bool,
        /// `(KEY: value)` tag carried by the line.
        tag: Option<(String, String)>,
    },
}

/// Builder action produced by a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Store the line in the sheet header.
    PushHeader,
    /// Open the stand-in part for content preceding any part tag.
    OpenPlaceholder,
    /// Open a named part.
    OpenPart { name: Option<String> },
    /// Open a contour in the current part.
    OpenContour { id: u32, from_separator: bool },
    /// Append the line to the current contour.
    Append,
    /// Record a tag on the current part.
    TagPart { key: String, value: String },
}

/// Contour id used when content arrives without a separator.
pub fn default_contour_id(metadata: bool, motion: bool) -> u32 {
    if !metadata && motion {
        1
    } else {
        0
    }
}

/// Compute the next state and the effects for one line.
pub fn transition(state: ScanState, event: LineEvent) -> (ScanState, Vec<Effect>) {
    match event {
        LineEvent::PartStart { name } => (
            ScanState::InContour { preamble: true },
            vec![
                Effect::OpenPart { name },
                Effect::OpenContour {
                    id: 0,
                    from_separator: false,
                },
                Effect::Append,
            ],
        ),
        LineEvent::ContourStart { id } => {
            let mut effects = Vec::with_capacity(3);
            if state == ScanState::NoPart {
                effects.push(Effect::OpenPlaceholder);
            }
            effects.push(Effect::OpenContour {
                id,
                from_separator: true,
            });
            effects.push(Effect::Append);
            (ScanState::InContour { preamble: false }, effects)
        }
        LineEvent::Content {
            metadata,
            motion,
            tag,
        } => match state {
            ScanState::NoPart if metadata => (ScanState::NoPart, vec![Effect::PushHeader]),
            ScanState::NoPart => (
                ScanState::InContour { preamble: false },
                vec![
                    Effect::OpenPlaceholder,
                    Effect::OpenContour {
                        id: default_contour_id(metadata, motion),
                        from_separator: false,
                    },
                    Effect::Append,
                ],
            ),
            ScanState::InContour { preamble } => {
                let mut effects = vec![Effect::Append];
                if let (true, Some((key, value))) = (preamble, tag) {
                    effects.push(Effect::TagPart { key, value });
                }
                (ScanState::InContour { preamble }, effects)
            }
        },
    }
}
