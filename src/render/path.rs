//! SVG path data for part thumbnails.

use super::bounds::{calculate_bounds, Bounds};
use crate::config::{angle::normalize_radians, float_cmp, ThumbnailConfig};
use crate::model::{AuxLetter, Command, CommandKind, MotionCode, Part};
use serde::Serialize;
use std::f64::consts::PI;
use tracing::trace;

/// Rendered thumbnail geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Thumbnail {
    /// Toolpath extent along X, in program units.
    pub data_width: f64,
    /// Toolpath extent along Y, in program units.
    pub data_height: f64,
    /// SVG path data, `None` when the part has no drawable geometry.
    pub path: Option<String>,
}

impl Thumbnail {
    /// The result for a part with nothing to draw.
    pub fn empty() -> Self {
        Self {
            data_width: 0.0,
            data_height: 0.0,
            path: None,
        }
    }
}

/// Maps program coordinates onto the thumbnail canvas (Y flipped).
#[derive(Debug, Clone, Copy)]
struct Viewport {
    bounds: Bounds,
    scale: f64,
    offset_x: f64,
    offset_y: f64,
    height: f64,
}

impl Viewport {
    /// Fit `bounds` into the canvas, or `None` when it has no extent.
    fn fit(bounds: Bounds, config: &ThumbnailConfig) -> Option<Self> {
        let width = f64::from(config.width);
        let height = f64::from(config.height);
        let avail_w = width - config.padding * 2.0;
        let avail_h = height - config.padding * 2.0;

        let data_w = bounds.width();
        let data_h = bounds.height();
        let flat_w = float_cmp::approx_zero(data_w);
        let flat_h = float_cmp::approx_zero(data_h);
        if flat_w && flat_h {
            return None;
        }

        // A flat axis scales at 1:1.
        let scale_x = if flat_w { 1.0 } else { avail_w / data_w };
        let scale_y = if flat_h { 1.0 } else { avail_h / data_h };
        let scale = scale_x.min(scale_y) * config.margin;

        Some(Self {
            bounds,
            scale,
            offset_x: (width - data_w * scale) / 2.0,
            offset_y: (height - data_h * scale) / 2.0,
            height,
        })
    }

    fn tx(&self, x: f64) -> f64 {
        self.offset_x + (x - self.bounds.min_x) * self.scale
    }

    fn ty(&self, y: f64) -> f64 {
        self.height - (self.offset_y + (y - self.bounds.min_y) * self.scale)
    }
}

/// How a positioned line is drawn.
enum Stroke {
    Move,
    Line,
    Arc { clockwise: bool },
    Skip,
}

fn stroke_for(cmd: &Command) -> Stroke {
    match cmd.kind {
        CommandKind::Motion(MotionCode::G00) => Stroke::Move,
        CommandKind::Motion(MotionCode::G01) | CommandKind::Modal => Stroke::Line,
        CommandKind::Motion(MotionCode::G02) => Stroke::Arc { clockwise: true },
        CommandKind::Motion(MotionCode::G03) => Stroke::Arc { clockwise: false },
        // Cutter compensation moves lead in along a straight line.
        CommandKind::Aux {
            letter: AuxLetter::G,
            value,
        } if (40.0..=42.0).contains(&value) && value.fract() == 0.0 => Stroke::Line,
        _ => Stroke::Skip,
    }
}

/// Build an `A` segment from `(px, py)` to `(x, y)`.
fn arc_segment(view: &Viewport, cmd: &Command, (px, py): (f64, f64), (x, y): (f64, f64), clockwise: bool) -> String {
    let i = cmd.i.unwrap_or(0.0);
    let j = cmd.j.unwrap_or(0.0);
    let (cx, cy) = (px + i, py + j);
    let radius = i.hypot(j) * view.scale;

    let start = normalize_radians((py - cy).atan2(px - cx));
    let end = normalize_radians((y - cy).atan2(x - cx));
    let sweep = normalize_radians(if clockwise { start - end } else { end - start });

    let large_arc = u8::from(sweep > PI);
    let sweep_flag = u8::from(!clockwise);
    trace!("Arc r={:.4} sweep={:.4} large={}", radius, sweep, large_arc);

    format!(
        "A {:.2} {:.2} 0 {} {} {:.2} {:.2}",
        radius,
        radius,
        large_arc,
        sweep_flag,
        view.tx(x),
        view.ty(y)
    )
}

/// Render a part's toolpath as SVG path data.
///
/// Each contour starts with a move to its first fully known point. Lines
/// without X or Y do not draw.
pub fn render_thumbnail_with(part: &Part, config: &ThumbnailConfig) -> Thumbnail {
    let Some(bounds) = calculate_bounds(part) else {
        return Thumbnail::empty();
    };
    let Some(view) = Viewport::fit(bounds, config) else {
        return Thumbnail::empty();
    };

    let mut segments = Vec::new();
    for contour in &part.contours {
        let mut current: (Option<f64>, Option<f64>) = (None, None);

        for cmd in &contour.commands {
            if cmd.x.is_none() && cmd.y.is_none() {
                continue;
            }
            let previous = current;
            current = (cmd.x.or(current.0), cmd.y.or(current.1));
            let (Some(x), Some(y)) = current else {
                continue;
            };

            let (Some(px), Some(py)) = previous else {
                segments.push(format!("M {:.2} {:.2}", view.tx(x), view.ty(y)));
                continue;
            };

            match stroke_for(cmd) {
                Stroke::Move => segments.push(format!("M {:.2} {:.2}", view.tx(x), view.ty(y))),
                Stroke::Line => segments.push(format!("L {:.2} {:.2}", view.tx(x), view.ty(y))),
                Stroke::Arc { clockwise } => {
                    segments.push(arc_segment(&view, cmd, (px, py), (x, y), clockwise))
                }
                Stroke::Skip => {}
            }
        }
    }

    Thumbnail {
        data_width: bounds.width(),
        data_height: bounds.height(),
        path: (!segments.is_empty()).then(|| segments.join(" ")),
    }
}

/// Render a part's toolpath into a `width` x `height` canvas.
pub fn render_thumbnail(part: &Part, width: u32, height: u32) -> Thumbnail {
    let config = ThumbnailConfig {
        width,
        height,
        ..Default::default()
    };
    render_thumbnail_with(part, &config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::GncParser;

    fn part(body: &str) -> Part {
        let content = format!("(PART NAME:T)\n(==== CONTOUR 1 ====)\n{}", body);
        GncParser::new().parse(&content, "t.gnc").parts.remove(0)
    }

    #[test]
    fn test_square_path() {
        let p = part("G00 X0 Y0\nG01 X10 Y0\nG01 X10 Y10\nG01 X0 Y10\nG01 X0 Y0");
        let thumb = render_thumbnail(&p, 200, 200);
        assert_eq!(thumb.data_width, 10.0);
        assert_eq!(thumb.data_height, 10.0);
        insta::assert_snapshot!(
            thumb.path.unwrap(),
            @"M 14.50 185.50 L 185.50 185.50 L 185.50 14.50 L 14.50 14.50 L 14.50 185.50"
        );
    }

    #[test]
    fn test_ccw_quarter_arc() {
        let p = part("G00 X10 Y0\nG03 X0 Y10 I-10 J0");
        let thumb = render_thumbnail(&p, 200, 200);
        assert_eq!(
            thumb.path.as_deref(),
            Some("M 185.50 185.50 A 171.00 171.00 0 0 1 14.50 14.50")
        );
    }

    #[test]
    fn test_cw_arc_takes_long_way() {
        let p = part("G00 X10 Y0\nG02 X0 Y10 I-10 J0");
        let thumb = render_thumbnail(&p, 200, 200);
        assert_eq!(
            thumb.path.as_deref(),
            Some("M 185.50 185.50 A 171.00 171.00 0 1 0 14.50 14.50")
        );
    }

    #[test]
    fn test_rapid_moves_between_cuts() {
        let p = part("G00 X0 Y0\nG01 X10 Y0\nG00 X10 Y10\nG01 X0 Y10");
        let path = render_thumbnail(&p, 200, 200).path.unwrap();
        let ops: Vec<_> = path
            .split_whitespace()
            .filter(|t| t.chars().all(|c| c.is_ascii_alphabetic()))
            .collect();
        assert_eq!(ops, vec!["M", "L", "M", "L"]);
    }

    #[test]
    fn test_single_axis_extent() {
        let p = part("G00 X0 Y5\nG01 X100 Y5");
        let thumb = render_thumbnail(&p, 200, 200);
        assert_eq!(thumb.data_height, 0.0);
        // min(1.8, 1) * 0.95 = 0.95, so 95 across, centred on both axes.
        assert_eq!(thumb.path.as_deref(), Some("M 52.50 100.00 L 147.50 100.00"));

        let short = render_thumbnail(&part("G00 X0 Y0\nG01 X0 Y10"), 200, 200);
        assert_eq!(short.data_width, 0.0);
        assert_eq!(short.path.as_deref(), Some("M 100.00 104.75 L 100.00 95.25"));
    }

    #[test]
    fn test_empty_parts() {
        assert_eq!(render_thumbnail(&part("M08"), 200, 200), Thumbnail::empty());
        assert_eq!(render_thumbnail(&part("G00 X3 Y3"), 200, 200), Thumbnail::empty());
    }

    #[test]
    fn test_waits_for_both_axes() {
        let p = part("G00 X0 Y0\n(==== CONTOUR 2 ====)\nG01 X10\nG01 Y10");
        let path = render_thumbnail(&p, 200, 200).path.unwrap();
        // Contour 2 starts unknown: X10 alone is skipped, then (10,10) is its first point.
        assert_eq!(path, "M 14.50 185.50 M 185.50 14.50");
    }
}
