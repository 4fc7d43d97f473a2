//! Standalone SVG documents for thumbnails.

use super::path::{render_thumbnail_with, Thumbnail};
use crate::config::ThumbnailConfig;
use crate::error::Result;
use crate::model::Part;
use std::path::Path;
use tracing::info;

/// Stroke colour of rendered toolpaths.
const STROKE_COLOR: &str = "#60a5fa";

/// Background of placeholder documents.
const PLACEHOLDER_FILL: &str = "#1e1e1e";

/// Wrap thumbnail path data in an SVG document.
///
/// Parts without geometry get an "Empty" placeholder.
pub fn thumbnail_svg(thumbnail: &Thumbnail, config: &ThumbnailConfig) -> String {
    match &thumbnail.path {
        Some(path) => format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 {w} {h}\" width=\"100%\" height=\"100%\">\n  \
             <path d=\"{path}\" stroke=\"{STROKE_COLOR}\" stroke-width=\"3\" fill=\"none\" stroke-linecap=\"round\" stroke-linejoin=\"round\"/>\n\
             </svg>",
            w = config.width,
            h = config.height,
        ),
        None => placeholder_svg("Empty", config),
    }
}

/// A labelled placeholder document.
pub fn placeholder_svg(label: &str, config: &ThumbnailConfig) -> String {
    format!(
        "<svg width=\"{w}\" height=\"{h}\" xmlns=\"http://www.w3.org/2000/svg\">\n  \
         <rect width=\"100%\" height=\"100%\" fill=\"{PLACEHOLDER_FILL}\"/>\n  \
         <text x=\"50%\" y=\"50%\" text-anchor=\"middle\" fill=\"#666\" font-size=\"12\">{label}</text>\n\
         </svg>",
        w = config.width,
        h = config.height,
    )
}

/// Render a part and write the SVG document to `path`.
pub fn write_thumbnail(part: &Part, path: &Path, config: &ThumbnailConfig) -> Result<Thumbnail> {
    let thumbnail = render_thumbnail_with(part, config);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, thumbnail_svg(&thumbnail, config))?;
    info!(
        "Thumbnail for '{}': {} ({:.1} x {:.1})",
        part.display_name(),
        path.display(),
        thumbnail.data_width,
        thumbnail.data_height
    );
    Ok(thumbnail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_wraps_path() {
        let thumb = Thumbnail {
            data_width: 10.0,
            data_height: 10.0,
            path: Some("M 1.00 2.00".to_string()),
        };
        let svg = thumbnail_svg(&thumb, &ThumbnailConfig::default());
        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 200 200\""));
        assert!(svg.contains("<path d=\"M 1.00 2.00\" stroke=\"#60a5fa\""));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn test_empty_placeholder() {
        let svg = thumbnail_svg(&Thumbnail::empty(), &ThumbnailConfig::square(64));
        assert!(svg.contains("width=\"64\" height=\"64\""));
        assert!(svg.contains(">Empty</text>"));
    }

    #[test]
    fn test_write_thumbnail() {
        let sheet = crate::parser::GncParser::new().parse(
            "(PART NAME:A)\nG00 X0 Y0\nG01 X10 Y10",
            "a.gnc",
        );
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("thumbs").join("a.svg");

        let thumb = write_thumbnail(&sheet.parts[0], &path, &ThumbnailConfig::default()).unwrap();
        assert!(thumb.path.is_some());
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains(thumb.path.as_deref().unwrap()));
    }
}
