//! Integration tests for GNC parsing, nesting and regeneration.
//!
//! These tests run the public pipeline on a realistic program and check the
//! properties the machine depends on: untouched programs regenerate exactly,
//! edits stay local to the lines they affect, placed copies keep their
//! geometry, and sequence labels stay consistent.

use gnc_convert_rs::{
    generate, nest_gnc_file, parse, parse_gnc_file, place_copies, render_thumbnail,
    save_gnc_file, validate_output, validate_sheet, write_thumbnail, CommandKind, GeneratorConfig,
    GncError, GncGenerator, MotionCode, RenumberMode, Sheet, ThumbnailConfig,
};
use pretty_assertions::assert_eq;
use std::path::Path;

/// Two-contour part with a machine header, P-codes and SSD tags.
const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/shlav_sheet.gnc");

const TOLERANCE: f64 = 1e-3;

fn fixture_content() -> String {
    std::fs::read_to_string(FIXTURE).expect("fixture should be readable")
}

fn fixture_sheet() -> Sheet {
    parse_gnc_file(Path::new(FIXTURE)).expect("fixture should parse")
}

fn n_labels(program: &str) -> Vec<u32> {
    program
        .lines()
        .filter_map(|line| {
            let rest = line.trim_start().strip_prefix('N')?;
            let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse().ok()
        })
        .collect()
}

fn assert_close(actual: Option<f64>, expected: Option<f64>, what: &str) {
    match (actual, expected) {
        (Some(a), Some(e)) => assert!((a - e).abs() < TOLERANCE, "{}: {} != {}", what, a, e),
        (a, e) => assert_eq!(a, e, "{}", what),
    }
}

// ==================== Parsing ====================

#[test]
fn test_fixture_structure() {
    let sheet = fixture_sheet();

    assert_eq!(sheet.name, "shlav_sheet.gnc");
    assert_eq!(sheet.header_commands.len(), 5);
    assert!(sheet
        .header_commands
        .iter()
        .all(|c| c.kind == CommandKind::Header));

    assert_eq!(sheet.program_width, Some(3000.0));
    assert_eq!(sheet.program_height, Some(1500.0));
    assert_eq!(sheet.thickness, Some(1.5));
    assert_eq!(sheet.cut_count, Some(1));
    assert_eq!(sheet.material.as_deref(), Some("SS 1.4003"));
    assert_eq!(sheet.metadata.get("model"), Some("SHLAV-351501"));
    assert_eq!(sheet.n_code_start(), Some(10));
    assert_eq!(sheet.n_code_step(), Some(10));

    assert_eq!(sheet.parts.len(), 1);
    let part = &sheet.parts[0];
    assert_eq!(part.id, 1);
    assert_eq!(part.name.as_deref(), Some("SHLAV-1"));
    assert_eq!(part.metadata.get("QTY"), Some("2"));
    assert!(!part.placeholder);

    let ids: Vec<u32> = part.contours.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![0, 1, 2]);
    assert_eq!(part.contours[1].metadata.get("P660"), Some("1005"));
    assert_eq!(part.contours[1].metadata.get("P150"), Some("2"));
    assert_eq!(part.contours[2].metadata.get("P660"), Some("1006"));

    let stats = sheet.stats();
    assert_eq!(stats.total_parts, 1);
    assert_eq!(stats.total_contours, 3);
    assert_eq!(stats.total_corners, 8);

    assert!(validate_sheet(&sheet).passed);
}

#[test]
fn test_fixture_arc_commands() {
    let sheet = fixture_sheet();
    let arcs: Vec<_> = sheet.parts[0]
        .contours
        .iter()
        .flat_map(|c| &c.commands)
        .filter(|c| c.is_arc())
        .collect();

    assert_eq!(arcs.len(), 2);
    assert_eq!(arcs[0].kind, CommandKind::Motion(MotionCode::G03));
    assert_eq!((arcs[0].i, arcs[0].j), (Some(0.0), Some(10.0)));
    assert_eq!(arcs[1].kind, CommandKind::Motion(MotionCode::G02));
    assert_eq!((arcs[1].i, arcs[1].j), (Some(10.0), Some(0.0)));
}

#[test]
fn test_separator_variants() {
    let sheet = parse(
        "(PART NAME:V)\n\
         (==== CONTOUR 1 ====)\nG00 X0 Y0\n\
         (=====  CONTOUR  3  =====)\nG00 X1 Y1\n\
         ( === contour 7 === )\nG00 X2 Y2",
        "variants.gnc",
    );
    let ids: Vec<u32> = sheet.parts[0]
        .contours
        .iter()
        .filter(|c| c.from_separator)
        .map(|c| c.id)
        .collect();
    assert_eq!(ids, vec![1, 3, 7]);
}

#[test]
fn test_leading_content_collapses_into_first_part() {
    let content = "G00 X0 Y0\nG01 X5 Y0\n(PART NAME:A)\n(==== CONTOUR 1 ====)\nG00 X1 Y1\n";
    let sheet = parse(content, "lead.gnc");

    assert_eq!(sheet.parts.len(), 1);
    let part = &sheet.parts[0];
    assert_eq!(part.id, 1);
    assert_eq!(part.name.as_deref(), Some("A"));
    assert!(!part.placeholder);
    assert_eq!(part.contours[0].commands[0].original_text, "G00 X0 Y0");
    assert_eq!(generate(&sheet), content);
}

#[test]
fn test_program_without_part_tags() {
    let sheet = parse("G00 X0 Y0\nG01 X5 Y5", "bare.gnc");
    assert_eq!(sheet.parts.len(), 1);
    assert!(sheet.parts[0].placeholder);
    assert_eq!(sheet.parts[0].display_name(), "bare.gnc (Auto)");
}

// ==================== Regeneration ====================

#[test]
fn test_round_trip_identity() {
    let content = fixture_content();
    let sheet = parse(&content, "shlav_sheet.gnc");
    assert_eq!(generate(&sheet), content);
}

#[test]
fn test_round_trip_identity_crlf() {
    let content = fixture_content().replace('\n', "\r\n");
    let sheet = parse(&content, "shlav_sheet.gnc");
    assert_eq!(generate(&sheet), content);
}

#[test]
fn test_round_trip_parts_restarting_contour_numbers() {
    let content = "(PART NAME:A)\n(==== CONTOUR 1 ====)\nN10 G00 X0 Y0\n\
                   (PART NAME:B)\n(==== CONTOUR 1 ====)\nN10 G00 X1 Y1\n";
    let sheet = parse(content, "restart.gnc");
    assert_eq!(sheet.parts.len(), 2);
    assert_eq!(generate(&sheet), content);
}

#[test]
fn test_pcode_edit_isolation() {
    let content = fixture_content();
    let mut sheet = parse(&content, "shlav_sheet.gnc");
    sheet.parts[0].contours[1].metadata.insert("P660", "2001");

    let output = generate(&sheet);
    assert_eq!(output, content.replace("P660=1005", "P660=2001"));
}

#[test]
fn test_offset_linearity() {
    let (dx, dy) = (123.4567, -42.25);
    let source = fixture_sheet();
    let mut moved = source.clone();
    moved.parts[0].x = dx;
    moved.parts[0].y = dy;

    let output = generate(&moved);
    let reparsed = parse(&output, "moved.gnc");

    let before: Vec<_> = source.parts[0].contours.iter().flat_map(|c| &c.commands).collect();
    let after: Vec<_> = reparsed.parts[0].contours.iter().flat_map(|c| &c.commands).collect();
    assert_eq!(before.len(), after.len());

    for (a, b) in before.iter().zip(&after) {
        assert_eq!(a.kind, b.kind, "line {}", a.line_number);
        assert_close(b.x, a.x.map(|x| x + dx), "X");
        assert_close(b.y, a.y.map(|y| y + dy), "Y");
        assert_eq!(a.i, b.i);
        assert_eq!(a.j, b.j);
    }

    // Header lines never move.
    let header: Vec<_> = output.lines().take(5).collect();
    let original = fixture_content();
    let expected: Vec<_> = original.lines().take(5).collect();
    assert_eq!(header, expected);
}

#[test]
fn test_sheet_header_edit() {
    let content = fixture_content();
    let mut sheet = parse(&content, "shlav_sheet.gnc");
    sheet.program_width = Some(2500.0);
    sheet.thickness = Some(2.0);

    let output = generate(&sheet);
    assert_eq!(
        output,
        content.replace(
            "(*SHEET 3000.0 1500.0 1.5 1 0 0.0 0.0 )",
            "(*SHEET 2500.0 1500.0 2.0 1 0 0.0 0.0 )"
        )
    );
}

// ==================== Nesting ====================

#[test]
fn test_nesting_parity() {
    let source = fixture_sheet();
    let sheet = place_copies(&source, 0, &[(0.0, 0.0), (500.0, 200.0)]).unwrap();
    assert!(validate_sheet(&sheet).passed);

    let output = generate(&sheet);

    // Contour separators are numbered across the whole program.
    let contours: Vec<&str> = output.lines().filter(|l| l.contains("CONTOUR")).collect();
    assert_eq!(
        contours,
        vec![
            "(===== CONTOUR 1 =====)",
            "(===== CONTOUR 2 =====)",
            "(===== CONTOUR 3 =====)",
            "(===== CONTOUR 4 =====)",
        ]
    );

    // N labels continue from the source start and step.
    let labels = n_labels(&output);
    let expected: Vec<u32> = (1..=labels.len() as u32).map(|n| n * 10).collect();
    assert_eq!(labels, expected);

    let checked = validate_output(&output);
    assert!(checked.passed, "{:?}", checked.errors);
    assert!(checked.warnings.is_empty(), "{:?}", checked.warnings);

    // The second copy carries the same geometry, shifted by its placement.
    let reparsed = parse(&output, "nested.gnc");
    assert_eq!(reparsed.parts.len(), 2);
    let first: Vec<_> = reparsed.parts[0]
        .contours
        .iter()
        .flat_map(|c| &c.commands)
        .filter(|c| c.is_motion())
        .collect();
    let second: Vec<_> = reparsed.parts[1]
        .contours
        .iter()
        .flat_map(|c| &c.commands)
        .filter(|c| c.is_motion())
        .collect();
    assert_eq!(first.len(), second.len());

    for (a, b) in first.iter().zip(&second) {
        assert_close(b.x, a.x.map(|x| x + 500.0), "X");
        assert_close(b.y, a.y.map(|y| y + 200.0), "Y");
        assert_eq!(a.i, b.i);
        assert_eq!(a.j, b.j);
    }
}

#[test]
fn test_nesting_keeps_first_copy_text() {
    let source = fixture_sheet();
    let sheet = place_copies(&source, 0, &[(0.0, 0.0), (500.0, 200.0)]).unwrap();
    let output = generate(&sheet);

    // The copy at the origin is emitted exactly as parsed.
    let original = fixture_content();
    let first_copy: Vec<&str> = original.lines().collect();
    let emitted: Vec<&str> = output.lines().take(first_copy.len()).collect();
    assert_eq!(emitted, first_copy);

    assert!(output.contains("N150 G00 X1067.000 Y389.955 SSD[SD.Cr_Nb1=150]"));
    assert!(output.contains("N180 G03 X1110.000 Y401.924 I0 J10 SSD[SD.Cr_Nb1=180]"));
}

#[test]
fn test_nesting_without_renumbering() {
    let source = fixture_sheet();
    let sheet = place_copies(&source, 0, &[(0.0, 0.0), (500.0, 200.0)]).unwrap();
    let generator = GncGenerator::new(GeneratorConfig::new(RenumberMode::Never));
    let output = generator.generate(&sheet);

    assert_eq!(output.matches("(===== CONTOUR 1 =====)").count(), 2);
    let checked = validate_output(&output);
    assert!(checked.passed);
    assert!(!checked.warnings.is_empty());
}

#[test]
fn test_nest_gnc_file_pipeline() {
    let output = nest_gnc_file(
        Path::new(FIXTURE),
        0,
        &[(0.0, 0.0), (1000.0, 0.0), (2000.0, 0.0)],
        &GeneratorConfig::default(),
    )
    .unwrap();

    assert_eq!(output.matches("(PART NAME:SHLAV-1)").count(), 3);
    assert_eq!(output.matches("M30").count(), 3);
    assert!(validate_output(&output).passed);
}

#[test]
fn test_part_not_found() {
    let err = nest_gnc_file(Path::new(FIXTURE), 3, &[(0.0, 0.0)], &GeneratorConfig::default())
        .unwrap_err();
    assert!(matches!(
        err,
        GncError::PartNotFound {
            index: 3,
            available: 1
        }
    ));
    assert_eq!(err.code_value(), 200);
}

// ==================== Rendering ====================

#[test]
fn test_fixture_thumbnail() {
    let sheet = fixture_sheet();
    let thumb = render_thumbnail(&sheet.parts[0], 200, 200);

    assert!((thumb.data_width - 43.0).abs() < TOLERANCE);
    assert!((thumb.data_height - 60.045).abs() < TOLERANCE);

    let path = thumb.path.expect("fixture has geometry");
    assert!(path.starts_with("M "));
    assert_eq!(path.matches('M').count(), 2);
    assert_eq!(path.matches('A').count(), 2);
}

#[test]
fn test_write_thumbnail_file() {
    let dir = tempfile::tempdir().unwrap();
    let svg_path = dir.path().join("thumbs").join("shlav.svg");
    let sheet = fixture_sheet();

    let thumb = write_thumbnail(&sheet.parts[0], &svg_path, &ThumbnailConfig::square(120)).unwrap();
    let svg = std::fs::read_to_string(&svg_path).unwrap();

    assert!(thumb.path.is_some());
    assert!(svg.contains("viewBox=\"0 0 120 120\""));
    assert!(svg.contains("<path d=\"M "));
}

// ==================== File handling ====================

#[test]
fn test_parse_gnc_file_errors() {
    let dir = tempfile::tempdir().unwrap();

    let missing = parse_gnc_file(&dir.path().join("missing.gnc"));
    assert!(matches!(missing, Err(GncError::FileNotFound { .. })));

    let blank = dir.path().join("blank.gnc");
    std::fs::write(&blank, "\n  \n").unwrap();
    assert!(matches!(
        parse_gnc_file(&blank),
        Err(GncError::EmptyFile { .. })
    ));
}

#[test]
fn test_save_refuses_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested.gnc");
    let sheet = fixture_sheet();
    let config = GeneratorConfig::default();

    let report = save_gnc_file(&sheet, &out, false, &config).unwrap();
    assert_eq!(report.size, fixture_content().len());
    assert_eq!(std::fs::read_to_string(&out).unwrap(), fixture_content());

    let err = save_gnc_file(&sheet, &out, false, &config).unwrap_err();
    assert!(matches!(err, GncError::FileExists { .. }));
    assert_eq!(err.code_value(), -4);
}
