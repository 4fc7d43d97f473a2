//! Compiled line patterns shared by the parser and generator.

use regex::Regex;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("invalid regex pattern")
}

/// Every pattern used to classify and rewrite GNC lines.
///
/// Built once per parser or generator instance.
#[derive(Debug, Clone)]
pub struct Patterns {
    /// `(*SHEET w h thickness cutcount p5 p6 p7)`; `body` holds the fields.
    pub sheet_header: Regex,
    /// `(*MODEL name)`.
    pub model: Regex,
    /// `(Material: name)` or `(Material=name)`.
    pub material: Regex,
    /// `(THICKNESS=1.5)`.
    pub thickness: Regex,
    /// `(PART NAME:name)`.
    pub part_name: Regex,
    /// `(=== CONTOUR n ===)`, any number of `=` from three up.
    pub contour: Regex,
    /// `P660=a,P150=b,P151=c` on `_801` programs.
    pub pcode_triple: Regex,
    /// Generic `P###=value`.
    pub pcode_pair: Regex,
    /// Characters that mark a `*N` line as carrying more than P-codes.
    pub motion_hint: Regex,
    /// G, M or T word.
    pub code_word: Regex,
    /// X, Y, I or J word.
    pub coordinate: Regex,
    /// Leading `N` sequence label.
    pub n_label: Regex,
    /// `SSD[SD.Cr_Nb1=n]` sequence cross-reference.
    pub ssd: Regex,
    /// `(KEY: value)` comment tag.
    pub tag: Regex,
}

impl Patterns {
    /// Compile all patterns.
    pub fn new() -> Self {
        Self {
            sheet_header: compile(r"\(\*SHEET(?P<body>[^)]*)\)"),
            model: compile(r"\(\*MODEL\s+([^)]*?)\s*\)"),
            material: compile(r"(?i)\(\s*Material\s*[:=]\s*([^)]*?)\s*\)"),
            thickness: compile(r"(?i)\(\s*THICKNESS\s*=\s*([+-]?\d*\.?\d+)"),
            part_name: compile(r"(?i)\(\s*PART\s+NAME\s*:([^)]*)\)"),
            contour: compile(r"(?i)\(\s*={3,}\s*CONTOUR\s+(\d+)\s*={3,}\s*\)"),
            pcode_triple: compile(r"P660=([^,\s]+),P150=([^,\s]+),P151=([^,\s]+)"),
            pcode_pair: compile(r"P(\d+)=([^,\s]+)"),
            motion_hint: compile(r"[GX-YIJT]"),
            code_word: compile(r"[GMTgmt](\d+(?:\.\d+)?)"),
            coordinate: compile(r"([XYIJxyij])([+-]?\d*\.?\d+)"),
            n_label: compile(r"^\s*[Nn](\d+)"),
            ssd: compile(r"SSD\[SD\.Cr_Nb1=(\d+)\]"),
            tag: compile(r"^\s*\(\s*([A-Za-z][A-Za-z0-9 _]*?)\s*[:=]\s*(.*?)\s*\)\s*$"),
        }
    }
}

impl Default for Patterns {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contour_separator_variants() {
        let p = Patterns::new();
        for line in [
            "(==== CONTOUR 1 ====)",
            "(===== CONTOUR 1 =====)",
            "(=== contour 1 ===)",
            "( ===  CONTOUR  1  === )",
        ] {
            let caps = p.contour.captures(line).unwrap();
            assert_eq!(&caps[1], "1", "{}", line);
        }
        assert!(p.contour.captures("(== CONTOUR 1 ==)").is_none());
    }

    #[test]
    fn test_part_name() {
        let p = Patterns::new();
        let caps = p.part_name.captures("(PART NAME:3515-76-005-A-26 )").unwrap();
        assert_eq!(caps[1].trim(), "3515-76-005-A-26");
    }

    #[test]
    fn test_pcode_patterns() {
        let p = Patterns::new();
        let caps = p.pcode_triple.captures("*N20 P660=1,P150=2.5,P151=3").unwrap();
        assert_eq!((&caps[1], &caps[2], &caps[3]), ("1", "2.5", "3"));

        let pairs: Vec<_> = p
            .pcode_pair
            .captures_iter("*N1005 P660=1005 P100=20")
            .map(|c| (c[1].to_string(), c[2].to_string()))
            .collect();
        assert_eq!(
            pairs,
            vec![("660".into(), "1005".into()), ("100".into(), "20".into())]
        );
    }

    #[test]
    fn test_motion_hint() {
        let p = Patterns::new();
        assert!(!p.motion_hint.is_match("*N1005 P660=1005"));
        assert!(p.motion_hint.is_match("*N1005 G01 X5"));
    }
}
