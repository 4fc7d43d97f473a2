//! gnc-convert - CLI tool to nest, regenerate and preview GNC programs.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use gnc_convert_rs::transform::parse_position;
use gnc_convert_rs::{
    generator::write_program, parse_gnc_file, place_copies, validate_output, validate_sheet,
    write_thumbnail, GeneratorConfig, GncError, GncGenerator, RenumberMode, ThumbnailConfig,
    ValidationResult,
};

/// Renumbering policy as given on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Renumber {
    Auto,
    Always,
    Never,
}

impl From<Renumber> for RenumberMode {
    fn from(value: Renumber) -> Self {
        match value {
            Renumber::Auto => RenumberMode::Auto,
            Renumber::Always => RenumberMode::Always,
            Renumber::Never => RenumberMode::Never,
        }
    }
}

/// Nest, regenerate and preview GNC sheet-metal cutting programs.
#[derive(Parser, Debug)]
#[command(name = "gnc-convert")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input GNC file path
    #[arg(short, long)]
    input: PathBuf,

    /// Output GNC file path (defaults to <input>_out.<ext>)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Part to place or preview (1-based)
    #[arg(short, long, default_value = "1")]
    part: usize,

    /// Place a copy of the part at X,Y (repeatable)
    #[arg(long = "place", value_name = "X,Y", allow_hyphen_values = true)]
    places: Vec<String>,

    /// Write an SVG thumbnail of the part
    #[arg(long, value_name = "SVG")]
    thumbnail: Option<PathBuf>,

    /// Thumbnail size in pixels
    #[arg(long, default_value = "200")]
    size: u32,

    /// When to rewrite N labels, SSD tags and contour numbers
    #[arg(long, value_enum, default_value = "auto")]
    renumber: Renumber,

    /// Replace the output file if it exists
    #[arg(short, long)]
    force: bool,

    /// Validate only, don't generate output
    #[arg(long)]
    validate: bool,

    /// Output debug information as JSON
    #[arg(long)]
    debug: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn report(validation: &ValidationResult) {
    for warning in &validation.warnings {
        warn!("{}", warning);
    }

    for err in &validation.errors {
        error!("{}", err);
    }
}

fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let name = match input.extension() {
        Some(ext) => format!("{}_out.{}", stem, ext.to_string_lossy()),
        None => format!("{}_out", stem),
    };
    input.with_file_name(name)
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if args.part == 0 {
        anyhow::bail!("Part numbers start at 1");
    }
    let part_index = args.part - 1;

    info!("Processing: {}", args.input.display());

    // Parse the input file
    let source = parse_gnc_file(&args.input)
        .with_context(|| format!("Failed to parse {}", args.input.display()))?;

    let stats = source.stats();
    info!(
        "Parsed {} part(s), {} contour(s), {} corner(s)",
        stats.total_parts, stats.total_contours, stats.total_corners
    );

    // Validate
    let validation = validate_sheet(&source);
    report(&validation);

    if !validation.passed {
        anyhow::bail!("Validation failed");
    }

    // Debug output
    if args.debug {
        let json = serde_json::to_string_pretty(&source)?;
        println!("{}", json);
        return Ok(());
    }

    // Thumbnail
    if let Some(svg_path) = &args.thumbnail {
        let part = source
            .parts
            .get(part_index)
            .ok_or(GncError::PartNotFound {
                index: part_index,
                available: source.parts.len(),
            })?;
        let thumbnail = write_thumbnail(part, svg_path, &ThumbnailConfig::square(args.size))
            .with_context(|| format!("Failed to write {}", svg_path.display()))?;
        info!(
            "Thumbnail: {} ({:.3} x {:.3})",
            svg_path.display(),
            thumbnail.data_width,
            thumbnail.data_height
        );
    }

    // Validate-only mode
    if args.validate {
        info!("Validation passed");
        return Ok(());
    }

    // Nest copies, or regenerate the sheet as parsed
    let sheet = if args.places.is_empty() {
        source
    } else {
        let positions = args
            .places
            .iter()
            .map(|p| parse_position(p))
            .collect::<Result<Vec<_>, _>>()?;
        let nested = place_copies(&source, part_index, &positions)?;
        info!("Placed {} copies of part {}", positions.len(), args.part);
        report(&validate_sheet(&nested));
        nested
    };

    // Generate output
    let generator = GncGenerator::new(GeneratorConfig::new(args.renumber.into()));
    let program = generator.generate(&sheet);

    if generator.should_renumber(&sheet) {
        let checked = validate_output(&program);
        report(&checked);
        if !checked.passed {
            anyhow::bail!("Generated program failed validation");
        }
    }

    // Write output
    let output_path = args.output.unwrap_or_else(|| default_output(&args.input));

    let saved = write_program(&output_path, &program, args.force)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    info!("Generated: {} ({} bytes)", saved.path.display(), saved.size);

    Ok(())
}
