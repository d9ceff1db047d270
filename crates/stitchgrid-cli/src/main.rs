//! stitchgrid CLI — chart and palette extraction from the command line.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use stitchgrid::{
    apply_corrections, ChartConfig, ChartScanner, Correction, GradientConfig, QuantizeConfig,
    Scheme, TransitionStyle,
};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "stitchgrid")]
#[command(about = "Extract knitting-chart grids and ranked color palettes from images")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect a stitch-symbol grid in a chart image.
    DetectChart(DetectChartArgs),

    /// Extract a ranked color palette from an image.
    Palette(PaletteArgs),

    /// Generate a palette from a base color and a color-wheel scheme.
    Harmony(HarmonyArgs),

    /// Generate a gradient row sequence for a multi-color project.
    Gradient(GradientArgs),
}

#[derive(Debug, Clone, Args)]
struct DetectChartArgs {
    /// Path to the chart image.
    #[arg(long)]
    image: PathBuf,

    /// Path to write the detected chart (JSON); stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Optional corrections file: JSON array of {row, col, symbol}.
    #[arg(long)]
    corrections: Option<PathBuf>,

    /// Disable the sharpening step during preprocessing.
    #[arg(long)]
    no_sharpen: bool,
}

#[derive(Debug, Clone, Args)]
struct PaletteArgs {
    /// Path to the image.
    #[arg(long)]
    image: PathBuf,

    /// Number of colors to extract (clamped to [2, 10]).
    #[arg(long, default_value = "6")]
    colors: usize,

    /// RNG seed for reproducible clustering.
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Path to write the palette (JSON); stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SchemeArg {
    Analogous,
    Complementary,
    Triadic,
    SplitComplementary,
    Monochromatic,
}

impl From<SchemeArg> for Scheme {
    fn from(s: SchemeArg) -> Self {
        match s {
            SchemeArg::Analogous => Scheme::Analogous,
            SchemeArg::Complementary => Scheme::Complementary,
            SchemeArg::Triadic => Scheme::Triadic,
            SchemeArg::SplitComplementary => Scheme::SplitComplementary,
            SchemeArg::Monochromatic => Scheme::Monochromatic,
        }
    }
}

#[derive(Debug, Clone, Args)]
struct HarmonyArgs {
    /// Base color as #RRGGBB hex.
    #[arg(long)]
    base: String,

    /// Color-wheel scheme.
    #[arg(long, value_enum, default_value_t = SchemeArg::Complementary)]
    scheme: SchemeArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StyleArg {
    Linear,
    Smooth,
    Striped,
}

impl From<StyleArg> for TransitionStyle {
    fn from(s: StyleArg) -> Self {
        match s {
            StyleArg::Linear => TransitionStyle::Linear,
            StyleArg::Smooth => TransitionStyle::Smooth,
            StyleArg::Striped => TransitionStyle::Striped,
        }
    }
}

#[derive(Debug, Clone, Args)]
struct GradientArgs {
    /// Ordered gradient colors as #RRGGBB hex (repeat the flag).
    #[arg(long = "color", required = true)]
    colors: Vec<String>,

    /// Total number of rows in the project.
    #[arg(long)]
    rows: u32,

    /// Transition style.
    #[arg(long, value_enum, default_value_t = StyleArg::Linear)]
    style: StyleArg,

    /// Stripe width in rows (striped style only).
    #[arg(long, default_value = "4")]
    stripe_rows: u32,
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::DetectChart(args) => run_detect_chart(&args),
        Commands::Palette(args) => run_palette(&args),
        Commands::Harmony(args) => run_harmony(&args),
        Commands::Gradient(args) => run_gradient(&args),
    }
}

fn emit(value: &impl serde::Serialize, out: Option<&PathBuf>) -> CliResult<()> {
    let json = serde_json::to_string_pretty(value)?;
    match out {
        Some(path) => {
            std::fs::write(path, json)?;
            tracing::info!("results written to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn run_detect_chart(args: &DetectChartArgs) -> CliResult<()> {
    tracing::info!("loading image: {}", args.image.display());
    let bytes = std::fs::read(&args.image)?;

    let mut config = ChartConfig::default();
    config.preprocess.sharpen = !args.no_sharpen;
    let scanner = ChartScanner::new(config);
    let mut chart = scanner.detect_chart(&bytes)?;

    if let Some(path) = &args.corrections {
        let corrections: Vec<Correction> = serde_json::from_slice(&std::fs::read(path)?)?;
        tracing::info!("applying {} corrections", corrections.len());
        chart = apply_corrections(&chart, &corrections);
    }

    emit(&chart, args.out.as_ref())
}

fn run_palette(args: &PaletteArgs) -> CliResult<()> {
    tracing::info!("loading image: {}", args.image.display());
    let bytes = std::fs::read(&args.image)?;

    let config = QuantizeConfig {
        num_colors: args.colors.clamp(2, 10),
        seed: args.seed,
        ..QuantizeConfig::default()
    };
    let palette = stitchgrid::extract_palette(&bytes, &config)?;
    emit(&palette, args.out.as_ref())
}

fn run_harmony(args: &HarmonyArgs) -> CliResult<()> {
    let palette = stitchgrid::generate_palette(&args.base, args.scheme.into())?;
    emit(&palette, None)
}

fn run_gradient(args: &GradientArgs) -> CliResult<()> {
    let config = GradientConfig {
        colors: args.colors.clone(),
        total_rows: args.rows,
        style: args.style.into(),
        stripe_rows: args.stripe_rows,
    };
    let sequence = stitchgrid::generate_gradient_sequence(&config);
    emit(&sequence, None)
}
