//! stitchgrid — knitting-chart grid extraction and color palette analysis.
//!
//! Two independent pipelines over raw image bytes:
//!
//! 1. **Chart** – preprocess (grayscale, contrast stretch, sharpen) →
//!    grid detection (Laplacian edges + projection-histogram peaks) →
//!    per-cell stitch recognition (pixel-distribution heuristics) →
//!    assembly into a [`DetectedChart`] with per-cell confidences.
//! 2. **Color** – downsample → k-means++ clustering into a ranked
//!    [`ExtractedColor`] palette; plus color-wheel harmony schemes and
//!    gradient row sequences for multi-color projects.
//!
//! Both pipelines are pure over the pixel data: no I/O beyond the initial
//! decode, no persistence, no network. Clustering is reproducible through
//! the seed carried in [`QuantizeConfig`]. The recognition heuristics are
//! deliberately simple hand-tuned thresholds; the manual-correction flow
//! ([`apply_corrections`]) is calibrated to their confidence values.
//!
//! # Public API
//! - [`ChartScanner`] / [`ChartConfig`] for chart detection
//! - [`extract_palette`] / [`QuantizeConfig`] for palettes
//! - [`generate_palette`] and [`generate_gradient_sequence`] for harmony
//! - [`ChartError`] for the two fatal failure modes
//!
//! # Examples
//!
//! ```no_run
//! use stitchgrid::{ChartScanner, QuantizeConfig};
//!
//! let bytes = std::fs::read("chart.png")?;
//! let chart = ChartScanner::default().detect_chart(&bytes)?;
//! println!("{} rows, {} cols, confidence {:.2}",
//!     chart.rows, chart.cols, chart.overall_confidence);
//!
//! let palette = stitchgrid::extract_palette(&bytes, &QuantizeConfig::default())?;
//! for color in &palette {
//!     println!("{} {} {}%", color.hex, color.name, color.percentage);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod chart;
pub mod color;
pub mod error;

#[cfg(test)]
pub(crate) mod test_utils;

pub use chart::{
    apply_corrections, detect_grid, ChartConfig, ChartScanner, CellConfig, Correction,
    DetectedChart, GridConfig, GridDetectionResult, PreprocessConfig, Recognition,
};
pub use color::{
    contrast_ratio, extract_palette, generate_gradient_sequence, generate_palette, hex_to_hsl,
    hsl_to_hex, name_color, relative_luminance, ColorTransition, ExtractedColor, GradientConfig,
    Hsl, QuantizeConfig, Rgb, Scheme, TransitionStyle,
};
pub use error::{ChartError, Result};
