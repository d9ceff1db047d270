//! Chart assembly: orchestrates preprocessing, grid detection, and
//! per-cell recognition into a [`DetectedChart`].
//!
//! The assembler walks the detected grid row-major. Per-cell problems are
//! never fatal: a cell whose crop degenerates is recorded as the fallback
//! recognition and flagged unrecognized, and the walk continues. Only the
//! image-decode and grid-detection failures cross this boundary.

use image::GrayImage;
use serde::{Deserialize, Serialize};

use crate::chart::cell::{extract_cell, recognize_symbol, CellConfig, Recognition};
use crate::chart::grid::{detect_grid, GridConfig, GridDetectionResult};
use crate::chart::preprocess::{preprocess_gray, PreprocessConfig};
use crate::error::Result;

/// Threshold below which a cell is listed as unrecognized.
const UNRECOGNIZED_BELOW: f32 = 0.5;

/// Full configuration for chart detection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub preprocess: PreprocessConfig,
    pub grid: GridConfig,
    pub cell: CellConfig,
}

/// A fully recognized chart grid.
///
/// Shape invariant: `grid.len() == rows` and every `grid[i].len() == cols`;
/// `cell_confidences` mirrors the same shape. Instances are only modified
/// through [`apply_corrections`], which returns a new chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedChart {
    /// Stitch symbols, row-major.
    pub grid: Vec<Vec<String>>,
    /// Per-cell classifier confidence in `[0, 1]`, same shape as `grid`.
    pub cell_confidences: Vec<Vec<f32>>,
    /// Arithmetic mean of every cell confidence.
    pub overall_confidence: f32,
    /// `(row, col)` positions whose confidence fell below 0.5.
    pub unrecognized_cells: Vec<(u32, u32)>,
    /// Number of chart rows.
    pub rows: u32,
    /// Number of chart columns.
    pub cols: u32,
}

/// A user-supplied fix for one recognized cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correction {
    pub row: u32,
    pub col: u32,
    /// Replacement stitch symbol.
    pub symbol: String,
}

/// Primary chart-detection interface.
///
/// Wraps a [`ChartConfig`]; create once, detect on many images.
///
/// # Examples
///
/// ```no_run
/// use stitchgrid::ChartScanner;
///
/// let scanner = ChartScanner::default();
/// let bytes = std::fs::read("chart.png")?;
/// let chart = scanner.detect_chart(&bytes)?;
/// println!("{}x{} cells", chart.rows, chart.cols);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ChartScanner {
    config: ChartConfig,
}

impl ChartScanner {
    pub fn new(config: ChartConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ChartConfig {
        &mut self.config
    }

    /// Detect a chart from raw image bytes.
    ///
    /// Decodes only; normalization happens once, inside
    /// [`detect_chart_gray`](Self::detect_chart_gray).
    pub fn detect_chart(&self, bytes: &[u8]) -> Result<DetectedChart> {
        let gray = image::load_from_memory(bytes)?.to_luma8();
        self.detect_chart_gray(&gray)
    }

    /// Detect a chart from an already-decoded grayscale image.
    ///
    /// The image is normalized, the grid located, and every cell
    /// classified row-major.
    pub fn detect_chart_gray(&self, gray: &GrayImage) -> Result<DetectedChart> {
        let normalized = preprocess_gray(gray, &self.config.preprocess);
        let layout = detect_grid(&normalized, &self.config.grid)?;
        Ok(self.recognize_cells(&normalized, &layout))
    }

    fn recognize_cells(&self, gray: &GrayImage, layout: &GridDetectionResult) -> DetectedChart {
        let mut grid = Vec::with_capacity(layout.rows as usize);
        let mut confidences = Vec::with_capacity(layout.rows as usize);
        let mut unrecognized = Vec::new();
        let mut confidence_sum = 0.0f64;

        for row in 0..layout.rows {
            let mut symbols = Vec::with_capacity(layout.cols as usize);
            let mut row_conf = Vec::with_capacity(layout.cols as usize);
            for col in 0..layout.cols {
                let rec = match extract_cell(
                    gray,
                    row,
                    col,
                    layout.cell_width,
                    layout.cell_height,
                ) {
                    Some(patch) => recognize_symbol(&patch, &self.config.cell),
                    None => Recognition::degenerate(),
                };
                confidence_sum += rec.confidence as f64;
                if rec.confidence < UNRECOGNIZED_BELOW {
                    unrecognized.push((row, col));
                }
                symbols.push(rec.symbol);
                row_conf.push(rec.confidence);
            }
            grid.push(symbols);
            confidences.push(row_conf);
        }

        let cell_count = (layout.rows * layout.cols) as f64;
        let overall = (confidence_sum / cell_count) as f32;
        tracing::info!(
            rows = layout.rows,
            cols = layout.cols,
            overall_confidence = overall,
            unrecognized = unrecognized.len(),
            "chart assembled"
        );

        DetectedChart {
            grid,
            cell_confidences: confidences,
            overall_confidence: overall,
            unrecognized_cells: unrecognized,
            rows: layout.rows,
            cols: layout.cols,
        }
    }
}

/// Apply user corrections to a chart, returning a new chart.
///
/// Corrections outside the grid are silently ignored. A corrected cell is
/// certain by definition: its confidence becomes 1.0 and it leaves the
/// unrecognized list; the overall confidence is recomputed as the exact
/// mean of the updated matrix. Applying the same corrections twice yields
/// the same chart as applying them once.
pub fn apply_corrections(chart: &DetectedChart, corrections: &[Correction]) -> DetectedChart {
    let mut out = chart.clone();
    for c in corrections {
        if c.row >= out.rows || c.col >= out.cols {
            continue;
        }
        let (r, col) = (c.row as usize, c.col as usize);
        out.grid[r][col] = c.symbol.clone();
        out.cell_confidences[r][col] = 1.0;
        out.unrecognized_cells
            .retain(|&(ur, uc)| !(ur == c.row && uc == c.col));
    }

    let cell_count = (out.rows * out.cols) as f64;
    if cell_count > 0.0 {
        let sum: f64 = out
            .cell_confidences
            .iter()
            .flatten()
            .map(|&c| c as f64)
            .sum();
        out.overall_confidence = (sum / cell_count) as f32;
    }
    out
}
