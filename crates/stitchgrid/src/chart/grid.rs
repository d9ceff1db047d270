//! Grid structure detection via edge projection histograms.
//!
//! Knitting charts are drawn on a visible grid with strong, evenly spaced
//! lines. A 3x3 Laplacian turns those lines into edge ridges; summing edge
//! intensity along each row and column produces 1-D projection histograms
//! whose peaks mark the grid lines. The mean gap between accepted peaks
//! estimates the cell pitch, from which row and column counts follow.
//!
//! The 30%-of-max peak threshold and the minimum peak spacing suppress
//! noise peaks raised by symbol strokes inside cells. Both are exposed in
//! [`GridConfig`] because low-contrast scans occasionally need a looser
//! threshold.

use image::GrayImage;
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, Result};

/// Configuration for grid detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Fraction of the projection maximum a sample must exceed to count
    /// as a peak candidate.
    pub peak_fraction: f32,
    /// Inclusive row-count clamp applied to the estimate.
    pub row_range: [u32; 2],
    /// Inclusive column-count clamp applied to the estimate.
    pub col_range: [u32; 2],
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            peak_fraction: 0.30,
            row_range: [3, 150],
            col_range: [3, 100],
        }
    }
}

/// Detected grid geometry for one chart image. Immutable once produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDetectionResult {
    /// Number of chart rows, clamped to the configured range.
    pub rows: u32,
    /// Number of chart columns, clamped to the configured range.
    pub cols: u32,
    /// Cell width in pixels (rounded `width / cols`).
    pub cell_width: u32,
    /// Cell height in pixels (rounded `height / rows`).
    pub cell_height: u32,
    /// Grid bounds `[x, y, width, height]` in image pixels.
    pub bounds: [u32; 4],
}

/// Detect the grid structure of a preprocessed chart image.
///
/// Fails with [`ChartError::GridDetection`] only when the image has no
/// usable axis (zero width or height); everything else degrades through
/// the fallback pitch estimate.
pub fn detect_grid(gray: &GrayImage, config: &GridConfig) -> Result<GridDetectionResult> {
    let (width, height) = gray.dimensions();
    if width == 0 || height == 0 {
        return Err(ChartError::grid("image has zero area"));
    }

    let edges = imageproc::filter::laplacian_filter(gray);

    // Projection histograms: per-row and per-column sums of edge intensity.
    let mut row_proj = vec![0.0f32; height as usize];
    let mut col_proj = vec![0.0f32; width as usize];
    for (x, y, p) in edges.enumerate_pixels() {
        let mag = p.0[0].unsigned_abs() as f32;
        row_proj[y as usize] += mag;
        col_proj[x as usize] += mag;
    }

    let row_peaks = find_peaks(&row_proj, config.peak_fraction);
    let col_peaks = find_peaks(&col_proj, config.peak_fraction);
    tracing::debug!(
        row_peaks = row_peaks.len(),
        col_peaks = col_peaks.len(),
        "projection peaks located"
    );

    let rows = axis_count(&row_peaks, height).clamp(config.row_range[0], config.row_range[1]);
    let cols = axis_count(&col_peaks, width).clamp(config.col_range[0], config.col_range[1]);

    let cell_width = (width as f32 / cols as f32).round().max(1.0) as u32;
    let cell_height = (height as f32 / rows as f32).round().max(1.0) as u32;

    tracing::info!(rows, cols, cell_width, cell_height, "grid detected");

    Ok(GridDetectionResult {
        rows,
        cols,
        cell_width,
        cell_height,
        bounds: [0, 0, width, height],
    })
}

/// Locate grid-line peaks in a projection histogram.
///
/// A sample qualifies when it exceeds `peak_fraction` of the histogram
/// maximum, is a local maximum (strictly above its predecessor, at least
/// its successor), and sits at least `max(10, len / 50)` samples past the
/// previously accepted peak.
fn find_peaks(projection: &[f32], peak_fraction: f32) -> Vec<usize> {
    let max = projection.iter().cloned().fold(0.0f32, f32::max);
    if max <= 0.0 {
        return Vec::new();
    }
    let threshold = max * peak_fraction;
    let min_spacing = (projection.len() / 50).max(10);

    let mut peaks: Vec<usize> = Vec::new();
    for i in 1..projection.len().saturating_sub(1) {
        if projection[i] <= threshold {
            continue;
        }
        if !(projection[i] > projection[i - 1] && projection[i] >= projection[i + 1]) {
            continue;
        }
        if let Some(&last) = peaks.last() {
            if i - last < min_spacing {
                continue;
            }
        }
        peaks.push(i);
    }
    peaks
}

/// Estimate the cell count along one axis from its accepted peaks.
///
/// With two or more peaks the pitch is the mean gap between consecutive
/// peaks; otherwise a size-derived fallback pitch keeps the estimate in a
/// plausible range for hand-drawn charts.
fn axis_count(peaks: &[usize], axis_len: u32) -> u32 {
    let axis = axis_len as f32;
    let spacing = if peaks.len() >= 2 {
        let gaps: f32 = peaks.windows(2).map(|w| (w[1] - w[0]) as f32).sum();
        gaps / (peaks.len() - 1) as f32
    } else {
        (axis / 30.0).max(20.0)
    };
    (axis / spacing).round().max(1.0) as u32
}
