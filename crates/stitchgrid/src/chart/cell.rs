//! Per-cell stitch symbol recognition from pixel-distribution heuristics.
//!
//! Each detected cell is cropped and resized to a canonical 32x32 patch so
//! the intensity statistics below are comparable across cell sizes. The
//! classifier is an ordered cascade of hand-tuned tests (first match
//! wins); the thresholds are calibrated against high-contrast chart scans
//! and deliberately not derived from the image, so they live in
//! [`CellConfig`] where callers can override them.
//!
//! The cascade never fails: an unmatched patch falls through to a
//! low-confidence knit stitch, and a degenerate crop is reported through
//! the explicit [`Recognition::fallback`] flag rather than an error.

use image::imageops::{self, FilterType};
use image::GrayImage;
use serde::{Deserialize, Serialize};

/// Canonical patch edge length after crop + resize.
pub const PATCH_SIZE: u32 = 32;

/// Thresholds for the recognition cascade.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CellConfig {
    /// Intensity below which a pixel counts as dark.
    pub dark_cutoff: u8,
    /// Intensity above which a pixel counts as light.
    pub light_cutoff: u8,
    /// Light-pixel fraction above which the cell reads as a knit.
    pub knit_light_ratio: f32,
    /// Dark-pixel fraction above which the cell reads as a purl.
    pub purl_dark_ratio: f32,
    /// Center-to-mean brightness ratio for the yarn-over test.
    pub yarnover_center_ratio: f32,
    /// Dark-fraction window `(lo, hi)` the yarn-over test requires; the
    /// ring around the hole must fill this much of the cell, no more.
    pub yarnover_dark_window: (f32, f32),
    /// Dark fraction of a diagonal above which it dominates (decreases).
    pub diagonal_dominance: f32,
    /// Dark fraction above which both diagonals together read as a cross.
    pub cross_threshold: f32,
}

impl Default for CellConfig {
    fn default() -> Self {
        Self {
            dark_cutoff: 100,
            light_cutoff: 200,
            knit_light_ratio: 0.8,
            purl_dark_ratio: 0.6,
            yarnover_center_ratio: 1.2,
            yarnover_dark_window: (0.3, 0.5),
            diagonal_dominance: 0.4,
            cross_threshold: 0.3,
        }
    }
}

/// Outcome of recognizing one cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recognition {
    /// Stitch symbol code (`"k"`, `"p"`, `"yo"`, `"k2tog"`, `"ssk"`, `"x"`).
    pub symbol: String,
    /// Classifier confidence in `[0, 1]`.
    pub confidence: f32,
    /// True when this is the degenerate-crop fallback rather than a
    /// cascade match.
    pub fallback: bool,
}

impl Recognition {
    fn matched(symbol: &str, confidence: f32) -> Self {
        Self {
            symbol: symbol.to_string(),
            confidence,
            fallback: false,
        }
    }

    /// Degenerate-crop fallback: a knit stitch at rock-bottom confidence.
    pub fn degenerate() -> Self {
        Self {
            symbol: "k".to_string(),
            confidence: 0.3,
            fallback: true,
        }
    }
}

/// Crop the cell at `(row, col)` and resize it to the canonical patch.
///
/// The crop is clamped to the image bounds; returns `None` when the cell
/// origin lies entirely outside the image (possible for the bottom/right
/// edge cells of an overestimated grid).
pub fn extract_cell(
    gray: &GrayImage,
    row: u32,
    col: u32,
    cell_width: u32,
    cell_height: u32,
) -> Option<GrayImage> {
    let (width, height) = gray.dimensions();
    let x0 = col.checked_mul(cell_width)?;
    let y0 = row.checked_mul(cell_height)?;
    if x0 >= width || y0 >= height || cell_width == 0 || cell_height == 0 {
        return None;
    }
    let w = cell_width.min(width - x0);
    let h = cell_height.min(height - y0);

    let crop = imageops::crop_imm(gray, x0, y0, w, h).to_image();
    Some(imageops::resize(
        &crop,
        PATCH_SIZE,
        PATCH_SIZE,
        FilterType::Nearest,
    ))
}

/// Classify a canonical patch into a stitch symbol with confidence.
pub fn recognize_symbol(patch: &GrayImage, config: &CellConfig) -> Recognition {
    let (w, h) = patch.dimensions();
    let total = (w * h) as f32;
    if total == 0.0 {
        return Recognition::degenerate();
    }

    let mut dark = 0u32;
    let mut light = 0u32;
    let mut sum = 0u64;
    for p in patch.pixels() {
        let v = p.0[0];
        sum += v as u64;
        if v < config.dark_cutoff {
            dark += 1;
        } else if v > config.light_cutoff {
            light += 1;
        }
    }
    let dark_ratio = dark as f32 / total;
    let light_ratio = light as f32 / total;
    let mean = sum as f32 / total;

    // 1. Mostly white: knit.
    if light_ratio > config.knit_light_ratio {
        return Recognition::matched("k", 0.75);
    }
    // 2. Mostly filled: purl.
    if dark_ratio > config.purl_dark_ratio {
        return Recognition::matched("p", 0.70);
    }
    // 3. Bright hole ringed by dark: yarn-over.
    let center = center_mean(patch);
    let (yo_lo, yo_hi) = config.yarnover_dark_window;
    if mean > 0.0
        && center / mean > config.yarnover_center_ratio
        && dark_ratio > yo_lo
        && dark_ratio < yo_hi
    {
        return Recognition::matched("yo", 0.65);
    }
    // 4. One dominant dark diagonal: a decrease, leaning with the stroke.
    let (main_dark, anti_dark, diag_len) = diagonal_dark_counts(patch, config.dark_cutoff);
    let dominance = (diag_len as f32 * config.diagonal_dominance) as u32;
    if main_dark > dominance && main_dark > anti_dark {
        return Recognition::matched("k2tog", 0.60);
    }
    if anti_dark > dominance && anti_dark > main_dark {
        return Recognition::matched("ssk", 0.60);
    }
    // 5. Both diagonals dark: crossed stitch.
    let cross = (diag_len as f32 * config.cross_threshold) as u32;
    if main_dark > cross && anti_dark > cross {
        return Recognition::matched("x", 0.65);
    }
    // 6. Nothing matched: assume knit, flag low confidence.
    Recognition::matched("k", 0.40)
}

/// Mean intensity of the central third of the patch.
fn center_mean(patch: &GrayImage) -> f32 {
    let (w, h) = patch.dimensions();
    let x0 = w / 3;
    let y0 = h / 3;
    let x1 = (2 * w / 3).max(x0 + 1).min(w);
    let y1 = (2 * h / 3).max(y0 + 1).min(h);

    let mut sum = 0u64;
    let mut count = 0u64;
    for y in y0..y1 {
        for x in x0..x1 {
            sum += patch.get_pixel(x, y).0[0] as u64;
            count += 1;
        }
    }
    if count == 0 {
        0.0
    } else {
        sum as f32 / count as f32
    }
}

/// Count dark pixels along the main and anti diagonals.
fn diagonal_dark_counts(patch: &GrayImage, dark_cutoff: u8) -> (u32, u32, u32) {
    let (w, h) = patch.dimensions();
    let n = w.min(h);
    let mut main = 0u32;
    let mut anti = 0u32;
    for i in 0..n {
        if patch.get_pixel(i, i).0[0] < dark_cutoff {
            main += 1;
        }
        if patch.get_pixel(n - 1 - i, i).0[0] < dark_cutoff {
            anti += 1;
        }
    }
    (main, anti, n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::gray_image;
    use image::Luma;

    fn patch_filled(value: u8) -> GrayImage {
        gray_image(
            PATCH_SIZE,
            PATCH_SIZE,
            &vec![value; (PATCH_SIZE * PATCH_SIZE) as usize],
        )
    }

    #[test]
    fn mostly_white_is_knit() {
        let rec = recognize_symbol(&patch_filled(250), &CellConfig::default());
        assert_eq!(rec.symbol, "k");
        assert_eq!(rec.confidence, 0.75);
        assert!(!rec.fallback);
    }

    #[test]
    fn mostly_dark_is_purl() {
        let rec = recognize_symbol(&patch_filled(30), &CellConfig::default());
        assert_eq!(rec.symbol, "p");
        assert_eq!(rec.confidence, 0.70);
    }

    /// Dark ring band with a bright center hole; dark ratio lands in
    /// the default (0.3, 0.5) window.
    fn ring_patch() -> GrayImage {
        let mut patch = patch_filled(150);
        for y in 0..PATCH_SIZE {
            for x in 0..PATCH_SIZE {
                let cx = x as f32 - 15.5;
                let cy = y as f32 - 15.5;
                let d = (cx * cx + cy * cy).sqrt();
                if d < 6.0 {
                    patch.put_pixel(x, y, Luma([255]));
                } else if d < 13.0 {
                    patch.put_pixel(x, y, Luma([20]));
                }
            }
        }
        patch
    }

    #[test]
    fn bright_center_with_dark_ring_is_yarnover() {
        let rec = recognize_symbol(&ring_patch(), &CellConfig::default());
        assert_eq!(rec.symbol, "yo");
        assert_eq!(rec.confidence, 0.65);
    }

    #[test]
    fn yarnover_dark_window_is_overridable() {
        // Narrowing the window below the ring's dark fraction suppresses
        // the yarn-over match.
        let config = CellConfig {
            yarnover_dark_window: (0.45, 0.5),
            ..CellConfig::default()
        };
        let rec = recognize_symbol(&ring_patch(), &config);
        assert_ne!(rec.symbol, "yo");
    }

    fn diagonal_patch(main: bool) -> GrayImage {
        // Mid-gray ground keeps the light/dark ratio tests from firing.
        let mut patch = patch_filled(150);
        for i in 0..PATCH_SIZE {
            let x = if main { i } else { PATCH_SIZE - 1 - i };
            for dx in -1i32..=1 {
                let xx = x as i32 + dx;
                if (0..PATCH_SIZE as i32).contains(&xx) {
                    patch.put_pixel(xx as u32, i, Luma([20]));
                }
            }
        }
        patch
    }

    #[test]
    fn main_diagonal_is_k2tog() {
        let rec = recognize_symbol(&diagonal_patch(true), &CellConfig::default());
        assert_eq!(rec.symbol, "k2tog");
        assert_eq!(rec.confidence, 0.60);
    }

    #[test]
    fn anti_diagonal_is_ssk() {
        let rec = recognize_symbol(&diagonal_patch(false), &CellConfig::default());
        assert_eq!(rec.symbol, "ssk");
        assert_eq!(rec.confidence, 0.60);
    }

    #[test]
    fn both_diagonals_is_cross() {
        let mut patch = patch_filled(150);
        for i in 0..PATCH_SIZE {
            patch.put_pixel(i, i, Luma([20]));
            patch.put_pixel(PATCH_SIZE - 1 - i, i, Luma([20]));
        }
        let rec = recognize_symbol(&patch, &CellConfig::default());
        assert_eq!(rec.symbol, "x");
        assert_eq!(rec.confidence, 0.65);
    }

    #[test]
    fn ambiguous_patch_falls_back_to_low_confidence_knit() {
        let rec = recognize_symbol(&patch_filled(150), &CellConfig::default());
        assert_eq!(rec.symbol, "k");
        assert_eq!(rec.confidence, 0.40);
        assert!(!rec.fallback);
    }

    #[test]
    fn extract_cell_resizes_to_canonical_patch() {
        let img = gray_image(60, 40, &vec![200; 60 * 40]);
        let patch = extract_cell(&img, 1, 2, 20, 20).unwrap();
        assert_eq!(patch.dimensions(), (PATCH_SIZE, PATCH_SIZE));
    }

    #[test]
    fn extract_cell_clamps_partial_edge_cells() {
        let img = gray_image(50, 50, &vec![200; 50 * 50]);
        // Cell starts at x = 40 with width 20: only 10 px remain.
        let patch = extract_cell(&img, 0, 2, 20, 20).unwrap();
        assert_eq!(patch.dimensions(), (PATCH_SIZE, PATCH_SIZE));
    }

    #[test]
    fn extract_cell_outside_image_is_none() {
        let img = gray_image(50, 50, &vec![200; 50 * 50]);
        assert!(extract_cell(&img, 10, 0, 20, 20).is_none());
        assert!(extract_cell(&img, 0, 0, 0, 20).is_none());
    }

    #[test]
    fn degenerate_recognition_is_flagged() {
        let rec = Recognition::degenerate();
        assert_eq!(rec.symbol, "k");
        assert_eq!(rec.confidence, 0.3);
        assert!(rec.fallback);
    }
}
