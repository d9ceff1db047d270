//! Palette generation from color-wheel schemes and gradient row sequences.
//!
//! Schemes rotate the base hue on the HSL wheel; the monochromatic scheme
//! varies lightness instead. Gradient sequences assign colors to
//! contiguous row ranges over a project's total row count.

use serde::{Deserialize, Serialize};

use crate::color::space::{hex_to_hsl, hsl_to_hex};
use crate::error::Result;

/// Color-wheel scheme for palette generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scheme {
    /// Hues at -30, 0, +30 degrees.
    Analogous,
    /// Base plus the hue 180 degrees away.
    Complementary,
    /// Base plus hues at +120 and +240 degrees.
    Triadic,
    /// Base plus hues at +150 and +210 degrees.
    SplitComplementary,
    /// Base lightness plus l-20 and l+20, clamped to [20, 80].
    Monochromatic,
}

/// Generate a palette of hex colors from a base color and a scheme.
///
/// The base color is always included; hue rotations preserve saturation
/// and lightness. Fails only on an unparseable base hex string.
pub fn generate_palette(base_hex: &str, scheme: Scheme) -> Result<Vec<String>> {
    let base = hex_to_hsl(base_hex)?;
    let palette = match scheme {
        Scheme::Analogous => vec![base.rotate(-30.0), base, base.rotate(30.0)],
        Scheme::Complementary => vec![base, base.rotate(180.0)],
        Scheme::Triadic => vec![base, base.rotate(120.0), base.rotate(240.0)],
        Scheme::SplitComplementary => vec![base, base.rotate(150.0), base.rotate(210.0)],
        Scheme::Monochromatic => vec![
            base,
            base.with_lightness_clamped(base.l - 20.0, 20.0, 80.0),
            base.with_lightness_clamped(base.l + 20.0, 20.0, 80.0),
        ],
    };
    Ok(palette.into_iter().map(hsl_to_hex).collect())
}

/// How adjacent colors hand over across the row sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionStyle {
    /// Even row division; remainder rows go to the first colors.
    Linear,
    /// Linear spans widened by a fade band so adjacent colors overlap.
    Smooth,
    /// Fixed-width repeating stripes cycling through the colors.
    Striped,
}

/// Configuration for gradient row-sequence generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientConfig {
    /// Ordered colors participating in the gradient (hex strings).
    pub colors: Vec<String>,
    /// Total number of rows in the project.
    pub total_rows: u32,
    /// Transition style.
    pub style: TransitionStyle,
    /// Stripe width in rows; used by [`TransitionStyle::Striped`] only.
    pub stripe_rows: u32,
}

impl Default for GradientConfig {
    fn default() -> Self {
        Self {
            colors: Vec::new(),
            total_rows: 0,
            style: TransitionStyle::Linear,
            stripe_rows: 4,
        }
    }
}

/// Assignment of one color to a row range, 1-based and inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorTransition {
    /// Index into [`GradientConfig::colors`].
    pub color_index: usize,
    /// First row of the span (1-based).
    pub start_row: u32,
    /// Last row of the span (inclusive).
    pub end_row: u32,
    /// Share of total rows covered by this span, rounded to a whole percent.
    pub percentage: f32,
}

/// Generate the row-to-color assignment for a multi-color project.
///
/// Invariants: the sequence starts at row 1 and the last span ends exactly
/// at `total_rows`. Linear and striped spans are contiguous and
/// non-overlapping; smooth spans overlap by a fade band at each seam but
/// keep the same start and end rows overall. Empty color lists or zero
/// rows yield an empty sequence.
pub fn generate_gradient_sequence(config: &GradientConfig) -> Vec<ColorTransition> {
    if config.colors.is_empty() || config.total_rows == 0 {
        return Vec::new();
    }
    match config.style {
        TransitionStyle::Linear => linear_spans(config.colors.len(), config.total_rows),
        TransitionStyle::Smooth => smooth_spans(config.colors.len(), config.total_rows),
        TransitionStyle::Striped => striped_spans(
            config.colors.len(),
            config.total_rows,
            config.stripe_rows.max(1),
        ),
    }
}

fn percentage(span_rows: u32, total: u32) -> f32 {
    (span_rows as f32 / total as f32 * 100.0).round()
}

/// Even division; the first `total % n` colors absorb the remainder.
fn linear_spans(n: usize, total: u32) -> Vec<ColorTransition> {
    let n = n.min(total as usize);
    let base = total / n as u32;
    let remainder = total % n as u32;

    let mut out = Vec::with_capacity(n);
    let mut next_start = 1u32;
    for i in 0..n {
        let span = base + if (i as u32) < remainder { 1 } else { 0 };
        let end = next_start + span - 1;
        out.push(ColorTransition {
            color_index: i,
            start_row: next_start,
            end_row: end,
            percentage: percentage(span, total),
        });
        next_start = end + 1;
    }
    out
}

/// Linear spans widened symmetrically by a fade band so adjacent colors
/// overlap at the seams. Band width is a quarter of the per-color span,
/// at least one row.
fn smooth_spans(n: usize, total: u32) -> Vec<ColorTransition> {
    let linear = linear_spans(n, total);
    if linear.len() < 2 {
        return linear;
    }
    let per_color = total / linear.len() as u32;
    let fade = (per_color / 4).max(1);

    linear
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let start = if i == 0 {
                t.start_row
            } else {
                t.start_row.saturating_sub(fade).max(1)
            };
            let end = if i == linear.len() - 1 {
                t.end_row
            } else {
                (t.end_row + fade).min(total)
            };
            ColorTransition {
                color_index: t.color_index,
                start_row: start,
                end_row: end,
                percentage: percentage(end - start + 1, total),
            }
        })
        .collect()
}

/// Fixed-width stripes cycling through the colors; the final stripe is
/// truncated at the last row.
fn striped_spans(n: usize, total: u32, stripe_rows: u32) -> Vec<ColorTransition> {
    let mut out = Vec::new();
    let mut start = 1u32;
    let mut i = 0usize;
    while start <= total {
        let end = (start + stripe_rows - 1).min(total);
        out.push(ColorTransition {
            color_index: i % n,
            start_row: start,
            end_row: end,
            percentage: percentage(end - start + 1, total),
        });
        start = end + 1;
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::space::hex_to_hsl;

    fn spans_are_contiguous(spans: &[ColorTransition], total: u32) {
        assert_eq!(spans[0].start_row, 1);
        assert_eq!(spans[spans.len() - 1].end_row, total);
        for pair in spans.windows(2) {
            assert_eq!(pair[1].start_row, pair[0].end_row + 1);
        }
    }

    #[test]
    fn complementary_rotates_hue_half_turn() {
        let palette = generate_palette("#3366CC", Scheme::Complementary).unwrap();
        assert_eq!(palette.len(), 2);
        let base = hex_to_hsl("#3366CC").unwrap();
        let comp = hex_to_hsl(&palette[1]).unwrap();
        let expected = (base.h + 180.0).rem_euclid(360.0);
        assert!((comp.h - expected).abs() < 1.5, "hue {} vs {}", comp.h, expected);
        assert!((comp.s - base.s).abs() < 1.5);
        assert!((comp.l - base.l).abs() < 1.5);
    }

    #[test]
    fn analogous_returns_three_with_base_in_middle() {
        let palette = generate_palette("#CC3366", Scheme::Analogous).unwrap();
        assert_eq!(palette.len(), 3);
        assert_eq!(palette[1], "#CC3366");
    }

    #[test]
    fn triadic_and_split_counts() {
        assert_eq!(generate_palette("#00FF00", Scheme::Triadic).unwrap().len(), 3);
        assert_eq!(
            generate_palette("#00FF00", Scheme::SplitComplementary)
                .unwrap()
                .len(),
            3
        );
    }

    #[test]
    fn monochromatic_clamps_lightness() {
        // Base lightness 90 -> variants clamp to [20, 80].
        let palette = generate_palette("#E6E6E6", Scheme::Monochromatic).unwrap();
        let light = hex_to_hsl(&palette[2]).unwrap();
        assert!(light.l <= 81.0);
        let dark = hex_to_hsl(&palette[1]).unwrap();
        assert!(dark.l >= 19.0 && dark.l < hex_to_hsl(&palette[0]).unwrap().l);
    }

    #[test]
    fn bad_hex_is_an_error() {
        assert!(generate_palette("notacolor", Scheme::Triadic).is_err());
    }

    fn gradient(colors: usize, total_rows: u32, style: TransitionStyle) -> Vec<ColorTransition> {
        let config = GradientConfig {
            colors: (0..colors).map(|i| format!("#0000{:02X}", i)).collect(),
            total_rows,
            style,
            stripe_rows: 4,
        };
        generate_gradient_sequence(&config)
    }

    #[test]
    fn linear_spans_are_contiguous_and_cover_all_rows() {
        let spans = gradient(3, 100, TransitionStyle::Linear);
        assert_eq!(spans.len(), 3);
        spans_are_contiguous(&spans, 100);
        // Remainder row goes to the first color: 34 + 33 + 33.
        assert_eq!(spans[0].end_row - spans[0].start_row + 1, 34);
    }

    #[test]
    fn linear_exact_division_has_equal_spans() {
        let spans = gradient(4, 80, TransitionStyle::Linear);
        for s in &spans {
            assert_eq!(s.end_row - s.start_row + 1, 20);
            assert_eq!(s.percentage, 25.0);
        }
        spans_are_contiguous(&spans, 80);
    }

    #[test]
    fn striped_cycles_colors_and_truncates_last() {
        let spans = gradient(2, 10, TransitionStyle::Striped);
        spans_are_contiguous(&spans, 10);
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[0].color_index, 0);
        assert_eq!(spans[1].color_index, 1);
        assert_eq!(spans[2].color_index, 0);
        assert_eq!(spans[2].end_row - spans[2].start_row + 1, 2);
    }

    #[test]
    fn smooth_overlaps_interior_seams_only() {
        let spans = gradient(3, 60, TransitionStyle::Smooth);
        assert_eq!(spans[0].start_row, 1);
        assert_eq!(spans[2].end_row, 60);
        // Interior seams overlap.
        assert!(spans[1].start_row <= spans[0].end_row);
        assert!(spans[2].start_row <= spans[1].end_row);
    }

    #[test]
    fn more_colors_than_rows_drops_extras() {
        let spans = gradient(5, 3, TransitionStyle::Linear);
        assert_eq!(spans.len(), 3);
        spans_are_contiguous(&spans, 3);
    }

    #[test]
    fn empty_inputs_yield_empty_sequence() {
        assert!(gradient(0, 10, TransitionStyle::Linear).is_empty());
        assert!(gradient(3, 0, TransitionStyle::Smooth).is_empty());
    }
}
