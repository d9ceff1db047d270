//! Color space math: hex/RGB/HSL conversions, WCAG contrast, naming.
//!
//! All conversions are plain arithmetic over 8-bit sRGB values. Hue is
//! expressed in degrees `[0, 360)`, saturation and lightness in percent
//! `[0, 100]`, matching the conventions of the harmony module.

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, Result};

/// An 8-bit sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Format as `#RRGGBB`.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Parse a `#RRGGBB` (or `RRGGBB`) hex string.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ChartError::InvalidColor { value: hex.into() });
        }
        let parse = |s: &str| u8::from_str_radix(s, 16).unwrap_or(0);
        Ok(Self {
            r: parse(&digits[0..2]),
            g: parse(&digits[2..4]),
            b: parse(&digits[4..6]),
        })
    }
}

/// Hue/saturation/lightness representation of an sRGB color.
///
/// `h` in degrees `[0, 360)`, `s` and `l` in percent `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

impl Hsl {
    pub fn new(h: f32, s: f32, l: f32) -> Self {
        Self {
            h: h.rem_euclid(360.0),
            s: s.clamp(0.0, 100.0),
            l: l.clamp(0.0, 100.0),
        }
    }

    /// Rotate hue by `degrees`, wrapping into `[0, 360)`.
    pub fn rotate(self, degrees: f32) -> Self {
        Self::new(self.h + degrees, self.s, self.l)
    }

    /// Replace lightness, clamping to `[lo, hi]` percent.
    pub fn with_lightness_clamped(self, l: f32, lo: f32, hi: f32) -> Self {
        Self::new(self.h, self.s, l.clamp(lo, hi))
    }
}

/// Convert sRGB to HSL.
pub fn rgb_to_hsl(rgb: Rgb) -> Hsl {
    let r = rgb.r as f32 / 255.0;
    let g = rgb.g as f32 / 255.0;
    let b = rgb.b as f32 / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if (max - min).abs() < f32::EPSILON {
        return Hsl::new(0.0, 0.0, l * 100.0);
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    Hsl::new(h * 60.0, s * 100.0, l * 100.0)
}

fn hue_to_channel(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// Convert HSL back to sRGB.
pub fn hsl_to_rgb(hsl: Hsl) -> Rgb {
    let h = hsl.h / 360.0;
    let s = hsl.s / 100.0;
    let l = hsl.l / 100.0;

    if s < f32::EPSILON {
        let v = (l * 255.0).round() as u8;
        return Rgb::new(v, v, v);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let r = hue_to_channel(p, q, h + 1.0 / 3.0);
    let g = hue_to_channel(p, q, h);
    let b = hue_to_channel(p, q, h - 1.0 / 3.0);
    Rgb::new(
        (r * 255.0).round() as u8,
        (g * 255.0).round() as u8,
        (b * 255.0).round() as u8,
    )
}

/// Parse hex into HSL in one step.
pub fn hex_to_hsl(hex: &str) -> Result<Hsl> {
    Ok(rgb_to_hsl(Rgb::from_hex(hex)?))
}

/// Format an HSL color as `#RRGGBB`.
pub fn hsl_to_hex(hsl: Hsl) -> String {
    hsl_to_rgb(hsl).to_hex()
}

/// WCAG relative luminance of an sRGB color, in `[0, 1]`.
pub fn relative_luminance(rgb: Rgb) -> f32 {
    fn linearize(c: u8) -> f32 {
        let c = c as f32 / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }
    0.2126 * linearize(rgb.r) + 0.7152 * linearize(rgb.g) + 0.0722 * linearize(rgb.b)
}

/// WCAG contrast ratio between two colors, in `[1, 21]`.
///
/// Symmetric in its arguments; 4.5 is the AA threshold for normal text.
pub fn contrast_ratio(a: Rgb, b: Rgb) -> f32 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    let (hi, lo) = if la >= lb { (la, lb) } else { (lb, la) };
    (hi + 0.05) / (lo + 0.05)
}

/// Reference table for nearest-name lookup. Values chosen to match common
/// yarn colorway vocabulary rather than CSS color keywords.
const NAMED_COLORS: &[(&str, u8, u8, u8)] = &[
    ("White", 255, 255, 255),
    ("Cream", 255, 253, 208),
    ("Beige", 245, 245, 220),
    ("Tan", 210, 180, 140),
    ("Brown", 139, 94, 60),
    ("Chocolate", 92, 64, 51),
    ("Black", 20, 20, 20),
    ("Charcoal", 54, 69, 79),
    ("Gray", 128, 128, 128),
    ("Silver", 192, 192, 192),
    ("Red", 220, 20, 60),
    ("Burgundy", 128, 0, 32),
    ("Coral", 255, 127, 80),
    ("Salmon", 250, 128, 114),
    ("Pink", 255, 182, 193),
    ("Magenta", 255, 0, 144),
    ("Orange", 255, 140, 0),
    ("Rust", 183, 65, 14),
    ("Gold", 255, 200, 46),
    ("Mustard", 225, 173, 1),
    ("Yellow", 255, 235, 59),
    ("Olive", 128, 128, 0),
    ("Lime", 154, 205, 50),
    ("Green", 60, 140, 60),
    ("Forest Green", 34, 84, 61),
    ("Mint", 170, 240, 209),
    ("Teal", 0, 128, 128),
    ("Turquoise", 64, 224, 208),
    ("Sky Blue", 135, 206, 235),
    ("Blue", 50, 90, 200),
    ("Navy", 20, 30, 90),
    ("Denim", 60, 90, 140),
    ("Lavender", 200, 180, 230),
    ("Purple", 128, 60, 160),
    ("Plum", 142, 69, 133),
];

/// Name a color by its nearest entry in the reference table.
pub fn name_color(rgb: Rgb) -> &'static str {
    let mut best = NAMED_COLORS[0].0;
    let mut best_d = u32::MAX;
    for &(name, r, g, b) in NAMED_COLORS {
        let dr = rgb.r as i32 - r as i32;
        let dg = rgb.g as i32 - g as i32;
        let db = rgb.b as i32 - b as i32;
        let d = (dr * dr + dg * dg + db * db) as u32;
        if d < best_d {
            best_d = d;
            best = name;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parse_and_format() {
        let c = Rgb::from_hex("#3366CC").unwrap();
        assert_eq!(c, Rgb::new(0x33, 0x66, 0xCC));
        assert_eq!(c.to_hex(), "#3366CC");
        assert_eq!(Rgb::from_hex("ff0000").unwrap(), Rgb::new(255, 0, 0));
    }

    #[test]
    fn hex_parse_rejects_garbage() {
        assert!(Rgb::from_hex("#12345").is_err());
        assert!(Rgb::from_hex("zzzzzz").is_err());
        assert!(Rgb::from_hex("").is_err());
    }

    #[test]
    fn primary_hues() {
        assert_eq!(rgb_to_hsl(Rgb::new(255, 0, 0)).h, 0.0);
        assert!((rgb_to_hsl(Rgb::new(0, 255, 0)).h - 120.0).abs() < 0.5);
        assert!((rgb_to_hsl(Rgb::new(0, 0, 255)).h - 240.0).abs() < 0.5);
    }

    #[test]
    fn gray_has_zero_saturation() {
        let hsl = rgb_to_hsl(Rgb::new(128, 128, 128));
        assert_eq!(hsl.s, 0.0);
        assert!((hsl.l - 50.2).abs() < 1.0);
    }

    #[test]
    fn hsl_round_trip_within_one_unit_per_channel() {
        // Exhaustive over a coarse lattice plus the channel extremes.
        let samples: Vec<u8> = (0..=255).step_by(17).collect();
        for &r in &samples {
            for &g in &samples {
                for &b in &samples {
                    let orig = Rgb::new(r, g, b);
                    let back = hsl_to_rgb(rgb_to_hsl(orig));
                    assert!(
                        (orig.r as i32 - back.r as i32).abs() <= 1
                            && (orig.g as i32 - back.g as i32).abs() <= 1
                            && (orig.b as i32 - back.b as i32).abs() <= 1,
                        "round trip drifted: {:?} -> {:?}",
                        orig,
                        back
                    );
                }
            }
        }
    }

    #[test]
    fn contrast_ratio_black_white() {
        let ratio = contrast_ratio(Rgb::new(0, 0, 0), Rgb::new(255, 255, 255));
        assert!((ratio - 21.0).abs() < 0.1);
        // Symmetry
        let flipped = contrast_ratio(Rgb::new(255, 255, 255), Rgb::new(0, 0, 0));
        assert_eq!(ratio, flipped);
    }

    #[test]
    fn contrast_ratio_self_is_one() {
        let c = Rgb::new(90, 140, 200);
        assert!((contrast_ratio(c, c) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn names_obvious_colors() {
        assert_eq!(name_color(Rgb::new(255, 255, 255)), "White");
        assert_eq!(name_color(Rgb::new(0, 0, 0)), "Black");
        assert_eq!(name_color(Rgb::new(25, 35, 95)), "Navy");
    }

    #[test]
    fn hue_rotation_wraps() {
        let base = Hsl::new(350.0, 50.0, 50.0);
        assert!((base.rotate(30.0).h - 20.0).abs() < 1e-3);
        assert!((base.rotate(-360.0).h - 350.0).abs() < 1e-3);
    }
}
