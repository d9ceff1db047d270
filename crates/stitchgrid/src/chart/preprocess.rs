//! Chart photo preprocessing: grayscale, contrast stretch, sharpening.
//!
//! Raw chart photos arrive with uneven exposure and soft focus. The
//! preprocessor converts to single-channel grayscale, stretches the
//! intensity histogram to the full `[0, 255]` range, and applies a 3x3
//! sharpening kernel so grid lines and symbol strokes survive the edge
//! detection that follows. Pure over the pixel data; the only failure is
//! an undecodable image.

use image::GrayImage;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Preprocessing controls.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Apply the 3x3 sharpening convolution after contrast stretch.
    pub sharpen: bool,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self { sharpen: true }
    }
}

/// Decode and normalize a chart photo for grid analysis.
pub fn preprocess(bytes: &[u8], config: &PreprocessConfig) -> Result<GrayImage> {
    let gray = image::load_from_memory(bytes)?.to_luma8();
    Ok(preprocess_gray(&gray, config))
}

/// Normalize an already-decoded grayscale image.
pub fn preprocess_gray(gray: &GrayImage, config: &PreprocessConfig) -> GrayImage {
    let stretched = stretch_contrast(gray);
    if config.sharpen {
        sharpen(&stretched)
    } else {
        stretched
    }
}

/// Apply the 3x3 sharpening convolution.
pub fn sharpen(gray: &GrayImage) -> GrayImage {
    imageproc::filter::sharpen3x3(gray)
}

/// Stretch the intensity histogram linearly to cover `[0, 255]`.
///
/// A flat image (single intensity) is returned unchanged since there is
/// no range to stretch.
pub fn stretch_contrast(gray: &GrayImage) -> GrayImage {
    let mut min = u8::MAX;
    let mut max = u8::MIN;
    for p in gray.pixels() {
        min = min.min(p.0[0]);
        max = max.max(p.0[0]);
    }
    if max <= min {
        return gray.clone();
    }

    let range = (max - min) as f32;
    let mut out = gray.clone();
    for p in out.pixels_mut() {
        let v = (p.0[0] - min) as f32 / range * 255.0;
        p.0[0] = v.round() as u8;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::gray_image;

    #[test]
    fn stretch_maps_extremes_to_full_range() {
        let img = gray_image(4, 1, &[100, 120, 140, 160]);
        let out = stretch_contrast(&img);
        assert_eq!(out.get_pixel(0, 0).0[0], 0);
        assert_eq!(out.get_pixel(3, 0).0[0], 255);
        // Midpoints stay ordered and roughly linear.
        assert_eq!(out.get_pixel(1, 0).0[0], 85);
        assert_eq!(out.get_pixel(2, 0).0[0], 170);
    }

    #[test]
    fn flat_image_passes_through() {
        let img = gray_image(3, 3, &[77; 9]);
        assert_eq!(stretch_contrast(&img), img);
    }

    #[test]
    fn preprocess_is_deterministic() {
        let img = gray_image(4, 4, &(0..16).map(|i| (i * 13) as u8).collect::<Vec<_>>());
        let config = PreprocessConfig::default();
        assert_eq!(preprocess_gray(&img, &config), preprocess_gray(&img, &config));
    }

    #[test]
    fn undecodable_bytes_error() {
        let err = preprocess(b"\x00\x01junk", &PreprocessConfig::default());
        assert!(matches!(
            err,
            Err(crate::error::ChartError::ImageDecode { .. })
        ));
    }

    #[test]
    fn sharpen_can_be_disabled() {
        let img = gray_image(4, 4, &(0..16).map(|i| (i * 16) as u8).collect::<Vec<_>>());
        let plain = preprocess_gray(&img, &PreprocessConfig { sharpen: false });
        assert_eq!(plain, stretch_contrast(&img));
    }

    #[test]
    fn preprocess_composes_the_standalone_steps() {
        let img = gray_image(4, 4, &(0..16).map(|i| (i * 13) as u8).collect::<Vec<_>>());
        let composed = preprocess_gray(&img, &PreprocessConfig::default());
        assert_eq!(composed, sharpen(&stretch_contrast(&img)));
    }
}
