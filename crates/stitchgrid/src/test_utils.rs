//! Shared synthetic-image helpers for unit tests.
//!
//! Consolidated here so the grid, cell, assembly, and quantizer tests all
//! render their fixtures the same way.

use image::{GrayImage, Luma, Rgb, RgbImage};

/// Build a grayscale image from a row-major pixel slice.
pub(crate) fn gray_image(w: u32, h: u32, pixels: &[u8]) -> GrayImage {
    assert_eq!(pixels.len(), (w * h) as usize);
    GrayImage::from_raw(w, h, pixels.to_vec()).unwrap()
}

/// Render a synthetic chart: `rows` x `cols` cells of `bg_pix` separated
/// by grid lines of `line_pix`, `line_px` pixels thick, drawn along the
/// top/left boundary of every cell.
pub(crate) fn draw_chart_image(
    w: u32,
    h: u32,
    rows: u32,
    cols: u32,
    line_px: u32,
    line_pix: u8,
    bg_pix: u8,
) -> GrayImage {
    let mut img = GrayImage::from_pixel(w, h, Luma([bg_pix]));
    let cell_w = w / cols;
    let cell_h = h / rows;

    for r in 0..rows {
        let y0 = r * cell_h;
        for dy in 0..line_px.min(h - y0) {
            for x in 0..w {
                img.put_pixel(x, y0 + dy, Luma([line_pix]));
            }
        }
    }
    for c in 0..cols {
        let x0 = c * cell_w;
        for dx in 0..line_px.min(w - x0) {
            for y in 0..h {
                img.put_pixel(x0 + dx, y, Luma([line_pix]));
            }
        }
    }
    img
}

/// Render a solid-color RGB image.
pub(crate) fn solid_image(w: u32, h: u32, rgb: [u8; 3]) -> RgbImage {
    RgbImage::from_pixel(w, h, Rgb(rgb))
}
