//! Ranked palette extraction via k-means++ clustering.
//!
//! The image is downsampled to a small thumbnail, its pixels clustered in
//! RGB space with a perceptually weighted distance, and the surviving
//! clusters are ranked by population. Initialization follows k-means++:
//! the first centroid is sampled uniformly, each subsequent centroid with
//! probability proportional to its squared distance from the nearest
//! already-chosen centroid. Lloyd's iterations then run until assignments
//! stop changing or the iteration cap is reached.
//!
//! Clustering is reproducible: the RNG is seeded from
//! [`QuantizeConfig::seed`], so identical bytes and config produce an
//! identical palette.

use image::RgbImage;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::color::space::{name_color, Rgb};
use crate::error::Result;

/// Configuration for palette extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuantizeConfig {
    /// Number of clusters to request. Callers typically clamp to [2, 10];
    /// zero yields an empty palette.
    pub num_colors: usize,
    /// Maximum Lloyd's iterations before giving up on convergence.
    pub max_iterations: usize,
    /// Thumbnail edge length (pixels); the image is downscaled to fit
    /// within a `sample_size` square before clustering.
    pub sample_size: u32,
    /// RNG seed for k-means++ initialization.
    pub seed: u64,
}

impl Default for QuantizeConfig {
    fn default() -> Self {
        Self {
            num_colors: 6,
            max_iterations: 20,
            sample_size: 100,
            seed: 0,
        }
    }
}

/// One entry of a ranked palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedColor {
    /// `#RRGGBB` representation of the cluster centroid.
    pub hex: String,
    /// Share of sampled pixels assigned to this cluster, rounded to a
    /// whole percent.
    pub percentage: f32,
    /// Nearest named color for display.
    pub name: String,
}

/// Perceptually weighted squared RGB distance.
///
/// Weights the red and blue channels by the mean red level of the pair,
/// approximating perceptual non-uniformity without leaving RGB space:
/// `d2 = (2 + rMean/256)*dr2 + 4*dg2 + (2 + (255 - rMean)/256)*db2`.
fn weighted_distance_sq(a: [f32; 3], b: [f32; 3]) -> f32 {
    let r_mean = (a[0] + b[0]) / 2.0;
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    (2.0 + r_mean / 256.0) * dr * dr
        + 4.0 * dg * dg
        + (2.0 + (255.0 - r_mean) / 256.0) * db * db
}

/// Extract a ranked palette from raw image bytes.
///
/// The only fatal failure is an undecodable image. Degenerate inputs
/// (zero clusters requested, fewer distinct colors than `num_colors`)
/// yield a shorter or empty list rather than an error.
pub fn extract_palette(bytes: &[u8], config: &QuantizeConfig) -> Result<Vec<ExtractedColor>> {
    let decoded = image::load_from_memory(bytes)?;
    let thumb = decoded
        .thumbnail(config.sample_size, config.sample_size)
        .to_rgb8();
    Ok(extract_palette_from_image(&thumb, config))
}

/// Cluster the pixels of an already-decoded RGB image.
pub fn extract_palette_from_image(img: &RgbImage, config: &QuantizeConfig) -> Vec<ExtractedColor> {
    let pixels: Vec<[f32; 3]> = img
        .pixels()
        .map(|p| [p.0[0] as f32, p.0[1] as f32, p.0[2] as f32])
        .collect();
    extract_palette_from_pixels(&pixels, config)
}

fn extract_palette_from_pixels(
    pixels: &[[f32; 3]],
    config: &QuantizeConfig,
) -> Vec<ExtractedColor> {
    if pixels.is_empty() || config.num_colors == 0 {
        return Vec::new();
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let centroids = plus_plus_init(&mut rng, pixels, config.num_colors);
    let (centroids, counts) = lloyds(pixels, centroids, config.max_iterations);

    tracing::debug!(
        clusters = centroids.len(),
        pixels = pixels.len(),
        "palette clustering finished"
    );

    rank_clusters(&centroids, &counts, pixels.len())
}

/// k-means++ seeding: squared-min-distance weighted sampling.
///
/// Stops early (returning fewer centroids) when every pixel already
/// coincides with a chosen centroid, which happens when the image has
/// fewer distinct colors than `k`.
fn plus_plus_init(rng: &mut StdRng, pixels: &[[f32; 3]], k: usize) -> Vec<[f32; 3]> {
    let n = pixels.len();
    let k = k.min(n);
    let mut centroids = Vec::with_capacity(k);

    let first = pixels[rng.gen_range(0..n)];
    centroids.push(first);

    let mut min_dist: Vec<f32> = pixels
        .iter()
        .map(|&p| weighted_distance_sq(p, first))
        .collect();

    while centroids.len() < k {
        let total: f32 = min_dist.iter().sum();
        if total <= f32::EPSILON {
            break;
        }
        let threshold = rng.gen::<f32>() * total;
        let mut cumsum = 0.0;
        let mut chosen = n - 1;
        for (i, &d) in min_dist.iter().enumerate() {
            cumsum += d;
            if cumsum > threshold {
                chosen = i;
                break;
            }
        }
        let c = pixels[chosen];
        centroids.push(c);
        for (d, &p) in min_dist.iter_mut().zip(pixels.iter()) {
            let nd = weighted_distance_sq(p, c);
            if nd < *d {
                *d = nd;
            }
        }
    }

    centroids
}

/// Lloyd's iterations: assign, recompute, stop when nothing moves.
///
/// Returns the final centroids and per-cluster pixel counts; empty
/// clusters survive here and are dropped during ranking.
fn lloyds(
    pixels: &[[f32; 3]],
    mut centroids: Vec<[f32; 3]>,
    max_iterations: usize,
) -> (Vec<[f32; 3]>, Vec<usize>) {
    let k = centroids.len();
    let mut assignment = vec![0usize; pixels.len()];

    for iteration in 0..max_iterations {
        let mut changed = false;
        for (i, &p) in pixels.iter().enumerate() {
            let mut best = 0;
            let mut best_d = f32::INFINITY;
            for (j, &c) in centroids.iter().enumerate() {
                let d = weighted_distance_sq(p, c);
                if d < best_d {
                    best_d = d;
                    best = j;
                }
            }
            if assignment[i] != best || iteration == 0 {
                assignment[i] = best;
                changed = true;
            }
        }
        if !changed {
            break;
        }

        let mut sums = vec![[0.0f32; 3]; k];
        let mut sizes = vec![0usize; k];
        for (&p, &a) in pixels.iter().zip(assignment.iter()) {
            sums[a][0] += p[0];
            sums[a][1] += p[1];
            sums[a][2] += p[2];
            sizes[a] += 1;
        }
        for (c, (&s, &cnt)) in centroids.iter_mut().zip(sums.iter().zip(sizes.iter())) {
            if cnt > 0 {
                *c = [s[0] / cnt as f32, s[1] / cnt as f32, s[2] / cnt as f32];
            }
        }
    }

    let mut counts = vec![0usize; k];
    for &a in &assignment {
        counts[a] += 1;
    }
    (centroids, counts)
}

/// Drop empties, rank by population, merge duplicate hex values, and
/// convert to the public palette representation.
fn rank_clusters(
    centroids: &[[f32; 3]],
    counts: &[usize],
    total: usize,
) -> Vec<ExtractedColor> {
    let mut ranked: Vec<(Rgb, usize)> = Vec::new();
    for (&c, &count) in centroids.iter().zip(counts.iter()) {
        if count == 0 {
            continue;
        }
        let rgb = Rgb::new(
            c[0].round().clamp(0.0, 255.0) as u8,
            c[1].round().clamp(0.0, 255.0) as u8,
            c[2].round().clamp(0.0, 255.0) as u8,
        );
        match ranked.iter_mut().find(|(existing, _)| *existing == rgb) {
            Some((_, existing_count)) => *existing_count += count,
            None => ranked.push((rgb, count)),
        }
    }
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    ranked
        .into_iter()
        .map(|(rgb, count)| ExtractedColor {
            hex: rgb.to_hex(),
            percentage: (count as f32 / total as f32 * 100.0).round(),
            name: name_color(rgb).to_string(),
        })
        .collect()
}
