//! Background removal strategies.
//!
//! # Pipeline
//! 1. `ensure_alpha` — every strategy works on RGBA.
//! 2. Exactly one strategy runs (see `RemovalConfig`).
//! 3. Optional feathering (`feather::feather`).
//!
//! Strategies are simple heuristics; downstream consumers depend on their exact output.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::background::color::Color;
use crate::background::feather::{feather, PostProcessing};
use crate::background::raster::RasterImage;
use crate::background::RemovalError;

/// Fixed tolerance used after estimating the background from the borders.
pub const BORDER_HEURISTIC_TOLERANCE: f64 = 40.0;
/// Fraction of the image width sampled on each side by the border heuristic.
const BORDER_STRIP_FRACTION: f64 = 0.1;

// Rec. 709 luma weights.
const LUMA_R: f64 = 0.2126;
const LUMA_G: f64 = 0.7152;
const LUMA_B: f64 = 0.0722;

// ────────────────────────────────────────────────────────────────────────────
// Method and config types
// ────────────────────────────────────────────────────────────────────────────

/// Wire-level method selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemovalMethod {
    #[serde(rename = "color-based")]
    ColorBased,
    #[serde(rename = "edge-based")]
    EdgeBased,
    /// Exposed as `ai-based`; no model is involved, see `RemovalConfig::BorderHeuristic`.
    #[serde(rename = "ai-based")]
    BorderHeuristic,
    #[serde(rename = "manual")]
    Manual,
}

impl RemovalMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RemovalMethod::ColorBased => "color-based",
            RemovalMethod::EdgeBased => "edge-based",
            RemovalMethod::BorderHeuristic => "ai-based",
            RemovalMethod::Manual => "manual",
        }
    }
}

impl fmt::Display for RemovalMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RemovalMethod {
    type Err = RemovalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "color-based" => Ok(RemovalMethod::ColorBased),
            "edge-based" => Ok(RemovalMethod::EdgeBased),
            "ai-based" => Ok(RemovalMethod::BorderHeuristic),
            "manual" => Ok(RemovalMethod::Manual),
            other => Err(RemovalError::UnsupportedMethod(other.to_string())),
        }
    }
}

/// Strategy parameters, one variant per method carrying only what it uses.
#[derive(Debug, Clone, PartialEq)]
pub enum RemovalConfig {
    /// Key out pixels closer than `tolerance` to `target_color`.
    ColorBased { target_color: Color, tolerance: f64 },
    /// Global luminance threshold. Not real edge detection.
    EdgeBased { edge_threshold: f64 },
    /// Estimate the background from the left/right border strips, then key it out.
    BorderHeuristic,
    /// Mask-based removal. The mask is accepted but not applied yet.
    Manual { mask_path: String },
}

impl RemovalConfig {
    pub fn method(&self) -> RemovalMethod {
        match self {
            RemovalConfig::ColorBased { .. } => RemovalMethod::ColorBased,
            RemovalConfig::EdgeBased { .. } => RemovalMethod::EdgeBased,
            RemovalConfig::BorderHeuristic => RemovalMethod::BorderHeuristic,
            RemovalConfig::Manual { .. } => RemovalMethod::Manual,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemovalOptions {
    pub config: RemovalConfig,
    pub post: PostProcessing,
}

// ────────────────────────────────────────────────────────────────────────────
// Public entry points
// ────────────────────────────────────────────────────────────────────────────

/// Runs the removal pipeline on a decoded raster. The result is always RGBA.
pub fn remove_background(
    image: RasterImage,
    options: &RemovalOptions,
) -> Result<RasterImage, RemovalError> {
    let mut image = image.ensure_alpha();
    debug!("Running {} removal", options.config.method());

    match &options.config {
        RemovalConfig::ColorBased {
            target_color,
            tolerance,
        } => key_out_color(&mut image, target_color, *tolerance),
        RemovalConfig::EdgeBased { edge_threshold } => {
            luminance_threshold(&mut image, *edge_threshold)
        }
        RemovalConfig::BorderHeuristic => {
            let background = estimate_border_color(&image);
            debug!("Estimated background color from borders: {background:?}");
            key_out_color(&mut image, &background, BORDER_HEURISTIC_TOLERANCE);
        }
        RemovalConfig::Manual { mask_path } => {
            warn!("Manual mask {mask_path} accepted but not applied; passing image through");
        }
    }

    feather(image, &options.post)
}

/// Decodes `bytes`, runs the pipeline and encodes the result as PNG.
pub fn remove_background_png(
    bytes: &[u8],
    options: &RemovalOptions,
) -> Result<Vec<u8>, RemovalError> {
    let image = RasterImage::decode(bytes)?;
    debug!(
        "Decoded {}x{} image with {} channels",
        image.width(),
        image.height(),
        image.channels()
    );
    remove_background(image, options)?.encode_png()
}

// ────────────────────────────────────────────────────────────────────────────
// Strategies
// ────────────────────────────────────────────────────────────────────────────

/// Zeroes alpha where the pixel lies strictly closer than `tolerance` to `target`.
fn key_out_color(image: &mut RasterImage, target: &Color, tolerance: f64) {
    for px in image.rgba_pixels_mut() {
        let color = Color::new(px[0], px[1], px[2]);
        if color.distance(target) < tolerance {
            px[3] = 0;
        }
    }
}

/// Binarizes RGB on luminance: `>= threshold` becomes white, the rest black.
fn luminance_threshold(image: &mut RasterImage, threshold: f64) {
    for px in image.rgba_pixels_mut() {
        let luma =
            LUMA_R * f64::from(px[0]) + LUMA_G * f64::from(px[1]) + LUMA_B * f64::from(px[2]);
        let value = if luma >= threshold { 255 } else { 0 };
        px[..3].fill(value);
    }
}

/// Average color of the left and right border strips across all rows.
fn estimate_border_color(image: &RasterImage) -> Color {
    let width = image.width();
    if width == 0 || image.height() == 0 {
        return Color::WHITE;
    }
    let strip = ((f64::from(width) * BORDER_STRIP_FRACTION).floor() as u32).clamp(1, width);

    let mut sums = [0u64; 3];
    let mut samples = 0u64;

    for y in 0..image.height() {
        let left = 0..strip;
        let right = width.saturating_sub(strip)..width;
        for x in left.chain(right) {
            let c = image.color_at(x, y);
            sums[0] += u64::from(c.r);
            sums[1] += u64::from(c.g);
            sums[2] += u64::from(c.b);
            samples += 1;
        }
    }

    let mean = |sum: u64| (sum as f64 / samples as f64).round() as u8;
    Color::new(mean(sums[0]), mean(sums[1]), mean(sums[2]))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
