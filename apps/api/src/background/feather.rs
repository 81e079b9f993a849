//! Edge feathering: a Gaussian blur over the matted image.

use image::imageops;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::background::raster::RasterImage;
use crate::background::RemovalError;

const MIN_SIGMA: f32 = 0.3;
const MAX_SIGMA: f32 = 2.0;

/// Optional post-processing applied after any removal method.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PostProcessing {
    pub smooth_edges: bool,
    pub feather_amount: f64,
}

impl PostProcessing {
    /// Blur sigma to apply, or `None` when no feathering is requested.
    pub fn blur_sigma(&self) -> Option<f32> {
        let requested = self.smooth_edges || self.feather_amount > 0.0;
        if !requested || self.feather_amount <= 0.0 {
            return None;
        }
        Some(((self.feather_amount / 10.0) as f32).clamp(MIN_SIGMA, MAX_SIGMA))
    }
}

/// Feathers the image. Returns the input untouched when no blur is requested.
pub fn feather(image: RasterImage, post: &PostProcessing) -> Result<RasterImage, RemovalError> {
    let Some(sigma) = post.blur_sigma() else {
        return Ok(image);
    };

    debug!("Feathering {}x{} image (sigma {sigma})", image.width(), image.height());
    let rgba = image.into_rgba_image()?;
    Ok(RasterImage::from_rgba_image(imageops::blur(&rgba, sigma)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::raster::RGBA;

    fn checkerboard() -> RasterImage {
        let mut pixels = Vec::new();
        for y in 0..4u32 {
            for x in 0..4u32 {
                let alpha = if (x + y) % 2 == 0 { 0 } else { 255 };
                pixels.extend_from_slice(&[10, 20, 30, alpha]);
            }
        }
        RasterImage::new(4, 4, RGBA, pixels).unwrap()
    }

    #[test]
    fn test_zero_feather_is_byte_identical() {
        let image = checkerboard();
        let post = PostProcessing {
            smooth_edges: true,
            feather_amount: 0.0,
        };
        assert_eq!(feather(image.clone(), &post).unwrap(), image);
        assert_eq!(feather(image.clone(), &PostProcessing::default()).unwrap(), image);
    }

    #[test]
    fn test_sigma_is_scaled_and_clamped() {
        let sigma = |feather_amount| {
            PostProcessing {
                smooth_edges: false,
                feather_amount,
            }
            .blur_sigma()
        };
        assert_eq!(sigma(1.0), Some(0.3));
        assert_eq!(sigma(15.0), Some(1.5));
        assert_eq!(sigma(100.0), Some(2.0));
        assert_eq!(sigma(-4.0), None);
    }

    #[test]
    fn test_feather_softens_alpha_edges() {
        let post = PostProcessing {
            smooth_edges: true,
            feather_amount: 20.0,
        };
        let blurred = feather(checkerboard(), &post).unwrap();
        let alpha = blurred.alpha_channel().unwrap();
        assert_eq!(alpha.len(), 16);
        assert!(alpha.iter().any(|&a| a > 0 && a < 255));
    }
}
