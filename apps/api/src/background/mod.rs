// Background removal: decode → ensure alpha → one strategy → optional feather → PNG.
// Pixel work is CPU-bound and must run inside tokio::task::spawn_blocking.

pub mod color;
pub mod feather;
pub mod fetch;
pub mod handlers;
pub mod methods;
pub mod raster;

use thiserror::Error;

pub use fetch::{FetchError, HttpImageFetcher, ImageFetcher};

#[derive(Debug, Error)]
pub enum RemovalError {
    #[error("Unsupported background removal method")]
    UnsupportedMethod(String),

    #[error("Invalid hex color: {0}")]
    InvalidColor(String),

    #[error("maskPath is required for manual background removal")]
    MissingMask,

    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error("Invalid raster buffer: {0}")]
    InvalidBuffer(String),
}
