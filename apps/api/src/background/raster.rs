//! Decoded raster buffers and their PNG/byte-level conversions.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::background::color::Color;
use crate::background::RemovalError;

pub const RGB: u8 = 3;
pub const RGBA: u8 = 4;
const OPAQUE: u8 = 255;

/// An interleaved 8-bit raster with 3 (RGB) or 4 (RGBA) channels.
///
/// Invariant: `pixels.len() == width * height * channels`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    channels: u8,
    pixels: Vec<u8>,
}

impl RasterImage {
    pub fn new(
        width: u32,
        height: u32,
        channels: u8,
        pixels: Vec<u8>,
    ) -> Result<Self, RemovalError> {
        if channels != RGB && channels != RGBA {
            return Err(RemovalError::InvalidBuffer(format!(
                "unsupported channel count {channels}"
            )));
        }
        let expected = width as usize * height as usize * channels as usize;
        if pixels.len() != expected {
            return Err(RemovalError::InvalidBuffer(format!(
                "expected {expected} bytes for {width}x{height}x{channels}, got {}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            pixels,
        })
    }

    /// Decodes an encoded image (PNG, JPEG, WebP, GIF).
    ///
    /// Sources carrying alpha decode to RGBA; everything else decodes to RGB.
    pub fn decode(bytes: &[u8]) -> Result<Self, RemovalError> {
        let decoded = image::load_from_memory(bytes)?;
        Ok(Self::from_dynamic(decoded))
    }

    fn from_dynamic(image: DynamicImage) -> Self {
        let (width, height) = (image.width(), image.height());
        if image.color().has_alpha() {
            Self {
                width,
                height,
                channels: RGBA,
                pixels: image.to_rgba8().into_raw(),
            }
        } else {
            Self {
                width,
                height,
                channels: RGB,
                pixels: image.to_rgb8().into_raw(),
            }
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Guarantees an alpha channel. RGB gains a fully opaque fourth channel;
    /// RGBA is returned unchanged.
    pub fn ensure_alpha(self) -> Self {
        if self.channels == RGBA {
            return self;
        }

        let mut pixels = Vec::with_capacity(self.pixel_count() * RGBA as usize);
        for rgb in self.pixels.chunks_exact(RGB as usize) {
            pixels.extend_from_slice(rgb);
            pixels.push(OPAQUE);
        }

        Self {
            channels: RGBA,
            pixels,
            ..self
        }
    }

    /// Color of the pixel at `(x, y)`.
    pub fn color_at(&self, x: u32, y: u32) -> Color {
        let offset = (y as usize * self.width as usize + x as usize) * self.channels as usize;
        Color::new(
            self.pixels[offset],
            self.pixels[offset + 1],
            self.pixels[offset + 2],
        )
    }

    /// Mutable RGBA pixel slices. Callers must run `ensure_alpha` first.
    pub(crate) fn rgba_pixels_mut(&mut self) -> std::slice::ChunksExactMut<'_, u8> {
        debug_assert_eq!(self.channels, RGBA);
        self.pixels.chunks_exact_mut(RGBA as usize)
    }

    /// Alpha values in pixel order, or `None` for RGB rasters.
    pub fn alpha_channel(&self) -> Option<Vec<u8>> {
        (self.channels == RGBA).then(|| {
            self.pixels
                .chunks_exact(RGBA as usize)
                .map(|px| px[3])
                .collect()
        })
    }

    pub(crate) fn into_rgba_image(self) -> Result<RgbaImage, RemovalError> {
        let (width, height) = (self.width, self.height);
        let rgba = self.ensure_alpha();
        RgbaImage::from_raw(width, height, rgba.pixels).ok_or_else(|| {
            RemovalError::InvalidBuffer(format!("buffer does not fit {width}x{height} RGBA"))
        })
    }

    pub(crate) fn from_rgba_image(image: RgbaImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            channels: RGBA,
            pixels: image.into_raw(),
        }
    }

    /// Encodes as PNG, always with an alpha channel.
    pub fn encode_png(self) -> Result<Vec<u8>, RemovalError> {
        let rgba = self.into_rgba_image()?;
        let mut out = Cursor::new(Vec::new());
        rgba.write_to(&mut out, ImageFormat::Png)
            .map_err(|e| RemovalError::Encode(e.to_string()))?;
        Ok(out.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb_2x1() -> RasterImage {
        RasterImage::new(2, 1, RGB, vec![255, 255, 255, 0, 0, 0]).unwrap()
    }

    #[test]
    fn test_new_rejects_length_mismatch() {
        assert!(RasterImage::new(2, 2, RGB, vec![0; 11]).is_err());
        assert!(RasterImage::new(2, 2, 2, vec![0; 8]).is_err());
    }

    #[test]
    fn test_ensure_alpha_appends_opaque_channel() {
        let rgba = rgb_2x1().ensure_alpha();
        assert_eq!(rgba.channels(), RGBA);
        assert_eq!(rgba.pixels(), &[255, 255, 255, 255, 0, 0, 0, 255]);
    }

    #[test]
    fn test_ensure_alpha_noop_on_rgba() {
        let original = RasterImage::new(2, 1, RGBA, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        let after = original.clone().ensure_alpha();
        assert_eq!(after, original);
    }

    #[test]
    fn test_png_round_trip_keeps_pixels() {
        let png = rgb_2x1().encode_png().unwrap();
        let decoded = RasterImage::decode(&png).unwrap();
        assert_eq!(decoded.channels(), RGBA);
        assert_eq!(decoded.width(), 2);
        assert_eq!(decoded.pixels(), &[255, 255, 255, 255, 0, 0, 0, 255]);
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(matches!(
            RasterImage::decode(b"not an image"),
            Err(RemovalError::Decode(_))
        ));
    }

    #[test]
    fn test_color_at() {
        assert_eq!(rgb_2x1().color_at(1, 0), Color::new(0, 0, 0));
    }
}
