// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! `image` crate interop (feature `image`).
//!
//! Implements [`PixelBuffer`] for 8-bit `image::ImageBuffer`s and provides the
//! host-side guard rails the codec relies on: carriers must be lossless and
//! 8 bits per channel. Any JPEG/WebP/AVIF round-trip rewrites channel values
//! and destroys the embedded frame, so those formats are rejected before a
//! buffer ever reaches the codec.

use std::io::Cursor;

use image::{DynamicImage, ImageBuffer, ImageFormat, Pixel, RgbImage};

use crate::raster::{PixelBuffer, RasterError};
use crate::stego::error::StegoError;

impl<P> PixelBuffer for ImageBuffer<P, Vec<u8>>
where
    P: Pixel<Subpixel = u8>,
{
    fn dimensions(&self) -> (usize, usize, usize) {
        (self.height() as usize, self.width() as usize, P::CHANNEL_COUNT as usize)
    }

    fn get(&self, row: usize, col: usize, channel: usize) -> super::error::Result<u8> {
        let oob = RasterError::OutOfBounds { row, col, channel };
        let (x, y) = coords(row, col).ok_or_else(|| oob.clone())?;
        self.get_pixel_checked(x, y)
            .and_then(|p| p.channels().get(channel).copied())
            .ok_or(oob)
    }

    fn set(&mut self, row: usize, col: usize, channel: usize, value: u8) -> super::error::Result<()> {
        let oob = RasterError::OutOfBounds { row, col, channel };
        let (x, y) = coords(row, col).ok_or_else(|| oob.clone())?;
        let slot = self
            .get_pixel_mut_checked(x, y)
            .and_then(|p| p.channels_mut().get_mut(channel))
            .ok_or(oob)?;
        *slot = value;
        Ok(())
    }
}

fn coords(row: usize, col: usize) -> Option<(u32, u32)> {
    Some((u32::try_from(col).ok()?, u32::try_from(row).ok()?))
}

/// Decode a carrier image, refusing anything that cannot hold a frame.
///
/// The result is always 3-channel RGB; alpha is dropped and grayscale is
/// expanded.
///
/// # Errors
/// - [`StegoError::UnsupportedFormat`] for lossy containers (JPEG, WebP,
///   AVIF), unrecognized data, or samples deeper than 8 bits.
/// - [`StegoError::ImageDecode`] if the container is recognized but broken.
pub fn decode_lossless(bytes: &[u8]) -> Result<RgbImage, StegoError> {
    let format = image::guess_format(bytes).map_err(|_| StegoError::UnsupportedFormat("unrecognized image data"))?;
    match format {
        ImageFormat::Jpeg => return Err(StegoError::UnsupportedFormat("JPEG is lossy")),
        ImageFormat::WebP => return Err(StegoError::UnsupportedFormat("WebP may be lossy")),
        ImageFormat::Avif => return Err(StegoError::UnsupportedFormat("AVIF is lossy")),
        _ => {}
    }

    let decoded = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| StegoError::ImageDecode(e.to_string()))?;
    log::debug!("decoded {format:?} carrier {}x{}", decoded.width(), decoded.height());

    match decoded {
        DynamicImage::ImageRgb8(img) => Ok(img),
        DynamicImage::ImageLuma8(_) | DynamicImage::ImageLumaA8(_) | DynamicImage::ImageRgba8(_) => {
            Ok(decoded.to_rgb8())
        }
        _ => Err(StegoError::UnsupportedFormat("only 8-bit channels are supported")),
    }
}

/// Encode `image` as PNG.
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>, StegoError> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| StegoError::ImageDecode(e.to_string()))?;
    Ok(bytes)
}
