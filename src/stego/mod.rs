// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Passcode-keyed pixel-channel steganography.
//!
//! A message is wrapped in a frame (`[len][payload][crc]`) and written one
//! byte per channel slot along an address sequence derived from the passcode.
//! Extraction walks the same sequence and needs only the image and the
//! passcode.
//!
//! The free functions here use [`Codec::default()`]: keyed traversal, fast key
//! derivation, no payload cap beyond the length field.

pub mod error;
pub mod keys;
pub mod permute;
pub mod frame;
pub mod capacity;
pub mod codec;

pub use codec::{Codec, CodecOptions};
pub use error::StegoError;
pub use frame::PayloadFramer;
pub use keys::{KeyDerivation, SequenceKey};
pub use permute::{addresses, AddressOrder, AddressSequence, Addresses};

use crate::raster::PixelBuffer;

/// Embed a text message with the default codec.
pub fn embed<B: PixelBuffer + ?Sized>(image: &mut B, message: &str, passcode: &str) -> Result<(), StegoError> {
    Codec::default().embed(image, message, passcode)
}

/// Extract a text message with the default codec.
pub fn extract<B: PixelBuffer + ?Sized>(image: &B, passcode: &str) -> Result<String, StegoError> {
    Codec::default().extract(image, passcode)
}

/// Embed raw bytes with the default codec.
pub fn embed_bytes<B: PixelBuffer + ?Sized>(image: &mut B, message: &[u8], passcode: &[u8]) -> Result<(), StegoError> {
    Codec::default().embed_bytes(image, message, passcode)
}

/// Extract raw bytes with the default codec.
pub fn extract_bytes<B: PixelBuffer + ?Sized>(image: &B, passcode: &[u8]) -> Result<Vec<u8>, StegoError> {
    Codec::default().extract_bytes(image, passcode)
}

/// Embed each `(image, message)` pair under one passcode.
///
/// Pairs are independent: one failure does not affect the others, and each
/// failed image is left untouched. Results are in input order.
#[cfg(not(feature = "parallel"))]
pub fn embed_batch<B, M>(codec: &Codec, jobs: &mut [(B, M)], passcode: &[u8]) -> Vec<Result<(), StegoError>>
where
    B: PixelBuffer,
    M: AsRef<[u8]>,
{
    jobs.iter_mut()
        .map(|(image, message)| codec.embed_bytes(image, message.as_ref(), passcode))
        .collect()
}

/// Embed each `(image, message)` pair under one passcode, one pair per
/// rayon task.
///
/// Pairs are independent: one failure does not affect the others, and each
/// failed image is left untouched. Results are in input order.
#[cfg(feature = "parallel")]
pub fn embed_batch<B, M>(codec: &Codec, jobs: &mut [(B, M)], passcode: &[u8]) -> Vec<Result<(), StegoError>>
where
    B: PixelBuffer + Send,
    M: AsRef<[u8]> + Send,
{
    use rayon::prelude::*;

    jobs.par_iter_mut()
        .map(|(image, message)| codec.embed_bytes(image, message.as_ref(), passcode))
        .collect()
}

/// Extract from each image under one passcode. Results are in input order.
#[cfg(not(feature = "parallel"))]
pub fn extract_batch<B: PixelBuffer>(codec: &Codec, images: &[B], passcode: &[u8]) -> Vec<Result<Vec<u8>, StegoError>> {
    images.iter().map(|image| codec.extract_bytes(image, passcode)).collect()
}

/// Extract from each image under one passcode on the rayon pool. Results are
/// in input order.
#[cfg(feature = "parallel")]
pub fn extract_batch<B>(codec: &Codec, images: &[B], passcode: &[u8]) -> Vec<Result<Vec<u8>, StegoError>>
where
    B: PixelBuffer + Sync,
{
    use rayon::prelude::*;

    images.par_iter().map(|image| codec.extract_bytes(image, passcode)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::PixelGrid;

    fn noise(h: usize, w: usize, seed: u8) -> PixelGrid {
        PixelGrid::from_fn(h, w, 3, |r, c, ch| {
            (r as u8).wrapping_mul(29) ^ (c as u8).wrapping_mul(53) ^ (ch as u8).wrapping_add(seed)
        })
        .unwrap()
    }

    #[test]
    fn free_functions_use_default_codec() {
        let mut img = noise(12, 12, 1);
        embed(&mut img, "default", "pw").unwrap();
        assert_eq!(extract(&img, "pw").unwrap(), "default");
        assert_eq!(Codec::default().extract(&img, "pw").unwrap(), "default");

        let mut raw = noise(12, 12, 2);
        embed_bytes(&mut raw, &[0, 1, 2, 255], b"").unwrap();
        assert_eq!(extract_bytes(&raw, b"").unwrap(), vec![0, 1, 2, 255]);
    }

    #[test]
    fn batch_results_in_input_order() {
        let codec = Codec::default();
        let mut jobs = vec![
            (noise(10, 10, 3), b"first".to_vec()),
            (noise(2, 2, 4), b"far too long for four pixels".to_vec()),
            (noise(10, 10, 5), b"third".to_vec()),
        ];
        let untouched = jobs[1].0.clone();

        let results = embed_batch(&codec, &mut jobs, b"batch");
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(StegoError::ImageTooSmall { .. })));
        assert!(results[2].is_ok());
        assert_eq!(jobs[1].0, untouched);

        let images: Vec<PixelGrid> = jobs.into_iter().map(|(img, _)| img).collect();
        let decoded = extract_batch(&codec, &images, b"batch");
        assert_eq!(decoded[0].as_deref(), Ok(&b"first"[..]));
        assert!(decoded[1].is_err());
        assert_eq!(decoded[2].as_deref(), Ok(&b"third"[..]));
    }
}
