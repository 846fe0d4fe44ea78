// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Embedding through `image::ImageBuffer` and surviving a PNG round-trip.

#![cfg(feature = "image")]

use image::{ImageBuffer, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};

use pixmark_core::raster::interop::{decode_lossless, encode_png};
use pixmark_core::{embed, extract, Codec, StegoError};

fn cover(width: u32, height: u32) -> RgbImage {
    ImageBuffer::from_fn(width, height, |x, y| {
        Rgb([(x * 3 + y) as u8, (y * 5) as u8, (x ^ y) as u8])
    })
}

#[test]
fn embed_into_rgb_image_survives_png() {
    let mut img = cover(40, 30);
    embed(&mut img, "through png", "pw").unwrap();

    let png = encode_png(&img).unwrap();
    let decoded = decode_lossless(&png).unwrap();
    assert_eq!(extract(&decoded, "pw").unwrap(), "through png");
    assert!(extract(&decoded, "wrong").is_err());
}

#[test]
fn rgba_buffer_uses_four_channels() {
    let mut img: RgbaImage = ImageBuffer::from_pixel(8, 8, Rgba([10, 20, 30, 255]));
    let codec = Codec::default();
    assert_eq!(codec.capacity(&img).unwrap(), 8 * 8 * 4 - 8);
    codec.embed(&mut img, "alpha too", "pw").unwrap();
    assert_eq!(codec.extract(&img, "pw").unwrap(), "alpha too");
}

#[test]
fn bmp_is_accepted() {
    let img = cover(16, 16);
    let mut bmp = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut bmp), ImageFormat::Bmp).unwrap();
    assert_eq!(decode_lossless(&bmp).unwrap(), img);
}

#[test]
fn rgba_png_decodes_to_rgb() {
    let img: RgbaImage = ImageBuffer::from_pixel(5, 4, Rgba([1, 2, 3, 128]));
    let mut png = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut png), ImageFormat::Png).unwrap();
    let decoded = decode_lossless(&png).unwrap();
    assert_eq!(decoded.dimensions(), (5, 4));
    assert_eq!(decoded.get_pixel(0, 0), &Rgb([1, 2, 3]));
}

#[test]
fn sixteen_bit_png_rejected() {
    let img: ImageBuffer<Rgb<u16>, Vec<u16>> = ImageBuffer::from_pixel(4, 4, Rgb([1000, 2000, 3000]));
    let mut png = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut png), ImageFormat::Png).unwrap();
    assert!(matches!(decode_lossless(&png), Err(StegoError::UnsupportedFormat(_))));
}

#[test]
fn truncated_png_is_decode_error() {
    let png = encode_png(&cover(16, 16)).unwrap();
    assert!(matches!(
        decode_lossless(&png[..png.len() / 2]),
        Err(StegoError::ImageDecode(_))
    ));
}
