// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Example: hide a message in a PNG/BMP image and read it back.
//!
//! Set `RUST_LOG=debug` to see what the codec does.
use std::fs;

use pixmark_core::raster::interop::{decode_lossless, encode_png};
use pixmark_core::Codec;

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 4 {
        eprintln!("Usage: stego_cli <cover.png> <message> <passcode>");
        eprintln!("       stego_cli --decode <stego.png> <passcode>");
        eprintln!("       stego_cli --capacity <cover.png> <passcode>");
        std::process::exit(1);
    }

    let codec = Codec::default();

    match args[1].as_str() {
        "--decode" => {
            let bytes = fs::read(&args[2]).expect("Could not read stego image");
            let image = decode_lossless(&bytes).expect("Unsupported stego image");
            match codec.extract(&image, &args[3]) {
                Ok(message) => println!("Decoded message: {message}"),
                Err(e) => eprintln!("Decode failed: {e}"),
            }
        }
        "--capacity" => {
            let bytes = fs::read(&args[2]).expect("Could not read cover image");
            let image = decode_lossless(&bytes).expect("Unsupported cover image");
            let capacity = codec.capacity(&image).expect("Invalid image");
            println!("{}x{} image holds up to {capacity} bytes", image.width(), image.height());
        }
        cover_path => {
            let bytes = fs::read(cover_path).expect("Could not read cover image");
            let mut image = decode_lossless(&bytes).expect("Unsupported cover image");

            if let Err(e) = codec.embed(&mut image, &args[2], &args[3]) {
                eprintln!("Encode failed: {e}");
                std::process::exit(1);
            }

            let stego = encode_png(&image).expect("PNG encode failed");
            let stem = cover_path.rsplit_once('.').map_or(cover_path, |(stem, _)| stem);
            let out_path = format!("{stem}_stego.png");
            fs::write(&out_path, &stego).expect("Could not write output");
            println!("Stego image written to: {out_path}");
            println!("Cover: {} bytes, Stego: {} bytes", bytes.len(), stego.len());
        }
    }
}
