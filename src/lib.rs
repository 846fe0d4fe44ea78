// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! # pixmark-core
//!
//! Hides a byte payload inside an 8-bit raster image by overwriting whole
//! channel samples along a passcode-seeded traversal. Decoding needs only the
//! image and the passcode: the payload is wrapped in a frame carrying its
//! length and a passcode-keyed CRC-32.
//!
//! - `raster`: the [`PixelBuffer`] abstraction and an owned [`PixelGrid`].
//!   With the `image` feature, `image::ImageBuffer` implements it too and
//!   `raster::interop` guards against lossy carriers.
//! - `stego`: key derivation, address sequences, framing, capacity and the
//!   [`Codec`] that ties them together.
//!
//! This is not encryption. The payload bytes are stored as-is; the passcode
//! only decides where they go.
//!
//! # Quick start
//!
//! ```rust
//! use pixmark_core::{embed, extract, PixelGrid};
//!
//! let mut image = PixelGrid::new(10, 10, 3).unwrap();
//! embed(&mut image, "HI", "key1").unwrap();
//! assert_eq!(extract(&image, "key1").unwrap(), "HI");
//! assert!(extract(&image, "key2").is_err());
//! ```

pub mod raster;
pub mod stego;

pub use raster::error::{RasterError, Result as RasterResult};
pub use raster::{PixelAddress, PixelBuffer, PixelGrid, Shape};
pub use stego::{addresses, AddressOrder, AddressSequence, Addresses};
pub use stego::{embed, embed_bytes, extract, extract_bytes, embed_batch, extract_batch};
pub use stego::{Codec, CodecOptions, KeyDerivation, PayloadFramer, StegoError};
pub use stego::capacity::max_message_len;
pub use stego::frame::{FRAME_OVERHEAD, MAX_PAYLOAD_LEN};
