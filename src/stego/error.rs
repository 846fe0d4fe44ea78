// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Error types for the embed/extract codec.
//!
//! [`StegoError`] covers every failure mode from buffer validation through
//! framing and integrity checking.

use core::fmt;

use crate::raster::RasterError;

/// Errors that can occur during embedding or extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StegoError {
    /// The buffer has a zero dimension (or an overflowing slot count).
    InvalidImageShape { height: usize, width: usize, channels: usize },
    /// A pixel coordinate was outside the buffer.
    OutOfBounds { row: usize, col: usize, channel: usize },
    /// The frame needs more distinct slots than the address sequence provides.
    ImageTooSmall { needed: usize, capacity: usize },
    /// The message does not fit in the frame's length field.
    PayloadTooLarge { len: usize, max: usize },
    /// Fewer bytes are available than the frame header declares.
    TruncatedFrame { declared: usize, available: usize },
    /// Checksum mismatch (wrong passcode, unembedded or corrupted image).
    IntegrityError,
    /// The extracted message is not valid UTF-8.
    InvalidUtf8,
    /// Passcode key derivation failed.
    KeyDerivation,
    /// The host image is in a lossy or unsupported pixel format.
    UnsupportedFormat(&'static str),
    /// The host image could not be decoded or encoded.
    ImageDecode(String),
}

impl fmt::Display for StegoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidImageShape { height, width, channels } => {
                write!(f, "invalid image shape {height}x{width}x{channels}")
            }
            Self::OutOfBounds { row, col, channel } => {
                write!(f, "pixel coordinate ({row}, {col}, {channel}) out of bounds")
            }
            Self::ImageTooSmall { needed, capacity } => {
                write!(f, "image too small: frame needs {needed} slots, sequence has {capacity}")
            }
            Self::PayloadTooLarge { len, max } => {
                write!(f, "payload of {len} bytes exceeds the {max}-byte limit")
            }
            Self::TruncatedFrame { declared, available } => {
                write!(f, "truncated frame: header declares {declared} bytes, {available} available")
            }
            Self::IntegrityError => write!(f, "payload checksum mismatch (wrong passcode?)"),
            Self::InvalidUtf8 => write!(f, "extracted text is not valid UTF-8"),
            Self::KeyDerivation => write!(f, "passcode key derivation failed"),
            Self::UnsupportedFormat(what) => write!(f, "unsupported image format: {what}"),
            Self::ImageDecode(msg) => write!(f, "image decode error: {msg}"),
        }
    }
}

impl std::error::Error for StegoError {}

impl From<RasterError> for StegoError {
    fn from(e: RasterError) -> Self {
        match e {
            RasterError::InvalidShape { height, width, channels } => {
                Self::InvalidImageShape { height, width, channels }
            }
            RasterError::OutOfBounds { row, col, channel } => Self::OutOfBounds { row, col, channel },
            RasterError::LengthMismatch { expected, actual } => {
                Self::ImageDecode(format!("sample buffer has {actual} bytes, shape needs {expected}"))
            }
        }
    }
}
