// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Error types for pixel buffer access.

use std::fmt;

/// Errors that can occur when constructing or addressing a pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RasterError {
    /// A dimension is zero, or `height * width * channels` overflows `usize`.
    InvalidShape { height: usize, width: usize, channels: usize },
    /// A `(row, col, channel)` coordinate lies outside the buffer.
    OutOfBounds { row: usize, col: usize, channel: usize },
    /// Raw sample data does not match the declared shape.
    LengthMismatch { expected: usize, actual: usize },
}

impl fmt::Display for RasterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidShape { height, width, channels } => {
                write!(f, "invalid image shape {height}x{width}x{channels}")
            }
            Self::OutOfBounds { row, col, channel } => {
                write!(f, "pixel coordinate ({row}, {col}, {channel}) out of bounds")
            }
            Self::LengthMismatch { expected, actual } => {
                write!(f, "sample buffer has {actual} bytes, shape needs {expected}")
            }
        }
    }
}

impl std::error::Error for RasterError {}

pub type Result<T> = std::result::Result<T, RasterError>;
