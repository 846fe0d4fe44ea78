// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Pixel buffer abstraction.
//!
//! The codec never touches files. It works on anything implementing
//! [`PixelBuffer`]: a 2-D grid of 8-bit samples with `C` channels per pixel and
//! bounds-checked get/set. [`PixelGrid`] is the owned in-memory implementation;
//! with the `image` feature, `image::ImageBuffer` implements the trait too
//! (see [`interop`]).

pub mod error;
#[cfg(feature = "image")]
pub mod interop;

pub use error::RasterError;
use error::Result;

/// Image dimensions: `height` rows × `width` columns × `channels` samples.
///
/// Every dimension is at least 1 and the total slot count fits in `usize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    height: usize,
    width: usize,
    channels: usize,
}

impl Shape {
    /// Validate and build a shape.
    ///
    /// # Errors
    /// [`RasterError::InvalidShape`] if any dimension is zero or the slot
    /// count overflows.
    pub fn new(height: usize, width: usize, channels: usize) -> Result<Self> {
        let invalid = RasterError::InvalidShape { height, width, channels };
        if height == 0 || width == 0 || channels == 0 {
            return Err(invalid);
        }
        height
            .checked_mul(width)
            .and_then(|p| p.checked_mul(channels))
            .ok_or(invalid)?;
        Ok(Self { height, width, channels })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Total number of channel slots, `H × W × C`.
    pub fn slots(&self) -> usize {
        self.height * self.width * self.channels
    }

    /// `(height, width, channels)`.
    pub fn as_tuple(&self) -> (usize, usize, usize) {
        (self.height, self.width, self.channels)
    }

    /// Whether `addr` lies inside this shape.
    pub fn contains(&self, addr: PixelAddress) -> bool {
        addr.row < self.height && addr.col < self.width && addr.channel < self.channels
    }

    /// Row-major interleaved flat index of `addr`:
    /// `(row * W + col) * C + channel`.
    pub fn flat_index(&self, addr: PixelAddress) -> usize {
        (addr.row * self.width + addr.col) * self.channels + addr.channel
    }

    /// Inverse of [`flat_index`](Self::flat_index). `flat` must be `< slots()`.
    pub fn address_of(&self, flat: usize) -> PixelAddress {
        debug_assert!(flat < self.slots(), "flat index {flat} >= {}", self.slots());
        PixelAddress {
            row: flat / (self.width * self.channels),
            col: (flat / self.channels) % self.width,
            channel: flat % self.channels,
        }
    }
}

/// One channel slot of one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PixelAddress {
    pub row: usize,
    pub col: usize,
    pub channel: usize,
}

impl PixelAddress {
    pub fn new(row: usize, col: usize, channel: usize) -> Self {
        Self { row, col, channel }
    }
}

/// A mutable 2-D grid of 8-bit channel samples.
///
/// Implementations must reject coordinates outside `dimensions()` with
/// [`RasterError::OutOfBounds`] rather than panicking.
pub trait PixelBuffer {
    /// `(height, width, channels)`.
    fn dimensions(&self) -> (usize, usize, usize);

    /// Read the sample at `(row, col, channel)`.
    fn get(&self, row: usize, col: usize, channel: usize) -> Result<u8>;

    /// Overwrite the sample at `(row, col, channel)`.
    fn set(&mut self, row: usize, col: usize, channel: usize, value: u8) -> Result<()>;

    /// Validated shape of this buffer.
    fn shape(&self) -> Result<Shape> {
        let (h, w, c) = self.dimensions();
        Shape::new(h, w, c)
    }

    fn get_at(&self, addr: PixelAddress) -> Result<u8> {
        self.get(addr.row, addr.col, addr.channel)
    }

    fn set_at(&mut self, addr: PixelAddress, value: u8) -> Result<()> {
        self.set(addr.row, addr.col, addr.channel, value)
    }
}

impl<B: PixelBuffer + ?Sized> PixelBuffer for &mut B {
    fn dimensions(&self) -> (usize, usize, usize) {
        (**self).dimensions()
    }

    fn get(&self, row: usize, col: usize, channel: usize) -> Result<u8> {
        (**self).get(row, col, channel)
    }

    fn set(&mut self, row: usize, col: usize, channel: usize, value: u8) -> Result<()> {
        (**self).set(row, col, channel, value)
    }
}

/// Owned pixel grid.
///
/// Samples are stored row-major with channels interleaved, so the slot for
/// `(row, col, channel)` lives at `(row * width + col) * channels + channel`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    shape: Shape,
    samples: Vec<u8>,
}

impl PixelGrid {
    /// Create a grid with every sample set to zero.
    pub fn new(height: usize, width: usize, channels: usize) -> Result<Self> {
        let shape = Shape::new(height, width, channels)?;
        Ok(Self { shape, samples: vec![0u8; shape.slots()] })
    }

    /// Wrap existing interleaved samples.
    ///
    /// # Errors
    /// [`RasterError::LengthMismatch`] if `samples.len() != H * W * C`.
    pub fn from_raw(height: usize, width: usize, channels: usize, samples: Vec<u8>) -> Result<Self> {
        let shape = Shape::new(height, width, channels)?;
        if samples.len() != shape.slots() {
            return Err(RasterError::LengthMismatch {
                expected: shape.slots(),
                actual: samples.len(),
            });
        }
        Ok(Self { shape, samples })
    }

    /// Build a grid by evaluating `f(row, col, channel)` for every slot.
    pub fn from_fn<F>(height: usize, width: usize, channels: usize, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, usize, usize) -> u8,
    {
        let shape = Shape::new(height, width, channels)?;
        let mut samples = Vec::with_capacity(shape.slots());
        for row in 0..height {
            for col in 0..width {
                for channel in 0..channels {
                    samples.push(f(row, col, channel));
                }
            }
        }
        Ok(Self { shape, samples })
    }

    pub fn shape_of(&self) -> Shape {
        self.shape
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.samples
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.samples
    }

    fn index(&self, row: usize, col: usize, channel: usize) -> Result<usize> {
        let addr = PixelAddress { row, col, channel };
        if !self.shape.contains(addr) {
            return Err(RasterError::OutOfBounds { row, col, channel });
        }
        Ok(self.shape.flat_index(addr))
    }
}

impl PixelBuffer for PixelGrid {
    fn dimensions(&self) -> (usize, usize, usize) {
        self.shape.as_tuple()
    }

    fn get(&self, row: usize, col: usize, channel: usize) -> Result<u8> {
        let idx = self.index(row, col, channel)?;
        Ok(self.samples[idx])
    }

    fn set(&mut self, row: usize, col: usize, channel: usize, value: u8) -> Result<()> {
        let idx = self.index(row, col, channel)?;
        self.samples[idx] = value;
        Ok(())
    }

    fn shape(&self) -> Result<Shape> {
        Ok(self.shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_dimensions_rejected() {
        for (h, w, c) in [(0, 4, 3), (4, 0, 3), (4, 4, 0)] {
            assert!(matches!(Shape::new(h, w, c), Err(RasterError::InvalidShape { .. })));
            assert!(PixelGrid::new(h, w, c).is_err());
        }
    }

    #[test]
    fn overflowing_shape_rejected() {
        assert!(matches!(
            Shape::new(usize::MAX, 2, 3),
            Err(RasterError::InvalidShape { .. })
        ));
    }

    #[test]
    fn flat_index_roundtrip() {
        let shape = Shape::new(5, 7, 3).unwrap();
        assert_eq!(shape.slots(), 105);
        for flat in 0..shape.slots() {
            let addr = shape.address_of(flat);
            assert!(shape.contains(addr));
            assert_eq!(shape.flat_index(addr), flat);
        }
        // Channels are innermost.
        assert_eq!(shape.address_of(4), PixelAddress::new(0, 1, 1));
    }

    #[test]
    fn grid_get_set() {
        let mut grid = PixelGrid::new(2, 3, 4).unwrap();
        assert_eq!(grid.dimensions(), (2, 3, 4));
        assert_eq!(grid.get(1, 2, 3).unwrap(), 0);

        grid.set(1, 2, 3, 255).unwrap();
        assert_eq!(grid.get(1, 2, 3).unwrap(), 255);

        // Neighbours untouched
        assert_eq!(grid.get(1, 2, 2).unwrap(), 0);
        assert_eq!(grid.get(0, 2, 3).unwrap(), 0);
        assert_eq!(grid.as_raw()[grid.as_raw().len() - 1], 255);
    }

    #[test]
    fn out_of_bounds_rejected() {
        let mut grid = PixelGrid::new(2, 2, 3).unwrap();
        assert_eq!(
            grid.get(2, 0, 0),
            Err(RasterError::OutOfBounds { row: 2, col: 0, channel: 0 })
        );
        assert!(grid.get(0, 2, 0).is_err());
        assert!(grid.get(0, 0, 3).is_err());
        assert!(grid.set(0, 0, 3, 1).is_err());
        assert!(grid.as_raw().iter().all(|&v| v == 0));
    }

    #[test]
    fn from_raw_checks_length() {
        assert!(PixelGrid::from_raw(2, 2, 3, vec![0; 12]).is_ok());
        assert_eq!(
            PixelGrid::from_raw(2, 2, 3, vec![0; 11]),
            Err(RasterError::LengthMismatch { expected: 12, actual: 11 })
        );
    }

    #[test]
    fn from_fn_layout() {
        let grid = PixelGrid::from_fn(2, 2, 3, |r, c, ch| (r * 100 + c * 10 + ch) as u8).unwrap();
        assert_eq!(grid.get(1, 0, 2).unwrap(), 102);
        assert_eq!(grid.as_raw()[..6], [0, 1, 2, 10, 11, 12]);
    }

    #[test]
    fn mut_ref_forwards() {
        fn poke<B: PixelBuffer>(mut buf: B) -> u8 {
            buf.set_at(PixelAddress::new(0, 0, 1), 9).unwrap();
            buf.get_at(PixelAddress::new(0, 0, 1)).unwrap()
        }

        let mut grid = PixelGrid::new(1, 1, 3).unwrap();
        assert_eq!(poke(&mut grid), 9);
        assert_eq!(grid.as_raw(), &[0, 9, 0]);
    }
}
