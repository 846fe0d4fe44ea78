// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Embed/extract orchestration.
//!
//! Embedding:
//! 1. Derive the sequence key from the passcode.
//! 2. Frame the message (`[len][payload][crc]`, CRC keyed by the passcode).
//! 3. Check the frame fits in the address sequence's period.
//! 4. Write one frame byte per address, journaling the overwritten samples so
//!    a failing buffer write can be rolled back.
//!
//! Extraction walks the same sequence: four header slots give the payload
//! length, then payload + checksum slots follow from where the header left
//! off.

use crate::raster::{PixelAddress, PixelBuffer};
use crate::stego::capacity::{self, SLOTS_PER_BYTE};
use crate::stego::error::StegoError;
use crate::stego::frame::{
    declared_len, frame_len, PayloadFramer, CHECKSUM_LEN, FRAME_OVERHEAD, LENGTH_LEN, MAX_PAYLOAD_LEN,
};
use crate::stego::keys::{KeyDerivation, SequenceKey};
use crate::stego::permute::{AddressOrder, AddressSequence};

/// Run-time codec configuration.
///
/// Both sides of an exchange must use the same order and key derivation;
/// neither is recorded in the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecOptions {
    /// Traversal rule.
    pub order: AddressOrder,
    /// Passcode → seed derivation.
    pub key_derivation: KeyDerivation,
    /// Largest payload accepted by `embed`, in bytes.
    pub max_payload: usize,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            order: AddressOrder::Keyed,
            key_derivation: KeyDerivation::Fast,
            max_payload: MAX_PAYLOAD_LEN,
        }
    }
}

impl CodecOptions {
    pub fn with_order(mut self, order: AddressOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_key_derivation(mut self, kdf: KeyDerivation) -> Self {
        self.key_derivation = kdf;
        self
    }

    /// Cap the payload size. Clamped to the u32 length field.
    pub fn with_max_payload(mut self, max_payload: usize) -> Self {
        self.max_payload = max_payload.min(MAX_PAYLOAD_LEN);
        self
    }
}

/// The paired embed/extract algorithm.
///
/// A `Codec` holds only its options. Every call takes the buffer and passcode
/// explicitly and keeps nothing afterwards, so one codec can serve many
/// threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Codec {
    options: CodecOptions,
}

impl Codec {
    pub fn new(options: CodecOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    /// Embed a UTF-8 text message. See [`embed_bytes`](Self::embed_bytes).
    pub fn embed<B: PixelBuffer + ?Sized>(
        &self,
        image: &mut B,
        message: &str,
        passcode: &str,
    ) -> Result<(), StegoError> {
        self.embed_bytes(image, message.as_bytes(), passcode.as_bytes())
    }

    /// Embed `message` into `image` in place.
    ///
    /// On error the buffer is left exactly as it was.
    ///
    /// # Errors
    /// - [`StegoError::InvalidImageShape`] if the buffer has a zero dimension.
    /// - [`StegoError::PayloadTooLarge`] if the message exceeds the length field
    ///   or [`CodecOptions::max_payload`].
    /// - [`StegoError::ImageTooSmall`] if the frame needs more slots than the
    ///   address sequence provides.
    pub fn embed_bytes<B: PixelBuffer + ?Sized>(
        &self,
        image: &mut B,
        message: &[u8],
        passcode: &[u8],
    ) -> Result<(), StegoError> {
        let shape = image.shape()?;
        let key = SequenceKey::derive(passcode, self.options.key_derivation)?;

        let framer = self.framer(&key);
        let frame = framer.encode(message)?;

        let seq = AddressSequence::from_key(&key, shape, self.options.order);
        let capacity = seq.period();
        let needed = frame.len() * SLOTS_PER_BYTE;
        if needed > capacity {
            return Err(StegoError::ImageTooSmall { needed, capacity });
        }

        write_frame(image, seq.iter(), &frame)?;

        log::debug!(
            "embedded {}-byte frame into {:?} ({:?}, {} slots)",
            frame.len(),
            shape.as_tuple(),
            self.options.order,
            capacity
        );
        Ok(())
    }

    /// Embed into a copy of `image`, leaving the original untouched.
    pub fn embed_cloned<B: PixelBuffer + Clone>(
        &self,
        image: &B,
        message: &[u8],
        passcode: &[u8],
    ) -> Result<B, StegoError> {
        let mut copy = image.clone();
        self.embed_bytes(&mut copy, message, passcode)?;
        Ok(copy)
    }

    /// Extract a UTF-8 text message. See [`extract_bytes`](Self::extract_bytes).
    ///
    /// # Errors
    /// Everything `extract_bytes` returns, plus [`StegoError::InvalidUtf8`].
    pub fn extract<B: PixelBuffer + ?Sized>(&self, image: &B, passcode: &str) -> Result<String, StegoError> {
        let bytes = self.extract_bytes(image, passcode.as_bytes())?;
        String::from_utf8(bytes).map_err(|_| StegoError::InvalidUtf8)
    }

    /// Extract the payload embedded under `passcode`. Never mutates `image`.
    ///
    /// # Errors
    /// - [`StegoError::InvalidImageShape`] if the buffer has a zero dimension.
    /// - [`StegoError::TruncatedFrame`] if the address sequence has fewer slots
    ///   than the smallest possible frame.
    /// - [`StegoError::IntegrityError`] if the checksum does not match, or the
    ///   header declares more payload than this image can hold under this
    ///   passcode. Both mean "no frame for this passcode here".
    pub fn extract_bytes<B: PixelBuffer + ?Sized>(
        &self,
        image: &B,
        passcode: &[u8],
    ) -> Result<Vec<u8>, StegoError> {
        let shape = image.shape()?;
        let key = SequenceKey::derive(passcode, self.options.key_derivation)?;
        let framer = self.framer(&key);
        let seq = AddressSequence::from_key(&key, shape, self.options.order);

        let period = seq.period();
        if period < FRAME_OVERHEAD * SLOTS_PER_BYTE {
            return Err(StegoError::TruncatedFrame {
                declared: FRAME_OVERHEAD,
                available: period,
            });
        }

        let mut addrs = seq.iter();
        let mut header = [0u8; LENGTH_LEN];
        for (byte, addr) in header.iter_mut().zip(&mut addrs) {
            *byte = image.get_at(addr)?;
        }

        let payload_len = declared_len(header);
        let room = period / SLOTS_PER_BYTE - FRAME_OVERHEAD;
        if payload_len > room || payload_len > framer.max_payload() {
            log::debug!("header declares {payload_len} bytes, only {room} fit; no frame for this passcode");
            return Err(StegoError::IntegrityError);
        }

        let mut frame = Vec::with_capacity(frame_len(payload_len));
        frame.extend_from_slice(&header);
        for addr in addrs.take(payload_len + CHECKSUM_LEN) {
            frame.push(image.get_at(addr)?);
        }

        let payload = framer.decode(&frame)?;
        log::debug!("extracted {payload_len}-byte payload from {:?}", shape.as_tuple());
        Ok(payload)
    }

    /// Largest message (bytes) `image` can hold with these options.
    pub fn capacity<B: PixelBuffer + ?Sized>(&self, image: &B) -> Result<usize, StegoError> {
        let shape = image.shape()?;
        Ok(capacity::max_message_len(shape, self.options.order).min(self.options.max_payload))
    }

    fn framer(&self, key: &SequenceKey) -> PayloadFramer {
        PayloadFramer::keyed(key.checksum_seed()).with_max_payload(self.options.max_payload)
    }
}

/// Write `frame` at successive addresses. If the buffer rejects a read or
/// write, every slot written so far is restored before returning the error.
fn write_frame<B, I>(image: &mut B, addrs: I, frame: &[u8]) -> Result<(), StegoError>
where
    B: PixelBuffer + ?Sized,
    I: Iterator<Item = PixelAddress>,
{
    let mut journal: Vec<(PixelAddress, u8)> = Vec::with_capacity(frame.len());
    for (addr, &byte) in addrs.zip(frame) {
        let step = image
            .get_at(addr)
            .and_then(|original| image.set_at(addr, byte).map(|()| original));
        match step {
            Ok(original) => journal.push((addr, original)),
            Err(e) => {
                for &(addr, original) in journal.iter().rev() {
                    let _ = image.set_at(addr, original);
                }
                return Err(e.into());
            }
        }
    }
    Ok(())
}
