// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Payload frame construction and parsing.
//!
//! The frame is the self-describing byte container written into the image:
//!
//! ```text
//! [4 bytes] payload length (big-endian u32)
//! [N bytes] payload
//! [4 bytes] CRC-32 of the payload (big-endian)
//! ```
//!
//! Total frame size = 8 + payload_len bytes. The length comes first so an
//! extractor can read four slots, learn how many more to read, and stop.
//!
//! The CRC can be keyed: [`PayloadFramer::keyed`] starts the CRC state from a
//! passcode-derived seed instead of zero. A blank carrier region then never
//! validates as an empty frame, and a frame read back with the wrong passcode
//! fails the check.

use crate::stego::error::StegoError;

/// Width of the length header in bytes.
pub const LENGTH_LEN: usize = 4;

/// Width of the trailing checksum in bytes.
pub const CHECKSUM_LEN: usize = 4;

/// Fixed overhead: length(4) + crc(4) = 8 bytes.
pub const FRAME_OVERHEAD: usize = LENGTH_LEN + CHECKSUM_LEN;

/// Largest payload the u32 length field can describe.
pub const MAX_PAYLOAD_LEN: usize = u32::MAX as usize;

/// Builds and parses payload frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadFramer {
    checksum_seed: u32,
    max_payload: usize,
}

impl Default for PayloadFramer {
    /// Unkeyed CRC-32, full u32 length range.
    fn default() -> Self {
        Self { checksum_seed: 0, max_payload: MAX_PAYLOAD_LEN }
    }
}

impl PayloadFramer {
    /// Framer whose checksum starts from `checksum_seed`.
    pub fn keyed(checksum_seed: u32) -> Self {
        Self { checksum_seed, ..Self::default() }
    }

    /// Lower the accepted payload size. Values above [`MAX_PAYLOAD_LEN`] are clamped.
    pub fn with_max_payload(mut self, max_payload: usize) -> Self {
        self.max_payload = max_payload.min(MAX_PAYLOAD_LEN);
        self
    }

    pub fn max_payload(&self) -> usize {
        self.max_payload
    }

    /// Checksum of `payload` under this framer's seed.
    pub fn checksum(&self, payload: &[u8]) -> u32 {
        let mut hasher = crc32fast::Hasher::new_with_initial(self.checksum_seed);
        hasher.update(payload);
        hasher.finalize()
    }

    /// Wrap `message` in a frame.
    ///
    /// # Errors
    /// [`StegoError::PayloadTooLarge`] if the message exceeds the length field
    /// or the configured maximum.
    pub fn encode(&self, message: &[u8]) -> Result<Vec<u8>, StegoError> {
        if message.len() > self.max_payload {
            return Err(StegoError::PayloadTooLarge {
                len: message.len(),
                max: self.max_payload,
            });
        }
        let len = u32::try_from(message.len()).map_err(|_| StegoError::PayloadTooLarge {
            len: message.len(),
            max: MAX_PAYLOAD_LEN,
        })?;

        let mut frame = Vec::with_capacity(frame_len(message.len()));
        frame.extend_from_slice(&len.to_be_bytes());
        frame.extend_from_slice(message);
        frame.extend_from_slice(&self.checksum(message).to_be_bytes());
        Ok(frame)
    }

    /// Parse a frame, verifying the checksum.
    ///
    /// `data` may be longer than the frame; bytes past the declared end are
    /// ignored.
    ///
    /// # Errors
    /// - [`StegoError::TruncatedFrame`] if `data` ends before the header or
    ///   before the declared payload + checksum.
    /// - [`StegoError::IntegrityError`] if the stored checksum does not match.
    pub fn decode(&self, data: &[u8]) -> Result<Vec<u8>, StegoError> {
        let header: [u8; LENGTH_LEN] = data
            .get(..LENGTH_LEN)
            .and_then(|h| h.try_into().ok())
            .ok_or(StegoError::TruncatedFrame {
                declared: LENGTH_LEN,
                available: data.len(),
            })?;
        let payload_len = declared_len(header);
        let total = LENGTH_LEN
            .checked_add(payload_len)
            .and_then(|n| n.checked_add(CHECKSUM_LEN))
            .unwrap_or(usize::MAX);

        if data.len() < total {
            return Err(StegoError::TruncatedFrame {
                declared: total,
                available: data.len(),
            });
        }

        let payload = &data[LENGTH_LEN..LENGTH_LEN + payload_len];
        let crc_bytes = &data[LENGTH_LEN + payload_len..total];
        let stored = u32::from_be_bytes([crc_bytes[0], crc_bytes[1], crc_bytes[2], crc_bytes[3]]);
        if stored != self.checksum(payload) {
            return Err(StegoError::IntegrityError);
        }

        Ok(payload.to_vec())
    }
}

/// Payload length declared by a frame header.
pub fn declared_len(header: [u8; LENGTH_LEN]) -> usize {
    u32::from_be_bytes(header) as usize
}

/// Total frame size for a payload of `payload_len` bytes.
pub fn frame_len(payload_len: usize) -> usize {
    payload_len.saturating_add(FRAME_OVERHEAD)
}
