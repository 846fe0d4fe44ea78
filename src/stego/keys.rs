// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Passcode key derivation.
//!
//! Every passcode-dependent choice the codec makes comes from one 64-byte
//! block of key material:
//!
//! ```text
//! [32 bytes] permutation seed (ChaCha20 seed for the keyed address order)
//! [ 8 bytes] walk seed (start offset / stride for the simple orders)
//! [ 4 bytes] checksum seed (initial CRC-32 state of the payload checksum)
//! [20 bytes] reserved
//! ```
//!
//! Two derivations are available:
//!
//! - **Fast** (default): HMAC-SHA256 of the passcode, keyed by a fixed
//!   domain-separation label per half. Microseconds per call. The passcode is
//!   the MAC input rather than the MAC key, so `"a"` and `"a\0"` differ.
//! - **Hardened**: Argon2id with a fixed structural salt. Both sides can
//!   reproduce it from the passcode alone, and guessing passcodes offline costs
//!   one Argon2 evaluation per guess.
//!
//! The material is not secret-grade keying for a cipher. It only has to be a
//! deterministic, well-mixed function of the passcode.

use argon2::Argon2;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::stego::error::StegoError;

type HmacSha256 = Hmac<Sha256>;

/// Fixed salt for the Hardened derivation.
const STRUCTURAL_SALT: &[u8; 16] = b"pixmark-seq-v1\0\0";

/// HMAC label for the permutation seed half.
const PERMUTATION_LABEL: &[u8] = b"pixmark-permutation-v1";

/// HMAC label for the walk/checksum half.
const AUX_LABEL: &[u8] = b"pixmark-aux-v1";

/// Length of the derived key material in bytes.
pub const KEY_MATERIAL_LEN: usize = 64;

/// How passcodes are turned into key material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyDerivation {
    /// HMAC-SHA256 with domain-separation labels.
    #[default]
    Fast,
    /// Argon2id (default parameters) with a fixed salt.
    Hardened,
}

/// Passcode-derived seeds for one embed or extract call.
///
/// Zeroized on drop.
#[derive(Clone)]
pub struct SequenceKey {
    material: Zeroizing<[u8; KEY_MATERIAL_LEN]>,
}

impl SequenceKey {
    /// Derive key material from `passcode`.
    ///
    /// # Errors
    /// [`StegoError::KeyDerivation`] if the underlying primitive rejects its input.
    pub fn derive(passcode: &[u8], kdf: KeyDerivation) -> Result<Self, StegoError> {
        let material = match kdf {
            KeyDerivation::Fast => derive_fast(passcode)?,
            KeyDerivation::Hardened => derive_hardened(passcode)?,
        };
        log::trace!("derived sequence key ({kdf:?})");
        Ok(Self { material })
    }

    /// Build a key from raw material. Mostly useful for tests and pinning.
    pub fn from_material(material: [u8; KEY_MATERIAL_LEN]) -> Self {
        Self { material: Zeroizing::new(material) }
    }

    /// 32-byte ChaCha20 seed for the keyed permutation.
    pub fn permutation_seed(&self) -> [u8; 32] {
        let mut seed = [0u8; 32];
        seed.copy_from_slice(&self.material[..32]);
        seed
    }

    /// 64-bit seed for the diagonal/stride walks.
    pub fn walk_seed(&self) -> u64 {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(&self.material[32..40]);
        u64::from_be_bytes(buf)
    }

    /// Initial CRC-32 state for the payload checksum.
    pub fn checksum_seed(&self) -> u32 {
        let mut buf = [0u8; 4];
        buf.copy_from_slice(&self.material[40..44]);
        u32::from_be_bytes(buf)
    }
}

impl core::fmt::Debug for SequenceKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("SequenceKey(..)")
    }
}

fn derive_fast(passcode: &[u8]) -> Result<Zeroizing<[u8; KEY_MATERIAL_LEN]>, StegoError> {
    let mut output = Zeroizing::new([0u8; KEY_MATERIAL_LEN]);
    for (half, label) in [PERMUTATION_LABEL, AUX_LABEL].into_iter().enumerate() {
        let mut mac = HmacSha256::new_from_slice(label).map_err(|_| StegoError::KeyDerivation)?;
        mac.update(passcode);
        let digest = mac.finalize().into_bytes();
        output[half * 32..(half + 1) * 32].copy_from_slice(&digest);
    }
    Ok(output)
}

fn derive_hardened(passcode: &[u8]) -> Result<Zeroizing<[u8; KEY_MATERIAL_LEN]>, StegoError> {
    let mut output = Zeroizing::new([0u8; KEY_MATERIAL_LEN]);
    Argon2::default()
        .hash_password_into(passcode, STRUCTURAL_SALT, &mut *output)
        .map_err(|_| StegoError::KeyDerivation)?;
    Ok(output)
}
