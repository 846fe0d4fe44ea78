// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Passcode-seeded pixel address sequences.
//!
//! An [`AddressSequence`] maps an index `i` to a `(row, col, channel)` slot.
//! The mapping is a pure function of `(passcode, H, W, C, i)`: encoder and
//! decoder rebuild the same sequence from the passcode and the image shape,
//! and no state is carried between calls. Sequences are infinite and wrap
//! around after [`period`](AddressSequence::period) steps.
//!
//! Three orders are available:
//!
//! - **Diagonal**: the baseline rule. Row, column and channel each advance by
//!   one modulo their bound on every step, starting from a passcode-derived
//!   offset. Only `lcm(H, W, C)` distinct slots are reachable.
//! - **Stride**: an affine walk over flat slot indices, `i ↦ (b + a·i) mod N`
//!   with `gcd(a, N) = 1`. Covers all `N = H·W·C` slots.
//! - **Keyed** (default): a keyed pseudo-random permutation of `[0, N)`. A
//!   balanced Feistel network over the smallest power-of-four domain `≥ N`,
//!   with cycle-walking to stay inside `[0, N)`. Round keys come from a
//!   ChaCha20 PRNG seeded with the passcode-derived permutation seed.
//!
//! The keyed order is lazy: any address is computed in O(1) expected time
//! without materializing a shuffled index table, so large images cost no
//! extra memory.

use rand::RngCore;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::raster::{PixelAddress, Shape};
use crate::stego::capacity::usable_slots;
use crate::stego::error::StegoError;
use crate::stego::keys::{KeyDerivation, SequenceKey};

/// Number of Feistel rounds in the keyed order.
const FEISTEL_ROUNDS: usize = 6;

/// Traversal rule used to place frame bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressOrder {
    /// Every coordinate advances by one per step, from a seeded start.
    Diagonal,
    /// Seeded affine walk over flat slot indices.
    Stride,
    /// Keyed Feistel permutation of all slots.
    #[default]
    Keyed,
}

/// A deterministic, restartable address sequence for one image shape.
#[derive(Debug, Clone)]
pub struct AddressSequence {
    shape: Shape,
    walk: Walk,
}

#[derive(Debug, Clone)]
enum Walk {
    Diagonal { row: usize, col: usize, channel: usize, period: usize },
    Stride { offset: u64, step: u64 },
    Keyed(Feistel),
}

impl AddressSequence {
    /// Derive a sequence from a passcode.
    ///
    /// # Errors
    /// [`StegoError::InvalidImageShape`] if any dimension is zero, or
    /// [`StegoError::KeyDerivation`] if the passcode cannot be processed.
    pub fn new(
        passcode: &[u8],
        height: usize,
        width: usize,
        channels: usize,
        order: AddressOrder,
        kdf: KeyDerivation,
    ) -> Result<Self, StegoError> {
        let shape = Shape::new(height, width, channels)?;
        let key = SequenceKey::derive(passcode, kdf)?;
        Ok(Self::from_key(&key, shape, order))
    }

    /// Build a sequence from already-derived key material.
    pub fn from_key(key: &SequenceKey, shape: Shape, order: AddressOrder) -> Self {
        let slots = shape.slots() as u64;
        let walk = match order {
            AddressOrder::Diagonal => {
                let (h, w, c) = shape.as_tuple();
                let seed = key.walk_seed();
                Walk::Diagonal {
                    row: (seed % h as u64) as usize,
                    col: ((seed / h as u64) % w as u64) as usize,
                    channel: ((seed / h as u64 / w as u64) % c as u64) as usize,
                    period: usable_slots(shape, AddressOrder::Diagonal),
                }
            }
            AddressOrder::Stride => {
                let seed = key.walk_seed();
                Walk::Stride {
                    offset: seed % slots,
                    step: coprime_step(seed.rotate_left(32) % slots, slots),
                }
            }
            AddressOrder::Keyed => Walk::Keyed(Feistel::new(&key.permutation_seed(), slots)),
        };
        log::trace!("address sequence {order:?} over {:?}", shape.as_tuple());
        Self { shape, walk }
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Number of distinct addresses before the sequence repeats.
    ///
    /// Equals `H·W·C` for the stride and keyed orders and `lcm(H, W, C)` for
    /// the diagonal order.
    pub fn period(&self) -> usize {
        match &self.walk {
            Walk::Diagonal { period, .. } => *period,
            Walk::Stride { .. } | Walk::Keyed(_) => self.shape.slots(),
        }
    }

    /// The `index`-th address. Indices past the period wrap around.
    pub fn address(&self, index: usize) -> PixelAddress {
        match &self.walk {
            Walk::Diagonal { row, col, channel, period } => {
                let (h, w, c) = self.shape.as_tuple();
                let i = index % period;
                PixelAddress {
                    row: (row + i % h) % h,
                    col: (col + i % w) % w,
                    channel: (channel + i % c) % c,
                }
            }
            Walk::Stride { offset, step } => {
                let n = self.shape.slots() as u128;
                let i = (index as u128) % n;
                let flat = (*offset as u128 + (*step as u128 * i) % n) % n;
                self.shape.address_of(flat as usize)
            }
            Walk::Keyed(feistel) => {
                let i = (index as u64) % feistel.slots;
                self.shape.address_of(feistel.permute(i) as usize)
            }
        }
    }

    /// Iterate from index 0. Each call restarts the sequence.
    pub fn iter(&self) -> Addresses {
        Addresses { seq: self.clone(), index: 0 }
    }
}

impl<'a> IntoIterator for &'a AddressSequence {
    type Item = PixelAddress;
    type IntoIter = Addresses;

    fn into_iter(self) -> Addresses {
        self.iter()
    }
}

/// Infinite iterator over an [`AddressSequence`].
#[derive(Debug, Clone)]
pub struct Addresses {
    seq: AddressSequence,
    index: usize,
}

impl Addresses {
    /// Index of the next address to be yielded.
    pub fn position(&self) -> usize {
        self.index
    }
}

impl Iterator for Addresses {
    type Item = PixelAddress;

    fn next(&mut self) -> Option<PixelAddress> {
        let addr = self.seq.address(self.index);
        self.index = self.index.wrapping_add(1);
        Some(addr)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

/// Default-order address sequence for `passcode` over an `H × W × C` image.
///
/// Uses [`AddressOrder::Keyed`] and [`KeyDerivation::Fast`].
pub fn addresses(
    passcode: &[u8],
    height: usize,
    width: usize,
    channels: usize,
) -> Result<Addresses, StegoError> {
    AddressSequence::new(
        passcode,
        height,
        width,
        channels,
        AddressOrder::default(),
        KeyDerivation::default(),
    )
    .map(|seq| seq.iter())
}

/// Keyed permutation of `[0, slots)`.
#[derive(Clone)]
struct Feistel {
    slots: u64,
    half_bits: u32,
    mask: u64,
    round_keys: [u64; FEISTEL_ROUNDS],
}

impl core::fmt::Debug for Feistel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Feistel")
            .field("slots", &self.slots)
            .field("half_bits", &self.half_bits)
            .finish_non_exhaustive()
    }
}

impl Feistel {
    fn new(seed: &[u8; 32], slots: u64) -> Self {
        // Bits needed for indices 0..slots, rounded up to an even count.
        let bits = if slots <= 1 { 0 } else { 64 - (slots - 1).leading_zeros() };
        let half_bits = ((bits + 1) / 2).max(1);
        let mut rng = ChaCha20Rng::from_seed(*seed);
        let mut round_keys = [0u64; FEISTEL_ROUNDS];
        for key in round_keys.iter_mut() {
            *key = rng.next_u64();
        }
        Self {
            slots,
            half_bits,
            mask: (1u64 << half_bits) - 1,
            round_keys,
        }
    }

    /// One pass of the network over the full `2^(2·half_bits)` domain.
    fn encrypt(&self, x: u64) -> u64 {
        let mut left = x >> self.half_bits;
        let mut right = x & self.mask;
        for &key in &self.round_keys {
            let f = mix64(right ^ key) & self.mask;
            let next = left ^ f;
            left = right;
            right = next;
        }
        (left << self.half_bits) | right
    }

    /// Cycle-walk until the value lands in `[0, slots)`. Terminates because
    /// `index < slots` lies on the same cycle.
    fn permute(&self, index: u64) -> u64 {
        let mut x = self.encrypt(index);
        while x >= self.slots {
            x = self.encrypt(x);
        }
        x
    }
}

/// SplitMix64 finalizer.
fn mix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// Smallest step `>= candidate` (wrapping to 1) that is coprime with `n`.
fn coprime_step(candidate: u64, n: u64) -> u64 {
    let mut step = candidate.max(1);
    while gcd(step, n) != 1 {
        step += 1;
        if step >= n {
            step = 1;
        }
    }
    step
}
