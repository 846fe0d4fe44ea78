// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Capacity accounting.
//!
//! One frame byte occupies one channel slot. An image can hold a frame as
//! long as the address sequence yields that many distinct slots before
//! wrapping, i.e. `frame_len <= period`. For the stride and keyed orders the
//! period is the full `H × W × C`; for the diagonal order it is
//! `lcm(H, W, C)`.

use crate::raster::Shape;
use crate::stego::frame::{FRAME_OVERHEAD, MAX_PAYLOAD_LEN};
use crate::stego::permute::AddressOrder;

/// Channel slots consumed per frame byte.
pub const SLOTS_PER_BYTE: usize = 1;

/// Distinct slots an `order` walk visits on `shape` before repeating.
pub fn usable_slots(shape: Shape, order: AddressOrder) -> usize {
    match order {
        AddressOrder::Stride | AddressOrder::Keyed => shape.slots(),
        AddressOrder::Diagonal => {
            let (h, w, c) = shape.as_tuple();
            let hw = h / gcd(h, w) * w;
            hw / gcd(hw, c) * c
        }
    }
}

/// Slots needed to store a message of `message_len` bytes.
pub fn required_slots(message_len: usize) -> usize {
    message_len.saturating_add(FRAME_OVERHEAD).saturating_mul(SLOTS_PER_BYTE)
}

/// Largest message (in bytes) that fits in `shape` under `order`.
///
/// Returns 0 when not even an empty frame fits; use [`fits`] to tell the two
/// apart.
pub fn max_message_len(shape: Shape, order: AddressOrder) -> usize {
    (usable_slots(shape, order) / SLOTS_PER_BYTE)
        .saturating_sub(FRAME_OVERHEAD)
        .min(MAX_PAYLOAD_LEN)
}

/// Whether a message of `message_len` bytes fits in `shape` under `order`.
pub fn fits(shape: Shape, order: AddressOrder, message_len: usize) -> bool {
    required_slots(message_len) <= usable_slots(shape, order)
}

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_by_ten_rgb() {
        let shape = Shape::new(10, 10, 3).unwrap();
        assert_eq!(usable_slots(shape, AddressOrder::Keyed), 300);
        assert_eq!(max_message_len(shape, AddressOrder::Keyed), 292);
        assert_eq!(required_slots(2), 10);
        assert!(fits(shape, AddressOrder::Keyed, 292));
        assert!(!fits(shape, AddressOrder::Keyed, 293));
    }

    #[test]
    fn diagonal_limited_to_lcm() {
        let shape = Shape::new(10, 10, 3).unwrap();
        assert_eq!(usable_slots(shape, AddressOrder::Diagonal), 30);
        assert_eq!(max_message_len(shape, AddressOrder::Diagonal), 22);

        let coprime = Shape::new(7, 8, 3).unwrap();
        assert_eq!(usable_slots(coprime, AddressOrder::Diagonal), 168);
    }

    #[test]
    fn tiny_image_holds_nothing() {
        let shape = Shape::new(1, 2, 3).unwrap();
        assert_eq!(max_message_len(shape, AddressOrder::Keyed), 0);
        assert!(!fits(shape, AddressOrder::Keyed, 0));

        let exact = Shape::new(1, 2, 4).unwrap();
        assert!(fits(exact, AddressOrder::Keyed, 0));
    }
}
