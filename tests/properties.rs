// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Property tests for the codec and the address sequences.

use std::collections::HashSet;

use proptest::prelude::*;

use pixmark_core::stego::capacity;
use pixmark_core::{
    AddressOrder, AddressSequence, Codec, CodecOptions, KeyDerivation, PayloadFramer, PixelGrid, Shape, StegoError,
};

fn order_strategy() -> impl Strategy<Value = AddressOrder> {
    prop_oneof![
        Just(AddressOrder::Diagonal),
        Just(AddressOrder::Stride),
        Just(AddressOrder::Keyed),
    ]
}

fn grid(h: usize, w: usize, c: usize, fill: u8) -> PixelGrid {
    PixelGrid::from_fn(h, w, c, |r, col, ch| {
        fill.wrapping_add((r * 7 + col * 13 + ch * 3) as u8)
    })
    .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn embed_extract_roundtrip(
        h in 1usize..16,
        w in 1usize..16,
        c in 1usize..5,
        fill in any::<u8>(),
        order in order_strategy(),
        message in proptest::collection::vec(any::<u8>(), 0..64),
        passcode in "[a-zA-Z0-9]{0,16}",
    ) {
        let shape = Shape::new(h, w, c).unwrap();
        prop_assume!(capacity::fits(shape, order, message.len()));

        let codec = Codec::new(CodecOptions::default().with_order(order));
        let mut img = grid(h, w, c, fill);
        codec.embed_bytes(&mut img, &message, passcode.as_bytes()).unwrap();
        prop_assert_eq!(codec.extract_bytes(&img, passcode.as_bytes()).unwrap(), message);
    }

    #[test]
    fn oversized_message_leaves_image_untouched(
        h in 1usize..8,
        w in 1usize..8,
        c in 1usize..4,
        order in order_strategy(),
        extra in 1usize..32,
    ) {
        let shape = Shape::new(h, w, c).unwrap();
        let too_long = capacity::max_message_len(shape, order) + extra;
        prop_assume!(!capacity::fits(shape, order, too_long));

        let codec = Codec::new(CodecOptions::default().with_order(order));
        let original = grid(h, w, c, 0x40);
        let mut img = original.clone();
        let err = codec.embed_bytes(&mut img, &vec![0xAA; too_long], b"pw").unwrap_err();
        prop_assert!(matches!(err, StegoError::ImageTooSmall { .. }), "unexpected {:?}", err);
        prop_assert_eq!(img, original);
    }

    #[test]
    fn wrong_passcode_never_yields_message(
        message in "[ -~]{1,24}",
        right in "[a-z]{1,12}",
        wrong in "[a-z]{1,12}",
    ) {
        prop_assume!(right != wrong);
        let codec = Codec::default();
        let mut img = grid(12, 12, 3, 0x11);
        codec.embed(&mut img, &message, &right).unwrap();
        prop_assert_eq!(codec.extract(&img, &right).unwrap(), message.clone());
        prop_assert_ne!(codec.extract(&img, &wrong), Ok(message));
    }

    #[test]
    fn sequences_are_bijections(
        h in 1usize..12,
        w in 1usize..12,
        c in 1usize..5,
        order in order_strategy(),
        passcode in proptest::collection::vec(any::<u8>(), 0..32),
    ) {
        let seq = AddressSequence::new(&passcode, h, w, c, order, KeyDerivation::Fast).unwrap();
        let period = seq.period();
        let seen: HashSet<_> = seq.iter().take(period).collect();
        prop_assert_eq!(seen.len(), period);
        prop_assert!(seen.iter().all(|a| a.row < h && a.col < w && a.channel < c));
    }

    #[test]
    fn framer_roundtrip(
        seed in any::<u32>(),
        message in proptest::collection::vec(any::<u8>(), 0..256),
    ) {
        let framer = PayloadFramer::keyed(seed);
        let frame = framer.encode(&message).unwrap();
        prop_assert_eq!(frame.len(), message.len() + 8);
        prop_assert_eq!(framer.decode(&frame).unwrap(), message);
    }

    #[test]
    fn single_bit_flip_detected(
        message in proptest::collection::vec(any::<u8>(), 1..64),
        bit in any::<usize>(),
    ) {
        let framer = PayloadFramer::keyed(0x0BAD_F00D);
        let mut frame = framer.encode(&message).unwrap();
        // Flip a bit in the payload or checksum; header flips change the length.
        let body_bits = (frame.len() - 4) * 8;
        let pos = 32 + bit % body_bits;
        frame[pos / 8] ^= 1 << (pos % 8);
        prop_assert_eq!(framer.decode(&frame), Err(StegoError::IntegrityError));
    }
}
