//! Property tests for the frame codec.

#![allow(clippy::unwrap_used)]

use mwt1_codec::bits::{bits_from_codewords, fill_len, pack_bits};
use mwt1_codec::{
    crc8, decode_frame, encode, encoded_body_len, line_encode, make_packet, PacketConfig,
    ACCESS_CODE, MAX_PAYLOAD, PREAMBLE, SYNC_LEN, TRAILER_PADDING,
};
use mwt1_transport::{BlockAlignment, ModulationParams, SampleAlignment};
use proptest::prelude::*;

fn payload() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..512)
}

proptest! {
    #[test]
    fn prop_unpadded_frame_roundtrip(payload in payload()) {
        let frame = make_packet(&payload, 2, 1, false).unwrap();
        let decoded = decode_frame(&frame).unwrap();

        prop_assert_eq!(decoded.payload.as_ref(), payload.as_slice());
        prop_assert_eq!(decoded.checksum, crc8(&payload));
    }

    #[test]
    fn prop_padded_frame_roundtrip(payload in payload(), sps in 1usize..16, bps in 1usize..5) {
        let frame = make_packet(&payload, sps, bps, true).unwrap();
        let decoded = decode_frame(&frame).unwrap();
        prop_assert_eq!(decoded.payload.as_ref(), payload.as_slice());
    }

    #[test]
    fn prop_frame_structure(payload in payload()) {
        let frame = make_packet(&payload, 2, 1, false).unwrap();

        prop_assert_eq!(&frame[..PREAMBLE.len()], &PREAMBLE[..]);
        prop_assert_eq!(&frame[PREAMBLE.len()..SYNC_LEN], &ACCESS_CODE[..]);
        prop_assert!(frame.ends_with(&TRAILER_PADDING));
        prop_assert_eq!(frame.len(), SYNC_LEN + encoded_body_len(payload.len()) + TRAILER_PADDING.len());
    }

    #[test]
    fn prop_body_has_no_zero_bytes(payload in payload()) {
        let frame = make_packet(&payload, 2, 1, false).unwrap();
        let body = &frame[SYNC_LEN..frame.len() - TRAILER_PADDING.len()];
        prop_assert!(body.iter().all(|&b| b != 0));
    }

    #[test]
    fn prop_body_bit_length(payload in payload()) {
        let mut raw = payload.clone();
        raw.push(crc8(&payload));
        let bits = bits_from_codewords(&line_encode(&raw));

        prop_assert_eq!(bits.len(), (payload.len() + 1) * 2 * 6);
        let padded = bits.len() + fill_len(bits.len());
        prop_assert_eq!(padded % 8, 0);
        prop_assert!(padded - bits.len() < 8);
        prop_assert_eq!(pack_bits(&bits).len(), padded / 8);
    }

    #[test]
    fn prop_padding_fills_sample_blocks(payload in payload(), sps in 1usize..16, bps in 1usize..5) {
        let frame = make_packet(&payload, sps, bps, true).unwrap();
        let samples = frame.len() * 8 * sps;
        prop_assert_eq!(samples % (128 * bps), 0);

        let unpadded = make_packet(&payload, sps, bps, false).unwrap();
        let params = ModulationParams::new(sps, bps).unwrap();
        prop_assert_eq!(
            frame.len() - unpadded.len(),
            BlockAlignment::default().padding_bytes(unpadded.len(), params).unwrap()
        );
        prop_assert!(frame[unpadded.len()..].iter().all(|&b| b == 0));
    }

    #[test]
    fn prop_encoding_is_deterministic(payload in payload()) {
        let config = PacketConfig::default();
        prop_assert_eq!(encode(&payload, &config).unwrap(), encode(&payload, &config).unwrap());
    }

    #[test]
    fn prop_corrupted_body_never_yields_wrong_payload(payload in payload(), flip in any::<usize>(), bit in 0u8..8) {
        let mut frame = make_packet(&payload, 2, 1, false).unwrap().to_vec();
        let body_len = encoded_body_len(payload.len());
        let index = SYNC_LEN + flip % body_len;
        frame[index] ^= 1 << bit;

        // A single bit flip in the body either breaks a codeword or the
        // checksum; it must never decode silently to a different payload.
        if let Ok(decoded) = decode_frame(&frame) {
            prop_assert_eq!(decoded.payload.as_ref(), payload.as_slice());
        }
    }
}

#[test]
fn boundary_payload_lengths() {
    assert!(make_packet(&vec![0xa5; MAX_PAYLOAD], 2, 1, true).is_ok());
    assert!(make_packet(&vec![0xa5; MAX_PAYLOAD + 1], 2, 1, true).is_err());
}
