//! 4b/6b line code.
//!
//! Each nibble becomes a 6-bit codeword with exactly three one bits, so the
//! encoded stream is DC balanced. No codeword starts or ends with more than
//! two equal bits, which bounds runs to four and keeps the receiver's clock
//! recovery locked.

use crate::error::{CodecError, Result};

/// Codeword for each nibble value, indexed by nibble.
pub const ENCODE_TABLE: [u8; 16] = [
    0x15, 0x31, 0x32, 0x23, 0x34, 0x25, 0x26, 0x16, //
    0x1a, 0x19, 0x2a, 0x0b, 0x2c, 0x0d, 0x0e, 0x1c,
];

/// Marks a 6-bit pattern that is not a codeword.
const INVALID: u8 = 0xff;

/// Nibble for each 6-bit pattern, or [`INVALID`].
static DECODE_TABLE: [u8; 64] = build_decode_table();

const fn build_decode_table() -> [u8; 64] {
    let mut table = [INVALID; 64];
    let mut nibble = 0;
    while nibble < ENCODE_TABLE.len() {
        table[ENCODE_TABLE[nibble] as usize] = nibble as u8;
        nibble += 1;
    }
    table
}

/// Codeword for the low four bits of `nibble`.
#[inline]
pub fn encode_nibble(nibble: u8) -> u8 {
    ENCODE_TABLE[usize::from(nibble & 0x0f)]
}

/// Nibble for a 6-bit codeword, `None` if the pattern is not in the table.
#[inline]
pub fn decode_codeword(codeword: u8) -> Option<u8> {
    match DECODE_TABLE.get(usize::from(codeword)) {
        Some(&INVALID) | None => None,
        Some(&nibble) => Some(nibble),
    }
}

/// Line-code `bytes`, high nibble first. Returns two codewords per byte.
pub fn line_encode(bytes: &[u8]) -> Vec<u8> {
    let mut codewords = Vec::with_capacity(bytes.len() * 2);
    for &byte in bytes {
        codewords.push(encode_nibble(byte >> 4));
        codewords.push(encode_nibble(byte));
    }
    codewords
}

/// Invert [`line_encode`]. A trailing unpaired codeword is ignored.
pub fn line_decode(codewords: &[u8]) -> Result<Vec<u8>> {
    let nibble_at = |index: usize| {
        let value = codewords[index];
        decode_codeword(value).ok_or(CodecError::InvalidCodeword { index, value })
    };

    (0..codewords.len() / 2)
        .map(|pair| -> Result<u8> {
            Ok(nibble_at(2 * pair)? << 4 | nibble_at(2 * pair + 1)?)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_reference_table() {
        assert_eq!(
            ENCODE_TABLE,
            [
                0x15, 0x31, 0x32, 0x23, 0x34, 0x25, 0x26, 0x16, 0x1a, 0x19, 0x2a, 0x0b, 0x2c,
                0x0d, 0x0e, 0x1c,
            ]
        );
    }

    #[test]
    fn codewords_are_distinct_six_bit_values() {
        let mut seen = [false; 64];
        for &codeword in &ENCODE_TABLE {
            assert!(codeword < 64, "{codeword:#04x} wider than 6 bits");
            assert!(!seen[usize::from(codeword)], "{codeword:#04x} repeated");
            seen[usize::from(codeword)] = true;
        }
    }

    #[test]
    fn codewords_are_dc_balanced() {
        for &codeword in &ENCODE_TABLE {
            assert_eq!(codeword.count_ones(), 3, "{codeword:#04x}");
        }
    }

    #[test]
    fn runs_stay_short_across_codeword_boundaries() {
        for &a in &ENCODE_TABLE {
            for &b in &ENCODE_TABLE {
                let joined = u16::from(a) << 6 | u16::from(b);
                let mut run = 1;
                let mut longest = 1;
                for bit in 1..12 {
                    if (joined >> bit) & 1 == (joined >> (bit - 1)) & 1 {
                        run += 1;
                        longest = longest.max(run);
                    } else {
                        run = 1;
                    }
                }
                assert!(longest <= 4, "{a:#04x} {b:#04x} has run {longest}");
            }
        }
    }

    #[test]
    fn decode_inverts_every_entry() {
        for nibble in 0..16u8 {
            assert_eq!(decode_codeword(encode_nibble(nibble)), Some(nibble));
        }
    }

    #[test]
    fn decode_table_matches_receiver() {
        let valid: Vec<(u8, u8)> = (0..64u8)
            .filter_map(|pattern| decode_codeword(pattern).map(|nibble| (pattern, nibble)))
            .collect();
        assert_eq!(
            valid,
            vec![
                (11, 0xb),
                (13, 0xd),
                (14, 0xe),
                (21, 0x0),
                (22, 0x7),
                (25, 0x9),
                (26, 0x8),
                (28, 0xf),
                (35, 0x3),
                (37, 0x5),
                (38, 0x6),
                (42, 0xa),
                (44, 0xc),
                (49, 0x1),
                (50, 0x2),
                (52, 0x4),
            ]
        );
        assert_eq!(decode_codeword(0x00), None);
        assert_eq!(decode_codeword(0x3f), None);
        assert_eq!(decode_codeword(0x40), None);
    }

    #[test]
    fn zero_byte_encodes_to_0x15_pair() {
        assert_eq!(line_encode(&[0x00]), vec![0x15, 0x15]);
    }

    #[test]
    fn high_nibble_comes_first() {
        assert_eq!(line_encode(&[0x1f]), vec![0x31, 0x1c]);
        assert_eq!(line_encode(b"hi"), vec![0x26, 0x1a, 0x26, 0x19]);
    }

    #[test]
    fn line_decode_recovers_bytes() {
        let data = [0x00, 0x5a, 0xff, 0x12];
        assert_eq!(line_decode(&line_encode(&data)).unwrap(), data);
    }

    #[test]
    fn line_decode_reports_bad_codeword_position() {
        let err = line_decode(&[0x15, 0x15, 0x15, 0x3f]).unwrap_err();
        assert!(matches!(
            err,
            CodecError::InvalidCodeword {
                index: 3,
                value: 0x3f
            }
        ));
    }
}
