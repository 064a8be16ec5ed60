//! Bit flattening and packing for line-coded symbols.
//!
//! Bits are carried as one `u8` per bit (0 or 1), most significant first.

/// Bits per line-code symbol.
pub const CODEWORD_BITS: usize = 6;

/// Tail fill pattern. Alternating bits keep the tail DC balanced.
const FILL: [u8; 2] = [0, 1];

/// Flatten codewords into bits, six per codeword, MSB first.
pub fn bits_from_codewords(codewords: &[u8]) -> Vec<u8> {
    let mut bits = Vec::with_capacity(codewords.len() * CODEWORD_BITS);
    for &codeword in codewords {
        bits.extend((0..CODEWORD_BITS).rev().map(|shift| (codeword >> shift) & 1));
    }
    bits
}

/// Number of fill bits appended before packing `bit_len` bits.
///
/// Fill goes in `0,1` pairs while two or more positions remain in the last
/// byte. An odd leftover position is never filled and packs as zero.
pub fn fill_len(bit_len: usize) -> usize {
    match bit_len % 8 {
        0 => 0,
        used => (8 - used) & !1,
    }
}

/// Pack bits into bytes MSB first, after appending the alternating fill.
pub fn pack_bits(bits: &[u8]) -> Vec<u8> {
    let fill = fill_len(bits.len());
    let mut bytes = vec![0u8; (bits.len() + fill).div_ceil(8)];

    let filled = bits
        .iter()
        .copied()
        .chain(FILL.iter().copied().cycle().take(fill));
    for (index, bit) in filled.enumerate() {
        bytes[index / 8] |= (bit & 1) << (7 - index % 8);
    }
    bytes
}

/// Unpack bytes into bits, MSB first.
pub fn unpack_bits(bytes: &[u8]) -> Vec<u8> {
    let mut bits = Vec::with_capacity(bytes.len() * 8);
    for &byte in bytes {
        bits.extend((0..8).rev().map(|shift| (byte >> shift) & 1));
    }
    bits
}

/// Regroup bits into 6-bit codewords. A trailing partial group is dropped.
pub fn codewords_from_bits(bits: &[u8]) -> Vec<u8> {
    bits.chunks_exact(CODEWORD_BITS)
        .map(|chunk| chunk.iter().fold(0u8, |acc, &bit| acc << 1 | (bit & 1)))
        .collect()
}
