//! 2-bit CGA layout with even/odd scanline interleave.
//!
//! CGA video memory keeps all even scanlines in the first bank and all odd
//! scanlines in the second bank. Each bank is half of the packed buffer.

use alloc::vec;
use alloc::vec::Vec;

/// Pixels carried by one packed byte.
pub const PIXELS_PER_BYTE: usize = 4;

fn check_geometry(packed_len: usize, linear_len: usize, width: usize, height: usize) {
    assert!(
        width % PIXELS_PER_BYTE == 0,
        "CGA width {width} is not a multiple of {PIXELS_PER_BYTE}"
    );
    assert!(height % 2 == 0, "CGA height {height} is not even");
    assert!(
        packed_len % 2 == 0,
        "CGA buffer length {packed_len} cannot be split into two banks"
    );
    let bank_needed = width / PIXELS_PER_BYTE * (height / 2);
    assert!(
        bank_needed <= packed_len / 2,
        "CGA bank of {} bytes cannot hold {width}x{height}",
        packed_len / 2
    );
    assert_eq!(
        linear_len,
        width * height,
        "linear buffer does not match {width}x{height}"
    );
}

fn unpack_row(src: &[u8], dst: &mut [u8]) {
    for (&byte, out) in src.iter().zip(dst.chunks_exact_mut(PIXELS_PER_BYTE)) {
        out[0] = (byte >> 6) & 0x03;
        out[1] = (byte >> 4) & 0x03;
        out[2] = (byte >> 2) & 0x03;
        out[3] = byte & 0x03;
    }
}

fn pack_row(src: &[u8], dst: &mut [u8]) {
    for (pixels, out) in src.chunks_exact(PIXELS_PER_BYTE).zip(dst.iter_mut()) {
        *out = pixels.iter().fold(0u8, |acc, &px| (acc << 2) | (px & 0x03));
    }
}

/// De-interleave a CGA buffer into a linear buffer of indices 0–3.
///
/// `src` may be larger than the image (CGA dumps are always 16 KiB); the
/// even bank starts at 0 and the odd bank at `src.len() / 2`.
///
/// # Panics
///
/// If `width` is not a multiple of 4, `height` is odd, `src.len()` is odd,
/// a bank is too small for `height / 2` rows, or `dst.len() != width * height`.
pub fn decode_into(src: &[u8], dst: &mut [u8], width: usize, height: usize) {
    check_geometry(src.len(), dst.len(), width, height);
    if dst.is_empty() {
        return;
    }
    let row_bytes = width / PIXELS_PER_BYTE;
    let (even, odd) = src.split_at(src.len() / 2);
    for ((pair, even_row), odd_row) in dst
        .chunks_exact_mut(width * 2)
        .zip(even.chunks_exact(row_bytes))
        .zip(odd.chunks_exact(row_bytes))
    {
        let (even_dst, odd_dst) = pair.split_at_mut(width);
        unpack_row(even_row, even_dst);
        unpack_row(odd_row, odd_dst);
    }
}

/// Interleave a linear buffer into CGA banks.
///
/// Only the low 2 bits of each index are used. Bytes of `dst` outside the
/// image area are zeroed.
///
/// # Panics
///
/// Under the same conditions as [`decode_into`], with `src` and `dst`
/// swapped.
pub fn encode_into(src: &[u8], dst: &mut [u8], width: usize, height: usize) {
    check_geometry(dst.len(), src.len(), width, height);
    dst.fill(0);
    if src.is_empty() {
        return;
    }
    let row_bytes = width / PIXELS_PER_BYTE;
    let half = dst.len() / 2;
    let (even, odd) = dst.split_at_mut(half);
    for ((pair, even_row), odd_row) in src
        .chunks_exact(width * 2)
        .zip(even.chunks_exact_mut(row_bytes))
        .zip(odd.chunks_exact_mut(row_bytes))
    {
        let (even_src, odd_src) = pair.split_at(width);
        pack_row(even_src, even_row);
        pack_row(odd_src, odd_row);
    }
}

/// Allocating form of [`decode_into`].
pub fn decode(src: &[u8], width: usize, height: usize) -> Vec<u8> {
    let mut dst = vec![0u8; width * height];
    decode_into(src, &mut dst, width, height);
    dst
}

/// Allocating form of [`encode_into`] producing the smallest buffer that
/// holds both banks (`width * height / 4` bytes).
pub fn encode(src: &[u8], width: usize, height: usize) -> Vec<u8> {
    let mut dst = vec![0u8; width / PIXELS_PER_BYTE * height];
    encode_into(src, &mut dst, width, height);
    dst
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_alternate_between_banks() {
        // 4x4: rows 0..3 filled with 0, 1, 2, 3.
        let linear: Vec<u8> = (0..16).map(|i| (i / 4) as u8).collect();
        let packed = encode(&linear, 4, 4);
        // Even bank: rows 0 and 2; odd bank: rows 1 and 3.
        assert_eq!(packed, [0x00, 0xAA, 0x55, 0xFF]);
        assert_eq!(decode(&packed, 4, 4), linear);
    }

    #[test]
    fn leftmost_pixel_in_top_bits() {
        let linear = [3u8, 0, 1, 2, 0, 0, 0, 0];
        let packed = encode(&linear, 4, 2);
        assert_eq!(packed, [0b1100_0110, 0x00]);
    }

    #[test]
    fn odd_bank_starts_at_half_of_oversized_buffer() {
        let mut packed = vec![0u8; 16];
        packed[0] = 0xFF;
        packed[8] = 0x55;
        let linear = decode(&packed, 4, 2);
        assert_eq!(linear, [3, 3, 3, 3, 1, 1, 1, 1]);

        let mut again = vec![0xAAu8; 16];
        encode_into(&linear, &mut again, 4, 2);
        assert_eq!(again, packed);
    }

    #[test]
    #[should_panic(expected = "is not even")]
    fn odd_height_is_rejected() {
        decode(&[0u8; 4], 4, 3);
    }

    #[test]
    #[should_panic(expected = "cannot hold")]
    fn bank_overflow_is_rejected() {
        decode(&[0u8; 4], 8, 4);
    }
}
