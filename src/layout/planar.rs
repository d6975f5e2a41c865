//! 4-bit planar layout (EGA / Amiga bit-planes).

use alloc::vec;
use alloc::vec::Vec;

/// Number of bit-planes in a 16 colour image.
pub const PLANES: usize = 4;

/// Pixels carried by one byte of one plane.
pub const PIXELS_PER_PLANE_BYTE: usize = 8;

/// Split a planar buffer into its four equally sized planes.
fn split_planes(packed: &[u8]) -> [&[u8]; PLANES] {
    let plane_len = packed.len() / PLANES;
    let (p0, rest) = packed.split_at(plane_len);
    let (p1, rest) = rest.split_at(plane_len);
    let (p2, p3) = rest.split_at(plane_len);
    [p0, p1, p2, p3]
}

fn unpack_planes(planes: [&[u8]; PLANES], dst: &mut [u8]) {
    for (i, out) in dst.chunks_exact_mut(PIXELS_PER_PLANE_BYTE).enumerate() {
        let bytes = [planes[0][i], planes[1][i], planes[2][i], planes[3][i]];
        for (pos, px) in out.iter_mut().enumerate() {
            let shift = 7 - pos;
            *px = bytes
                .iter()
                .enumerate()
                .fold(0u8, |acc, (plane, b)| acc | (((b >> shift) & 0x01) << plane));
        }
    }
}

fn pack_planes(src: &[u8], dst: &mut [u8]) {
    let plane_len = dst.len() / PLANES;
    for (i, pixels) in src.chunks_exact(PIXELS_PER_PLANE_BYTE).enumerate() {
        let mut bytes = [0u8; PLANES];
        for &px in pixels {
            for (plane, b) in bytes.iter_mut().enumerate() {
                *b = (*b << 1) | ((px >> plane) & 0x01);
            }
        }
        for (plane, b) in bytes.into_iter().enumerate() {
            dst[plane * plane_len + i] = b;
        }
    }
}

/// Unpack a globally planar buffer into a linear buffer.
///
/// `src` holds four consecutive planes of `src.len() / 4` bytes each; `dst`
/// receives `src.len() * 2` indices in the range 0–15.
///
/// # Panics
///
/// If `src.len()` is not a multiple of 4 or `dst.len() != src.len() * 2`.
pub fn decode_into(src: &[u8], dst: &mut [u8]) {
    assert!(
        src.len() % PLANES == 0,
        "planar buffer length {} is not a multiple of {PLANES}",
        src.len()
    );
    assert_eq!(
        dst.len(),
        src.len() * 2,
        "linear buffer must hold 2 pixels per planar byte"
    );
    unpack_planes(split_planes(src), dst);
}

/// Pack a linear buffer into four global bit-planes.
///
/// Only the low 4 bits of each index are used.
///
/// # Panics
///
/// If `dst.len()` is not a multiple of 4 or `src.len() != dst.len() * 2`.
pub fn encode_into(src: &[u8], dst: &mut [u8]) {
    assert!(
        dst.len() % PLANES == 0,
        "planar buffer length {} is not a multiple of {PLANES}",
        dst.len()
    );
    assert_eq!(
        src.len(),
        dst.len() * 2,
        "linear buffer must hold 2 pixels per planar byte"
    );
    pack_planes(src, dst);
}

/// Allocating form of [`decode_into`].
pub fn decode(src: &[u8]) -> Vec<u8> {
    let mut dst = vec![0u8; src.len() * 2];
    decode_into(src, &mut dst);
    dst
}

/// Allocating form of [`encode_into`].
///
/// # Panics
///
/// If `src.len()` is not a multiple of 8.
pub fn encode(src: &[u8]) -> Vec<u8> {
    assert!(
        src.len() % PIXELS_PER_PLANE_BYTE == 0,
        "pixel count {} is not a multiple of {PIXELS_PER_PLANE_BYTE}",
        src.len()
    );
    let mut dst = vec![0u8; src.len() / 2];
    encode_into(src, &mut dst);
    dst
}

fn check_interleaved_geometry(packed_len: usize, linear_len: usize, width: usize, height: usize) {
    assert!(
        width % PIXELS_PER_PLANE_BYTE == 0,
        "interleaved planar width {width} is not a multiple of {PIXELS_PER_PLANE_BYTE}"
    );
    assert_eq!(
        packed_len,
        width / 2 * height,
        "interleaved planar buffer does not match {width}x{height}"
    );
    assert_eq!(
        linear_len,
        width * height,
        "linear buffer does not match {width}x{height}"
    );
}

/// Unpack a per-scanline planar buffer into a linear buffer.
///
/// Each scanline occupies `width / 2` bytes and carries its own four planes
/// of `width / 8` bytes.
///
/// # Panics
///
/// If `width` is not a multiple of 8, `src.len() != width / 2 * height`, or
/// `dst.len() != width * height`.
pub fn decode_interleaved_into(src: &[u8], dst: &mut [u8], width: usize, height: usize) {
    check_interleaved_geometry(src.len(), dst.len(), width, height);
    if width == 0 {
        return;
    }
    for (row_src, row_dst) in src.chunks_exact(width / 2).zip(dst.chunks_exact_mut(width)) {
        unpack_planes(split_planes(row_src), row_dst);
    }
}

/// Pack a linear buffer into per-scanline bit-planes.
///
/// # Panics
///
/// If `width` is not a multiple of 8, `dst.len() != width / 2 * height`, or
/// `src.len() != width * height`.
pub fn encode_interleaved_into(src: &[u8], dst: &mut [u8], width: usize, height: usize) {
    check_interleaved_geometry(dst.len(), src.len(), width, height);
    if width == 0 {
        return;
    }
    for (row_src, row_dst) in src.chunks_exact(width).zip(dst.chunks_exact_mut(width / 2)) {
        pack_planes(row_src, row_dst);
    }
}

/// Allocating form of [`decode_interleaved_into`].
pub fn decode_interleaved(src: &[u8], width: usize, height: usize) -> Vec<u8> {
    let mut dst = vec![0u8; width * height];
    decode_interleaved_into(src, &mut dst, width, height);
    dst
}

/// Allocating form of [`encode_interleaved_into`].
pub fn encode_interleaved(src: &[u8], width: usize, height: usize) -> Vec<u8> {
    let mut dst = vec![0u8; width / 2 * height];
    encode_interleaved_into(src, &mut dst, width, height);
    dst
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_group_bit_order() {
        // Pixel 0 = 0b0001 (plane 0 only), pixel 7 = 0b1000 (plane 3 only).
        let mut linear = [0u8; 8];
        linear[0] = 0x1;
        linear[7] = 0x8;
        let packed = encode(&linear);
        assert_eq!(packed, [0x80, 0x00, 0x00, 0x01]);
        assert_eq!(decode(&packed), linear);
    }

    #[test]
    fn all_fives_fill_planes_zero_and_two() {
        let linear = [5u8; 64];
        let packed = encode(&linear);
        assert_eq!(packed.len(), 32);
        assert!(packed[0..8].iter().all(|&b| b == 0xFF));
        assert!(packed[8..16].iter().all(|&b| b == 0x00));
        assert!(packed[16..24].iter().all(|&b| b == 0xFF));
        assert!(packed[24..32].iter().all(|&b| b == 0x00));
        assert_eq!(decode(&packed), linear);
    }

    #[test]
    fn high_bits_are_ignored_on_encode() {
        let linear = [0xF3u8; 8];
        let packed = encode(&linear);
        assert_eq!(decode(&packed), [0x03u8; 8]);
    }

    #[test]
    fn interleaved_planes_restart_each_row() {
        // 8x2: row 0 all index 1, row 1 all index 8.
        let mut linear = [1u8; 16];
        linear[8..].fill(8);
        let packed = encode_interleaved(&linear, 8, 2);
        assert_eq!(packed, [0xFF, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF]);
        assert_eq!(decode_interleaved(&packed, 8, 2), linear);
    }

    #[test]
    fn interleaved_differs_from_global_for_multi_row_images() {
        let linear: Vec<u8> = (0..32).map(|i| (i % 16) as u8).collect();
        assert_ne!(encode(&linear), encode_interleaved(&linear, 16, 2));
    }

    #[test]
    fn single_row_interleaved_matches_global() {
        let linear: Vec<u8> = (0..16).map(|i| (15 - i) as u8).collect();
        assert_eq!(encode(&linear), encode_interleaved(&linear, 16, 1));
    }

    #[test]
    #[should_panic(expected = "2 pixels per planar byte")]
    fn decode_rejects_short_destination() {
        let mut dst = [0u8; 7];
        decode_into(&[0u8; 4], &mut dst);
    }

    #[test]
    #[should_panic(expected = "not a multiple of 8")]
    fn interleaved_rejects_partial_plane_bytes() {
        decode_interleaved(&[0u8; 6], 12, 1);
    }
}
