//! BMP row packing utilities.

use crate::error::SsiError;

/// Row stride in bytes for a paletted BMP of `width` pixels.
///
/// 8 bpp rows are padded to a 4-byte boundary. 4 bpp rows use
/// `((width + 3) & !3) / 2`, which equals the 4-byte aligned size whenever
/// `width` is a multiple of 8.
pub fn row_stride(width: u32, bits_per_pixel: u16) -> Result<usize, SsiError> {
    let padded = (u64::from(width) + 3) & !3;
    let stride = match bits_per_pixel {
        4 => padded / 2,
        8 => padded,
        other => {
            return Err(SsiError::UnsupportedPixelFormat(alloc::format!(
                "{other} bits per pixel (expected 4 or 8)"
            )));
        }
    };
    usize::try_from(stride).map_err(|_| SsiError::DimensionsTooLarge { width, height: 0 })
}

/// Expand packed 4-bit indices into one byte per pixel, high nibble first.
///
/// `out.len()` decides how many pixels are produced; a trailing odd pixel
/// takes the high nibble of the last input byte.
pub(crate) fn unpack_nibbles(input: &[u8], out: &mut [u8]) {
    let mut in_iter = input.iter();
    let mut out_iter = out.chunks_exact_mut(2);

    (&mut out_iter)
        .zip(&mut in_iter)
        .for_each(|(out_vals, in_val)| {
            out_vals[0] = (in_val >> 4) & 0x0f;
            out_vals[1] = in_val & 0x0f;
        });

    if let (Some(in_val), [last]) = (in_iter.next(), out_iter.into_remainder()) {
        *last = (in_val >> 4) & 0x0f;
    }
}

/// Pack one-byte-per-pixel indices two per byte, left pixel in the high
/// nibble. A trailing odd pixel leaves the low nibble zero.
pub(crate) fn pack_nibbles(input: &[u8], out: &mut [u8]) {
    for (pair, out_val) in input.chunks(2).zip(out.iter_mut()) {
        let low = pair.get(1).map_or(0, |px| px & 0x0f);
        *out_val = ((pair[0] & 0x0f) << 4) | low;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_for_four_bit_rows() {
        for (width, stride) in [(1, 2), (3, 2), (4, 2), (7, 4), (8, 4), (320, 160), (640, 320)] {
            assert_eq!(row_stride(width, 4).unwrap(), stride, "width {width}");
        }
    }

    #[test]
    fn stride_for_eight_bit_rows() {
        for (width, stride) in [(1, 4), (3, 4), (4, 4), (7, 8), (8, 8), (320, 320), (640, 640)] {
            assert_eq!(row_stride(width, 8).unwrap(), stride, "width {width}");
        }
    }

    #[test]
    fn stride_rejects_other_depths() {
        assert!(matches!(
            row_stride(8, 24),
            Err(SsiError::UnsupportedPixelFormat(_))
        ));
    }

    #[test]
    fn odd_width_nibbles() {
        let mut packed = [0u8; 2];
        pack_nibbles(&[0x1, 0x2, 0xF], &mut packed);
        assert_eq!(packed, [0x12, 0xF0]);

        let mut pixels = [0u8; 3];
        unpack_nibbles(&packed, &mut pixels);
        assert_eq!(pixels, [0x1, 0x2, 0xF]);
    }
}
