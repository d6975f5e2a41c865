//! Paletted BMP container codec.
//!
//! Use top-level [`crate::decode_bmp`], [`crate::encode_bmp4`] and
//! [`crate::encode_bmp8`] for whole-image conversion; this module exposes the
//! header probe and stride math.

mod decode;
mod encode;
mod utils;

pub use decode::{BmpInfo, probe_bmp};
pub use utils::row_stride;

use crate::decode::DecodeOutput;
use crate::error::SsiError;
use crate::limits::Limits;
use crate::pixel::PixelDepth;
use alloc::vec::Vec;
use enough::Stop;
use rgb::RGB8;

/// `"BM"` signature at offset 0.
pub const BMP_SIGNATURE: [u8; 2] = *b"BM";

/// Signature plus file size, reserved and image offset fields.
pub const FILE_HEADER_SIZE: usize = 14;

/// BITMAPINFOHEADER size; the only info header accepted.
pub const INFO_HEADER_SIZE: usize = 40;

/// On-disk palette entry: blue, green, red, reserved.
pub const PALETTE_ENTRY_SIZE: usize = 4;

/// 96 DPI in pixels per metre.
pub const RESOLUTION_96_DPI: u32 = 3780;

/// Decode BMP data into a linear index buffer.
pub(crate) fn decode(
    data: &[u8],
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<DecodeOutput, SsiError> {
    decode::decode_bmp_pixels(data, limits, stop)
}

/// Encode a linear index buffer to BMP.
pub(crate) fn encode(
    pixels: &[u8],
    width: u32,
    height: u32,
    palette: &[RGB8],
    depth: PixelDepth,
    stop: &dyn Stop,
) -> Result<Vec<u8>, SsiError> {
    encode::encode_bmp(pixels, width, height, palette, depth, stop)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use enough::Unstoppable;

    fn grey_ramp(n: usize) -> Vec<RGB8> {
        (0..n).map(|i| RGB8::new(i as u8, i as u8, i as u8)).collect()
    }

    #[test]
    fn header_fields_for_four_bit() {
        let pixels = vec![1u8; 8 * 2];
        let bmp = encode(&pixels, 8, 2, &grey_ramp(16), PixelDepth::Index4, &Unstoppable).unwrap();
        let u32_at = |off: usize| u32::from_le_bytes(bmp[off..off + 4].try_into().unwrap());
        let u16_at = |off: usize| u16::from_le_bytes(bmp[off..off + 2].try_into().unwrap());

        assert_eq!(&bmp[0..2], b"BM");
        assert_eq!(u32_at(2) as usize, bmp.len());
        assert_eq!(u32_at(6), 0);
        assert_eq!(u32_at(10), 54 + 16 * 4);
        assert_eq!(u32_at(14), 40);
        assert_eq!(u32_at(18), 8);
        assert_eq!(u32_at(22), 2);
        assert_eq!(u16_at(26), 1);
        assert_eq!(u16_at(28), 4);
        assert_eq!(u32_at(30), 0);
        assert_eq!(u32_at(34), 4 * 2);
        assert_eq!(u32_at(38), 3780);
        assert_eq!(u32_at(42), 3780);
        assert_eq!(u32_at(46), 16);
        assert_eq!(u32_at(50), 0);
        assert_eq!(bmp.len(), 54 + 64 + 8);
    }

    #[test]
    fn palette_is_written_bgr0() {
        let mut palette = vec![RGB8::default(); 256];
        palette[1] = RGB8::new(0x11, 0x22, 0x33);
        let bmp = encode(&[1u8], 1, 1, &palette, PixelDepth::Index8, &Unstoppable).unwrap();
        assert_eq!(&bmp[58..62], &[0x33, 0x22, 0x11, 0x00]);
        assert_eq!(bmp.len(), 54 + 1024 + 4);
    }

    #[test]
    fn rows_are_written_bottom_up_with_padding() {
        // 3x2 8 bpp: stride 4.
        let pixels = [1u8, 2, 3, 4, 5, 6];
        let bmp = encode(&pixels, 3, 2, &grey_ramp(256), PixelDepth::Index8, &Unstoppable).unwrap();
        let data = &bmp[54 + 1024..];
        assert_eq!(data, &[4, 5, 6, 0, 1, 2, 3, 0]);
    }

    #[test]
    fn probe_reports_geometry() {
        let bmp = encode(&[0u8; 16], 4, 4, &grey_ramp(16), PixelDepth::Index4, &Unstoppable).unwrap();
        let info = probe_bmp(&bmp).unwrap();
        assert_eq!((info.width, info.height), (4, 4));
        assert_eq!(info.depth, PixelDepth::Index4);
        assert!(!info.top_down);
        assert_eq!(info.image_offset, 118);
    }

    #[test]
    fn two_bit_depth_is_not_a_bmp_depth() {
        let err = encode(&[0u8; 4], 2, 2, &grey_ramp(16), PixelDepth::Index2, &Unstoppable);
        assert!(matches!(err, Err(SsiError::UnsupportedPixelFormat(_))));
    }
}
