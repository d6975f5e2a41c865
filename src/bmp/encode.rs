//! Paletted BMP encoder: uncompressed 4 bpp and 8 bpp, bottom-up rows.

use alloc::vec::Vec;
use enough::Stop;
use rgb::RGB8;

use super::utils::{pack_nibbles, row_stride};
use super::{BMP_SIGNATURE, FILE_HEADER_SIZE, INFO_HEADER_SIZE, PALETTE_ENTRY_SIZE, RESOLUTION_96_DPI};
use crate::error::SsiError;
use crate::pixel::PixelDepth;

/// Encode a linear index buffer as a paletted BMP.
///
/// `depth` must be [`PixelDepth::Index4`] or [`PixelDepth::Index8`]; the first
/// 16 or 256 entries of `palette` are embedded.
pub(crate) fn encode_bmp(
    pixels: &[u8],
    width: u32,
    height: u32,
    palette: &[RGB8],
    depth: PixelDepth,
    stop: &dyn Stop,
) -> Result<Vec<u8>, SsiError> {
    if width == 0 || height == 0 {
        return Err(SsiError::InvalidDimensions(alloc::format!(
            "cannot encode a {width}x{height} BMP"
        )));
    }
    if width > i32::MAX as u32 || height > i32::MAX as u32 {
        return Err(SsiError::DimensionsTooLarge { width, height });
    }
    let bpp = match depth {
        PixelDepth::Index4 | PixelDepth::Index8 => depth.bits(),
        other => {
            return Err(SsiError::UnsupportedPixelFormat(alloc::format!(
                "cannot store {other:?} indices in a BMP"
            )));
        }
    };

    let w = width as usize;
    let h = height as usize;
    let expected = w
        .checked_mul(h)
        .ok_or(SsiError::DimensionsTooLarge { width, height })?;
    if pixels.len() < expected {
        return Err(SsiError::BufferTooSmall {
            needed: expected,
            actual: pixels.len(),
        });
    }
    let colors = depth.palette_len();
    if palette.len() < colors {
        return Err(SsiError::PaletteTooSmall {
            needed: colors,
            actual: palette.len(),
        });
    }

    let row_stride = row_stride(width, bpp)?;
    let image_offset = FILE_HEADER_SIZE + INFO_HEADER_SIZE + colors * PALETTE_ENTRY_SIZE;
    let pixel_data_size = row_stride
        .checked_mul(h)
        .ok_or(SsiError::DimensionsTooLarge { width, height })?;
    let file_size = pixel_data_size
        .checked_add(image_offset)
        .filter(|&size| u32::try_from(size).is_ok())
        .ok_or(SsiError::DimensionsTooLarge { width, height })?;

    stop.check()?;

    let mut out = Vec::new();
    out.try_reserve_exact(file_size)
        .map_err(|_| SsiError::AllocationFailed { bytes: file_size })?;
    write_bmp_header(
        &mut out,
        &HeaderFields {
            file_size: file_size as u32,
            image_offset: image_offset as u32,
            pixel_data_size: pixel_data_size as u32,
            width,
            height,
            bpp,
            colors: colors as u32,
        },
    );
    write_palette(&mut out, &palette[..colors]);

    let mut line = alloc::vec![0u8; row_stride];
    for (row_idx, row) in pixels[..expected].rchunks_exact(w).enumerate() {
        if row_idx % 16 == 0 {
            stop.check()?;
        }
        line.fill(0);
        match depth {
            PixelDepth::Index8 => line[..w].copy_from_slice(row),
            _ => pack_nibbles(row, &mut line),
        }
        out.extend_from_slice(&line);
    }

    Ok(out)
}

struct HeaderFields {
    file_size: u32,
    image_offset: u32,
    pixel_data_size: u32,
    width: u32,
    height: u32,
    bpp: u16,
    colors: u32,
}

fn write_bmp_header(out: &mut Vec<u8>, fields: &HeaderFields) {
    // File header (14 bytes)
    out.extend_from_slice(&BMP_SIGNATURE);
    out.extend_from_slice(&fields.file_size.to_le_bytes());
    out.extend_from_slice(&[0u8; 4]); // reserved
    out.extend_from_slice(&fields.image_offset.to_le_bytes());

    // DIB header (BITMAPINFOHEADER, 40 bytes)
    out.extend_from_slice(&(INFO_HEADER_SIZE as u32).to_le_bytes());
    out.extend_from_slice(&(fields.width as i32).to_le_bytes());
    out.extend_from_slice(&(fields.height as i32).to_le_bytes()); // positive = bottom-up
    out.extend_from_slice(&1u16.to_le_bytes()); // planes
    out.extend_from_slice(&fields.bpp.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes()); // compression
    out.extend_from_slice(&fields.pixel_data_size.to_le_bytes());
    out.extend_from_slice(&RESOLUTION_96_DPI.to_le_bytes());
    out.extend_from_slice(&RESOLUTION_96_DPI.to_le_bytes());
    out.extend_from_slice(&fields.colors.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes()); // important colors
}

fn write_palette(out: &mut Vec<u8>, palette: &[RGB8]) {
    for entry in palette {
        out.extend_from_slice(&[entry.b, entry.g, entry.r, 0]);
    }
}
