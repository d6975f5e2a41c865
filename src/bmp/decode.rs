//! Paletted BMP decoder (4 bpp / 16 colours and 8 bpp / 256 colours).
//!
//! The on-disk palette is skipped: index meaning is fixed by convention
//! (CGA/EGA/VGA hardware palettes), so only the indices are returned.

use enough::Stop;

use super::utils::{row_stride, unpack_nibbles};
use super::{BMP_SIGNATURE, FILE_HEADER_SIZE, INFO_HEADER_SIZE};
use crate::decode::DecodeOutput;
use crate::error::SsiError;
use crate::limits::{Limits, alloc_zeroed, check_limits};
use crate::pixel::PixelDepth;

// ── Cursor for reading from &[u8] ───────────────────────────────────

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn set_position(&mut self, pos: usize) -> Result<(), SsiError> {
        if pos > self.data.len() {
            return Err(SsiError::ShortRead {
                needed: pos,
                actual: self.data.len(),
            });
        }
        self.pos = pos;
        Ok(())
    }

    fn read_slice(&mut self, n: usize) -> Result<&'a [u8], SsiError> {
        let end = self.pos.checked_add(n).ok_or(SsiError::ShortRead {
            needed: usize::MAX,
            actual: self.data.len(),
        })?;
        let slice = self.data.get(self.pos..end).ok_or(SsiError::ShortRead {
            needed: end,
            actual: self.data.len(),
        })?;
        self.pos = end;
        Ok(slice)
    }

    fn read_fixed_bytes<const N: usize>(&mut self) -> Result<[u8; N], SsiError> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.read_slice(N)?);
        Ok(buf)
    }

    fn get_u16_le(&mut self) -> Result<u16, SsiError> {
        Ok(u16::from_le_bytes(self.read_fixed_bytes()?))
    }

    fn get_u32_le(&mut self) -> Result<u32, SsiError> {
        Ok(u32::from_le_bytes(self.read_fixed_bytes()?))
    }

    fn get_i32_le(&mut self) -> Result<i32, SsiError> {
        Ok(i32::from_le_bytes(self.read_fixed_bytes()?))
    }
}

// ── Parsed BMP header ───────────────────────────────────────────────

/// Raw header fields as stored on disk.
struct RawHeader {
    file_size: u32,
    reserved: u32,
    image_offset: u32,
    header_size: u32,
    width: i32,
    height: i32,
    planes: u16,
    bits_per_pixel: u16,
    compression: u32,
    image_size: u32,
    num_colors: u32,
}

fn read_raw_header(bytes: &mut Cursor<'_>) -> Result<RawHeader, SsiError> {
    if bytes.read_fixed_bytes::<2>()? != BMP_SIGNATURE {
        return Err(SsiError::NotABmpFile);
    }
    // Fail on a short header before looking at any field.
    let needed = FILE_HEADER_SIZE + INFO_HEADER_SIZE;
    if bytes.data.len() < needed {
        return Err(SsiError::ShortRead {
            needed,
            actual: bytes.data.len(),
        });
    }

    let file_size = bytes.get_u32_le()?;
    let reserved = bytes.get_u32_le()?;
    let image_offset = bytes.get_u32_le()?;
    let header_size = bytes.get_u32_le()?;
    let width = bytes.get_i32_le()?;
    let height = bytes.get_i32_le()?;
    let planes = bytes.get_u16_le()?;
    let bits_per_pixel = bytes.get_u16_le()?;
    let compression = bytes.get_u32_le()?;
    let image_size = bytes.get_u32_le()?;
    let _h_res = bytes.get_u32_le()?;
    let _v_res = bytes.get_u32_le()?;
    let num_colors = bytes.get_u32_le()?;
    let _important_colors = bytes.get_u32_le()?;

    Ok(RawHeader {
        file_size,
        reserved,
        image_offset,
        header_size,
        width,
        height,
        planes,
        bits_per_pixel,
        compression,
        image_size,
        num_colors,
    })
}

/// Validated header of a paletted BMP.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BmpInfo {
    pub width: u32,
    pub height: u32,
    /// Index depth: [`PixelDepth::Index4`] or [`PixelDepth::Index8`].
    pub depth: PixelDepth,
    /// Rows are stored top row first (negative height on disk).
    pub top_down: bool,
    /// Byte offset of the first pixel row.
    pub image_offset: u32,
    /// `file_size` field as stored (not checked against the data length).
    pub file_size: u32,
    /// `bitmap_size` field as stored.
    pub image_size: u32,
}

fn validate(raw: &RawHeader) -> Result<BmpInfo, SsiError> {
    if raw.planes != 1 {
        return Err(SsiError::InvalidHeader(alloc::format!(
            "BMP planes field is {}, expected 1",
            raw.planes
        )));
    }
    if raw.header_size as usize != INFO_HEADER_SIZE {
        return Err(SsiError::InvalidHeader(alloc::format!(
            "BMP info header size is {}, expected {INFO_HEADER_SIZE}",
            raw.header_size
        )));
    }
    if raw.reserved != 0 {
        return Err(SsiError::InvalidHeader(alloc::format!(
            "BMP reserved field is {:#x}, expected 0",
            raw.reserved
        )));
    }

    let depth = match (raw.bits_per_pixel, raw.num_colors) {
        (4, 16) => PixelDepth::Index4,
        (8, 256) => PixelDepth::Index8,
        (bpp, colors) => {
            return Err(SsiError::UnsupportedPixelFormat(alloc::format!(
                "{bpp} bits per pixel with {colors} palette colours"
            )));
        }
    };
    if raw.compression != 0 {
        return Err(SsiError::UnsupportedPixelFormat(alloc::format!(
            "BMP compression {} (only uncompressed is supported)",
            raw.compression
        )));
    }

    if raw.width <= 0 {
        return Err(SsiError::InvalidHeader(alloc::format!(
            "BMP width is {}",
            raw.width
        )));
    }
    if raw.height == 0 {
        return Err(SsiError::InvalidHeader("BMP height is zero".into()));
    }

    Ok(BmpInfo {
        width: raw.width as u32,
        height: raw.height.unsigned_abs(),
        depth,
        top_down: raw.height < 0,
        image_offset: raw.image_offset,
        file_size: raw.file_size,
        image_size: raw.image_size,
    })
}

/// Parse and validate a BMP header without decoding pixels.
pub fn probe_bmp(data: &[u8]) -> Result<BmpInfo, SsiError> {
    let mut bytes = Cursor::new(data);
    let raw = read_raw_header(&mut bytes)?;
    validate(&raw)
}

// ── Full decode ─────────────────────────────────────────────────────

/// Decode a paletted BMP into one index per byte, top row first.
pub(crate) fn decode_bmp_pixels(
    data: &[u8],
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<DecodeOutput, SsiError> {
    let mut bytes = Cursor::new(data);
    let info = validate(&read_raw_header(&mut bytes)?)?;

    let palette_bytes = (info.image_offset as usize).saturating_sub(FILE_HEADER_SIZE + INFO_HEADER_SIZE);
    if palette_bytes > 0 {
        log::debug!("skipping {palette_bytes} bytes of on-disk BMP palette");
    }

    let w = info.width as usize;
    let h = info.height as usize;
    let out_bytes = w.checked_mul(h).ok_or(SsiError::DimensionsTooLarge {
        width: info.width,
        height: info.height,
    })?;
    check_limits(limits, info.width, info.height, out_bytes)?;

    let stride = row_stride(info.width, info.depth.bits())?;
    let needed = stride
        .checked_mul(h)
        .and_then(|len| len.checked_add(info.image_offset as usize))
        .ok_or(SsiError::DimensionsTooLarge {
            width: info.width,
            height: info.height,
        })?;
    if data.len() < needed {
        return Err(SsiError::ShortRead {
            needed,
            actual: data.len(),
        });
    }
    bytes.set_position(info.image_offset as usize)?;

    stop.check()?;
    let mut buf = alloc_zeroed(out_bytes)?;

    let mut decode_row = |row_idx: usize, out: &mut [u8]| -> Result<(), SsiError> {
        if row_idx % 16 == 0 {
            stop.check()?;
        }
        let line = bytes.read_slice(stride)?;
        match info.depth {
            PixelDepth::Index8 => out.copy_from_slice(&line[..w]),
            _ => unpack_nibbles(line, out),
        }
        Ok(())
    };

    if info.top_down {
        for (row_idx, out) in buf.chunks_exact_mut(w).enumerate() {
            decode_row(row_idx, out)?;
        }
    } else {
        for (row_idx, out) in buf.rchunks_exact_mut(w).enumerate() {
            decode_row(row_idx, out)?;
        }
    }

    log::trace!(
        "decoded {}x{} BMP ({} bpp, {})",
        info.width,
        info.height,
        info.depth.bits(),
        if info.top_down { "top-down" } else { "bottom-up" }
    );
    Ok(DecodeOutput::new(buf, info.width, info.height, info.depth))
}
