//! SSI-IMG format dispatcher.
//!
//! SSI-IMG files are headerless dumps of adapter video memory; the geometry
//! and layout come from the caller, usually as a resolution token such as
//! `320x200c1` (see [`Resolution`]).
//!
//! | Format          | Layout                          | File size                 |
//! |-----------------|---------------------------------|---------------------------|
//! | CGA             | 2 bpp, even/odd scanline banks  | always 16384 bytes        |
//! | EGA             | 4 global bit-planes             | `width * height / 2`      |
//! | EGA-interleaved | 4 bit-planes per scanline       | `width * height / 2`      |
//! | Amiga           | 4 global bit-planes + palette   | `width * height / 2 + 64` |

mod resolution;
mod tables;

pub use resolution::Resolution;
pub use tables::{
    CGA_TO_EGA, EGA_DEFAULT_REGISTERS, EGA_HARDWARE_PALETTE, cga_palette, ega_default_palette,
};

use alloc::vec::Vec;
use core::fmt;

use enough::Stop;
use rgb::RGB8;

use crate::error::SsiError;
use crate::layout::{cga, planar};
use crate::limits::{Limits, alloc_zeroed, check_limits};
use crate::palette::{pal4_to_pal8, pal8_to_pal4};
use crate::pixel::PixelDepth;

/// CGA dumps are a full 16 KiB video segment regardless of geometry.
pub const CGA_IMAGE_SIZE: usize = 16384;

/// Size of the palette block trailing an Amiga image.
pub const AMIGA_PALETTE_BLOCK_SIZE: usize = 64;

/// Entries stored in the Amiga palette block (2 bytes each).
pub const AMIGA_PALETTE_ENTRIES: usize = 16;

/// One of the six CGA palettes, selected by digit 0–5.
///
/// | Digit | Colours 1–3                          | Adapter setting            |
/// |-------|--------------------------------------|----------------------------|
/// | 0     | green, red, brown                    | mode 4 palette 0 low       |
/// | 1     | light green, light red, yellow       | mode 4 palette 0 high      |
/// | 2     | cyan, magenta, light grey            | mode 4 palette 1 low       |
/// | 3     | light cyan, light magenta, white     | mode 4 palette 1 high      |
/// | 4     | cyan, red, light grey                | mode 5 low                 |
/// | 5     | light cyan, light red, white         | mode 5 high                |
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CgaPalette(u8);

impl CgaPalette {
    pub const COUNT: u8 = 6;

    pub fn new(index: u8) -> Result<Self, SsiError> {
        if index >= Self::COUNT {
            return Err(SsiError::InvalidPaletteSelector(alloc::format!(
                "CGA palette {index} (expected 0-5)"
            )));
        }
        Ok(Self(index))
    }

    pub fn index(self) -> u8 {
        self.0
    }
}

impl Default for CgaPalette {
    fn default() -> Self {
        Self(1)
    }
}

/// Packed layout of an SSI-IMG file.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum SsiFormat {
    /// 16 colour, four global bit-planes.
    #[default]
    Ega,
    /// 16 colour, four bit-planes repeated per scanline.
    EgaInterleaved,
    /// 4 colour, 2 bpp, even/odd scanline banks.
    Cga(CgaPalette),
    /// 16 colour planar image followed by a 64-byte palette block.
    Amiga,
}

impl SsiFormat {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ega => "EGA",
            Self::EgaInterleaved => "EGA-interleaved",
            Self::Cga(_) => "CGA",
            Self::Amiga => "Amiga",
        }
    }

    /// Index depth of the decoded linear buffer.
    pub fn depth(&self) -> PixelDepth {
        match self {
            Self::Cga(_) => PixelDepth::Index2,
            _ => PixelDepth::Index4,
        }
    }

    /// Exact file size this format requires for a `width` x `height` image.
    pub fn expected_size(&self, width: u32, height: u32) -> Result<usize, SsiError> {
        if let Self::Cga(_) = self {
            return Ok(CGA_IMAGE_SIZE);
        }
        let planar = (width as usize)
            .checked_mul(height as usize)
            .map(|px| px / 2)
            .ok_or(SsiError::DimensionsTooLarge { width, height })?;
        match self {
            Self::Amiga => planar
                .checked_add(AMIGA_PALETTE_BLOCK_SIZE)
                .ok_or(SsiError::DimensionsTooLarge { width, height }),
            _ => Ok(planar),
        }
    }

    /// Reject geometry the packed layout cannot represent exactly.
    pub fn check_geometry(&self, width: u32, height: u32) -> Result<(), SsiError> {
        let invalid = |reason: &str| {
            Err(SsiError::InvalidDimensions(alloc::format!(
                "{width}x{height} {}: {reason}",
                self.name()
            )))
        };
        if width == 0 || height == 0 {
            return invalid("width and height must be non-zero");
        }
        let (w, h) = (width as usize, height as usize);
        match self {
            Self::Ega | Self::Amiga => {
                let pixels = w
                    .checked_mul(h)
                    .ok_or(SsiError::DimensionsTooLarge { width, height })?;
                if pixels % 8 != 0 {
                    return invalid("pixel count must be a multiple of 8");
                }
            }
            Self::EgaInterleaved => {
                if w % 8 != 0 {
                    return invalid("width must be a multiple of 8");
                }
            }
            Self::Cga(_) => {
                if w % cga::PIXELS_PER_BYTE != 0 {
                    return invalid("width must be a multiple of 4");
                }
                if h % 2 != 0 {
                    return invalid("height must be even");
                }
                if w / cga::PIXELS_PER_BYTE * (h / 2) > CGA_IMAGE_SIZE / 2 {
                    return invalid("image does not fit in 16 KiB of CGA memory");
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for SsiFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cga(palette) => write!(f, "CGA palette {}", palette.index()),
            other => f.write_str(other.name()),
        }
    }
}

/// A decoded SSI-IMG: linear indices plus the palette they refer to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SsiImage {
    pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: SsiFormat,
    pub palette: [RGB8; 16],
}

impl SsiImage {
    /// Palette indices, one per byte, top row first.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    pub fn depth(&self) -> PixelDepth {
        self.format.depth()
    }

    /// Encode as a 16 colour BMP carrying this image's palette.
    pub fn to_bmp(&self, stop: impl Stop) -> Result<Vec<u8>, SsiError> {
        crate::bmp::encode(
            &self.pixels,
            self.width,
            self.height,
            &self.palette,
            PixelDepth::Index4,
            &stop,
        )
    }
}

/// Decode an SSI-IMG file laid out as `resolution` describes.
pub fn decode_img(
    data: &[u8],
    resolution: &Resolution,
    stop: impl Stop,
) -> Result<SsiImage, SsiError> {
    decode_img_inner(data, resolution, None, &stop)
}

/// [`decode_img`] with resource limits on the decoded buffer.
pub fn decode_img_with_limits(
    data: &[u8],
    resolution: &Resolution,
    limits: &Limits,
    stop: impl Stop,
) -> Result<SsiImage, SsiError> {
    decode_img_inner(data, resolution, Some(limits), &stop)
}

fn decode_img_inner(
    data: &[u8],
    resolution: &Resolution,
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<SsiImage, SsiError> {
    let Resolution {
        width,
        height,
        format,
    } = *resolution;
    format.check_geometry(width, height)?;
    let expected = format.expected_size(width, height)?;
    if data.len() != expected {
        return Err(SsiError::SizeMismatch {
            format: format.name(),
            expected,
            actual: data.len(),
        });
    }

    let (w, h) = (width as usize, height as usize);
    let out_bytes = w
        .checked_mul(h)
        .ok_or(SsiError::DimensionsTooLarge { width, height })?;
    check_limits(limits, width, height, out_bytes)?;
    log::debug!("decoding {width}x{height} {format} image ({expected} bytes)");

    stop.check()?;
    let mut pixels = alloc_zeroed(out_bytes)?;
    let palette = match format {
        SsiFormat::Cga(selector) => {
            cga::decode_into(data, &mut pixels, w, h);
            cga_palette(selector)
        }
        SsiFormat::Amiga => {
            let (image, block) = data.split_at(data.len() - AMIGA_PALETTE_BLOCK_SIZE);
            planar::decode_into(image, &mut pixels);
            read_amiga_palette(block)?
        }
        SsiFormat::EgaInterleaved => {
            planar::decode_interleaved_into(data, &mut pixels, w, h);
            ega_default_palette()
        }
        SsiFormat::Ega => {
            planar::decode_into(data, &mut pixels);
            ega_default_palette()
        }
    };

    Ok(SsiImage {
        pixels,
        width,
        height,
        format,
        palette,
    })
}

/// Encode linear indices into the packed layout of `format`.
///
/// `palette` is only stored by [`SsiFormat::Amiga`]; when `None` the default
/// EGA palette is written. Other formats ignore it.
pub fn encode_img(
    pixels: &[u8],
    width: u32,
    height: u32,
    format: SsiFormat,
    palette: Option<&[RGB8]>,
    stop: impl Stop,
) -> Result<Vec<u8>, SsiError> {
    format.check_geometry(width, height)?;
    let (w, h) = (width as usize, height as usize);
    let count = w
        .checked_mul(h)
        .ok_or(SsiError::DimensionsTooLarge { width, height })?;
    if pixels.len() < count {
        return Err(SsiError::BufferTooSmall {
            needed: count,
            actual: pixels.len(),
        });
    }
    let pixels = &pixels[..count];
    let size = format.expected_size(width, height)?;
    log::debug!("encoding {width}x{height} {format} image ({size} bytes)");

    stop.check()?;
    let mut out = alloc_zeroed(size)?;
    match format {
        SsiFormat::Cga(_) => cga::encode_into(pixels, &mut out, w, h),
        SsiFormat::EgaInterleaved => planar::encode_interleaved_into(pixels, &mut out, w, h),
        SsiFormat::Ega => planar::encode_into(pixels, &mut out),
        SsiFormat::Amiga => {
            let (image, block) = out.split_at_mut(size - AMIGA_PALETTE_BLOCK_SIZE);
            planar::encode_into(pixels, image);
            let default_palette = ega_default_palette();
            write_amiga_palette(palette.unwrap_or(&default_palette), block)?;
        }
    }
    Ok(out)
}

/// Read 16 big-endian `0x0RGB` words and widen them to 8 bits per channel.
fn read_amiga_palette(block: &[u8]) -> Result<[RGB8; 16], SsiError> {
    let mut narrow = [RGB8::default(); AMIGA_PALETTE_ENTRIES];
    for (entry, word) in narrow.iter_mut().zip(block.chunks_exact(2)) {
        let word = u16::from_be_bytes([word[0], word[1]]);
        *entry = RGB8::new(
            ((word >> 8) & 0x0f) as u8,
            ((word >> 4) & 0x0f) as u8,
            (word & 0x0f) as u8,
        );
    }
    let mut palette = [RGB8::default(); AMIGA_PALETTE_ENTRIES];
    pal4_to_pal8(&narrow, &mut palette)?;
    Ok(palette)
}

fn write_amiga_palette(palette: &[RGB8], block: &mut [u8]) -> Result<(), SsiError> {
    if palette.len() < AMIGA_PALETTE_ENTRIES {
        return Err(SsiError::PaletteTooSmall {
            needed: AMIGA_PALETTE_ENTRIES,
            actual: palette.len(),
        });
    }
    let mut narrow = [RGB8::default(); AMIGA_PALETTE_ENTRIES];
    pal8_to_pal4(&palette[..AMIGA_PALETTE_ENTRIES], &mut narrow)?;
    for (entry, word) in narrow.iter().zip(block.chunks_exact_mut(2)) {
        let value = (u16::from(entry.r) << 8) | (u16::from(entry.g) << 4) | u16::from(entry.b);
        word.copy_from_slice(&value.to_be_bytes());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use enough::Unstoppable;

    #[test]
    fn expected_sizes_for_320x200() {
        let cga = SsiFormat::Cga(CgaPalette::default());
        assert_eq!(cga.expected_size(320, 200).unwrap(), 16384);
        assert_eq!(SsiFormat::Ega.expected_size(320, 200).unwrap(), 32000);
        assert_eq!(SsiFormat::EgaInterleaved.expected_size(320, 200).unwrap(), 32000);
        assert_eq!(SsiFormat::Amiga.expected_size(320, 200).unwrap(), 32064);
    }

    #[test]
    fn amiga_palette_word_layout() {
        let mut block = [0u8; AMIGA_PALETTE_BLOCK_SIZE];
        block[0] = 0x0F; // red 15
        block[1] = 0x80; // green 8, blue 0
        block[2] = 0x00;
        block[3] = 0x0F; // blue 15
        let palette = read_amiga_palette(&block).unwrap();
        assert_eq!(palette[0], RGB8::new(255, 136, 0));
        assert_eq!(palette[1], RGB8::new(0, 0, 255));
        assert_eq!(palette[2], RGB8::new(0, 0, 0));

        let mut again = [0u8; AMIGA_PALETTE_BLOCK_SIZE];
        write_amiga_palette(&palette, &mut again).unwrap();
        assert_eq!(again, block);
    }

    #[test]
    fn cga_rejects_geometry_larger_than_video_memory() {
        let cga = SsiFormat::Cga(CgaPalette::default());
        assert!(cga.check_geometry(320, 200).is_ok());
        assert!(cga.check_geometry(320, 204).is_ok());
        assert!(matches!(
            cga.check_geometry(640, 200),
            Err(SsiError::InvalidDimensions(_))
        ));
    }

    #[test]
    fn interleaved_pixel_count_overflow_is_an_error() {
        // 65536 * 65536 pixels does not fit a 32 bit usize.
        let result = encode_img(
            &[],
            1 << 16,
            1 << 16,
            SsiFormat::EgaInterleaved,
            None,
            Unstoppable,
        );
        #[cfg(target_pointer_width = "64")]
        assert!(matches!(
            result,
            Err(SsiError::BufferTooSmall { needed, actual: 0 }) if needed == 1 << 32
        ));
        #[cfg(not(target_pointer_width = "64"))]
        assert!(matches!(result, Err(SsiError::DimensionsTooLarge { .. })));
    }

    #[test]
    fn size_mismatch_names_the_format() {
        let res = Resolution::new(320, 200, SsiFormat::Amiga);
        let err = decode_img(&vec![0u8; 32000], &res, Unstoppable).unwrap_err();
        match err {
            SsiError::SizeMismatch {
                format,
                expected,
                actual,
            } => {
                assert_eq!(format, "Amiga");
                assert_eq!(expected, 32064);
                assert_eq!(actual, 32000);
            }
            other => panic!("expected SizeMismatch, got {other:?}"),
        }
    }
}
