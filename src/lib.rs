//! # zenssi
//!
//! Converters between SSI-IMG raw video-memory dumps (CGA, EGA and
//! Amiga-style layouts) and paletted BMP.
//!
//! IMG files carry no header: the caller declares the geometry and layout,
//! usually as a resolution token such as `320x200c1`. The crate unpacks the
//! adapter's packed layout into a linear buffer of palette indices (one per
//! byte, top row first) and wraps that buffer in a 4 or 8 bit BMP, or runs
//! the same path backwards.
//!
//! ## Supported layouts
//!
//! - **EGA**: 16 colours in four global bit-planes ([`layout::planar`])
//! - **EGA-interleaved**: four bit-planes per scanline
//! - **CGA**: 4 colours, 2 bpp with even/odd scanline banks ([`layout::cga`])
//! - **Amiga**: EGA planes followed by a 64-byte 12-bit palette block
//! - **BMP**: uncompressed 4 bpp / 16 colour and 8 bpp / 256 colour
//!
//! ## Non-Goals
//!
//! - Compressed or true-colour BMPs
//! - Colour quantisation (indices are carried through unchanged)
//!
//! ## Usage
//!
//! ```no_run
//! use zenssi::{Unstoppable, ssi::Resolution};
//!
//! let img: &[u8] = &[]; // raw IMG bytes
//! let resolution: Resolution = "320x200c1".parse()?;
//!
//! let image = zenssi::decode_img(img, &resolution, Unstoppable)?;
//! let bmp = image.to_bmp(Unstoppable)?;
//!
//! // and back
//! let decoded = zenssi::decode_bmp(&bmp, Unstoppable)?;
//! let packed = zenssi::encode_img(
//!     decoded.pixels(),
//!     decoded.width,
//!     decoded.height,
//!     resolution.format,
//!     None,
//!     Unstoppable,
//! )?;
//! # Ok::<(), zenssi::SsiError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod decode;
mod error;
mod limits;
mod pixel;

pub mod bmp;
pub mod layout;
pub mod palette;
pub mod ssi;

#[cfg(feature = "std")]
pub mod fs;

// Re-exports
pub use decode::{DecodeOutput, DecodeRequest};
pub use enough::{Stop, Unstoppable};
pub use error::SsiError;
pub use limits::Limits;
pub use pixel::PixelDepth;
pub use rgb::RGB8;
pub use ssi::{decode_img, encode_img};

use alloc::vec::Vec;

/// Decode a 4 or 8 bit paletted BMP into a linear index buffer.
///
/// The on-disk palette is not returned; see [`DecodeRequest`] for limits.
pub fn decode_bmp(data: &[u8], stop: impl Stop) -> Result<DecodeOutput, SsiError> {
    DecodeRequest::new(data).decode(stop)
}

/// Encode a linear buffer of indices 0–15 as a 16 colour BMP.
///
/// The first 16 entries of `palette` are written.
pub fn encode_bmp4(
    pixels: &[u8],
    width: u32,
    height: u32,
    palette: &[RGB8],
    stop: impl Stop,
) -> Result<Vec<u8>, SsiError> {
    bmp::encode(pixels, width, height, palette, PixelDepth::Index4, &stop)
}

/// Encode a linear buffer of indices as a 256 colour BMP.
///
/// The first 256 entries of `palette` are written.
pub fn encode_bmp8(
    pixels: &[u8],
    width: u32,
    height: u32,
    palette: &[RGB8],
    stop: impl Stop,
) -> Result<Vec<u8>, SsiError> {
    bmp::encode(pixels, width, height, palette, PixelDepth::Index8, &stop)
}
