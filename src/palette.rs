//! Palette component depth rescaling.
//!
//! Hardware palettes store 4 bits (Amiga), 6 bits (VGA DAC) or 8 bits (BMP)
//! per channel. Rescaling is linear with truncating integer division:
//! `value * out_max / in_max`, so 8 at 4 bits becomes 136 at 8 bits, not 137.

use rgb::RGB8;

use crate::error::SsiError;

/// Largest palette any supported format carries.
pub const MAX_PALETTE_ENTRIES: usize = 256;

/// Bits per colour component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorDepth {
    Bits4,
    Bits6,
    Bits8,
}

impl ColorDepth {
    /// Largest component value at this depth.
    pub fn max_value(self) -> u16 {
        match self {
            Self::Bits4 => (1 << 4) - 1,
            Self::Bits6 => (1 << 6) - 1,
            Self::Bits8 => (1 << 8) - 1,
        }
    }
}

fn scale(value: u8, from: ColorDepth, to: ColorDepth) -> u8 {
    let value = u16::from(value).min(from.max_value());
    (value * to.max_value() / from.max_value()) as u8
}

/// Rescale every channel of `input` from `from` to `to` bits, writing the
/// result to the front of `output`.
///
/// Components above the input depth's maximum are clamped to it first.
pub fn rescale(
    input: &[RGB8],
    output: &mut [RGB8],
    from: ColorDepth,
    to: ColorDepth,
) -> Result<(), SsiError> {
    if input.len() > MAX_PALETTE_ENTRIES {
        return Err(SsiError::PaletteTooLarge {
            max: MAX_PALETTE_ENTRIES,
            actual: input.len(),
        });
    }
    if output.len() < input.len() {
        return Err(SsiError::PaletteTooSmall {
            needed: input.len(),
            actual: output.len(),
        });
    }
    for (src, dst) in input.iter().zip(output.iter_mut()) {
        *dst = RGB8::new(
            scale(src.r, from, to),
            scale(src.g, from, to),
            scale(src.b, from, to),
        );
    }
    Ok(())
}

macro_rules! rescaler {
    ($(#[$doc:meta])* $name:ident, $from:ident, $to:ident) => {
        $(#[$doc])*
        pub fn $name(input: &[RGB8], output: &mut [RGB8]) -> Result<(), SsiError> {
            rescale(input, output, ColorDepth::$from, ColorDepth::$to)
        }
    };
}

rescaler!(
    /// Upscale 4 bit per component palette data to 6 bits.
    pal4_to_pal6, Bits4, Bits6
);
rescaler!(
    /// Upscale 4 bit per component palette data to 8 bits.
    pal4_to_pal8, Bits4, Bits8
);
rescaler!(
    /// Upscale 6 bit per component palette data to 8 bits.
    pal6_to_pal8, Bits6, Bits8
);
rescaler!(
    /// Downscale 6 bit per component palette data to 4 bits.
    pal6_to_pal4, Bits6, Bits4
);
rescaler!(
    /// Downscale 8 bit per component palette data to 4 bits.
    pal8_to_pal4, Bits8, Bits4
);
rescaler!(
    /// Downscale 8 bit per component palette data to 6 bits.
    pal8_to_pal6, Bits8, Bits6
);
