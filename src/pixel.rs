/// Bit depth of the palette indices held in a linear buffer.
///
/// Linear buffers always store one index per byte; the depth only bounds the
/// values and selects the palette size.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelDepth {
    /// 2-bit indices (0–3), CGA.
    Index2,
    /// 4-bit indices (0–15), EGA/Amiga and 16 colour BMP.
    Index4,
    /// 8-bit indices (0–255), 256 colour BMP.
    Index8,
}

impl PixelDepth {
    /// Bits per pixel in the packed representation.
    pub fn bits(&self) -> u16 {
        match self {
            Self::Index2 => 2,
            Self::Index4 => 4,
            Self::Index8 => 8,
        }
    }

    /// Largest valid index value.
    pub fn max_index(&self) -> u8 {
        match self {
            Self::Index2 => 0x03,
            Self::Index4 => 0x0f,
            Self::Index8 => 0xff,
        }
    }

    /// Number of palette entries addressed by this depth.
    pub fn palette_len(&self) -> usize {
        usize::from(self.max_index()) + 1
    }

    /// Whether every byte of `pixels` is a valid index at this depth.
    pub fn holds(&self, pixels: &[u8]) -> bool {
        let max = self.max_index();
        pixels.iter().all(|&p| p <= max)
    }
}
