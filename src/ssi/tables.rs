//! Fixed colour tables of the EGA and CGA adapters.

use rgb::RGB8;

use super::CgaPalette;

/// Level contributed by a primary (`RGB`) bit of an EGA colour index.
const PRIMARY: u8 = 0xAA;
/// Level contributed by a secondary (`rgb`) bit of an EGA colour index.
const SECONDARY: u8 = 0x55;

const fn channel(index: u8, primary_bit: u8, secondary_bit: u8) -> u8 {
    ((index >> primary_bit) & 1) * PRIMARY + ((index >> secondary_bit) & 1) * SECONDARY
}

const fn build_ega_hardware_palette() -> [RGB8; 64] {
    let mut table = [RGB8 { r: 0, g: 0, b: 0 }; 64];
    let mut i = 0;
    while i < 64 {
        let index = i as u8;
        table[i] = RGB8 {
            r: channel(index, 2, 5),
            g: channel(index, 1, 4),
            b: channel(index, 0, 3),
        };
        i += 1;
    }
    table
}

/// The 64 colours an EGA attribute register can select, indexed by the
/// 6-bit `rgbRGB` value.
pub static EGA_HARDWARE_PALETTE: [RGB8; 64] = build_ega_hardware_palette();

/// Hardware colour selected by each of the 16 default EGA attribute
/// registers (index 6 is brown, not dark yellow).
pub static EGA_DEFAULT_REGISTERS: [u8; 16] = [0, 1, 2, 3, 4, 5, 20, 7, 56, 57, 58, 59, 60, 61, 62, 63];

/// EGA colour index used for each CGA pixel value, per CGA palette.
///
/// The background (value 0) is taken as black even though the adapter can
/// program it to any colour.
pub static CGA_TO_EGA: [[u8; 4]; 6] = [
    [0, 2, 4, 6],    // mode 4 palette 0 low intensity: black, green, red, brown
    [0, 10, 12, 14], // mode 4 palette 0 high intensity: black, light green, light red, yellow
    [0, 3, 5, 7],    // mode 4 palette 1 low intensity: black, cyan, magenta, light grey
    [0, 11, 13, 15], // mode 4 palette 1 high intensity: black, light cyan, light magenta, white
    [0, 3, 4, 7],    // mode 5 low intensity: black, cyan, red, light grey
    [0, 11, 12, 15], // mode 5 high intensity: black, light cyan, light red, white
];

/// The default 16 colour EGA/VGA text and graphics palette.
pub fn ega_default_palette() -> [RGB8; 16] {
    EGA_DEFAULT_REGISTERS.map(|hw| EGA_HARDWARE_PALETTE[usize::from(hw)])
}

/// A 16 entry palette whose first four entries are the colours of `selector`.
/// Entries 4–15 are black.
pub fn cga_palette(selector: CgaPalette) -> [RGB8; 16] {
    let ega = ega_default_palette();
    let mut palette = [RGB8::default(); 16];
    for (entry, &ega_index) in palette.iter_mut().zip(&CGA_TO_EGA[usize::from(selector.index())]) {
        *entry = ega[usize::from(ega_index)];
    }
    palette
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hardware_palette_levels() {
        assert_eq!(EGA_HARDWARE_PALETTE[0], RGB8::new(0, 0, 0));
        assert_eq!(EGA_HARDWARE_PALETTE[1], RGB8::new(0, 0, 0xAA));
        assert_eq!(EGA_HARDWARE_PALETTE[4], RGB8::new(0xAA, 0, 0));
        assert_eq!(EGA_HARDWARE_PALETTE[8], RGB8::new(0, 0, 0x55));
        assert_eq!(EGA_HARDWARE_PALETTE[63], RGB8::new(0xFF, 0xFF, 0xFF));
    }

    #[test]
    fn default_palette_matches_vga_colours() {
        let pal = ega_default_palette();
        assert_eq!(pal[1], RGB8::new(0x00, 0x00, 0xAA)); // blue
        assert_eq!(pal[6], RGB8::new(0xAA, 0x55, 0x00)); // brown
        assert_eq!(pal[8], RGB8::new(0x55, 0x55, 0x55)); // dark grey
        assert_eq!(pal[9], RGB8::new(0x55, 0x55, 0xFF)); // light blue
        assert_eq!(pal[14], RGB8::new(0xFF, 0xFF, 0x55)); // yellow
        assert_eq!(pal[15], RGB8::new(0xFF, 0xFF, 0xFF));
    }

    #[test]
    fn cga_palette_one_is_green_red_yellow() {
        let pal = cga_palette(CgaPalette::default());
        assert_eq!(pal[0], RGB8::new(0, 0, 0));
        assert_eq!(pal[1], RGB8::new(0x55, 0xFF, 0x55));
        assert_eq!(pal[2], RGB8::new(0xFF, 0x55, 0x55));
        assert_eq!(pal[3], RGB8::new(0xFF, 0xFF, 0x55));
        assert!(pal[4..].iter().all(|&c| c == RGB8::default()));
    }
}
