#!/usr/bin/env -S cargo +nightly -Zscript
//! Generate seed corpus files for fuzzing.
//! Run: cargo +nightly -Zscript fuzz/generate_seeds.rs

fn bmp_header(width: i32, height: i32, bpp: u16, colors: u32, stride: usize) -> Vec<u8> {
    let image_offset = 54 + colors as usize * 4;
    let rows = height.unsigned_abs() as usize;
    let size = image_offset + stride * rows;
    let mut bmp = vec![0u8; size];
    bmp[0] = b'B'; bmp[1] = b'M';
    bmp[2..6].copy_from_slice(&(size as u32).to_le_bytes()); // file size
    bmp[10..14].copy_from_slice(&(image_offset as u32).to_le_bytes()); // data offset
    bmp[14..18].copy_from_slice(&40u32.to_le_bytes()); // DIB header size
    bmp[18..22].copy_from_slice(&width.to_le_bytes());
    bmp[22..26].copy_from_slice(&height.to_le_bytes());
    bmp[26..28].copy_from_slice(&1u16.to_le_bytes()); // planes
    bmp[28..30].copy_from_slice(&bpp.to_le_bytes());
    bmp[34..38].copy_from_slice(&((stride * rows) as u32).to_le_bytes());
    bmp[46..50].copy_from_slice(&colors.to_le_bytes());
    bmp
}

fn main() {
    use std::fs;
    let dir = "fuzz/corpus/fuzz_decode";
    fs::create_dir_all(dir).unwrap();

    // 4 bpp 8x2 bottom-up
    let mut bmp4 = bmp_header(8, 2, 4, 16, 4);
    let n = bmp4.len();
    bmp4[n - 8..].copy_from_slice(&[0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef]);
    fs::write(format!("{dir}/bmp4_8x2.bmp"), bmp4).unwrap();

    // 4 bpp 3x2 top-down (odd width)
    fs::write(format!("{dir}/bmp4_3x2_topdown.bmp"), bmp_header(3, -2, 4, 16, 2)).unwrap();

    // 8 bpp 1x1
    let mut bmp8 = bmp_header(1, 1, 8, 256, 4);
    let n = bmp8.len();
    bmp8[n - 4] = 0x7f;
    fs::write(format!("{dir}/bmp8_1x1.bmp"), bmp8).unwrap();

    // IMG seeds: 5-byte geometry prefix (width, height, format) then the body
    let mut ega = vec![8, 0, 8, 0, 0];
    ega.extend_from_slice(&[0x55; 32]);
    fs::write(format!("{dir}/img_ega_8x8.bin"), ega).unwrap();

    let mut amiga = vec![8, 0, 2, 0, 2];
    amiga.extend_from_slice(&[0xa5; 8 + 64]);
    fs::write(format!("{dir}/img_amiga_8x2.bin"), amiga).unwrap();

    let mut cga = vec![64, 1, 200, 0, 3];
    cga.extend_from_slice(&vec![0x1b; 16384]);
    fs::write(format!("{dir}/img_cga_320x200.bin"), cga).unwrap();

    // Truncated/malformed seeds for edge coverage
    fs::write(format!("{dir}/empty.bin"), b"").unwrap();
    fs::write(format!("{dir}/bm_short.bin"), b"BM\x00\x00").unwrap();
    fs::write(format!("{dir}/resolution.bin"), b"\x00\x00\x00\x00\x00320x200c1").unwrap();

    println!("Generated seed corpus in {dir}/");
}
