#![no_main]
use libfuzzer_sys::fuzz_target;
use zenssi::ssi::{CgaPalette, Resolution, SsiFormat};

fuzz_target!(|data: &[u8]| {
    // BMP decode and probe must never panic
    let _ = zenssi::decode_bmp(data, enough::Unstoppable);
    let _ = zenssi::bmp::probe_bmp(data);

    // IMG decode with geometry taken from the first bytes must never panic
    let Some((head, body)) = data.split_first_chunk::<5>() else {
        return;
    };
    let width = u32::from(u16::from_le_bytes([head[0], head[1]]) % 1024);
    let height = u32::from(u16::from_le_bytes([head[2], head[3]]) % 1024);
    let format = match head[4] % 4 {
        0 => SsiFormat::Ega,
        1 => SsiFormat::EgaInterleaved,
        2 => SsiFormat::Amiga,
        _ => SsiFormat::Cga(CgaPalette::new(head[4] % 6).unwrap_or_default()),
    };
    let _ = zenssi::decode_img(body, &Resolution::new(width, height, format), enough::Unstoppable);

    // Resolution parsing must never panic
    if let Ok(spec) = core::str::from_utf8(body) {
        let _ = spec.parse::<Resolution>();
    }
});
