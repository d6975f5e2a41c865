#![no_main]
use libfuzzer_sys::fuzz_target;
use zenssi::*;

fuzz_target!(|data: &[u8]| {
    // If we can decode it, re-encoding and decoding again must produce identical pixels
    let Ok(decoded) = decode_bmp(data, enough::Unstoppable) else {
        return;
    };

    assert!(decoded.depth.holds(decoded.pixels()));

    let palette = vec![RGB8::default(); 256];
    let reencoded = match decoded.depth {
        PixelDepth::Index4 => encode_bmp4(
            decoded.pixels(), decoded.width, decoded.height,
            &palette, enough::Unstoppable,
        ),
        _ => encode_bmp8(
            decoded.pixels(), decoded.width, decoded.height,
            &palette, enough::Unstoppable,
        ),
    };

    let Ok(reencoded) = reencoded else { return };
    let Ok(decoded2) = decode_bmp(&reencoded, enough::Unstoppable) else {
        panic!("re-encoded data failed to decode");
    };

    assert_eq!(decoded.pixels(), decoded2.pixels(), "roundtrip pixel mismatch");
    assert_eq!(decoded.width, decoded2.width);
    assert_eq!(decoded.height, decoded2.height);
    assert_eq!(decoded.depth, decoded2.depth);
});
