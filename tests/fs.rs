//! File helpers: atomic writes, metadata size checks, error categories.

#![cfg(feature = "std")]

use std::path::PathBuf;

use enough::Unstoppable;
use zenssi::fs::{read_bmp_file, read_img_file, write_bmp4_file, write_bmp8_file, write_img_file};
use zenssi::ssi::{Resolution, SsiFormat, ega_default_palette};
use zenssi::{RGB8, SsiError};

/// Fresh per-test directory under the system temp dir.
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("zenssi-{}-{name}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn no_temp_files_left(dir: &std::path::Path) -> bool {
    std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .all(|e| !e.file_name().to_string_lossy().ends_with(".tmp"))
}

#[test]
fn bmp4_file_roundtrip() {
    let dir = scratch_dir("bmp4");
    let path = dir.join("PIC.BMP");
    let pixels: Vec<u8> = (0..16 * 8).map(|i| (i % 16) as u8).collect();

    write_bmp4_file(&path, &pixels, 16, 8, &ega_default_palette(), Unstoppable).unwrap();
    assert!(no_temp_files_left(&dir));

    let decoded = read_bmp_file(&path, Unstoppable).unwrap();
    assert_eq!((decoded.width, decoded.height), (16, 8));
    assert_eq!(decoded.pixels(), &pixels[..]);
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn bmp8_file_overwrites_existing() {
    let dir = scratch_dir("bmp8");
    let path = dir.join("PIC.BMP");
    std::fs::write(&path, b"stale").unwrap();

    let palette = vec![RGB8::new(1, 2, 3); 256];
    write_bmp8_file(&path, &[200, 100, 50, 25], 2, 2, &palette, Unstoppable).unwrap();

    let decoded = read_bmp_file(&path, Unstoppable).unwrap();
    assert_eq!(decoded.pixels(), &[200, 100, 50, 25]);
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn img_file_roundtrip_per_format() {
    let dir = scratch_dir("img");
    for spec in ["32x8", "32x8b", "32x8a", "32x8c0"] {
        let res: Resolution = spec.parse().unwrap();
        let max = res.format.depth().max_index();
        let pixels: Vec<u8> = (0..32 * 8).map(|i| (i as u8) & max).collect();
        let path = dir.join(format!("{spec}.IMG"));

        write_img_file(&path, &pixels, 32, 8, res.format, None, Unstoppable).unwrap();
        let size = std::fs::metadata(&path).unwrap().len() as usize;
        assert_eq!(size, res.format.expected_size(32, 8).unwrap(), "{spec}");

        let image = read_img_file(&path, &res, Unstoppable).unwrap();
        assert_eq!(image.pixels(), &pixels[..], "{spec}");
    }
    assert!(no_temp_files_left(&dir));
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn img_size_is_checked_before_reading() {
    let dir = scratch_dir("size");
    let path = dir.join("SHORT.IMG");
    std::fs::write(&path, vec![0u8; 31999]).unwrap();

    let res: Resolution = "320x200".parse().unwrap();
    match read_img_file(&path, &res, Unstoppable).unwrap_err() {
        SsiError::SizeMismatch {
            format,
            expected,
            actual,
        } => {
            assert_eq!(format, "EGA");
            assert_eq!(expected, 32000);
            assert_eq!(actual, 31999);
        }
        other => panic!("expected SizeMismatch, got {other:?}"),
    }
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn missing_file_is_file_open() {
    let dir = scratch_dir("missing");
    let err = read_bmp_file(dir.join("NOPE.BMP"), Unstoppable).unwrap_err();
    assert!(matches!(err, SsiError::FileOpen { .. }));
    assert_eq!(err.exit_code(), -2);
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn write_into_missing_directory_fails_cleanly() {
    let dir = scratch_dir("nodir");
    let path = dir.join("missing").join("OUT.IMG");
    let err = write_img_file(&path, &[0u8; 64], 8, 8, SsiFormat::Ega, None, Unstoppable)
        .unwrap_err();
    assert!(matches!(err, SsiError::FileOpen { .. }));
    assert!(!path.exists());
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn failed_encode_leaves_destination_untouched() {
    let dir = scratch_dir("untouched");
    let path = dir.join("KEEP.IMG");
    std::fs::write(&path, b"original").unwrap();

    // 3x3 cannot be stored as EGA planes.
    let err = write_img_file(&path, &[0u8; 9], 3, 3, SsiFormat::Ega, None, Unstoppable)
        .unwrap_err();
    assert!(matches!(err, SsiError::InvalidDimensions(_)));
    assert_eq!(std::fs::read(&path).unwrap(), b"original");
    assert!(no_temp_files_left(&dir));
    std::fs::remove_dir_all(&dir).unwrap();
}
