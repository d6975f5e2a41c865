//! File helpers for the conversion tools.
//!
//! Reads go through the in-memory codecs. Writes go to a temporary file next
//! to the destination that is renamed over it once fully written, so a failed
//! conversion never leaves a truncated output behind.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use enough::Stop;
use rgb::RGB8;

use crate::decode::{DecodeOutput, DecodeRequest};
use crate::error::SsiError;
use crate::pixel::PixelDepth;
use crate::ssi::{Resolution, SsiFormat, SsiImage};

fn open(path: &Path) -> Result<File, SsiError> {
    File::open(path).map_err(|source| SsiError::FileOpen {
        path: path.to_path_buf(),
        source,
    })
}

fn read_error(path: &Path) -> impl FnOnce(io::Error) -> SsiError + '_ {
    move |source| SsiError::FileRead {
        path: path.to_path_buf(),
        source,
    }
}

/// Decode a 4 or 8 bit paletted BMP file.
pub fn read_bmp_file(path: impl AsRef<Path>, stop: impl Stop) -> Result<DecodeOutput, SsiError> {
    let path = path.as_ref();
    log::debug!("reading BMP {}", path.display());
    let mut data = Vec::new();
    open(path)?
        .read_to_end(&mut data)
        .map_err(read_error(path))?;
    DecodeRequest::new(&data).decode(stop)
}

/// Encode `pixels` as a 16 colour BMP file.
pub fn write_bmp4_file(
    path: impl AsRef<Path>,
    pixels: &[u8],
    width: u32,
    height: u32,
    palette: &[RGB8],
    stop: impl Stop,
) -> Result<(), SsiError> {
    let bmp = crate::bmp::encode(pixels, width, height, palette, PixelDepth::Index4, &stop)?;
    write_atomic(path.as_ref(), &bmp)
}

/// Encode `pixels` as a 256 colour BMP file.
pub fn write_bmp8_file(
    path: impl AsRef<Path>,
    pixels: &[u8],
    width: u32,
    height: u32,
    palette: &[RGB8],
    stop: impl Stop,
) -> Result<(), SsiError> {
    let bmp = crate::bmp::encode(pixels, width, height, palette, PixelDepth::Index8, &stop)?;
    write_atomic(path.as_ref(), &bmp)
}

/// Decode an SSI-IMG file.
///
/// The file length is checked against `resolution` before any data is read.
pub fn read_img_file(
    path: impl AsRef<Path>,
    resolution: &Resolution,
    stop: impl Stop,
) -> Result<SsiImage, SsiError> {
    let path = path.as_ref();
    let Resolution {
        width,
        height,
        format,
    } = *resolution;
    format.check_geometry(width, height)?;
    let expected = format.expected_size(width, height)?;

    let mut file = open(path)?;
    let actual = file.metadata().map_err(read_error(path))?.len();
    log::debug!("reading {format} IMG {} ({actual} bytes)", path.display());
    if actual != expected as u64 {
        return Err(SsiError::SizeMismatch {
            format: format.name(),
            expected,
            actual: usize::try_from(actual).unwrap_or(usize::MAX),
        });
    }

    let mut data = crate::limits::alloc_zeroed(expected)?;
    file.read_exact(&mut data).map_err(read_error(path))?;
    crate::ssi::decode_img(&data, resolution, stop)
}

/// Encode `pixels` into an SSI-IMG file of the given format.
pub fn write_img_file(
    path: impl AsRef<Path>,
    pixels: &[u8],
    width: u32,
    height: u32,
    format: SsiFormat,
    palette: Option<&[RGB8]>,
    stop: impl Stop,
) -> Result<(), SsiError> {
    let img = crate::ssi::encode_img(pixels, width, height, format, palette, stop)?;
    write_atomic(path.as_ref(), &img)
}

/// `.<name>.tmp` in the destination's directory.
fn temp_path(path: &Path) -> Result<PathBuf, SsiError> {
    let name = path.file_name().ok_or_else(|| SsiError::FileOpen {
        path: path.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
    })?;
    let mut temp = OsString::from(".");
    temp.push(name);
    temp.push(".tmp");
    Ok(path.with_file_name(temp))
}

fn write_synced(mut file: File, bytes: &[u8]) -> io::Result<()> {
    file.write_all(bytes)?;
    file.sync_all()
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), SsiError> {
    let temp = temp_path(path)?;
    log::debug!("writing {} bytes to {}", bytes.len(), path.display());

    let file = File::create(&temp).map_err(|source| SsiError::FileOpen {
        path: temp.clone(),
        source,
    })?;
    let written = write_synced(file, bytes).and_then(|()| fs::rename(&temp, path));

    if let Err(source) = written {
        if let Err(cleanup) = fs::remove_file(&temp) {
            log::warn!("unable to remove {}: {cleanup}", temp.display());
        }
        return Err(SsiError::ShortWrite {
            path: path.to_path_buf(),
            source,
        });
    }
    log::trace!("renamed {} to {}", temp.display(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_file_is_a_hidden_sibling() {
        let temp = temp_path(Path::new("out/PIC.BMP")).unwrap();
        assert_eq!(temp, Path::new("out/.PIC.BMP.tmp"));
    }

    #[test]
    fn path_without_file_name_is_rejected() {
        assert!(matches!(
            temp_path(Path::new("/")),
            Err(SsiError::FileOpen { .. })
        ));
    }
}
