use alloc::string::ToString;
use core::fmt;
use core::str::FromStr;

use super::{CgaPalette, SsiFormat};
use crate::error::SsiError;

/// Declared geometry and layout of an SSI-IMG file.
///
/// Parsed from `WIDTHxHEIGHT[suffix]`, where the separator may be `x` or `X`
/// and the optional suffix (case-insensitive) selects the format:
///
/// | Suffix      | Format                                       |
/// |-------------|----------------------------------------------|
/// | none, `e`   | [`SsiFormat::Ega`]                           |
/// | `b`         | [`SsiFormat::EgaInterleaved`]                |
/// | `a`         | [`SsiFormat::Amiga`]                         |
/// | `c`, `cN`   | [`SsiFormat::Cga`] with palette `N` (default 1) |
///
/// ```
/// use zenssi::ssi::{Resolution, SsiFormat};
///
/// let res: Resolution = "320x200a".parse()?;
/// assert_eq!((res.width, res.height, res.format), (320, 200, SsiFormat::Amiga));
/// # Ok::<(), zenssi::SsiError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
    pub format: SsiFormat,
}

impl Resolution {
    pub fn new(width: u32, height: u32, format: SsiFormat) -> Self {
        Self {
            width,
            height,
            format,
        }
    }
}

fn invalid(spec: &str, reason: &str) -> SsiError {
    SsiError::InvalidResolutionSpec(alloc::format!("{spec:?}: {reason}"))
}

fn parse_dimension(spec: &str, digits: &str) -> Result<u32, SsiError> {
    let value: u16 = digits
        .parse()
        .map_err(|_| invalid(spec, "width and height must be numbers from 1 to 65535"))?;
    if value == 0 {
        return Err(invalid(spec, "width and height must be non-zero"));
    }
    Ok(u32::from(value))
}

fn parse_format(spec: &str, suffix: &str) -> Result<SsiFormat, SsiError> {
    let mut chars = suffix.chars();
    let Some(tag) = chars.next() else {
        return Ok(SsiFormat::Ega);
    };
    let format = match tag.to_ascii_lowercase() {
        'e' => SsiFormat::Ega,
        'b' => SsiFormat::EgaInterleaved,
        'a' => SsiFormat::Amiga,
        'c' => {
            let palette = match chars.next() {
                None => CgaPalette::default(),
                Some(digit) => {
                    let index = digit.to_digit(10).ok_or_else(|| {
                        SsiError::InvalidPaletteSelector(alloc::format!(
                            "{digit:?} in {spec:?} is not a digit"
                        ))
                    })?;
                    // to_digit(10) is at most 9
                    CgaPalette::new(index as u8)?
                }
            };
            SsiFormat::Cga(palette)
        }
        other => return Err(invalid(spec, &alloc::format!("unknown format suffix {other:?}"))),
    };
    if chars.next().is_some() {
        return Err(invalid(spec, "unexpected characters after format suffix"));
    }
    Ok(format)
}

impl FromStr for Resolution {
    type Err = SsiError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let (width, rest) = spec
            .split_once(['x', 'X'])
            .ok_or_else(|| invalid(spec, "expected WIDTHxHEIGHT"))?;
        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        let (height, suffix) = rest.split_at(digits_end);

        let width = parse_dimension(spec, width)?;
        let height = parse_dimension(spec, height)?;
        let format = parse_format(spec, suffix)?;
        Ok(Self::new(width, height, format))
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = match self.format {
            SsiFormat::Ega => "e".to_string(),
            SsiFormat::EgaInterleaved => "b".to_string(),
            SsiFormat::Amiga => "a".to_string(),
            SsiFormat::Cga(palette) => alloc::format!("c{}", palette.index()),
        };
        write!(f, "{}x{}{suffix}", self.width, self.height)
    }
}
