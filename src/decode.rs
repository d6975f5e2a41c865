use alloc::vec::Vec;

use enough::Stop;

use crate::error::SsiError;
use crate::limits::Limits;
use crate::pixel::PixelDepth;

/// Decoded linear image: one palette index per byte, row-major, top row first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodeOutput {
    pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub depth: PixelDepth,
}

impl DecodeOutput {
    pub(crate) fn new(pixels: Vec<u8>, width: u32, height: u32, depth: PixelDepth) -> Self {
        Self {
            pixels,
            width,
            height,
            depth,
        }
    }

    /// Access the pixel indices.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Take ownership of the pixel indices.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Zero-copy view as an [`imgref::ImgRef`] of palette indices.
    ///
    /// No allocation or copy: the returned `ImgRef` borrows directly from
    /// this `DecodeOutput`'s pixel buffer.
    #[cfg(feature = "imgref")]
    pub fn as_imgref(&self) -> imgref::ImgRef<'_, u8> {
        imgref::ImgRef::new(&self.pixels, self.width as usize, self.height as usize)
    }
}

/// Builder for BMP decode with optional limits.
///
/// ```no_run
/// use zenssi::{DecodeRequest, Limits, Unstoppable};
///
/// let data: &[u8] = &[]; // your BMP bytes
/// let limits = Limits { max_pixels: Some(640 * 480), ..Default::default() };
/// let decoded = DecodeRequest::new(data)
///     .with_limits(&limits)
///     .decode(Unstoppable)?;
/// println!("{}x{}", decoded.width, decoded.height);
/// # Ok::<(), zenssi::SsiError>(())
/// ```
#[derive(Clone, Copy, Debug)]
pub struct DecodeRequest<'a> {
    data: &'a [u8],
    limits: Option<&'a Limits>,
}

impl<'a> DecodeRequest<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, limits: None }
    }

    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Decode a 4 or 8 bit paletted BMP into a linear index buffer.
    pub fn decode(self, stop: impl Stop) -> Result<DecodeOutput, SsiError> {
        crate::bmp::decode(self.data, self.limits, &stop)
    }
}
