use alloc::string::String;
use enough::StopReason;

/// Errors from BMP and SSI-IMG decoding and encoding.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SsiError {
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    #[error("not a BMP file (bad signature)")]
    NotABmpFile,

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("unsupported pixel format: {0}")]
    UnsupportedPixelFormat(String),

    #[error("unexpected end of input: need {needed} bytes, got {actual}")]
    ShortRead { needed: usize, actual: usize },

    #[error("buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    #[error("palette too small: need {needed} entries, got {actual}")]
    PaletteTooSmall { needed: usize, actual: usize },

    #[error("palette too large: at most {max} entries, got {actual}")]
    PaletteTooLarge { max: usize, actual: usize },

    #[error("{format} image size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch {
        format: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid resolution specification: {0}")]
    InvalidResolutionSpec(String),

    #[error("invalid palette selector: {0}")]
    InvalidPaletteSelector(String),

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("unable to allocate {bytes} bytes")]
    AllocationFailed { bytes: usize },

    #[error("operation cancelled")]
    Cancelled(StopReason),

    #[cfg(feature = "std")]
    #[error("unable to open {}: {source}", path.display())]
    FileOpen {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "std")]
    #[error("unable to read {}: {source}", path.display())]
    FileRead {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "std")]
    #[error("unable to write {}: {source}", path.display())]
    ShortWrite {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SsiError {
    /// Process exit code for this error category.
    ///
    /// Every category maps to a distinct negative value; zero is reserved
    /// for success.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidDimensions(_) => -1,
            #[cfg(feature = "std")]
            Self::FileOpen { .. } => -2,
            #[cfg(feature = "std")]
            Self::FileRead { .. } => -3,
            Self::ShortRead { .. } => -3,
            #[cfg(feature = "std")]
            Self::ShortWrite { .. } => -4,
            Self::NotABmpFile => -5,
            Self::InvalidHeader(_) => -6,
            Self::UnsupportedPixelFormat(_) => -7,
            Self::AllocationFailed { .. } => -8,
            Self::SizeMismatch { .. } => -9,
            Self::InvalidResolutionSpec(_) => -10,
            Self::InvalidPaletteSelector(_) => -11,
            Self::BufferTooSmall { .. }
            | Self::PaletteTooSmall { .. }
            | Self::PaletteTooLarge { .. } => -12,
            Self::DimensionsTooLarge { .. } | Self::LimitExceeded(_) => -13,
            Self::Cancelled(_) => -14,
        }
    }
}

impl From<StopReason> for SsiError {
    fn from(r: StopReason) -> Self {
        SsiError::Cancelled(r)
    }
}
