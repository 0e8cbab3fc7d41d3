use alloc::string::String;
use enough::StopReason;

use crate::pixel::PixelFormat;

/// Errors from pixel-data conversion, extraction and resampling.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RasterError {
    #[error("unsupported conversion: {from:?} -> {to:?}")]
    UnsupportedConversion { from: PixelFormat, to: PixelFormat },

    #[error("pixel format {0:?} has no per-pixel bit depth")]
    UnsupportedFormat(PixelFormat),

    #[error("unsupported palette index depth: {0} bits (expected 1, 2, 4 or 8)")]
    UnsupportedIndexDepth(u32),

    #[error("{palette_bits}-bit palette does not match pixel format {format:?}")]
    PaletteFormatMismatch {
        format: PixelFormat,
        palette_bits: u32,
    },

    #[error("palette index {index} out of range for palette of {len} entries")]
    PaletteIndexOutOfRange { index: usize, len: usize },

    #[error("sub-image rectangle out of bounds: {0}")]
    SubImage(#[from] SubImageError),

    #[error("zero {what}")]
    ZeroDimension { what: &'static str },

    #[error("padded {what} {padded} is smaller than actual {what} {actual}")]
    InvalidStride {
        what: &'static str,
        actual: usize,
        padded: usize,
    },

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("buffer too small: need {needed} elements, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    #[error("{pixel_bytes}-byte pixels do not fit the rows of format {format:?}")]
    LayoutMismatch {
        format: PixelFormat,
        pixel_bytes: usize,
    },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl From<StopReason> for RasterError {
    fn from(r: StopReason) -> Self {
        RasterError::Cancelled(r)
    }
}

/// The constraint a sub-image rectangle violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum SubImageError {
    #[error("origin x ({x}) is not less than the source width ({source_width})")]
    XOutOfRange { x: i64, source_width: u32 },

    #[error("origin x ({x}) is negative")]
    XNegative { x: i64 },

    #[error("origin y ({y}) is not less than the source height ({source_height})")]
    YOutOfRange { y: i64, source_height: u32 },

    #[error("origin y ({y}) is negative")]
    YNegative { y: i64 },

    #[error("width ({width}) is negative")]
    WidthNegative { width: i64 },

    #[error("height ({height}) is negative")]
    HeightNegative { height: i64 },

    #[error("width ({width}) at x ({x}) exceeds the source width ({source_width})")]
    WidthExceedsSource {
        x: i64,
        width: i64,
        source_width: u32,
    },

    #[error("height ({height}) at y ({y}) exceeds the source height ({source_height})")]
    HeightExceedsSource {
        y: i64,
        height: i64,
        source_height: u32,
    },
}
