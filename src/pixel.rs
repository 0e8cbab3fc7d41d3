/// Byte layout of a stored or requested pixel stream.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// No valid format. Produced by default construction.
    #[default]
    Invalid,
    /// 32-bit RGB with alpha, bytes in R, G, B, A order.
    RgbaR8G8B8A8,
    /// 32-bit RGB with alpha, bytes in B, G, R, A order.
    RgbaB8G8R8A8,
    /// 24-bit RGB, bytes in R, G, B order.
    RgbR8G8B8,
    /// 24-bit RGB, bytes in B, G, R order.
    RgbB8G8R8,
    /// 16-bit little-endian word `0bXbbbbbgggggrrrrr`; the top bit is unused.
    RgbR5G5B5X1,
    /// 16-bit little-endian word `0bXrrrrrgggggbbbbb`; the top bit is unused.
    RgbB5G5R5X1,
    /// Y, Cb, Cr bytes with JFIF (full-range BT.601) colorimetry.
    YCbCrJpeg,
    /// Planar Y'CbCr 4:2:0: one Cb and one Cr sample per 2x2 block of Y.
    Yuv420,
    /// 32-bit RGB expanded from a palette.
    Rgb32Paletted,
}

impl PixelFormat {
    /// Bits per pixel of one interleaved pixel, or `None` for formats that
    /// are not row-interleaved (`Invalid`, planar 4:2:0).
    pub const fn bits_per_pixel(self) -> Option<u32> {
        match self {
            Self::RgbaR8G8B8A8 | Self::RgbaB8G8R8A8 | Self::Rgb32Paletted => Some(32),
            Self::RgbR8G8B8 | Self::RgbB8G8R8 | Self::YCbCrJpeg => Some(24),
            Self::RgbR5G5B5X1 | Self::RgbB5G5R5X1 => Some(16),
            Self::Invalid | Self::Yuv420 => None,
        }
    }

    /// Bytes per interleaved pixel, or `None` where [`bits_per_pixel`](Self::bits_per_pixel) is `None`.
    pub const fn bytes_per_pixel(self) -> Option<usize> {
        match self.bits_per_pixel() {
            Some(bits) => Some(bits as usize / 8),
            None => None,
        }
    }

    /// Whether the format carries an alpha channel.
    pub const fn has_alpha(self) -> bool {
        matches!(self, Self::RgbaR8G8B8A8 | Self::RgbaB8G8R8A8)
    }
}

/// Which end of a row array holds row 0 of the image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScanLineOrder {
    /// The bottom scan line comes first. Vertical padding rows precede the image rows.
    #[default]
    BottomUp,
    /// The top scan line comes first. Vertical padding rows follow the image rows.
    TopDown,
}

impl ScanLineOrder {
    /// The opposite order.
    pub const fn flipped(self) -> Self {
        match self {
            Self::BottomUp => Self::TopDown,
            Self::TopDown => Self::BottomUp,
        }
    }

    /// Index of the first stored image row within a buffer of `row_count`
    /// rows holding `height` image rows.
    pub(crate) const fn first_image_row(self, row_count: usize, height: usize) -> usize {
        match self {
            Self::TopDown => 0,
            Self::BottomUp => row_count.saturating_sub(height),
        }
    }

    /// Buffer row holding logical (top-first) image row `y`.
    pub(crate) const fn buffer_row(self, y: usize, row_count: usize) -> usize {
        match self {
            Self::TopDown => y,
            Self::BottomUp => row_count - 1 - y,
        }
    }
}
