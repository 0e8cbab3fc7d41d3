use alloc::sync::Arc;

use crate::error::RasterError;
use crate::packing::{packed_row_byte_width, packed_row_count, unpacked_row_byte_width};
use crate::palette::Palette;
use crate::pixel::{PixelFormat, ScanLineOrder};

/// Display ratio of a pixel's width to its height.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AspectRatio {
    pub numerator: u32,
    pub denominator: u32,
}

impl AspectRatio {
    /// Square pixels.
    pub const ONE: Self = Self::new(1, 1);

    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// The ratio as a float; `0.0` when the denominator is zero.
    pub fn as_f64(self) -> f64 {
        if self.denominator == 0 {
            0.0
        } else {
            f64::from(self.numerator) / f64::from(self.denominator)
        }
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self::ONE
    }
}

/// Shape and encoding of one stored pixel buffer.
///
/// A metadata value describes exactly one buffer. Changing the format,
/// order or packing means producing a new buffer with new metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageMetadata {
    /// Logical width in pixels.
    pub width: u32,
    /// Logical height in pixels.
    pub height: u32,
    /// Row byte packing, 0 for none.
    pub horizontal_packing: u32,
    /// Row count packing, 0 for none.
    pub vertical_packing: u32,
    /// Bits per pixel of the stored stream: the index width when paletted.
    pub bits_per_data_pixel: u32,
    /// Horizontal placement of the frame; not interpreted here.
    pub origin_x: i64,
    /// Vertical placement of the frame; not interpreted here.
    pub origin_y: i64,
    /// Format of the stored pixels, or of the palette entries when paletted.
    pub format: PixelFormat,
    pub order: ScanLineOrder,
    pub aspect_ratio: AspectRatio,
    /// Colour table shared by every buffer that references it.
    pub palette: Option<Arc<Palette>>,
}

impl ImageMetadata {
    /// Unpacked, unpaletted metadata at the origin with square pixels.
    pub fn new(
        width: u32,
        height: u32,
        bits_per_data_pixel: u32,
        format: PixelFormat,
        order: ScanLineOrder,
    ) -> Self {
        Self {
            width,
            height,
            horizontal_packing: 0,
            vertical_packing: 0,
            bits_per_data_pixel,
            origin_x: 0,
            origin_y: 0,
            format,
            order,
            aspect_ratio: AspectRatio::ONE,
            palette: None,
        }
    }

    pub fn with_packing(mut self, horizontal: u32, vertical: u32) -> Self {
        self.horizontal_packing = horizontal;
        self.vertical_packing = vertical;
        self
    }

    pub fn with_origin(mut self, x: i64, y: i64) -> Self {
        self.origin_x = x;
        self.origin_y = y;
        self
    }

    pub fn with_aspect_ratio(mut self, ratio: AspectRatio) -> Self {
        self.aspect_ratio = ratio;
        self
    }

    pub fn with_palette(mut self, palette: Arc<Palette>) -> Self {
        self.palette = Some(palette);
        self
    }

    pub fn with_order(mut self, order: ScanLineOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_format(mut self, format: PixelFormat) -> Self {
        self.format = format;
        self
    }

    /// Bits per pixel once palette indices are expanded.
    pub fn expanded_bits_per_pixel(&self) -> u32 {
        match &self.palette {
            Some(palette) => palette.bits_per_pixel(),
            None => self.bits_per_data_pixel,
        }
    }

    /// Stored row count including vertical padding.
    pub fn row_count(&self) -> usize {
        packed_row_count(self.vertical_packing as usize, self.height as usize)
    }

    /// Packed byte width of one row of expanded pixels.
    pub fn row_data_size(&self) -> usize {
        packed_row_byte_width(
            self.expanded_bits_per_pixel() as usize,
            self.horizontal_packing as usize,
            self.width as usize,
        )
    }

    /// Packed byte width of one row of the stored stream.
    pub fn stream_row_size(&self) -> usize {
        packed_row_byte_width(
            self.bits_per_data_pixel as usize,
            self.horizontal_packing as usize,
            self.width as usize,
        )
    }

    /// Unpadded byte width of one row of expanded pixels.
    pub fn unpacked_row_size(&self) -> usize {
        unpacked_row_byte_width(self.expanded_bits_per_pixel() as usize, self.width as usize)
    }

    /// Minimum byte length of the stored buffer this metadata describes.
    pub fn stream_len(&self) -> Result<usize, RasterError> {
        crate::limits::buffer_size(
            self.stream_row_size(),
            self.row_count(),
            self.width,
            self.height,
        )
    }

    /// Byte length of the buffer once palette indices are expanded.
    pub fn expanded_len(&self) -> Result<usize, RasterError> {
        crate::limits::buffer_size(
            self.row_data_size(),
            self.row_count(),
            self.width,
            self.height,
        )
    }

    /// Metadata for the buffer produced by expanding this one's palette.
    pub(crate) fn palette_decoded(&self) -> Self {
        let mut decoded = self.clone();
        decoded.bits_per_data_pixel = self.expanded_bits_per_pixel();
        decoded.palette = None;
        decoded
    }

    /// Rejects index widths outside {1, 2, 4, 8} and palettes whose entry
    /// depth disagrees with `format`.
    pub(crate) fn validate(&self) -> Result<(), RasterError> {
        let Some(palette) = &self.palette else {
            return Ok(());
        };
        if !matches!(self.bits_per_data_pixel, 1 | 2 | 4 | 8) {
            return Err(RasterError::UnsupportedIndexDepth(self.bits_per_data_pixel));
        }
        if self.format.bits_per_pixel() != Some(palette.bits_per_pixel()) {
            return Err(RasterError::PaletteFormatMismatch {
                format: self.format,
                palette_bits: palette.bits_per_pixel(),
            });
        }
        Ok(())
    }
}
