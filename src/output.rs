use alloc::borrow::Cow;
use alloc::vec::Vec;

use rgb::AsPixels as _;

use crate::error::RasterError;
use crate::metadata::ImageMetadata;
use crate::pixel_data::PixelData;

/// Pixels extracted in a requested layout. Borrowed when the stored buffer
/// already matched the request, owned otherwise.
#[derive(Clone, Debug)]
pub struct PixelOutput<'a> {
    pixels: Cow<'a, [u8]>,
    /// Describes `pixels`: format, order and packing are the requested ones.
    pub metadata: ImageMetadata,
}

impl<'a> PixelOutput<'a> {
    pub(crate) fn new(pixels: Cow<'a, [u8]>, metadata: ImageMetadata) -> Self {
        Self { pixels, metadata }
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.metadata.width
    }

    pub fn height(&self) -> u32 {
        self.metadata.height
    }

    /// Whether the pixels are the stored buffer itself.
    pub fn is_borrowed(&self) -> bool {
        matches!(self.pixels, Cow::Borrowed(_))
    }

    /// Detach from the source buffer (copies if borrowed).
    pub fn into_owned(self) -> PixelOutput<'static> {
        PixelOutput {
            pixels: Cow::Owned(self.pixels.into_owned()),
            metadata: self.metadata,
        }
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.pixels.into_owned()
    }

    /// Wrap the output as a new stored buffer.
    pub fn into_pixel_data(self) -> Result<PixelData, RasterError> {
        let PixelOutput { pixels, metadata } = self;
        PixelData::new(pixels.into_owned(), metadata)
    }

    /// Reinterpret the pixels as a typed slice, e.g. `rgb::Rgba<u8>` for
    /// `RgbaR8G8B8A8` or `rgb::alt::Bgra<u8>` for `RgbaB8G8R8A8`.
    ///
    /// Requires `P` to match the format's pixel size and the rows to carry no
    /// horizontal padding. Vertical padding rows and any bytes past the last
    /// image row are excluded, so the slice holds `width * height` pixels.
    pub fn as_pixels<P>(&self) -> Result<&[P], RasterError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        let format = self.metadata.format;
        let pixel_bytes = core::mem::size_of::<P>();
        let contiguous = self.metadata.row_data_size() == self.metadata.unpacked_row_size();
        if format.bytes_per_pixel() != Some(pixel_bytes) || !contiguous {
            return Err(RasterError::LayoutMismatch {
                format,
                pixel_bytes,
            });
        }
        let meta = &self.metadata;
        let row = meta.row_data_size();
        let height = meta.height as usize;
        let first = meta.order.first_image_row(meta.row_count(), height);
        let start = first * row;
        let end = start.saturating_add(height.saturating_mul(row));
        let rows = self
            .pixels
            .get(start..end)
            .ok_or(RasterError::BufferTooSmall {
                needed: end,
                actual: self.pixels.len(),
            })?;
        Ok(rows.as_pixels())
    }

    /// Zero-copy byte view of the image rows.
    ///
    /// The view's width is the unpadded row size in bytes and its stride is
    /// the packed row size; vertical padding rows are excluded. Empty images
    /// have no view.
    #[cfg(feature = "imgref")]
    pub fn as_imgref(&self) -> Result<imgref::ImgRef<'_, u8>, RasterError> {
        let meta = &self.metadata;
        if meta.width == 0 || meta.height == 0 {
            return Err(RasterError::ZeroDimension {
                what: "output dimension",
            });
        }
        let stride = meta.row_data_size();
        let height = meta.height as usize;
        let first = meta.order.first_image_row(meta.row_count(), height);
        let start = (first * stride).min(self.pixels.len());
        Ok(imgref::ImgRef::new_stride(
            &self.pixels[start..],
            meta.unpacked_row_size(),
            height,
            stride,
        ))
    }
}
