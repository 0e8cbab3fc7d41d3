use alloc::vec;
use alloc::vec::Vec;

use enough::{Stop, Unstoppable};

use crate::bits::BitReader;
use crate::convert::PixelConverter;
use crate::error::RasterError;
use crate::metadata::ImageMetadata;
use crate::output::PixelOutput;
use crate::pixel::{PixelFormat, ScanLineOrder};
use crate::request::PixelRequest;

/// A stored pixel buffer and the metadata describing it.
///
/// The buffer is validated against the metadata on construction and on
/// [`replace`](Self::replace), so extraction never reads past its end.
/// Cloning copies the buffer and shares the palette.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelData {
    native: Vec<u8>,
    metadata: ImageMetadata,
}

fn check_buffer(data: &[u8], metadata: &ImageMetadata) -> Result<(), RasterError> {
    metadata.validate()?;
    let needed = metadata.stream_len()?;
    if data.len() < needed {
        return Err(RasterError::BufferTooSmall {
            needed,
            actual: data.len(),
        });
    }
    Ok(())
}

impl PixelData {
    pub fn new(data: impl Into<Vec<u8>>, metadata: ImageMetadata) -> Result<Self, RasterError> {
        let native = data.into();
        check_buffer(&native, &metadata)?;
        Ok(Self { native, metadata })
    }

    /// The stored bytes, exactly as supplied.
    pub fn native_data(&self) -> &[u8] {
        &self.native
    }

    pub fn metadata(&self) -> &ImageMetadata {
        &self.metadata
    }

    /// Swap in a new buffer and metadata, returning the previous buffer.
    ///
    /// On error nothing changes.
    pub fn replace(
        &mut self,
        data: impl Into<Vec<u8>>,
        metadata: ImageMetadata,
    ) -> Result<Vec<u8>, RasterError> {
        let data = data.into();
        check_buffer(&data, &metadata)?;
        self.metadata = metadata;
        Ok(core::mem::replace(&mut self.native, data))
    }

    pub fn into_parts(self) -> (Vec<u8>, ImageMetadata) {
        (self.native, self.metadata)
    }

    /// Extract the pixels as `format` in `order` with the given packing.
    ///
    /// Shorthand for a [`PixelRequest`] without limits or cancellation.
    pub fn get_pixel_data(
        &self,
        converter: &dyn PixelConverter,
        format: PixelFormat,
        order: ScanLineOrder,
        horizontal_packing: u32,
        vertical_packing: u32,
    ) -> Result<PixelOutput<'_>, RasterError> {
        PixelRequest::new(format)
            .with_order(order)
            .with_packing(horizontal_packing, vertical_packing)
            .apply(self, converter, Unstoppable)
    }

    /// Expand palette indices into palette bytes.
    ///
    /// Output keeps the stored packing and order; padding rows and row
    /// padding are zero. Unpaletted buffers are returned as a copy.
    pub(crate) fn decode_palette(&self, stop: &dyn Stop) -> Result<Vec<u8>, RasterError> {
        let meta = &self.metadata;
        let Some(palette) = meta.palette.as_deref() else {
            return Ok(self.native.clone());
        };

        let width = meta.width as usize;
        let height = meta.height as usize;
        let index_bits = meta.bits_per_data_pixel;
        let entry = palette.depth().bytes_per_pixel();
        let src_row = meta.stream_row_size();
        let dst_row = meta.row_data_size();
        let first = meta.order.first_image_row(meta.row_count(), height);

        let mut out = vec![0u8; meta.expanded_len()?];
        for row in first..first + height {
            if (row - first) % 16 == 0 {
                stop.check()?;
            }
            let src = &self.native[row * src_row..(row + 1) * src_row];
            let dst = &mut out[row * dst_row..row * dst_row + width * entry];

            if index_bits == 8 {
                for (&index, px) in src[..width].iter().zip(dst.chunks_exact_mut(entry)) {
                    px.copy_from_slice(palette.bytes_for(usize::from(index))?);
                }
            } else {
                let mut reader = BitReader::at(src, 0);
                for px in dst.chunks_exact_mut(entry) {
                    let index = reader.read(index_bits)?;
                    px.copy_from_slice(palette.bytes_for(usize::from(index))?);
                }
            }
        }
        Ok(out)
    }
}
