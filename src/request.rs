use alloc::borrow::Cow;

use enough::Stop;
use tracing::{debug, trace};

use crate::convert::{Conversion, PixelConverter};
use crate::error::RasterError;
use crate::limits::Limits;
use crate::output::PixelOutput;
use crate::pixel::{PixelFormat, ScanLineOrder};
use crate::pixel_data::PixelData;

/// Builder for extracting a [`PixelData`] in a chosen layout.
///
/// ```
/// use zenraster::*;
///
/// let meta = ImageMetadata::new(1, 1, 24, PixelFormat::RgbB8G8R8, ScanLineOrder::TopDown);
/// let data = PixelData::new(vec![10, 20, 30], meta)?;
/// let out = PixelRequest::new(PixelFormat::RgbaB8G8R8A8)
///     .with_order(ScanLineOrder::TopDown)
///     .apply(&data, &BasicPixelConverter, Unstoppable)?;
/// assert_eq!(out.pixels(), &[10, 20, 30, 255]);
/// # Ok::<(), RasterError>(())
/// ```
#[derive(Clone, Debug)]
pub struct PixelRequest<'a> {
    format: PixelFormat,
    order: ScanLineOrder,
    horizontal_packing: u32,
    vertical_packing: u32,
    limits: Option<&'a Limits>,
}

impl<'a> PixelRequest<'a> {
    /// Request `format`, bottom-up, unpacked.
    pub fn new(format: PixelFormat) -> Self {
        Self {
            format,
            order: ScanLineOrder::BottomUp,
            horizontal_packing: 0,
            vertical_packing: 0,
            limits: None,
        }
    }

    pub fn with_order(mut self, order: ScanLineOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_packing(mut self, horizontal: u32, vertical: u32) -> Self {
        self.horizontal_packing = horizontal;
        self.vertical_packing = vertical;
        self
    }

    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    fn reserve(&self, bytes: usize) -> Result<(), RasterError> {
        match self.limits {
            Some(limits) => limits.check_memory(bytes),
            None => Ok(()),
        }
    }

    /// Run the extraction pipeline.
    ///
    /// Stages run in order, each only when needed: palette expansion,
    /// vertical flip, unpacking, format conversion, repacking. When none
    /// runs, the output borrows the stored buffer.
    pub fn apply<'d>(
        &self,
        source: &'d PixelData,
        converter: &dyn PixelConverter,
        stop: impl Stop,
    ) -> Result<PixelOutput<'d>, RasterError> {
        let stop: &dyn Stop = &stop;
        let meta = source.metadata();
        if let Some(limits) = self.limits {
            limits.check(meta.width, meta.height)?;
        }
        debug!(
            width = meta.width,
            height = meta.height,
            from = ?meta.format,
            to = ?self.format,
            order = ?self.order,
            "extracting pixel data"
        );

        let mut current = meta.clone();
        let mut data: Cow<'d, [u8]> = Cow::Borrowed(source.native_data());

        if current.palette.is_some() {
            trace!(bits = current.bits_per_data_pixel, "expanding palette");
            self.reserve(current.expanded_len()?)?;
            data = Cow::Owned(source.decode_palette(stop)?);
            current = current.palette_decoded();
        }

        if current.order != self.order {
            trace!("flipping rows");
            self.reserve(current.expanded_len()?)?;
            data = Cow::Owned(converter.flip_vertical(&data, &current, stop)?);
            current.order = self.order;
        }

        if current.horizontal_packing != 0 || current.vertical_packing != 0 {
            trace!(
                horizontal = current.horizontal_packing,
                vertical = current.vertical_packing,
                "unpacking"
            );
            let unpacked = current.clone().with_packing(0, 0);
            self.reserve(unpacked.expanded_len()?)?;
            data = Cow::Owned(converter.adjust_for_packing(&data, &current, 0, 0, stop)?);
            current = unpacked;
        }

        if current.format != self.format {
            trace!(from = ?current.format, to = ?self.format, "converting");
            let bits = self
                .format
                .bits_per_pixel()
                .ok_or(RasterError::UnsupportedFormat(self.format))?;
            let conversion = Conversion {
                from: current.format,
                to: self.format,
                width: current.width,
                height: current.height,
                horizontal_packing: 0,
                vertical_packing: 0,
                decoded_bits_per_pixel: current.bits_per_data_pixel,
            };
            let mut converted = current.clone().with_format(self.format);
            converted.bits_per_data_pixel = bits;
            self.reserve(converted.expanded_len()?)?;
            data = Cow::Owned(converter.convert(&data, &conversion, stop)?);
            current = converted;
        }

        if self.horizontal_packing != 0 || self.vertical_packing != 0 {
            trace!(
                horizontal = self.horizontal_packing,
                vertical = self.vertical_packing,
                "repacking"
            );
            let packed = current
                .clone()
                .with_packing(self.horizontal_packing, self.vertical_packing);
            self.reserve(packed.expanded_len()?)?;
            data = Cow::Owned(converter.adjust_for_packing(
                &data,
                &current,
                self.horizontal_packing,
                self.vertical_packing,
                stop,
            )?);
            current = packed;
        }

        Ok(PixelOutput::new(data, current))
    }
}
