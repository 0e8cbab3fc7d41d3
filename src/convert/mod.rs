//! Pluggable pixel-format conversion.
//!
//! [`PixelConverter`] is the seam the extraction pipeline calls through:
//! format conversion is required, vertical flips and repacking have default
//! implementations in terms of the row-layout helpers. [`BasicPixelConverter`]
//! supports the RGB24, RGB555 and JFIF YCbCr sources, all to 32-bit RGBA.

mod rgb_rows;
mod ycbcr;

use alloc::vec;
use alloc::vec::Vec;

use enough::Stop;

use crate::error::RasterError;
use crate::metadata::ImageMetadata;
use crate::packing::{packed_row_byte_width, packed_row_count, unpacked_row_byte_width};
use crate::pixel::PixelFormat;

/// Geometry and formats of one format-conversion call.
///
/// The packing values describe both the input rows and the output rows.
/// `decoded_bits_per_pixel` is the bit depth of the input buffer, which
/// sizes its rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Conversion {
    pub from: PixelFormat,
    pub to: PixelFormat,
    pub width: u32,
    pub height: u32,
    pub horizontal_packing: u32,
    pub vertical_packing: u32,
    pub decoded_bits_per_pixel: u32,
}

impl Conversion {
    /// An unpacked conversion whose input depth is `from`'s natural depth.
    ///
    /// Fails with [`RasterError::UnsupportedFormat`] when `from` has no
    /// per-pixel depth.
    pub fn new(from: PixelFormat, to: PixelFormat, width: u32, height: u32) -> Result<Self, RasterError> {
        let bits = from
            .bits_per_pixel()
            .ok_or(RasterError::UnsupportedFormat(from))?;
        Ok(Self {
            from,
            to,
            width,
            height,
            horizontal_packing: 0,
            vertical_packing: 0,
            decoded_bits_per_pixel: bits,
        })
    }

    pub fn with_packing(mut self, horizontal: u32, vertical: u32) -> Self {
        self.horizontal_packing = horizontal;
        self.vertical_packing = vertical;
        self
    }
}

/// Converts whole pixel buffers between formats and layouts.
///
/// Implementations must be usable from several threads at once when the
/// caller shares them; the pipeline only ever takes `&self`.
pub trait PixelConverter {
    /// Convert `data` from `conversion.from` to `conversion.to`.
    ///
    /// Fails with [`RasterError::UnsupportedConversion`] for pairs the
    /// converter does not handle.
    fn convert(
        &self,
        data: &[u8],
        conversion: &Conversion,
        stop: &dyn Stop,
    ) -> Result<Vec<u8>, RasterError>;

    /// Reverse the row order of a buffer described by `metadata`.
    fn flip_vertical(
        &self,
        data: &[u8],
        metadata: &ImageMetadata,
        stop: &dyn Stop,
    ) -> Result<Vec<u8>, RasterError> {
        crate::layout::flip_vertical(data, metadata, stop)
    }

    /// Re-lay a buffer described by `metadata` to new packing values.
    fn adjust_for_packing(
        &self,
        data: &[u8],
        metadata: &ImageMetadata,
        horizontal: u32,
        vertical: u32,
        stop: &dyn Stop,
    ) -> Result<Vec<u8>, RasterError> {
        crate::layout::adjust_for_packing(data, metadata, horizontal, vertical, stop)
    }
}

/// The built-in converter.
///
/// | from | to |
/// |---|---|
/// | `RgbB8G8R8`, `RgbR8G8B8` | `RgbaB8G8R8A8`, `RgbaR8G8B8A8` |
/// | `RgbB5G5R5X1`, `RgbR5G5B5X1` | `RgbaB8G8R8A8`, `RgbaR8G8B8A8` |
/// | `YCbCrJpeg` | `RgbaB8G8R8A8`, `RgbaR8G8B8A8` |
///
/// Alpha is always 255.
#[derive(Clone, Copy, Debug, Default)]
pub struct BasicPixelConverter;

/// Channel order of a 24- or 32-bit layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Order {
    Bgr,
    Rgb,
}

fn order_of(format: PixelFormat) -> Option<Order> {
    match format {
        PixelFormat::RgbB8G8R8 | PixelFormat::RgbB5G5R5X1 | PixelFormat::RgbaB8G8R8A8 => {
            Some(Order::Bgr)
        }
        PixelFormat::RgbR8G8B8 | PixelFormat::RgbR5G5B5X1 | PixelFormat::RgbaR8G8B8A8 => {
            Some(Order::Rgb)
        }
        _ => None,
    }
}

impl PixelConverter for BasicPixelConverter {
    fn convert(
        &self,
        data: &[u8],
        conversion: &Conversion,
        stop: &dyn Stop,
    ) -> Result<Vec<u8>, RasterError> {
        let unsupported = || RasterError::UnsupportedConversion {
            from: conversion.from,
            to: conversion.to,
        };
        if !matches!(
            conversion.to,
            PixelFormat::RgbaB8G8R8A8 | PixelFormat::RgbaR8G8B8A8
        ) {
            return Err(unsupported());
        }
        let dst_order = order_of(conversion.to).ok_or_else(unsupported)?;

        match conversion.from {
            PixelFormat::RgbB8G8R8 | PixelFormat::RgbR8G8B8 => {
                let swap = order_of(conversion.from) != Some(dst_order);
                convert_rows(data, conversion, 3, stop, |src, dst| {
                    rgb_rows::rgb24_row(src, dst, swap)
                })
            }
            PixelFormat::RgbB5G5R5X1 | PixelFormat::RgbR5G5B5X1 => {
                let swap = order_of(conversion.from) != Some(dst_order);
                convert_rows(data, conversion, 2, stop, |src, dst| {
                    rgb_rows::rgb555_row(src, dst, swap);
                    Ok(())
                })
            }
            PixelFormat::YCbCrJpeg => convert_rows(data, conversion, 3, stop, |src, dst| {
                ycbcr::jfif_row(src, dst, dst_order == Order::Bgr);
                Ok(())
            }),
            _ => Err(unsupported()),
        }
    }
}

/// Drive a per-row kernel over a packed buffer, producing 32-bit rows with
/// the same packing. `src_bytes` is the byte size of one source pixel.
fn convert_rows(
    data: &[u8],
    conversion: &Conversion,
    src_bytes: usize,
    stop: &dyn Stop,
    mut row: impl FnMut(&[u8], &mut [u8]) -> Result<(), RasterError>,
) -> Result<Vec<u8>, RasterError> {
    let width = conversion.width as usize;
    let height = conversion.height as usize;
    let hp = conversion.horizontal_packing as usize;

    let src_row = packed_row_byte_width(conversion.decoded_bits_per_pixel as usize, hp, width);
    let dst_row = packed_row_byte_width(32, hp, width);
    let rows = packed_row_count(conversion.vertical_packing as usize, height);
    let src_span = width * src_bytes;
    let dst_span = unpacked_row_byte_width(32, width);

    let needed = crate::limits::buffer_size(
        src_row.max(src_span),
        rows,
        conversion.width,
        conversion.height,
    )?;
    if data.len() < needed {
        return Err(RasterError::BufferTooSmall {
            needed,
            actual: data.len(),
        });
    }

    let total = crate::limits::buffer_size(dst_row, rows, conversion.width, conversion.height)?;
    let mut out = vec![0u8; total];
    let stride = src_row.max(src_span);
    for r in 0..rows {
        if r % 16 == 0 {
            stop.check()?;
        }
        let src = &data[r * stride..r * stride + src_span];
        let dst = &mut out[r * dst_row..r * dst_row + dst_span];
        row(src, dst)?;
    }
    Ok(out)
}
