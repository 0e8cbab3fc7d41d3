use alloc::vec;

use enough::Stop;
use tracing::debug;

use crate::bits::{BitReader, BitWriter};
use crate::error::{RasterError, SubImageError};
use crate::metadata::ImageMetadata;
use crate::pixel::ScanLineOrder;
use crate::pixel_data::PixelData;

fn check_rect(
    x: i64,
    y: i64,
    width: i64,
    height: i64,
    source_width: u32,
    source_height: u32,
) -> Result<(), SubImageError> {
    let (sw, sh) = (i64::from(source_width), i64::from(source_height));
    if x >= sw {
        return Err(SubImageError::XOutOfRange { x, source_width });
    }
    if x < 0 {
        return Err(SubImageError::XNegative { x });
    }
    if y >= sh {
        return Err(SubImageError::YOutOfRange { y, source_height });
    }
    if y < 0 {
        return Err(SubImageError::YNegative { y });
    }
    if width < 0 {
        return Err(SubImageError::WidthNegative { width });
    }
    if height < 0 {
        return Err(SubImageError::HeightNegative { height });
    }
    if x.checked_add(width).is_none_or(|end| end > sw) {
        return Err(SubImageError::WidthExceedsSource {
            x,
            width,
            source_width,
        });
    }
    if y.checked_add(height).is_none_or(|end| end > sh) {
        return Err(SubImageError::HeightExceedsSource {
            y,
            height,
            source_height,
        });
    }
    Ok(())
}

/// Copy the rectangle at `(x, y)` of `width` by `height` pixels out of
/// `source`.
///
/// Coordinates are top-left based whatever the stored order. The copy is
/// bit-exact in the stored stream format (palette indices stay indices),
/// unpacked, at origin (0, 0), and shares the source palette.
pub fn sub_image(
    source: &PixelData,
    x: i64,
    y: i64,
    width: i64,
    height: i64,
    stop: impl Stop,
) -> Result<PixelData, RasterError> {
    let meta = source.metadata();
    check_rect(x, y, width, height, meta.width, meta.height)?;
    debug!(x, y, width, height, "extracting sub-image");

    // All four are in range of the u32 source dimensions after the check.
    let (x, y) = (x as usize, y as usize);
    let (w, h) = (width as usize, height as usize);
    let bits = meta.bits_per_data_pixel as usize;

    let out_meta = ImageMetadata {
        width: w as u32,
        height: h as u32,
        horizontal_packing: 0,
        vertical_packing: 0,
        origin_x: 0,
        origin_y: 0,
        ..meta.clone()
    };

    let native = source.native_data();
    let src_row = meta.stream_row_size();
    let rows = meta.row_count();
    let dst_row = out_meta.stream_row_size();
    let mut out = vec![0u8; out_meta.stream_len()?];

    for i in 0..h {
        if i % 16 == 0 {
            stop.check()?;
        }
        let line = match meta.order {
            ScanLineOrder::TopDown => y + i,
            ScanLineOrder::BottomUp => y + h - 1 - i,
        };
        let src_index = meta.order.buffer_row(line, rows);
        let src = &native[src_index * src_row..(src_index + 1) * src_row];
        let dst = &mut out[i * dst_row..(i + 1) * dst_row];

        if bits % 8 == 0 {
            let bytes = bits / 8;
            dst[..w * bytes].copy_from_slice(&src[x * bytes..(x + w) * bytes]);
        } else {
            let mut reader = BitReader::at(src, x * bits);
            let mut writer = BitWriter::new(dst);
            for _ in 0..w {
                let mut remaining = bits;
                while remaining > 0 {
                    let n = remaining.min(8) as u32;
                    writer.write(n, reader.read(n)?)?;
                    remaining -= n as usize;
                }
            }
        }
    }

    PixelData::new(out, out_meta)
}
