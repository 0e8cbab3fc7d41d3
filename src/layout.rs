//! Row-level rearrangement: vertical flips and packing changes.
//!
//! Both operations read the geometry of the buffer they are given from the
//! metadata, using the expanded bit depth (they run after palette decode).

use alloc::vec;
use alloc::vec::Vec;

use enough::Stop;

use crate::error::RasterError;
use crate::metadata::ImageMetadata;
use crate::packing::{packed_row_byte_width, packed_row_count};

fn require(data: &[u8], needed: usize) -> Result<(), RasterError> {
    if data.len() < needed {
        return Err(RasterError::BufferTooSmall {
            needed,
            actual: data.len(),
        });
    }
    Ok(())
}

/// Reverse the row order of `data`, padding rows included.
///
/// Uses the buffer's own horizontal packing; the output has the same size
/// and packing as the input.
pub fn flip_vertical(
    data: &[u8],
    metadata: &ImageMetadata,
    stop: &dyn Stop,
) -> Result<Vec<u8>, RasterError> {
    let row_len = metadata.row_data_size();
    let rows = metadata.row_count();
    let total = metadata.expanded_len()?;
    require(data, total)?;

    let mut out = vec![0u8; total];
    for row in 0..rows {
        if row % 16 == 0 {
            stop.check()?;
        }
        let src = row * row_len;
        let dst = (rows - 1 - row) * row_len;
        out[dst..dst + row_len].copy_from_slice(&data[src..src + row_len]);
    }
    Ok(out)
}

/// Re-lay `data` from the metadata's packing to `(horizontal, vertical)`.
///
/// Only the unpadded bytes of each row are copied; new padding is zero.
/// When the row counts differ, `min(source, destination)` rows are copied,
/// anchored at row 0 for top-down buffers and at the last row for bottom-up
/// buffers, in both source and destination.
pub fn adjust_for_packing(
    data: &[u8],
    metadata: &ImageMetadata,
    horizontal: u32,
    vertical: u32,
    stop: &dyn Stop,
) -> Result<Vec<u8>, RasterError> {
    let width = metadata.width as usize;
    let height = metadata.height as usize;
    let bits = metadata.expanded_bits_per_pixel() as usize;

    let src_row = metadata.row_data_size();
    let src_rows = metadata.row_count();
    require(data, metadata.expanded_len()?)?;

    let dst_row = packed_row_byte_width(bits, horizontal as usize, width);
    let dst_rows = packed_row_count(vertical as usize, height);
    let copy_width = metadata.unpacked_row_size();
    let copy_rows = src_rows.min(dst_rows);

    let mut out = vec![
        0u8;
        crate::limits::buffer_size(dst_row, dst_rows, metadata.width, metadata.height)?
    ];

    let src_first = metadata.order.first_image_row(src_rows, copy_rows);
    let dst_first = metadata.order.first_image_row(dst_rows, copy_rows);
    for i in 0..copy_rows {
        if i % 16 == 0 {
            stop.check()?;
        }
        let src = (src_first + i) * src_row;
        let dst = (dst_first + i) * dst_row;
        out[dst..dst + copy_width].copy_from_slice(&data[src..src + copy_width]);
    }
    Ok(out)
}
