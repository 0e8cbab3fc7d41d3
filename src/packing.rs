//! Row width and row count arithmetic shared by every pipeline stage.
//!
//! Packing adds the *remainder* of the size modulo the packing value rather
//! than rounding up to a multiple: a 6-byte row packed to 4 is 8 bytes, a
//! 7-byte row packed to 4 is 10. Every row offset in the crate goes through
//! these functions.

/// Bytes needed for `width` pixels of `bits_per_pixel` bits, without padding.
#[inline]
pub const fn unpacked_row_byte_width(bits_per_pixel: usize, width: usize) -> usize {
    (bits_per_pixel * width).div_ceil(8)
}

/// Bytes per stored row for the given horizontal `packing` (0 = none).
#[inline]
pub const fn packed_row_byte_width(bits_per_pixel: usize, packing: usize, width: usize) -> usize {
    let row = unpacked_row_byte_width(bits_per_pixel, width);
    if packing > 0 { row + row % packing } else { row }
}

/// Stored row count for the given vertical `packing` (0 = none).
#[inline]
pub const fn packed_row_count(packing: usize, height: usize) -> usize {
    if packing > 0 {
        height + height % packing
    } else {
        height
    }
}
