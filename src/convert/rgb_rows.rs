use crate::error::RasterError;

/// Expand a 5-bit channel to 8 bits by replicating its top bits.
#[inline]
pub(crate) const fn expand5(v: u16) -> u8 {
    let v = (v & 0x1F) as u8;
    (v << 3) | ((v & 0x1C) >> 2)
}

/// One row of 24-bit pixels to 32-bit pixels with alpha 255.
///
/// Channel bytes keep their position unless `swap` is set, in which case
/// bytes 0 and 2 trade places.
pub(super) fn rgb24_row(src: &[u8], dst: &mut [u8], swap: bool) -> Result<(), RasterError> {
    if src.is_empty() {
        return Ok(());
    }

    #[cfg(feature = "simd")]
    {
        let swizzled = if swap {
            garb::bytes::rgb_to_bgra(src, dst)
        } else {
            garb::bytes::rgb_to_rgba(src, dst)
        };
        swizzled.map_err(|_| RasterError::BufferTooSmall {
            needed: src.len() / 3 * 4,
            actual: dst.len(),
        })
    }

    #[cfg(not(feature = "simd"))]
    {
        rgb24_row_scalar(src, dst, swap);
        Ok(())
    }
}

#[cfg_attr(feature = "simd", allow(dead_code))]
fn rgb24_row_scalar(src: &[u8], dst: &mut [u8], swap: bool) {
    for (px, out) in src.chunks_exact(3).zip(dst.chunks_exact_mut(4)) {
        if swap {
            out.copy_from_slice(&[px[2], px[1], px[0], 255]);
        } else {
            out.copy_from_slice(&[px[0], px[1], px[2], 255]);
        }
    }
}

/// One row of little-endian 5:5:5 words to 32-bit pixels with alpha 255.
///
/// The low field lands in byte 0 unless `swap` is set.
pub(super) fn rgb555_row(src: &[u8], dst: &mut [u8], swap: bool) {
    for (px, out) in src.chunks_exact(2).zip(dst.chunks_exact_mut(4)) {
        let word = u16::from_le_bytes([px[0], px[1]]);
        let low = expand5(word);
        let mid = expand5(word >> 5);
        let high = expand5(word >> 10);
        if swap {
            out.copy_from_slice(&[high, mid, low, 255]);
        } else {
            out.copy_from_slice(&[low, mid, high, 255]);
        }
    }
}
