//! Single-channel plane resampling.
//!
//! Planes are row-major slices of samples whose logical size may be smaller
//! than their padded (allocated) size. Two strategies are provided:
//! [`resample_nearest`] picks one source sample per target sample, and
//! [`resample_weighted`] averages the source samples each target sample
//! covers, weighting partially covered samples by their overlap.

mod nearest;
mod weighted;

pub use nearest::resample_nearest;
pub use weighted::resample_weighted;

use crate::error::RasterError;

/// A numeric sample type the weighted resampler can average.
///
/// Conversion back from `f64` truncates toward zero and saturates at the
/// type's bounds for integer types.
pub trait Sample: Copy {
    fn to_f64(self) -> f64;
    fn from_f64(value: f64) -> Self;
}

macro_rules! impl_sample {
    ($($t:ty),*) => {
        $(
            impl Sample for $t {
                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }

                #[inline]
                fn from_f64(value: f64) -> Self {
                    value as $t
                }
            }
        )*
    };
}

impl_sample!(u8, u16, i16, u32, i32, f32, f64);

/// Logical and padded dimensions of a source plane.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SourcePlane {
    pub width: usize,
    pub height: usize,
    /// Samples per stored row.
    pub padded_width: usize,
    /// Stored rows.
    pub padded_height: usize,
}

impl SourcePlane {
    /// A plane with no padding.
    pub const fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            padded_width: width,
            padded_height: height,
        }
    }

    pub const fn with_padding(mut self, padded_width: usize, padded_height: usize) -> Self {
        self.padded_width = padded_width;
        self.padded_height = padded_height;
        self
    }

    pub(crate) fn validate<T>(
        &self,
        data: &[T],
        target_width: usize,
        target_height: usize,
    ) -> Result<(), RasterError> {
        let zero = |what| Err(RasterError::ZeroDimension { what });
        if self.width == 0 {
            return zero("source width");
        }
        if self.height == 0 {
            return zero("source height");
        }
        if target_width == 0 {
            return zero("target width");
        }
        if target_height == 0 {
            return zero("target height");
        }
        if self.padded_width < self.width {
            return Err(RasterError::InvalidStride {
                what: "width",
                actual: self.width,
                padded: self.padded_width,
            });
        }
        if self.padded_height < self.height {
            return Err(RasterError::InvalidStride {
                what: "height",
                actual: self.height,
                padded: self.padded_height,
            });
        }
        let needed = (self.height - 1)
            .checked_mul(self.padded_width)
            .and_then(|n| n.checked_add(self.width))
            .ok_or(RasterError::BufferTooSmall {
                needed: usize::MAX,
                actual: data.len(),
            })?;
        if data.len() < needed {
            return Err(RasterError::BufferTooSmall {
                needed,
                actual: data.len(),
            });
        }
        Ok(())
    }
}

/// [`resample_nearest`] over an [`imgref::ImgRef`], using its stride as
/// the padded width.
#[cfg(feature = "imgref")]
pub fn resample_nearest_img<T: Copy>(
    source: imgref::ImgRef<'_, T>,
    target_width: usize,
    target_height: usize,
    stop: impl enough::Stop,
) -> Result<imgref::ImgVec<T>, RasterError> {
    let plane = SourcePlane::new(source.width(), source.height())
        .with_padding(source.stride(), source.height());
    let buf: &[T] = source.buf();
    let out = resample_nearest(buf, plane, target_width, target_height, stop)?;
    Ok(imgref::ImgVec::new(out, target_width, target_height))
}

/// [`resample_weighted`] over an [`imgref::ImgRef`], using its stride as
/// the padded width.
#[cfg(feature = "imgref")]
pub fn resample_weighted_img<T: Sample>(
    source: imgref::ImgRef<'_, T>,
    target_width: usize,
    target_height: usize,
    stop: impl enough::Stop,
) -> Result<imgref::ImgVec<T>, RasterError> {
    let plane = SourcePlane::new(source.width(), source.height())
        .with_padding(source.stride(), source.height());
    let buf: &[T] = source.buf();
    let out = resample_weighted(buf, plane, target_width, target_height, stop)?;
    Ok(imgref::ImgVec::new(out, target_width, target_height))
}
