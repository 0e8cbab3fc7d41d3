use alloc::vec::Vec;

use enough::Stop;
use tracing::{debug, trace};

use super::{Sample, SourcePlane};
use crate::error::RasterError;

/// Source span covered by one target sample along one axis.
///
/// Covers samples `left..=right`. The first sample is weighted by its
/// covered fraction, inner samples by 1, the last by its covered fraction
/// (or 1 when the span ends exactly on a sample boundary).
#[derive(Clone, Copy, Debug, PartialEq)]
struct Window {
    left: usize,
    right: usize,
    right_weight: f64,
    total: f64,
}

impl Window {
    const fn single(index: usize) -> Self {
        Self {
            left: index,
            right: index,
            right_weight: 1.0,
            total: 1.0,
        }
    }

    /// Weighted mean of `sample(left..=right)`.
    ///
    /// Accumulates offsets from the first sample so that constant runs
    /// reproduce their value exactly.
    #[inline]
    fn apply(&self, sample: impl Fn(usize) -> f64) -> f64 {
        let base = sample(self.left);
        if self.left == self.right {
            return base;
        }
        let mut acc = 0.0;
        for i in self.left + 1..self.right {
            acc += sample(i) - base;
        }
        acc += self.right_weight * (sample(self.right) - base);
        base + acc / self.total
    }
}

fn windows(actual: usize, target: usize) -> Vec<Window> {
    let stride = actual as f64 / target as f64;
    (0..target)
        .map(|x| {
            let start = x as f64 * stride;
            let end = start + stride;
            // start >= 0 so the cast floors
            let left = (start as usize).min(actual - 1);
            let mut right = end as usize;
            if right <= left {
                return Window::single(left);
            }
            let left_weight = 1.0 - (start - left as f64);
            let mut right_weight = end - right as f64;
            if right_weight <= 0.0 || right >= actual {
                right = (right - 1).min(actual - 1);
                right_weight = 1.0;
                if right <= left {
                    return Window::single(left);
                }
            }
            Window {
                left,
                right,
                right_weight,
                total: left_weight + (right - left - 1) as f64 + right_weight,
            }
        })
        .collect()
}

/// Area-weighted resample of a plane to `target_width` by `target_height`
/// samples.
///
/// Each target sample is the mean of the source samples its footprint
/// covers, partial samples weighted by overlap, divided by the sum of
/// weights used. Rows are resampled first, then columns; an axis whose
/// size does not change is passed through untouched. Integer results are
/// truncated toward zero. Output is unpadded.
pub fn resample_weighted<T: Sample>(
    data: &[T],
    source: SourcePlane,
    target_width: usize,
    target_height: usize,
    stop: impl Stop,
) -> Result<Vec<T>, RasterError> {
    source.validate(data, target_width, target_height)?;
    debug!(
        source_width = source.width,
        source_height = source.height,
        target_width,
        target_height,
        "weighted resample"
    );

    let (width, height) = (source.width, source.height);
    let stride = source.padded_width;

    // Horizontal pass: height rows of target_width samples.
    let mut rows: Vec<f64> = Vec::with_capacity(height * target_width);
    if target_width == width {
        trace!("horizontal pass skipped");
        for y in 0..height {
            if y % 16 == 0 {
                stop.check()?;
            }
            let row = &data[y * stride..y * stride + width];
            rows.extend(row.iter().map(|&v| v.to_f64()));
        }
    } else {
        let spans = windows(width, target_width);
        for y in 0..height {
            if y % 16 == 0 {
                stop.check()?;
            }
            let row = &data[y * stride..y * stride + width];
            rows.extend(spans.iter().map(|w| w.apply(|i| row[i].to_f64())));
        }
    }

    // Vertical pass.
    if target_height == height {
        trace!("vertical pass skipped");
        return Ok(rows.into_iter().map(T::from_f64).collect());
    }
    let spans = windows(height, target_height);
    let mut out = Vec::with_capacity(target_width * target_height);
    for (ty, span) in spans.iter().enumerate() {
        if ty % 16 == 0 {
            stop.check()?;
        }
        for x in 0..target_width {
            let value = span.apply(|y| rows[y * target_width + x]);
            out.push(T::from_f64(value));
        }
    }
    Ok(out)
}
