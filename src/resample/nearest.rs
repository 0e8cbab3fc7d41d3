use alloc::vec::Vec;

use enough::Stop;
use tracing::debug;

use super::SourcePlane;
use crate::error::RasterError;

/// Nearest-neighbour resample of a plane to `target_width` by
/// `target_height` samples.
///
/// Target `(tx, ty)` reads source `(tx * width / target_width,
/// ty * height / target_height)` in integer arithmetic. Output is unpadded.
pub fn resample_nearest<T: Copy>(
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
        "nearest-neighbour resample"
    );

    let columns: Vec<usize> = (0..target_width)
        .map(|tx| tx * source.width / target_width)
        .collect();

    let mut out = Vec::with_capacity(target_width * target_height);
    for ty in 0..target_height {
        if ty % 16 == 0 {
            stop.check()?;
        }
        let row = ty * source.height / target_height * source.padded_width;
        out.extend(columns.iter().map(|&sx| data[row + sx]));
    }
    Ok(out)
}
