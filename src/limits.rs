use crate::error::RasterError;

/// Resource limits for pixel requests.
///
/// All fields default to `None` (no limit). Dimensions are checked once per
/// request; the memory limit applies to every buffer a pipeline stage
/// allocates, not to their sum, since superseded buffers are released as the
/// pipeline advances.
#[derive(Clone, Debug, Default)]
pub struct Limits {
    pub max_width: Option<u64>,
    pub max_height: Option<u64>,
    /// Maximum pixel count (width * height).
    pub max_pixels: Option<u64>,
    /// Maximum bytes for any single stage buffer.
    pub max_memory_bytes: Option<u64>,
}

fn exceeds(limit: Option<u64>, value: u64, what: &str) -> Result<(), RasterError> {
    match limit {
        Some(max) if value > max => Err(RasterError::LimitExceeded(alloc::format!(
            "{what} {value} exceeds limit {max}"
        ))),
        _ => Ok(()),
    }
}

impl Limits {
    /// Check image dimensions against the configured limits.
    pub(crate) fn check(&self, width: u32, height: u32) -> Result<(), RasterError> {
        exceeds(self.max_width, u64::from(width), "width")?;
        exceeds(self.max_height, u64::from(height), "height")?;
        exceeds(
            self.max_pixels,
            u64::from(width) * u64::from(height),
            "pixel count",
        )
    }

    /// Check that a stage buffer of `bytes` fits the memory limit.
    pub(crate) fn check_memory(&self, bytes: usize) -> Result<(), RasterError> {
        exceeds(self.max_memory_bytes, bytes as u64, "allocation bytes")
    }
}

/// Total byte size of `rows` rows of `row_bytes` bytes, checked for overflow.
pub(crate) fn buffer_size(
    row_bytes: usize,
    rows: usize,
    width: u32,
    height: u32,
) -> Result<usize, RasterError> {
    row_bytes
        .checked_mul(rows)
        .ok_or(RasterError::DimensionsTooLarge { width, height })
}
