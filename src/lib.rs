//! # zenraster
//!
//! In-memory pixel-data engine for decoded raster images.
//!
//! A [`PixelData`] holds one stored pixel buffer together with the
//! [`ImageMetadata`] that describes it: dimensions, bit depth, scan-line
//! order, row and row-count packing, and optionally a shared [`Palette`].
//! From it you can extract the pixels in any supported layout, copy out a
//! rectangle, or resample single-channel planes.
//!
//! ## Extraction
//!
//! [`PixelRequest`] runs up to five stages, each only when needed: palette
//! expansion, vertical flip, unpacking, format conversion through a
//! [`PixelConverter`], and repacking. When no stage runs, the returned
//! [`PixelOutput`] borrows the stored buffer.
//!
//! ```
//! use std::sync::Arc;
//! use zenraster::*;
//!
//! let palette = Arc::new(Palette::new(
//!     PaletteDepth::Bgr24,
//!     [PaletteColor::rgb(0, 0, 0), PaletteColor::rgb(255, 255, 255)],
//! ));
//! // 8x1, one bit per pixel: alternating black and white
//! let meta = ImageMetadata::new(8, 1, 1, PixelFormat::RgbB8G8R8, ScanLineOrder::TopDown)
//!     .with_palette(palette);
//! let data = PixelData::new(vec![0b1010_1010], meta)?;
//!
//! let out = PixelRequest::new(PixelFormat::RgbaB8G8R8A8)
//!     .with_order(ScanLineOrder::TopDown)
//!     .apply(&data, &BasicPixelConverter, Unstoppable)?;
//! assert_eq!(&out.pixels()[..8], &[0, 0, 0, 255, 255, 255, 255, 255]);
//! # Ok::<(), RasterError>(())
//! ```
//!
//! ## Packing
//!
//! A packing value `p` pads each row (horizontal) or the row count
//! (vertical) by `n % p`, where `n` is the unpadded byte width or row count.
//! `0` means no padding. See [`packing`].
//!
//! ## Cancellation
//!
//! Every operation that walks rows takes an [`enough::Stop`] and checks it
//! every 16 rows. Pass [`Unstoppable`] when cancellation is not needed.

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod bits;
mod convert;
mod error;
mod layout;
mod limits;
mod metadata;
mod output;
pub mod packing;
mod palette;
mod pixel;
mod pixel_data;
mod request;
pub mod resample;
mod subimage;

// Re-exports
pub use convert::{BasicPixelConverter, Conversion, PixelConverter};
pub use enough::{Stop, Unstoppable};
pub use error::{RasterError, SubImageError};
pub use layout::{adjust_for_packing, flip_vertical};
pub use limits::Limits;
pub use metadata::{AspectRatio, ImageMetadata};
pub use output::PixelOutput;
pub use palette::{Palette, PaletteColor, PaletteDepth};
pub use pixel::{PixelFormat, ScanLineOrder};
pub use pixel_data::PixelData;
pub use request::PixelRequest;
pub use resample::{Sample, SourcePlane, resample_nearest, resample_weighted};
pub use subimage::sub_image;
#[cfg(feature = "imgref")]
pub use resample::{resample_nearest_img, resample_weighted_img};
