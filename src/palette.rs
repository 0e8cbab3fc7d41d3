//! Colour tables for index-encoded pixel streams.

use alloc::vec::Vec;

use rgb::{Rgb, Rgba};

use crate::error::RasterError;

/// Bit depth of a palette's expanded colours.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PaletteDepth {
    /// 24-bit entries, stored as B, G, R bytes.
    Bgr24,
    /// 32-bit entries, stored as B, G, R, A bytes.
    Bgra32,
}

impl PaletteDepth {
    pub const fn bits_per_pixel(self) -> u32 {
        match self {
            Self::Bgr24 => 24,
            Self::Bgra32 => 32,
        }
    }

    pub const fn bytes_per_pixel(self) -> usize {
        self.bits_per_pixel() as usize / 8
    }
}

/// A single palette entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaletteColor {
    Rgb(Rgb<u8>),
    Rgba(Rgba<u8>),
}

impl PaletteColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::Rgb(Rgb { r, g, b })
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::Rgba(Rgba { r, g, b, a })
    }

    fn encode_into(self, depth: PaletteDepth, out: &mut Vec<u8>) {
        let (r, g, b, a) = match self {
            Self::Rgb(c) => (c.r, c.g, c.b, 255),
            Self::Rgba(c) => (c.r, c.g, c.b, c.a),
        };
        out.extend_from_slice(&[b, g, r]);
        if depth == PaletteDepth::Bgra32 {
            out.push(a);
        }
    }
}

impl From<Rgb<u8>> for PaletteColor {
    fn from(c: Rgb<u8>) -> Self {
        Self::Rgb(c)
    }
}

impl From<Rgba<u8>> for PaletteColor {
    fn from(c: Rgba<u8>) -> Self {
        Self::Rgba(c)
    }
}

/// Ordered colour list plus the raw bytes each index expands to.
///
/// The byte cache is rebuilt whenever the colour list is replaced, so it
/// always matches the current colours.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    depth: PaletteDepth,
    colors: Vec<PaletteColor>,
    encoded: Vec<u8>,
}

impl Palette {
    pub fn new(depth: PaletteDepth, colors: impl Into<Vec<PaletteColor>>) -> Self {
        let mut palette = Self {
            depth,
            colors: Vec::new(),
            encoded: Vec::new(),
        };
        palette.set_colors(colors);
        palette
    }

    /// Replace the colour list and rebuild the byte cache.
    pub fn set_colors(&mut self, colors: impl Into<Vec<PaletteColor>>) {
        self.colors = colors.into();
        let mut encoded = Vec::with_capacity(self.colors.len() * self.depth.bytes_per_pixel());
        for color in &self.colors {
            color.encode_into(self.depth, &mut encoded);
        }
        self.encoded = encoded;
    }

    pub fn colors(&self) -> &[PaletteColor] {
        &self.colors
    }

    pub fn depth(&self) -> PaletteDepth {
        self.depth
    }

    /// Bits per expanded pixel (not per index).
    pub fn bits_per_pixel(&self) -> u32 {
        self.depth.bits_per_pixel()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Raw output bytes for palette entry `index`.
    pub fn bytes_for(&self, index: usize) -> Result<&[u8], RasterError> {
        let bpp = self.depth.bytes_per_pixel();
        index
            .checked_mul(bpp)
            .and_then(|start| self.encoded.get(start..start.checked_add(bpp)?))
            .ok_or(RasterError::PaletteIndexOutOfRange {
                index,
                len: self.colors.len(),
            })
    }
}
