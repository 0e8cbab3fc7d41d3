#![no_main]
use std::sync::Arc;

use libfuzzer_sys::fuzz_target;
use zenraster::*;

const FORMATS: [PixelFormat; 10] = [
    PixelFormat::Invalid,
    PixelFormat::RgbaR8G8B8A8,
    PixelFormat::RgbaB8G8R8A8,
    PixelFormat::RgbR8G8B8,
    PixelFormat::RgbB8G8R8,
    PixelFormat::RgbR5G5B5X1,
    PixelFormat::RgbB5G5R5X1,
    PixelFormat::YCbCrJpeg,
    PixelFormat::Yuv420,
    PixelFormat::Rgb32Paletted,
];

fn order(b: u8) -> ScanLineOrder {
    if b & 1 == 0 {
        ScanLineOrder::BottomUp
    } else {
        ScanLineOrder::TopDown
    }
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 12 {
        return;
    }
    let (header, body) = data.split_at(12);

    let width = u32::from(header[0] % 33);
    let height = u32::from(header[1] % 33);
    let format = FORMATS[usize::from(header[2]) % FORMATS.len()];
    let bits = u32::from(header[3] % 33);
    let mut meta = ImageMetadata::new(width, height, bits, format, order(header[4]))
        .with_packing(u32::from(header[5] % 9), u32::from(header[6] % 9));

    if header[7] & 1 == 1 {
        let depth = if header[7] & 2 == 0 {
            PaletteDepth::Bgr24
        } else {
            PaletteDepth::Bgra32
        };
        let colors: Vec<PaletteColor> = body
            .chunks_exact(3)
            .take(usize::from(header[8]))
            .map(|c| PaletteColor::rgb(c[0], c[1], c[2]))
            .collect();
        meta = meta.with_palette(Arc::new(Palette::new(depth, colors)));
    }

    // Invalid metadata or short buffers must be rejected, never panic
    let Ok(pixels) = PixelData::new(body.to_vec(), meta) else {
        return;
    };

    let target = FORMATS[usize::from(header[9]) % FORMATS.len()];
    let _ = PixelRequest::new(target)
        .with_order(order(header[10]))
        .with_packing(u32::from(header[10] >> 4), u32::from(header[11] % 9))
        .apply(&pixels, &BasicPixelConverter, enough::Unstoppable);

    let x = i64::from(header[11] >> 4) - 2;
    let _ = sub_image(&pixels, x, x, i64::from(width) / 2, i64::from(height) / 2, enough::Unstoppable);
});
