use std::sync::Arc;

use enough::{Stop, StopReason, Unstoppable};
use zenraster::*;

struct AlwaysStop;

impl Stop for AlwaysStop {
    fn check(&self) -> Result<(), StopReason> {
        Err(StopReason::Cancelled)
    }
}

fn four_color_palette() -> Arc<Palette> {
    Arc::new(Palette::new(
        PaletteDepth::Bgr24,
        [
            PaletteColor::rgb(0, 0, 0),
            PaletteColor::rgb(255, 0, 0),
            PaletteColor::rgb(0, 255, 0),
            PaletteColor::rgb(0, 0, 255),
        ],
    ))
}

/// 2x2 at 2 bits per index, top-down: [black, red] over [green, blue].
fn paletted_2x2() -> PixelData {
    let meta = ImageMetadata::new(2, 2, 2, PixelFormat::RgbB8G8R8, ScanLineOrder::TopDown)
        .with_palette(four_color_palette());
    PixelData::new(vec![0x04, 0x0E], meta).unwrap()
}

#[test]
fn paletted_to_bgra_bottom_up() {
    let data = paletted_2x2();
    let out = data
        .get_pixel_data(
            &BasicPixelConverter,
            PixelFormat::RgbaB8G8R8A8,
            ScanLineOrder::BottomUp,
            0,
            0,
        )
        .unwrap();

    assert!(!out.is_borrowed());
    assert_eq!(
        out.pixels(),
        &[
            0, 255, 0, 255, 255, 0, 0, 255, // green, blue
            0, 0, 0, 255, 0, 0, 255, 255, // black, red
        ]
    );
    assert_eq!(out.metadata.format, PixelFormat::RgbaB8G8R8A8);
    assert_eq!(out.metadata.order, ScanLineOrder::BottomUp);
    assert_eq!(out.metadata.bits_per_data_pixel, 32);
    assert!(out.metadata.palette.is_none());
}

#[test]
fn paletted_to_palette_format_only_expands() {
    let data = paletted_2x2();
    let out = data
        .get_pixel_data(
            &BasicPixelConverter,
            PixelFormat::RgbB8G8R8,
            ScanLineOrder::TopDown,
            0,
            0,
        )
        .unwrap();
    assert_eq!(
        out.pixels(),
        &[0, 0, 0, 0, 0, 255, 0, 255, 0, 255, 0, 0]
    );
}

#[test]
fn rgb555_white_expands_to_white() {
    let meta = ImageMetadata::new(4, 4, 16, PixelFormat::RgbB5G5R5X1, ScanLineOrder::BottomUp);
    let native: Vec<u8> = std::iter::repeat([0xFF, 0x7F]).take(16).flatten().collect();
    let data = PixelData::new(native, meta).unwrap();
    let out = data
        .get_pixel_data(
            &BasicPixelConverter,
            PixelFormat::RgbaB8G8R8A8,
            ScanLineOrder::BottomUp,
            0,
            0,
        )
        .unwrap();
    assert_eq!(out.pixels().len(), 64);
    assert!(out.pixels().iter().all(|&b| b == 255));
}

#[test]
fn matching_request_borrows_the_stored_buffer() {
    let meta = ImageMetadata::new(2, 1, 24, PixelFormat::RgbB8G8R8, ScanLineOrder::TopDown);
    let data = PixelData::new(vec![1, 2, 3, 4, 5, 6], meta).unwrap();
    let out = PixelRequest::new(PixelFormat::RgbB8G8R8)
        .with_order(ScanLineOrder::TopDown)
        .apply(&data, &BasicPixelConverter, Unstoppable)
        .unwrap();
    assert!(out.is_borrowed());
    assert_eq!(out.pixels(), data.native_data());

    let owned = out.into_owned();
    assert!(!owned.is_borrowed());
}

#[test]
fn flip_only_reverses_rows() {
    let meta = ImageMetadata::new(1, 3, 24, PixelFormat::RgbB8G8R8, ScanLineOrder::TopDown);
    let data = PixelData::new(vec![1, 1, 1, 2, 2, 2, 3, 3, 3], meta).unwrap();
    let out = data
        .get_pixel_data(
            &BasicPixelConverter,
            PixelFormat::RgbB8G8R8,
            ScanLineOrder::BottomUp,
            0,
            0,
        )
        .unwrap();
    assert_eq!(out.pixels(), &[3, 3, 3, 2, 2, 2, 1, 1, 1]);
}

#[test]
fn packed_source_round_trips_through_same_packing() {
    // 3 px BGR = 9 bytes -> 10 with packing 4; 2 rows -> 4 with packing 4,
    // padding rows first since the buffer is bottom-up
    let mut native = vec![0u8; 40];
    native[20..29].copy_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8, 9]);
    native[30..39].copy_from_slice(&[10, 11, 12, 13, 14, 15, 16, 17, 18]);
    let meta = ImageMetadata::new(3, 2, 24, PixelFormat::RgbB8G8R8, ScanLineOrder::BottomUp)
        .with_packing(4, 4);
    let data = PixelData::new(native.clone(), meta).unwrap();

    let same = data
        .get_pixel_data(
            &BasicPixelConverter,
            PixelFormat::RgbB8G8R8,
            ScanLineOrder::BottomUp,
            4,
            4,
        )
        .unwrap();
    assert_eq!(same.pixels(), &native[..]);

    let unpacked = data
        .get_pixel_data(
            &BasicPixelConverter,
            PixelFormat::RgbB8G8R8,
            ScanLineOrder::BottomUp,
            0,
            0,
        )
        .unwrap();
    assert_eq!(
        unpacked.pixels(),
        &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18]
    );
}

#[test]
fn repacked_output_describes_itself() {
    let meta = ImageMetadata::new(3, 1, 24, PixelFormat::RgbB8G8R8, ScanLineOrder::TopDown);
    let data = PixelData::new(vec![0; 9], meta).unwrap();
    let out = data
        .get_pixel_data(
            &BasicPixelConverter,
            PixelFormat::RgbaB8G8R8A8,
            ScanLineOrder::TopDown,
            5,
            0,
        )
        .unwrap();
    // 12 bytes + 12 % 5
    assert_eq!(out.metadata.row_data_size(), 14);
    assert_eq!(out.pixels().len(), 14);
    assert_eq!(out.metadata.horizontal_packing, 5);

    let chained = out.into_pixel_data().unwrap();
    assert_eq!(chained.metadata().format, PixelFormat::RgbaB8G8R8A8);
}

#[test]
fn unsupported_pair_fails() {
    let meta = ImageMetadata::new(1, 1, 32, PixelFormat::RgbaR8G8B8A8, ScanLineOrder::TopDown);
    let data = PixelData::new(vec![0; 4], meta).unwrap();
    let err = data
        .get_pixel_data(
            &BasicPixelConverter,
            PixelFormat::RgbR8G8B8,
            ScanLineOrder::TopDown,
            0,
            0,
        )
        .unwrap_err();
    assert!(matches!(
        err,
        RasterError::UnsupportedConversion {
            from: PixelFormat::RgbaR8G8B8A8,
            to: PixelFormat::RgbR8G8B8
        }
    ));
}

#[test]
fn planar_target_has_no_depth() {
    let meta = ImageMetadata::new(1, 1, 24, PixelFormat::RgbB8G8R8, ScanLineOrder::TopDown);
    let data = PixelData::new(vec![0; 3], meta).unwrap();
    let err = PixelRequest::new(PixelFormat::Yuv420)
        .with_order(ScanLineOrder::TopDown)
        .apply(&data, &BasicPixelConverter, Unstoppable)
        .unwrap_err();
    assert!(matches!(
        err,
        RasterError::UnsupportedFormat(PixelFormat::Yuv420)
    ));
}

#[test]
fn dimension_limits_are_enforced() {
    let data = paletted_2x2();
    let limits = Limits {
        max_width: Some(1),
        ..Default::default()
    };
    let err = PixelRequest::new(PixelFormat::RgbaB8G8R8A8)
        .with_limits(&limits)
        .apply(&data, &BasicPixelConverter, Unstoppable)
        .unwrap_err();
    assert!(matches!(err, RasterError::LimitExceeded(_)));
}

#[test]
fn memory_limit_applies_per_stage() {
    let data = paletted_2x2();
    // palette expansion needs 12 bytes, BGRA output needs 16
    let limits = Limits {
        max_memory_bytes: Some(12),
        ..Default::default()
    };
    let err = PixelRequest::new(PixelFormat::RgbaB8G8R8A8)
        .with_order(ScanLineOrder::TopDown)
        .with_limits(&limits)
        .apply(&data, &BasicPixelConverter, Unstoppable)
        .unwrap_err();
    assert!(matches!(err, RasterError::LimitExceeded(_)));

    let limits = Limits {
        max_memory_bytes: Some(16),
        ..Default::default()
    };
    assert!(
        PixelRequest::new(PixelFormat::RgbaB8G8R8A8)
            .with_order(ScanLineOrder::TopDown)
            .with_limits(&limits)
            .apply(&data, &BasicPixelConverter, Unstoppable)
            .is_ok()
    );
}

#[test]
fn cancellation_is_reported() {
    let data = paletted_2x2();
    let err = PixelRequest::new(PixelFormat::RgbaB8G8R8A8)
        .apply(&data, &BasicPixelConverter, AlwaysStop)
        .unwrap_err();
    assert!(matches!(err, RasterError::Cancelled(StopReason::Cancelled)));
}

#[test]
fn custom_converter_is_used() {
    struct Fill(u8);

    impl PixelConverter for Fill {
        fn convert(
            &self,
            _data: &[u8],
            conversion: &Conversion,
            _stop: &dyn Stop,
        ) -> Result<Vec<u8>, RasterError> {
            let len = conversion.width as usize * conversion.height as usize * 4;
            Ok(vec![self.0; len])
        }
    }

    let meta = ImageMetadata::new(2, 1, 24, PixelFormat::RgbB8G8R8, ScanLineOrder::TopDown);
    let data = PixelData::new(vec![0; 6], meta).unwrap();
    let out = data
        .get_pixel_data(
            &Fill(7),
            PixelFormat::RgbaB8G8R8A8,
            ScanLineOrder::TopDown,
            0,
            0,
        )
        .unwrap();
    assert_eq!(out.pixels(), &[7; 8]);
}

#[test]
fn typed_pixel_view() {
    let meta = ImageMetadata::new(1, 1, 24, PixelFormat::RgbR8G8B8, ScanLineOrder::TopDown);
    let data = PixelData::new(vec![10, 20, 30], meta).unwrap();
    let out = data
        .get_pixel_data(
            &BasicPixelConverter,
            PixelFormat::RgbaR8G8B8A8,
            ScanLineOrder::TopDown,
            0,
            0,
        )
        .unwrap();
    let px: &[rgb::Rgba<u8>] = out.as_pixels().unwrap();
    assert_eq!(px, &[rgb::Rgba::new(10, 20, 30, 255)]);

    let err = out.as_pixels::<rgb::Rgb<u8>>().unwrap_err();
    assert!(matches!(err, RasterError::LayoutMismatch { .. }));
}

#[cfg(feature = "imgref")]
#[test]
fn imgref_view_skips_padding() {
    let meta = ImageMetadata::new(1, 2, 24, PixelFormat::RgbB8G8R8, ScanLineOrder::TopDown);
    let data = PixelData::new(vec![1, 2, 3, 4, 5, 6], meta).unwrap();
    let out = data
        .get_pixel_data(
            &BasicPixelConverter,
            PixelFormat::RgbB8G8R8,
            ScanLineOrder::TopDown,
            2,
            3,
        )
        .unwrap();
    let img = out.as_imgref().unwrap();
    assert_eq!(img.width(), 3);
    assert_eq!(img.height(), 2);
    assert_eq!(img.stride(), 4);
    let rows: Vec<&[u8]> = img.rows().collect();
    assert_eq!(rows, [&[1u8, 2, 3][..], &[4, 5, 6][..]]);
}

#[test]
fn typed_view_covers_only_image_rows() {
    // 2x1 unpacked, four stray bytes past the last row
    let meta = ImageMetadata::new(2, 1, 32, PixelFormat::RgbaR8G8B8A8, ScanLineOrder::BottomUp);
    let data = PixelData::new(vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 9, 9, 9], meta).unwrap();
    let expected = [rgb::Rgba::new(1, 2, 3, 4), rgb::Rgba::new(5, 6, 7, 8)];

    let borrowed = data
        .get_pixel_data(
            &BasicPixelConverter,
            PixelFormat::RgbaR8G8B8A8,
            ScanLineOrder::BottomUp,
            0,
            0,
        )
        .unwrap();
    assert!(borrowed.is_borrowed());
    let px: &[rgb::Rgba<u8>] = borrowed.as_pixels().unwrap();
    assert_eq!(px, &expected);

    // bottom-up with vertical packing 3: one zero padding row comes first
    let padded = data
        .get_pixel_data(
            &BasicPixelConverter,
            PixelFormat::RgbaR8G8B8A8,
            ScanLineOrder::BottomUp,
            0,
            3,
        )
        .unwrap();
    assert_eq!(padded.pixels().len(), 16);
    let px: &[rgb::Rgba<u8>] = padded.as_pixels().unwrap();
    assert_eq!(px, &expected);
}

#[test]
fn palette_depth_must_match_declared_format() {
    let meta = ImageMetadata::new(2, 2, 2, PixelFormat::RgbaB8G8R8A8, ScanLineOrder::TopDown)
        .with_palette(four_color_palette());
    assert!(matches!(
        PixelData::new(vec![0x04, 0x0E], meta),
        Err(RasterError::PaletteFormatMismatch {
            format: PixelFormat::RgbaB8G8R8A8,
            palette_bits: 24
        })
    ));

    // replace re-validates too
    let mut data = paletted_2x2();
    let bgra = Arc::new(Palette::new(PaletteDepth::Bgra32, [PaletteColor::rgb(1, 2, 3)]));
    let meta = data.metadata().clone().with_palette(bgra);
    assert!(matches!(
        data.replace(vec![0, 0], meta),
        Err(RasterError::PaletteFormatMismatch { .. })
    ));
}

#[test]
fn editing_one_palette_entry_changes_only_its_pixels() {
    let decode = |data: &PixelData| {
        data.get_pixel_data(
            &BasicPixelConverter,
            PixelFormat::RgbaB8G8R8A8,
            ScanLineOrder::TopDown,
            0,
            0,
        )
        .unwrap()
        .into_vec()
    };

    let original = paletted_2x2();
    let before = decode(&original);
    assert_eq!(before, decode(&original));

    let (native, mut meta) = original.clone().into_parts();
    let mut colors = four_color_palette().colors().to_vec();
    colors[2] = PaletteColor::rgb(1, 2, 3);
    if let Some(palette) = meta.palette.as_mut() {
        Arc::make_mut(palette).set_colors(colors);
    }
    let edited = PixelData::new(native, meta).unwrap();
    let after = decode(&edited);

    // pixel order top-down: indices 0, 1, 2, 3
    for (i, (a, b)) in before.chunks_exact(4).zip(after.chunks_exact(4)).enumerate() {
        if i == 2 {
            assert_eq!(a, &[0, 255, 0, 255]);
            assert_eq!(b, &[3, 2, 1, 255]);
        } else {
            assert_eq!(a, b, "pixel {i} changed");
        }
    }
    // the original still holds the unedited palette
    assert_eq!(decode(&original), before);
}
