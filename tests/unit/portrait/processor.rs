use std::io::Cursor;

use super::*;

fn png_bytes(img: RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn split_red_blue(w: u32, h: u32) -> RgbaImage {
    RgbaImage::from_fn(w, h, |x, _| {
        if x < w / 2 {
            image::Rgba([255, 0, 0, 255])
        } else {
            image::Rgba([0, 0, 255, 255])
        }
    })
}

#[test]
fn process_crops_center_to_target_aspect() {
    let source = PortraitSource::new(
        png_bytes(split_red_blue(300, 100)),
        ImageFormatHint::Extension("png".into()),
    );
    let art = PortraitProcessor::default()
        .process(Some(&source), 100, 100)
        .unwrap();
    assert!(!art.is_placeholder);
    assert_eq!(art.image.dimensions(), (100, 100));
    // Crop is columns 100..200 of the source: red up to 150, blue after.
    assert_eq!(art.image.get_pixel(0, 0).0, [255, 0, 0, 255]);
    assert_eq!(art.image.get_pixel(49, 99).0, [255, 0, 0, 255]);
    assert_eq!(art.image.get_pixel(50, 0).0, [0, 0, 255, 255]);
}

#[test]
fn process_upsamples_small_sources() {
    let art = PortraitProcessor::default()
        .process_image(split_red_blue(10, 5), 40, 60)
        .unwrap();
    assert_eq!(art.image.dimensions(), (40, 60));
    assert!(art.image.pixels().all(|p| p.0[3] == 255));
}

#[test]
fn transparent_portraits_are_flattened_over_white() {
    let art = PortraitProcessor::default()
        .process_image(RgbaImage::new(4, 4), 4, 4)
        .unwrap();
    assert!(art.image.pixels().all(|p| p.0 == [255, 255, 255, 255]));
}

#[test]
fn missing_source_yields_placeholder() {
    let processor = PortraitProcessor::default();
    let art = processor.process(None, 824, 756).unwrap();
    assert!(art.is_placeholder);
    assert_eq!((art.width(), art.height()), (824, 756));

    let distinct: std::collections::HashSet<[u8; 4]> =
        art.image.pixels().map(|p| p.0).collect();
    assert!(distinct.len() >= 3, "{distinct:?}");

    assert_eq!(processor.placeholder(824, 756), art);
}

#[test]
fn placeholder_never_fails_on_degenerate_sizes() {
    let processor = PortraitProcessor::default();
    for (w, h) in [(0, 0), (0, 5), (1, 1), (3, 500), (500, 3)] {
        let art = processor.placeholder(w, h);
        assert!(art.is_placeholder);
        assert_eq!(art.image.dimensions(), (w, h));
    }
}

#[test]
fn bad_bytes_are_reported_not_replaced() {
    let processor = PortraitProcessor::default();
    let empty = PortraitSource::default();
    assert!(matches!(
        processor.process(Some(&empty), 10, 10),
        Err(CardError::InvalidImage(_))
    ));

    let corrupt = PortraitSource::new(b"\x89PNG garbage".to_vec(), ImageFormatHint::Auto);
    assert!(matches!(
        processor.process(Some(&corrupt), 10, 10),
        Err(CardError::InvalidImage(_))
    ));
}

#[test]
fn limits_and_target_are_enforced() {
    let strict = PortraitProcessor::new(PortraitLimits {
        min_width: 64,
        min_height: 64,
        max_aspect: 4.0,
    });
    assert!(matches!(
        strict.process_image(RgbaImage::new(32, 32), 10, 10),
        Err(CardError::InvalidImage(_))
    ));
    assert!(matches!(
        PortraitProcessor::default().process_image(RgbaImage::new(8, 8), 0, 10),
        Err(CardError::Validation(_))
    ));
}
