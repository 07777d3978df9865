use std::io::Cursor;

use super::*;

fn encode(img: image::RgbaImage, format: image::ImageFormat) -> Vec<u8> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), format)
        .unwrap();
    buf
}

#[test]
fn decode_png_dimensions_and_pixels() {
    let src = image::RgbaImage::from_raw(2, 1, vec![100, 50, 200, 255, 1, 2, 3, 128]).unwrap();
    let bytes = encode(src, image::ImageFormat::Png);

    let img = decode_portrait(&bytes, &ImageFormatHint::Auto).unwrap();
    assert_eq!(img.dimensions(), (2, 1));
    assert_eq!(img.get_pixel(0, 0).0, [100, 50, 200, 255]);
    assert_eq!(img.get_pixel(1, 0).0, [1, 2, 3, 128]);
}

#[test]
fn wrong_hint_falls_back_to_sniffing() {
    let bytes = encode(image::RgbaImage::new(3, 3), image::ImageFormat::Png);
    let hint = ImageFormatHint::Extension("jpg".to_string());
    assert_eq!(decode_portrait(&bytes, &hint).unwrap().dimensions(), (3, 3));

    let hint = ImageFormatHint::MimeType("image/png".to_string());
    assert_eq!(decode_portrait(&bytes, &hint).unwrap().dimensions(), (3, 3));
}

#[test]
fn empty_and_corrupt_bytes_are_invalid_images() {
    let err = decode_portrait(&[], &ImageFormatHint::Auto).unwrap_err();
    assert!(matches!(err, CardError::InvalidImage(_)));

    let err = decode_portrait(b"definitely not an image", &ImageFormatHint::Auto).unwrap_err();
    assert!(matches!(err, CardError::InvalidImage(_)));

    let mut truncated = encode(image::RgbaImage::new(8, 8), image::ImageFormat::Png);
    truncated.truncate(truncated.len() / 2);
    let hint = ImageFormatHint::Extension("png".to_string());
    let err = decode_portrait(&truncated, &hint).unwrap_err();
    assert!(matches!(err, CardError::InvalidImage(_)));
}

#[test]
fn hint_from_path_uses_extension() {
    assert_eq!(
        ImageFormatHint::from_path(std::path::Path::new("a/Tim Cheese.webp")),
        ImageFormatHint::Extension("webp".to_string())
    );
    assert_eq!(
        ImageFormatHint::from_path(std::path::Path::new("noext")),
        ImageFormatHint::Auto
    );
}

#[test]
fn limits_reject_small_and_extreme_images() {
    let limits = PortraitLimits {
        min_width: 10,
        min_height: 10,
        max_aspect: 5.0,
    };
    assert!(limits.check(10, 10).is_ok());
    assert!(matches!(
        limits.check(9, 100),
        Err(CardError::InvalidImage(_))
    ));
    assert!(matches!(
        limits.check(10, 60),
        Err(CardError::InvalidImage(_))
    ));
    assert!(matches!(
        PortraitLimits::default().check(0, 10),
        Err(CardError::InvalidImage(_))
    ));
}

#[test]
fn flatten_composites_over_background() {
    let mut img = image::RgbaImage::from_raw(2, 1, vec![0, 0, 0, 0, 200, 100, 0, 255]).unwrap();
    flatten_onto(&mut img, [255, 255, 255]);
    assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255, 255]);
    assert_eq!(img.get_pixel(1, 0).0, [200, 100, 0, 255]);
}
