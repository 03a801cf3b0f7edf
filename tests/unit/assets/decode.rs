use std::io::Cursor;

use super::*;

fn encode_png(img: image::RgbaImage) -> EncodedImage {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    EncodedImage::from_bytes("image/png", buf)
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let img = image::RgbaImage::from_raw(1, 1, vec![100u8, 50u8, 200u8, 128u8]).unwrap();
    let prepared = decode_image(&encode_png(img)).unwrap();
    assert_eq!(prepared.width, 1);
    assert_eq!(prepared.height, 1);
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_image_rejects_garbage_with_identifier() {
    let bad = EncodedImage::from_bytes("image/png", vec![0u8, 1, 2, 3, 4]);
    let err = decode_image(&bad).unwrap_err();
    match err {
        AlbumError::ImageDecode { source_id, .. } => assert_eq!(source_id, "<image/png, 5 bytes>"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn load_images_preserves_input_order() {
    let a = encode_png(image::RgbaImage::from_pixel(3, 2, image::Rgba([255, 0, 0, 255])));
    let b = encode_png(image::RgbaImage::from_pixel(5, 4, image::Rgba([0, 0, 255, 255])));
    let out = load_images(&[&a, &b]).unwrap();
    assert_eq!((out[0].width, out[0].height), (3, 2));
    assert_eq!((out[1].width, out[1].height), (5, 4));
    assert_eq!(out[1].pixel(0, 0), Some([0, 0, 255, 255]));
    assert_eq!(out[1].pixel(5, 0), None);
}

#[test]
fn load_images_fails_whole_batch_on_one_bad_source() {
    let good = encode_png(image::RgbaImage::from_pixel(2, 2, image::Rgba([1, 2, 3, 255])));
    let bad = EncodedImage::from_bytes("image/jpeg", vec![0xFFu8, 0xD8, 0x00]);
    let err = load_images(&[&good, &bad, &good]).unwrap_err();
    assert!(matches!(err, AlbumError::ImageDecode { .. }));
}

#[test]
fn load_images_empty_is_ok() {
    assert!(load_images(&[]).unwrap().is_empty());
}
