use super::*;

#[test]
fn quality_factor_maps_to_percent() {
    assert_eq!(jpeg_quality(0.95).unwrap(), 95);
    assert_eq!(jpeg_quality(1.0).unwrap(), 100);
    assert_eq!(jpeg_quality(0.001).unwrap(), 1);
    assert!(jpeg_quality(0.0).is_err());
    assert!(jpeg_quality(1.5).is_err());
    assert!(jpeg_quality(f32::NAN).is_err());
}

#[test]
fn encode_rejects_short_buffers() {
    assert!(encode_jpeg_rgb8(&[0u8; 5], 2, 2, 90).is_err());
}
