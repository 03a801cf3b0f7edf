use image::{ExtendedColorType, codecs::jpeg::JpegEncoder};

use crate::{
    assets::encoded::EncodedImage,
    foundation::error::{AlbumError, AlbumResult},
};

/// Map a `0.0..=1.0` quality factor onto the JPEG encoder's `1..=100` scale.
pub fn jpeg_quality(factor: f32) -> AlbumResult<u8> {
    if !factor.is_finite() || factor <= 0.0 || factor > 1.0 {
        return Err(AlbumError::validation(format!(
            "jpeg quality must be in (0, 1], got {factor}"
        )));
    }
    Ok(((factor * 100.0).round() as u8).clamp(1, 100))
}

pub fn encode_jpeg_rgb8(
    rgb: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> AlbumResult<EncodedImage> {
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(3));
    if expected != Some(rgb.len()) {
        return Err(AlbumError::encode(format!(
            "rgb buffer of {} bytes does not match {width}x{height}",
            rgb.len()
        )));
    }

    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100))
        .encode(rgb, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| AlbumError::encode(format!("jpeg encode {width}x{height}: {e}")))?;
    Ok(EncodedImage::from_bytes("image/jpeg", buf))
}

#[cfg(test)]
#[path = "../../tests/unit/render/encode.rs"]
mod tests;
