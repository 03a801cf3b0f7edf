use std::sync::Arc;

use rayon::prelude::*;

use crate::{
    assets::{PreparedImage, encoded::EncodedImage},
    foundation::error::{AlbumError, AlbumResult},
};

/// Decode an encoded image and convert to premultiplied RGBA8.
pub fn decode_image(src: &EncodedImage) -> AlbumResult<PreparedImage> {
    let dyn_img = image::load_from_memory(src.bytes())
        .map_err(|e| AlbumError::image_decode(src.identifier(), e))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(AlbumError::image_decode(
            src.identifier(),
            "image has zero width or height",
        ));
    }

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Decode every source concurrently and wait for all of them to settle.
///
/// Any failure fails the whole batch with the first error in input order. Decodes already
/// running are not cancelled.
pub fn load_images(sources: &[&EncodedImage]) -> AlbumResult<Vec<PreparedImage>> {
    let decoded = sources
        .par_iter()
        .map(|src| decode_image(src))
        .collect::<Vec<_>>();

    let mut out = Vec::with_capacity(decoded.len());
    for item in decoded {
        out.push(item?);
    }
    tracing::debug!(count = out.len(), "decoded album sources");
    Ok(out)
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
