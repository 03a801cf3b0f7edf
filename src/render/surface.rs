use image::imageops::FilterType;

use crate::{
    assets::{PreparedImage, encoded::EncodedImage},
    foundation::{
        core::{Canvas, Rgba8Premul},
        error::{AlbumError, AlbumResult},
    },
    render::{
        composite::{over, tint, unpremultiply_rgb},
        encode::encode_jpeg_rgb8,
    },
};

/// Premultiplied RGBA8 drawing surface exclusively owned by one composition.
///
/// Encoding consumes the surface, releasing its pixel buffer.
#[derive(Clone, Debug)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Surface {
    /// Allocate a transparent surface.
    pub fn new(canvas: Canvas) -> AlbumResult<Self> {
        if canvas.width == 0 || canvas.height == 0 {
            return Err(AlbumError::canvas_unavailable(format!(
                "cannot allocate an empty {}x{} surface",
                canvas.width, canvas.height
            )));
        }
        let len = canvas
            .pixel_count()
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| {
                AlbumError::canvas_unavailable(format!(
                    "surface size overflow: {}x{}",
                    canvas.width, canvas.height
                ))
            })?;

        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|e| {
            AlbumError::canvas_unavailable(format!(
                "failed to allocate {}x{} surface: {e}",
                canvas.width, canvas.height
            ))
        })?;
        data.resize(len, 0);

        Ok(Self {
            width: canvas.width,
            height: canvas.height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Premultiplied pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = self.index(x, y);
        Some([
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ])
    }

    /// Overwrite every pixel with `color`.
    pub fn fill(&mut self, color: Rgba8Premul) {
        let px = color.to_array();
        for d in self.data.chunks_exact_mut(4) {
            d.copy_from_slice(&px);
        }
    }

    /// Source-over a premultiplied RGBA8 buffer with its top-left corner at `(x, y)`.
    ///
    /// Parts outside the surface are clipped.
    pub fn draw_premul(
        &mut self,
        src: &[u8],
        src_w: u32,
        src_h: u32,
        x: i64,
        y: i64,
    ) -> AlbumResult<()> {
        check_len(src.len(), src_w, src_h, 4)?;
        let Some(span) = self.clip(src_w, src_h, x, y) else {
            return Ok(());
        };
        for sy in span.y0..span.y1 {
            for sx in span.x0..span.x1 {
                let s_idx = ((sy as usize) * (src_w as usize) + sx as usize) * 4;
                let s = [src[s_idx], src[s_idx + 1], src[s_idx + 2], src[s_idx + 3]];
                if s[3] == 0 {
                    continue;
                }
                self.blend_at((x + sx) as u32, (y + sy) as u32, s);
            }
        }
        Ok(())
    }

    /// Source-over `color` using a single-channel coverage mask.
    pub fn draw_mask(
        &mut self,
        mask: &[u8],
        mask_w: u32,
        mask_h: u32,
        x: i64,
        y: i64,
        color: Rgba8Premul,
    ) -> AlbumResult<()> {
        check_len(mask.len(), mask_w, mask_h, 1)?;
        let Some(span) = self.clip(mask_w, mask_h, x, y) else {
            return Ok(());
        };
        let color = color.to_array();
        for sy in span.y0..span.y1 {
            for sx in span.x0..span.x1 {
                let coverage = mask[(sy as usize) * (mask_w as usize) + sx as usize];
                if coverage == 0 {
                    continue;
                }
                self.blend_at((x + sx) as u32, (y + sy) as u32, tint(color, coverage));
            }
        }
        Ok(())
    }

    /// Scale `img` to `width x height` and draw it with its top-left corner at `(x, y)`.
    pub fn draw_image_scaled(
        &mut self,
        img: &PreparedImage,
        x: i64,
        y: i64,
        width: u32,
        height: u32,
    ) -> AlbumResult<()> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        let src = image::RgbaImage::from_raw(img.width, img.height, img.rgba8_premul.to_vec())
            .ok_or_else(|| AlbumError::validation("prepared image buffer has the wrong length"))?;
        let scaled = if (img.width, img.height) == (width, height) {
            src
        } else {
            image::imageops::resize(&src, width, height, FilterType::Triangle)
        };
        self.draw_premul(scaled.as_raw(), width, height, x, y)
    }

    /// Encode as baseline JPEG; alpha is dropped after un-premultiplying.
    pub fn encode_jpeg(self, quality: u8) -> AlbumResult<EncodedImage> {
        let mut rgb = Vec::new();
        rgb.try_reserve_exact((self.data.len() / 4) * 3).map_err(|e| {
            AlbumError::canvas_unavailable(format!("failed to allocate encode buffer: {e}"))
        })?;
        for px in self.data.chunks_exact(4) {
            rgb.extend_from_slice(&unpremultiply_rgb([px[0], px[1], px[2], px[3]]));
        }
        encode_jpeg_rgb8(&rgb, self.width, self.height, quality)
    }

    fn index(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + x as usize) * 4
    }

    fn blend_at(&mut self, x: u32, y: u32, src: [u8; 4]) {
        let idx = self.index(x, y);
        let d = [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ];
        self.data[idx..idx + 4].copy_from_slice(&over(d, src, 1.0));
    }

    /// Source-space span of a `w x h` buffer placed at `(x, y)` that lands on the surface.
    fn clip(&self, w: u32, h: u32, x: i64, y: i64) -> Option<Span> {
        let x0 = (-x).max(0);
        let y0 = (-y).max(0);
        let x1 = i64::from(w).min(i64::from(self.width) - x);
        let y1 = i64::from(h).min(i64::from(self.height) - y);
        (x0 < x1 && y0 < y1).then_some(Span { x0, y0, x1, y1 })
    }
}

#[derive(Clone, Copy, Debug)]
struct Span {
    x0: i64,
    y0: i64,
    x1: i64,
    y1: i64,
}

fn check_len(len: usize, w: u32, h: u32, channels: usize) -> AlbumResult<()> {
    let expected = (w as usize)
        .checked_mul(h as usize)
        .and_then(|n| n.checked_mul(channels))
        .ok_or_else(|| AlbumError::validation("source buffer size overflow"))?;
    if len != expected {
        return Err(AlbumError::validation(format!(
            "source buffer has {len} bytes, expected {expected} for {w}x{h}x{channels}"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
