use crate::{
    foundation::{core::Rgba8Premul, error::AlbumResult},
    render::{blur::blur_alpha_mask, surface::Surface},
};

/// Pre-blurred coverage mask for a square box, reused for every cell of one album.
#[derive(Clone, Debug)]
pub struct DropShadow {
    mask: Vec<u8>,
    side: u32,
    margin: u32,
    offset_y: i64,
    color: Rgba8Premul,
}

impl DropShadow {
    /// Build the shadow of a `box_size` square blurred with `blur_radius`.
    pub fn new(
        box_size: u32,
        blur_radius: u32,
        offset_y: i64,
        color: Rgba8Premul,
    ) -> AlbumResult<Self> {
        let margin = blur_radius;
        let side = box_size.saturating_add(margin.saturating_mul(2));

        let mut mask = vec![0u8; (side as usize) * (side as usize)];
        for y in margin..margin + box_size {
            let row = (y as usize) * (side as usize);
            mask[row + margin as usize..row + (margin + box_size) as usize].fill(255);
        }

        let sigma = (blur_radius as f32 * 0.5).max(0.5);
        let mask = blur_alpha_mask(&mask, side, side, blur_radius, sigma)?;
        Ok(Self {
            mask,
            side,
            margin,
            offset_y,
            color,
        })
    }

    /// Draw the shadow under an image box whose top-left corner is `(x, y)`.
    pub fn draw(&self, surface: &mut Surface, x: i64, y: i64) -> AlbumResult<()> {
        surface.draw_mask(
            &self.mask,
            self.side,
            self.side,
            x - i64::from(self.margin),
            y - i64::from(self.margin) + self.offset_y,
            self.color,
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/shadow.rs"]
mod tests;
