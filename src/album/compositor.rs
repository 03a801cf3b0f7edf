use std::path::Path;

use anyhow::Context;

use crate::{
    album::{config::AlbumConfig, input::AlbumInput, key::ParsedKey},
    assets::{PreparedImage, decode::load_images, encoded::EncodedImage, fonts::FontSet},
    foundation::error::{AlbumError, AlbumResult},
    layout::grid::{AlbumLayout, compute_grid_layout},
    render::{
        shadow::DropShadow,
        surface::Surface,
        text::{TextLine, TextOverlay},
    },
};

/// Finished collage.
#[derive(Clone, Debug)]
pub struct Album {
    pub width: u32,
    pub height: u32,
    /// JPEG-encoded pixels.
    pub image: EncodedImage,
    /// Captions in grid fill order.
    pub captions: Vec<String>,
}

impl Album {
    pub fn to_data_url(&self) -> String {
        self.image.to_data_url()
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> AlbumResult<()> {
        let path = path.as_ref();
        std::fs::write(path, self.image.bytes())
            .with_context(|| format!("write album to '{}'", path.display()))?;
        Ok(())
    }
}

/// Lays labelled images onto a fixed grid and encodes the result as JPEG.
///
/// Holds no per-composition state: every call allocates its own surface.
#[derive(Clone, Debug)]
pub struct AlbumCompositor {
    config: AlbumConfig,
    fonts: FontSet,
    quality: u8,
}

impl AlbumCompositor {
    pub fn new(config: AlbumConfig) -> AlbumResult<Self> {
        config.validate()?;
        compute_grid_layout(&config.grid_spec())?;
        let fonts = FontSet::load(config.font_path.as_deref())?;
        let quality = config.jpeg_quality_percent()?;
        Ok(Self {
            config,
            fonts,
            quality,
        })
    }

    pub fn config(&self) -> &AlbumConfig {
        &self.config
    }

    /// Fresh layout for the configured grid.
    pub fn layout(&self) -> AlbumResult<AlbumLayout> {
        compute_grid_layout(&self.config.grid_spec())
    }

    /// Compose every entry of `input` into one album.
    ///
    /// Entries fill the grid row-major in key order. Any decode failure fails the whole
    /// composition and nothing is produced.
    #[tracing::instrument(skip_all, fields(entries = input.len()))]
    pub fn compose(&self, input: &AlbumInput) -> AlbumResult<Album> {
        let layout = self.layout()?;
        if input.len() > layout.capacity() {
            return Err(AlbumError::validation(format!(
                "album holds at most {} images, got {}",
                layout.capacity(),
                input.len()
            )));
        }

        let mut captions = Vec::with_capacity(input.len());
        let mut sources = Vec::with_capacity(input.len());
        for (key, image) in input.iter() {
            captions.push(ParsedKey::parse(key)?.caption());
            sources.push(image);
        }

        let images = load_images(&sources)?;

        let mut surface = Surface::new(layout.canvas)?;
        surface.fill(self.config.background.premul());
        self.draw_cells(&mut surface, &layout, &images)?;
        self.draw_text(&mut surface, &layout, &captions)?;

        let image = surface.encode_jpeg(self.quality)?;
        tracing::info!(
            width = layout.canvas.width,
            height = layout.canvas.height,
            bytes = image.len(),
            "album composed"
        );
        Ok(Album {
            width: layout.canvas.width,
            height: layout.canvas.height,
            image,
            captions,
        })
    }

    fn draw_cells(
        &self,
        surface: &mut Surface,
        layout: &AlbumLayout,
        images: &[PreparedImage],
    ) -> AlbumResult<()> {
        if images.is_empty() {
            return Ok(());
        }
        let shadow = DropShadow::new(
            layout.image_box,
            self.config.shadow_blur,
            i64::from(self.config.shadow_offset_y),
            self.config.shadow_color.premul(),
        )?;

        for (i, img) in images.iter().enumerate() {
            let cell = layout.cell_for_index(i).ok_or_else(|| {
                AlbumError::validation(format!("no grid cell for image index {i}"))
            })?;
            let x = cell.image.x0 as i64;
            let y = cell.image.y0 as i64;
            tracing::debug!(i, row = cell.row, col = cell.col, x, y, "drawing album cell");

            shadow.draw(surface, x, y)?;
            surface.draw_image_scaled(img, x, y, layout.image_box, layout.image_box)?;
        }
        Ok(())
    }

    fn draw_text(
        &self,
        surface: &mut Surface,
        layout: &AlbumLayout,
        captions: &[String],
    ) -> AlbumResult<()> {
        let mut overlay = TextOverlay::new();
        for (cell, caption) in layout.cells.iter().zip(captions) {
            overlay.push(TextLine {
                text: caption.clone(),
                anchor: cell.caption_anchor,
                font_size: self.config.caption_font_size,
                color: self.config.text_color,
            });
        }
        if !self.config.footer_text.trim().is_empty() {
            overlay.push(TextLine {
                text: self.config.footer_text.clone(),
                anchor: layout.footer_anchor,
                font_size: self.config.footer_font_size,
                color: self.config.text_color,
            });
        }
        if overlay.lines().is_empty() {
            return Ok(());
        }

        let canvas = surface.canvas();
        let rgba = overlay.rasterize(canvas, &self.fonts)?;
        surface.draw_premul(&rgba, canvas.width, canvas.height, 0, 0)
    }
}

/// Compose `input` with a one-off compositor built from `config`.
pub fn compose_album(input: &AlbumInput, config: &AlbumConfig) -> AlbumResult<Album> {
    AlbumCompositor::new(config.clone())?.compose(input)
}

#[cfg(test)]
#[path = "../../tests/unit/album/compositor.rs"]
mod tests;
