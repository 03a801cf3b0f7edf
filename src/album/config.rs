use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    foundation::{
        core::{Canvas, Color},
        error::{AlbumError, AlbumResult},
    },
    layout::grid::GridSpec,
    render::encode::jpeg_quality,
};

/// Visual constants of the album. Every field has a default matching the reference deployment.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AlbumConfig {
    pub width: u32,
    pub height: u32,
    pub padding: f64,
    pub image_padding: f64,
    pub columns: u32,
    pub rows: u32,
    pub caption_band: f64,
    pub caption_font_size: f64,
    pub footer_band: f64,
    pub footer_offset: f64,
    pub footer_font_size: f64,
    pub footer_text: String,
    pub background: Color,
    pub text_color: Color,
    pub shadow_color: Color,
    pub shadow_blur: u32,
    pub shadow_offset_y: i32,
    /// JPEG quality factor in `(0, 1]`.
    pub jpeg_quality: f32,
    /// Caption font; the bundled DejaVu Sans is used when unset.
    pub font_path: Option<PathBuf>,
}

impl Default for AlbumConfig {
    fn default() -> Self {
        Self {
            width: 3200,
            height: 1800,
            padding: 80.0,
            image_padding: 40.0,
            columns: 4,
            rows: 2,
            caption_band: 90.0,
            caption_font_size: 44.0,
            footer_band: 100.0,
            footer_offset: 60.0,
            footer_font_size: 40.0,
            footer_text: "Made with portrait-album".to_string(),
            background: Color::rgb(0xF4, 0xF1, 0xEA),
            text_color: Color::rgb(0x2B, 0x2B, 0x2B),
            shadow_color: Color::rgba(0, 0, 0, 89),
            shadow_blur: 18,
            shadow_offset_y: 12,
            jpeg_quality: 0.95,
            font_path: None,
        }
    }
}

impl AlbumConfig {
    /// Read a JSON config file; missing fields keep their defaults.
    pub fn from_path(path: impl AsRef<Path>) -> AlbumResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read album config '{}'", path.display()))?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> AlbumResult<Self> {
        let cfg: Self = serde_json::from_str(text)
            .map_err(|e| AlbumError::serde(format!("album config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    pub fn grid_spec(&self) -> GridSpec {
        GridSpec {
            canvas: self.canvas(),
            padding: self.padding,
            columns: self.columns,
            rows: self.rows,
            image_padding: self.image_padding,
            caption_band: self.caption_band,
            footer_band: self.footer_band,
            footer_offset: self.footer_offset,
        }
    }

    /// Number of images one album holds.
    pub fn capacity(&self) -> usize {
        (self.columns as usize) * (self.rows as usize)
    }

    pub fn jpeg_quality_percent(&self) -> AlbumResult<u8> {
        jpeg_quality(self.jpeg_quality)
    }

    /// Check values that the grid layout does not cover.
    pub fn validate(&self) -> AlbumResult<()> {
        Canvas::new(self.width, self.height)?;
        for (name, v) in [
            ("caption_font_size", self.caption_font_size),
            ("footer_font_size", self.footer_font_size),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(AlbumError::validation(format!(
                    "album {name} must be finite and > 0"
                )));
            }
        }
        if self.shadow_blur > 256 {
            return Err(AlbumError::validation("album shadow_blur must be <= 256"));
        }
        if self.footer_offset > f64::from(self.height) {
            return Err(AlbumError::validation(
                "album footer_offset must lie inside the canvas",
            ));
        }
        self.jpeg_quality_percent()?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/album/config.rs"]
mod tests;
