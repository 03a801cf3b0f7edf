use std::fmt::Write as _;

use anyhow::Context;

use crate::{
    assets::fonts::FontSet,
    foundation::{
        core::{Canvas, Color, Point},
        error::{AlbumError, AlbumResult},
    },
};

/// One horizontally centred line of text.
#[derive(Clone, Debug, PartialEq)]
pub struct TextLine {
    pub text: String,
    /// Horizontal centre and baseline.
    pub anchor: Point,
    pub font_size: f64,
    pub color: Color,
}

/// Every caption of a composition, rasterised together in one pass.
#[derive(Clone, Debug, Default)]
pub struct TextOverlay {
    lines: Vec<TextLine>,
}

impl TextOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: TextLine) {
        self.lines.push(line);
    }

    pub fn lines(&self) -> &[TextLine] {
        &self.lines
    }

    /// SVG document holding every line as a `<text>` element. No `font-family` is written;
    /// the family comes from `usvg::Options::font_family` at rasterisation.
    pub fn to_svg(&self, canvas: Canvas) -> String {
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = canvas.width,
            h = canvas.height
        );
        for line in &self.lines {
            let c = line.color;
            let _ = write!(
                svg,
                r#"<text x="{x}" y="{y}" font-size="{size}" fill="rgb({r},{g},{b})" fill-opacity="{op:.4}" text-anchor="middle">{text}</text>"#,
                x = line.anchor.x,
                y = line.anchor.y,
                size = line.font_size,
                r = c.r,
                g = c.g,
                b = c.b,
                op = f64::from(c.a) / 255.0,
                text = escape_xml(&line.text),
            );
        }
        svg.push_str("</svg>");
        svg
    }

    /// Rasterise to a premultiplied RGBA8 buffer covering the whole canvas.
    pub fn rasterize(&self, canvas: Canvas, fonts: &FontSet) -> AlbumResult<Vec<u8>> {
        let svg = self.to_svg(canvas);
        let opts = usvg::Options {
            font_family: fonts.family().to_string(),
            fontdb: fonts.database(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(&svg, &opts).context("parse caption overlay svg")?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(canvas.width, canvas.height)
            .ok_or_else(|| AlbumError::canvas_unavailable("failed to allocate caption pixmap"))?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::identity(),
            &mut pixmap.as_mut(),
        );
        Ok(pixmap.take())
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
