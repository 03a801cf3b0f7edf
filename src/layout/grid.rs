use crate::foundation::{
    core::{Canvas, Point, Rect},
    error::{AlbumError, AlbumResult},
};

/// Inputs of the grid layout calculation. All lengths are in pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GridSpec {
    pub canvas: Canvas,
    /// Outer padding on every side of the grid.
    pub padding: f64,
    pub columns: u32,
    pub rows: u32,
    /// Space kept free between neighbouring image boxes.
    pub image_padding: f64,
    /// Height reserved under each image box for its caption.
    pub caption_band: f64,
    /// Height reserved at the bottom of the canvas for the footer.
    pub footer_band: f64,
    /// Distance of the footer baseline from the bottom edge.
    pub footer_offset: f64,
}

/// Geometry of one grid cell.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct CellLayout {
    pub row: u32,
    pub col: u32,
    pub cell: Rect,
    /// Square image box, snapped to whole pixels.
    pub image: Rect,
    /// Horizontal centre and baseline of the caption.
    pub caption_anchor: Point,
}

/// Derived album geometry; recomputed for every composition.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct AlbumLayout {
    pub canvas: Canvas,
    pub columns: u32,
    pub rows: u32,
    pub cell_width: f64,
    pub cell_height: f64,
    /// Side of the square image box.
    pub image_box: u32,
    pub caption_band: f64,
    /// Cells in row-major fill order.
    pub cells: Vec<CellLayout>,
    /// Horizontal centre and baseline of the footer caption.
    pub footer_anchor: Point,
}

impl AlbumLayout {
    /// Number of images the grid holds.
    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    /// Cell for the image at sorted index `i`.
    pub fn cell_for_index(&self, i: usize) -> Option<&CellLayout> {
        self.cells.get(i)
    }
}

/// Row-major grid position of sequence index `i`.
pub fn grid_position(i: usize, columns: u32) -> (u32, u32) {
    let cols = columns.max(1) as usize;
    ((i / cols) as u32, (i % cols) as u32)
}

/// Compute cell, image box and caption geometry for a fixed `rows x columns` grid.
pub fn compute_grid_layout(spec: &GridSpec) -> AlbumResult<AlbumLayout> {
    if spec.canvas.width == 0 || spec.canvas.height == 0 {
        return Err(AlbumError::validation("grid canvas must be non-empty"));
    }
    if spec.columns == 0 || spec.rows == 0 {
        return Err(AlbumError::validation("grid rows and columns must be > 0"));
    }
    for (name, v) in [
        ("padding", spec.padding),
        ("image_padding", spec.image_padding),
        ("caption_band", spec.caption_band),
        ("footer_band", spec.footer_band),
        ("footer_offset", spec.footer_offset),
    ] {
        if !v.is_finite() || v < 0.0 {
            return Err(AlbumError::validation(format!(
                "grid {name} must be finite and >= 0"
            )));
        }
    }

    let canvas_w = f64::from(spec.canvas.width);
    let canvas_h = f64::from(spec.canvas.height);
    let grid_w = canvas_w - 2.0 * spec.padding;
    let grid_h = canvas_h - 2.0 * spec.padding - spec.footer_band;
    if grid_w <= 0.0 || grid_h <= 0.0 {
        return Err(AlbumError::validation(
            "grid padding and footer leave no room for cells",
        ));
    }

    let cell_w = grid_w / f64::from(spec.columns);
    let cell_h = grid_h / f64::from(spec.rows);
    let image_region_h = cell_h - spec.caption_band;
    let image_box = (cell_w - spec.image_padding)
        .min(image_region_h - spec.image_padding)
        .floor();
    if image_box < 1.0 {
        return Err(AlbumError::validation(format!(
            "grid cells of {cell_w:.1}x{cell_h:.1} leave no room for an image box"
        )));
    }

    let capacity = (spec.rows as usize) * (spec.columns as usize);
    let mut cells = Vec::with_capacity(capacity);
    for i in 0..capacity {
        let (row, col) = grid_position(i, spec.columns);
        let x0 = spec.padding + f64::from(col) * cell_w;
        let y0 = spec.padding + f64::from(row) * cell_h;
        let cell = Rect::new(x0, y0, x0 + cell_w, y0 + cell_h);

        let img_x = (x0 + centered(cell_w, image_box)).round();
        let img_y = (y0 + centered(image_region_h, image_box)).round();
        let image = Rect::new(img_x, img_y, img_x + image_box, img_y + image_box);

        let caption_anchor = Point::new(
            image.center().x,
            (image.y1 + spec.caption_band * 0.6).round(),
        );
        cells.push(CellLayout {
            row,
            col,
            cell,
            image,
            caption_anchor,
        });
    }

    let footer_anchor = Point::new(canvas_w * 0.5, canvas_h - spec.footer_offset);
    tracing::debug!(cell_w, cell_h, image_box, capacity, "computed album grid");

    Ok(AlbumLayout {
        canvas: spec.canvas,
        columns: spec.columns,
        rows: spec.rows,
        cell_width: cell_w,
        cell_height: cell_h,
        image_box: image_box as u32,
        caption_band: spec.caption_band,
        cells,
        footer_anchor,
    })
}

fn centered(container: f64, content: f64) -> f64 {
    (container - content).max(0.0) * 0.5
}

#[cfg(test)]
#[path = "../../tests/unit/layout/grid.rs"]
mod tests;
