use super::*;

fn reference_spec() -> GridSpec {
    GridSpec {
        canvas: Canvas {
            width: 3200,
            height: 1800,
        },
        padding: 80.0,
        columns: 4,
        rows: 2,
        image_padding: 40.0,
        caption_band: 90.0,
        footer_band: 100.0,
        footer_offset: 60.0,
    }
}

#[test]
fn reference_grid_dimensions() {
    let layout = compute_grid_layout(&reference_spec()).unwrap();
    assert_eq!(layout.capacity(), 8);
    assert_eq!(layout.cell_width, 760.0);
    assert_eq!(layout.cell_height, 770.0);
    assert_eq!(layout.image_box, 640);
    assert_eq!(layout.footer_anchor, Point::new(1600.0, 1740.0));
}

#[test]
fn first_and_last_cells_are_placed_row_major() {
    let layout = compute_grid_layout(&reference_spec()).unwrap();

    let first = layout.cell_for_index(0).unwrap();
    assert_eq!((first.row, first.col), (0, 0));
    assert_eq!(first.cell, Rect::new(80.0, 80.0, 840.0, 850.0));
    assert_eq!(first.image, Rect::new(140.0, 100.0, 780.0, 740.0));
    assert_eq!(first.caption_anchor, Point::new(460.0, 794.0));

    let last = layout.cell_for_index(7).unwrap();
    assert_eq!((last.row, last.col), (1, 3));
    assert_eq!(last.image, Rect::new(2420.0, 870.0, 3060.0, 1510.0));
    assert!(layout.cell_for_index(8).is_none());
}

#[test]
fn grid_position_is_row_major() {
    let got: Vec<_> = (0..8).map(|i| grid_position(i, 4)).collect();
    assert_eq!(
        got,
        vec![
            (0, 0),
            (0, 1),
            (0, 2),
            (0, 3),
            (1, 0),
            (1, 1),
            (1, 2),
            (1, 3)
        ]
    );
}

#[test]
fn image_boxes_never_overlap_caption_bands_or_footer() {
    let spec = reference_spec();
    let layout = compute_grid_layout(&spec).unwrap();
    for c in &layout.cells {
        assert!(c.image.x0 >= c.cell.x0 && c.image.x1 <= c.cell.x1);
        assert!(c.image.y1 + spec.caption_band <= c.cell.y1 + 1e-9);
        assert!(c.caption_anchor.y < c.cell.y1);
        assert!(c.cell.y1 <= layout.footer_anchor.y);
    }
}

#[test]
fn layout_is_deterministic() {
    let a = compute_grid_layout(&reference_spec()).unwrap();
    let b = compute_grid_layout(&reference_spec()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn image_box_is_limited_by_width_on_tall_canvases() {
    let spec = GridSpec {
        canvas: Canvas {
            width: 800,
            height: 2000,
        },
        ..reference_spec()
    };
    let layout = compute_grid_layout(&spec).unwrap();
    // (800 - 160) / 4 - 40
    assert_eq!(layout.image_box, 120);
}

#[test]
fn invalid_specs_are_rejected() {
    let mut spec = reference_spec();
    spec.columns = 0;
    assert!(compute_grid_layout(&spec).is_err());

    let mut spec = reference_spec();
    spec.padding = 2000.0;
    assert!(compute_grid_layout(&spec).is_err());

    let mut spec = reference_spec();
    spec.caption_band = f64::NAN;
    assert!(compute_grid_layout(&spec).is_err());

    let mut spec = reference_spec();
    spec.caption_band = 800.0;
    assert!(compute_grid_layout(&spec).is_err());
}
