use super::*;

fn canvas() -> Canvas {
    Canvas {
        width: 240,
        height: 80,
    }
}

fn line(text: &str) -> TextLine {
    TextLine {
        text: text.to_string(),
        anchor: Point::new(120.0, 50.0),
        font_size: 28.0,
        color: Color::rgb(0x2B, 0x2B, 0x2B),
    }
}

#[test]
fn svg_escapes_caption_text() {
    let mut overlay = TextOverlay::new();
    overlay.push(line("Tom & \"Jerry\" <v1>"));
    let svg = overlay.to_svg(canvas());
    assert!(svg.contains("Tom &amp; &quot;Jerry&quot; &lt;v1&gt;"));
    assert!(svg.contains(r#"text-anchor="middle""#));
    assert!(!svg.contains("font-family"));
}

#[test]
fn family_with_apostrophe_never_reaches_the_svg() {
    let mut overlay = TextOverlay::new();
    overlay.push(line("O'Brien (v1)"));
    let svg = overlay.to_svg(canvas());
    assert!(!svg.contains("font-family"));

    let opts = usvg::Options {
        font_family: "O'Brien Sans".to_string(),
        fontdb: FontSet::bundled().database(),
        ..Default::default()
    };
    assert!(usvg::Tree::from_str(&svg, &opts).is_ok());
}

#[test]
fn rasterized_text_covers_pixels_around_anchor() {
    let mut overlay = TextOverlay::new();
    overlay.push(line("Instagram (v1)"));
    let rgba = overlay.rasterize(canvas(), &FontSet::bundled()).unwrap();
    assert_eq!(rgba.len(), 240 * 80 * 4);

    let covered_in_band = (25..55u32)
        .flat_map(|y| (20..220u32).map(move |x| (x, y)))
        .filter(|&(x, y)| rgba[((y * 240 + x) * 4 + 3) as usize] > 0)
        .count();
    assert!(covered_in_band > 50, "only {covered_in_band} covered pixels");

    let covered_top_rows = (0..10u32)
        .flat_map(|y| (0..240u32).map(move |x| (x, y)))
        .filter(|&(x, y)| rgba[((y * 240 + x) * 4 + 3) as usize] > 0)
        .count();
    assert_eq!(covered_top_rows, 0);
}

#[test]
fn empty_overlay_is_fully_transparent() {
    let rgba = TextOverlay::new()
        .rasterize(canvas(), &FontSet::bundled())
        .unwrap();
    assert!(rgba.iter().all(|&b| b == 0));
}
