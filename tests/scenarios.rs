//! # Sticker Scenarios
//!
//! End-to-end checks over the public API: render, edit through the
//! editor, persist and export. Fonts are never registered here, so every
//! text element goes through the built-in bitmap face and the results are
//! stable across machines.

use pretty_assertions::assert_eq;

use etiqueta::document::{Anchor, BarcodeElement, Color, Config, Size, TextElement};
use etiqueta::geometry::{Point, PointF, Rect};
use etiqueta::transform::CoordinateMapper;
use etiqueta::{Document, Editor, FontBook, render, template};

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn render_default(config: Config) -> etiqueta::Rendered {
    let mut doc = Document::default_scene();
    doc.set_config(config).unwrap();
    render::render(&doc, &FontBook::new())
}

/// Pixels of row `y` between `x1` (inclusive) and `x2` (exclusive).
fn row(image: &image::RgbaImage, y: i32, x1: i32, x2: i32) -> Vec<image::Rgba<u8>> {
    (x1..x2).map(|x| *image.get_pixel(x as u32, y as u32)).collect()
}

fn center(r: Rect) -> PointF {
    PointF::new((r.x1 + r.x2) as f64 / 2.0, (r.y1 + r.y2) as f64 / 2.0)
}

// ============================================================================
// RENDERING
// ============================================================================

#[test]
fn test_list_price_strikethrough_toggle() {
    let on = render_default(Config::default());
    let off = render_default(Config {
        strikethrough: false,
        ..Default::default()
    });

    let bbox = on.boxes.get("list_price").unwrap();
    assert_eq!(off.boxes.get("list_price"), Some(bbox));

    let mid = (bbox.y1 + bbox.y2).div_euclid(2);
    let gray = Color::GRAY.to_rgba();
    assert!(row(&on.image, mid, bbox.x1, bbox.x2).iter().all(|p| *p == gray));
    assert!(row(&off.image, mid, bbox.x1, bbox.x2).iter().any(|p| *p != gray));
}

#[test]
fn test_barcode_box_is_centered_on_position() {
    let mut doc = Document::new();
    doc.add_element(
        "barcode",
        BarcodeElement::new(Point::new(450, 82), Size::new(300, 70)).data("ABC123"),
    )
    .unwrap();

    let rendered = render::render(&doc, &FontBook::new());
    assert_eq!(rendered.boxes.get("barcode"), Some(Rect::new(300, 47, 600, 117)));

    // Dark bars inside, light quiet zone at the left edge
    let bars = row(&rendered.image, 82, 300, 600);
    assert!(bars.iter().any(|p| p[0] < 64));
    assert!(bars[0][0] > 200);
}

#[test]
fn test_boxes_are_valid_and_keyed_by_elements() {
    let doc = Document::default_scene();
    let rendered = render::render(&doc, &FontBook::new());
    let (w, h) = (doc.config().export_width as i32, doc.config().export_height as i32);

    assert!(!rendered.boxes.is_empty());
    for (key, r) in rendered.boxes.iter() {
        assert!(doc.element(key).is_some(), "box for unknown element {}", key);
        assert!(r.x1 < r.x2 && r.y1 < r.y2, "degenerate box for {}", key);
        assert!(r.x1 < w && r.y1 < h && r.x2 > 0 && r.y2 > 0, "{} is off canvas", key);
    }
}

#[test]
fn test_vertical_south_text_ends_at_anchor() {
    let mut doc = Document::new();
    doc.set_field("stack", "定価定");
    doc.add_element(
        "stack",
        TextElement::new("stack", Point::new(400, 300), 24)
            .anchor(Anchor::S)
            .vertical(1.2),
    )
    .unwrap();

    let rendered = render::render(&doc, &FontBook::new());
    let bbox = rendered.boxes.get("stack").unwrap();
    assert_eq!(bbox.y2, 300);
    assert!(bbox.height() > 2 * 24);
}

#[test]
fn test_skipped_elements_leave_no_box() {
    let mut doc = Document::default_scene();
    doc.set_field("list_price", "unknown");
    doc.set_field("barcode_data", "");

    let rendered = render::render(&doc, &FontBook::new());
    assert!(!rendered.boxes.contains_key("barcode"));
    assert!(!rendered.boxes.contains_key("list_price"));
    assert!(rendered.boxes.contains_key("title"));
}

// ============================================================================
// INTERACTION
// ============================================================================

#[test]
fn test_scaled_preview_multi_drag() {
    let mut editor = Editor::new(Document::default_scene(), FontBook::new());
    editor.set_preview_size(400.0, 200.0);
    assert_eq!(editor.mapper().scale(), 0.5);

    editor.select(["title", "code"]);
    let title = editor.document().element("title").unwrap().position();
    let code = editor.document().element("code").unwrap().position();

    // Modifier press on a selected element deselects it, so press on the
    // barcode instead to add it and keep the drag going
    let barcode_box = editor.boxes().get("barcode").unwrap();
    let start = editor.mapper().to_preview(center(barcode_box));
    editor.pointer_down(start, true);
    assert_eq!(editor.selection().len(), 3);

    editor
        .pointer_move(PointF::new(start.x + 20.0, start.y + 10.0))
        .unwrap();
    editor.pointer_up();

    let doc = editor.document();
    assert_eq!(doc.element("title").unwrap().position(), title.offset_rounded(40.0, 20.0));
    assert_eq!(doc.element("code").unwrap().position(), code.offset_rounded(40.0, 20.0));
    assert_eq!(doc.element("barcode").unwrap().position(), Point::new(448, 67));
}

#[test]
fn test_resize_barcode_from_corner() {
    let mut editor = Editor::new(Document::default_scene(), FontBook::new());
    let bbox = editor.boxes().get("barcode").unwrap();

    editor.pointer_down(center(bbox), false);
    editor.pointer_up();
    assert_eq!(editor.overlay().handles.len(), 8);

    // Bottom-right handle sits on the box corner
    let corner = PointF::new(bbox.x2 as f64, bbox.y2 as f64);
    editor.pointer_down(corner, false);
    editor.pointer_move(PointF::new(corner.x + 30.0, corner.y + 7.0)).unwrap();
    editor.pointer_up();

    let size = editor.document().element("barcode").unwrap().size().unwrap();
    assert_eq!(size, Size::new(330, 77));
}

#[test]
fn test_mapper_round_trip() {
    let mapper = CoordinateMapper::new(1000.0, 300.0, 800, 400);
    for p in [PointF::new(0.0, 0.0), PointF::new(123.0, 45.5), PointF::new(800.0, 400.0)] {
        let back = mapper.to_doc(mapper.to_preview(p));
        assert!((back.x - p.x).abs() < 1e-9 && (back.y - p.y).abs() < 1e-9);
    }
}

// ============================================================================
// PERSISTENCE
// ============================================================================

#[test]
fn test_template_without_config_uses_defaults() {
    let json = r#"{
        "fields": {"title": "Wanderers"},
        "elements": {"title": {"pos": [32, 173], "fontSize": 25, "tag": "title", "anchor": "w"}}
    }"#;
    let doc = template::from_json(json).unwrap();
    assert_eq!(doc.config(), &Config::default());

    let rendered = render::render(&doc, &FontBook::new());
    assert_eq!(rendered.image.dimensions(), (800, 400));
    assert!(rendered.boxes.contains_key("title"));
}

#[test]
fn test_extreme_positions_skip_only_their_element() {
    let json = r#"{
        "fields": {"title": "Wanderers", "note": "x", "barcode_data": "ABC123"},
        "elements": {
            "barcode": {"pos": [2147483647, 0], "size": [300, 70], "tag": "barcode"},
            "title": {"pos": [2147483647, 0], "fontSize": 25, "tag": "title"},
            "note": {"pos": [40, 40], "fontSize": 20, "tag": "note"}
        }
    }"#;
    let doc = template::from_json(json).unwrap();

    let rendered = render::render(&doc, &FontBook::new());
    assert!(!rendered.boxes.contains_key("barcode"));
    assert!(!rendered.boxes.contains_key("title"));
    assert!(rendered.boxes.contains_key("note"));
}

#[test]
fn test_barcode_under_other_key_round_trips() {
    let mut doc = Document::default_scene();
    doc.add_element(
        "shelf_code",
        BarcodeElement::new(Point::new(600, 120), Size::new(150, 40)).data("SHELF7"),
    )
    .unwrap();

    let back = template::from_json(&template::to_json(&doc).unwrap()).unwrap();
    assert_eq!(back, doc);
}

#[test]
fn test_save_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sticker.json");

    let mut doc = Document::default_scene();
    let key = doc.add_custom_text("Limited edition");
    doc.set_position(&key, Point::new(500, 150)).unwrap();
    doc.set_vertical("cat2", true).unwrap();
    template::save(&doc, &path).unwrap();

    let back = template::load(&path).unwrap();
    assert_eq!(back, doc);

    let fonts = FontBook::new();
    assert_eq!(render::render(&back, &fonts).boxes, render::render(&doc, &fonts).boxes);
}

#[test]
fn test_export_png_dimensions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sticker.png");

    let mut doc = Document::default_scene();
    doc.set_config(Config {
        export_width: 640,
        export_height: 320,
        ..Default::default()
    })
    .unwrap();
    template::export_png(&doc, &FontBook::new(), &path).unwrap();

    let png = image::open(&path).unwrap();
    assert_eq!((png.width(), png.height()), (640, 320));
}

#[test]
fn test_editor_load_failure_keeps_working() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.json");

    let mut editor = Editor::new(Document::new(), FontBook::new());
    assert!(editor.load_template(&missing).is_err());
    assert_eq!(editor.document(), &Document::default_scene());
    assert!(editor.boxes().contains_key("final_price"));
}
