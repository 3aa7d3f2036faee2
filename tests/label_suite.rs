use std::path::Path;

use region_label_rs::placement::AnchorSource;
use region_label_rs::{
    Config, InputEvent, Overrides, RegionLabel, RegionRegistry, bundled_overrides, label_svg,
    parse_svg_regions,
};

fn fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(&path).expect("fixture read failed")
}

fn label_of<'a>(labels: &'a [RegionLabel], id: &str) -> &'a RegionLabel {
    labels
        .iter()
        .find(|l| l.region_id == id)
        .unwrap_or_else(|| panic!("no label entry for {id}"))
}

fn anchor(labels: &[RegionLabel], id: &str) -> (f32, f32, AnchorSource) {
    let placed = label_of(labels, id).placed.as_ref().expect("region should be labelled");
    (placed.descriptor.x, placed.descriptor.y, placed.source)
}

#[test]
fn district_map_uses_bundled_table() {
    let svg = fixture("seoul.svg");
    let overrides = bundled_overrides().unwrap();
    let (out, labels) = label_svg(&svg, Some("서울특별시"), &overrides, &Config::default(), None);

    // centroid (500, 400) nudged by the table
    assert_eq!(anchor(&labels, "강남구"), (480.0, 400.0, AnchorSource::Override));

    // the C-shaped district's centroid sits in its notch, so the bbox centre
    // (150, 150) is nudged instead
    assert_eq!(anchor(&labels, "종로구"), (140.0, 190.0, AnchorSource::Override));

    let (x, y, source) = anchor(&labels, "중구");
    assert_eq!(source, AnchorSource::Centroid);
    assert!((x - 340.0).abs() < 1e-3 && (y - 50.0).abs() < 1e-3, "got ({x}, {y})");

    let (x, y, source) = anchor(&labels, "마포구");
    assert_eq!(source, AnchorSource::BoundingBoxCenter);
    assert_eq!(x, 700.0);
    assert!(y > 105.0 && y < 106.0, "curved top should lift the bbox, got {y}");

    assert!(label_of(&labels, "broken").placed.is_none());

    let text_nodes = out.matches("<text ").count();
    assert_eq!(text_nodes, 4);
    assert!(out.contains(">강남구</text>"));
    assert!(!out.contains("<style"));
    assert!(out.trim_end().ends_with("</svg>"));
}

#[test]
fn unnamed_elements_are_skipped() {
    let map = parse_svg_regions(&fixture("seoul.svg"));
    assert_eq!(map.skipped, 1);
    assert_eq!(map.regions.len(), 5);
}

#[test]
fn without_overrides_anchors_are_geometric() {
    let svg = fixture("seoul.svg");
    let (_, labels) = label_svg(&svg, Some("서울특별시"), &Overrides::default(), &Config::default(), None);
    assert_eq!(anchor(&labels, "강남구"), (500.0, 400.0, AnchorSource::Centroid));
    assert_eq!(anchor(&labels, "종로구"), (150.0, 150.0, AnchorSource::BoundingBoxCenter));
}

#[test]
fn nationwide_map_applies_offsets() {
    let svg = fixture("nationwide.svg");
    let overrides = bundled_overrides().unwrap();
    let (_, labels) = label_svg(&svg, None, &overrides, &Config::default(), None);

    assert_eq!(anchor(&labels, "서울특별시"), (250.0, 170.0, AnchorSource::Centroid));
    // two subpaths: the outline goes straight to its bbox
    assert_eq!(anchor(&labels, "경기도"), (270.0, 210.0, AnchorSource::BoundingBoxCenter));
    assert_eq!(anchor(&labels, "제주특별자치도"), (360.0, 1270.0, AnchorSource::Centroid));
}

#[test]
fn parent_font_size_applies_to_every_label() {
    let mut config = Config::default();
    config
        .region_font_sizes
        .insert("서울특별시".to_string(), "7px".to_string());
    let (out, labels) = label_svg(&fixture("seoul.svg"), Some("서울특별시"), &Overrides::default(), &config, None);
    for placed in labels.iter().filter_map(|l| l.placed.as_ref()) {
        assert_eq!(placed.descriptor.font_size, "7px");
    }
    assert!(!out.contains("font-size=\"14px\""));
}

#[test]
fn registry_paints_selection() {
    let svg = fixture("seoul.svg");
    let map = parse_svg_regions(&svg);
    let mut registry = RegionRegistry::new();
    for (idx, region) in map.regions.iter().enumerate() {
        registry.insert(region.id.clone(), idx);
    }
    registry.dispatch("강남구", InputEvent::Click);
    registry.dispatch("중구", InputEvent::Enter);

    let config = Config::default();
    let (out, _) = label_svg(&svg, Some("서울특별시"), &Overrides::default(), &config, Some(&registry));
    let theme = &config.theme;
    assert!(out.contains(&format!("fill:{}", theme.selected_fill)));
    assert!(out.contains(&format!("fill:{}", theme.highlight_fill)));
    assert!(out.contains(&format!("fill:{}", theme.region_fill)));
}
