#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod interaction;
pub mod ir;
pub mod label_dump;
pub mod parser;
pub mod placement;
pub mod render;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LabelOptions, RenderConfig, bundled_overrides, load_config};
pub use error::LabelError;
pub use interaction::{InputEvent, RegionRegistry, RegionState};
pub use ir::{BoundingBox, Point, Shape, ShapeKind};
pub use parser::{ParsedMap, parse_svg_regions};
pub use placement::{
    LabelDescriptor, LabelRequest, OverrideTable, Overrides, PlacedLabel, RegionLabel,
    apply_offset, apply_override, build_label_descriptor, compute_centroid, is_point_in_shape,
    place_label, place_map_labels, resolve_base_anchor,
};
pub use render::render_labeled_svg;
pub use theme::Theme;

/// Parses `svg`, places a label on every region and returns the document
/// with `<text>` nodes inserted.
pub fn label_svg(
    svg: &str,
    parent: Option<&str>,
    overrides: &Overrides,
    config: &Config,
    registry: Option<&RegionRegistry<usize>>,
) -> (String, Vec<RegionLabel>) {
    let map = parse_svg_regions(svg);
    let labels = place_map_labels(&map, parent, overrides, config);
    let out = render_labeled_svg(&map, &labels, registry, &config.theme);
    (out, labels)
}
