// Label anchor placement for map regions.
// Stages run strictly forward: centroid -> containment check -> bbox fallback
// -> (small-area nudge) -> override -> caller offset -> descriptor.

mod centroid;
mod containment;
mod label;
mod overrides;
mod resolve;

pub use centroid::compute_centroid;
pub use containment::is_point_in_shape;
pub use label::{LabelDescriptor, TextAnchor, build_label_descriptor};
pub use overrides::{OverrideTable, Overrides, apply_offset, apply_override};
pub use resolve::{
    AnchorSource, adjust_for_small_area, resolve_base_anchor, resolve_base_anchor_with_source,
};

use serde::Serialize;
use std::borrow::Cow;
use tracing::{debug, warn};

use crate::config::{Config, LabelOptions};
use crate::ir::{BoundingBox, Shape, ShapeKind};
use crate::parser::ParsedMap;

/// One region to label.
#[derive(Debug, Clone, Copy)]
pub struct LabelRequest<'a> {
    /// Parent region of the map being labelled (`None` for the top-level map).
    pub parent: Option<&'a str>,
    pub region: &'a str,
    pub text: &'a str,
    pub shape: &'a Shape,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedLabel {
    pub descriptor: LabelDescriptor,
    pub source: AnchorSource,
}

/// Runs the full pipeline for one region.
///
/// `None` only when the shape reports no bounding box; the caller decides
/// whether to draw the region unlabelled.
pub fn place_label(
    request: &LabelRequest<'_>,
    overrides: &Overrides,
    options: &LabelOptions,
) -> Option<PlacedLabel> {
    let (mut anchor, mut source) = resolve_base_anchor_with_source(request.shape)?;

    if options.adjust_small_areas
        && let Some(bbox) = request.shape.bounding_box()
    {
        anchor = adjust_for_small_area(anchor, &bbox, options);
    }

    if let Some(parent) = request.parent
        && let Some(point) = overrides.resolve(parent, request.region, anchor)
    {
        debug!(parent, region = request.region, "using hand-tuned anchor");
        anchor = point;
        source = AnchorSource::Override;
    }

    let (mut dx, mut dy) = (options.x_offset, options.y_offset);
    if request.parent.is_none()
        && let Some(nudge) = overrides.offset_for(request.region)
    {
        dx += nudge.x;
        dy += nudge.y;
    }
    let anchor = apply_offset(anchor, dx, dy);

    Some(PlacedLabel {
        descriptor: build_label_descriptor(anchor, request.text, options),
        source,
    })
}

/// Label outcome for one region of a parsed map.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionLabel {
    pub region_id: String,
    pub kind: ShapeKind,
    pub bbox: Option<BoundingBox>,
    /// `None` when the region has no usable geometry.
    pub placed: Option<PlacedLabel>,
}

/// Places labels for every region of `map`. Each region is independent.
pub fn place_map_labels(
    map: &ParsedMap,
    parent: Option<&str>,
    overrides: &Overrides,
    config: &Config,
) -> Vec<RegionLabel> {
    let options = region_options(parent, config);
    map.regions
        .iter()
        .map(|region| {
            let text = config
                .region_names
                .get(&region.id)
                .map(String::as_str)
                .unwrap_or(region.id.as_str());
            let request = LabelRequest {
                parent,
                region: &region.id,
                text,
                shape: &region.shape,
            };
            let placed = place_label(&request, overrides, &options);
            if placed.is_none() {
                warn!(region = %region.id, "region has no usable geometry, leaving it unlabelled");
            }
            RegionLabel {
                region_id: region.id.clone(),
                kind: region.shape.kind(),
                bbox: region.shape.bounding_box(),
                placed,
            }
        })
        .collect()
}

fn region_options<'a>(parent: Option<&str>, config: &'a Config) -> Cow<'a, LabelOptions> {
    match parent.and_then(|p| config.region_font_sizes.get(p)) {
        Some(size) => {
            let mut options = config.label.clone();
            options.font_size = size.clone();
            Cow::Owned(options)
        }
        None => Cow::Borrowed(&config.label),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Point;
    use std::collections::BTreeMap;

    fn ring(coords: &[(f32, f32)]) -> Shape {
        Shape::polygon(coords.iter().map(|&(x, y)| Point::new(x, y)).collect())
    }

    fn request<'a>(parent: Option<&'a str>, region: &'a str, shape: &'a Shape) -> LabelRequest<'a> {
        LabelRequest {
            parent,
            region,
            text: region,
            shape,
        }
    }

    fn gangnam_override(point: Point) -> Overrides {
        let mut children = BTreeMap::new();
        children.insert("강남구".to_string(), point);
        let mut overrides = Overrides::default();
        overrides.overrides.insert("서울특별시".to_string(), children);
        overrides
    }

    #[test]
    fn pipeline_uses_centroid_then_offsets() {
        let shape = ring(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        let options = LabelOptions {
            x_offset: 10.0,
            y_offset: -5.0,
            ..Default::default()
        };
        let placed = place_label(&request(None, "a", &shape), &Overrides::default(), &options).unwrap();
        assert_eq!(placed.source, AnchorSource::Centroid);
        assert_eq!((placed.descriptor.x, placed.descriptor.y), (15.0, 0.0));
    }

    #[test]
    fn override_precedes_offsets() {
        let shape = ring(&[(0.0, 0.0), (200.0, 0.0), (200.0, 100.0), (0.0, 100.0)]);
        let overrides = gangnam_override(Point::new(-20.0, 0.0));
        let options = LabelOptions {
            x_offset: 1.0,
            y_offset: 2.0,
            ..Default::default()
        };
        let placed = place_label(
            &request(Some("서울특별시"), "강남구", &shape),
            &overrides,
            &options,
        )
        .unwrap();
        assert_eq!(placed.source, AnchorSource::Override);
        assert_eq!((placed.descriptor.x, placed.descriptor.y), (-19.0, 2.0));
    }

    #[test]
    fn top_level_map_ignores_child_overrides_but_uses_offsets() {
        let shape = ring(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        let mut overrides = gangnam_override(Point::new(-20.0, 0.0));
        overrides.offsets.insert("강남구".to_string(), Point::new(100.0, 20.0));
        let placed = place_label(
            &request(None, "강남구", &shape),
            &overrides,
            &LabelOptions::default(),
        )
        .unwrap();
        assert_eq!(placed.source, AnchorSource::Centroid);
        assert_eq!((placed.descriptor.x, placed.descriptor.y), (105.0, 25.0));
    }

    #[test]
    fn small_area_nudge_is_opt_in() {
        let shape = ring(&[(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0)]);
        let off = place_label(&request(None, "a", &shape), &Overrides::default(), &LabelOptions::default())
            .unwrap();
        assert_eq!((off.descriptor.x, off.descriptor.y), (50.0, 50.0));

        let options = LabelOptions {
            adjust_small_areas: true,
            ..Default::default()
        };
        let on = place_label(&request(None, "a", &shape), &Overrides::default(), &options).unwrap();
        assert_eq!((on.descriptor.x, on.descriptor.y), (30.0, 30.0));
    }

    #[test]
    fn pipeline_is_repeatable() {
        let shape = ring(&[(0.0, 0.0), (31.0, 3.0), (27.0, 19.0), (4.0, 22.0), (-6.0, 9.0)]);
        let overrides = Overrides::default();
        let options = LabelOptions::default();
        let first = place_label(&request(Some("p"), "c", &shape), &overrides, &options).unwrap();
        let second = place_label(&request(Some("p"), "c", &shape), &overrides, &options).unwrap();
        assert_eq!(first.descriptor.x.to_bits(), second.descriptor.x.to_bits());
        assert_eq!(first.descriptor.y.to_bits(), second.descriptor.y.to_bits());
        assert_eq!(first, second);
    }

    #[test]
    fn convex_centroid_is_contained() {
        let polygons: [&[(f32, f32)]; 3] = [
            &[(0.0, 0.0), (4.0, 0.0), (2.0, 3.0)],
            &[(10.0, 0.0), (20.0, 5.0), (20.0, 15.0), (10.0, 20.0), (0.0, 15.0), (0.0, 5.0)],
            &[(0.0, 0.0), (100.0, 1.0), (101.0, 2.0), (1.0, 3.0)],
        ];
        for coords in polygons {
            let shape = ring(coords);
            let c = compute_centroid(&shape).unwrap();
            assert!(is_point_in_shape(c, &shape), "centroid {c:?} not inside {coords:?}");
        }
    }
}
