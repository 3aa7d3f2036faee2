use serde::{Deserialize, Serialize};
use tracing::debug;

use super::centroid::compute_centroid;
use super::containment::is_point_in_shape;
use crate::config::LabelOptions;
use crate::ir::{BoundingBox, Point, Shape, VertexQuality};

// Fraction of the shorter bbox side that caps the clearance in small areas.
const SMALL_AREA_PADDING_RATIO: f32 = 0.3;

/// Which stage produced a label anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnchorSource {
    Centroid,
    BoundingBoxCenter,
    Override,
}

/// Centroid if it lies inside the shape, bounding-box centre otherwise.
///
/// Only `None` when the shape has no bounding box at all, which is the shape
/// provider's failure to report.
pub fn resolve_base_anchor(shape: &Shape) -> Option<Point> {
    resolve_base_anchor_with_source(shape).map(|(point, _)| point)
}

pub fn resolve_base_anchor_with_source(shape: &Shape) -> Option<(Point, AnchorSource)> {
    if let Some(centroid) = compute_centroid(shape) {
        if is_point_in_shape(centroid, shape) {
            return Some((centroid, AnchorSource::Centroid));
        }
        debug!(x = centroid.x, y = centroid.y, "centroid falls outside its shape");
    } else if shape.quality() == VertexQuality::Exact {
        debug!(points = shape.points().len(), "degenerate shape, no centroid");
    }

    let bbox = shape.bounding_box()?;
    Some((bbox.center(), AnchorSource::BoundingBoxCenter))
}

/// Nudges an anchor away from the nearer edges of a small bounding box and
/// keeps it inside the box shrunk by the clearance.
///
/// Boxes whose sides both reach `min_area_size` are returned untouched.
pub fn adjust_for_small_area(anchor: Point, bbox: &BoundingBox, options: &LabelOptions) -> Point {
    if bbox.width >= options.min_area_size && bbox.height >= options.min_area_size {
        return anchor;
    }

    let padding = options
        .min_padding
        .min(bbox.width.min(bbox.height) * SMALL_AREA_PADDING_RATIO);

    let mut x = anchor.x;
    let mut y = anchor.y;

    if anchor.x - bbox.x < bbox.max_x() - anchor.x {
        x += padding;
    } else {
        x -= padding;
    }
    if anchor.y - bbox.y < bbox.max_y() - anchor.y {
        y += padding;
    } else {
        y -= padding;
    }

    Point::new(
        clamp_axis(x, bbox.x + padding, bbox.max_x() - padding),
        clamp_axis(y, bbox.y + padding, bbox.max_y() - padding),
    )
}

// `max(lo, min(hi, v))`; settles on `lo` when the range is inverted instead
// of panicking like `f32::clamp`.
fn clamp_axis(v: f32, lo: f32, hi: f32) -> f32 {
    lo.max(hi.min(v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::ShapeKind;

    fn ring(coords: &[(f32, f32)]) -> Shape {
        Shape::polygon(coords.iter().map(|&(x, y)| Point::new(x, y)).collect())
    }

    fn c_shape() -> Shape {
        ring(&[
            (0.0, 0.0),
            (30.0, 0.0),
            (30.0, 10.0),
            (10.0, 10.0),
            (10.0, 20.0),
            (30.0, 20.0),
            (30.0, 30.0),
            (0.0, 30.0),
        ])
    }

    #[test]
    fn convex_shape_uses_centroid() {
        let shape = ring(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        assert_eq!(
            resolve_base_anchor_with_source(&shape),
            Some((Point::new(5.0, 5.0), AnchorSource::Centroid))
        );
    }

    #[test]
    fn two_point_shape_uses_bbox_center() {
        let shape = ring(&[(0.0, 0.0), (10.0, 4.0)]);
        assert_eq!(resolve_base_anchor(&shape), Some(Point::new(5.0, 2.0)));
    }

    #[test]
    fn c_shape_centroid_is_rejected() {
        let shape = c_shape();
        let centroid = compute_centroid(&shape).unwrap();
        assert!(!is_point_in_shape(centroid, &shape));
        assert_eq!(
            resolve_base_anchor_with_source(&shape),
            Some((Point::new(15.0, 15.0), AnchorSource::BoundingBoxCenter))
        );
    }

    #[test]
    fn approximate_path_goes_straight_to_bbox() {
        let shape = Shape::approximate(
            ShapeKind::Path,
            vec![Point::new(0.0, 0.0), Point::new(8.0, 0.0), Point::new(8.0, 2.0), Point::new(0.0, 2.0)],
        );
        assert_eq!(
            resolve_base_anchor_with_source(&shape),
            Some((Point::new(4.0, 1.0), AnchorSource::BoundingBoxCenter))
        );
    }

    #[test]
    fn malformed_shape_without_bbox_has_no_anchor() {
        assert_eq!(resolve_base_anchor(&Shape::malformed(ShapeKind::Polygon, None)), None);
    }

    #[test]
    fn large_box_is_never_adjusted() {
        let options = LabelOptions::default();
        let bbox = BoundingBox { x: 0.0, y: 0.0, width: 150.0, height: 400.0 };
        let anchor = Point::new(3.0, 397.0);
        assert_eq!(adjust_for_small_area(anchor, &bbox, &options), anchor);
    }

    #[test]
    fn small_box_moves_away_from_near_edges() {
        let options = LabelOptions::default();
        let bbox = BoundingBox { x: 0.0, y: 0.0, width: 100.0, height: 50.0 };
        // padding = min(20, 50 * 0.3) = 15
        let adjusted = adjust_for_small_area(Point::new(10.0, 40.0), &bbox, &options);
        assert_eq!(adjusted, Point::new(25.0, 25.0));
    }

    #[test]
    fn small_box_adjustment_stays_inside_padded_box() {
        let options = LabelOptions::default();
        let bbox = BoundingBox { x: 10.0, y: 10.0, width: 40.0, height: 40.0 };
        for &(x, y) in &[(10.0, 10.0), (50.0, 50.0), (30.0, 30.0), (12.0, 48.0)] {
            let p = adjust_for_small_area(Point::new(x, y), &bbox, &options);
            // padding = 12
            assert!(p.x >= 22.0 && p.x <= 38.0, "x out of range: {p:?}");
            assert!(p.y >= 22.0 && p.y <= 38.0, "y out of range: {p:?}");
        }
    }

    #[test]
    fn centered_anchor_moves_toward_low_side() {
        let options = LabelOptions::default();
        let bbox = BoundingBox { x: 0.0, y: 0.0, width: 100.0, height: 100.0 };
        let adjusted = adjust_for_small_area(bbox.center(), &bbox, &options);
        assert_eq!(adjusted, Point::new(30.0, 30.0));
    }
}
