// Area-weighted centroid of a closed vertex ring (shoelace formula).

use crate::ir::{Point, Shape};

/// Signed-area centroid of `shape`.
///
/// Returns `None` when fewer than three trusted vertices are available or the
/// signed area is exactly zero (collinear ring). Callers treat `None` as
/// "use the bounding-box fallback".
pub fn compute_centroid(shape: &Shape) -> Option<Point> {
    ring_centroid(shape.vertices())
}

pub(crate) fn ring_centroid(points: &[Point]) -> Option<Point> {
    if points.len() < 3 {
        return None;
    }

    // Accumulate in f64; map outlines run to hundreds of vertices in the
    // thousands-of-units range.
    let mut area = 0.0_f64;
    let mut cx = 0.0_f64;
    let mut cy = 0.0_f64;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (x0, y0) = (points[j].x as f64, points[j].y as f64);
        let (x1, y1) = (points[i].x as f64, points[i].y as f64);
        let f = x0 * y1 - x1 * y0;
        area += f;
        cx += (x0 + x1) * f;
        cy += (y0 + y1) * f;
        j = i;
    }
    area /= 2.0;
    if area == 0.0 || !area.is_finite() {
        return None;
    }

    let centroid = Point::new((cx / (6.0 * area)) as f32, (cy / (6.0 * area)) as f32);
    centroid.is_finite().then_some(centroid)
}
