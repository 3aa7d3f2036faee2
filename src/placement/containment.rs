use crate::ir::{Point, Shape};

// Added to the vertical span of each edge so horizontal edges never divide
// by zero.
const RAY_DENOM_EPS: f32 = 1e-5;

/// Even-odd ray casting test of `point` against the shape's vertex ring.
///
/// Shapes without trusted vertices contain nothing.
pub fn is_point_in_shape(point: Point, shape: &Shape) -> bool {
    point_in_ring(point, shape.vertices())
}

pub(crate) fn point_in_ring(point: Point, ring: &[Point]) -> bool {
    if ring.len() < 3 || !point.is_finite() {
        return false;
    }
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (xi, yi) = (ring[i].x, ring[i].y);
        let (xj, yj) = (ring[j].x, ring[j].y);
        let crosses = (yi > point.y) != (yj > point.y)
            && point.x < (xj - xi) * (point.y - yi) / (yj - yi + RAY_DENOM_EPS) + xi;
        if crosses {
            inside = !inside;
        }
        j = i;
    }
    inside
}
