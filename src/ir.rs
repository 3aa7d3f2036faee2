use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Axis-aligned box in SVG user units, `(x, y)` being the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let mut iter = points.iter().filter(|p| p.is_finite());
        let first = iter.next()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in iter {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self {
            x: min_x,
            y: min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        })
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn max_x(&self) -> f32 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f32 {
        self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Polygon,
    Polyline,
    Path,
}

impl ShapeKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "polygon" => Some(Self::Polygon),
            "polyline" => Some(Self::Polyline),
            "path" => Some(Self::Path),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::Polygon => "polygon",
            Self::Polyline => "polyline",
            Self::Path => "path",
        }
    }
}

/// How far the vertex list can be trusted for area-based geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VertexQuality {
    /// Vertices are the literal corners of the outline.
    Exact,
    /// Vertices were sampled from curves or span several subpaths; only the
    /// bounding box is meaningful.
    Approximate,
    /// Coordinate data could not be read.
    Malformed,
}

/// Closed region outline. Closure is implicit: the last vertex connects back
/// to the first.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    kind: ShapeKind,
    points: Vec<Point>,
    quality: VertexQuality,
    bbox: Option<BoundingBox>,
}

impl Shape {
    pub fn new(kind: ShapeKind, points: Vec<Point>) -> Self {
        let quality = if points.iter().all(Point::is_finite) {
            VertexQuality::Exact
        } else {
            VertexQuality::Malformed
        };
        Self {
            kind,
            points,
            quality,
            bbox: None,
        }
    }

    pub fn polygon(points: Vec<Point>) -> Self {
        Self::new(ShapeKind::Polygon, points)
    }

    pub fn polyline(points: Vec<Point>) -> Self {
        Self::new(ShapeKind::Polyline, points)
    }

    /// Outline whose points are an approximation (flattened curves). Centroid
    /// math is skipped for it.
    pub fn approximate(kind: ShapeKind, points: Vec<Point>) -> Self {
        Self {
            kind,
            points,
            quality: VertexQuality::Approximate,
            bbox: None,
        }
    }

    /// A shape whose coordinates could not be parsed. Only a bounding box
    /// supplied by the caller can still place a label on it.
    pub fn malformed(kind: ShapeKind, bbox: Option<BoundingBox>) -> Self {
        Self {
            kind,
            points: Vec::new(),
            quality: VertexQuality::Malformed,
            bbox,
        }
    }

    /// Use a bounding box measured elsewhere instead of deriving one from
    /// the vertices.
    pub fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        self.bbox = Some(bbox);
        self
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn quality(&self) -> VertexQuality {
        self.quality
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Vertices usable for centroid and containment tests. Empty unless the
    /// outline is exact.
    pub fn vertices(&self) -> &[Point] {
        match self.quality {
            VertexQuality::Exact => &self.points,
            VertexQuality::Approximate | VertexQuality::Malformed => &[],
        }
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.bbox.or_else(|| BoundingBox::from_points(&self.points))
    }
}
