use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ir::Point;

/// `parent region -> child region -> point`.
pub type OverrideTable = BTreeMap<String, BTreeMap<String, Point>>;

/// Hand-tuned placement corrections for one map dataset.
///
/// Loaded once and shared read-only between placements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Overrides {
    /// Absolute anchor replacements.
    pub overrides: OverrideTable,
    /// Deltas added to the automatically resolved anchor.
    pub relative_overrides: OverrideTable,
    /// Per-region pixel nudges for maps without a parent region (the
    /// nationwide view), folded into the caller offsets.
    pub offsets: BTreeMap<String, Point>,
}

impl Overrides {
    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty() && self.relative_overrides.is_empty() && self.offsets.is_empty()
    }

    /// Absolute entries win over relative ones for the same region.
    pub fn resolve(&self, parent: &str, child: &str, base: Point) -> Option<Point> {
        lookup(&self.overrides, parent, child).or_else(|| {
            lookup(&self.relative_overrides, parent, child)
                .map(|delta| apply_offset(base, delta.x, delta.y))
        })
    }

    pub fn offset_for(&self, region: &str) -> Option<Point> {
        self.offsets.get(region).copied()
    }
}

/// Returns the table's point for `(parent_id, child_id)` or `base_anchor`
/// when either key is missing. Keys match exactly.
pub fn apply_override(
    parent_id: &str,
    child_id: &str,
    base_anchor: Point,
    table: &OverrideTable,
) -> Point {
    lookup(table, parent_id, child_id).unwrap_or(base_anchor)
}

pub fn apply_offset(point: Point, x_offset: f32, y_offset: f32) -> Point {
    Point::new(point.x + x_offset, point.y + y_offset)
}

fn lookup(table: &OverrideTable, parent: &str, child: &str) -> Option<Point> {
    table.get(parent)?.get(child).copied()
}
