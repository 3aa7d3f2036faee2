use crate::ir::{BoundingBox, ShapeKind};
use crate::placement::{AnchorSource, RegionLabel, TextAnchor};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelDump {
    pub parent: Option<String>,
    pub labels: Vec<LabelEntryDump>,
    /// Regions left without a label because they have no geometry.
    pub unlabelable: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelEntryDump {
    pub id: String,
    pub kind: ShapeKind,
    pub source: AnchorSource,
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub font_size: String,
    pub font_weight: String,
    pub color: String,
    pub anchor: TextAnchor,
    pub bbox: Option<BoundingBox>,
}

impl LabelDump {
    pub fn from_labels(labels: &[RegionLabel], parent: Option<&str>) -> Self {
        let mut entries = Vec::new();
        let mut unlabelable = Vec::new();
        for label in labels {
            let Some(placed) = &label.placed else {
                unlabelable.push(label.region_id.clone());
                continue;
            };
            let d = &placed.descriptor;
            entries.push(LabelEntryDump {
                id: label.region_id.clone(),
                kind: label.kind,
                source: placed.source,
                x: d.x,
                y: d.y,
                text: d.text.clone(),
                font_size: d.font_size.clone(),
                font_weight: d.font_weight.clone(),
                color: d.color.clone(),
                anchor: d.anchor,
                bbox: label.bbox,
            });
        }

        LabelDump {
            parent: parent.map(str::to_string),
            labels: entries,
            unlabelable,
        }
    }
}

/// Pretty JSON to `path`, or stdout when no path is given.
pub fn write_label_dump(
    path: Option<&Path>,
    labels: &[RegionLabel],
    parent: Option<&str>,
) -> anyhow::Result<()> {
    let dump = LabelDump::from_labels(labels, parent);
    match path {
        Some(path) => {
            let writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(writer, &dump)?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, &dump)?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}
