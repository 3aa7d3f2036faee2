use serde::{Deserialize, Serialize};

use crate::config::LabelOptions;
use crate::ir::Point;

/// Text alignment relative to the anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    /// Centred on both axes (`text-anchor="middle"`,
    /// `dominant-baseline="middle"` in SVG).
    #[default]
    Center,
}

impl TextAnchor {
    pub fn svg_text_anchor(&self) -> &'static str {
        match self {
            Self::Center => "middle",
        }
    }

    pub fn svg_dominant_baseline(&self) -> &'static str {
        match self {
            Self::Center => "middle",
        }
    }
}

/// Everything a renderer needs to draw one region label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelDescriptor {
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub font_size: String,
    pub font_weight: String,
    pub color: String,
    pub anchor: TextAnchor,
}

pub fn build_label_descriptor(anchor: Point, text: &str, options: &LabelOptions) -> LabelDescriptor {
    LabelDescriptor {
        x: anchor.x,
        y: anchor.y,
        text: text.to_string(),
        font_size: options.font_size.clone(),
        font_weight: options.font_weight.clone(),
        color: options.text_color.clone(),
        anchor: TextAnchor::Center,
    }
}
