use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    /// CSS filter painted under label text so it stays legible over fills.
    pub label_halo: String,
    pub region_fill: String,
    pub region_stroke: String,
    pub region_stroke_width: f32,
    pub highlight_fill: String,
    pub highlight_stroke: String,
    pub highlight_stroke_width: f32,
    pub highlight_text_color: Option<String>,
    pub selected_fill: String,
    pub selected_stroke: String,
    pub selected_stroke_width: f32,
    pub selected_text_color: Option<String>,
    pub background: String,
}

impl Theme {
    /// Grey regions, yellow for hovered and selected ones.
    pub fn classic() -> Self {
        Self {
            font_family: "Pretendard, \"Noto Sans KR\", sans-serif".to_string(),
            label_halo: "drop-shadow(0px 1px 1px rgba(255,255,255,0.8))".to_string(),
            region_fill: "#e0e0e0".to_string(),
            region_stroke: "#ffffff".to_string(),
            region_stroke_width: 2.0,
            highlight_fill: "#FFE066".to_string(),
            highlight_stroke: "#ffffff".to_string(),
            highlight_stroke_width: 2.0,
            highlight_text_color: None,
            selected_fill: "#FFE066".to_string(),
            selected_stroke: "#ffffff".to_string(),
            selected_stroke_width: 2.0,
            selected_text_color: None,
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn blue() -> Self {
        Self {
            font_family: "Pretendard, \"Noto Sans KR\", sans-serif".to_string(),
            label_halo: "drop-shadow(0px 1px 1px rgba(255,255,255,0.8))".to_string(),
            region_fill: "#f3f4f6".to_string(),
            region_stroke: "#ffffff".to_string(),
            region_stroke_width: 1.0,
            highlight_fill: "#dbeafe".to_string(),
            highlight_stroke: "#3b82f6".to_string(),
            highlight_stroke_width: 1.5,
            highlight_text_color: Some("#1e40af".to_string()),
            selected_fill: "#93c5fd".to_string(),
            selected_stroke: "#1d4ed8".to_string(),
            selected_stroke_width: 2.0,
            selected_text_color: Some("#1e3a8a".to_string()),
            background: "#FFFFFF".to_string(),
        }
    }
}
