use crate::error::LabelError;
use crate::placement::Overrides;
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

const BUNDLED_OVERRIDES: &str = include_str!("../assets/overrides.json");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LabelOptions {
    /// Clearance kept from the bbox edge when nudging labels in small shapes.
    pub min_padding: f32,
    /// Bbox side length below which a shape counts as small.
    pub min_area_size: f32,
    pub font_size: String,
    pub font_weight: String,
    pub text_color: String,
    pub x_offset: f32,
    pub y_offset: f32,
    pub adjust_small_areas: bool,
}

impl Default for LabelOptions {
    fn default() -> Self {
        Self {
            min_padding: 20.0,
            min_area_size: 150.0,
            font_size: "14px".to_string(),
            font_weight: "700".to_string(),
            text_color: "#444444".to_string(),
            x_offset: 0.0,
            y_offset: 0.0,
            adjust_small_areas: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            background: "#FFFFFF".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub label: LabelOptions,
    pub render: RenderConfig,
    /// Font size used for every label of a given parent map.
    pub region_font_sizes: BTreeMap<String, String>,
    /// Display text by region id; the id itself is shown otherwise.
    pub region_names: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::classic();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            label: LabelOptions::default(),
            render,
            region_font_sizes: BTreeMap::new(),
            region_names: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    label_halo: Option<String>,
    region_fill: Option<String>,
    region_stroke: Option<String>,
    region_stroke_width: Option<f32>,
    highlight_fill: Option<String>,
    highlight_stroke: Option<String>,
    highlight_stroke_width: Option<f32>,
    highlight_text_color: Option<String>,
    selected_fill: Option<String>,
    selected_stroke: Option<String>,
    selected_stroke_width: Option<f32>,
    selected_text_color: Option<String>,
    background: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LabelOptionsFile {
    min_padding: Option<f32>,
    min_area_size: Option<f32>,
    font_size: Option<FontSizeValue>,
    font_weight: Option<FontWeightValue>,
    text_color: Option<String>,
    x_offset: Option<f32>,
    y_offset: Option<f32>,
    adjust_small_areas: Option<bool>,
}

// Authored files write sizes both as `14` and `"14px"`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FontSizeValue {
    Number(f32),
    Text(String),
}

impl FontSizeValue {
    fn into_css(self) -> String {
        match self {
            Self::Number(v) => format!("{v}px"),
            Self::Text(v) => v,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FontWeightValue {
    Number(u32),
    Text(String),
}

impl FontWeightValue {
    fn into_css(self) -> String {
        match self {
            Self::Number(v) => v.to_string(),
            Self::Text(v) => v,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    label: Option<LabelOptionsFile>,
    region_font_sizes: Option<BTreeMap<String, FontSizeValue>>,
    region_names: Option<BTreeMap<String, String>>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = serde_json::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        if theme_name == "blue" {
            config.theme = Theme::blue();
        } else if theme_name == "classic" || theme_name == "default" {
            config.theme = Theme::classic();
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.label_halo {
            config.theme.label_halo = v;
        }
        if let Some(v) = vars.region_fill {
            config.theme.region_fill = v;
        }
        if let Some(v) = vars.region_stroke {
            config.theme.region_stroke = v;
        }
        if let Some(v) = vars.region_stroke_width {
            config.theme.region_stroke_width = v;
        }
        if let Some(v) = vars.highlight_fill {
            config.theme.highlight_fill = v;
        }
        if let Some(v) = vars.highlight_stroke {
            config.theme.highlight_stroke = v;
        }
        if let Some(v) = vars.highlight_stroke_width {
            config.theme.highlight_stroke_width = v;
        }
        if let Some(v) = vars.highlight_text_color {
            config.theme.highlight_text_color = Some(v);
        }
        if let Some(v) = vars.selected_fill {
            config.theme.selected_fill = v;
        }
        if let Some(v) = vars.selected_stroke {
            config.theme.selected_stroke = v;
        }
        if let Some(v) = vars.selected_stroke_width {
            config.theme.selected_stroke_width = v;
        }
        if let Some(v) = vars.selected_text_color {
            config.theme.selected_text_color = Some(v);
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
    }
    config.render.background = config.theme.background.clone();

    if let Some(label) = parsed.label {
        if let Some(v) = label.min_padding {
            config.label.min_padding = v;
        }
        if let Some(v) = label.min_area_size {
            config.label.min_area_size = v;
        }
        if let Some(v) = label.font_size {
            config.label.font_size = v.into_css();
        }
        if let Some(v) = label.font_weight {
            config.label.font_weight = v.into_css();
        }
        if let Some(v) = label.text_color {
            config.label.text_color = v;
        }
        if let Some(v) = label.x_offset {
            config.label.x_offset = v;
        }
        if let Some(v) = label.y_offset {
            config.label.y_offset = v;
        }
        if let Some(v) = label.adjust_small_areas {
            config.label.adjust_small_areas = v;
        }
    }

    if let Some(sizes) = parsed.region_font_sizes {
        config.region_font_sizes = sizes.into_iter().map(|(k, v)| (k, v.into_css())).collect();
    }
    if let Some(names) = parsed.region_names {
        config.region_names = names;
    }

    Ok(config)
}

/// Reads an override file. `.json5` files are parsed as JSON5, everything
/// else as plain JSON.
pub fn load_override_file(path: &Path) -> anyhow::Result<Overrides> {
    let contents = std::fs::read_to_string(path)?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("json5") => Ok(json5::from_str(&contents)?),
        Some("json") | None => Ok(serde_json::from_str(&contents)?),
        Some(other) => Err(LabelError::UnsupportedOverrideFormat(other.to_string()).into()),
    }
}

/// The hand-tuned table shipped with the Korean administrative maps.
pub fn bundled_overrides() -> anyhow::Result<Overrides> {
    Ok(serde_json::from_str(BUNDLED_OVERRIDES)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Point;

    #[test]
    fn empty_file_keeps_defaults() {
        let config = parse_config("{}").unwrap();
        assert_eq!(config.label, LabelOptions::default());
        assert_eq!(config.theme.region_fill, "#e0e0e0");
    }

    #[test]
    fn label_block_merges_over_defaults() {
        let config = parse_config(
            r#"{
                "theme": "blue",
                "label": { "fontSize": 12, "fontWeight": 500, "yOffset": 4, "adjustSmallAreas": true },
                "regionFontSizes": { "인천광역시": "7px" },
                "regionNames": { "seoul": "서울" }
            }"#,
        )
        .unwrap();
        assert_eq!(config.label.font_size, "12px");
        assert_eq!(config.label.font_weight, "500");
        assert_eq!(config.label.y_offset, 4.0);
        assert!(config.label.adjust_small_areas);
        assert_eq!(config.label.min_area_size, 150.0);
        assert_eq!(config.region_font_sizes["인천광역시"], "7px");
        assert_eq!(config.region_names["seoul"], "서울");
        assert_eq!(config.theme.selected_fill, Theme::blue().selected_fill);
    }

    #[test]
    fn theme_variables_override_named_theme() {
        let config = parse_config(r##"{ "themeVariables": { "regionFill": "#ccc", "background": "#000" } }"##)
            .unwrap();
        assert_eq!(config.theme.region_fill, "#ccc");
        assert_eq!(config.render.background, "#000");
    }

    #[test]
    fn theme_variables_cover_state_paint() {
        let config = parse_config(
            r##"{ "themeVariables": {
                "highlightStrokeWidth": 3,
                "highlightTextColor": "#111111",
                "selectedStrokeWidth": 4.5
            } }"##,
        )
        .unwrap();
        assert_eq!(config.theme.highlight_stroke_width, 3.0);
        assert_eq!(config.theme.highlight_text_color.as_deref(), Some("#111111"));
        assert_eq!(config.theme.selected_stroke_width, 4.5);
    }

    #[test]
    fn sample_config_asset_parses() {
        let config = parse_config(include_str!("../assets/config.json")).unwrap();
        assert_eq!(config.label, LabelOptions::default());
        assert_eq!(config.region_font_sizes["인천광역시"], "7px");
    }

    #[test]
    fn bundled_overrides_parse() {
        let overrides = bundled_overrides().unwrap();
        let gangnam = overrides.relative_overrides["서울특별시"]["강남구"];
        assert_eq!(gangnam, Point::new(-20.0, 0.0));
        assert_eq!(overrides.offsets["경기도"], Point::new(120.0, 60.0));
        assert!(overrides.overrides.is_empty());
    }

    #[test]
    fn override_json5_accepts_comments() {
        let parsed: Overrides = json5::from_str(
            r#"{
                // absolute anchor for a sliver district
                overrides: { "부산광역시": { "서구": { x: 10, y: 20 } } },
            }"#,
        )
        .unwrap();
        assert_eq!(parsed.overrides["부산광역시"]["서구"], Point::new(10.0, 20.0));
    }
}
