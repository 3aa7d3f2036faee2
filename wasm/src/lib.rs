use region_label_rs::ir::{BoundingBox, Point, Shape, ShapeKind};
use region_label_rs::{
    Config, LabelOptions, LabelRequest, Overrides, Theme, bundled_overrides, label_svg, place_label,
};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MapLabelOptions {
    parent: Option<String>,
    theme: Option<String>,
    font_size: Option<String>,
    text_color: Option<String>,
    adjust_small_areas: Option<bool>,
    /// Skip the bundled table when false.
    use_bundled_overrides: Option<bool>,
    overrides: Option<Overrides>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShapeLabelRequest {
    parent: Option<String>,
    region: String,
    text: Option<String>,
    #[serde(default)]
    points: Vec<Point>,
    /// Element kind; `polygon` when omitted.
    kind: Option<ShapeKind>,
    /// Box measured by the caller (`getBBox()`), used instead of the points'.
    bbox: Option<BoundingBox>,
    #[serde(default)]
    overrides: Overrides,
    #[serde(default)]
    label: Option<LabelOptions>,
}

fn js_error(error: impl ToString) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn build_config(options: &MapLabelOptions) -> Config {
    let mut config = Config::default();
    if options.theme.as_deref() == Some("blue") {
        config.theme = Theme::blue();
        config.render.background = config.theme.background.clone();
    }
    if let Some(size) = &options.font_size {
        config.label.font_size = size.clone();
    }
    if let Some(color) = &options.text_color {
        config.label.text_color = color.clone();
    }
    if let Some(adjust) = options.adjust_small_areas {
        config.label.adjust_small_areas = adjust;
    }
    config
}

fn build_overrides(options: &mut MapLabelOptions) -> Result<Overrides, String> {
    if let Some(overrides) = options.overrides.take() {
        return Ok(overrides);
    }
    if options.use_bundled_overrides == Some(false) {
        return Ok(Overrides::default());
    }
    bundled_overrides().map_err(|e| e.to_string())
}

fn label_map(svg: &str, options_json: Option<&str>) -> Result<String, String> {
    let mut options = match options_json {
        Some(raw) => serde_json::from_str::<MapLabelOptions>(raw).map_err(|e| e.to_string())?,
        None => MapLabelOptions::default(),
    };
    let config = build_config(&options);
    let overrides = build_overrides(&mut options)?;
    let (out, _) = label_svg(svg, options.parent.as_deref(), &overrides, &config, None);
    Ok(out)
}

fn place_shape_label(request_json: &str) -> Result<String, String> {
    let request: ShapeLabelRequest = serde_json::from_str(request_json).map_err(|e| e.to_string())?;
    let mut shape = Shape::new(request.kind.unwrap_or(ShapeKind::Polygon), request.points);
    if let Some(bbox) = request.bbox {
        shape = shape.with_bbox(bbox);
    }
    let options = request.label.unwrap_or_default();
    let label_request = LabelRequest {
        parent: request.parent.as_deref(),
        region: &request.region,
        text: request.text.as_deref().unwrap_or(&request.region),
        shape: &shape,
    };
    let placed = place_label(&label_request, &request.overrides, &options);
    serde_json::to_string(&placed).map_err(|e| e.to_string())
}

/// Returns `svg` with a `<text>` label after every region element.
#[wasm_bindgen]
pub fn label_map_svg(svg: &str, options_json: Option<String>) -> Result<String, JsValue> {
    label_map(svg, options_json.as_deref()).map_err(js_error)
}

/// Places one label from a JSON request and returns the placement as JSON,
/// or `null` when the outline has no bounding box.
#[wasm_bindgen]
pub fn place_label_json(request_json: &str) -> Result<String, JsValue> {
    place_shape_label(request_json).map_err(js_error)
}
