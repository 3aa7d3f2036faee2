use crate::config::RenderConfig;
use crate::interaction::{RegionRegistry, RegionState};
use crate::parser::{ParsedMap, parse_attributes};
use crate::placement::{LabelDescriptor, RegionLabel};
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

/// `<text>` node for one label, centred on its anchor.
pub fn label_text_svg(label: &LabelDescriptor, theme: &Theme, state: RegionState) -> String {
    let fill = match state {
        RegionState::Selected => theme.selected_text_color.as_deref(),
        RegionState::Hovered => theme.highlight_text_color.as_deref(),
        RegionState::Idle => None,
    }
    .unwrap_or(label.color.as_str());

    format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"{}\" dominant-baseline=\"{}\" fill=\"{}\" font-family=\"{}\" font-size=\"{}\" font-weight=\"{}\" pointer-events=\"none\" filter=\"{}\">{}</text>",
        label.x,
        label.y,
        label.anchor.svg_text_anchor(),
        label.anchor.svg_dominant_baseline(),
        escape_xml(fill),
        escape_xml(&theme.font_family),
        escape_xml(&label.font_size),
        escape_xml(&label.font_weight),
        escape_xml(&theme.label_halo),
        escape_xml(&label.text)
    )
}

/// Writes each label right after its region element, matching how the
/// browser view appended text nodes to the shape's parent.
///
/// `labels` pairs with `map.regions` by position, as `place_map_labels`
/// returns them, so elements sharing an id each keep their own label.
///
/// With a registry, region elements are also painted for their interaction
/// state.
pub fn render_labeled_svg(
    map: &ParsedMap,
    labels: &[RegionLabel],
    registry: Option<&RegionRegistry<usize>>,
    theme: &Theme,
) -> String {
    let mut out = String::with_capacity(map.source.len() + labels.len() * 256);
    let mut cursor = 0;
    for (idx, region) in map.regions.iter().enumerate() {
        if region.open_tag.start < cursor {
            continue;
        }
        let state = registry.map(|r| r.state(&region.id)).unwrap_or_default();
        out.push_str(&map.source[cursor..region.open_tag.start]);

        let open_tag = &map.source[region.open_tag.clone()];
        match registry {
            Some(_) => out.push_str(&paint_open_tag(open_tag, state, theme)),
            None => out.push_str(open_tag),
        }
        out.push_str(&map.source[region.open_tag.end..region.element_end]);

        let placed = labels
            .get(idx)
            .filter(|l| l.region_id == region.id)
            .and_then(|l| l.placed.as_ref());
        if let Some(placed) = placed {
            out.push_str(&label_text_svg(&placed.descriptor, theme, state));
        }
        cursor = region.element_end;
    }
    out.push_str(&map.source[cursor..]);
    out
}

fn region_paint(state: RegionState, theme: &Theme) -> (String, String, f32) {
    match state {
        RegionState::Idle => (
            theme.region_fill.clone(),
            theme.region_stroke.clone(),
            theme.region_stroke_width,
        ),
        RegionState::Hovered => (
            theme.highlight_fill.clone(),
            theme.highlight_stroke.clone(),
            theme.highlight_stroke_width,
        ),
        RegionState::Selected => (
            theme.selected_fill.clone(),
            theme.selected_stroke.clone(),
            theme.selected_stroke_width,
        ),
    }
}

// Rebuilds the opening tag with fill/stroke merged into its inline style.
fn paint_open_tag(open_tag: &str, state: RegionState, theme: &Theme) -> String {
    let self_closing = open_tag.ends_with("/>");
    let name_end = open_tag
        .find(|c: char| c.is_whitespace() || c == '/' || c == '>')
        .unwrap_or(open_tag.len());
    let tag_name = &open_tag[..name_end];
    let attrs = parse_attributes(&open_tag[name_end..]);

    let (fill, stroke, stroke_width) = region_paint(state, theme);
    let mut style: Vec<String> = attrs
        .iter()
        .find(|(k, _)| *k == "style")
        .map(|(_, v)| {
            v.split(';')
                .map(str::trim)
                .filter(|decl| {
                    let prop = decl.split(':').next().unwrap_or("").trim();
                    !decl.is_empty() && !matches!(prop, "fill" | "stroke" | "stroke-width")
                })
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    style.push(format!("fill:{fill}"));
    style.push(format!("stroke:{stroke}"));
    style.push(format!("stroke-width:{stroke_width}"));

    let mut tag = String::from(tag_name);
    for (name, value) in attrs.iter().filter(|(k, _)| *k != "style") {
        tag.push_str(&format!(" {name}=\"{}\"", value.replace('"', "&quot;")));
    }
    tag.push_str(&format!(" style=\"{}\"", escape_xml(&style.join(";"))));
    tag.push_str(if self_closing { "/>" } else { ">" });
    tag
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .ok_or_else(|| anyhow::anyhow!("Invalid render size {}x{}", render_cfg.width, render_cfg.height))?;

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;
    if let Some(color) = parse_hex_color(&render_cfg.background) {
        pixmap.fill(color);
    }

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(_svg: &str, _output: &Path, _render_cfg: &RenderConfig) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

#[cfg(feature = "png")]
fn parse_hex_color(value: &str) -> Option<resvg::tiny_skia::Color> {
    let hex = value.strip_prefix('#')?;
    let (r, g, b) = match hex.len() {
        6 => (
            u8::from_str_radix(&hex[0..2], 16).ok()?,
            u8::from_str_radix(&hex[2..4], 16).ok()?,
            u8::from_str_radix(&hex[4..6], 16).ok()?,
        ),
        3 => {
            let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
            (digit(0)?, digit(1)?, digit(2)?)
        }
        _ => return None,
    };
    Some(resvg::tiny_skia::Color::from_rgba8(r, g, b, 255))
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
