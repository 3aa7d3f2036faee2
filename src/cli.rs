use crate::config::{bundled_overrides, load_config, load_override_file};
use crate::error::LabelError;
use crate::interaction::{InputEvent, RegionRegistry};
use crate::label_dump::write_label_dump;
use crate::parser::{SvgRegion, parse_svg_regions};
use crate::placement::{Overrides, place_map_labels};
use crate::render::{render_labeled_svg, write_output_png, write_output_svg};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rlabel", version, about = "Place region labels on SVG maps")]
pub struct Args {
    /// Input SVG map or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png/json). Defaults to stdout for SVG and JSON.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Parent region of the map (e.g. 서울특별시). Omit for the nationwide map.
    #[arg(short = 'r', long = "region")]
    pub region: Option<String>,

    /// Config JSON file (label options, theme, per-region font sizes)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Override table (.json or .json5). The bundled table is used when omitted.
    #[arg(long = "overrides", conflicts_with = "no_overrides")]
    pub overrides: Option<PathBuf>,

    /// Disable hand-tuned overrides entirely
    #[arg(long = "no-overrides")]
    pub no_overrides: bool,

    /// Paint region fills (idle/hover/selected) in the output
    #[arg(long = "paint")]
    pub paint: bool,

    /// Mark a region as selected (repeatable, implies --paint)
    #[arg(long = "select")]
    pub select: Vec<String>,

    /// Mark a region as hovered (implies --paint)
    #[arg(long = "hover")]
    pub hover: Option<String>,

    /// Width
    #[arg(short = 'w', long = "width", default_value_t = 1200.0)]
    pub width: f32,

    /// Height
    #[arg(short = 'H', long = "height", default_value_t = 800.0)]
    pub height: f32,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
    Json,
}

pub fn run() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut config = load_config(args.config.as_deref())?;
    config.render.width = args.width;
    config.render.height = args.height;
    let overrides = resolve_overrides(&args)?;

    let input = read_input(args.input.as_deref())?;
    let map = parse_svg_regions(&input);
    if map.regions.is_empty() {
        return Err(LabelError::NoRegions.into());
    }
    if map.skipped > 0 {
        debug!(skipped = map.skipped, "ignored region elements without an id");
    }

    let parent = args.region.as_deref();
    let labels = place_map_labels(&map, parent, &overrides, &config);

    let render = |registry: Option<RegionRegistry<usize>>| {
        render_labeled_svg(&map, &labels, registry.as_ref(), &config.theme)
    };
    match args.output_format {
        OutputFormat::Json => write_label_dump(args.output.as_deref(), &labels, parent),
        OutputFormat::Svg => {
            let svg = render(build_registry(&args, &map.regions));
            write_output_svg(&svg, args.output.as_deref())
        }
        OutputFormat::Png => {
            let output = args.output.as_deref().ok_or(LabelError::OutputRequired("png"))?;
            let svg = render(build_registry(&args, &map.regions));
            write_output_png(&svg, output, &config.render)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn resolve_overrides(args: &Args) -> Result<Overrides> {
    if args.no_overrides {
        return Ok(Overrides::default());
    }
    match args.overrides.as_deref() {
        Some(path) => load_override_file(path),
        None => bundled_overrides(),
    }
}

fn build_registry(args: &Args, regions: &[SvgRegion]) -> Option<RegionRegistry<usize>> {
    if !args.paint && args.select.is_empty() && args.hover.is_none() {
        return None;
    }
    let mut registry = RegionRegistry::new();
    for (idx, region) in regions.iter().enumerate() {
        registry.insert(region.id.clone(), idx);
    }
    for id in &args.select {
        if registry.dispatch(id, InputEvent::Click).is_none() {
            warn!(region = %id, "selected region not found in map");
        }
    }
    if let Some(id) = args.hover.as_deref()
        && registry.dispatch(id, InputEvent::Enter).is_none()
    {
        warn!(region = %id, "hovered region not found in map");
    }
    Some(registry)
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return Ok(std::fs::read_to_string(path)?);
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}
