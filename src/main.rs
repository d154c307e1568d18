use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};
use multiselect_sheet::common::config::Config;
use multiselect_sheet::common::log::init_logging;
use multiselect_sheet::layout_engine::{
    Direction, EstimatedTextMetrics, GeometryEngine, GeometryWarning, SheetFrames, SizeClass,
};
use multiselect_sheet::model::description::SheetDescription;
use multiselect_sheet::sys::geometry::{Point, Rect};
use serde::Serialize;
use tracing::{debug, info};

/// Computes the frames of a sheet described in TOML and prints them.
#[derive(Parser, Debug)]
#[command(name = "sheet-layout", version, about)]
struct Cli {
    /// Sheet description (TOML with a `[[sections]]` list).
    #[arg(long)]
    sheet: PathBuf,

    /// Configuration file. Defaults to the user config when present.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 375.0)]
    width: f64,

    #[arg(long, default_value_t = 667.0)]
    height: f64,

    /// Treat the container as regular (tablet) sized.
    #[arg(long, default_value_t = false)]
    regular: bool,

    /// Anchor point as `X,Y`. Requires `--regular`.
    #[arg(long, value_parser = parse_point)]
    anchor: Option<Point>,

    #[arg(long, default_value_t = Direction::Up)]
    direction: Direction,

    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
    Json,
    Ron,
}

#[derive(Serialize)]
struct Report {
    frames: SheetFrames,
    warnings: Vec<GeometryWarning>,
}

fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s.split_once(',').ok_or_else(|| format!("expected X,Y, got {s:?}"))?;
    let parse = |v: &str| v.trim().parse::<f64>().map_err(|e| format!("{v:?}: {e}"));
    Ok(Point::new(parse(x)?, parse(y)?))
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::read(path),
        None => match Config::default_path().filter(|p| p.exists()) {
            Some(path) => Config::read(&path),
            None => Ok(Config::default()),
        },
    }
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    debug!(?cli, "starting");

    let config = load_config(cli.config.as_ref())?;
    let contents = std::fs::read_to_string(&cli.sheet)
        .with_context(|| format!("reading sheet {}", cli.sheet.display()))?;
    let sections = SheetDescription::parse(&contents)
        .and_then(|desc| desc.build_sections())
        .with_context(|| format!("building sheet {}", cli.sheet.display()))?;
    if sections.is_empty() {
        bail!("{} has no sections", cli.sheet.display());
    }

    let text = EstimatedTextMetrics::new(config.text.clone());
    let engine = GeometryEngine::new(&config.metrics, &text);
    let container = Rect::from_xywh(0.0, 0.0, cli.width, cli.height);
    let size_class = if cli.regular { SizeClass::Regular } else { SizeClass::Compact };

    let report = match cli.anchor {
        Some(point) if size_class == SizeClass::Regular => {
            let layout = engine.anchored(&sections, container, point, cli.direction);
            Report { frames: layout.frames, warnings: layout.warnings }
        }
        anchor => {
            if anchor.is_some() {
                info!("anchoring needs --regular, laying out fitted");
            }
            Report {
                frames: engine.fitted(&sections, container, size_class),
                warnings: Vec::new(),
            }
        }
    };

    let output = match cli.format {
        Format::Json => serde_json::to_string_pretty(&report)?,
        Format::Ron => ron::ser::to_string_pretty(&report, ron::ser::PrettyConfig::default())?,
    };
    println!("{output}");
    Ok(())
}

