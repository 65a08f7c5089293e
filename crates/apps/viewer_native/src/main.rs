mod config;
mod error;
mod source;
mod surfaces;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;

use catalog::{CountryCode, CountryCodeResolver};
use clap::{Args, Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use values::ValueStore;
use views::{DualViewCoordinator, Viewport};

use crate::config::ViewerConfig;
use crate::error::AppError;
use crate::source::{Location, TopologySource};
use crate::surfaces::{PngCanvas, PngTexture, write_png};

type Coordinator = DualViewCoordinator<PngTexture, PngCanvas>;

#[derive(Parser, Debug)]
#[command(author, version, about = "Render a country choropleth onto a globe texture and a flat map")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render globe.png (equirectangular) and map.png (Mercator)
    Render(RenderArgs),

    /// List the feature ids the built-in resolver maps to country codes
    Codes,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// JSON config file; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// TopoJSON/GeoJSON path or http(s) URL
    #[arg(long)]
    topology: Option<String>,

    /// TopoJSON object holding the country polygons
    #[arg(long)]
    object: Option<String>,

    /// JSON object of country code -> value, e.g. {"USA": 75}
    #[arg(long)]
    values: Option<PathBuf>,

    /// Set one value, e.g. --set USA=75 (repeatable)
    #[arg(long = "set", value_parser = parse_assignment)]
    set: Vec<(CountryCode, u8)>,

    /// Start from the demonstration dataset
    #[arg(long)]
    sample: bool,

    /// Assign random values to every tracked country
    #[arg(long)]
    randomize: bool,

    /// Seed for --randomize
    #[arg(long)]
    seed: Option<u64>,

    /// Reset every value to 0 after the other updates
    #[arg(long)]
    clear: bool,

    /// Initial flat map size, WIDTHxHEIGHT
    #[arg(long)]
    flat_size: Option<Viewport>,

    /// Resize the flat map after the first render, WIDTHxHEIGHT
    #[arg(long)]
    resize: Option<Viewport>,

    /// Output directory
    #[arg(long)]
    out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Render(args) => render(args).await,
        Command::Codes => {
            print_codes(&CountryCodeResolver::builtin());
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn render(args: RenderArgs) -> Result<(), AppError> {
    let config = resolve_config(&args)?;
    let resolver = CountryCodeResolver::builtin();

    let mut store = ValueStore::new(config.color_scale);
    if config.load_sample {
        store.load_sample();
    }

    let source = TopologySource::new(Location::parse(&config.topology), config.object.as_str());
    let mut coordinator = DualViewCoordinator::new(
        resolver.clone(),
        config.render.clone(),
        PngTexture::default(),
        PngCanvas::new(config.flat_size),
    );
    coordinator.initialize(&source, &store).await?;

    let coordinator = Rc::new(RefCell::new(coordinator));
    DualViewCoordinator::attach(&coordinator, &mut store);

    apply_updates(&args, &resolver, &mut store)?;

    if let Some(viewport) = args.resize {
        let mut c = coordinator.borrow_mut();
        c.canvas_mut().set_viewport(viewport);
        if !c.on_flat_resized(&store)? {
            info!(%viewport, "flat resize ignored");
        }
    }

    write_outputs(&coordinator.borrow(), &config.out_dir)
}

fn resolve_config(args: &RenderArgs) -> Result<ViewerConfig, AppError> {
    let mut config = match &args.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };
    if let Some(topology) = &args.topology {
        config.topology = topology.clone();
    }
    if let Some(object) = &args.object {
        config.object = object.clone();
    }
    if let Some(size) = args.flat_size {
        config.flat_size = size;
    }
    if let Some(out) = &args.out {
        config.out_dir = out.clone();
    }
    config.load_sample |= args.sample;
    Ok(config)
}

/// Each step goes through the store, so the attached coordinator repaints
/// once per step.
fn apply_updates(
    args: &RenderArgs,
    resolver: &CountryCodeResolver,
    store: &mut ValueStore,
) -> Result<(), AppError> {
    let mut assignments = match &args.values {
        Some(path) => read_values(path)?,
        None => Vec::new(),
    };
    assignments.extend(args.set.iter().copied());
    if !assignments.is_empty() {
        store.batch(|store| {
            for (code, value) in assignments {
                store.set_value(code, value);
            }
        });
    }

    if args.randomize {
        let mut rng = match args.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        store.randomize(resolver.codes(), &mut rng);
    }

    if args.clear {
        store.clear();
    }

    info!(entries = store.len(), "values applied");
    Ok(())
}

fn read_values(path: &Path) -> Result<Vec<(CountryCode, u8)>, AppError> {
    let text = std::fs::read_to_string(path).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let raw: BTreeMap<CountryCode, u32> =
        serde_json::from_str(&text).map_err(|source| AppError::Values {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(raw
        .into_iter()
        .map(|(code, value)| (code, value.min(u8::MAX as u32) as u8))
        .collect())
}

fn write_outputs(coordinator: &Coordinator, out_dir: &Path) -> Result<(), AppError> {
    std::fs::create_dir_all(out_dir).map_err(|source| AppError::Io {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let globe = coordinator
        .texture()
        .latest()
        .ok_or(AppError::NothingRendered("sphere texture"))?;
    let map = coordinator
        .canvas()
        .latest()
        .ok_or(AppError::NothingRendered("flat canvas"))?;

    for (name, raster) in [("globe.png", globe), ("map.png", map)] {
        let path = out_dir.join(name);
        write_png(&path, raster)?;
        info!(
            path = %path.display(),
            width = raster.width(),
            height = raster.height(),
            blake3 = %raster.content_hash(),
            "raster written"
        );
    }

    let snapshot = coordinator.metrics().snapshot();
    info!(counters = ?snapshot.counters, gauges = ?snapshot.gauges, "render metrics");
    Ok(())
}

fn print_codes(resolver: &CountryCodeResolver) {
    for (id, code) in resolver.entries() {
        println!("{id}\t{code}");
    }
}

fn parse_assignment(s: &str) -> Result<(CountryCode, u8), String> {
    let (code, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected CODE=VALUE, got {s:?}"))?;
    let code = code
        .trim()
        .to_ascii_uppercase()
        .parse::<CountryCode>()
        .map_err(|e| e.to_string())?;
    let value = value
        .trim()
        .parse::<u8>()
        .map_err(|e| format!("invalid value {value:?}: {e}"))?;
    Ok((code, value))
}
