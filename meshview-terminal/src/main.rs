/// meshview terminal viewer
///
/// Usage: meshview-terminal [--config FILE] [MODEL...]
///
/// Controls:
///   - W/S or Up/Down: Zoom in/out
///   - A/D or Left/Right: Strafe
///   - Mouse movement: Look around
///   - Q/ESC: Quit

use anyhow::{bail, Context, Result};
use log::warn;
use meshview_core::{load_model, MeshData, Model, ModelEntry, ModelRegistry, ViewerConfig};
use meshview_terminal::logging::{init_logging, LoggingConfig};
use meshview_terminal::TerminalApp;
use nalgebra::Point3;
use std::env;
use std::path::PathBuf;

struct Args {
    config: Option<PathBuf>,
    models: Vec<PathBuf>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        config: None,
        models: Vec::new(),
    };

    let mut iter = env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-c" | "--config" => {
                let path = iter.next().context("--config needs a file argument")?;
                args.config = Some(PathBuf::from(path));
            }
            "-h" | "--help" => {
                println!("Usage: meshview-terminal [--config FILE] [MODEL...]");
                std::process::exit(0);
            }
            flag if flag.starts_with('-') => bail!("unknown option {}", flag),
            path => args.models.push(PathBuf::from(path)),
        }
    }

    Ok(args)
}

fn main() -> Result<()> {
    let args = parse_args()?;

    let mut config = match &args.config {
        Some(path) => ViewerConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ViewerConfig::default(),
    };
    config
        .models
        .extend(args.models.into_iter().map(ModelEntry::new));

    init_logging(LoggingConfig::from(&config.logging)).context("opening log file")?;

    let mut registry = ModelRegistry::new();
    for entry in &config.models {
        println!("Loading model: {}", entry.path.display());
        load_model(
            &mut registry,
            &entry.path,
            entry.anchor(),
            entry.division_factor,
        )
        .with_context(|| format!("loading model {}", entry.path.display()))?;
    }

    if registry.is_empty() {
        warn!("no models configured, showing the built-in cube");
        registry.append(Model::from_mesh(MeshData::cube(1.0), Point3::origin(), 1.0));
    }

    println!("Starting terminal viewer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = TerminalApp::new(registry, config.controls.clone(), &config.render)?;
    app.run()?;

    println!("Thank you for using meshview!");
    Ok(())
}
