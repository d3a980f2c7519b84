use anyhow::Result;
use renderer::{MarbleGrid, Renderer, RendererConfig};
use theme::{ColorState, ThemeStore};
use tracing_subscriber::EnvFilter;

use crate::cli::{parse_surface_size, RunArgs};
use crate::paths::AppPaths;
use crate::state::AppState;

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

pub fn run(args: RunArgs) -> Result<()> {
    let paths = AppPaths::discover()?;
    let state_file = paths.state_file();

    let initial = if args.fresh {
        tracing::info!("--fresh requested; ignoring saved color state");
        ColorState::default()
    } else {
        AppState::load_or_default(&state_file)?.color()
    };
    tracing::info!(
        hue = initial.hue,
        saturation = initial.saturation,
        background = %initial.background().to_hex(),
        text = %initial.text(),
        "restored color state"
    );

    let mut store = ThemeStore::new(initial);
    store.subscribe(move |color, _theme| {
        // Persist failures must never take the picker down.
        if let Err(err) = AppState::from_color(color).persist(&state_file) {
            tracing::warn!(error = %err, "failed to persist color state");
        }
    });

    let surface_size = args
        .size
        .as_deref()
        .map(parse_surface_size)
        .transpose()
        .map_err(anyhow::Error::msg)?
        .unwrap_or((1280, 800));

    let config = RendererConfig {
        surface_size,
        background: args.background,
        target_fps: match args.fps {
            Some(fps) if fps > 0.0 => Some(fps),
            _ => None,
        },
        antialiasing: args.antialias,
        marble_grid: MarbleGrid::new(args.rows, args.cols),
        reveal: args.reveal,
        ..RendererConfig::default()
    };

    tracing::info!(background = %config.background, "starting colorfield");
    Renderer::new(config, store).run()
}
