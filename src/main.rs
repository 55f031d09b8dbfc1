//! `tilefield` — run the tile layout and the pan controller from a terminal.
//!
//! `tilefield layout` lays out a seeded random gallery one tick per frame and
//! prints the placed tiles as JSON. `tilefield drag` replays a scripted drag
//! and prints the damped offsets plus the snap-back trajectory. Logs go to
//! stderr; JSON goes to stdout.


use std::io::{self, Write};
use std::ops::Range;
use std::time::Duration;

use canvas::bounds::BoundsRange;
use canvas::camera::{Point, Size};
use canvas::config::{DragConfig, LayoutConfig};
use canvas::drag::{DragController, InteractionState, WorldOffset};
use canvas::driver::{LayoutDriver, LayoutOutcome, LayoutSnapshot};
use canvas::error::ConfigError;
use canvas::input::DragDelta;
use canvas::node::{Seed, TileSpec};
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid size {0:?} (expected WIDTHxHEIGHT)")]
    InvalidSize(String),
    #[error("invalid tile size range {min}..{max}")]
    InvalidRange { min: u32, max: u32 },
    #[error("layout cancelled")]
    Cancelled,
    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "tilefield", about = "Overlap-free tile layout and bounded pan simulator")]
struct Cli {
    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, env = "TILEFIELD_LOG", default_value = "info")]
    log: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lay out a random gallery and print the placed tiles.
    Layout(LayoutArgs),
    /// Replay a drag and print the offsets.
    Drag(DragArgs),
}

#[derive(Args, Debug, Clone)]
struct LayoutArgs {
    #[arg(long, default_value_t = 30)]
    count: usize,
    /// Smallest tile side, inclusive.
    #[arg(long, default_value_t = 100)]
    min_size: u32,
    /// Largest tile side, exclusive.
    #[arg(long, default_value_t = 200)]
    max_size: u32,
    #[arg(long, env = "TILEFIELD_SEED", default_value_t = 0)]
    seed: u64,
    /// Overrides `TILEFIELD_PADDING`.
    #[arg(long)]
    padding: Option<f64>,
    /// Overrides `TILEFIELD_ITERATIONS_PER_TICK`.
    #[arg(long)]
    iterations: Option<u32>,
    /// Overrides `TILEFIELD_DECAY_RATE`.
    #[arg(long)]
    decay: Option<f64>,
    /// Milliseconds between ticks; 0 runs flat out.
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
    /// Start every tile at the origin instead of on a spiral.
    #[arg(long)]
    centered: bool,
}

#[derive(Args, Debug, Clone)]
struct DragArgs {
    #[arg(long, value_parser = parse_size)]
    content: Size,
    #[arg(long, value_parser = parse_size)]
    viewport: Size,
    /// One pointer step, `dx,dy` (append `,up` to release). Repeatable.
    #[arg(long = "delta", allow_hyphen_values = true)]
    deltas: Vec<DragDelta>,
    /// Overrides `TILEFIELD_DAMPING_FACTOR`.
    #[arg(long)]
    damping_factor: Option<f64>,
    /// Frame rate of the snap-back trajectory.
    #[arg(long, default_value_t = 60.0)]
    fps: f64,
    #[arg(long, default_value_t = 600)]
    max_frames: usize,
}

#[derive(Debug, Serialize)]
struct LayoutReport {
    seed: u64,
    config: LayoutConfig,
    #[serde(flatten)]
    snapshot: LayoutSnapshot<Value>,
}

#[derive(Debug, Serialize)]
struct DragReport {
    bounds: BoundsRange,
    initial: WorldOffset,
    moves: Vec<WorldOffset>,
    released: WorldOffset,
    snap_back: Vec<WorldOffset>,
    settled: WorldOffset,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();

    match cli.command {
        Command::Layout(args) => {
            let report = run_layout(&args).await?;
            write_json(&report)
        }
        Command::Drag(args) => {
            let report = run_drag(&args)?;
            write_json(&report)
        }
    }
}

fn write_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

/// Parse `WIDTHxHEIGHT`.
fn parse_size(raw: &str) -> Result<Size, CliError> {
    let invalid = || CliError::InvalidSize(raw.to_owned());
    let (w, h) = raw.split_once(['x', 'X']).ok_or_else(invalid)?;
    let width: f64 = w.trim().parse().map_err(|_| invalid())?;
    let height: f64 = h.trim().parse().map_err(|_| invalid())?;
    Ok(Size::new(width, height))
}

/// `count` tiles with integer sides drawn uniformly from `sides`.
fn generate_tiles(count: usize, sides: Range<u32>, seed: u64) -> Result<Vec<TileSpec<Value>>, CliError> {
    if sides.is_empty() || sides.start == 0 {
        return Err(CliError::InvalidRange { min: sides.start, max: sides.end });
    }
    let mut rng = StdRng::seed_from_u64(seed);
    Ok((0..count)
        .map(|i| {
            let width = f64::from(rng.random_range(sides.clone()));
            let height = f64::from(rng.random_range(sides.clone()));
            TileSpec::new(width, height, json!({ "label": format!("tile-{i}") }))
        })
        .collect())
}

fn layout_config(args: &LayoutArgs) -> Result<LayoutConfig, CliError> {
    let mut config = LayoutConfig::from_env()?;
    if let Some(padding) = args.padding {
        config.padding = padding;
    }
    if let Some(iterations) = args.iterations {
        config.iterations_per_tick = iterations;
    }
    if let Some(decay) = args.decay {
        config.decay_rate = decay;
    }
    config.validate()?;
    Ok(config)
}

async fn run_layout(args: &LayoutArgs) -> Result<LayoutReport, CliError> {
    let config = layout_config(args)?;
    let tiles = generate_tiles(args.count, args.min_size..args.max_size, args.seed)?;
    let seed = if args.centered { Seed::Centered(Point::default()) } else { Seed::Phyllotaxis };

    let mut driver = LayoutDriver::new(config);
    let handle = driver.start(tiles, &seed);

    let token = handle.token();
    let interrupt = tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                warn!("interrupted, cancelling layout");
                token.cancel();
            }
            Err(e) => warn!(error = %e, "ctrl-c handler unavailable"),
        }
    });

    let mut frames = (args.frame_ms > 0).then(|| tokio::time::interval(Duration::from_millis(args.frame_ms)));
    while driver.tick().is_some_and(|phase| !phase.is_terminal()) {
        match frames.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => tokio::task::yield_now().await,
        }
    }
    interrupt.abort();

    match handle.await {
        LayoutOutcome::Completed(snapshot) => {
            info!(
                tiles = snapshot.tiles.len(),
                ticks = snapshot.summary.ticks,
                status = ?snapshot.summary.status,
                "layout complete"
            );
            Ok(LayoutReport { seed: args.seed, config, snapshot })
        }
        LayoutOutcome::Cancelled => Err(CliError::Cancelled),
    }
}

fn drag_config(args: &DragArgs) -> Result<DragConfig, CliError> {
    let mut config = DragConfig::from_env()?;
    if let Some(factor) = args.damping_factor {
        config.damping_factor = factor;
    }
    config.validate()?;
    Ok(config)
}

fn run_drag(args: &DragArgs) -> Result<DragReport, CliError> {
    let mut drag = DragController::new(drag_config(args)?);
    let initial = drag.on_resize(args.content, args.viewport);
    if !drag.is_measured() {
        warn!(content = ?args.content, viewport = ?args.viewport, "unmeasured sizes; drag disabled");
    }

    drag.on_drag_start();
    let moves: Vec<WorldOffset> = args.deltas.iter().map(|delta| drag.on_drag_move(*delta)).collect();
    let released = drag.on_drag_end();

    let dt = if args.fps.is_finite() && args.fps > 0.0 { 1.0 / args.fps } else { 1.0 / 60.0 };
    let mut snap_back = Vec::new();
    while drag.state() == InteractionState::Settling && snap_back.len() < args.max_frames {
        snap_back.push(drag.advance(dt));
    }
    if drag.state() == InteractionState::Settling {
        warn!(frames = snap_back.len(), "snap-back still moving after frame budget");
    }

    Ok(DragReport { bounds: drag.bounds(), initial, moves, released, snap_back, settled: drag.offset() })
}
