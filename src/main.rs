/*
 * Boid Flocking Simulation
 *
 * Boids steer by four local rules (edge avoidance, separation, alignment
 * and cohesion) and flock without any central control. Run with a window
 * for the interactive view, or with --headless to step the simulation and
 * log summaries.
 */

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use flocking::{app, headless, SimulationParams, DEFAULT_CONFIG_PATH};

#[derive(Parser, Debug)]
#[command(version, about = "Boid flocking simulation")]
struct Args {
    /// TOML config file; defaults are used when the default path is missing
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for the spawner, overriding the config
    #[arg(long)]
    seed: Option<u64>,

    /// Number of boids, overriding the config
    #[arg(short, long)]
    boids: Option<usize>,

    /// Run without a window
    #[arg(long)]
    headless: bool,

    /// Frames to simulate in headless mode
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Step length in milliseconds for headless mode
    #[arg(long, default_value_t = 16.0)]
    dt: f32,
}

fn load_params(args: &Args) -> anyhow::Result<SimulationParams> {
    let mut params = match &args.config {
        Some(path) => SimulationParams::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => {
            let path = PathBuf::from(DEFAULT_CONFIG_PATH);
            if path.exists() {
                SimulationParams::load(&path).context("loading default config")?
            } else {
                log::info!("No {} found, using built-in defaults", DEFAULT_CONFIG_PATH);
                SimulationParams::default()
            }
        }
    };

    if let Some(seed) = args.seed {
        params.seed = Some(seed);
    }
    if let Some(boids) = args.boids {
        params.num_boids = boids;
    }
    Ok(params)
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let args = Args::parse();
    let params = load_params(&args)?;

    if args.headless {
        anyhow::ensure!(args.dt.is_finite() && args.dt >= 0.0, "--dt must be a non-negative number");
        headless::run_headless(&params, args.frames, args.dt);
    } else {
        app::run(params);
    }

    Ok(())
}
