/*
 * Headless Module
 *
 * Runs the simulation without a window for a fixed number of frames at a
 * fixed step length, logging a summary as it goes.
 */

use std::sync::Arc;

use crate::debug::PopulationStats;
use crate::flock::Population;
use crate::params::SimulationParams;
use crate::physics;

// Log roughly ten summaries per run
const REPORTS_PER_RUN: u64 = 10;

pub fn run_headless(params: &SimulationParams, frames: u64, dt: f32) -> Population {
    let config = Arc::new(params.behavior);
    let mut rng = physics::make_rng(params.seed);
    let mut population = physics::spawn_population(params, config, &mut rng);

    let report_every = (frames / REPORTS_PER_RUN).max(1);
    log::info!(
        "Running {} frames of {} ms with {} boids",
        frames,
        dt,
        population.len()
    );

    for frame in 1..=frames {
        physics::step(&mut population, &params.neighbors, dt, params.enable_parallel);

        if frame % report_every == 0 || frame == frames {
            let stats = PopulationStats::measure(&population);
            log::info!(
                "frame {:>6}: mean speed {:.4}, polarization {:.3}, centroid ({:.1}, {:.1})",
                frame,
                stats.mean_speed,
                stats.polarization,
                stats.centroid.x,
                stats.centroid.y
            );
        }
    }

    population
}
