/*
 * Physics Module
 *
 * This module advances the population one frame at a time and spawns new
 * boids.
 *
 * Every boid reads a snapshot of the population taken before the frame
 * starts, and only ever writes to itself. The update is therefore
 * synchronous (nobody sees a neighbour's new state mid-frame) and the
 * per-boid work can be spread over rayon's thread pool without changing
 * the result.
 */

use std::collections::HashMap;
use std::sync::Arc;

use nannou::prelude::*;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use rayon::prelude::*;

use crate::boid::{Boid, Neighbors};
use crate::flock::{group_by_flock, FlockId, Population};
use crate::params::{BehaviorConfig, NeighborPolicy, NeighborSource, SimulationParams};

pub fn make_rng(seed: Option<u64>) -> Pcg64 {
    match seed {
        Some(seed) => {
            log::info!("Seeding spawner with {}", seed);
            Pcg64::seed_from_u64(seed)
        }
        None => Pcg64::from_entropy(),
    }
}

// Random position in the spawn region, speed per axis in [min, max] with random sign
fn spawn_boid<R: Rng>(
    id: usize,
    params: &SimulationParams,
    config: &Arc<BehaviorConfig>,
    rng: &mut R,
) -> Boid {
    let half_w = params.spawn.width / 2.0;
    let half_h = params.spawn.height / 2.0;
    let x = rng.gen_range(-half_w..=half_w);
    let y = rng.gen_range(-half_h..=half_h);

    let mut axis_speed = || {
        let speed = rng.gen_range(config.min_speed..=config.max_speed);
        if rng.gen_bool(0.5) {
            speed
        } else {
            -speed
        }
    };
    let velocity = vec2(axis_speed(), axis_speed());

    let boid = Boid::new(
        id,
        pt2(x, y),
        velocity,
        config.clone(),
        params.world.boundary(),
    );

    if params.num_flocks > 0 {
        boid.with_flock(FlockId((id % params.num_flocks as usize) as u16))
    } else {
        boid
    }
}

pub fn spawn_population<R: Rng>(
    params: &SimulationParams,
    config: Arc<BehaviorConfig>,
    rng: &mut R,
) -> Population {
    let boids = (0..params.num_boids)
        .map(|id| spawn_boid(id, params, &config, rng))
        .collect();
    log::debug!(
        "Spawned {} boids in {} flocks",
        params.num_boids,
        params.num_flocks
    );
    Population::new(boids)
}

// Grow or shrink the population to params.num_boids, keeping existing boids
pub fn resize_population<R: Rng>(
    population: &mut Population,
    params: &SimulationParams,
    config: Arc<BehaviorConfig>,
    rng: &mut R,
) {
    let next_id = population
        .boids
        .iter()
        .map(|boid| boid.id() + 1)
        .max()
        .unwrap_or(0);
    let missing = params.num_boids.saturating_sub(population.len());

    population.boids.truncate(params.num_boids);
    population
        .boids
        .extend((0..missing).map(|offset| spawn_boid(next_id + offset, params, &config, rng)));
}

/// Pick each rule's candidate slice according to `policy`.
/// A boid without a flock uses the whole population for flock-sourced rules.
pub fn resolve_neighbors<'a>(
    policy: &NeighborPolicy,
    population: &'a [Boid],
    flock: Option<&'a [Boid]>,
) -> Neighbors<'a> {
    let source = |choice: NeighborSource| match choice {
        NeighborSource::Population => population,
        NeighborSource::Flock => flock.unwrap_or(population),
    };

    Neighbors {
        separation: source(policy.separation),
        alignment: source(policy.alignment),
        cohesion: source(policy.cohesion),
    }
}

/// Advance every boid by exactly one step of length `dt`.
pub fn step(population: &mut Population, policy: &NeighborPolicy, dt: f32, parallel: bool) {
    if population.is_empty() {
        return;
    }

    // Pre-step state that every boid reads from
    let snapshot: Vec<Boid> = population.boids.clone();
    let flocks: HashMap<FlockId, Vec<Boid>> = group_by_flock(&snapshot);

    let update = |boid: &mut Boid| {
        let flock = boid
            .flock()
            .and_then(|id| flocks.get(&id))
            .map(Vec::as_slice);
        let neighbors = resolve_neighbors(policy, &snapshot, flock);
        boid.update_with(neighbors, dt);
    };

    if parallel {
        // Chunk so each rayon task handles a run of boids
        let chunk_size = std::cmp::max(population.len() / rayon::current_num_threads(), 1);
        population
            .boids
            .par_chunks_mut(chunk_size)
            .for_each(|chunk| chunk.iter_mut().for_each(&update));
    } else {
        population.boids.iter_mut().for_each(&update);
    }
}
