/*
 * Boid Flocking Simulation - Module Definitions
 *
 * This file defines the module structure for the boid simulation.
 * The steering model lives in `boid`, `flock` and `physics`; the nannou
 * application (`app`, `renderer`, `input`, `ui`) only drives and draws it.
 */

// Re-export key components for easier access
pub use boid::{Boid, Neighbors, Perception};
pub use debug::{DebugInfo, PopulationStats};
pub use error::ConfigError;
pub use flock::{FlockId, Population};
pub use params::{
    BehaviorConfig, BehaviorParams, Boundary, NeighborPolicy, NeighborSource, SimulationParams,
};

// Define modules
pub mod app;
pub mod boid;
pub mod debug;
pub mod error;
pub mod flock;
pub mod headless;
pub mod input;
pub mod math;
pub mod params;
pub mod physics;
pub mod renderer;
pub mod ui;

// Constants
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
