/*
 * Simulation Parameters Module
 *
 * This module defines the configuration of the simulation: the behaviour
 * parameters shared by every boid, the world rectangle, the spawn region,
 * the neighbour-source policy and the frame-driver settings.
 *
 * Everything here is loaded from a TOML file (every section optional) and
 * validated when it is built, so an invalid value is rejected before the
 * simulation starts rather than tolerated frame after frame.
 */

use std::ops::Deref;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Raw behaviour values as written in a config file or edited in the UI.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct BehaviorParams {
    pub min_speed: f32,
    pub max_speed: f32,
    pub size: f32,
    pub separation_gain: f32,
    pub alignment_gain: f32,
    pub cohesion_gain: f32,
    pub turn_gain: f32,
    pub vision_angle_degrees: f32,
    pub vision_distance: f32,
    pub protected_distance: f32,
}

// Speeds are world units per millisecond, gains are per millisecond as well.
impl Default for BehaviorParams {
    fn default() -> Self {
        Self {
            min_speed: 0.1,
            max_speed: 0.2,
            size: 6.0,
            separation_gain: 0.05,
            alignment_gain: 0.002,
            cohesion_gain: 0.0005,
            turn_gain: 0.005,
            vision_angle_degrees: 270.0,
            vision_distance: 75.0,
            protected_distance: 20.0,
        }
    }
}

impl BehaviorParams {
    fn fields(&self) -> [(&'static str, f32); 10] {
        [
            ("min_speed", self.min_speed),
            ("max_speed", self.max_speed),
            ("size", self.size),
            ("separation_gain", self.separation_gain),
            ("alignment_gain", self.alignment_gain),
            ("cohesion_gain", self.cohesion_gain),
            ("turn_gain", self.turn_gain),
            ("vision_angle_degrees", self.vision_angle_degrees),
            ("vision_distance", self.vision_distance),
            ("protected_distance", self.protected_distance),
        ]
    }

    pub fn validate(&self) -> Result<()> {
        for (field, value) in self.fields() {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
        }

        for (field, value) in [
            ("min_speed", self.min_speed),
            ("size", self.size),
            ("protected_distance", self.protected_distance),
            ("vision_distance", self.vision_distance),
        ] {
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }

        if self.min_speed > self.max_speed {
            return Err(ConfigError::SpeedRange {
                min: self.min_speed,
                max: self.max_speed,
            });
        }

        if !(self.vision_angle_degrees > 0.0 && self.vision_angle_degrees <= 360.0) {
            return Err(ConfigError::VisionAngle(self.vision_angle_degrees));
        }

        if self.protected_distance > self.vision_distance {
            return Err(ConfigError::ProtectedDistance {
                protected: self.protected_distance,
                vision: self.vision_distance,
            });
        }

        Ok(())
    }

    // Slider ranges for the UI
    pub fn speed_range() -> std::ops::RangeInclusive<f32> {
        0.0..=1.0
    }

    pub fn gain_range() -> std::ops::RangeInclusive<f32> {
        0.0..=0.1
    }

    pub fn separation_gain_range() -> std::ops::RangeInclusive<f32> {
        0.0..=2.0
    }

    pub fn angle_range() -> std::ops::RangeInclusive<f32> {
        1.0..=360.0
    }

    pub fn distance_range() -> std::ops::RangeInclusive<f32> {
        0.0..=300.0
    }
}

/// Validated, immutable behaviour configuration.
///
/// Built through [`BehaviorConfig::new`] (deserialization goes through the
/// same check) or [`Default`], whose values pass that check as well, so
/// every boid holding an `Arc<BehaviorConfig>` can rely on its invariants.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(try_from = "BehaviorParams", into = "BehaviorParams")]
pub struct BehaviorConfig {
    params: BehaviorParams,
}

impl BehaviorConfig {
    pub fn new(params: BehaviorParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> BehaviorParams {
        self.params
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        let params = BehaviorParams::default();
        debug_assert!(params.validate().is_ok());
        Self { params }
    }
}

impl Deref for BehaviorConfig {
    type Target = BehaviorParams;

    fn deref(&self) -> &BehaviorParams {
        &self.params
    }
}

impl TryFrom<BehaviorParams> for BehaviorConfig {
    type Error = ConfigError;

    fn try_from(params: BehaviorParams) -> Result<Self> {
        Self::new(params)
    }
}

impl From<BehaviorConfig> for BehaviorParams {
    fn from(config: BehaviorConfig) -> Self {
        config.params
    }
}

/// The inner margin rectangle boids steer back into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boundary {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
}

impl Boundary {
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left && x <= self.right && y >= self.bottom && y <= self.top
    }
}

/// World rectangle, centred on the origin with y pointing up.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct WorldParams {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl Default for WorldParams {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            margin: 100.0,
        }
    }
}

impl WorldParams {
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("width", self.width),
            ("height", self.height),
            ("margin", self.margin),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }

        if self.margin * 2.0 > self.width || self.margin * 2.0 > self.height {
            return Err(ConfigError::Margin {
                margin: self.margin,
                width: self.width,
                height: self.height,
            });
        }

        Ok(())
    }

    pub fn half_extents(&self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }

    pub fn boundary(&self) -> Boundary {
        let (half_w, half_h) = self.half_extents();
        Boundary {
            left: -half_w + self.margin,
            right: half_w - self.margin,
            bottom: -half_h + self.margin,
            top: half_h - self.margin,
        }
    }
}

/// Rectangle (centred on the origin) that new boids are scattered in.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct SpawnParams {
    pub width: f32,
    pub height: f32,
}

impl Default for SpawnParams {
    fn default() -> Self {
        let world = WorldParams::default();
        Self {
            width: world.width,
            height: world.height,
        }
    }
}

/// Where a rule takes its candidate neighbours from.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum NeighborSource {
    /// Every boid in the population.
    Population,
    /// Only the boid's own flock (the population if it has none).
    Flock,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct NeighborPolicy {
    pub separation: NeighborSource,
    pub alignment: NeighborSource,
    pub cohesion: NeighborSource,
}

impl Default for NeighborPolicy {
    fn default() -> Self {
        Self {
            separation: NeighborSource::Population,
            alignment: NeighborSource::Flock,
            cohesion: NeighborSource::Flock,
        }
    }
}

impl NeighborPolicy {
    /// Every rule reads the whole population.
    pub fn whole_population() -> Self {
        Self {
            separation: NeighborSource::Population,
            alignment: NeighborSource::Population,
            cohesion: NeighborSource::Population,
        }
    }
}

// Parameters for the whole simulation, as read from `config.toml`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SimulationParams {
    pub num_boids: usize,
    pub num_flocks: u16,
    pub seed: Option<u64>,
    pub enable_parallel: bool,
    pub target_fps: f32,
    pub max_step_ms: f32,
    pub world: WorldParams,
    pub spawn: SpawnParams,
    pub behavior: BehaviorConfig,
    pub neighbors: NeighborPolicy,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            num_boids: 300,
            num_flocks: 3,
            seed: None,
            enable_parallel: true,
            target_fps: 60.0,
            max_step_ms: 100.0,
            world: WorldParams::default(),
            spawn: SpawnParams::default(),
            behavior: BehaviorConfig::default(),
            neighbors: NeighborPolicy::default(),
        }
    }
}

impl SimulationParams {
    pub fn from_toml(source: &str, path: &Path) -> Result<Self> {
        let params: Self = toml::from_str(source).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        params.validate()?;
        Ok(params)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let params = Self::from_toml(&source, path)?;
        log::debug!("Loaded config from {}: {:#?}", path.display(), params);
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        self.world.validate()?;
        self.behavior.validate()?;
        for (field, value) in [
            ("target_fps", self.target_fps),
            ("max_step_ms", self.max_step_ms),
            ("spawn.width", self.spawn.width),
            ("spawn.height", self.spawn.height),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }
        Ok(())
    }

    pub fn get_num_boids_range() -> std::ops::RangeInclusive<usize> {
        1..=5000
    }
}
