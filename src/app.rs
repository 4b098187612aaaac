/*
 * Application Module
 *
 * This module defines the nannou application model and the frame driver.
 * The frame driver measures the wall-clock time since the previous physics
 * step, paces steps to the target frame rate and runs exactly one step per
 * due frame, so a slow render never skips or doubles a step.
 */

use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use nannou::prelude::*;
use nannou_egui::Egui;
use rand_pcg::Pcg64;

use crate::debug::{DebugInfo, PopulationStats};
use crate::flock::Population;
use crate::input::{mouse_moved, mouse_pressed, raw_window_event};
use crate::params::{BehaviorConfig, BehaviorParams, SimulationParams};
use crate::physics;
use crate::renderer::view;
use crate::ui;

// Parameters handed from main to nannou's model function
static STARTUP_PARAMS: OnceLock<SimulationParams> = OnceLock::new();

/// Paces physics steps and turns elapsed wall-clock time into `dt`.
#[derive(Debug, Clone)]
pub struct FrameClock {
    interval: Duration,
    max_step_ms: f32,
    last_step: Instant,
}

impl FrameClock {
    pub fn new(target_fps: f32, max_step_ms: f32, now: Instant) -> Self {
        let interval = if target_fps > 0.0 {
            Duration::from_secs_f64(1.0 / target_fps as f64)
        } else {
            Duration::ZERO
        };
        Self {
            interval,
            max_step_ms,
            last_step: now,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns the step length in milliseconds when a step is due at `now`.
    /// A step longer than `max_step_ms` is capped.
    pub fn tick(&mut self, now: Instant) -> Option<f32> {
        let elapsed = now.saturating_duration_since(self.last_step);
        if elapsed < self.interval {
            return None;
        }
        self.last_step = now;
        Some((elapsed.as_secs_f32() * 1000.0).min(self.max_step_ms))
    }
}

// Main model for the application
pub struct Model {
    pub population: Population,
    pub params: SimulationParams,
    // Behaviour values being edited in the UI; applied once they validate
    pub behavior_edit: BehaviorParams,
    pub config: Arc<BehaviorConfig>,
    pub egui: Egui,
    pub debug_info: DebugInfo,
    pub stats: PopulationStats,
    pub clock: FrameClock,
    pub rng: Pcg64,
    pub paused: bool,
    pub mouse_position: Vec2,
}

/// Open the window and run the simulation until it is closed.
pub fn run(params: SimulationParams) {
    if STARTUP_PARAMS.set(params).is_err() {
        log::warn!("Simulation already started; ignoring new parameters");
    }
    nannou::app(model).update(update).run();
}

// Initialize the model
fn model(app: &App) -> Model {
    let params = STARTUP_PARAMS.get().cloned().unwrap_or_default();

    let window_id = app
        .new_window()
        .title("Boid Flocking Simulation")
        .size(params.world.width as u32, params.world.height as u32)
        .view(view)
        .mouse_moved(mouse_moved)
        .mouse_pressed(mouse_pressed)
        .raw_event(raw_window_event)
        .build()
        .expect("failed to build window");
    let window = app.window(window_id).expect("window vanished after creation");
    let egui = Egui::from_window(&window);

    let config = Arc::new(params.behavior);
    let mut rng = physics::make_rng(params.seed);
    let population = physics::spawn_population(&params, config.clone(), &mut rng);
    let stats = PopulationStats::measure(&population);
    log::info!(
        "Starting with {} boids in a {}x{} world",
        population.len(),
        params.world.width,
        params.world.height
    );

    Model {
        population,
        behavior_edit: params.behavior.params(),
        config,
        egui,
        debug_info: DebugInfo::default(),
        stats,
        clock: FrameClock::new(params.target_fps, params.max_step_ms, Instant::now()),
        rng,
        paused: false,
        mouse_position: Vec2::ZERO,
        params,
    }
}

// Validate edited behaviour values and share them with every boid
fn apply_behavior_edit(model: &mut Model) {
    match BehaviorConfig::new(model.behavior_edit) {
        Ok(config) => {
            model.params.behavior = config;
            model.config = Arc::new(config);
            model.population.set_config(model.config.clone());
        }
        Err(err) => {
            log::warn!("Rejected behavior change: {}", err);
            model.behavior_edit = model.config.params();
        }
    }
}

// Update the model
fn update(app: &App, model: &mut Model, update: Update) {
    model.debug_info.fps = app.fps();
    model.debug_info.frame_time = update.since_last;

    model.egui.set_elapsed_time(update.since_start);
    let actions = ui::update_ui(
        &mut model.egui,
        &mut model.params,
        &mut model.behavior_edit,
        &mut model.paused,
        &model.debug_info,
        &model.stats,
    );

    if actions.behavior_changed {
        apply_behavior_edit(model);
    }

    if actions.respawn {
        model.population =
            physics::spawn_population(&model.params, model.config.clone(), &mut model.rng);
        model.debug_info.selected_boid_index = None;
    } else if actions.num_boids_changed {
        physics::resize_population(
            &mut model.population,
            &model.params,
            model.config.clone(),
            &mut model.rng,
        );
        model.debug_info.selected_boid_index = model.population.selected();
    }

    // The clock keeps ticking while paused so resuming does not produce a huge dt
    let tick = model.clock.tick(Instant::now());
    let dt = match (tick, model.paused && actions.step_once) {
        (Some(dt), _) if !model.paused => Some(dt),
        // A single step while paused always advances one frame interval
        (_, true) => Some(model.clock.interval().as_secs_f32() * 1000.0),
        _ => None,
    };
    if let Some(dt) = dt {
        physics::step(
            &mut model.population,
            &model.params.neighbors,
            dt,
            model.params.enable_parallel,
        );
        model.debug_info.last_step_ms = dt;
        model.debug_info.steps += 1;
        model.stats = PopulationStats::measure(&model.population);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_waits_for_the_frame_interval() {
        let start = Instant::now();
        let mut clock = FrameClock::new(50.0, 1000.0, start);
        assert_eq!(clock.interval(), Duration::from_millis(20));

        assert_eq!(clock.tick(start + Duration::from_millis(5)), None);
        let dt = clock.tick(start + Duration::from_millis(25)).unwrap();
        assert!((dt - 25.0).abs() < 1e-3);

        // Measured from the last step, not from the skipped frame
        assert_eq!(clock.tick(start + Duration::from_millis(30)), None);
        let dt = clock.tick(start + Duration::from_millis(50)).unwrap();
        assert!((dt - 25.0).abs() < 1e-3);
    }

    #[test]
    fn clock_caps_long_stalls() {
        let start = Instant::now();
        let mut clock = FrameClock::new(60.0, 100.0, start);
        assert_eq!(clock.tick(start + Duration::from_secs(3)), Some(100.0));
    }

    #[test]
    fn zero_target_fps_steps_every_frame() {
        let start = Instant::now();
        let mut clock = FrameClock::new(0.0, 100.0, start);
        assert_eq!(clock.interval(), Duration::ZERO);
        assert!(clock.tick(start + Duration::from_millis(1)).is_some());
    }
}
