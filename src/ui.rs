/*
 * UI Module
 *
 * This module builds the control panel with nannou_egui. Behaviour edits
 * are written to a scratch copy of the parameters; the app validates them
 * before sharing them with the boids.
 */

use nannou_egui::{egui, Egui};

use crate::debug::{DebugInfo, PopulationStats};
use crate::params::{BehaviorParams, NeighborSource, SimulationParams};

/// What the user asked for during this frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UiActions {
    pub respawn: bool,
    pub num_boids_changed: bool,
    pub behavior_changed: bool,
    pub step_once: bool,
}

fn neighbor_source_row(ui: &mut egui::Ui, label: &str, source: &mut NeighborSource) {
    ui.horizontal(|ui| {
        ui.label(label);
        ui.radio_value(source, NeighborSource::Population, "Population");
        ui.radio_value(source, NeighborSource::Flock, "Flock");
    });
}

pub fn update_ui(
    egui: &mut Egui,
    params: &mut SimulationParams,
    behavior: &mut BehaviorParams,
    paused: &mut bool,
    debug_info: &DebugInfo,
    stats: &PopulationStats,
) -> UiActions {
    let mut actions = UiActions::default();
    let num_boids_before = params.num_boids;
    let behavior_before = *behavior;

    let ctx = egui.begin_frame();

    egui::Window::new("Simulation Controls")
        .default_pos([10.0, 10.0])
        .show(&ctx, |ui| {
            ui.collapsing("Population", |ui| {
                ui.add(
                    egui::Slider::new(&mut params.num_boids, SimulationParams::get_num_boids_range())
                        .text("Number of Boids"),
                );
                if ui.button("Respawn").clicked() {
                    actions.respawn = true;
                }
            });

            ui.collapsing("Speed", |ui| {
                ui.add(egui::Slider::new(&mut behavior.min_speed, BehaviorParams::speed_range()).text("Min Speed"));
                ui.add(egui::Slider::new(&mut behavior.max_speed, BehaviorParams::speed_range()).text("Max Speed"));
                ui.add(egui::Slider::new(&mut behavior.turn_gain, BehaviorParams::gain_range()).text("Turn Gain"));
            });

            ui.collapsing("Steering", |ui| {
                ui.add(
                    egui::Slider::new(&mut behavior.separation_gain, BehaviorParams::separation_gain_range())
                        .text("Separation Gain"),
                );
                ui.add(egui::Slider::new(&mut behavior.alignment_gain, BehaviorParams::gain_range()).text("Alignment Gain"));
                ui.add(egui::Slider::new(&mut behavior.cohesion_gain, BehaviorParams::gain_range()).text("Cohesion Gain"));
            });

            ui.collapsing("Perception", |ui| {
                ui.add(
                    egui::Slider::new(&mut behavior.vision_angle_degrees, BehaviorParams::angle_range())
                        .text("Vision Angle"),
                );
                ui.add(
                    egui::Slider::new(&mut behavior.vision_distance, BehaviorParams::distance_range())
                        .text("Vision Distance"),
                );
                ui.add(
                    egui::Slider::new(&mut behavior.protected_distance, BehaviorParams::distance_range())
                        .text("Protected Distance"),
                );
            });

            ui.collapsing("Neighbours", |ui| {
                neighbor_source_row(ui, "Separation", &mut params.neighbors.separation);
                neighbor_source_row(ui, "Alignment", &mut params.neighbors.alignment);
                neighbor_source_row(ui, "Cohesion", &mut params.neighbors.cohesion);
                ui.checkbox(&mut params.enable_parallel, "Parallel Update");
            });

            ui.separator();
            ui.label(format!("FPS: {:.1}", debug_info.fps));
            ui.label(format!("Frame: {:.1} ms", debug_info.frame_time_ms()));
            ui.label(format!("Step: {:.1} ms (#{})", debug_info.last_step_ms, debug_info.steps));
            ui.label(format!("Boids: {}", stats.count));
            ui.label(format!("Mean speed: {:.3}", stats.mean_speed));
            ui.label(format!("Polarization: {:.2}", stats.polarization));
            if let Some(index) = debug_info.selected_boid_index {
                ui.label(format!("Selected: #{}", index));
            }

            ui.horizontal(|ui| {
                ui.checkbox(paused, "Pause");
                if *paused && ui.button("Step").clicked() {
                    actions.step_once = true;
                }
            });
        });

    actions.num_boids_changed = params.num_boids != num_boids_before;
    actions.behavior_changed = *behavior != behavior_before;
    actions
}
