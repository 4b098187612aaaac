/*
 * Input Module
 *
 * This module handles user input events for the boid simulation.
 * A left click selects the boid under the cursor (or clears the
 * selection); every other event is forwarded to egui.
 */

use nannou::prelude::*;

use crate::app::Model;

// Mouse moved event handler
pub fn mouse_moved(_app: &App, model: &mut Model, pos: Point2) {
    model.mouse_position = pos;
}

// Mouse pressed event handler
pub fn mouse_pressed(_app: &App, model: &mut Model, button: MouseButton) {
    if button != MouseButton::Left {
        return;
    }

    // Clicks on the UI panel are not meant for the boids
    if model.egui.ctx().is_pointer_over_area() {
        return;
    }

    // Window and world share coordinates: origin at the centre, y up
    let selected = model.population.select_at(model.mouse_position);
    model.debug_info.selected_boid_index = selected;
    match selected {
        Some(index) => log::debug!("Selected boid {}", model.population.boids[index].id()),
        None => log::debug!("Selection cleared"),
    }
}

// Handle raw window events for egui
pub fn raw_window_event(_app: &App, model: &mut Model, event: &nannou::winit::event::WindowEvent) {
    model.egui.handle_raw_event(event);
}
