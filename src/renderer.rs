/*
 * Renderer Module
 *
 * This module draws the simulation. It only reads the population:
 * - each boid as a triangle pointing along its velocity, coloured by flock
 * - the world rectangle and the inner margin boids steer back into
 * - for the selected boid, its bounding box plus the vision and protected
 *   sectors it actually perceives through (centred on the world +x axis)
 */

use nannou::prelude::*;

use crate::app::Model;
use crate::boid::Boid;
use crate::flock::FlockId;

const ARC_SEGMENTS: usize = 64;

const FLOCK_COLOURS: [(u8, u8, u8); 6] = [
    (235, 87, 87),
    (111, 207, 151),
    (86, 156, 255),
    (242, 201, 76),
    (187, 107, 217),
    (86, 204, 242),
];

pub fn flock_colour(flock: Option<FlockId>) -> Rgb<u8> {
    match flock {
        Some(FlockId(id)) => {
            let (r, g, b) = FLOCK_COLOURS[id as usize % FLOCK_COLOURS.len()];
            rgb(r, g, b)
        }
        None => rgb(220, 220, 220),
    }
}

/// Triangle outline of a boid of `size` pointing along +x, before rotation.
pub fn triangle_points(size: f32) -> [Point2; 3] {
    [
        pt2(size, 0.0),
        pt2(-size * 0.5, size * 0.5),
        pt2(-size * 0.5, -size * 0.5),
    ]
}

/// Circular sector centred on `centre`, spanning `[-half_angle, half_angle]`
/// around the +x axis. The centre is the first and last point.
pub fn sector_points(centre: Point2, radius: f32, half_angle: f32) -> Vec<Point2> {
    let mut points = Vec::with_capacity(ARC_SEGMENTS + 3);
    points.push(centre);
    for i in 0..=ARC_SEGMENTS {
        let theta = -half_angle + 2.0 * half_angle * i as f32 / ARC_SEGMENTS as f32;
        points.push(centre + vec2(theta.cos(), theta.sin()) * radius);
    }
    points.push(centre);
    points
}

fn draw_boid(draw: &Draw, boid: &Boid) {
    draw.polygon()
        .color(flock_colour(boid.flock()))
        .points(triangle_points(boid.size))
        .xy(boid.position())
        .rotate(boid.heading_angle());
}

fn draw_selection(draw: &Draw, boid: &Boid) {
    let config = boid.config();
    let half_angle = boid.perception().half_vision_angle;

    draw.polygon()
        .rgba(0.5, 0.5, 0.5, 0.25)
        .points(sector_points(boid.position(), config.vision_distance, half_angle));
    draw.polygon()
        .rgba(0.5, 0.5, 0.5, 0.5)
        .points(sector_points(boid.position(), config.protected_distance, half_angle));

    let bounds = boid.bounding_box();
    draw.rect()
        .xy(bounds.xy())
        .wh(bounds.wh())
        .no_fill()
        .stroke_weight(2.0)
        .stroke(RED);
}

// Render the model
pub fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    draw.background().color(BLACK);

    // World rectangle and the margin rectangle inside it
    let world = &model.params.world;
    draw.rect()
        .x_y(0.0, 0.0)
        .w_h(world.width, world.height)
        .no_fill()
        .stroke_weight(1.0)
        .stroke(rgba(0.3, 0.3, 0.3, 1.0));
    let boundary = world.boundary();
    draw.rect()
        .x_y(
            (boundary.left + boundary.right) / 2.0,
            (boundary.bottom + boundary.top) / 2.0,
        )
        .w_h(boundary.right - boundary.left, boundary.top - boundary.bottom)
        .no_fill()
        .stroke_weight(1.0)
        .stroke(rgba(0.2, 0.2, 0.4, 1.0));

    // Overlays go underneath the boids
    for boid in model.population.iter().filter(|boid| boid.selected) {
        draw_selection(&draw, boid);
    }

    for boid in model.population.iter() {
        draw_boid(&draw, boid);
    }

    if let Err(err) = draw.to_frame(app, &frame) {
        log::error!("Failed to draw frame: {:?}", err);
    }
    if let Err(err) = model.egui.draw_to_frame(&frame) {
        log::error!("Failed to draw UI: {:?}", err);
    }
}
