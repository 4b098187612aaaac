/*
 * Boid Module
 *
 * This module defines the Boid struct and its behavior.
 * Each step a boid applies four steering rules, in this order:
 * 1. Edge avoidance: turn back when outside the inner margin rectangle
 * 2. Separation: push away from boids inside the protected range
 * 3. Alignment: match the average velocity of visible neighbours
 * 4. Cohesion: steer towards the average position of visible neighbours
 *
 * Later rules see the velocity already changed by earlier ones. Speed is
 * clamped once, after all four, and then the position is integrated.
 *
 * Perception is a distance test plus a cone test. The cone is centred on
 * the world +x axis, not on the boid's heading.
 */

use std::sync::Arc;

use nannou::prelude::*;

use crate::flock::FlockId;
use crate::math::{clamp_speed, normalize_or_none, within_cone};
use crate::params::{BehaviorConfig, Boundary};

/// Perception values derived once from a [`BehaviorConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perception {
    pub vision_radius_sq: f32,
    pub protected_radius_sq: f32,
    /// Radians.
    pub half_vision_angle: f32,
}

impl Perception {
    pub fn from_config(config: &BehaviorConfig) -> Self {
        Self {
            vision_radius_sq: config.vision_distance * config.vision_distance,
            protected_radius_sq: config.protected_distance * config.protected_distance,
            half_vision_angle: (config.vision_angle_degrees / 2.0).to_radians(),
        }
    }
}

/// Candidate neighbours for each rule that reads other boids.
#[derive(Debug, Clone, Copy)]
pub struct Neighbors<'a> {
    pub separation: &'a [Boid],
    pub alignment: &'a [Boid],
    pub cohesion: &'a [Boid],
}

impl<'a> Neighbors<'a> {
    /// Separation reads `population`, alignment and cohesion read `social`.
    pub fn new(population: &'a [Boid], social: &'a [Boid]) -> Self {
        Self {
            separation: population,
            alignment: social,
            cohesion: social,
        }
    }

    pub fn uniform(boids: &'a [Boid]) -> Self {
        Self::new(boids, boids)
    }
}

#[derive(Clone, Debug)]
pub struct Boid {
    id: usize,
    position: Point2,
    velocity: Vec2,
    // Unit vector of the last non-zero velocity
    heading: Vec2,
    pub size: f32,
    pub selected: bool,
    flock: Option<FlockId>,
    config: Arc<BehaviorConfig>,
    perception: Perception,
    boundary: Boundary,
}

impl Boid {
    pub fn new(
        id: usize,
        position: Point2,
        velocity: Vec2,
        config: Arc<BehaviorConfig>,
        boundary: Boundary,
    ) -> Self {
        let heading = normalize_or_none(velocity).unwrap_or(Vec2::X);
        let velocity = clamp_speed(velocity, heading, config.min_speed, config.max_speed);

        Self {
            id,
            position,
            velocity,
            heading,
            size: config.size,
            selected: false,
            flock: None,
            perception: Perception::from_config(&config),
            config,
            boundary,
        }
    }

    pub fn with_flock(mut self, flock: FlockId) -> Self {
        self.flock = Some(flock);
        self
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn position(&self) -> Point2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn heading(&self) -> Vec2 {
        self.heading
    }

    // Orientation used by the renderer, in radians
    pub fn heading_angle(&self) -> f32 {
        self.velocity.y.atan2(self.velocity.x)
    }

    pub fn flock(&self) -> Option<FlockId> {
        self.flock
    }

    pub fn config(&self) -> &Arc<BehaviorConfig> {
        &self.config
    }

    pub fn perception(&self) -> Perception {
        self.perception
    }

    pub fn boundary(&self) -> Boundary {
        self.boundary
    }

    /// Swap in a new shared configuration and refresh the cached perception.
    pub fn set_config(&mut self, config: Arc<BehaviorConfig>) {
        self.perception = Perception::from_config(&config);
        self.size = config.size;
        self.config = config;
    }

    pub fn set_boundary(&mut self, boundary: Boundary) {
        self.boundary = boundary;
    }

    // Axis-aligned box centred on the boid with side 2 * size
    pub fn bounding_box(&self) -> Rect {
        Rect::from_x_y_w_h(
            self.position.x,
            self.position.y,
            self.size * 2.0,
            self.size * 2.0,
        )
    }

    pub fn hit_test(&self, point: Point2) -> bool {
        (point.x - self.position.x).abs() <= self.size
            && (point.y - self.position.y).abs() <= self.size
    }

    // velocity += force * dt, no speed clamp
    pub fn apply_force(&mut self, force: Vec2, dt: f32) {
        self.velocity += force * dt;
    }

    /// Advance one step: separation reads `population`, alignment and
    /// cohesion read `social`.
    pub fn update(&mut self, population: &[Boid], social: &[Boid], dt: f32) {
        self.update_with(Neighbors::new(population, social), dt);
    }

    pub fn update_with(&mut self, neighbors: Neighbors<'_>, dt: f32) {
        let edge = self.edge_force();
        self.apply_force(edge, dt);

        let separation = self.separation_force(neighbors.separation);
        self.apply_force(separation, dt);

        let alignment = self.alignment_force(neighbors.alignment);
        self.apply_force(alignment, dt);

        let cohesion = self.cohesion_force(neighbors.cohesion);
        self.apply_force(cohesion, dt);

        self.velocity = clamp_speed(
            self.velocity,
            self.heading,
            self.config.min_speed,
            self.config.max_speed,
        );
        if let Some(heading) = normalize_or_none(self.velocity) {
            self.heading = heading;
        }

        self.position += self.velocity * dt;
    }

    /// Distance and cone test against `other`. A boid never perceives itself.
    pub fn perceives(&self, other: &Boid, range_sq: f32) -> bool {
        if other.id == self.id {
            return false;
        }
        let offset = other.position - self.position;
        offset.length_squared() <= range_sq
            && within_cone(offset, self.perception.half_vision_angle)
    }

    // Constant push back towards the interior, per violated axis
    pub fn edge_force(&self) -> Vec2 {
        if self.boundary.contains(self.position.x, self.position.y) {
            return Vec2::ZERO;
        }

        let turn = self.config.turn_gain;
        let mut force = Vec2::ZERO;

        if self.position.x < self.boundary.left {
            force.x += turn;
        }
        if self.position.x > self.boundary.right {
            force.x -= turn;
        }
        if self.position.y < self.boundary.bottom {
            force.y += turn;
        }
        if self.position.y > self.boundary.top {
            force.y -= turn;
        }

        force
    }

    /// Sum of `separation_gain / d²` pushes away from every boid perceived
    /// inside the protected range. Coincident boids contribute nothing.
    pub fn separation_force(&self, candidates: &[Boid]) -> Vec2 {
        let gain = self.config.separation_gain;
        let mut force = Vec2::ZERO;

        for other in candidates {
            if !self.perceives(other, self.perception.protected_radius_sq) {
                continue;
            }

            let away = self.position - other.position;
            let distance_sq = away.length_squared();
            if distance_sq == 0.0 {
                continue;
            }

            force += away / distance_sq.sqrt() * (gain / distance_sq);
        }

        force
    }

    pub fn alignment_force(&self, candidates: &[Boid]) -> Vec2 {
        let mut velocity_sum = Vec2::ZERO;
        let mut count = 0;

        for other in candidates {
            if self.perceives(other, self.perception.vision_radius_sq) {
                velocity_sum += other.velocity;
                count += 1;
            }
        }

        if count == 0 {
            return Vec2::ZERO;
        }

        let average = velocity_sum / count as f32;
        (average - self.velocity) * self.config.alignment_gain
    }

    pub fn cohesion_force(&self, candidates: &[Boid]) -> Vec2 {
        let mut position_sum = Vec2::ZERO;
        let mut count = 0;

        for other in candidates {
            if self.perceives(other, self.perception.vision_radius_sq) {
                position_sum += other.position;
                count += 1;
            }
        }

        if count == 0 {
            return Vec2::ZERO;
        }

        let centre = position_sum / count as f32;
        // Centre on top of us: no direction to steer in
        normalize_or_none(centre - self.position)
            .map(|direction| direction * self.config.cohesion_gain)
            .unwrap_or(Vec2::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::BehaviorParams;

    fn open_world() -> Boundary {
        Boundary {
            left: -1.0e6,
            right: 1.0e6,
            bottom: -1.0e6,
            top: 1.0e6,
        }
    }

    fn config(params: BehaviorParams) -> Arc<BehaviorConfig> {
        Arc::new(BehaviorConfig::new(params).unwrap())
    }

    fn free_params() -> BehaviorParams {
        BehaviorParams {
            min_speed: 0.0,
            max_speed: 100.0,
            size: 5.0,
            separation_gain: 0.0,
            alignment_gain: 0.0,
            cohesion_gain: 0.0,
            turn_gain: 0.0,
            vision_angle_degrees: 360.0,
            vision_distance: 50.0,
            protected_distance: 20.0,
        }
    }

    fn boid(id: usize, pos: Point2, vel: Vec2, cfg: &Arc<BehaviorConfig>) -> Boid {
        Boid::new(id, pos, vel, cfg.clone(), open_world())
    }

    #[test]
    fn construction_clamps_initial_velocity() {
        let cfg = config(BehaviorParams {
            min_speed: 1.0,
            max_speed: 2.0,
            ..free_params()
        });
        let b = boid(0, pt2(0.0, 0.0), vec2(10.0, 0.0), &cfg);
        assert!((b.velocity().length() - 2.0).abs() < 1e-6);

        let still = boid(1, pt2(0.0, 0.0), Vec2::ZERO, &cfg);
        assert_eq!(still.velocity(), vec2(1.0, 0.0));
    }

    #[test]
    fn perception_is_cached_from_config() {
        let cfg = config(BehaviorParams {
            vision_angle_degrees: 180.0,
            ..free_params()
        });
        let p = boid(0, pt2(0.0, 0.0), Vec2::ZERO, &cfg).perception();
        assert_eq!(p.vision_radius_sq, 2500.0);
        assert_eq!(p.protected_radius_sq, 400.0);
        assert!((p.half_vision_angle - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn apply_force_does_not_clamp() {
        let cfg = config(BehaviorParams {
            max_speed: 1.0,
            ..free_params()
        });
        let mut b = boid(0, pt2(0.0, 0.0), Vec2::ZERO, &cfg);
        b.apply_force(vec2(5.0, 0.0), 2.0);
        assert_eq!(b.velocity(), vec2(10.0, 0.0));
    }

    #[test]
    fn never_perceives_itself() {
        let cfg = config(free_params());
        let b = boid(3, pt2(0.0, 0.0), Vec2::ZERO, &cfg);
        assert!(!b.perceives(&b.clone(), f32::MAX));
    }

    #[test]
    fn cone_ignores_own_heading() {
        // Cone of +-45 degrees around +x; the boid flies towards -x
        let cfg = config(BehaviorParams {
            vision_angle_degrees: 90.0,
            ..free_params()
        });
        let a = boid(0, pt2(0.0, 0.0), vec2(-1.0, 0.0), &cfg);
        let ahead_in_world_x = boid(1, pt2(10.0, 0.0), Vec2::ZERO, &cfg);
        let along_heading = boid(2, pt2(-10.0, 0.0), Vec2::ZERO, &cfg);
        assert!(a.perceives(&ahead_in_world_x, 2500.0));
        assert!(!a.perceives(&along_heading, 2500.0));
    }

    #[test]
    fn edge_force_handles_corners() {
        let cfg = config(BehaviorParams {
            turn_gain: 0.5,
            ..free_params()
        });
        let boundary = Boundary {
            left: -10.0,
            right: 10.0,
            bottom: -10.0,
            top: 10.0,
        };
        let corner = Boid::new(0, pt2(20.0, -20.0), Vec2::ZERO, cfg.clone(), boundary);
        assert_eq!(corner.edge_force(), vec2(-0.5, 0.5));

        let inside = Boid::new(1, pt2(0.0, 0.0), Vec2::ZERO, cfg.clone(), boundary);
        assert_eq!(inside.edge_force(), Vec2::ZERO);

        // The rectangle is closed: sitting on its edge is still inside
        let on_edge = Boid::new(2, pt2(10.0, -10.0), Vec2::ZERO, cfg, boundary);
        assert_eq!(on_edge.edge_force(), Vec2::ZERO);
    }

    #[test]
    fn separation_skips_coincident_boids() {
        let cfg = config(BehaviorParams {
            separation_gain: 10.0,
            ..free_params()
        });
        let a = boid(0, pt2(5.0, 5.0), Vec2::ZERO, &cfg);
        let b = boid(1, pt2(5.0, 5.0), Vec2::ZERO, &cfg);
        let force = a.separation_force(&[b]);
        assert_eq!(force, Vec2::ZERO);
        assert!(force.x.is_finite() && force.y.is_finite());
    }

    #[test]
    fn separation_is_inverse_square() {
        let cfg = config(BehaviorParams {
            separation_gain: 100.0,
            ..free_params()
        });
        let a = boid(0, pt2(0.0, 0.0), Vec2::ZERO, &cfg);
        let near = boid(1, pt2(0.0, 5.0), Vec2::ZERO, &cfg);
        let force = a.separation_force(&[near]);
        assert!((force - vec2(0.0, -4.0)).length() < 1e-5);
    }

    #[test]
    fn alignment_steers_towards_average_velocity() {
        let cfg = config(BehaviorParams {
            alignment_gain: 0.5,
            ..free_params()
        });
        let a = boid(0, pt2(0.0, 0.0), vec2(1.0, 0.0), &cfg);
        let n1 = boid(1, pt2(10.0, 0.0), vec2(0.0, 2.0), &cfg);
        let n2 = boid(2, pt2(0.0, 10.0), vec2(0.0, 4.0), &cfg);
        let force = a.alignment_force(&[n1, n2]);
        // average (0, 3) minus own (1, 0), halved
        assert!((force - vec2(-0.5, 1.5)).length() < 1e-6);
    }

    #[test]
    fn cohesion_ignores_centre_on_self() {
        let cfg = config(BehaviorParams {
            cohesion_gain: 1.0,
            ..free_params()
        });
        let a = boid(0, pt2(0.0, 0.0), Vec2::ZERO, &cfg);
        let left = boid(1, pt2(-10.0, 0.0), Vec2::ZERO, &cfg);
        let right = boid(2, pt2(10.0, 0.0), Vec2::ZERO, &cfg);
        assert_eq!(a.cohesion_force(&[left, right]), Vec2::ZERO);
    }

    #[test]
    fn update_keeps_last_heading_when_velocity_cancels() {
        // Alignment with gain 1 cancels the velocity exactly; min_speed must
        // then be restored along the previous heading
        let cfg = config(BehaviorParams {
            min_speed: 0.5,
            max_speed: 2.0,
            alignment_gain: 1.0,
            ..free_params()
        });
        let mut a = boid(0, pt2(0.0, 0.0), vec2(0.0, 1.0), &cfg);
        let still = boid(1, pt2(5.0, 0.0), vec2(0.5, 0.0), &cfg);
        let counter = boid(2, pt2(0.0, 5.0), vec2(-0.5, 0.0), &cfg);
        a.update(&[], &[still, counter], 1.0);
        assert!((a.velocity() - vec2(0.0, 0.5)).length() < 1e-6);
        assert!((a.position() - pt2(0.0, 0.5)).length() < 1e-6);
    }

    #[test]
    fn set_config_refreshes_perception() {
        let cfg = config(free_params());
        let mut b = boid(0, pt2(0.0, 0.0), Vec2::ZERO, &cfg);
        b.set_config(config(BehaviorParams {
            vision_distance: 10.0,
            protected_distance: 5.0,
            size: 9.0,
            ..free_params()
        }));
        assert_eq!(b.perception().vision_radius_sq, 100.0);
        assert_eq!(b.size, 9.0);
    }

    #[test]
    fn hit_test_uses_bounding_box() {
        let cfg = config(free_params());
        let b = boid(0, pt2(10.0, 10.0), Vec2::ZERO, &cfg);
        assert!(b.hit_test(pt2(14.0, 6.0)));
        assert!(b.hit_test(pt2(15.0, 15.0)));
        assert!(!b.hit_test(pt2(15.5, 10.0)));
        assert_eq!(b.bounding_box().w(), 10.0);
    }
}
