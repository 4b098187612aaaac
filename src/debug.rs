/*
 * Debug Information Module
 *
 * This module defines the DebugInfo struct shown in the UI, and
 * PopulationStats, a summary of the flock used by the UI and by the
 * headless runner's log output.
 */

use std::time::Duration;

use nannou::prelude::*;

use crate::flock::Population;

// Debug information to display
#[derive(Debug, Default, Clone)]
pub struct DebugInfo {
    pub fps: f32,
    pub frame_time: Duration,
    pub last_step_ms: f32,
    pub steps: u64,
    pub selected_boid_index: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopulationStats {
    pub count: usize,
    pub mean_speed: f32,
    pub centroid: Point2,
    /// Length of the mean unit heading: 1 when every boid flies the same
    /// way, near 0 when headings cancel out.
    pub polarization: f32,
}

impl DebugInfo {
    pub fn frame_time_ms(&self) -> f32 {
        self.frame_time.as_secs_f32() * 1000.0
    }
}

impl PopulationStats {
    pub fn measure(population: &Population) -> Self {
        let count = population.len();
        if count == 0 {
            return Self {
                count,
                mean_speed: 0.0,
                centroid: Point2::ZERO,
                polarization: 0.0,
            };
        }

        let mut speed_sum = 0.0;
        let mut position_sum = Vec2::ZERO;
        let mut heading_sum = Vec2::ZERO;
        for boid in population.iter() {
            speed_sum += boid.velocity().length();
            position_sum += boid.position();
            heading_sum += boid.heading();
        }

        let n = count as f32;
        Self {
            count,
            mean_speed: speed_sum / n,
            centroid: position_sum / n,
            polarization: (heading_sum / n).length(),
        }
    }
}
