/*
 * Flock Module
 *
 * A Population is the full set of boids sharing one world, optionally
 * partitioned into flocks. Each boid belongs to at most one flock.
 */

use std::collections::HashMap;
use std::sync::Arc;

use nannou::prelude::*;

use crate::boid::Boid;
use crate::params::{BehaviorConfig, Boundary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlockId(pub u16);

#[derive(Debug, Clone, Default)]
pub struct Population {
    pub boids: Vec<Boid>,
}

impl Population {
    pub fn new(boids: Vec<Boid>) -> Self {
        Self { boids }
    }

    pub fn len(&self) -> usize {
        self.boids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boids.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Boid> {
        self.boids.iter()
    }

    /// Members of each flock, in population order. Boids without a flock
    /// are left out.
    pub fn flocks(&self) -> HashMap<FlockId, Vec<Boid>> {
        group_by_flock(&self.boids)
    }

    /// Share a new configuration with every boid.
    pub fn set_config(&mut self, config: Arc<BehaviorConfig>) {
        log::debug!("Applying new behavior config to {} boids", self.boids.len());
        for boid in &mut self.boids {
            boid.set_config(config.clone());
        }
    }

    pub fn set_boundary(&mut self, boundary: Boundary) {
        for boid in &mut self.boids {
            boid.set_boundary(boundary);
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.boids.iter().position(|boid| boid.selected)
    }

    /// Hit-test `point` against every boid's bounding box and update the
    /// selection. At most one boid is selected afterwards: a hit on an
    /// unselected boid selects it, a hit on the selected boid clears it,
    /// and a miss clears everything. Returns the selected index.
    pub fn select_at(&mut self, point: Point2) -> Option<usize> {
        let hit = self.boids.iter().position(|boid| boid.hit_test(point));
        let previous = self.selected();

        for boid in &mut self.boids {
            boid.selected = false;
        }

        match hit {
            Some(index) if previous != Some(index) => {
                self.boids[index].selected = true;
                Some(index)
            }
            _ => None,
        }
    }
}

pub(crate) fn group_by_flock(boids: &[Boid]) -> HashMap<FlockId, Vec<Boid>> {
    let mut groups: HashMap<FlockId, Vec<Boid>> = HashMap::new();
    for boid in boids {
        if let Some(flock) = boid.flock() {
            groups.entry(flock).or_default().push(boid.clone());
        }
    }
    groups
}
