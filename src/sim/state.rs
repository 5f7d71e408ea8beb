//! World state
//!
//! The world exclusively owns the body collection. Removal is two-phase:
//! operations mark a body `removed` (O(1), safe mid-sweep) and the world
//! compacts the collection once the pass is over.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::{Body, Rgb};
use crate::polar_to_cartesian;
use crate::settings::SpawnSettings;

/// World extent. Updated on viewport resize, read every tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// What a renderer needs to draw one body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderBody {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Aggregate quantities, mostly for logging and tests
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WorldStats {
    pub bodies: usize,
    pub total_mass: f32,
    pub total_momentum: Vec2,
    pub kinetic_energy: f32,
}

/// The simulated world
#[derive(Debug, Clone)]
pub struct World {
    /// Seed the RNG was created from
    pub seed: u64,
    pub bounds: Bounds,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub(crate) bodies: Vec<Body>,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl World {
    /// Create an empty world with the given seed
    pub fn new(bounds: Bounds, seed: u64) -> Self {
        Self {
            seed,
            bounds,
            time_ticks: 0,
            bodies: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new body ID
    fn next_body_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Insert a body, returning its assigned ID
    pub fn insert(&mut self, mut body: Body) -> u32 {
        let id = self.next_body_id();
        body.id = id;
        body.removed = false;
        self.bodies.push(body);
        id
    }

    /// Index of a live body. Ids are handed out in increasing order and
    /// compaction keeps order, so the collection stays sorted by id.
    fn index_of(&self, id: u32) -> Option<usize> {
        self.bodies
            .binary_search_by_key(&id, |b| b.id)
            .ok()
            .filter(|&i| !self.bodies[i].removed)
    }

    /// Mark a body for removal; dropped at the next compaction.
    ///
    /// Lookup by id is O(log n). Passes that already hold the body flip
    /// `removed` directly.
    pub fn remove(&mut self, id: u32) -> bool {
        match self.index_of(id) {
            Some(i) => {
                self.bodies[i].removed = true;
                true
            }
            None => false,
        }
    }

    /// Drop every body marked for removal, keeping the order of the rest
    pub fn compact(&mut self) -> usize {
        let before = self.bodies.len();
        self.bodies.retain(|b| !b.removed);
        let dropped = before - self.bodies.len();
        if dropped > 0 {
            log::trace!("compacted {} bodies, {} left", dropped, self.bodies.len());
        }
        dropped
    }

    /// Live bodies
    pub fn bodies(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter().filter(|b| !b.removed)
    }

    pub fn body(&self, id: u32) -> Option<&Body> {
        self.index_of(id).map(|i| &self.bodies[i])
    }

    pub fn body_mut(&mut self, id: u32) -> Option<&mut Body> {
        self.index_of(id).map(|i| &mut self.bodies[i])
    }

    pub fn len(&self) -> usize {
        self.bodies().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.bodies.clear();
    }

    /// Viewport changed; only the bounds move
    pub fn resize(&mut self, width: f32, height: f32) {
        self.bounds = Bounds::new(width, height);
    }

    /// Snapshot for drawing
    pub fn render_bodies(&self) -> Vec<RenderBody> {
        self.bodies()
            .map(|body| {
                let [r, g, b] = body.color.to_u8();
                RenderBody {
                    x: body.pos.x,
                    y: body.pos.y,
                    radius: body.radius(),
                    r,
                    g,
                    b,
                }
            })
            .collect()
    }

    pub fn stats(&self) -> WorldStats {
        self.bodies().fold(WorldStats::default(), |mut s, b| {
            s.bodies += 1;
            s.total_mass += b.mass();
            s.total_momentum += b.momentum();
            s.kinetic_energy += b.kinetic_energy();
            s
        })
    }

    /// Spawn a random body, kept one radius inside the bounds. `at` pins the
    /// position, `speed` replaces the per-axis random velocity with a random
    /// heading at that speed.
    pub fn spawn_random(
        &mut self,
        spawn: &SpawnSettings,
        at: Option<Vec2>,
        speed: Option<f32>,
    ) -> u32 {
        let radius = if spawn.radius_max > spawn.radius_min {
            self.rng.random_range(spawn.radius_min..=spawn.radius_max)
        } else {
            spawn.radius_min
        };

        let pos = at.unwrap_or_else(|| {
            let x = random_within(&mut self.rng, radius, self.bounds.width - radius);
            let y = random_within(&mut self.rng, radius, self.bounds.height - radius);
            Vec2::new(x, y)
        });

        let vel = match speed {
            Some(speed) => {
                let heading: f32 = self.rng.random_range(0.0..std::f32::consts::TAU);
                polar_to_cartesian(speed, heading)
            }
            None => {
                let max = spawn.max_speed;
                Vec2::new(
                    random_within(&mut self.rng, -max, max),
                    random_within(&mut self.rng, -max, max),
                )
            }
        };

        let color = Rgb::random(&mut self.rng);
        self.insert(Body::new(pos, vel, radius, color))
    }

    /// Seed the world with `spawn.count` random bodies
    pub fn populate(&mut self, spawn: &SpawnSettings) {
        for _ in 0..spawn.count {
            self.spawn_random(spawn, None, None);
        }
        log::debug!("populated world with {} bodies", spawn.count);
    }
}

/// Uniform in `[lo, hi]`, or `lo` when the range is empty
fn random_within(rng: &mut Pcg32, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.random_range(lo..=hi) } else { lo }
}
