//! Per-frame simulation step
//!
//! One call per display frame: integrate every body, drop the ones that
//! died doing so, then resolve collisions. The body list is left compacted
//! and ready to draw.

use super::collision::{CollisionReport, resolve_collisions};
use super::state::World;
use crate::settings::WorldConfig;

/// What a step did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepReport {
    /// Bodies removed by the wall policy or the non-finite guard
    pub culled: usize,
    pub collisions: CollisionReport,
}

/// Advance the world by one frame
pub fn step(world: &mut World, config: &WorldConfig) -> StepReport {
    world.time_ticks += 1;

    let bounds = world.bounds;
    for body in world.bodies.iter_mut() {
        body.integrate(config, bounds);
    }
    let culled = world.compact();

    let collisions = resolve_collisions(world, config);

    log::trace!(
        "tick {}: {} bodies, {} culled, {} bounced, {} fused",
        world.time_ticks,
        world.bodies.len(),
        culled,
        collisions.bounced,
        collisions.fused
    );

    StepReport { culled, collisions }
}

impl World {
    /// Advance by one frame; see [`step`]
    pub fn step(&mut self, config: &WorldConfig) -> StepReport {
        step(self, config)
    }
}
