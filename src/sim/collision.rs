//! Body-body collision sweep
//!
//! Every ordered pair `(i, j)` with `i != j` is visited, so an overlapping
//! pair is seen from both sides in one sweep. After the first visit resolves
//! it the pair is separating, and `is_rebounding` skips the reciprocal visit.
//!
//! Fused bodies are only marked removed during the sweep; indices stay valid
//! until the world compacts afterwards.

use super::body::Body;
use super::state::World;
use crate::settings::WorldConfig;
use crate::{distance, magnitude};

/// What a sweep did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CollisionReport {
    pub bounced: usize,
    pub fused: usize,
}

/// Two distinct bodies borrowed mutably at once
fn pair_mut(bodies: &mut [Body], i: usize, j: usize) -> (&mut Body, &mut Body) {
    debug_assert!(i != j);
    if i < j {
        let (lo, hi) = bodies.split_at_mut(j);
        (&mut lo[i], &mut hi[0])
    } else {
        let (lo, hi) = bodies.split_at_mut(i);
        (&mut hi[0], &mut lo[j])
    }
}

/// Whether two bodies overlap and are not already moving apart
pub fn needs_resolution(a: &Body, b: &Body) -> bool {
    distance(a.pos, b.pos) < a.radius() + b.radius() && !a.is_rebounding(b)
}

/// Resolve every overlapping pair: fuse when absorption is on and the pair
/// closes faster than the threshold, bounce otherwise
pub fn resolve_collisions(world: &mut World, config: &WorldConfig) -> CollisionReport {
    let settings = &config.collision;
    let mut report = CollisionReport::default();
    if !settings.enabled {
        return report;
    }

    let n = world.bodies.len();
    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }
            if world.bodies[i].removed {
                break;
            }
            if world.bodies[j].removed {
                continue;
            }

            let (a, b) = pair_mut(&mut world.bodies, i, j);
            if !needs_resolution(a, b) {
                continue;
            }

            let closing_speed = magnitude(a.vel() - b.vel());
            if settings.absorb && closing_speed > settings.absorb_threshold {
                let (a_id, b_id) = (a.id(), b.id());
                let survivor = a.fuse(b, settings.color_blend, &mut world.rng);
                let (absorbed, mass) = if survivor == a_id {
                    (b_id, a.mass())
                } else {
                    (a_id, b.mass())
                };
                log::debug!("body {} absorbed body {}, mass now {:.1}", survivor, absorbed, mass);
                report.fused += 1;
            } else {
                a.bounce(b);
                report.bounced += 1;
            }
        }
    }

    world.compact();
    report
}
