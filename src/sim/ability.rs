//! Pointer-driven abilities
//!
//! An [`Ability`] is a closed set of effects with their parameters. The
//! dispatcher applies one at a point, and runs repeating abilities as
//! scheduled tasks that fire on a fixed interval until the pointer is
//! released or the task is cancelled.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Rgb;
use super::field::{FieldDirection, FieldParams};
use super::state::World;
use crate::distance;
use crate::settings::{AbilitySettings, WorldConfig};

/// Shortest interval a repeating task may run at (ms)
pub const MIN_INTERVAL_MS: f32 = 1.0;
/// Cap on catch-up firings in a single advance
pub const MAX_FIRES_PER_ADVANCE: u32 = 8;

/// Ability names as they appear in settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityKind {
    Push,
    Pull,
    Split,
    Generate,
    Delete,
    Color,
    None,
}

impl AbilityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AbilityKind::Push => "push",
            AbilityKind::Pull => "pull",
            AbilityKind::Split => "split",
            AbilityKind::Generate => "generate",
            AbilityKind::Delete => "delete",
            AbilityKind::Color => "color",
            AbilityKind::None => "none",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "push" => Some(AbilityKind::Push),
            "pull" => Some(AbilityKind::Pull),
            "split" => Some(AbilityKind::Split),
            "generate" | "spawn" => Some(AbilityKind::Generate),
            "delete" => Some(AbilityKind::Delete),
            "color" | "colour" | "recolor" => Some(AbilityKind::Color),
            "none" | "" => Some(AbilityKind::None),
            _ => None,
        }
    }

    /// Whether holding the pointer keeps re-applying this ability by default.
    /// Split and generate would otherwise feed on their own output.
    pub fn repeats_by_default(&self) -> bool {
        matches!(
            self,
            AbilityKind::Push | AbilityKind::Pull | AbilityKind::Delete | AbilityKind::Color
        )
    }
}

/// Recolor target
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorChoice {
    Fixed(Rgb),
    /// A fresh random color per body
    Random,
}

/// A typed ability with its parameters
#[derive(Debug, Clone, PartialEq)]
pub enum Ability {
    /// Push or pull, per the field's direction
    Field(FieldParams),
    /// Split up to `max_targets` bodies near the point into `count` children
    Split {
        radius: f32,
        max_targets: usize,
        count: usize,
        speed: f32,
    },
    /// Spawn `count` random bodies at the point
    Generate { count: usize, speed: f32 },
    /// Remove every body touching the point within `radius`
    Delete { radius: f32 },
    Recolor { radius: f32, color: ColorChoice },
    None,
}

impl Ability {
    pub fn kind(&self) -> AbilityKind {
        match self {
            Ability::Field(field) => match field.direction {
                FieldDirection::Push => AbilityKind::Push,
                FieldDirection::Pull => AbilityKind::Pull,
            },
            Ability::Split { .. } => AbilityKind::Split,
            Ability::Generate { .. } => AbilityKind::Generate,
            Ability::Delete { .. } => AbilityKind::Delete,
            Ability::Recolor { .. } => AbilityKind::Color,
            Ability::None => AbilityKind::None,
        }
    }

    /// Apply at `point`. Returns the number of bodies affected (created, for
    /// generate).
    pub fn apply(&self, world: &mut World, config: &WorldConfig, point: Vec2) -> usize {
        let affected = match self {
            Ability::Field(field) => field.apply(&mut world.bodies, point),
            Ability::Generate { count, speed } => {
                for _ in 0..*count {
                    world.spawn_random(&config.spawn, Some(point), Some(*speed));
                }
                *count
            }
            Ability::Delete { radius } => {
                let mut deleted = 0;
                for body in world.bodies.iter_mut().filter(|b| !b.removed) {
                    if body.contains(point, *radius) {
                        body.removed = true;
                        deleted += 1;
                    }
                }
                world.compact();
                deleted
            }
            Ability::Split {
                radius,
                max_targets,
                count,
                speed,
            } => split_near(world, config, point, *radius, *max_targets, *count, *speed),
            Ability::Recolor { radius, color } => {
                let rng = &mut world.rng;
                let mut recolored = 0;
                for body in world.bodies.iter_mut().filter(|b| !b.removed) {
                    if body.contains(point, *radius) {
                        body.color = match color {
                            ColorChoice::Fixed(c) => *c,
                            ColorChoice::Random => Rgb::random(&mut *rng),
                        };
                        recolored += 1;
                    }
                }
                recolored
            }
            Ability::None => 0,
        };

        log::debug!(
            "{} at ({:.1}, {:.1}) affected {} bodies",
            self.kind().as_str(),
            point.x,
            point.y,
            affected
        );
        affected
    }
}

/// Split the closest bodies touching `point`; parents are always removed
fn split_near(
    world: &mut World,
    config: &WorldConfig,
    point: Vec2,
    radius: f32,
    max_targets: usize,
    count: usize,
    speed: f32,
) -> usize {
    if count == 0 {
        log::warn!("split with zero children ignored");
        return 0;
    }

    let mut targets: Vec<(usize, f32)> = world
        .bodies
        .iter()
        .enumerate()
        .filter(|(_, b)| !b.removed && b.contains(point, radius))
        .map(|(i, b)| (i, distance(b.pos, point)))
        .collect();
    targets.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    targets.truncate(max_targets);

    let mut children = Vec::new();
    for &(idx, _) in &targets {
        let parent = &mut world.bodies[idx];
        let made = parent.split(count, speed, config.split_min_radius, &mut world.rng);
        log::debug!(
            "split body {} (mass {:.1}) into {} of {} children",
            parent.id(),
            parent.mass(),
            made.len(),
            count
        );
        parent.removed = true;
        children.extend(made);
    }

    world.compact();
    for child in children {
        world.insert(child);
    }
    targets.len()
}

/// Where the pointer is and whether it is still down
pub trait PointerSource {
    fn position(&self) -> Vec2;
    fn is_held(&self) -> bool;
}

/// Plain pointer state, updated by the input layer
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pointer {
    pub pos: Vec2,
    pub held: bool,
}

impl PointerSource for Pointer {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn is_held(&self) -> bool {
        self.held
    }
}

/// Pointer backed by a coordinate getter and a liveness predicate
pub struct FnPointer<P, H> {
    pub position: P,
    pub held: H,
}

impl<P, H> PointerSource for FnPointer<P, H>
where
    P: Fn() -> Vec2,
    H: Fn() -> bool,
{
    fn position(&self) -> Vec2 {
        (self.position)()
    }

    fn is_held(&self) -> bool {
        (self.held)()
    }
}

/// Identifies a scheduled repeating ability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u32);

/// A repeating ability: fires once on the first advance, then every
/// `interval_ms` while the pointer is held
#[derive(Debug, Clone)]
struct RepeatTask {
    handle: TaskHandle,
    ability: Ability,
    interval_ms: f32,
    elapsed_ms: f32,
    started: bool,
}

/// Applies abilities and runs the repeating ones
#[derive(Debug, Default)]
pub struct AbilityDispatcher {
    tasks: Vec<RepeatTask>,
    next_handle: u32,
}

impl AbilityDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an ability once at `(x, y)`
    pub fn invoke(
        &self,
        world: &mut World,
        config: &WorldConfig,
        ability: &Ability,
        x: f32,
        y: f32,
    ) -> usize {
        ability.apply(world, config, Vec2::new(x, y))
    }

    /// Apply a named ability with default parameters; unknown names are a no-op
    pub fn invoke_by_name(
        &self,
        world: &mut World,
        config: &WorldConfig,
        name: &str,
        x: f32,
        y: f32,
    ) -> usize {
        let ability = AbilitySettings::named(name).to_ability();
        self.invoke(world, config, &ability, x, y)
    }

    /// Pointer went down: apply once, or schedule if the ability repeats.
    /// Scheduled tasks fire their first application on the next advance.
    pub fn pointer_down(
        &mut self,
        world: &mut World,
        config: &WorldConfig,
        settings: &AbilitySettings,
        pointer: &dyn PointerSource,
    ) -> Option<TaskHandle> {
        let ability = settings.to_ability();
        if ability == Ability::None {
            return None;
        }
        if settings.repeats {
            Some(self.repeat_while(ability, settings.interval_ms))
        } else {
            let pos = pointer.position();
            self.invoke(world, config, &ability, pos.x, pos.y);
            None
        }
    }

    /// Schedule `ability` to fire every `interval_ms` while the pointer is held
    pub fn repeat_while(&mut self, ability: Ability, interval_ms: f32) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;
        let interval_ms = interval_ms.max(MIN_INTERVAL_MS);
        log::debug!(
            "scheduled repeating {} every {:.1} ms",
            ability.kind().as_str(),
            interval_ms
        );
        self.tasks.push(RepeatTask {
            handle,
            ability,
            interval_ms,
            elapsed_ms: 0.0,
            started: false,
        });
        handle
    }

    /// Stop a task; returns false if it already ended
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.handle != handle);
        let cancelled = self.tasks.len() != before;
        if cancelled {
            log::debug!("cancelled repeating task {:?}", handle);
        }
        cancelled
    }

    pub fn cancel_all(&mut self) {
        self.tasks.clear();
    }

    pub fn is_active(&self, handle: TaskHandle) -> bool {
        self.tasks.iter().any(|t| t.handle == handle)
    }

    pub fn active_tasks(&self) -> usize {
        self.tasks.len()
    }

    /// Let `elapsed_ms` pass. Due tasks fire at the pointer's current
    /// position. The pointer is checked before every application and a
    /// released pointer ends every task.
    pub fn advance(
        &mut self,
        world: &mut World,
        config: &WorldConfig,
        elapsed_ms: f32,
        pointer: &dyn PointerSource,
    ) {
        if self.tasks.is_empty() {
            return;
        }
        let mut released = !pointer.is_held();

        for task in &mut self.tasks {
            if released {
                break;
            }
            let mut fires = 0;
            if !task.started {
                task.started = true;
                fires += 1;
            } else {
                task.elapsed_ms += elapsed_ms;
            }
            while task.elapsed_ms >= task.interval_ms && fires < MAX_FIRES_PER_ADVANCE {
                task.elapsed_ms -= task.interval_ms;
                fires += 1;
            }
            // Drop backlog we refused to catch up on
            if fires == MAX_FIRES_PER_ADVANCE {
                task.elapsed_ms = task.elapsed_ms.min(task.interval_ms);
            }
            for _ in 0..fires {
                if !pointer.is_held() {
                    released = true;
                    break;
                }
                task.ability.apply(world, config, pointer.position());
            }
        }

        if released {
            log::debug!("pointer released, ending {} repeating tasks", self.tasks.len());
            self.tasks.clear();
        }
    }
}
