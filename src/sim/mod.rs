//! Simulation core
//!
//! Everything that mutates bodies lives here. Nothing in this module knows
//! about rendering, input devices or storage:
//! - `body`: the ball, its integration and pairwise responses
//! - `field`: push/pull force laws
//! - `collision`: the all-pairs bounce-or-fuse sweep
//! - `state`: the world that owns the bodies
//! - `tick`: the per-frame step
//! - `ability`: pointer abilities and the repeat scheduler

pub mod ability;
pub mod body;
pub mod collision;
pub mod field;
pub mod state;
pub mod tick;

pub use ability::{
    Ability, AbilityDispatcher, AbilityKind, ColorChoice, FnPointer, Pointer, PointerSource,
    TaskHandle,
};
pub use body::{Body, Rgb, mass_to_radius};
pub use collision::{CollisionReport, resolve_collisions};
pub use field::{FieldDirection, FieldMode, FieldParams, ForceLaw};
pub use state::{Bounds, RenderBody, World, WorldStats};
pub use tick::{StepReport, step};
