//! Ball Fusion - a 2D particle playground
//!
//! Core modules:
//! - `sim`: Simulation core (bodies, force fields, collisions, world, abilities)
//! - `settings`: World configuration and ability descriptors
//! - `error`: Config parsing errors
//!
//! Rendering, input plumbing and config persistence live outside the crate. The
//! core only consumes an explicit [`settings::WorldConfig`] and a pointer
//! position, and hands back a drawable body list.

pub mod error;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use settings::{AbilitySettings, WorldConfig};

use glam::Vec2;

/// Simulation constants
pub mod consts {
    /// Nominal display refresh the step is tuned for
    pub const FRAME_MS: f32 = 1000.0 / 60.0;

    /// Stand-in for an exact zero in divisions (unit vectors, force-law distances)
    pub const EPSILON: f32 = 0.0001;

    /// Velocity component below which friction stops a body outright
    pub const REST_SPEED: f32 = 0.01;

    /// Population defaults
    pub const SPAWN_COUNT: usize = 10;
    pub const SPAWN_RADIUS_MIN: f32 = 10.0;
    pub const SPAWN_RADIUS_MAX: f32 = 30.0;
    pub const SPAWN_MAX_SPEED: f32 = 7.0;

    /// Split children below this radius are not created
    pub const SPLIT_MIN_RADIUS: f32 = 1.0;
}

/// Distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (a - b).length()
}

/// Heading from `from` to `to` in radians (`atan2(dy, dx)`)
#[inline]
pub fn angle(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Length of a vector
#[inline]
pub fn magnitude(v: Vec2) -> f32 {
    (v.x * v.x + v.y * v.y).sqrt()
}

/// Unit vector along `v`
///
/// Components that are exactly zero are replaced by [`consts::EPSILON`] first,
/// so the result never divides by zero and never has an exact-zero component
/// that a force law would later divide by.
pub fn unit(v: Vec2) -> Vec2 {
    let v = guard_zero(v);
    v / magnitude(v)
}

/// Replace exact-zero components with [`consts::EPSILON`]
#[inline]
pub fn guard_zero(v: Vec2) -> Vec2 {
    Vec2::new(guard_scalar(v.x), guard_scalar(v.y))
}

#[inline]
pub fn guard_scalar(x: f32) -> f32 {
    if x == 0.0 { consts::EPSILON } else { x }
}

/// Rotate `v` by `degrees` counter-clockwise about `center`
pub fn rotate(v: Vec2, degrees: f32, center: Vec2) -> Vec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let d = v - center;
    Vec2::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos) + center
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Area of a circle of radius `r`
#[inline]
pub fn circle_area(r: f32) -> f32 {
    std::f32::consts::PI * r * r
}
