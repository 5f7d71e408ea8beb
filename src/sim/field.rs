//! Radial force fields for the push/pull abilities
//!
//! A law turns the offset from a body to the pointer into a "force" that is
//! applied as an instantaneous velocity change, not integrated over time.
//! The scale constants are tuning values, not physical units.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Body;
use crate::{distance, guard_scalar, guard_zero, unit};

/// Multiplier on the inverse-square law
pub const STAR_SCALE: f32 = 200.0;
/// Multiplier on the dilate law
pub const DILATE_SCALE: f32 = 0.001;

/// Falloff law of a force field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ForceLaw {
    /// `k * d`
    Linear,
    /// `k * d / dist`, constant magnitude
    #[default]
    Constant,
    /// `k * STAR_SCALE / (d * dist^2)`
    #[serde(alias = "inverse_square")]
    Star,
    /// `k / d`
    #[serde(alias = "inverse_linear")]
    Cross1,
    /// `k * log10(dist) * sign(d)`
    #[serde(alias = "log")]
    Cross2,
    /// `k * dist / d`
    Cross3,
    /// `k / (d * dist)`
    #[serde(alias = "inverse")]
    Cross4,
    /// `k * d * dist * DILATE_SCALE`
    Dilate,
    /// `k * d^2 / dist * sign(d)`
    Misc1,
    /// `k * unit(d)`
    #[serde(alias = "normalized")]
    Misc2,
}

impl ForceLaw {
    pub const ALL: [ForceLaw; 10] = [
        ForceLaw::Linear,
        ForceLaw::Constant,
        ForceLaw::Star,
        ForceLaw::Cross1,
        ForceLaw::Cross2,
        ForceLaw::Cross3,
        ForceLaw::Cross4,
        ForceLaw::Dilate,
        ForceLaw::Misc1,
        ForceLaw::Misc2,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ForceLaw::Linear => "linear",
            ForceLaw::Constant => "constant",
            ForceLaw::Star => "star",
            ForceLaw::Cross1 => "cross1",
            ForceLaw::Cross2 => "cross2",
            ForceLaw::Cross3 => "cross3",
            ForceLaw::Cross4 => "cross4",
            ForceLaw::Dilate => "dilate",
            ForceLaw::Misc1 => "misc1",
            ForceLaw::Misc2 => "misc2",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "linear" => Some(ForceLaw::Linear),
            "constant" => Some(ForceLaw::Constant),
            "star" | "inverse_square" => Some(ForceLaw::Star),
            "cross1" | "inverse_linear" => Some(ForceLaw::Cross1),
            "cross2" | "log" => Some(ForceLaw::Cross2),
            "cross3" => Some(ForceLaw::Cross3),
            "cross4" | "inverse" => Some(ForceLaw::Cross4),
            "dilate" => Some(ForceLaw::Dilate),
            "misc1" => Some(ForceLaw::Misc1),
            "misc2" | "normalized" => Some(ForceLaw::Misc2),
            _ => None,
        }
    }

    /// Force on a body at `body` from a field anchored at `anchor`.
    ///
    /// Positive `strength` points the force toward the anchor; the field
    /// subtracts it from velocity, which makes that a push.
    pub fn force(&self, body: Vec2, anchor: Vec2, strength: f32) -> Vec2 {
        let d = guard_zero(anchor - body);
        let dist = guard_scalar(distance(anchor, body));
        let k = strength;
        let sign = Vec2::new(d.x.signum(), d.y.signum());

        match self {
            ForceLaw::Linear => k * d,
            ForceLaw::Constant => k * d / dist,
            ForceLaw::Star => k * STAR_SCALE / (d * dist * dist),
            ForceLaw::Cross1 => k / d,
            ForceLaw::Cross2 => k * dist.log10() * sign,
            ForceLaw::Cross3 => k * dist / d,
            ForceLaw::Cross4 => k / (d * dist),
            ForceLaw::Dilate => k * d * dist * DILATE_SCALE,
            ForceLaw::Misc1 => k * d * d / dist * sign,
            ForceLaw::Misc2 => k * unit(d),
        }
    }
}

/// Which side of the field radius is affected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FieldMode {
    /// Bodies within the radius
    #[default]
    Default,
    /// Bodies beyond the radius
    Inverted,
}

impl FieldMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldMode::Default => "default",
            FieldMode::Inverted => "inverted",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "default" | "inside" => Some(FieldMode::Default),
            "inverted" | "outside" => Some(FieldMode::Inverted),
            _ => None,
        }
    }

    /// Whether a body `dist` away from the anchor is in scope
    pub fn affects(&self, dist: f32, radius: f32) -> bool {
        match self {
            FieldMode::Default => dist <= radius,
            FieldMode::Inverted => dist > radius,
        }
    }
}

/// Push drives bodies away from the anchor, pull toward it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldDirection {
    Push,
    Pull,
}

/// A fully specified field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldParams {
    pub direction: FieldDirection,
    pub law: ForceLaw,
    pub mode: FieldMode,
    pub radius: f32,
    pub strength: f32,
}

impl FieldParams {
    /// Velocity change the field imposes on a body at `pos`
    pub fn velocity_delta(&self, pos: Vec2, anchor: Vec2) -> Vec2 {
        let force = self.law.force(pos, anchor, self.strength);
        match self.direction {
            FieldDirection::Push => -force,
            FieldDirection::Pull => force,
        }
    }

    /// Apply to every live body in scope; returns how many were touched
    pub fn apply(&self, bodies: &mut [Body], anchor: Vec2) -> usize {
        let mut touched = 0;
        for body in bodies.iter_mut().filter(|b| !b.removed) {
            if !self.mode.affects(distance(body.pos, anchor), self.radius) {
                continue;
            }
            let dv = self.velocity_delta(body.pos, anchor);
            body.set_velocity(body.vel() + dv);
            touched += 1;
        }
        touched
    }
}
