//! World configuration and ability descriptors
//!
//! The config store is owned by whoever drives the simulation (a settings
//! panel, a JSON file, a test). The core never caches it: every step and
//! every ability invocation receives the current `&WorldConfig`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::ability::{Ability, AbilityKind, ColorChoice};
use crate::sim::body::Rgb;
use crate::sim::field::{FieldDirection, FieldMode, FieldParams, ForceLaw};

/// Which part of a body has to touch a wall to count as a hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WallMode {
    /// The body's edge touches the wall (fully contained)
    #[default]
    Inner,
    /// The body's center reaches the wall
    Center,
    /// The body's far edge reaches the wall (fully outside)
    Outer,
}

impl WallMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WallMode::Inner => "inner",
            WallMode::Center => "center",
            WallMode::Outer => "outer",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "inner" => Some(WallMode::Inner),
            "center" | "centre" => Some(WallMode::Center),
            "outer" => Some(WallMode::Outer),
            _ => None,
        }
    }

    /// Distance from a body's center at which it meets a wall
    pub fn offset(&self, radius: f32) -> f32 {
        match self {
            WallMode::Inner => radius,
            WallMode::Center => 0.0,
            WallMode::Outer => -radius,
        }
    }
}

/// How a fused body's color is derived from the two parents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ColorBlend {
    /// `(c_big + c_small * ratio) / (1 + ratio)` with `ratio = m_small / m_big`
    #[default]
    MassWeighted,
    /// `((c_big + c_small) / 2 + random(0..=255)) / 2`
    RandomPerturbation,
}

impl ColorBlend {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorBlend::MassWeighted => "mass_weighted",
            ColorBlend::RandomPerturbation => "random_perturbation",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mass_weighted" | "mass" | "weighted" => Some(ColorBlend::MassWeighted),
            "random_perturbation" | "random" => Some(ColorBlend::RandomPerturbation),
            _ => None,
        }
    }
}

/// Per-axis speed clamp
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedLimits {
    pub min: f32,
    pub max: f32,
}

/// Global forces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    /// Added to momentum as `gravity * mass` each tick
    pub gravity: Vec2,
    /// Momentum is scaled by `1 - friction` each tick, in [0, 1)
    pub friction: f32,
    /// Optional per-axis velocity clamp
    pub speed_limits: Option<SpeedLimits>,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: Vec2::ZERO,
            friction: 0.0,
            speed_limits: None,
        }
    }
}

/// Inset of each wall from the world bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WallOffsets {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

/// Wall policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallSettings {
    pub enabled: bool,
    pub mode: WallMode,
    /// Fraction of momentum kept on a wall hit, in [0, 1]
    pub elasticity: f32,
    pub offsets: WallOffsets,
    /// Remove bodies that touch a wall instead of bouncing them
    pub delete_on_contact: bool,
}

impl Default for WallSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: WallMode::Inner,
            elasticity: 1.0,
            offsets: WallOffsets::default(),
            delete_on_contact: false,
        }
    }
}

/// Body-body collision policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionSettings {
    pub enabled: bool,
    /// Allow overlapping bodies to fuse
    pub absorb: bool,
    /// Relative speed a pair must exceed to fuse rather than bounce
    pub absorb_threshold: f32,
    pub color_blend: ColorBlend,
}

impl Default for CollisionSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            absorb: true,
            absorb_threshold: 0.0,
            color_blend: ColorBlend::MassWeighted,
        }
    }
}

/// Initial population
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnSettings {
    pub count: usize,
    pub radius_min: f32,
    pub radius_max: f32,
    /// Each velocity component is drawn from `[-max_speed, max_speed]`
    pub max_speed: f32,
}

impl Default for SpawnSettings {
    fn default() -> Self {
        Self {
            count: SPAWN_COUNT,
            radius_min: SPAWN_RADIUS_MIN,
            radius_max: SPAWN_RADIUS_MAX,
            max_speed: SPAWN_MAX_SPEED,
        }
    }
}

/// Everything the core reads while stepping or applying abilities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub physics: PhysicsSettings,
    pub walls: WallSettings,
    pub collision: CollisionSettings,
    pub spawn: SpawnSettings,
    /// Split children smaller than this radius are dropped
    pub split_min_radius: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsSettings::default(),
            walls: WallSettings::default(),
            collision: CollisionSettings::default(),
            spawn: SpawnSettings::default(),
            split_min_radius: SPLIT_MIN_RADIUS,
        }
    }
}

impl WorldConfig {
    /// Parse a (possibly partial) JSON document and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: WorldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values outside their allowed ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.physics;
        if !p.gravity.is_finite() {
            return Err(ConfigError::Invalid("gravity must be finite".into()));
        }
        if !(0.0..1.0).contains(&p.friction) {
            return Err(ConfigError::Invalid(format!(
                "friction {} outside [0, 1)",
                p.friction
            )));
        }
        if let Some(limits) = p.speed_limits {
            if limits.min < 0.0 || limits.min > limits.max {
                return Err(ConfigError::Invalid(format!(
                    "speed limits [{}, {}] are not an ordered non-negative range",
                    limits.min, limits.max
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.walls.elasticity) {
            return Err(ConfigError::Invalid(format!(
                "wall elasticity {} outside [0, 1]",
                self.walls.elasticity
            )));
        }
        if self.collision.absorb_threshold < 0.0 {
            return Err(ConfigError::Invalid(
                "absorb threshold must not be negative".into(),
            ));
        }
        let s = &self.spawn;
        if s.radius_min <= 0.0 || s.radius_min > s.radius_max {
            return Err(ConfigError::Invalid(format!(
                "spawn radius range [{}, {}] is empty or non-positive",
                s.radius_min, s.radius_max
            )));
        }
        if s.max_speed < 0.0 {
            return Err(ConfigError::Invalid("spawn speed must not be negative".into()));
        }
        if self.split_min_radius < 0.0 {
            return Err(ConfigError::Invalid(
                "split minimum radius must not be negative".into(),
            ));
        }
        Ok(())
    }

    /// Clamp out-of-range values instead of rejecting them
    pub fn sanitized(mut self) -> Self {
        let friction = self.physics.friction.clamp(0.0, 0.999);
        if friction != self.physics.friction {
            log::warn!("friction {} clamped to {}", self.physics.friction, friction);
            self.physics.friction = friction;
        }
        if !self.physics.gravity.is_finite() {
            log::warn!("non-finite gravity reset to zero");
            self.physics.gravity = Vec2::ZERO;
        }
        if let Some(limits) = self.physics.speed_limits.as_mut() {
            limits.min = limits.min.max(0.0);
            if limits.max < limits.min {
                log::warn!("speed limit max {} raised to min {}", limits.max, limits.min);
                limits.max = limits.min;
            }
        }
        let elasticity = self.walls.elasticity.clamp(0.0, 1.0);
        if elasticity != self.walls.elasticity {
            log::warn!(
                "wall elasticity {} clamped to {}",
                self.walls.elasticity,
                elasticity
            );
            self.walls.elasticity = elasticity;
        }
        self.collision.absorb_threshold = self.collision.absorb_threshold.max(0.0);
        if self.spawn.radius_min <= 0.0 {
            log::warn!("spawn radius_min {} reset", self.spawn.radius_min);
            self.spawn.radius_min = SPAWN_RADIUS_MIN;
        }
        if self.spawn.radius_max < self.spawn.radius_min {
            log::warn!(
                "spawn radius_max {} raised to {}",
                self.spawn.radius_max,
                self.spawn.radius_min
            );
            self.spawn.radius_max = self.spawn.radius_min;
        }
        self.spawn.max_speed = self.spawn.max_speed.max(0.0);
        self.split_min_radius = self.split_min_radius.max(0.0);
        self
    }
}

/// An ability as a settings panel describes it: a name plus a flat bag of
/// parameters. Converted into a typed [`Ability`] before use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilitySettings {
    /// One of `push|pull|split|generate|delete|color|none`
    pub name: String,
    /// Keep re-applying while the pointer is held
    pub repeats: bool,
    pub interval_ms: f32,
    /// Reach around the pointer
    pub radius: f32,
    /// Force scale for push/pull, max targets for split
    pub strength: f32,
    /// Launch speed for generate/split
    pub speed: f32,
    /// Bodies created by generate, children per split
    pub count: usize,
    /// Fixed recolor color, `None` picks a random one
    pub color: Option<[u8; 3]>,
    pub law: ForceLaw,
    pub mode: FieldMode,
}

impl Default for AbilitySettings {
    fn default() -> Self {
        Self {
            name: AbilityKind::Push.as_str().to_string(),
            repeats: true,
            interval_ms: FRAME_MS,
            radius: 100.0,
            strength: 1.0,
            speed: 5.0,
            count: 4,
            color: None,
            law: ForceLaw::Constant,
            mode: FieldMode::Default,
        }
    }
}

impl AbilitySettings {
    /// Settings for a named ability with default parameters. Only the field,
    /// delete and color abilities repeat while held.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            repeats: AbilityKind::from_str(name).is_some_and(|kind| kind.repeats_by_default()),
            ..Default::default()
        }
    }

    /// Build the typed ability; unknown names become [`Ability::None`]
    pub fn to_ability(&self) -> Ability {
        let Some(kind) = AbilityKind::from_str(&self.name) else {
            log::warn!("unknown ability '{}', ignoring", self.name);
            return Ability::None;
        };

        let field = |direction| FieldParams {
            direction,
            law: self.law,
            mode: self.mode,
            radius: self.radius,
            strength: self.strength,
        };

        match kind {
            AbilityKind::Push => Ability::Field(field(FieldDirection::Push)),
            AbilityKind::Pull => Ability::Field(field(FieldDirection::Pull)),
            AbilityKind::Split => Ability::Split {
                radius: self.radius,
                max_targets: self.strength.max(0.0) as usize,
                count: self.count,
                speed: self.speed,
            },
            AbilityKind::Generate => Ability::Generate {
                count: self.count,
                speed: self.speed,
            },
            AbilityKind::Delete => Ability::Delete {
                radius: self.radius,
            },
            AbilityKind::Color => Ability::Recolor {
                radius: self.radius,
                color: match self.color {
                    Some([r, g, b]) => ColorChoice::Fixed(Rgb::from_u8(r, g, b)),
                    None => ColorChoice::Random,
                },
            },
            AbilityKind::None => Ability::None,
        }
    }
}
