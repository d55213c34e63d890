use std::collections::HashMap;

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Lower bound of the goal walking speed (m/s).
pub const MIN_WALK_SPEED: f32 = 0.1;
/// Upper bound of the goal walking speed (m/s).
pub const MAX_WALK_SPEED: f32 = 10.0;

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_physics_dt() -> f64 {
    0.02
}
const fn default_control_dt() -> f64 {
    0.1
}
const fn default_max_episode_steps() -> u32 {
    1000
}
const fn default_target_walking_speed() -> f32 {
    MAX_WALK_SPEED
}
const fn default_arm_strength_multiplier() -> f32 {
    0.2
}
const fn default_ray_angle_range() -> [f32; 2] {
    [25.0, 120.0]
}
const fn default_cast_radius_range() -> [f32; 2] {
    [0.25, 1.0]
}

// ---------------------------------------------------------------------------
// SimConfig
// ---------------------------------------------------------------------------

/// Fixed-timestep scheduling configuration.
///
/// One decision step (observe, act, reward) runs per control tick; the
/// physics solver advances `substeps()` fixed ticks of `physics_dt` in
/// between. Body acceleration observations divide by `physics_dt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Resource)]
pub struct SimConfig {
    /// Physics timestep in seconds (default: 0.02 = 50 Hz).
    #[serde(default = "default_physics_dt")]
    pub physics_dt: f64,

    /// Decision timestep in seconds (default: 0.1 = one decision per five
    /// physics ticks). Must be >= `physics_dt`.
    #[serde(default = "default_control_dt")]
    pub control_dt: f64,

    /// Maximum decision steps before truncation (default: 1000). `0` means
    /// no limit.
    #[serde(default = "default_max_episode_steps")]
    pub max_episode_steps: u32,

    /// Master random seed for episode randomization.
    #[serde(default)]
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            physics_dt: default_physics_dt(),
            control_dt: default_control_dt(),
            max_episode_steps: default_max_episode_steps(),
            seed: 0,
        }
    }
}

impl SimConfig {
    /// Validate configuration. Returns Err on invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.physics_dt <= 0.0 {
            return Err(ConfigError::InvalidPhysicsDt(self.physics_dt));
        }
        if self.control_dt < self.physics_dt {
            return Err(ConfigError::ControlDtLessThanPhysicsDt);
        }
        Ok(())
    }

    /// Number of physics ticks per decision step.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn substeps(&self) -> usize {
        (self.control_dt / self.physics_dt).round() as usize
    }

    /// Load from TOML file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// WalkerConfig
// ---------------------------------------------------------------------------

/// Agent-side configuration for the walker task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Resource)]
pub struct WalkerConfig {
    /// Goal walking speed in m/s, clamped to [`MIN_WALK_SPEED`, `MAX_WALK_SPEED`].
    #[serde(default = "default_target_walking_speed")]
    pub target_walking_speed: f32,

    /// Resample the goal speed uniformly in range at every episode start.
    #[serde(default)]
    pub randomize_walk_speed: bool,

    /// Subtracted from the raw strength scalar of the four arm joints before
    /// it is applied. Deliberately weakens upper-limb torque relative to the
    /// raw policy output.
    #[serde(default = "default_arm_strength_multiplier")]
    pub arm_strength_multiplier: f32,

    /// Let the policy drive the ray-perception parameters with two extra
    /// action scalars (and observe the current interpolation factors).
    #[serde(default)]
    pub use_actuated_perception: bool,

    /// Min/max ray spread in degrees for actuated perception.
    #[serde(default = "default_ray_angle_range")]
    pub ray_angle_range: [f32; 2],

    /// Min/max sphere-cast radius in meters for actuated perception.
    #[serde(default = "default_cast_radius_range")]
    pub cast_radius_range: [f32; 2],

    /// Apply torso-mass overrides from [`ResetParams`] at episode start.
    /// Off by default; the override routine is otherwise inert.
    #[serde(default)]
    pub torso_mass_overrides: bool,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            target_walking_speed: default_target_walking_speed(),
            randomize_walk_speed: false,
            arm_strength_multiplier: default_arm_strength_multiplier(),
            use_actuated_perception: false,
            ray_angle_range: default_ray_angle_range(),
            cast_radius_range: default_cast_radius_range(),
            torso_mass_overrides: false,
        }
    }
}

impl WalkerConfig {
    /// Validate configuration. Returns Err on invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_WALK_SPEED..=MAX_WALK_SPEED).contains(&self.target_walking_speed) {
            return Err(ConfigError::InvalidValue {
                field: "target_walking_speed".into(),
                message: format!("must be within [{MIN_WALK_SPEED}, {MAX_WALK_SPEED}]"),
            });
        }
        if !(0.0..=2.0).contains(&self.arm_strength_multiplier) {
            return Err(ConfigError::InvalidValue {
                field: "arm_strength_multiplier".into(),
                message: "must be within [0, 2]".into(),
            });
        }
        for (field, range) in [
            ("ray_angle_range", self.ray_angle_range),
            ("cast_radius_range", self.cast_radius_range),
        ] {
            if range[0] > range[1] {
                return Err(ConfigError::InvalidValue {
                    field: field.into(),
                    message: "min must be <= max".into(),
                });
            }
        }
        Ok(())
    }

    /// Load from TOML file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// ResetParams
// ---------------------------------------------------------------------------

/// Named numeric parameters supplied by an external environment-parameters
/// collaborator (curriculum or domain randomization). Readers fall back to a
/// default when a key is absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Resource)]
pub struct ResetParams {
    values: HashMap<String, f32>,
}

impl ResetParams {
    /// Read a parameter, falling back to `default` when unset.
    #[must_use]
    pub fn get_with_default(&self, name: &str, default: f32) -> f32 {
        self.values.get(name).copied().unwrap_or(default)
    }

    /// Set a parameter value.
    pub fn set(&mut self, name: impl Into<String>, value: f32) {
        self.values.insert(name.into(), value);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
