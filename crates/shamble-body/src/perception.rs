//! Actuated ray-perception collaborator.
//!
//! Four ray sensors mounted on the body share one pair of policy-driven
//! parameters: a ray spread angle and a sphere-cast radius. The policy moves
//! two interpolation factors in [0, 1]; the factors lerp the configured
//! min/max ranges and the result is pushed to every sensor identically.

use bevy::prelude::Resource;
use shamble_core::config::WalkerConfig;

/// Number of ray sensors driven each step.
pub const RAY_SENSOR_COUNT: usize = 4;

// ---------------------------------------------------------------------------
// RayPerception
// ---------------------------------------------------------------------------

/// One ray-perception sensor instance.
///
/// The casting itself belongs to the perception collaborator; the agent only
/// writes these two parameters.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RayPerception {
    max_ray_degrees: f32,
    sphere_cast_radius: f32,
}

impl RayPerception {
    /// Current ray spread in degrees.
    #[must_use]
    pub const fn max_ray_degrees(&self) -> f32 {
        self.max_ray_degrees
    }

    /// Current sphere-cast radius in meters.
    #[must_use]
    pub const fn sphere_cast_radius(&self) -> f32 {
        self.sphere_cast_radius
    }

    pub const fn set_max_ray_degrees(&mut self, value: f32) {
        self.max_ray_degrees = value;
    }

    pub const fn set_sphere_cast_radius(&mut self, value: f32) {
        self.sphere_cast_radius = value;
    }
}

// ---------------------------------------------------------------------------
// ActuatedPerception
// ---------------------------------------------------------------------------

/// Shared parameter state for the four ray sensors.
#[derive(Resource, Clone, Debug)]
pub struct ActuatedPerception {
    /// Whether the policy drives (and observes) the sensor parameters.
    pub enabled: bool,
    ray_angle_range: [f32; 2],
    cast_radius_range: [f32; 2],
    ray_angle_lerp: f32,
    cast_radius_lerp: f32,
    sensors: [RayPerception; RAY_SENSOR_COUNT],
}

impl Default for ActuatedPerception {
    fn default() -> Self {
        let mut perception = Self {
            enabled: false,
            ray_angle_range: [25.0, 120.0],
            cast_radius_range: [0.25, 1.0],
            ray_angle_lerp: 0.5,
            cast_radius_lerp: 0.5,
            sensors: [RayPerception::default(); RAY_SENSOR_COUNT],
        };
        perception.push_to_sensors();
        perception
    }
}

fn lerp(range: [f32; 2], t: f32) -> f32 {
    range[0] + (range[1] - range[0]) * t
}

impl ActuatedPerception {
    /// Build from walker configuration.
    #[must_use]
    pub fn from_config(config: &WalkerConfig) -> Self {
        let mut perception = Self {
            enabled: config.use_actuated_perception,
            ray_angle_range: config.ray_angle_range,
            cast_radius_range: config.cast_radius_range,
            ..Self::default()
        };
        perception.push_to_sensors();
        perception
    }

    /// Current ray-angle interpolation factor in [0, 1].
    #[must_use]
    pub const fn ray_angle_lerp(&self) -> f32 {
        self.ray_angle_lerp
    }

    /// Current cast-radius interpolation factor in [0, 1].
    #[must_use]
    pub const fn cast_radius_lerp(&self) -> f32 {
        self.cast_radius_lerp
    }

    /// The sensor instances, for the perception collaborator to cast with.
    #[must_use]
    pub const fn sensors(&self) -> &[RayPerception; RAY_SENSOR_COUNT] {
        &self.sensors
    }

    /// Set both interpolation factors (clamped to [0, 1]) and push the
    /// lerped parameters into every sensor.
    pub fn set_interpolation(&mut self, ray_angle: f32, cast_radius: f32) {
        self.ray_angle_lerp = ray_angle.clamp(0.0, 1.0);
        self.cast_radius_lerp = cast_radius.clamp(0.0, 1.0);
        self.push_to_sensors();
    }

    /// Write the lerped ray angle and cast radius to all sensors.
    pub fn push_to_sensors(&mut self) {
        let degrees = lerp(self.ray_angle_range, self.ray_angle_lerp);
        let radius = lerp(self.cast_radius_range, self.cast_radius_lerp);
        for sensor in &mut self.sensors {
            sensor.set_max_ray_degrees(degrees);
            sensor.set_sphere_cast_radius(radius);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
