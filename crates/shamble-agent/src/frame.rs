//! The virtual-root reference frame.
//!
//! A ragdoll tumbles; its hips are a poor reference for observations. The
//! virtual root is a stabilized transform kept upright by the host scene,
//! and every directional observation and the target position are expressed
//! relative to it so learned policies are orientation-invariant.

use bevy::math::{Quat, Vec3};
use bevy::prelude::Resource;

/// Stabilized reference transform for observation space.
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct VirtualRoot {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for VirtualRoot {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl VirtualRoot {
    #[must_use]
    pub const fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Express a world-space direction in root-local space (rotation only).
    #[must_use]
    pub fn inverse_transform_direction(&self, direction: Vec3) -> Vec3 {
        self.rotation.inverse() * direction
    }

    /// Express a world-space point in root-local coordinates.
    #[must_use]
    pub fn inverse_transform_point(&self, point: Vec3) -> Vec3 {
        self.rotation.inverse() * (point - self.position)
    }

    /// The frame's forward axis (+Z) in world space.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Whether the frame can be inverted: finite position and a finite,
    /// unit-length rotation. All relative conversions are undefined otherwise.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.position.is_finite() && self.rotation.is_finite() && self.rotation.is_normalized()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
