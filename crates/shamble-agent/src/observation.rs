//! Observation vector construction.
//!
//! All directional quantities are expressed in the virtual-root frame, so
//! the vector is invariant to the agent's world heading. The push order in
//! [`ObservationBuilder::collect`] is the wire layout; reordering it silently
//! corrupts a trained policy.

use bevy::math::Vec3;
use bevy::prelude::Resource;

use crate::frame::VirtualRoot;
use crate::goal::{Target, WalkSpeedGoal};
use shamble_body::parts::{BodyPartId, JointDriveController};
use shamble_body::perception::ActuatedPerception;
use shamble_core::error::ContractError;
use shamble_core::types::Observation;

/// Length of the observation vector.
///
/// Body-level block: hips acceleration (3), velocity mismatch (1), average
/// velocity (3), goal velocity (3), target position (3). Per part: ground
/// contact (1) and angular velocity (3) for all sixteen, plus local rotation
/// (4) and normalized strength (1) for the thirteen driven joints. Two
/// interpolation factors follow when actuated perception is enabled.
#[must_use]
pub const fn observation_dim(actuated_perception: bool) -> usize {
    let base = 13 + BodyPartId::COUNT * 4 + 13 * 5;
    if actuated_perception { base + 2 } else { base }
}

/// Builds the flat observation vector once per decision step.
///
/// Holds the previous hips velocity between steps so the hips acceleration
/// can be finite-differenced.
#[derive(Resource, Clone, Copy, Debug, Default)]
pub struct ObservationBuilder {
    prev_hips_velocity: Vec3,
}

impl ObservationBuilder {
    /// Assemble the observation for the current step.
    ///
    /// Fails with [`ContractError::DegenerateFrame`] before reading any body
    /// state if the virtual root cannot be inverted.
    #[allow(clippy::cast_possible_truncation)]
    pub fn collect(
        &mut self,
        ctl: &JointDriveController,
        root: &VirtualRoot,
        target: &Target,
        goal: &WalkSpeedGoal,
        perception: &ActuatedPerception,
        physics_dt: f64,
    ) -> Result<Observation, ContractError> {
        if !root.is_valid() {
            return Err(ContractError::DegenerateFrame);
        }

        let mut obs = Observation::with_capacity(observation_dim(perception.enabled));

        let hips_velocity = ctl.part(BodyPartId::Hips).velocity;
        let acceleration = (hips_velocity - self.prev_hips_velocity) / physics_dt as f32;
        self.prev_hips_velocity = hips_velocity;

        let average_velocity = ctl.average_velocity();
        let target_direction = target.position - root.position;
        let goal_velocity = target_direction.normalize_or_zero() * goal.speed();

        // Body-level block.
        obs.push_vec3(root.inverse_transform_direction(acceleration));
        obs.push(goal_velocity.distance(average_velocity));
        obs.push_vec3(root.inverse_transform_direction(average_velocity));
        obs.push_vec3(root.inverse_transform_direction(goal_velocity));
        obs.push_vec3(root.inverse_transform_point(target.position));

        // Per-part block, in canonical part order.
        for id in BodyPartId::ALL {
            let part = ctl.part(id);
            obs.push_flag(part.touching_ground);
            obs.push_vec3(root.inverse_transform_direction(part.angular_velocity));
            if id != BodyPartId::Hips && !id.is_hand() {
                obs.push_quat(part.local_rotation);
                obs.push(part.current_strength / ctl.max_joint_force_limit());
            }
        }

        if perception.enabled {
            obs.push(perception.ray_angle_lerp());
            obs.push(perception.cast_radius_lerp());
        }

        debug_assert_eq!(obs.len(), observation_dim(perception.enabled));
        Ok(obs)
    }

    /// Episode-start reset: the first acceleration of a fresh episode must
    /// not difference against the previous episode's velocity.
    pub fn reset(&mut self) {
        self.prev_hips_velocity = Vec3::ZERO;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
