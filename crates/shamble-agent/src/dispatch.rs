//! Action vector dispatch.
//!
//! Walks the schema tables in [`crate::schema`] with a cursor over the flat
//! action vector and issues joint commands. The whole action is validated
//! before any command is issued, so a malformed action never leaves the body
//! half-commanded.

use bevy::prelude::Resource;

use crate::schema::{ROTATION_SCHEMA, STRENGTH_SCHEMA, action_dim};
use shamble_body::parts::JointDriveController;
use shamble_body::perception::ActuatedPerception;
use shamble_core::error::ContractError;
use shamble_core::types::Action;

/// Maps a policy action onto joint commands.
#[derive(Resource, Clone, Copy, Debug)]
pub struct ActionDispatcher {
    arm_strength_multiplier: f32,
}

impl Default for ActionDispatcher {
    fn default() -> Self {
        Self {
            arm_strength_multiplier: 0.2,
        }
    }
}

impl ActionDispatcher {
    #[must_use]
    pub const fn new(arm_strength_multiplier: f32) -> Self {
        Self {
            arm_strength_multiplier,
        }
    }

    /// Subtracted from the raw strength scalar of the arm joints.
    #[must_use]
    pub const fn arm_strength_multiplier(&self) -> f32 {
        self.arm_strength_multiplier
    }

    /// Apply one action: rotation segment, strength segment, then the two
    /// perception scalars when actuated perception is enabled.
    ///
    /// Fails without touching any joint state if the action has the wrong
    /// length or contains a non-finite value.
    pub fn apply(
        &self,
        action: &Action,
        ctl: &mut JointDriveController,
        perception: &mut ActuatedPerception,
    ) -> Result<(), ContractError> {
        let expected = action_dim(perception.enabled);
        if action.len() != expected {
            return Err(ContractError::ActionLenMismatch {
                expected,
                got: action.len(),
            });
        }
        action.validate()?;

        let values = action.as_slice();
        let mut cursor = 0;

        for row in &ROTATION_SCHEMA {
            let mut axes = [0.0; 3];
            axes[..row.axes].copy_from_slice(&values[cursor..cursor + row.axes]);
            ctl.set_joint_target_rotation(row.part, axes[0], axes[1], axes[2]);
            cursor += row.axes;
        }

        for row in &STRENGTH_SCHEMA {
            let mut value = values[cursor];
            if row.arm_handicap {
                value -= self.arm_strength_multiplier;
            }
            ctl.set_joint_strength(row.part, value);
            cursor += 1;
        }

        if perception.enabled {
            // Remap [-1, 1] scalars to [0, 1] interpolation factors.
            let ray_angle = (values[cursor] + 1.0) * 0.5;
            let cast_radius = (values[cursor + 1] + 1.0) * 0.5;
            perception.set_interpolation(ray_angle, cast_radius);
            cursor += 2;
        }

        debug_assert_eq!(cursor, expected);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
