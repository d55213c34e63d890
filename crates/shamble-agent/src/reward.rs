//! Dense step reward and target bonus.
//!
//! The per-step reward is the product of two factors in [0, 1]: how closely
//! the body's average velocity matches the goal velocity, and how squarely
//! the hips face the target. The product forces the policy to satisfy both
//! at once; either factor at zero zeroes the step.

use bevy::math::Vec3;

use crate::frame::VirtualRoot;
use crate::goal::{Target, WalkSpeedGoal};
use shamble_body::parts::{BodyPartId, JointDriveController};

/// Sparse bonus added when the body touches the walk target.
pub const TOUCHED_TARGET_BONUS: f32 = 1.0;

/// Velocity-matching factor in [0, 1].
///
/// The distance between goal and actual velocity is clamped to the goal
/// speed, normalized, and shaped by `(1 - x^2)^2`: flat near a perfect match,
/// falling steeply as the mismatch approaches the goal speed.
#[must_use]
pub fn matching_velocity_reward(goal_velocity: Vec3, actual_velocity: Vec3, goal_speed: f32) -> f32 {
    let dist = goal_velocity.distance(actual_velocity).clamp(0.0, goal_speed);
    let x = dist / goal_speed;
    (1.0 - x * x).powi(2)
}

/// Facing factor in [0, 1]: 1 when the hips forward axis points at the
/// target, 0 when it points directly away.
#[must_use]
pub fn facing_reward(target_direction: Vec3, hips_forward: Vec3) -> f32 {
    (target_direction.normalize_or_zero().dot(hips_forward) + 1.0) * 0.5
}

/// Dense reward for one decision step.
#[must_use]
pub fn step_reward(
    ctl: &JointDriveController,
    root: &VirtualRoot,
    target: &Target,
    goal: &WalkSpeedGoal,
) -> f32 {
    let target_direction = target.position - root.position;
    let goal_velocity = target_direction.normalize_or_zero() * goal.speed();

    let velocity = matching_velocity_reward(goal_velocity, ctl.average_velocity(), goal.speed());
    let facing = facing_reward(
        target_direction,
        ctl.part(BodyPartId::Hips).rotation * Vec3::Z,
    );
    velocity * facing
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::math::Quat;
    use shamble_body::parts::BodyPartId;

    #[test]
    fn perfect_velocity_match_scores_one() {
        let v = Vec3::new(0.0, 0.0, 3.0);
        assert!((matching_velocity_reward(v, v, 3.0) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn total_velocity_mismatch_scores_zero() {
        let goal = Vec3::new(0.0, 0.0, 3.0);
        assert!(matching_velocity_reward(goal, Vec3::ZERO, 3.0).abs() < f32::EPSILON);
    }

    #[test]
    fn velocity_mismatch_beyond_goal_speed_saturates_at_zero() {
        let goal = Vec3::new(0.0, 0.0, 2.0);
        let actual = Vec3::new(0.0, 0.0, -10.0);
        assert!(matching_velocity_reward(goal, actual, 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn velocity_reward_shape_at_half_mismatch() {
        // x = 0.5 gives (1 - 0.25)^2 = 0.5625.
        let goal = Vec3::new(0.0, 0.0, 2.0);
        let actual = Vec3::new(0.0, 0.0, 1.0);
        assert!((matching_velocity_reward(goal, actual, 2.0) - 0.5625).abs() < 1e-6);
    }

    #[test]
    fn facing_target_scores_one() {
        let reward = facing_reward(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
        assert!((reward - 1.0).abs() < 1e-6);
    }

    #[test]
    fn facing_away_scores_zero() {
        let reward = facing_reward(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        assert!(reward.abs() < 1e-6);
    }

    #[test]
    fn facing_sideways_scores_half() {
        let reward = facing_reward(Vec3::new(0.0, 0.0, 5.0), Vec3::X);
        assert!((reward - 0.5).abs() < 1e-6);
    }

    #[test]
    fn step_reward_is_product_of_factors() {
        // Body at rest facing the target: velocity factor 0, facing factor 1.
        let mut ctl = JointDriveController::default();
        ctl.part_mut(BodyPartId::Hips).rotation = Quat::IDENTITY;
        let root = VirtualRoot::default();
        let target = Target::new(Vec3::new(0.0, 0.0, 10.0));
        let goal = WalkSpeedGoal::default();

        assert!(step_reward(&ctl, &root, &target, &goal).abs() < 1e-6);

        // Moving at goal speed toward the target: both factors 1.
        for id in BodyPartId::ALL {
            ctl.part_mut(id).velocity = Vec3::new(0.0, 0.0, goal.speed());
        }
        assert!((step_reward(&ctl, &root, &target, &goal) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn step_reward_zeroes_when_facing_away() {
        let mut ctl = JointDriveController::default();
        for id in BodyPartId::ALL {
            ctl.part_mut(id).velocity = Vec3::new(0.0, 0.0, 10.0);
        }
        ctl.part_mut(BodyPartId::Hips).rotation = Quat::from_rotation_y(std::f32::consts::PI);
        let root = VirtualRoot::default();
        let target = Target::new(Vec3::new(0.0, 0.0, 10.0));
        let goal = WalkSpeedGoal::default();

        assert!(step_reward(&ctl, &root, &target, &goal) < 1e-5);
    }

    #[test]
    fn step_reward_stays_in_unit_interval() {
        let mut ctl = JointDriveController::default();
        for id in BodyPartId::ALL {
            ctl.part_mut(id).velocity = Vec3::new(1.5, -0.4, 2.0);
        }
        ctl.part_mut(BodyPartId::Hips).rotation = Quat::from_rotation_y(1.0);
        let root = VirtualRoot::default();
        let target = Target::new(Vec3::new(3.0, 0.0, 4.0));
        let goal = WalkSpeedGoal::default();

        let reward = step_reward(&ctl, &root, &target, &goal);
        assert!((0.0..=1.0).contains(&reward));
    }
}
