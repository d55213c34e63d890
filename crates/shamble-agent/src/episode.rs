//! Episode state machine and walker-specific reset routines.
//!
//! An episode is a single rollout from reset to termination/truncation.
//! The [`Episode`] resource tracks state, step count, and accumulated
//! reward; [`begin_episode`] performs the walker's randomized reset.

use std::f32::consts::TAU;

use bevy::math::Quat;
use bevy::prelude::Resource;
use rand::Rng;

use crate::goal::WalkSpeedGoal;
use crate::observation::ObservationBuilder;
use shamble_body::parts::{BodyPartId, JointDriveController};
use shamble_core::config::ResetParams;

/// Default torso segment mass in kg, used when no override is supplied.
const DEFAULT_TORSO_MASS: f32 = 8.0;

// ---------------------------------------------------------------------------
// EpisodeState
// ---------------------------------------------------------------------------

/// Lifecycle state of an episode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EpisodeState {
    /// Before the first reset.
    #[default]
    Idle,
    /// Actively stepping.
    Running,
    /// Ended due to task success or failure.
    Done,
    /// Ended due to time limit.
    Truncated,
}

impl EpisodeState {
    /// Returns `true` if the episode is finished (Done or Truncated).
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Truncated)
    }

    /// Returns `true` if the episode is active.
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}

// ---------------------------------------------------------------------------
// Episode
// ---------------------------------------------------------------------------

/// Bevy resource tracking the current episode's state.
#[derive(Resource, Clone, Debug)]
pub struct Episode {
    /// Current lifecycle state.
    pub state: EpisodeState,
    /// Number of decision steps taken this episode.
    pub step_count: u32,
    /// Total accumulated reward this episode.
    pub total_reward: f32,
    /// Seed used for this episode (set on reset).
    pub seed: Option<u64>,
    /// Number of started episodes since app start.
    pub episode_number: u32,
}

impl Default for Episode {
    fn default() -> Self {
        Self {
            state: EpisodeState::Idle,
            step_count: 0,
            total_reward: 0.0,
            seed: None,
            episode_number: 0,
        }
    }
}

impl Episode {
    /// Reset the episode to `Running` with an optional seed.
    pub const fn reset(&mut self, seed: Option<u64>) {
        self.state = EpisodeState::Running;
        self.step_count = 0;
        self.total_reward = 0.0;
        self.seed = seed;
        self.episode_number += 1;
    }

    /// Advance one step, accumulating reward. Returns `false` if the
    /// episode is not running.
    pub fn advance(&mut self, reward: f32) -> bool {
        if self.state != EpisodeState::Running {
            return false;
        }
        self.step_count += 1;
        self.total_reward += reward;
        true
    }

    /// Mark the episode as done (task success/failure).
    pub const fn terminate(&mut self) {
        self.state = EpisodeState::Done;
    }

    /// Mark the episode as truncated (time limit).
    pub const fn truncate(&mut self) {
        self.state = EpisodeState::Truncated;
    }

    /// Check if the episode should be truncated based on max steps.
    /// Returns `true` and sets the state if the limit is reached.
    pub fn check_truncation(&mut self, max_steps: u32) -> bool {
        if max_steps > 0 && self.step_count >= max_steps && self.state == EpisodeState::Running {
            self.state = EpisodeState::Truncated;
            return true;
        }
        false
    }

    /// Whether the episode is in a terminal state.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.state.is_terminal()
    }

    /// Whether the episode is actively running.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.state.is_running()
    }
}

// ---------------------------------------------------------------------------
// Reset routines
// ---------------------------------------------------------------------------

/// Walker episode start: restore every body part to its spawn pose, yaw the
/// hips to a uniform random heading, resample the goal speed, and clear the
/// observation builder's velocity memory.
pub fn begin_episode(
    ctl: &mut JointDriveController,
    goal: &mut WalkSpeedGoal,
    builder: &mut ObservationBuilder,
    episode: &mut Episode,
    rng: &mut impl Rng,
) {
    for id in BodyPartId::ALL {
        ctl.reset_body_part(id);
    }
    ctl.part_mut(BodyPartId::Hips).rotation = Quat::from_rotation_y(rng.gen_range(0.0..TAU));
    goal.resample(rng);
    builder.reset();
    episode.reset(None);
}

/// Apply torso-mass overrides from reset parameters. Each torso segment
/// falls back to the default mass when its key is absent.
pub fn apply_torso_mass(ctl: &mut JointDriveController, params: &ResetParams) {
    for (id, key) in [
        (BodyPartId::Chest, "chest_mass"),
        (BodyPartId::Spine, "spine_mass"),
        (BodyPartId::Hips, "hip_mass"),
    ] {
        ctl.part_mut(id).mass = params.get_with_default(key, DEFAULT_TORSO_MASS);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::math::Vec3;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    // -- EpisodeState --

    #[test]
    fn state_default_is_idle() {
        assert_eq!(EpisodeState::default(), EpisodeState::Idle);
    }

    #[test]
    fn state_terminal_detection() {
        assert!(!EpisodeState::Idle.is_terminal());
        assert!(!EpisodeState::Running.is_terminal());
        assert!(EpisodeState::Done.is_terminal());
        assert!(EpisodeState::Truncated.is_terminal());
    }

    // -- Episode --

    #[test]
    fn episode_default_is_idle() {
        let ep = Episode::default();
        assert_eq!(ep.state, EpisodeState::Idle);
        assert_eq!(ep.step_count, 0);
        assert!(ep.total_reward.abs() < f32::EPSILON);
        assert!(ep.seed.is_none());
        assert_eq!(ep.episode_number, 0);
    }

    #[test]
    fn episode_reset_transitions_to_running() {
        let mut ep = Episode::default();
        ep.reset(Some(42));
        assert_eq!(ep.state, EpisodeState::Running);
        assert_eq!(ep.step_count, 0);
        assert_eq!(ep.seed, Some(42));
        assert_eq!(ep.episode_number, 1);
    }

    #[test]
    fn episode_advance_accumulates() {
        let mut ep = Episode::default();
        ep.reset(None);
        assert!(ep.advance(1.5));
        assert!(ep.advance(2.0));
        assert_eq!(ep.step_count, 2);
        assert!((ep.total_reward - 3.5).abs() < f32::EPSILON);
    }

    #[test]
    fn episode_advance_fails_when_not_running() {
        let mut ep = Episode::default();
        assert!(!ep.advance(1.0)); // Idle
        ep.reset(None);
        ep.terminate();
        assert!(!ep.advance(1.0)); // Done
    }

    #[test]
    fn episode_check_truncation() {
        let mut ep = Episode::default();
        ep.reset(None);
        for _ in 0..5 {
            ep.advance(1.0);
        }
        assert!(!ep.check_truncation(10));
        for _ in 0..5 {
            ep.advance(1.0);
        }
        assert!(ep.check_truncation(10));
        assert_eq!(ep.state, EpisodeState::Truncated);
    }

    #[test]
    fn episode_check_truncation_zero_means_no_limit() {
        let mut ep = Episode::default();
        ep.reset(None);
        for _ in 0..1000 {
            ep.advance(1.0);
        }
        assert!(!ep.check_truncation(0));
        assert!(ep.is_running());
    }

    #[test]
    fn episode_reset_clears_reward() {
        let mut ep = Episode::default();
        ep.reset(None);
        ep.advance(100.0);
        ep.reset(None);
        assert!(ep.total_reward.abs() < f32::EPSILON);
        assert_eq!(ep.episode_number, 2);
    }

    // -- begin_episode --

    fn reset_fixtures() -> (
        JointDriveController,
        WalkSpeedGoal,
        ObservationBuilder,
        Episode,
        ChaCha8Rng,
    ) {
        (
            JointDriveController::default(),
            WalkSpeedGoal::default(),
            ObservationBuilder::default(),
            Episode::default(),
            ChaCha8Rng::seed_from_u64(3),
        )
    }

    #[test]
    fn begin_episode_restores_spawn_poses() {
        let (mut ctl, mut goal, mut builder, mut ep, mut rng) = reset_fixtures();
        ctl.part_mut(BodyPartId::FootL).position = Vec3::new(0.0, 0.1, 0.2);
        ctl.part_mut(BodyPartId::FootL).record_initial();
        ctl.part_mut(BodyPartId::FootL).position = Vec3::new(9.0, 0.0, -4.0);
        ctl.part_mut(BodyPartId::FootL).velocity = Vec3::X * 3.0;

        begin_episode(&mut ctl, &mut goal, &mut builder, &mut ep, &mut rng);

        let foot = ctl.part(BodyPartId::FootL);
        assert_eq!(foot.position, Vec3::new(0.0, 0.1, 0.2));
        assert_eq!(foot.velocity, Vec3::ZERO);
        assert!(ep.is_running());
    }

    #[test]
    fn begin_episode_randomizes_hips_heading() {
        let (mut ctl, mut goal, mut builder, mut ep, mut rng) = reset_fixtures();

        begin_episode(&mut ctl, &mut goal, &mut builder, &mut ep, &mut rng);
        let first = ctl.part(BodyPartId::Hips).rotation;
        begin_episode(&mut ctl, &mut goal, &mut builder, &mut ep, &mut rng);
        let second = ctl.part(BodyPartId::Hips).rotation;

        assert_ne!(first, second);
        // Pure yaw: no pitch or roll components.
        assert!(first.x.abs() < f32::EPSILON);
        assert!(first.z.abs() < f32::EPSILON);
    }

    #[test]
    fn begin_episode_is_deterministic_under_seed() {
        let (mut ctl_a, mut goal_a, mut builder_a, mut ep_a, _) = reset_fixtures();
        let (mut ctl_b, mut goal_b, mut builder_b, mut ep_b, _) = reset_fixtures();
        goal_a.randomize = true;
        goal_b.randomize = true;
        let mut rng_a = ChaCha8Rng::seed_from_u64(11);
        let mut rng_b = ChaCha8Rng::seed_from_u64(11);

        begin_episode(&mut ctl_a, &mut goal_a, &mut builder_a, &mut ep_a, &mut rng_a);
        begin_episode(&mut ctl_b, &mut goal_b, &mut builder_b, &mut ep_b, &mut rng_b);

        assert_eq!(
            ctl_a.part(BodyPartId::Hips).rotation,
            ctl_b.part(BodyPartId::Hips).rotation
        );
        assert!((goal_a.speed() - goal_b.speed()).abs() < f32::EPSILON);
    }

    #[test]
    fn begin_episode_resamples_goal_speed_when_randomizing() {
        let (mut ctl, mut goal, mut builder, mut ep, mut rng) = reset_fixtures();
        goal.randomize = true;
        goal.set_speed(10.0);

        let mut changed = false;
        for _ in 0..10 {
            begin_episode(&mut ctl, &mut goal, &mut builder, &mut ep, &mut rng);
            if (goal.speed() - 10.0).abs() > 1e-3 {
                changed = true;
            }
        }
        assert!(changed);
    }

    // -- apply_torso_mass --

    #[test]
    fn torso_mass_defaults_to_eight_kilograms() {
        let mut ctl = JointDriveController::default();
        apply_torso_mass(&mut ctl, &ResetParams::default());
        for id in [BodyPartId::Chest, BodyPartId::Spine, BodyPartId::Hips] {
            assert!((ctl.part(id).mass - 8.0).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn torso_mass_respects_overrides() {
        let mut ctl = JointDriveController::default();
        let mut params = ResetParams::default();
        params.set("chest_mass", 12.0);
        params.set("hip_mass", 6.0);

        apply_torso_mass(&mut ctl, &params);

        assert!((ctl.part(BodyPartId::Chest).mass - 12.0).abs() < f32::EPSILON);
        assert!((ctl.part(BodyPartId::Spine).mass - 8.0).abs() < f32::EPSILON);
        assert!((ctl.part(BodyPartId::Hips).mass - 6.0).abs() < f32::EPSILON);
    }

    #[test]
    fn torso_mass_does_not_touch_limbs() {
        let mut ctl = JointDriveController::default();
        apply_torso_mass(&mut ctl, &ResetParams::default());
        assert!((ctl.part(BodyPartId::ShinL).mass - 1.0).abs() < f32::EPSILON);
    }

    // -- Send + Sync --

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn types_are_send_sync() {
        assert_send_sync::<EpisodeState>();
        assert_send_sync::<Episode>();
    }
}
