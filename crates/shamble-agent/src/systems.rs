//! Bevy systems driving the decision step.
//!
//! One update runs reset handling, action dispatch, and observation
//! collection in that order (see [`crate::plugin::WalkerSet`]). Contract
//! violations inside a system are unrecoverable mid-step and panic; host
//! loops validate actions up front if they need to survive bad input.

use bevy::prelude::*;

use crate::dispatch::ActionDispatcher;
use crate::episode::{Episode, apply_torso_mass, begin_episode};
use crate::frame::VirtualRoot;
use crate::goal::{Target, WalkSpeedGoal};
use crate::observation::ObservationBuilder;
use crate::plugin::{AgentRng, EpisodeReset, LatestObservation, PendingAction, TargetTouched};
use crate::reward::{TOUCHED_TARGET_BONUS, step_reward};
use shamble_body::parts::JointDriveController;
use shamble_body::perception::ActuatedPerception;
use shamble_core::config::{ResetParams, SimConfig, WalkerConfig};

/// Consumes [`EpisodeReset`] events and performs the walker's randomized
/// episode start. Multiple events in one update collapse into one reset.
#[allow(clippy::needless_pass_by_value)] // Bevy system parameters are extracted by value
#[allow(clippy::too_many_arguments)]
pub fn episode_reset_system(
    mut resets: EventReader<EpisodeReset>,
    mut ctl: ResMut<JointDriveController>,
    mut goal: ResMut<WalkSpeedGoal>,
    mut builder: ResMut<ObservationBuilder>,
    mut episode: ResMut<Episode>,
    mut rng: ResMut<AgentRng>,
    config: Res<WalkerConfig>,
    params: Res<ResetParams>,
) {
    if resets.is_empty() {
        return;
    }
    resets.clear();

    begin_episode(&mut ctl, &mut goal, &mut builder, &mut episode, &mut rng.0);
    if config.torso_mass_overrides {
        apply_torso_mass(&mut ctl, &params);
    }
    debug!(
        "episode {} started (goal speed {:.2} m/s)",
        episode.episode_number,
        goal.speed()
    );
}

/// Takes the pending action, dispatches it onto the joints, and scores the
/// step. Target-touch events are folded into the step reward as a bonus.
///
/// # Panics
/// Panics on a malformed action (wrong length or non-finite values).
#[allow(clippy::needless_pass_by_value)] // Bevy system parameters are extracted by value
#[allow(clippy::too_many_arguments)]
pub fn apply_action_system(
    mut pending: ResMut<PendingAction>,
    mut ctl: ResMut<JointDriveController>,
    mut perception: ResMut<ActuatedPerception>,
    mut episode: ResMut<Episode>,
    mut touches: EventReader<TargetTouched>,
    dispatcher: Res<ActionDispatcher>,
    root: Res<VirtualRoot>,
    target: Res<Target>,
    goal: Res<WalkSpeedGoal>,
    sim_config: Res<SimConfig>,
) {
    if !episode.is_running() {
        pending.0 = None;
        touches.clear();
        return;
    }
    let Some(action) = pending.0.take() else {
        touches.clear();
        return;
    };

    if let Err(err) = dispatcher.apply(&action, &mut ctl, &mut perception) {
        panic!("cannot dispatch action: {err}");
    }

    let mut reward = step_reward(&ctl, &root, &target, &goal);
    for _ in touches.read() {
        reward += TOUCHED_TARGET_BONUS;
    }
    episode.advance(reward);
    if episode.check_truncation(sim_config.max_episode_steps) {
        debug!(
            "episode {} truncated at step {}",
            episode.episode_number, episode.step_count
        );
    }
}

/// Assembles the observation for the step just taken and publishes it in
/// [`LatestObservation`].
///
/// # Panics
/// Panics when the virtual root frame is degenerate.
#[allow(clippy::needless_pass_by_value)] // Bevy system parameters are extracted by value
pub fn collect_observation_system(
    mut builder: ResMut<ObservationBuilder>,
    mut latest: ResMut<LatestObservation>,
    ctl: Res<JointDriveController>,
    root: Res<VirtualRoot>,
    target: Res<Target>,
    goal: Res<WalkSpeedGoal>,
    perception: Res<ActuatedPerception>,
    sim_config: Res<SimConfig>,
) {
    match builder.collect(
        &ctl,
        &root,
        &target,
        &goal,
        &perception,
        sim_config.physics_dt,
    ) {
        Ok(obs) => latest.0 = Some(obs),
        Err(err) => panic!("cannot collect observation: {err}"),
    }
}
