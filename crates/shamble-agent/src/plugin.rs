//! Plugin wiring: resources, events, and system ordering.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::dispatch::ActionDispatcher;
use crate::episode::Episode;
use crate::frame::VirtualRoot;
use crate::goal::{Target, WalkSpeedGoal};
use crate::observation::ObservationBuilder;
use crate::systems;
use shamble_body::parts::JointDriveController;
use shamble_body::perception::ActuatedPerception;
use shamble_core::config::{ResetParams, SimConfig, WalkerConfig};
use shamble_core::types::{Action, Observation};

// ---------------------------------------------------------------------------
// System sets
// ---------------------------------------------------------------------------

/// Decision-step phases, chained in `Update`.
#[derive(SystemSet, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WalkerSet {
    /// Episode reset handling.
    Reset,
    /// Action dispatch and reward.
    Act,
    /// Observation collection.
    Observe,
}

// ---------------------------------------------------------------------------
// Resources and events
// ---------------------------------------------------------------------------

/// Action staged by the host loop for the next update. Taken (and cleared)
/// by the act phase; an empty slot makes the step a no-op.
#[derive(Resource, Clone, Debug, Default)]
pub struct PendingAction(pub Option<Action>);

/// Observation published by the most recent update.
#[derive(Resource, Clone, Debug, Default)]
pub struct LatestObservation(pub Option<Observation>);

/// Seeded RNG for episode randomization. All stochastic episode state flows
/// through this stream, so a fixed seed reproduces a rollout exactly.
#[derive(Resource, Clone, Debug)]
pub struct AgentRng(pub ChaCha8Rng);

/// Request an episode reset on the next update.
#[derive(Event, Clone, Copy, Debug, Default)]
pub struct EpisodeReset;

/// Emitted by the host scene's collision reporting when the body touches
/// the walk target. Each event adds the target bonus to that step's reward.
#[derive(Event, Clone, Copy, Debug, Default)]
pub struct TargetTouched;

// ---------------------------------------------------------------------------
// ShambleAgentPlugin
// ---------------------------------------------------------------------------

/// Bevy plugin for the walker decision step.
///
/// Inserts every agent resource, registers the reset and target-touch
/// events, and chains the [`WalkerSet`] phases in `Update`. The host scene
/// is responsible for writing body kinematics into
/// [`JointDriveController`] and keeping [`VirtualRoot`] and [`Target`]
/// current between updates.
#[derive(Clone, Debug, Default)]
pub struct ShambleAgentPlugin {
    pub sim_config: SimConfig,
    pub walker_config: WalkerConfig,
}

impl ShambleAgentPlugin {
    /// Build from explicit configuration.
    #[must_use]
    pub const fn new(sim_config: SimConfig, walker_config: WalkerConfig) -> Self {
        Self {
            sim_config,
            walker_config,
        }
    }
}

impl Plugin for ShambleAgentPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.sim_config.clone())
            .insert_resource(self.walker_config.clone())
            .insert_resource(WalkSpeedGoal::new(&self.walker_config))
            .insert_resource(ActuatedPerception::from_config(&self.walker_config))
            .insert_resource(ActionDispatcher::new(
                self.walker_config.arm_strength_multiplier,
            ))
            .insert_resource(AgentRng(ChaCha8Rng::seed_from_u64(self.sim_config.seed)))
            .init_resource::<JointDriveController>()
            .init_resource::<VirtualRoot>()
            .init_resource::<Target>()
            .init_resource::<Episode>()
            .init_resource::<ObservationBuilder>()
            .init_resource::<ResetParams>()
            .init_resource::<PendingAction>()
            .init_resource::<LatestObservation>()
            .add_event::<EpisodeReset>()
            .add_event::<TargetTouched>()
            .configure_sets(
                Update,
                (WalkerSet::Reset, WalkerSet::Act, WalkerSet::Observe).chain(),
            )
            .add_systems(
                Update,
                (
                    systems::episode_reset_system.in_set(WalkerSet::Reset),
                    systems::apply_action_system.in_set(WalkerSet::Act),
                    systems::collect_observation_system.in_set(WalkerSet::Observe),
                ),
            );
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
