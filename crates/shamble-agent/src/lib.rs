//! The decision-step core of the Shamble walker: observation construction,
//! action dispatch, reward shaping, and episode lifecycle.
//!
//! One decision step is observe, act, reward, driven once per control tick
//! by the host loop. Add [`ShambleAgentPlugin`](plugin::ShambleAgentPlugin)
//! to a Bevy app, write a [`PendingAction`](plugin::PendingAction) before
//! each update, and read [`LatestObservation`](plugin::LatestObservation)
//! and the [`Episode`](episode::Episode) resource afterwards.
//!
//! # Example
//!
//! ```
//! use bevy::prelude::*;
//! use shamble_agent::prelude::*;
//!
//! let mut app = App::new();
//! app.add_plugins(ShambleAgentPlugin::default());
//! app.world_mut().send_event(EpisodeReset);
//! app.update();
//!
//! let dim = app.world().resource::<LatestObservation>().0.as_ref().unwrap().len();
//! assert_eq!(dim, observation_dim(false));
//! ```

pub mod dispatch;
pub mod episode;
pub mod frame;
pub mod goal;
pub mod observation;
pub mod plugin;
pub mod reward;
pub mod schema;
pub mod systems;

pub mod prelude {
    pub use crate::dispatch::ActionDispatcher;
    pub use crate::episode::{Episode, EpisodeState, apply_torso_mass, begin_episode};
    pub use crate::frame::VirtualRoot;
    pub use crate::goal::{Target, WalkSpeedGoal};
    pub use crate::observation::{ObservationBuilder, observation_dim};
    pub use crate::plugin::{
        AgentRng, EpisodeReset, LatestObservation, PendingAction, ShambleAgentPlugin, TargetTouched,
        WalkerSet,
    };
    pub use crate::reward::{
        TOUCHED_TARGET_BONUS, facing_reward, matching_velocity_reward, step_reward,
    };
    pub use crate::schema::{ROTATION_SCHEMA, STRENGTH_SCHEMA, action_dim, rotation_len};
    pub use shamble_body::prelude::*;
    pub use shamble_core::prelude::*;
}
