//! Walk target and goal-speed state.

use bevy::math::Vec3;
use bevy::prelude::Resource;
use rand::Rng;
use shamble_core::config::{MAX_WALK_SPEED, MIN_WALK_SPEED, WalkerConfig};

// ---------------------------------------------------------------------------
// Target
// ---------------------------------------------------------------------------

/// World position of the walk target the agent is rewarded for reaching.
///
/// The host scene owns target placement and respawning; the agent only reads
/// the position for observations and reward.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq)]
pub struct Target {
    pub position: Vec3,
}

impl Target {
    #[must_use]
    pub const fn new(position: Vec3) -> Self {
        Self { position }
    }
}

// ---------------------------------------------------------------------------
// WalkSpeedGoal
// ---------------------------------------------------------------------------

/// Commanded walking speed for the current episode.
///
/// The speed is invariant within an episode. When randomization is on it is
/// resampled uniformly at every episode start; otherwise it keeps the
/// configured value.
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct WalkSpeedGoal {
    speed: f32,
    /// Resample the speed at every episode start.
    pub randomize: bool,
}

impl Default for WalkSpeedGoal {
    fn default() -> Self {
        Self {
            speed: MAX_WALK_SPEED,
            randomize: false,
        }
    }
}

impl WalkSpeedGoal {
    /// Build from walker configuration, clamping the configured speed into
    /// the supported range.
    #[must_use]
    pub fn new(config: &WalkerConfig) -> Self {
        Self {
            speed: config
                .target_walking_speed
                .clamp(MIN_WALK_SPEED, MAX_WALK_SPEED),
            randomize: config.randomize_walk_speed,
        }
    }

    /// Current goal speed in m/s, always within the supported range.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Set the goal speed, clamped into the supported range.
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.clamp(MIN_WALK_SPEED, MAX_WALK_SPEED);
    }

    /// Episode-start resample: uniform in range when randomizing, otherwise
    /// the speed is left untouched.
    pub fn resample(&mut self, rng: &mut impl Rng) {
        if self.randomize {
            self.speed = rng.gen_range(MIN_WALK_SPEED..=MAX_WALK_SPEED);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn default_goal_is_max_speed_without_randomization() {
        let goal = WalkSpeedGoal::default();
        assert!((goal.speed() - MAX_WALK_SPEED).abs() < f32::EPSILON);
        assert!(!goal.randomize);
    }

    #[test]
    fn new_clamps_configured_speed() {
        let config = WalkerConfig {
            target_walking_speed: 50.0,
            ..WalkerConfig::default()
        };
        let goal = WalkSpeedGoal::new(&config);
        assert!((goal.speed() - MAX_WALK_SPEED).abs() < f32::EPSILON);
    }

    #[test]
    fn set_speed_clamps_into_range() {
        let mut goal = WalkSpeedGoal::default();
        goal.set_speed(0.0);
        assert!((goal.speed() - MIN_WALK_SPEED).abs() < f32::EPSILON);
        goal.set_speed(4.2);
        assert!((goal.speed() - 4.2).abs() < f32::EPSILON);
    }

    #[test]
    fn resample_is_inert_when_not_randomizing() {
        let mut goal = WalkSpeedGoal::default();
        goal.set_speed(3.0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        goal.resample(&mut rng);
        assert!((goal.speed() - 3.0).abs() < f32::EPSILON);
    }

    #[test]
    fn resample_stays_in_range() {
        let mut goal = WalkSpeedGoal {
            randomize: true,
            ..WalkSpeedGoal::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..100 {
            goal.resample(&mut rng);
            assert!((MIN_WALK_SPEED..=MAX_WALK_SPEED).contains(&goal.speed()));
        }
    }

    #[test]
    fn resample_is_deterministic_under_seed() {
        let mut a = WalkSpeedGoal {
            randomize: true,
            ..WalkSpeedGoal::default()
        };
        let mut b = a;
        let mut rng_a = ChaCha8Rng::seed_from_u64(7);
        let mut rng_b = ChaCha8Rng::seed_from_u64(7);
        a.resample(&mut rng_a);
        b.resample(&mut rng_b);
        assert!((a.speed() - b.speed()).abs() < f32::EPSILON);
    }
}
