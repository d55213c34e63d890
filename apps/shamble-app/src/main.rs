//! Shamble walker CLI.
//!
//! Provides two modes of operation:
//! - `headless`: Run N random-policy episodes locally and print statistics
//! - `info`: Print workspace crate versions and the agent's vector layout

use bevy::prelude::*;
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use shamble_agent::prelude::*;
use shamble_core::config::{SimConfig, WalkerConfig};
use shamble_core::error::ShambleError;

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

/// Shamble humanoid walker agent.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run random-policy episodes locally and print statistics.
    Headless {
        /// Number of episodes to run.
        #[arg(short = 'n', long, default_value_t = 1)]
        episodes: u32,

        /// Maximum decision steps per episode.
        #[arg(short, long, default_value_t = 100)]
        max_steps: u32,

        /// Random seed.
        #[arg(short, long, default_value_t = 0)]
        seed: u64,

        /// Path to a walker TOML config.
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,

        /// Resample the goal walking speed at every episode start.
        #[arg(long)]
        randomize_speed: bool,

        /// Let the policy drive the ray-perception parameters.
        #[arg(long)]
        actuated_perception: bool,
    },

    /// Print crate information.
    Info,
}

// ---------------------------------------------------------------------------
// Mode implementations
// ---------------------------------------------------------------------------

fn run_headless(
    episodes: u32,
    max_steps: u32,
    seed: u64,
    walker_config: WalkerConfig,
) -> Result<(), ShambleError> {
    walker_config.validate()?;
    let sim_config = SimConfig {
        max_episode_steps: max_steps,
        seed,
        ..SimConfig::default()
    };
    sim_config.validate()?;

    let perception = walker_config.use_actuated_perception;
    let mut app = App::new();
    app.add_plugins(ShambleAgentPlugin::new(sim_config, walker_config));
    app.finish();
    app.cleanup();

    // Separate stream from the agent's own RNG so policy noise does not
    // perturb episode randomization.
    let mut policy_rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(1));
    let action_space = BoxSpace::symmetric(action_dim(perception), 1.0);

    for ep in 0..episodes {
        app.world_mut().send_event(EpisodeReset);
        app.update();

        for _ in 0..max_steps {
            let action = action_space.sample(&mut policy_rng);
            app.world_mut().resource_mut::<PendingAction>().0 = Some(action);
            app.update();
            if app.world().resource::<Episode>().is_done() {
                break;
            }
        }

        let episode = app.world().resource::<Episode>();
        let goal = app.world().resource::<WalkSpeedGoal>();
        println!(
            "episode {}: steps={}, reward={:.3}, goal_speed={:.2}",
            ep + 1,
            episode.step_count,
            episode.total_reward,
            goal.speed()
        );
    }

    println!("\ntotal: episodes={episodes}, seed={seed}");
    Ok(())
}

fn run_info() {
    println!("shamble v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("crates:");
    println!("  shamble-core  {}", env!("CARGO_PKG_VERSION"));
    println!("  shamble-body  {}", env!("CARGO_PKG_VERSION"));
    println!("  shamble-agent {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("observation_dim: {}", observation_dim(false));
    println!("observation_dim (actuated perception): {}", observation_dim(true));
    println!("action_dim: {}", action_dim(false));
    println!("action_dim (actuated perception): {}", action_dim(true));
    println!("edition: 2024");
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> Result<(), ShambleError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Headless {
            episodes,
            max_steps,
            seed,
            config,
            randomize_speed,
            actuated_perception,
        }) => {
            let mut walker_config = match config {
                Some(path) => WalkerConfig::from_file(path)?,
                None => WalkerConfig::default(),
            };
            walker_config.randomize_walk_speed |= randomize_speed;
            walker_config.use_actuated_perception |= actuated_perception;
            run_headless(episodes, max_steps, seed, walker_config)
        }
        Some(Commands::Info) => {
            run_info();
            Ok(())
        }
        None => {
            // Default: run headless with defaults
            run_headless(1, 100, 0, WalkerConfig::default())
        }
    }
}
