// shamble-core: Types, spaces, errors, and configuration for the Shamble walker agent.

pub mod config;
pub mod error;
pub mod types;

pub mod prelude {
    pub use crate::config::{ResetParams, SimConfig, WalkerConfig};
    pub use crate::error::{ConfigError, ContractError, ShambleError};
    pub use crate::types::{Action, BoxSpace, Observation};
}
