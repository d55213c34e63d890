use thiserror::Error;

/// Top-level error type for the Shamble workspace.
#[derive(Debug, Error)]
pub enum ShambleError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Contract violation: {0}")]
    Contract(#[from] ContractError),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid physics_dt: {0} (must be > 0)")]
    InvalidPhysicsDt(f64),

    #[error("control_dt must be >= physics_dt")]
    ControlDtLessThanPhysicsDt,

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

/// Per-step contract violations.
///
/// The decision step has no recoverable-error paths: a malformed action or
/// a degenerate reference frame must halt the step before any joint state
/// is touched. Copy + static messages for cheap propagation in the hot path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContractError {
    #[error("Action length mismatch: expected {expected}, got {got}")]
    ActionLenMismatch { expected: usize, got: usize },

    #[error("Action contains a non-finite value at index {index}")]
    ActionNotFinite { index: usize },

    #[error("Virtual root frame is degenerate (non-finite or unnormalized rotation)")]
    DegenerateFrame,
}
