//! Error types for the simulation core
//!
//! Setup failures surface synchronously from `Simulation::start`/`dispose`.
//! Steppers never produce errors.

use thiserror::Error;

/// Errors raised by the simulation lifecycle and configuration layer
#[derive(Error, Debug)]
pub enum SimError {
    /// Operation on a simulation that has already been disposed
    #[error("simulation already disposed")]
    AlreadyDisposed,

    /// `start` called on a simulation that is already running
    #[error("simulation already started")]
    AlreadyStarted,

    /// Bad body count or invalid settings; nothing was created
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The arena cannot hold the requested density of bodies
    #[error("no free position for body {index} after {attempts} attempts")]
    PlacementExhausted { index: usize, attempts: u32 },

    /// Settings file could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file is not valid JSON for `Settings`
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    /// The OS refused to spawn a stepper thread
    #[error("failed to spawn stepper for body {index}: {source}")]
    Spawn {
        index: usize,
        #[source]
        source: std::io::Error,
    },
}

/// Result alias for simulation operations
pub type Result<T> = std::result::Result<T, SimError>;

impl SimError {
    /// Creates a new invalid argument error.
    #[must_use]
    pub fn invalid<S: Into<String>>(msg: S) -> Self {
        Self::InvalidArgument(msg.into())
    }
}
