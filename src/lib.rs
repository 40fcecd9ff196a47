//! Bounce Arena - thread-per-body ball simulation
//!
//! Core modules:
//! - `sim`: Arena geometry, bodies, collision response, placement and steppers
//! - `simulation`: Lifecycle controller (start/dispose)
//! - `settings`: Configuration surface with JSON load/save
//! - `error`: Error taxonomy

pub mod error;
pub mod settings;
pub mod sim;
pub mod simulation;

pub use error::{Result, SimError};
pub use settings::{Settings, SpeedPreset};
pub use simulation::{LifecycleState, Simulation, Stats};

/// Immutable 2D value type used for positions and velocities
pub type Vector2 = glam::DVec2;

/// Default configuration constants
pub mod consts {
    /// Arena dimensions (including border)
    pub const ARENA_WIDTH: f64 = 400.0;
    pub const ARENA_HEIGHT: f64 = 420.0;
    pub const ARENA_BORDER: f64 = 4.0;

    /// Body defaults
    pub const BODY_DIAMETER: f64 = 20.0;
    pub const BODY_MASS: f64 = 1.0;
    /// Upper bound (exclusive) of each initial velocity component
    pub const MAX_START_SPEED: f64 = 2.5;

    /// Candidate positions tried per body before placement gives up
    pub const PLACEMENT_ATTEMPTS: u32 = 100;
}

/// Squared distance between two points
#[inline]
pub fn distance_squared(a: Vector2, b: Vector2) -> f64 {
    (b - a).length_squared()
}
