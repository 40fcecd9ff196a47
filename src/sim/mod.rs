//! Simulation core
//!
//! Everything the steppers touch lives here:
//! - Arena bounds and clamping
//! - Body records and read-only handles
//! - The world and its lock
//! - Wall reflection and pairwise impulse response
//! - Initial placement and the per-body step loop

pub mod arena;
pub mod body;
pub mod collision;
pub mod placement;
pub mod stepper;
pub mod world;

pub use arena::Arena;
pub use body::{Body, BodyHandle};
pub use collision::{Contact, reflect_off_walls, resolve_contact};
pub use placement::place;
pub use stepper::{Stepper, step_body};
pub use world::World;
