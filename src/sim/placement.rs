//! Initial placement of bodies
//!
//! Rejection sampling: each body gets a uniformly random position inside the
//! arena box, retried until it keeps at least one diameter of clearance from
//! every body placed before it.

use rand::Rng;

use super::arena::Arena;
use super::body::Body;
use crate::Vector2;
use crate::error::{Result, SimError};
use crate::settings::Settings;

/// Place `n` non-overlapping bodies inside the arena
///
/// Fails with `PlacementExhausted` as soon as one body cannot be placed within
/// `settings.placement_attempts` candidates; no partial result is returned.
pub fn place<R: Rng>(
    n: usize,
    arena: &Arena,
    settings: &Settings,
    rng: &mut R,
) -> Result<Vec<Body>> {
    if n == 0 {
        return Err(SimError::invalid("body count must be positive"));
    }

    let min_dist_sq = arena.diameter * arena.diameter;
    let mut bodies: Vec<Body> = Vec::with_capacity(n);

    for index in 0..n {
        let pos = find_free_position(&bodies, arena, min_dist_sq, settings.placement_attempts, rng)
            .ok_or(SimError::PlacementExhausted {
                index,
                attempts: settings.placement_attempts,
            })?;

        let vel = Vector2::new(
            sample(rng, settings.velocity_range),
            sample(rng, settings.velocity_range),
        );
        let mass = sample(rng, settings.mass_range);

        log::debug!("Placed body {} at ({:.1}, {:.1})", index, pos.x, pos.y);
        bodies.push(Body::new(index as u32, pos, vel, mass, arena.diameter));
    }

    Ok(bodies)
}

fn find_free_position<R: Rng>(
    placed: &[Body],
    arena: &Arena,
    min_dist_sq: f64,
    attempts: u32,
    rng: &mut R,
) -> Option<Vector2> {
    (0..attempts).find_map(|_| {
        let candidate = Vector2::new(
            rng.random_range(arena.x_min()..arena.x_max()),
            rng.random_range(arena.y_min()..arena.y_max()),
        );
        placed
            .iter()
            .all(|b| crate::distance_squared(b.pos, candidate) >= min_dist_sq)
            .then_some(candidate)
    })
}

/// Draw from `[min, max)`; a degenerate range yields `min`
fn sample<R: Rng>(rng: &mut R, (min, max): (f64, f64)) -> f64 {
    if min < max {
        rng.random_range(min..max)
    } else {
        min
    }
}
