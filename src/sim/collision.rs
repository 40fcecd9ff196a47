//! Collision detection and response
//!
//! Two kinds of contact: a ball against the arena walls (per-axis reflection
//! with clamping) and a ball against another ball (mass-weighted elastic
//! impulse along the contact normal plus positional correction).

use super::arena::Arena;
use super::body::Body;
use crate::Vector2;

/// Extra clearance left between two balls after positional correction
pub const SEPARATION_SLOP: f64 = 1e-6;

/// Result of a resolved ball-ball contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit normal pointing from the stepping body toward the other body
    pub normal: Vector2,
    /// Overlap depth before correction
    pub penetration: f64,
    /// Relative velocity along the normal before the impulse (negative = approaching)
    pub velocity_along_normal: f64,
}

impl Contact {
    /// Whether an impulse was exchanged (bodies were approaching)
    #[inline]
    pub fn exchanged_impulse(&self) -> bool {
        self.velocity_along_normal < 0.0
    }
}

/// Reflect off the walls on each axis independently
///
/// `pos` is the tentative position for this tick. Any axis at or beyond a
/// bound has its velocity component negated and its coordinate clamped, so
/// the flip takes effect on this tick.
pub fn reflect_off_walls(pos: Vector2, vel: Vector2, arena: &Arena) -> (Vector2, Vector2) {
    let (x, vx) = reflect_axis(pos.x, vel.x, arena.x_min(), arena.x_max());
    let (y, vy) = reflect_axis(pos.y, vel.y, arena.y_min(), arena.y_max());
    (Vector2::new(x, y), Vector2::new(vx, vy))
}

#[inline]
fn reflect_axis(coord: f64, vel: f64, lo: f64, hi: f64) -> (f64, f64) {
    if coord <= lo || coord >= hi {
        (coord.clamp(lo, hi), -vel)
    } else {
        (coord, vel)
    }
}

/// Resolve a contact between `body` (at its tentative position) and `other`
///
/// Returns `None` when the balls do not overlap. Exactly coincident centers
/// are also `None`: there is no normal to push along.
///
/// Approaching pairs exchange the impulse `2·v_n / (m1 + m2)` scaled by the
/// other body's mass, which conserves momentum and keeps the tangential
/// components untouched. Every overlapping pair is then pushed apart to
/// `diameter + SEPARATION_SLOP`, see [`separate`].
pub fn resolve_contact(body: &mut Body, other: &mut Body, arena: &Arena) -> Option<Contact> {
    let diameter = arena.diameter;
    let delta = other.pos - body.pos;
    let dist_sq = delta.length_squared();
    if dist_sq <= 0.0 || dist_sq >= diameter * diameter {
        return None;
    }

    let distance = dist_sq.sqrt();
    let normal = delta / distance;
    let velocity_along_normal = (other.vel - body.vel).dot(normal);

    if velocity_along_normal < 0.0 {
        let impulse = 2.0 * velocity_along_normal / (body.mass + other.mass);
        body.vel += normal * (impulse * other.mass);
        other.vel -= normal * (impulse * body.mass);
    }

    let penetration = diameter - distance;
    separate(body, other, normal, arena);

    log::trace!(
        "contact {} <-> {}: penetration {:.3}, v_n {:.3}",
        body.id,
        other.id,
        penetration,
        velocity_along_normal
    );

    Some(Contact {
        normal,
        penetration,
        velocity_along_normal,
    })
}

/// Push two overlapping balls apart along `normal`
///
/// Each ball takes half the correction and is clamped into the arena. A ball
/// pinned against a wall cannot take its share, so whatever separation is
/// still missing goes to the other ball, then back to the first one if that
/// ball gets pinned too. Only a ball pinned on both sides keeps an overlap.
fn separate(body: &mut Body, other: &mut Body, normal: Vector2, arena: &Arena) {
    let target = arena.diameter + SEPARATION_SLOP;
    let half = normal * ((target - (other.pos - body.pos).length()) / 2.0);
    body.pos = arena.clamp(body.pos - half);
    other.pos = arena.clamp(other.pos + half);

    let gap = shortfall(body, other, target);
    if gap > 0.0 {
        let dir = (other.pos - body.pos).normalize_or(normal);
        other.pos = arena.clamp(other.pos + dir * gap);
    }
    let gap = shortfall(body, other, target);
    if gap > 0.0 {
        let dir = (other.pos - body.pos).normalize_or(normal);
        body.pos = arena.clamp(body.pos - dir * gap);
    }
}

#[inline]
fn shortfall(body: &Body, other: &Body, target: f64) -> f64 {
    target - (other.pos - body.pos).length()
}
