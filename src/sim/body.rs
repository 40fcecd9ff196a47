//! Body records and the read-only handle given to the rendering layer

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::world::World;
use crate::Vector2;

/// A simulated ball
///
/// `pos` is the corner of the ball's bounding square, so a ball fills
/// `[pos, pos + diameter]` on both axes. Distances between positions equal
/// center-to-center distances because the diameter is uniform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub id: u32,
    pub pos: Vector2,
    /// Displacement per tick
    pub vel: Vector2,
    pub mass: f64,
    pub diameter: f64,
}

impl Body {
    pub fn new(id: u32, pos: Vector2, vel: Vector2, mass: f64, diameter: f64) -> Self {
        Self {
            id,
            pos,
            vel,
            mass,
            diameter,
        }
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.diameter / 2.0
    }

    /// Geometric center of the ball
    #[inline]
    pub fn center(&self) -> Vector2 {
        self.pos + Vector2::splat(self.radius())
    }

    /// Where the body lands after one tick if nothing interferes
    #[inline]
    pub fn next_position(&self) -> Vector2 {
        self.pos + self.vel
    }

    #[inline]
    pub fn momentum(&self) -> Vector2 {
        self.vel * self.mass
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.vel.length_squared()
    }

    /// True if the two balls interpenetrate (touching does not count)
    pub fn overlaps(&self, other: &Body) -> bool {
        crate::distance_squared(self.pos, other.pos) < self.diameter * self.diameter
    }
}

/// Thread-safe, read-only view of one body in a running world
///
/// Every read takes the world lock, so values change between calls while
/// steppers run. Handles stay readable after the simulation is disposed and
/// then report the last committed state.
#[derive(Debug, Clone)]
pub struct BodyHandle {
    world: Arc<World>,
    index: usize,
}

impl BodyHandle {
    pub(crate) fn new(world: Arc<World>, index: usize) -> Self {
        Self { world, index }
    }

    /// Copy of the body's current state
    pub fn snapshot(&self) -> Body {
        self.world.lock()[self.index]
    }

    pub fn id(&self) -> u32 {
        self.snapshot().id
    }

    pub fn position(&self) -> Vector2 {
        self.snapshot().pos
    }

    pub fn velocity(&self) -> Vector2 {
        self.snapshot().vel
    }

    pub fn mass(&self) -> f64 {
        self.snapshot().mass
    }

    pub fn diameter(&self) -> f64 {
        self.world.arena().diameter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Arena;

    #[test]
    fn test_center_and_next_position() {
        let body = Body::new(0, Vector2::new(10.0, 20.0), Vector2::new(1.5, -2.0), 1.0, 20.0);
        assert_eq!(body.center(), Vector2::new(20.0, 30.0));
        assert_eq!(body.next_position(), Vector2::new(11.5, 18.0));
    }

    #[test]
    fn test_overlaps() {
        let a = Body::new(0, Vector2::new(100.0, 100.0), Vector2::ZERO, 1.0, 20.0);
        let touching = Body::new(1, Vector2::new(120.0, 100.0), Vector2::ZERO, 1.0, 20.0);
        let inside = Body::new(2, Vector2::new(110.0, 105.0), Vector2::ZERO, 1.0, 20.0);
        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&inside));
    }

    #[test]
    fn test_momentum_and_energy() {
        let body = Body::new(0, Vector2::ZERO, Vector2::new(3.0, 4.0), 2.0, 20.0);
        assert_eq!(body.momentum(), Vector2::new(6.0, 8.0));
        assert!((body.kinetic_energy() - 25.0).abs() < 1e-12);
    }

    #[test]
    fn test_handle_tracks_world_state() {
        let arena = Arena::new(400.0, 420.0, 4.0, 20.0);
        let body = Body::new(3, Vector2::new(50.0, 60.0), Vector2::new(1.0, 1.0), 2.5, 20.0);
        let world = Arc::new(World::new(arena, vec![body]));
        let handle = BodyHandle::new(Arc::clone(&world), 0);

        assert_eq!(handle.id(), 3);
        assert_eq!(handle.mass(), 2.5);
        assert_eq!(handle.diameter(), 20.0);

        world.lock()[0].pos = Vector2::new(70.0, 80.0);
        assert_eq!(handle.position(), Vector2::new(70.0, 80.0));
        assert_eq!(handle.velocity(), Vector2::new(1.0, 1.0));
    }
}
