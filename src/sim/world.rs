//! Shared world state
//!
//! The world owns every body behind a single mutex (the world lock). Any
//! read-modify-write that touches body state goes through `World::lock`.
//! The body collection is fixed at construction.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::arena::Arena;
use super::body::Body;

#[derive(Debug)]
pub struct World {
    arena: Arena,
    bodies: Mutex<Vec<Body>>,
    /// Committed stepper iterations
    steps: AtomicU64,
    /// Resolved contacts
    collisions: AtomicU64,
}

impl World {
    pub fn new(arena: Arena, bodies: Vec<Body>) -> Self {
        Self {
            arena,
            bodies: Mutex::new(bodies),
            steps: AtomicU64::new(0),
            collisions: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Acquire the world lock
    ///
    /// A poisoned lock is recovered: steppers commit only at the end of an
    /// iteration, so a panic inside the critical section leaves no partial
    /// update behind.
    pub fn lock(&self) -> MutexGuard<'_, Vec<Body>> {
        self.bodies.lock().unwrap_or_else(|poisoned: PoisonError<_>| {
            log::warn!("World lock poisoned by a panicked stepper, recovering");
            poisoned.into_inner()
        })
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of every body, in creation order
    pub fn snapshot(&self) -> Vec<Body> {
        self.lock().clone()
    }

    /// Count one committed iteration and the contacts it resolved
    pub fn record_step(&self, contacts: usize) {
        self.steps.fetch_add(1, Ordering::Relaxed);
        if contacts > 0 {
            self.collisions.fetch_add(contacts as u64, Ordering::Relaxed);
        }
    }

    pub fn steps(&self) -> u64 {
        self.steps.load(Ordering::Relaxed)
    }

    pub fn collisions(&self) -> u64 {
        self.collisions.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vector2;
    use std::sync::Arc;

    fn arena() -> Arena {
        Arena::new(400.0, 420.0, 4.0, 20.0)
    }

    #[test]
    fn test_snapshot_preserves_creation_order() {
        let bodies: Vec<Body> = (0..3)
            .map(|i| Body::new(i, Vector2::new(10.0 + 30.0 * i as f64, 10.0), Vector2::ZERO, 1.0, 20.0))
            .collect();
        let world = World::new(arena(), bodies.clone());
        assert_eq!(world.len(), 3);
        assert_eq!(world.snapshot(), bodies);
    }

    #[test]
    fn test_record_step_counts() {
        let world = World::new(arena(), Vec::new());
        assert!(world.is_empty());
        world.record_step(0);
        world.record_step(2);
        assert_eq!(world.steps(), 2);
        assert_eq!(world.collisions(), 2);
    }

    #[test]
    fn test_lock_recovers_from_poison() {
        let body = Body::new(0, Vector2::new(50.0, 50.0), Vector2::ZERO, 1.0, 20.0);
        let world = Arc::new(World::new(arena(), vec![body]));

        let poisoner = Arc::clone(&world);
        let result: std::thread::Result<()> = std::thread::spawn(move || {
            let _guard = poisoner.lock();
            panic!("stepper fault");
        })
        .join();
        assert!(result.is_err());

        assert_eq!(world.snapshot(), vec![body]);
    }
}
