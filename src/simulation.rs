//! Simulation lifecycle
//!
//! `Simulation` owns the world and the stepper threads. It moves through
//! `Idle -> Running -> Disposed`; once disposed every operation fails with
//! `SimError::AlreadyDisposed`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Sender};
use std::thread::JoinHandle;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::Vector2;
use crate::error::{Result, SimError};
use crate::settings::Settings;
use crate::sim::{Arena, Body, BodyHandle, Stepper, World, place};

/// Lifecycle phase of a simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LifecycleState {
    /// Created, nothing placed yet
    Idle,
    /// Steppers are running
    Running,
    /// Steppers joined, world released
    Disposed,
}

/// Counters for a running simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Stats {
    pub bodies: usize,
    /// Committed stepper iterations across all bodies
    pub steps: u64,
    /// Resolved ball-ball contacts
    pub collisions: u64,
}

#[derive(Debug)]
pub struct Simulation {
    settings: Settings,
    state: LifecycleState,
    world: Option<Arc<World>>,
    running: Arc<AtomicBool>,
    steppers: Vec<JoinHandle<()>>,
}

impl Simulation {
    /// Create an idle simulation; settings are validated up front
    pub fn new(settings: Settings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            state: LifecycleState::Idle,
            world: None,
            running: Arc::new(AtomicBool::new(false)),
            steppers: Vec::new(),
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LifecycleState::Running
    }

    pub fn is_disposed(&self) -> bool {
        self.state == LifecycleState::Disposed
    }

    /// Place `n` bodies at random and start one stepper per body
    ///
    /// `on_created` runs once per body, in creation order, with the starting
    /// position and a handle to the body. Stepper threads are spawned parked
    /// and only begin once every call has returned. If placement or a thread
    /// spawn fails, nothing is notified.
    pub fn start<F>(&mut self, n: usize, on_created: F) -> Result<()>
    where
        F: FnMut(Vector2, BodyHandle),
    {
        self.ensure_idle()?;
        if n == 0 {
            return Err(SimError::invalid("body count must be positive"));
        }

        let arena = Arena::from(&self.settings);
        let seed = self.settings.seed.unwrap_or_else(|| rand::rng().random());
        let mut rng = Pcg32::seed_from_u64(seed);
        let bodies = place(n, &arena, &self.settings, &mut rng)?;
        log::info!("Placed {} bodies (seed {})", n, seed);

        self.launch(arena, bodies, on_created)
    }

    /// Start from an explicit layout instead of random placement
    ///
    /// Ids are reassigned in slice order and every body takes the arena
    /// diameter. Bodies must lie inside the arena and have a positive mass.
    pub fn start_with_bodies<F>(&mut self, bodies: Vec<Body>, on_created: F) -> Result<()>
    where
        F: FnMut(Vector2, BodyHandle),
    {
        self.ensure_idle()?;
        if bodies.is_empty() {
            return Err(SimError::invalid("body count must be positive"));
        }

        let arena = Arena::from(&self.settings);
        let mut bodies = bodies;
        for (index, body) in bodies.iter_mut().enumerate() {
            if !arena.contains(body.pos) {
                return Err(SimError::invalid(format!(
                    "body {} at {:?} lies outside the arena",
                    index, body.pos
                )));
            }
            if !(body.mass > 0.0 && body.mass.is_finite()) || !body.vel.is_finite() {
                return Err(SimError::invalid(format!(
                    "body {} needs a positive mass and a finite velocity",
                    index
                )));
            }
            body.id = index as u32;
            body.diameter = arena.diameter;
        }

        self.launch(arena, bodies, on_created)
    }

    /// Spawn the steppers parked, notify, then release them
    ///
    /// Every thread is spawned before the first callback, so a spawn failure
    /// reports `Spawn` without having handed out any handle.
    fn launch<F>(&mut self, arena: Arena, bodies: Vec<Body>, mut on_created: F) -> Result<()>
    where
        F: FnMut(Vector2, BodyHandle),
    {
        let starts: Vec<Vector2> = bodies.iter().map(|b| b.pos).collect();
        let world = Arc::new(World::new(arena, bodies));

        let mut gates: Vec<Sender<()>> = Vec::with_capacity(starts.len());
        for index in 0..starts.len() {
            let (go, gate) = mpsc::channel();
            let stepper = Stepper::new(
                Arc::clone(&world),
                index,
                Arc::clone(&self.running),
                self.settings.tick_interval(),
            );
            match stepper.spawn_gated(gate) {
                Ok(handle) => {
                    self.steppers.push(handle);
                    gates.push(go);
                }
                Err(source) => {
                    drop(gates);
                    self.stop_steppers();
                    return Err(SimError::Spawn { index, source });
                }
            }
        }

        for (index, start) in starts.into_iter().enumerate() {
            on_created(start, BodyHandle::new(Arc::clone(&world), index));
        }

        self.running.store(true, Ordering::Release);
        for (index, go) in gates.into_iter().enumerate() {
            if go.send(()).is_err() {
                log::warn!("Stepper {} exited before it was released", index);
            }
        }

        log::info!(
            "Simulation running: {} steppers, tick {} ms",
            self.steppers.len(),
            self.settings.tick_interval_ms
        );
        self.world = Some(world);
        self.state = LifecycleState::Running;
        Ok(())
    }

    /// Stop every stepper and release the world
    ///
    /// Returns once all stepper threads have exited. A second call fails with
    /// `AlreadyDisposed`.
    pub fn dispose(&mut self) -> Result<()> {
        self.ensure_live()?;
        self.stop_steppers();
        self.world = None;
        self.state = LifecycleState::Disposed;
        log::info!("Simulation disposed");
        Ok(())
    }

    /// Copy of every body in creation order (empty before `start`)
    pub fn snapshot(&self) -> Result<Vec<Body>> {
        self.ensure_live()?;
        Ok(self.world.as_ref().map(|w| w.snapshot()).unwrap_or_default())
    }

    pub fn body_count(&self) -> Result<usize> {
        self.ensure_live()?;
        Ok(self.world.as_ref().map_or(0, |w| w.len()))
    }

    /// Fresh handles to every body
    pub fn handles(&self) -> Result<Vec<BodyHandle>> {
        self.ensure_live()?;
        Ok(match &self.world {
            Some(world) => (0..world.len())
                .map(|index| BodyHandle::new(Arc::clone(world), index))
                .collect(),
            None => Vec::new(),
        })
    }

    pub fn stats(&self) -> Result<Stats> {
        self.ensure_live()?;
        Ok(match &self.world {
            Some(world) => Stats {
                bodies: world.len(),
                steps: world.steps(),
                collisions: world.collisions(),
            },
            None => Stats::default(),
        })
    }

    fn ensure_live(&self) -> Result<()> {
        if self.is_disposed() {
            return Err(SimError::AlreadyDisposed);
        }
        Ok(())
    }

    fn ensure_idle(&self) -> Result<()> {
        match self.state {
            LifecycleState::Idle => Ok(()),
            LifecycleState::Running => Err(SimError::AlreadyStarted),
            LifecycleState::Disposed => Err(SimError::AlreadyDisposed),
        }
    }

    fn stop_steppers(&mut self) {
        self.running.store(false, Ordering::Release);
        for handle in self.steppers.drain(..) {
            if handle.join().is_err() {
                log::warn!("A stepper thread panicked before shutdown");
            }
        }
    }
}

impl Drop for Simulation {
    fn drop(&mut self) {
        if !self.is_disposed() {
            self.stop_steppers();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_settings() -> Settings {
        Settings {
            tick_interval_ms: 1,
            seed: Some(7),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_rejects_invalid_settings() {
        let settings = Settings {
            diameter: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            Simulation::new(settings),
            Err(SimError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_start_zero_bodies_creates_nothing() {
        let mut sim = Simulation::new(fast_settings()).unwrap();
        let mut calls = 0;
        let err = sim.start(0, |_, _| calls += 1).unwrap_err();
        assert!(matches!(err, SimError::InvalidArgument(_)));
        assert_eq!(calls, 0);
        assert_eq!(sim.state(), LifecycleState::Idle);
        assert_eq!(sim.body_count().unwrap(), 0);
    }

    #[test]
    fn test_callback_once_per_body() {
        let mut sim = Simulation::new(fast_settings()).unwrap();
        let mut created: Vec<(Vector2, u32)> = Vec::new();
        sim.start(6, |pos, handle| created.push((pos, handle.id()))).unwrap();

        assert!(sim.is_running());
        assert_eq!(created.len(), 6);
        let ids: Vec<u32> = created.iter().map(|(_, id)| *id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(sim.body_count().unwrap(), 6);
        sim.dispose().unwrap();
    }

    #[test]
    fn test_start_twice_rejected() {
        let mut sim = Simulation::new(fast_settings()).unwrap();
        sim.start(2, |_, _| {}).unwrap();
        assert!(matches!(
            sim.start(2, |_, _| {}),
            Err(SimError::AlreadyStarted)
        ));
        assert_eq!(sim.body_count().unwrap(), 2);
    }

    #[test]
    fn test_double_dispose() {
        let mut sim = Simulation::new(fast_settings()).unwrap();
        sim.start(3, |_, _| {}).unwrap();
        sim.dispose().unwrap();
        assert!(sim.is_disposed());
        assert!(matches!(sim.dispose(), Err(SimError::AlreadyDisposed)));
    }

    #[test]
    fn test_dispose_idle_simulation() {
        let mut sim = Simulation::new(fast_settings()).unwrap();
        sim.dispose().unwrap();
        assert!(matches!(sim.dispose(), Err(SimError::AlreadyDisposed)));
    }

    #[test]
    fn test_operations_after_dispose_fail() {
        let mut sim = Simulation::new(fast_settings()).unwrap();
        sim.start(2, |_, _| {}).unwrap();
        sim.dispose().unwrap();

        assert!(matches!(sim.start(2, |_, _| {}), Err(SimError::AlreadyDisposed)));
        assert!(matches!(sim.snapshot(), Err(SimError::AlreadyDisposed)));
        assert!(matches!(sim.body_count(), Err(SimError::AlreadyDisposed)));
        assert!(matches!(sim.handles(), Err(SimError::AlreadyDisposed)));
        assert!(matches!(sim.stats(), Err(SimError::AlreadyDisposed)));
    }

    #[test]
    fn test_placement_exhaustion_surfaces() {
        let settings = Settings {
            width: 60.0,
            height: 60.0,
            ..fast_settings()
        };
        let mut sim = Simulation::new(settings).unwrap();
        let mut calls = 0;
        let err = sim.start(10, |_, _| calls += 1).unwrap_err();

        assert!(matches!(err, SimError::PlacementExhausted { .. }));
        assert_eq!(calls, 0);
        assert_eq!(sim.state(), LifecycleState::Idle);
    }

    #[test]
    fn test_start_with_bodies_validates_layout() {
        let mut sim = Simulation::new(fast_settings()).unwrap();
        let outside = Body::new(0, Vector2::new(1.0, 50.0), Vector2::ZERO, 1.0, 20.0);
        assert!(matches!(
            sim.start_with_bodies(vec![outside], |_, _| {}),
            Err(SimError::InvalidArgument(_))
        ));

        let massless = Body::new(0, Vector2::new(50.0, 50.0), Vector2::ZERO, 0.0, 20.0);
        assert!(matches!(
            sim.start_with_bodies(vec![massless], |_, _| {}),
            Err(SimError::InvalidArgument(_))
        ));
        assert_eq!(sim.state(), LifecycleState::Idle);
    }

    #[test]
    fn test_nothing_moves_until_every_callback_returns() {
        let mut sim = Simulation::new(fast_settings()).unwrap();
        let mut seen: Vec<(Vector2, BodyHandle)> = Vec::new();
        sim.start(4, |pos, handle| {
            for (start, earlier) in &seen {
                assert_eq!(earlier.position(), *start, "body {} moved early", earlier.id());
            }
            assert_eq!(handle.position(), pos);
            seen.push((pos, handle));
            std::thread::sleep(std::time::Duration::from_millis(5));
        })
        .unwrap();

        assert_eq!(seen.len(), 4);
        sim.dispose().unwrap();
    }

    #[test]
    fn test_drop_stops_steppers() {
        let mut sim = Simulation::new(fast_settings()).unwrap();
        let mut handles = Vec::new();
        sim.start(3, |_, handle| handles.push(handle)).unwrap();
        drop(sim);

        let frozen: Vec<Body> = handles.iter().map(|h| h.snapshot()).collect();
        std::thread::sleep(std::time::Duration::from_millis(10));
        let later: Vec<Body> = handles.iter().map(|h| h.snapshot()).collect();
        assert_eq!(frozen, later);
    }
}
