//! Per-body step loop
//!
//! Every body is driven by its own OS thread. One iteration holds the world
//! lock for the whole read/decide/write sequence, so iterations of different
//! bodies are serialized while their order stays unspecified.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Receiver;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::arena::Arena;
use super::body::Body;
use super::collision::{reflect_off_walls, resolve_contact};
use super::world::World;

/// Advance `bodies[index]` by one tick
///
/// Moves the body by its velocity, reflects it off the walls, then resolves
/// contacts against every other body. Work happens on copies that are written
/// back at the end, so the slice is never left half-updated. Returns the
/// number of contacts resolved.
pub fn step_body(bodies: &mut [Body], index: usize, arena: &Arena) -> usize {
    let mut body = bodies[index];
    let (pos, vel) = reflect_off_walls(body.next_position(), body.vel, arena);
    body.pos = pos;
    body.vel = vel;

    let mut touched: Vec<(usize, Body)> = Vec::new();
    for (j, other) in bodies.iter().enumerate() {
        if j == index {
            continue;
        }
        let mut other = *other;
        if resolve_contact(&mut body, &mut other, arena).is_some() {
            touched.push((j, other));
        }
    }

    let contacts = touched.len();
    bodies[index] = body;
    for (j, other) in touched {
        bodies[j] = other;
    }
    contacts
}

/// The update loop for one body
#[derive(Debug)]
pub struct Stepper {
    world: Arc<World>,
    index: usize,
    running: Arc<AtomicBool>,
    tick: Duration,
}

impl Stepper {
    pub fn new(world: Arc<World>, index: usize, running: Arc<AtomicBool>, tick: Duration) -> Self {
        Self {
            world,
            index,
            running,
            tick,
        }
    }

    /// One locked iteration; returns the contacts resolved
    pub fn step(&self) -> usize {
        let contacts = {
            let mut bodies = self.world.lock();
            step_body(&mut bodies, self.index, self.world.arena())
        };
        self.world.record_step(contacts);
        contacts
    }

    /// Step until the liveness flag is cleared
    ///
    /// The flag is polled once per iteration; the sleep happens outside the
    /// lock.
    pub fn run(self) {
        log::debug!("Stepper {} started", self.index);
        while self.running.load(Ordering::Acquire) {
            self.step();
            thread::sleep(self.tick);
        }
        log::debug!("Stepper {} stopped", self.index);
    }

    /// Run on a dedicated, named thread
    pub fn spawn(self) -> std::io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name(format!("stepper-{}", self.index))
            .spawn(move || self.run())
    }

    /// Like [`Stepper::spawn`], but the thread waits for a go signal on `gate`
    ///
    /// If the sender is dropped without sending, the thread exits without
    /// stepping once.
    pub fn spawn_gated(self, gate: Receiver<()>) -> std::io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name(format!("stepper-{}", self.index))
            .spawn(move || {
                if gate.recv().is_ok() {
                    self.run();
                } else {
                    log::debug!("Stepper {} cancelled before start", self.index);
                }
            })
    }
}
