//! Stepping-Loop Driver
//!
//! The simulation itself is strictly single-threaded: one `step` call is an
//! uninterruptible sequential pipeline. The expected deployment runs that
//! loop on a dedicated thread while a render/input thread reads world state
//! between steps. [`StepGate`] is the coordination primitive for that split:
//! a pause/resume gate plus a running flag, both checked between steps —
//! cancellation is cooperative and never lands mid-step.

use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::world::World;

#[derive(Debug)]
struct GateState {
    paused: bool,
    running: bool,
}

/// Pause/resume gate and shutdown flag for a stepping loop.
#[derive(Debug)]
pub struct StepGate {
    state: Mutex<GateState>,
    condvar: Condvar,
}

impl Default for StepGate {
    fn default() -> Self {
        Self::new()
    }
}

impl StepGate {
    /// Create a gate in the running, unpaused state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(GateState {
                paused: false,
                running: true,
            }),
            condvar: Condvar::new(),
        }
    }

    /// Pause the loop. The stepping thread blocks before its next step.
    pub fn pause(&self) {
        self.state.lock().paused = true;
    }

    /// Resume a paused loop.
    pub fn resume(&self) {
        let mut state = self.state.lock();
        state.paused = false;
        self.condvar.notify_all();
    }

    /// Request shutdown. A paused loop is woken so it can exit.
    pub fn stop(&self) {
        let mut state = self.state.lock();
        state.running = false;
        self.condvar.notify_all();
    }

    /// Whether the gate is currently paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.state.lock().paused
    }

    /// Whether the loop should keep running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state.lock().running
    }

    /// Block while paused; returns `false` once shutdown was requested.
    /// Called by the stepping loop between steps.
    pub fn wait_if_paused(&self) -> bool {
        let mut state = self.state.lock();
        while state.paused && state.running {
            self.condvar.wait(&mut state);
        }
        state.running
    }
}

/// Run the stepping loop until the gate stops it or `after_step` returns
/// `false`. Each iteration performs exactly one whole `step(dt)`; the
/// callback runs between steps and is the place for frame pacing and
/// read-out. Returns the world in its final state.
pub fn run_stepping_loop<F>(mut world: World, gate: &StepGate, dt: f64, mut after_step: F) -> World
where
    F: FnMut(&World) -> bool,
{
    while gate.wait_if_paused() {
        world.step(dt);
        if !after_step(&world) {
            break;
        }
    }
    world
}

/// Spawn the stepping loop on a dedicated thread. Join the handle after
/// calling [`StepGate::stop`] to get the world back.
#[must_use]
pub fn spawn_stepping_loop(world: World, gate: Arc<StepGate>, dt: f64) -> JoinHandle<World> {
    std::thread::spawn(move || run_stepping_loop(world, &gate, dt, |_| true))
}

// ============================================================================
// Tests
// ============================================================================
