//! Seams between the roll orchestrator and the world that simulates the dice.

use super::spawn::DieSpawn;
use crate::dice3d::settle::BodySample;

/// Creates and destroys die bodies.
pub trait SpawnHost {
    type Handle: Copy + Eq;

    /// Instantiate one die at its planned pose and apply its launch impulses.
    /// `None` when the body could not be created.
    fn spawn_die(&mut self, spawn: &DieSpawn) -> Option<Self::Handle>;

    fn despawn_die(&mut self, handle: Self::Handle);
}

/// Read access to simulated bodies, plus the one command a force-stop needs.
pub trait PhysicsBodies {
    type Handle: Copy + Eq;

    /// Current state of a body, `None` if it no longer exists.
    fn sample(&self, handle: Self::Handle) -> Option<BodySample>;

    fn zero_velocity(&mut self, handle: Self::Handle);
}
