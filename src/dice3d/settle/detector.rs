//! Per-die settle detection
//!
//! A detector owns one die's reading directions and a write-once result slot.
//! It is driven by the host: collisions and force-stops come in as commands,
//! physics state comes in once per tick, and the resolved value comes out the
//! tick it is fixed.

use std::sync::{Arc, OnceLock};

use bevy::prelude::*;
use rand::Rng;

use super::resolve::{best_face_by_dot, resolve_face, FaceResolution, FaceSnapshot, ResolutionTier};
use crate::dice3d::meshes::DieGeometry;
use crate::dice3d::types::{DetectionSettings, DiceType, DieFace};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SettlePhase {
    /// Spawned, has not touched anything yet.
    Idle,
    /// Touched something; stabilization is being tracked.
    Rolling,
    /// Value fixed. Terminal.
    Resolved,
}

/// Physics state of one body at one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodySample {
    pub translation: Vec3,
    pub rotation: Quat,
    pub linvel: Vec3,
    pub angvel: Vec3,
}

impl BodySample {
    pub fn at_rest(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
            linvel: Vec3::ZERO,
            angvel: Vec3::ZERO,
        }
    }

    pub fn is_moving(&self, settings: &DetectionSettings) -> bool {
        self.linvel.length() > settings.velocity_threshold
            || self.angvel.length() > settings.angular_threshold
    }
}

/// Stabilization state machine for a single die
#[derive(Debug)]
pub struct SettleDetector {
    geometry: Arc<DieGeometry>,
    faces: Vec<DieFace>,
    world_normals: Vec<Vec3>,
    rotation: Quat,
    phase: SettlePhase,
    stable_time: f32,
    /// Time left before stabilization checks start after the first contact.
    warmup: f32,
    /// Time left before a forced die is read; `None` when not forcing.
    force_grace: Option<f32>,
    resolution: OnceLock<FaceResolution>,
}

impl SettleDetector {
    pub fn new(geometry: Arc<DieGeometry>, rotation: Quat) -> Self {
        let faces = geometry.faces();
        let world_normals = faces.iter().map(|f| f.world_normal(rotation)).collect();
        Self {
            geometry,
            faces,
            world_normals,
            rotation,
            phase: SettlePhase::Idle,
            stable_time: 0.0,
            warmup: 0.0,
            force_grace: None,
            resolution: OnceLock::new(),
        }
    }

    pub fn die_type(&self) -> DiceType {
        self.geometry.die_type()
    }

    pub fn phase(&self) -> SettlePhase {
        self.phase
    }

    pub fn faces(&self) -> &[DieFace] {
        &self.faces
    }

    pub fn world_normals(&self) -> &[Vec3] {
        &self.world_normals
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn stable_time(&self) -> f32 {
        self.stable_time
    }

    pub fn is_forcing(&self) -> bool {
        self.force_grace.is_some() && !self.is_resolved()
    }

    pub fn is_resolved(&self) -> bool {
        self.resolution.get().is_some()
    }

    pub fn resolution(&self) -> Option<FaceResolution> {
        self.resolution.get().copied()
    }

    pub fn value(&self) -> Option<u32> {
        self.resolution.get().map(|r| r.value)
    }

    /// First contact moves the die from `Idle` to `Rolling`. Returns true on
    /// that transition only.
    pub fn on_collision(&mut self, settings: &DetectionSettings) -> bool {
        if self.phase != SettlePhase::Idle || self.force_grace.is_some() {
            return false;
        }
        self.phase = SettlePhase::Rolling;
        self.stable_time = 0.0;
        self.warmup = settings.detection_delay;
        true
    }

    /// Start a forced resolution. The caller zeroes the body's velocities;
    /// the value is read once the grace interval has passed.
    ///
    /// Returns false when the die is already resolved or already forcing.
    pub fn force_stop(&mut self, settings: &DetectionSettings) -> bool {
        if self.is_resolved() || self.force_grace.is_some() {
            return false;
        }
        self.force_grace = Some(settings.force_grace.max(0.0));
        self.stable_time = 0.0;
        true
    }

    /// Advance by one physics tick. Returns the resolution on the tick the
    /// value gets fixed, `None` otherwise.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        sample: &BodySample,
        settings: &DetectionSettings,
        rng: &mut R,
    ) -> Option<FaceResolution> {
        if self.is_resolved() {
            return None;
        }
        self.observe(sample.rotation);

        if let Some(grace) = self.force_grace {
            let remaining = grace - dt;
            if remaining > 0.0 {
                self.force_grace = Some(remaining);
                return None;
            }
            self.force_grace = Some(0.0);
            return self.settle(ResolutionTier::Secondary, true, settings, rng);
        }

        if self.phase != SettlePhase::Rolling {
            return None;
        }

        if self.warmup > 0.0 {
            self.warmup -= dt;
            return None;
        }

        if sample.is_moving(settings) {
            self.stable_time = 0.0;
            return None;
        }
        self.stable_time += dt;

        if self.stable_time < settings.required_stable_time {
            return None;
        }

        match best_face_by_dot(&self.world_normals) {
            Some((index, dot)) if dot >= settings.stability_dot_threshold => {
                let resolution = FaceResolution {
                    value: self.faces[index].value,
                    tier: ResolutionTier::Primary,
                    forced: false,
                };
                debug!(
                    "{} settled on {} (dot {:.3}, stable {:.2}s)",
                    self.die_type(),
                    resolution.value,
                    dot,
                    self.stable_time
                );
                self.fill(resolution)
            }
            _ => None,
        }
    }

    /// Resolve immediately from the last observed orientation. Used when the
    /// physics body is gone and no further samples will arrive.
    pub fn resolve_lost<R: Rng + ?Sized>(
        &mut self,
        settings: &DetectionSettings,
        rng: &mut R,
    ) -> Option<FaceResolution> {
        if self.is_resolved() {
            return None;
        }
        warn!("{} lost its physics body; reading last known orientation", self.die_type());
        self.force_grace = Some(0.0);
        self.settle(ResolutionTier::Secondary, true, settings, rng)
    }

    fn observe(&mut self, rotation: Quat) {
        self.rotation = rotation;
        for (normal, face) in self.world_normals.iter_mut().zip(&self.faces) {
            *normal = face.world_normal(rotation);
        }
    }

    fn settle<R: Rng + ?Sized>(
        &mut self,
        from: ResolutionTier,
        forced: bool,
        settings: &DetectionSettings,
        rng: &mut R,
    ) -> Option<FaceResolution> {
        let snapshot = FaceSnapshot {
            faces: &self.faces,
            world_normals: &self.world_normals,
            geometry: &self.geometry,
            rotation: self.rotation,
        };
        let mut resolution = resolve_face(&snapshot, from, settings, rng);
        resolution.forced = forced;
        self.fill(resolution)
    }

    fn fill(&mut self, resolution: FaceResolution) -> Option<FaceResolution> {
        match self.resolution.set(resolution) {
            Ok(()) => {
                self.phase = SettlePhase::Resolved;
                Some(resolution)
            }
            Err(_) => None,
        }
    }
}
