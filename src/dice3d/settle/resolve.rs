//! Tiered face resolution
//!
//! Picks the value a die shows from its current orientation. Tiers run from
//! strictest to most permissive and the first one that succeeds wins; within a
//! tier ties go to the first face in the die's fixed ordering.

use std::fmt;

use bevy::prelude::*;
use rand::Rng;
use serde::Serialize;

use crate::dice3d::meshes::DieGeometry;
use crate::dice3d::types::{DetectionSettings, DieFace};

/// Which strategy produced a die's value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionTier {
    /// Best face aligned with up within the stability threshold.
    Primary,
    /// Best face within the looser band below the threshold.
    Secondary,
    /// Face with the smallest angle to vertical.
    Angular,
    /// Face hit by a ray cast straight down onto the die.
    Raycast,
    /// Uniform random value; nothing physical could be read.
    Random,
}

impl ResolutionTier {
    pub const CHAIN: [ResolutionTier; 5] = [
        ResolutionTier::Primary,
        ResolutionTier::Secondary,
        ResolutionTier::Angular,
        ResolutionTier::Raycast,
        ResolutionTier::Random,
    ];

    pub fn is_fallback(&self) -> bool {
        *self != ResolutionTier::Primary
    }
}

impl fmt::Display for ResolutionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResolutionTier::Primary => "primary",
            ResolutionTier::Secondary => "secondary",
            ResolutionTier::Angular => "angular",
            ResolutionTier::Raycast => "raycast",
            ResolutionTier::Random => "random",
        })
    }
}

/// A die's final value and how it was obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FaceResolution {
    pub value: u32,
    pub tier: ResolutionTier,
    /// Resolved through a force-stop rather than by settling.
    pub forced: bool,
}

/// Everything the resolver reads about one die at one instant.
#[derive(Clone, Copy, Debug)]
pub struct FaceSnapshot<'a> {
    pub faces: &'a [DieFace],
    /// `faces` rotated into world space, same order.
    pub world_normals: &'a [Vec3],
    pub geometry: &'a DieGeometry,
    pub rotation: Quat,
}

/// Face whose normal has the largest dot product with up.
pub fn best_face_by_dot(world_normals: &[Vec3]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (i, normal) in world_normals.iter().enumerate() {
        let dot = normal.dot(Vec3::Y);
        if dot.is_nan() {
            continue;
        }
        if best.is_none_or(|(_, best_dot)| dot > best_dot) {
            best = Some((i, dot));
        }
    }
    best
}

/// Face whose normal makes the smallest angle with up.
pub fn closest_face_by_angle(world_normals: &[Vec3]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (i, normal) in world_normals.iter().enumerate() {
        if *normal == Vec3::ZERO {
            continue;
        }
        let angle = normal.angle_between(Vec3::Y);
        if angle.is_nan() {
            continue;
        }
        if best.is_none_or(|(_, best_angle)| angle < best_angle) {
            best = Some((i, angle));
        }
    }
    best
}

/// Cast a ray straight down from above the die and return the value of the
/// first face it enters.
///
/// The ray is intersected with the die's own convex hull in die-local space,
/// so neighbouring dice and the floor never shadow it.
pub fn raycast_face(
    geometry: &DieGeometry,
    rotation: Quat,
    settings: &DetectionSettings,
) -> Option<u32> {
    let to_local = rotation.inverse();
    let origin = to_local * (Vec3::Y * settings.ray_height);
    let direction = to_local * Vec3::NEG_Y;

    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    let mut entered: Option<usize> = None;

    for (i, plane) in geometry.planes().iter().enumerate() {
        let denom = plane.normal.dot(direction);
        let distance = plane.offset - plane.normal.dot(origin);

        if denom.abs() < 1e-6 {
            // Parallel: the ray is either inside this slab or misses entirely.
            if distance < 0.0 {
                return None;
            }
            continue;
        }

        let t = distance / denom;
        if denom < 0.0 {
            if t > t_enter {
                t_enter = t;
                entered = Some(i);
            }
        } else if t < t_exit {
            t_exit = t;
        }
    }

    let polygon = entered?;
    if !(t_enter <= t_exit) || t_enter < 0.0 || t_enter > settings.ray_length {
        return None;
    }

    Some(geometry.value_at(polygon, origin + direction * t_enter))
}

/// Run the resolution chain starting at `from`.
///
/// Always produces a value: the last tier draws uniformly from the die's
/// face values when nothing physical could be read.
pub fn resolve_face<R: Rng + ?Sized>(
    snapshot: &FaceSnapshot<'_>,
    from: ResolutionTier,
    settings: &DetectionSettings,
    rng: &mut R,
) -> FaceResolution {
    let die_type = snapshot.geometry.die_type();

    for tier in ResolutionTier::CHAIN.into_iter().filter(|tier| *tier >= from) {
        let value = match tier {
            ResolutionTier::Primary => best_face_by_dot(snapshot.world_normals)
                .filter(|(_, dot)| *dot >= settings.stability_dot_threshold)
                .map(|(i, _)| snapshot.faces[i].value),
            ResolutionTier::Secondary => best_face_by_dot(snapshot.world_normals)
                .filter(|(_, dot)| *dot >= settings.secondary_threshold())
                .map(|(i, _)| snapshot.faces[i].value),
            ResolutionTier::Angular => {
                closest_face_by_angle(snapshot.world_normals).map(|(i, _)| snapshot.faces[i].value)
            }
            ResolutionTier::Raycast => raycast_face(snapshot.geometry, snapshot.rotation, settings),
            ResolutionTier::Random => {
                let value = rng.gen_range(1..=die_type.face_count());
                error!(
                    "{} face could not be read from physics state; using random value {}",
                    die_type, value
                );
                Some(value)
            }
        };

        if let Some(value) = value {
            if tier.is_fallback() && tier != ResolutionTier::Random {
                warn!("{} resolved to {} via {} fallback", die_type, value, tier);
            }
            return FaceResolution {
                value,
                tier,
                forced: false,
            };
        }
    }

    // The random tier always yields; this only runs when `from` is past it.
    FaceResolution {
        value: rng.gen_range(1..=die_type.face_count()),
        tier: ResolutionTier::Random,
        forced: false,
    }
}
