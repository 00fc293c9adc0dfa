//! Spawn placement
//!
//! Lays a batch of dice out on a square-ish grid around the spawn anchor and
//! gives each one a random orientation and launch impulses.

use std::f32::consts::TAU;
use std::sync::Arc;

use bevy::prelude::*;
use rand::Rng;

use crate::dice3d::meshes::{DiceCatalog, DieGeometry};
use crate::dice3d::types::{DiceType, SpawnSettings};

/// Everything needed to put one die into the world.
#[derive(Clone, Debug)]
pub struct DieSpawn {
    /// Position in spawn order.
    pub index: usize,
    pub die_type: DiceType,
    pub geometry: Arc<DieGeometry>,
    pub position: Vec3,
    pub rotation: Quat,
    pub impulse: Vec3,
    pub torque_impulse: Vec3,
}

/// `(rows, cols)` of the grid holding `count` dice.
pub fn grid_dimensions(count: usize) -> (usize, usize) {
    if count == 0 {
        return (0, 0);
    }
    let rows = (count as f32).sqrt().ceil() as usize;
    let cols = count.div_ceil(rows);
    (rows, cols)
}

/// `(row, col)` of the die at `index`, filling each row before the next.
pub fn grid_cell(index: usize, count: usize) -> (usize, usize) {
    let (_, cols) = grid_dimensions(count);
    let cols = cols.max(1);
    (index / cols, index % cols)
}

/// World position of the die at `index`, the grid centred on the anchor.
pub fn grid_position(index: usize, count: usize, settings: &SpawnSettings) -> Vec3 {
    let (rows, cols) = grid_dimensions(count);
    let (row, col) = grid_cell(index, count);

    let start_x = -((cols.saturating_sub(1)) as f32 * settings.spacing) / 2.0;
    let start_z = -((rows.saturating_sub(1)) as f32 * settings.spacing) / 2.0;

    settings.anchor()
        + Vec3::new(
            start_x + col as f32 * settings.spacing,
            0.0,
            start_z + row as f32 * settings.spacing,
        )
}

/// Plan the spawn of `count` dice of one type. Empty when the catalog has no
/// geometry for `die_type`.
pub fn place<R: Rng + ?Sized>(
    catalog: &DiceCatalog,
    die_type: DiceType,
    count: usize,
    settings: &SpawnSettings,
    rng: &mut R,
) -> Vec<DieSpawn> {
    let Some(geometry) = catalog.get(die_type) else {
        warn!("No geometry available for {}", die_type);
        return Vec::new();
    };

    (0..count)
        .map(|index| DieSpawn {
            index,
            die_type,
            geometry: Arc::clone(&geometry),
            position: grid_position(index, count, settings),
            rotation: random_rotation(rng),
            impulse: launch_impulse(settings, rng),
            torque_impulse: random_in_unit_ball(rng) * settings.torque_impulse,
        })
        .collect()
}

/// Uniformly distributed orientation (Shoemake's subgroup algorithm).
fn random_rotation<R: Rng + ?Sized>(rng: &mut R) -> Quat {
    let u1: f32 = rng.gen();
    let (s2, c2) = (TAU * rng.gen::<f32>()).sin_cos();
    let (s3, c3) = (TAU * rng.gen::<f32>()).sin_cos();
    let a = (1.0 - u1).sqrt();
    let b = u1.sqrt();
    Quat::from_xyzw(a * s2, a * c2, b * s3, b * c3).normalize()
}

/// Mostly upward, tilted randomly in the horizontal plane.
fn launch_impulse<R: Rng + ?Sized>(settings: &SpawnSettings, rng: &mut R) -> Vec3 {
    let jitter = settings.horizontal_jitter.abs();
    let horizontal = |rng: &mut R| {
        if jitter > 0.0 {
            rng.gen_range(-jitter..=jitter)
        } else {
            0.0
        }
    };
    let x = horizontal(rng);
    let z = horizontal(rng);
    Vec3::new(x, 1.0, z).normalize() * settings.throw_impulse
}

fn random_in_unit_ball<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    loop {
        let candidate = Vec3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        );
        if candidate.length_squared() <= 1.0 {
            return candidate;
        }
    }
}
