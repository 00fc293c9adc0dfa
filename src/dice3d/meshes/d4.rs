use bevy::prelude::*;

use super::{DieGeometry, FaceReading};
use crate::dice3d::types::DiceType;

/// Tetrahedron read at its upward corner. Each face carries the value of the
/// corner left pointing up when the die rests on it.
pub fn geometry() -> DieGeometry {
    let s = 0.25 * DiceType::D4.scale();

    let vertices = vec![
        Vec3::new(1.0, 1.0, 1.0) * s,
        Vec3::new(1.0, -1.0, -1.0) * s,
        Vec3::new(-1.0, 1.0, -1.0) * s,
        Vec3::new(-1.0, -1.0, 1.0) * s,
    ];
    let corner_values = vec![1, 2, 3, 4];

    // The face opposite corner k points along -v_k.
    let axes: Vec<(Vec3, u32)> = vertices
        .iter()
        .zip(&corner_values)
        .map(|(v, value)| (-*v, *value))
        .collect();

    DieGeometry::from_face_axes(
        DiceType::D4,
        vertices,
        &axes,
        FaceReading::Vertices(corner_values),
    )
}
