use bevy::prelude::*;

use super::{opposed_axes, DieGeometry, FaceReading};
use crate::dice3d::types::DiceType;

pub fn geometry() -> DieGeometry {
    let s = 0.5 * DiceType::D8.scale();

    let vertices = vec![
        Vec3::new(s, 0.0, 0.0),
        Vec3::new(-s, 0.0, 0.0),
        Vec3::new(0.0, s, 0.0),
        Vec3::new(0.0, -s, 0.0),
        Vec3::new(0.0, 0.0, s),
        Vec3::new(0.0, 0.0, -s),
    ];

    // Upper four faces carry 1-4; each opposite face carries 9 - value.
    let axes = opposed_axes(
        &[
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(-1.0, 1.0, 1.0),
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(-1.0, 1.0, -1.0),
        ],
        8,
    );

    DieGeometry::from_face_axes(DiceType::D8, vertices, &axes, FaceReading::Faces)
}
