use bevy::prelude::*;

use super::{opposed_axes, DieGeometry, FaceReading};
use crate::dice3d::types::DiceType;

pub fn geometry() -> DieGeometry {
    let h = 0.3 * DiceType::D6.scale();

    let mut vertices = Vec::with_capacity(8);
    for x in [-h, h] {
        for y in [-h, h] {
            for z in [-h, h] {
                vertices.push(Vec3::new(x, y, z));
            }
        }
    }

    // 1 up, 2 toward +Z, 3 toward +X; opposites sum to 7.
    let axes = opposed_axes(&[Vec3::Y, Vec3::Z, Vec3::X], 6);

    DieGeometry::from_face_axes(DiceType::D6, vertices, &axes, FaceReading::Faces)
}
