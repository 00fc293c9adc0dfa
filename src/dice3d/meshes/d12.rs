use bevy::prelude::*;

use super::{opposed_axes, DieGeometry, FaceReading};
use crate::dice3d::types::DiceType;

pub fn geometry() -> DieGeometry {
    let phi = (1.0 + 5.0_f32.sqrt()) / 2.0;
    let inv_phi = 1.0 / phi;
    let s = 0.2 * DiceType::D12.scale();

    // Regular dodecahedron: cube corners plus three golden rectangles.
    let mut vertices = Vec::with_capacity(20);
    for x in [-1.0, 1.0] {
        for y in [-1.0, 1.0] {
            for z in [-1.0, 1.0] {
                vertices.push(Vec3::new(x, y, z) * s);
            }
        }
    }
    for a in [-1.0, 1.0] {
        for b in [-1.0, 1.0] {
            vertices.push(Vec3::new(0.0, a * inv_phi, b * phi) * s);
            vertices.push(Vec3::new(a * inv_phi, b * phi, 0.0) * s);
            vertices.push(Vec3::new(a * phi, 0.0, b * inv_phi) * s);
        }
    }

    // Face normals point at the vertices of the dual icosahedron.
    let axes = opposed_axes(
        &[
            Vec3::new(0.0, phi, 1.0),
            Vec3::new(0.0, phi, -1.0),
            Vec3::new(phi, 1.0, 0.0),
            Vec3::new(-phi, 1.0, 0.0),
            Vec3::new(1.0, 0.0, phi),
            Vec3::new(-1.0, 0.0, phi),
        ],
        12,
    );

    DieGeometry::from_face_axes(DiceType::D12, vertices, &axes, FaceReading::Faces)
}
