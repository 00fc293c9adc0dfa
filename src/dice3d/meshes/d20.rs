use bevy::prelude::*;

use super::{opposed_axes, DieGeometry, FaceReading};
use crate::dice3d::types::DiceType;

pub fn geometry() -> DieGeometry {
    let phi = (1.0 + 5.0_f32.sqrt()) / 2.0;
    let inv_phi = 1.0 / phi;
    let s = 0.175 * DiceType::D20.scale();

    // Icosahedron: three mutually orthogonal golden rectangles.
    let mut vertices = Vec::with_capacity(12);
    for a in [-1.0, 1.0] {
        for b in [-1.0, 1.0] {
            vertices.push(Vec3::new(0.0, a, b * phi) * s);
            vertices.push(Vec3::new(a, b * phi, 0.0) * s);
            vertices.push(Vec3::new(a * phi, 0.0, b) * s);
        }
    }

    // Face normals point at the vertices of the dual dodecahedron.
    let axes = opposed_axes(
        &[
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(-1.0, 1.0, 1.0),
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(0.0, phi, inv_phi),
            Vec3::new(0.0, phi, -inv_phi),
            Vec3::new(phi, inv_phi, 0.0),
            Vec3::new(-phi, inv_phi, 0.0),
            Vec3::new(inv_phi, 0.0, phi),
            Vec3::new(-inv_phi, 0.0, phi),
        ],
        20,
    );

    DieGeometry::from_face_axes(DiceType::D20, vertices, &axes, FaceReading::Faces)
}
