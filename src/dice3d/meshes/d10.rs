use bevy::prelude::*;

use super::{DieGeometry, FaceReading, FacePolygon};
use crate::dice3d::types::DiceType;

/// Pentagonal trapezohedron: two apexes and two staggered rings of five.
pub fn geometry() -> DieGeometry {
    let size = 0.35 * DiceType::D10.scale();
    let step = std::f32::consts::TAU / 5.0;
    let c = (std::f32::consts::PI / 5.0).cos();

    // Ring height h and apex height h(1 + c)/(1 - c) keep every kite planar.
    let h = 0.105;
    let apex = h * (1.0 + c) / (1.0 - c);

    let mut vertices = vec![Vec3::new(0.0, apex, 0.0) * size, Vec3::new(0.0, -apex, 0.0) * size];
    for i in 0..5 {
        let a = i as f32 * step;
        vertices.push(Vec3::new(a.cos(), h, a.sin()) * size);
    }
    for i in 0..5 {
        let a = (i as f32 + 0.5) * step;
        vertices.push(Vec3::new(a.cos(), -h, a.sin()) * size);
    }

    let upper = |i: usize| 2 + i % 5;
    let lower = |i: usize| 7 + i % 5;

    // Upper kite i carries 2i + 1. The lower kite facing away from it is
    // i + 2 (mod 5) and carries 11 minus that.
    let mut polygons = Vec::with_capacity(10);
    for i in 0..5 {
        polygons.push(FacePolygon {
            indices: vec![0, upper(i), lower(i), upper(i + 1)],
            value: 2 * i as u32 + 1,
        });
    }
    for j in 0..5 {
        let facing = (j + 3) % 5;
        polygons.push(FacePolygon {
            indices: vec![1, lower(j), upper(j + 1), lower(j + 1)],
            value: 10 - 2 * facing as u32,
        });
    }

    DieGeometry::from_polygons(DiceType::D10, vertices, polygons, FaceReading::Faces)
}
