//! Die geometry
//!
//! Every die is described once as a convex polyhedron in die-local space: its
//! vertices, its face polygons and the value printed on each face. Face
//! reading directions, the physics collider, the render mesh and the planes
//! used by the downward face ray are all derived from that one description.

pub mod d10;
pub mod d12;
pub mod d20;
pub mod d4;
pub mod d6;
pub mod d8;

use std::collections::HashMap;
use std::sync::Arc;

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy_mesh::{Indices, PrimitiveTopology};
use bevy_rapier3d::prelude::Collider;

use crate::dice3d::types::{DiceType, DieFace};

/// Vertices closer than this to a face's supporting plane belong to that face.
const PLANE_EPSILON: f32 = 1e-4;

/// A face of the polyhedron, its vertex indices wound counter-clockwise seen
/// from outside.
#[derive(Clone, Debug, PartialEq)]
pub struct FacePolygon {
    pub indices: Vec<usize>,
    pub value: u32,
}

/// How a die's value is read once it rests.
#[derive(Clone, Debug, PartialEq)]
pub enum FaceReading {
    /// The face pointing up carries the value.
    Faces,
    /// The vertex pointing up carries the value (one value per vertex). A d4
    /// never rests with a face up, so its numbers are read at the top corner.
    Vertices(Vec<u32>),
}

/// Outward supporting plane of one face: `normal · p <= offset` inside the die.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FacePlane {
    pub normal: Vec3,
    pub offset: f32,
}

/// Convex polyhedron describing one die type.
#[derive(Clone, Debug, PartialEq)]
pub struct DieGeometry {
    die_type: DiceType,
    vertices: Vec<Vec3>,
    polygons: Vec<FacePolygon>,
    reading: FaceReading,
}

impl DieGeometry {
    /// Build a geometry from explicit face polygons. Polygon winding is
    /// normalised, so the indices only need to list each face's corners.
    pub fn from_polygons(
        die_type: DiceType,
        vertices: Vec<Vec3>,
        polygons: Vec<FacePolygon>,
        reading: FaceReading,
    ) -> Self {
        let polygons = polygons
            .into_iter()
            .map(|polygon| FacePolygon {
                indices: wind_outward(&vertices, &polygon.indices),
                value: polygon.value,
            })
            .collect();

        Self {
            die_type,
            vertices,
            polygons,
            reading,
        }
    }

    /// Build a geometry from outward face axes: every axis selects the
    /// vertices lying on the hull's supporting plane in that direction.
    pub fn from_face_axes(
        die_type: DiceType,
        vertices: Vec<Vec3>,
        axes: &[(Vec3, u32)],
        reading: FaceReading,
    ) -> Self {
        let polygons = axes
            .iter()
            .map(|(axis, value)| {
                let axis = axis.normalize();
                let support = vertices
                    .iter()
                    .map(|v| v.dot(axis))
                    .fold(f32::NEG_INFINITY, f32::max);
                let indices = vertices
                    .iter()
                    .enumerate()
                    .filter(|(_, v)| v.dot(axis) >= support - PLANE_EPSILON)
                    .map(|(i, _)| i)
                    .collect();
                FacePolygon {
                    indices,
                    value: *value,
                }
            })
            .collect();

        Self::from_polygons(die_type, vertices, polygons, reading)
    }

    pub fn die_type(&self) -> DiceType {
        self.die_type
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn polygons(&self) -> &[FacePolygon] {
        &self.polygons
    }

    pub fn reading(&self) -> &FaceReading {
        &self.reading
    }

    /// Outward unit normal of a face polygon.
    pub fn polygon_normal(&self, polygon: usize) -> Vec3 {
        newell_normal(&self.vertices, &self.polygons[polygon].indices)
    }

    /// Supporting planes in polygon order.
    pub fn planes(&self) -> Vec<FacePlane> {
        (0..self.polygons.len())
            .map(|i| {
                let normal = self.polygon_normal(i);
                let anchor = self.vertices[self.polygons[i].indices[0]];
                FacePlane {
                    normal,
                    offset: normal.dot(anchor),
                }
            })
            .collect()
    }

    /// The ordered reading directions handed to a die's settle detector.
    pub fn faces(&self) -> Vec<DieFace> {
        match &self.reading {
            FaceReading::Faces => (0..self.polygons.len())
                .map(|i| DieFace::new(self.polygon_normal(i), self.polygons[i].value))
                .collect(),
            FaceReading::Vertices(values) => self
                .vertices
                .iter()
                .zip(values)
                .map(|(vertex, value)| DieFace::new(*vertex, *value))
                .collect(),
        }
    }

    /// Value read from a point on a face polygon (die-local).
    pub fn value_at(&self, polygon: usize, point: Vec3) -> u32 {
        let face = &self.polygons[polygon];
        match &self.reading {
            FaceReading::Faces => face.value,
            FaceReading::Vertices(values) => face
                .indices
                .iter()
                .copied()
                .min_by(|a, b| {
                    let da = self.vertices[*a].distance_squared(point);
                    let db = self.vertices[*b].distance_squared(point);
                    da.total_cmp(&db)
                })
                .and_then(|vertex| values.get(vertex).copied())
                .unwrap_or(face.value),
        }
    }

    /// Convex hull collider matching the geometry.
    pub fn build_collider(&self) -> Option<Collider> {
        Collider::convex_hull(&self.vertices)
    }

    /// Flat-shaded render mesh, one fan per face.
    pub fn build_mesh(&self) -> Mesh {
        let mut positions: Vec<[f32; 3]> = Vec::new();
        let mut normals: Vec<[f32; 3]> = Vec::new();

        for (i, polygon) in self.polygons.iter().enumerate() {
            let n = self.polygon_normal(i).to_array();
            let first = self.vertices[polygon.indices[0]];
            for pair in polygon.indices[1..].windows(2) {
                for vertex in [first, self.vertices[pair[0]], self.vertices[pair[1]]] {
                    positions.push(vertex.to_array());
                    normals.push(n);
                }
            }
        }

        let indices: Vec<u32> = (0..positions.len() as u32).collect();
        let uvs: Vec<[f32; 2]> = positions.iter().map(|_| [0.5, 0.5]).collect();

        Mesh::new(
            PrimitiveTopology::TriangleList,
            RenderAssetUsages::default(),
        )
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
        .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs)
        .with_inserted_indices(Indices::U32(indices))
    }
}

/// Newell's method, robust for any planar polygon regardless of vertex count.
fn newell_normal(vertices: &[Vec3], indices: &[usize]) -> Vec3 {
    let mut normal = Vec3::ZERO;
    for (i, current) in indices.iter().enumerate() {
        let a = vertices[*current];
        let b = vertices[indices[(i + 1) % indices.len()]];
        normal.x += (a.y - b.y) * (a.z + b.z);
        normal.y += (a.z - b.z) * (a.x + b.x);
        normal.z += (a.x - b.x) * (a.y + b.y);
    }
    normal.normalize_or_zero()
}

/// Sort a face's corners counter-clockwise around its outward normal.
fn wind_outward(vertices: &[Vec3], indices: &[usize]) -> Vec<usize> {
    let count = indices.len() as f32;
    let centroid = indices.iter().map(|i| vertices[*i]).sum::<Vec3>() / count;
    // The polyhedra are centred on the origin, so the centroid points outward.
    let outward = centroid.normalize_or_zero();
    let u = outward.any_orthonormal_vector();
    let w = outward.cross(u);

    let mut sorted = indices.to_vec();
    sorted.sort_by(|a, b| {
        let pa = vertices[*a] - centroid;
        let pb = vertices[*b] - centroid;
        let angle_a = pa.dot(w).atan2(pa.dot(u));
        let angle_b = pb.dot(w).atan2(pb.dot(u));
        angle_a.total_cmp(&angle_b)
    });
    sorted
}

/// Pair each axis with its opposite so that opposite faces sum to `n + 1`.
pub(crate) fn opposed_axes(half: &[Vec3], face_count: u32) -> Vec<(Vec3, u32)> {
    let mut axes = Vec::with_capacity(half.len() * 2);
    for (i, axis) in half.iter().enumerate() {
        let value = i as u32 + 1;
        axes.push((*axis, value));
        axes.push((-*axis, face_count + 1 - value));
    }
    axes
}

/// The geometry baked into a die type.
pub fn die_geometry(die_type: DiceType) -> DieGeometry {
    match die_type {
        DiceType::D4 => d4::geometry(),
        DiceType::D6 => d6::geometry(),
        DiceType::D8 => d8::geometry(),
        DiceType::D10 => d10::geometry(),
        DiceType::D12 => d12::geometry(),
        DiceType::D20 => d20::geometry(),
    }
}

/// The fixed, ordered (direction, value) list of a die type.
pub fn die_faces(die_type: DiceType) -> Vec<DieFace> {
    die_geometry(die_type).faces()
}

/// Geometry available for spawning, keyed by die type
#[derive(Resource, Clone, Debug, Default)]
pub struct DiceCatalog {
    shapes: HashMap<DiceType, Arc<DieGeometry>>,
}

impl DiceCatalog {
    /// Catalog holding every built-in die type.
    pub fn standard() -> Self {
        let mut catalog = Self::default();
        for die_type in DiceType::ALL {
            catalog.insert(die_geometry(die_type));
        }
        catalog
    }

    pub fn insert(&mut self, geometry: DieGeometry) {
        self.shapes.insert(geometry.die_type(), Arc::new(geometry));
    }

    pub fn remove(&mut self, die_type: DiceType) -> Option<Arc<DieGeometry>> {
        self.shapes.remove(&die_type)
    }

    pub fn get(&self, die_type: DiceType) -> Option<Arc<DieGeometry>> {
        self.shapes.get(&die_type).cloned()
    }

    pub fn contains(&self, die_type: DiceType) -> bool {
        self.shapes.contains_key(&die_type)
    }
}
