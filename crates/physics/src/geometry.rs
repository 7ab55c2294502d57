//! Immutable polygon geometry for collision shapes
//!
//! Every shape kind is turned into a [`Geometry`] once, at creation time:
//! a vertex array plus a list of faces, each face an ordered list of vertex
//! indices wound counter-clockwise when seen from outside. Scale and offset
//! are applied later, at query time, so the stored vertices never change.

use crate::config::TessellationConfig;
use crate::error::{Error, Result};
use glam::{Mat4, Vec3};
use rapier3d::parry::transformation::convex_hull;
use rapier3d::prelude::{Point, Real};
use std::f32::consts::{PI, TAU};

/// Collision shape variants
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    /// Axis-aligned box centred at the origin with full edge lengths `size`
    Box { size: Vec3 },
    /// Sphere centred at the origin
    Sphere { radius: f32 },
    /// Cylinder along Y centred at the origin
    Cylinder { radius: f32, height: f32 },
    /// Convex hull of a point cloud
    ConvexHull { points: Vec<Vec3> },
    /// Explicit polygon mesh
    Polyhedron {
        vertices: Vec<Vec3>,
        faces: Vec<Vec<u32>>,
    },
}

/// Kind tag without geometric parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeTag {
    Box,
    Sphere,
    Cylinder,
    ConvexHull,
    Polyhedron,
}

impl ShapeKind {
    /// Unit box
    pub fn unit_box() -> Self {
        ShapeKind::Box { size: Vec3::ONE }
    }

    pub fn tag(&self) -> ShapeTag {
        match self {
            ShapeKind::Box { .. } => ShapeTag::Box,
            ShapeKind::Sphere { .. } => ShapeTag::Sphere,
            ShapeKind::Cylinder { .. } => ShapeTag::Cylinder,
            ShapeKind::ConvexHull { .. } => ShapeTag::ConvexHull,
            ShapeKind::Polyhedron { .. } => ShapeTag::Polyhedron,
        }
    }
}

/// Axis-aligned bounding box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Tight bounds of a point set, `None` if the set is empty
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self::new(first, first), |acc, p| {
            Self::new(acc.min.min(p), acc.max.max(p))
        }))
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

/// Immutable polygon soup describing a shape boundary
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    vertices: Vec<Vec3>,
    indices: Vec<u32>,
    /// Start of each face in `indices`, followed by one end sentinel
    face_offsets: Vec<usize>,
    max_face_len: usize,
}

impl Geometry {
    /// Build geometry for a shape kind
    pub fn build(kind: &ShapeKind, tessellation: &TessellationConfig) -> Result<Self> {
        match kind {
            ShapeKind::Box { size } => {
                require_positive("box size", *size)?;
                Ok(Self::cuboid(*size * 0.5))
            }
            ShapeKind::Sphere { radius } => {
                require_positive("sphere radius", Vec3::splat(*radius))?;
                tessellation.validate()?;
                Ok(Self::sphere(
                    *radius,
                    tessellation.sphere_stacks,
                    tessellation.sphere_slices,
                ))
            }
            ShapeKind::Cylinder { radius, height } => {
                require_positive("cylinder dimensions", Vec3::new(*radius, *height, 1.0))?;
                tessellation.validate()?;
                Ok(Self::cylinder(*radius, *height, tessellation.cylinder_segments))
            }
            ShapeKind::ConvexHull { points } => Self::hull(points),
            ShapeKind::Polyhedron { vertices, faces } => Self::polyhedron(vertices, faces),
        }
    }

    fn from_faces(vertices: Vec<Vec3>, faces: impl IntoIterator<Item = Vec<u32>>) -> Self {
        let mut indices = Vec::new();
        let mut face_offsets = vec![0];
        let mut max_face_len = 0;
        for face in faces {
            max_face_len = max_face_len.max(face.len());
            indices.extend(face);
            face_offsets.push(indices.len());
        }
        Self {
            vertices,
            indices,
            face_offsets,
            max_face_len,
        }
    }

    fn cuboid(half: Vec3) -> Self {
        // Corner i has bit 0 -> +x, bit 1 -> +y, bit 2 -> +z
        let vertices = (0..8u32)
            .map(|i| {
                Vec3::new(
                    if i & 1 != 0 { half.x } else { -half.x },
                    if i & 2 != 0 { half.y } else { -half.y },
                    if i & 4 != 0 { half.z } else { -half.z },
                )
            })
            .collect();
        let faces = [
            vec![0, 4, 6, 2], // -X
            vec![1, 3, 7, 5], // +X
            vec![0, 1, 5, 4], // -Y
            vec![2, 6, 7, 3], // +Y
            vec![0, 2, 3, 1], // -Z
            vec![4, 5, 7, 6], // +Z
        ];
        Self::from_faces(vertices, faces)
    }

    fn sphere(radius: f32, stacks: u32, slices: u32) -> Self {
        let mut vertices = Vec::with_capacity((2 + (stacks - 1) * slices) as usize);
        vertices.push(Vec3::new(0.0, radius, 0.0));
        for k in 1..stacks {
            let phi = PI * k as f32 / stacks as f32;
            let (ring_radius, y) = (radius * phi.sin(), radius * phi.cos());
            for j in 0..slices {
                let theta = TAU * j as f32 / slices as f32;
                vertices.push(Vec3::new(ring_radius * theta.cos(), y, ring_radius * theta.sin()));
            }
        }
        let south = vertices.len() as u32;
        vertices.push(Vec3::new(0.0, -radius, 0.0));

        let ring = |k: u32, j: u32| 1 + (k - 1) * slices + j % slices;
        let mut faces = Vec::with_capacity((slices * stacks) as usize);
        for j in 0..slices {
            faces.push(vec![0, ring(1, j + 1), ring(1, j)]);
        }
        for k in 1..stacks - 1 {
            for j in 0..slices {
                faces.push(vec![ring(k, j), ring(k, j + 1), ring(k + 1, j + 1), ring(k + 1, j)]);
            }
        }
        for j in 0..slices {
            faces.push(vec![south, ring(stacks - 1, j), ring(stacks - 1, j + 1)]);
        }
        Self::from_faces(vertices, faces)
    }

    fn cylinder(radius: f32, height: f32, segments: u32) -> Self {
        let half = height * 0.5;
        let mut vertices = Vec::with_capacity(2 * segments as usize);
        for y in [half, -half] {
            for j in 0..segments {
                let theta = TAU * j as f32 / segments as f32;
                vertices.push(Vec3::new(radius * theta.cos(), y, radius * theta.sin()));
            }
        }

        let top = |j: u32| j % segments;
        let bottom = |j: u32| segments + j % segments;
        let mut faces = Vec::with_capacity(segments as usize + 2);
        faces.push((0..segments).rev().map(top).collect());
        faces.push((0..segments).map(bottom).collect());
        for j in 0..segments {
            faces.push(vec![top(j), top(j + 1), bottom(j + 1), bottom(j)]);
        }
        Self::from_faces(vertices, faces)
    }

    fn hull(points: &[Vec3]) -> Result<Self> {
        if points.len() < 4 {
            return Err(Error::InvalidGeometry(format!(
                "convex hull needs at least 4 points, got {}",
                points.len()
            )));
        }
        if !points.iter().all(|p| p.is_finite()) {
            return Err(Error::InvalidGeometry("convex hull point is not finite".to_string()));
        }
        if is_flat(points) {
            return Err(Error::InvalidGeometry("convex hull points are coplanar".to_string()));
        }

        let input: Vec<Point<Real>> = points.iter().map(|p| Point::new(p.x, p.y, p.z)).collect();
        let (hull_points, triangles) = convex_hull(&input);
        let vertices = hull_points.iter().map(|p| Vec3::new(p.x, p.y, p.z)).collect();
        Ok(Self::from_faces(vertices, triangles.iter().map(|t| t.to_vec())))
    }

    fn polyhedron(vertices: &[Vec3], faces: &[Vec<u32>]) -> Result<Self> {
        if faces.is_empty() {
            return Err(Error::InvalidGeometry("polyhedron has no faces".to_string()));
        }
        for (i, face) in faces.iter().enumerate() {
            if face.len() < 3 {
                return Err(Error::InvalidGeometry(format!(
                    "face {} has {} vertices, need at least 3",
                    i,
                    face.len()
                )));
            }
            if let Some(bad) = face.iter().find(|&&v| v as usize >= vertices.len()) {
                return Err(Error::InvalidGeometry(format!(
                    "face {} references vertex {} of {}",
                    i,
                    bad,
                    vertices.len()
                )));
            }
        }
        Ok(Self::from_faces(vertices.to_vec(), faces.iter().cloned()))
    }

    /// Unscaled vertices
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn face_count(&self) -> usize {
        self.face_offsets.len() - 1
    }

    /// Vertex indices of one face
    pub fn face(&self, index: usize) -> Option<&[u32]> {
        let start = *self.face_offsets.get(index)?;
        let end = *self.face_offsets.get(index + 1)?;
        Some(&self.indices[start..end])
    }

    /// Vertex count of the largest face
    pub fn max_face_len(&self) -> usize {
        self.max_face_len
    }

    /// Bounds of the vertices after `matrix`
    pub fn bounds(&self, matrix: &Mat4) -> Option<Aabb> {
        Aabb::from_points(self.vertices.iter().map(|v| matrix.transform_point3(*v)))
    }
}

fn require_positive(what: &str, v: Vec3) -> Result<()> {
    if v.is_finite() && v.cmpgt(Vec3::ZERO).all() {
        Ok(())
    } else {
        Err(Error::InvalidGeometry(format!("{} must be positive", what)))
    }
}

/// True if all points lie on one plane (or a line, or a point)
///
/// The tolerance is relative to the extent of the point cloud.
fn is_flat(points: &[Vec3]) -> bool {
    const RELATIVE_EPSILON: f32 = 1e-5;
    let Some(bounds) = Aabb::from_points(points.iter().copied()) else {
        return true;
    };
    let tolerance = bounds.size().length() * RELATIVE_EPSILON;
    if tolerance == 0.0 {
        return true;
    }

    let origin = points[0];
    let Some(axis) = points
        .iter()
        .map(|p| *p - origin)
        .find(|d| d.length() > tolerance)
    else {
        return true;
    };
    let axis = axis.normalize();
    let Some(normal) = points
        .iter()
        .map(|p| axis.cross(*p - origin))
        .find(|n| n.length() > tolerance)
    else {
        return true;
    };
    let normal = normal.normalize();
    points
        .iter()
        .all(|p| normal.dot(*p - origin).abs() <= tolerance)
}
