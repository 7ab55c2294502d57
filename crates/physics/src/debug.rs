//! Debug geometry export
//!
//! Hands out the boundary of a shape as a sequence of [`FaceLoop`]s for
//! wireframe drawing. Each call builds its own buffers, and enumeration only
//! borrows the registry, so it can never observe or cause a mutation.
//!
//! A face loop is closed implicitly: the last vertex connects back to the
//! first, and the first vertex is not repeated at the end.

use crate::config::DEFAULT_MAX_FACE_VERTICES;
use crate::error::{Error, Result};
use crate::handle::ShapeHandle;
use crate::shape::{Shape, ShapeRegistry};
use glam::{Mat4, Vec3};
use std::collections::{HashMap, HashSet};

/// Ordered vertex boundary of one polygonal face
#[derive(Debug, Clone, PartialEq)]
pub struct FaceLoop {
    vertices: Vec<Vec3>,
}

impl FaceLoop {
    pub fn new(vertices: Vec<Vec3>) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Line segments around the loop, starting with (last, first)
    pub fn edges(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        let last = self.vertices.last().copied();
        last.into_iter()
            .chain(self.vertices.iter().copied())
            .zip(self.vertices.iter().copied())
    }

    /// Copy of the loop with every vertex transformed by `matrix`
    pub fn transformed(&self, matrix: &Mat4) -> FaceLoop {
        FaceLoop::new(
            self.vertices
                .iter()
                .map(|v| matrix.transform_point3(*v))
                .collect(),
        )
    }

    /// Area-weighted normal (Newell's method); zero for degenerate loops
    pub fn normal(&self) -> Vec3 {
        self.edges()
            .map(|(a, b)| {
                Vec3::new(
                    (a.y - b.y) * (a.z + b.z),
                    (a.z - b.z) * (a.x + b.x),
                    (a.x - b.x) * (a.y + b.y),
                )
            })
            .sum::<Vec3>()
            .normalize_or_zero()
    }
}

/// Lazy sequence of the faces of one shape
///
/// Produced by [`DebugGeometryExporter::enumerate_faces`]. Every call starts
/// a fresh iterator; there is no shared cursor.
#[derive(Debug, Clone)]
pub struct FaceIter<'a> {
    shape: &'a Shape,
    matrix: Mat4,
    next: usize,
}

impl Iterator for FaceIter<'_> {
    type Item = FaceLoop;

    fn next(&mut self) -> Option<FaceLoop> {
        let geometry = self.shape.geometry();
        let indices = geometry.face(self.next)?;
        self.next += 1;
        let vertices = geometry.vertices();
        Some(FaceLoop::new(
            indices
                .iter()
                .map(|&i| self.matrix.transform_point3(vertices[i as usize]))
                .collect(),
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.shape.geometry().face_count() - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for FaceIter<'_> {}

/// Read-only view that extracts face loops from registered shapes
#[derive(Debug, Clone, Copy)]
pub struct DebugGeometryExporter<'a> {
    registry: &'a ShapeRegistry,
    max_face_vertices: usize,
}

impl<'a> DebugGeometryExporter<'a> {
    pub fn new(registry: &'a ShapeRegistry) -> Self {
        Self::with_face_limit(registry, DEFAULT_MAX_FACE_VERTICES)
    }

    pub fn with_face_limit(registry: &'a ShapeRegistry, max_face_vertices: usize) -> Self {
        Self {
            registry,
            max_face_vertices,
        }
    }

    pub fn max_face_vertices(&self) -> usize {
        self.max_face_vertices
    }

    /// Faces of `shape` in shape-local space (scale, then offset applied)
    ///
    /// Fails with [`Error::FaceTooLarge`] before yielding anything if any face
    /// exceeds the vertex limit.
    pub fn enumerate_faces(&self, shape: ShapeHandle) -> Result<FaceIter<'a>> {
        let entry = self.registry.get(shape)?;
        let largest = entry.geometry().max_face_len();
        if largest > self.max_face_vertices {
            return Err(Error::FaceTooLarge {
                vertices: largest,
                max: self.max_face_vertices,
            });
        }
        Ok(FaceIter {
            shape: entry,
            matrix: entry.local_matrix(),
            next: 0,
        })
    }

    /// Wireframe of `shape` with `matrix` applied on top of the local space
    pub fn wireframe(&self, shape: ShapeHandle, matrix: &Mat4) -> Result<DebugWireframe> {
        let faces = self.enumerate_faces(shape)?;
        Ok(DebugWireframe::from_faces(
            faces.map(|face| face.transformed(matrix)),
        ))
    }
}

/// Indexed line list built from face loops
///
/// Edges shared by two faces are emitted once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DebugWireframe {
    /// Vertices of the debug wireframe
    pub vertices: Vec<Vec3>,
    /// Indices of the lines
    pub indices: Vec<[u32; 2]>,
}

impl DebugWireframe {
    pub fn from_faces(faces: impl IntoIterator<Item = FaceLoop>) -> Self {
        let mut wireframe = Self::default();
        let mut vertex_ids: HashMap<[u32; 3], u32> = HashMap::new();
        let mut seen_edges: HashSet<(u32, u32)> = HashSet::new();

        for face in faces {
            for (a, b) in face.edges() {
                let ia = wireframe.vertex_id(&mut vertex_ids, a);
                let ib = wireframe.vertex_id(&mut vertex_ids, b);
                if ia == ib {
                    continue;
                }
                let key = (ia.min(ib), ia.max(ib));
                if seen_edges.insert(key) {
                    wireframe.indices.push([ia, ib]);
                }
            }
        }
        wireframe
    }

    fn vertex_id(&mut self, ids: &mut HashMap<[u32; 3], u32>, v: Vec3) -> u32 {
        let key = v.to_array().map(f32::to_bits);
        *ids.entry(key).or_insert_with(|| {
            self.vertices.push(v);
            (self.vertices.len() - 1) as u32
        })
    }

    /// Segments as point pairs
    pub fn lines(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        self.indices
            .iter()
            .map(|[a, b]| (self.vertices[*a as usize], self.vertices[*b as usize]))
    }
}
