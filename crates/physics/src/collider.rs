//! Rapier colliders from registered shapes
//!
//! Hosts that hand a shape to a simulation need it in the engine's own
//! collider representation, with the current scale and offset baked in.
//!
//! Boxes without a rotated offset map to cuboids and uniformly scaled
//! spheres map to balls. Everything else becomes the convex hull of its
//! scaled, offset vertices, so non-convex polyhedra are approximated.

use crate::error::{Error, Result};
use crate::geometry::ShapeKind;
use crate::handle::ShapeHandle;
use crate::shape::{Shape, ShapeRegistry};
use glam::Vec3;
use rapier3d::prelude::*;

impl ShapeRegistry {
    /// Build a collider for the shape's current scale and offset
    pub fn to_collider(&self, shape: ShapeHandle) -> Result<Collider> {
        let entry = self.get(shape)?;
        let scale = entry.scale();
        let offset = entry.offset();
        let translation = vector![offset.position.x, offset.position.y, offset.position.z];

        let builder = match entry.kind() {
            ShapeKind::Box { size } if offset.rotation == Vec3::ZERO => {
                let half = *size * scale * 0.5;
                ColliderBuilder::cuboid(half.x, half.y, half.z).translation(translation)
            }
            ShapeKind::Sphere { radius } if scale.x == scale.y && scale.y == scale.z => {
                ColliderBuilder::ball(radius * scale.x).translation(translation)
            }
            _ => hull_collider(entry)?,
        };
        Ok(builder.build())
    }
}

fn hull_collider(shape: &Shape) -> Result<ColliderBuilder> {
    let matrix = shape.local_matrix();
    let points: Vec<Point<Real>> = shape
        .geometry()
        .vertices()
        .iter()
        .map(|v| {
            let p = matrix.transform_point3(*v);
            point![p.x, p.y, p.z]
        })
        .collect();

    ColliderBuilder::convex_hull(&points).ok_or_else(|| {
        Error::InvalidGeometry(format!(
            "no convex hull for {:?} shape with {} vertices",
            shape.tag(),
            points.len()
        ))
    })
}
