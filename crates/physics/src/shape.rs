//! Collision shapes and the registry that owns them

use crate::config::PhysicsConfig;
use crate::error::{Error, Result};
use crate::geometry::{Aabb, Geometry, ShapeKind, ShapeTag};
use crate::handle::{ShapeHandle, WorldHandle};
use crate::transform::{validate_scale, ShapeOffset};
use crate::world::World;
use glam::{Mat4, Vec3};
use slotmap::SlotMap;

/// Everything needed to materialize a shape
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeDesc {
    pub kind: ShapeKind,
    /// Configured scale, multiplied with the host scale
    pub base_scale: Vec3,
    /// Placement relative to the body
    pub offset: ShapeOffset,
}

impl ShapeDesc {
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            base_scale: Vec3::ONE,
            offset: ShapeOffset::default(),
        }
    }

    pub fn with_base_scale(mut self, scale: Vec3) -> Self {
        self.base_scale = scale;
        self
    }

    pub fn with_offset(mut self, offset: ShapeOffset) -> Self {
        self.offset = offset;
        self
    }
}

/// A collision shape owned by one world
///
/// Geometry is fixed at creation; only the scale changes afterwards.
#[derive(Debug, Clone)]
pub struct Shape {
    kind: ShapeKind,
    geometry: Geometry,
    offset: ShapeOffset,
    scale: Vec3,
    world: WorldHandle,
}

impl Shape {
    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    pub fn tag(&self) -> ShapeTag {
        self.kind.tag()
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn offset(&self) -> &ShapeOffset {
        &self.offset
    }

    /// Current local scale
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// World this shape belongs to
    pub fn world(&self) -> WorldHandle {
        self.world
    }

    /// Matrix taking stored vertices to shape-local space: scale, then offset
    pub fn local_matrix(&self) -> Mat4 {
        self.offset.matrix() * Mat4::from_scale(self.scale)
    }
}

/// Owner of all shape instances, keyed by [`ShapeHandle`]
#[derive(Debug, Default)]
pub struct ShapeRegistry {
    shapes: SlotMap<ShapeHandle, Shape>,
    tessellation: crate::config::TessellationConfig,
}

impl ShapeRegistry {
    pub fn new(config: &PhysicsConfig) -> Self {
        Self {
            shapes: SlotMap::with_key(),
            tessellation: config.tessellation,
        }
    }

    /// Create a shape in `world` with the given initial scale
    ///
    /// `world` can only be obtained for a live world, so stale world handles
    /// are rejected before reaching this point.
    pub fn create(
        &mut self,
        world: &World,
        desc: &ShapeDesc,
        initial_scale: Vec3,
    ) -> Result<ShapeHandle> {
        let scale = validate_scale(initial_scale)?;
        let geometry = Geometry::build(&desc.kind, &self.tessellation).inspect_err(|e| {
            tracing::warn!("Rejected {:?} geometry: {}", desc.kind.tag(), e);
        })?;

        let handle = self.shapes.insert(Shape {
            kind: desc.kind.clone(),
            geometry,
            offset: desc.offset,
            scale,
            world: world.handle(),
        });
        tracing::debug!(
            "Created {:?} shape {:?} in world {:?}",
            desc.kind.tag(),
            handle,
            world.handle()
        );
        Ok(handle)
    }

    /// Replace the local scale of a shape
    ///
    /// On error the previous scale is kept.
    pub fn set_scale(&mut self, shape: ShapeHandle, scale: Vec3) -> Result<()> {
        let entry = self.shapes.get_mut(shape).ok_or(Error::InvalidShape)?;
        entry.scale = validate_scale(scale)?;
        tracing::trace!("Shape {:?} scale set to {}", shape, scale);
        Ok(())
    }

    /// Current local scale of a shape
    pub fn scale(&self, shape: ShapeHandle) -> Result<Vec3> {
        self.get(shape).map(Shape::scale)
    }

    /// Destroy a shape; destroying an already destroyed shape is a no-op
    ///
    /// Returns the removed shape if it was still alive.
    pub fn destroy(&mut self, shape: ShapeHandle) -> Option<Shape> {
        let removed = self.shapes.remove(shape);
        if removed.is_some() {
            tracing::debug!("Destroyed shape {:?}", shape);
        }
        removed
    }

    /// Destroy every shape belonging to `world`, returning their handles
    pub fn destroy_world_shapes(&mut self, world: WorldHandle) -> Vec<ShapeHandle> {
        let doomed = self.shapes_in(world);
        for handle in &doomed {
            self.shapes.remove(*handle);
        }
        doomed
    }

    pub fn get(&self, shape: ShapeHandle) -> Result<&Shape> {
        self.shapes.get(shape).ok_or(Error::InvalidShape)
    }

    pub fn contains(&self, shape: ShapeHandle) -> bool {
        self.shapes.contains_key(shape)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Handles of all shapes owned by `world`
    pub fn shapes_in(&self, world: WorldHandle) -> Vec<ShapeHandle> {
        self.shapes
            .iter()
            .filter(|(_, shape)| shape.world == world)
            .map(|(handle, _)| handle)
            .collect()
    }

    /// Bounds of the shape in its local space, scale and offset applied
    pub fn local_aabb(&self, shape: ShapeHandle) -> Result<Aabb> {
        let entry = self.get(shape)?;
        entry
            .geometry
            .bounds(&entry.local_matrix())
            .ok_or_else(|| Error::InvalidGeometry("shape has no vertices".to_string()))
    }
}
