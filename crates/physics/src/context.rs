//! World context: the join point between worlds, bodies and shapes
//!
//! All mutation of the ownership tables goes through [`WorldContext`]. The
//! context is single-threaded; a host that shares it between threads wraps
//! it in one lock and holds that lock for a whole step plus any debug
//! queries that follow.

use crate::body::{Body, BodyDesc, ShapeState};
use crate::config::PhysicsConfig;
use crate::debug::{DebugGeometryExporter, DebugWireframe, FaceIter};
use crate::error::{Error, Result};
use crate::handle::{BodyHandle, ShapeHandle, WorldHandle};
use crate::host::HostObject;
use crate::shape::{ShapeDesc, ShapeRegistry};
use crate::transform::{validate_scale, Transform};
use crate::world::World;
use glam::{Quat, Vec3};
use slotmap::SlotMap;

/// Owner of every world, body and shape
#[derive(Debug)]
pub struct WorldContext {
    config: PhysicsConfig,
    worlds: SlotMap<WorldHandle, World>,
    bodies: SlotMap<BodyHandle, Body>,
    shapes: ShapeRegistry,
}

impl Default for WorldContext {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}

impl WorldContext {
    pub fn new(config: PhysicsConfig) -> Self {
        let shapes = ShapeRegistry::new(&config);
        Self {
            config,
            worlds: SlotMap::with_key(),
            bodies: SlotMap::with_key(),
            shapes,
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Worlds
    // ------------------------------------------------------------------

    /// Create a world with the configured gravity
    pub fn create_world(&mut self) -> WorldHandle {
        let gravity = self.config.gravity();
        let handle = self
            .worlds
            .insert_with_key(|handle| World::new(handle, gravity));
        tracing::debug!("Created world {:?}", handle);
        handle
    }

    /// Destroy a world together with every shape and body it owns
    ///
    /// Proxies that cached one of the destroyed shapes move to
    /// [`ShapeState::Destroyed`]; children of destroyed bodies keep a stale
    /// parent link and no longer resolve to an owning body.
    pub fn destroy_world(&mut self, world: WorldHandle) -> Result<()> {
        let mut entry = self.worlds.remove(world).ok_or(Error::InvalidWorld)?;
        let shapes = self.shapes.destroy_world_shapes(world);
        let bodies = entry.take_bodies();
        for body in &bodies {
            self.bodies.remove(*body);
        }
        for body in self.bodies.values_mut() {
            if let ShapeState::Created(handle) = body.shape {
                if shapes.contains(&handle) {
                    body.shape = ShapeState::Destroyed;
                }
            }
        }
        tracing::debug!(
            "Destroyed world {:?} ({} bodies, {} shapes)",
            world,
            bodies.len(),
            shapes.len()
        );
        Ok(())
    }

    pub fn world(&self, world: WorldHandle) -> Result<&World> {
        self.worlds.get(world).ok_or(Error::InvalidWorld)
    }

    pub fn world_count(&self) -> usize {
        self.worlds.len()
    }

    pub fn set_gravity(&mut self, world: WorldHandle, gravity: Vec3) -> Result<()> {
        if !gravity.is_finite() {
            return Err(Error::InvalidGravity {
                x: gravity.x,
                y: gravity.y,
                z: gravity.z,
            });
        }
        let entry = self.worlds.get_mut(world).ok_or(Error::InvalidWorld)?;
        entry.set_gravity(gravity);
        Ok(())
    }

    /// Set the render interpolation factor of a world, clamped to `[0, 1]`
    pub fn set_interpolation_param(&mut self, world: WorldHandle, param: f32) -> Result<()> {
        let entry = self.worlds.get_mut(world).ok_or(Error::InvalidWorld)?;
        entry.set_interpolation_param(param);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Bodies
    // ------------------------------------------------------------------

    /// Create a body, either owning a world or parented to another body
    pub fn create_body(&mut self, desc: BodyDesc) -> Result<BodyHandle> {
        if let Some(world) = desc.world {
            if !self.worlds.contains_key(world) {
                return Err(Error::InvalidWorld);
            }
        }
        if let Some(parent) = desc.parent {
            if !self.bodies.contains_key(parent) {
                return Err(Error::InvalidBody);
            }
        }
        if !desc.mass.is_finite() || desc.mass < 0.0 {
            return Err(Error::InvalidMass(desc.mass));
        }

        let world = desc.world;
        let handle = self.bodies.insert(Body::new(desc));
        if let Some(world) = world.and_then(|w| self.worlds.get_mut(w)) {
            world.insert_body(handle);
        }
        tracing::debug!("Created body {:?} (world {:?})", handle, world);
        Ok(handle)
    }

    /// Destroy a body and release its shape
    ///
    /// Direct children are detached and become roots.
    pub fn destroy_body(&mut self, body: BodyHandle) -> Result<()> {
        let entry = self.bodies.remove(body).ok_or(Error::InvalidBody)?;
        if let Some(handle) = entry.shape.handle() {
            self.destroy_shape(handle);
        }
        if let Some(world) = entry.world.and_then(|w| self.worlds.get_mut(w)) {
            world.remove_body(body);
        }
        for child in self.bodies.values_mut() {
            if child.parent == Some(body) {
                child.parent = None;
            }
        }
        tracing::debug!("Destroyed body {:?}", body);
        Ok(())
    }

    pub fn body(&self, body: BodyHandle) -> Result<&Body> {
        self.bodies.get(body).ok_or(Error::InvalidBody)
    }

    fn body_mut(&mut self, body: BodyHandle) -> Result<&mut Body> {
        self.bodies.get_mut(body).ok_or(Error::InvalidBody)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Parent of a body in the ownership tree
    pub fn get_parent(&self, body: BodyHandle) -> Result<Option<BodyHandle>> {
        self.body(body).map(Body::parent)
    }

    /// Attach `child` under `parent`, or detach it with `None`
    ///
    /// Fails with [`Error::CyclicOwnership`] if `child` is `parent` or one of
    /// its ancestors; the tree is left unchanged in that case.
    pub fn set_parent(&mut self, child: BodyHandle, parent: Option<BodyHandle>) -> Result<()> {
        self.body(child)?;
        if let Some(parent) = parent {
            self.body(parent)?;
            let mut cursor = Some(parent);
            let mut steps = 0;
            while let Some(current) = cursor {
                if current == child || steps > self.bodies.len() {
                    return Err(Error::CyclicOwnership);
                }
                cursor = self.bodies.get(current).and_then(Body::parent);
                steps += 1;
            }
        }
        self.body_mut(child)?.parent = parent;
        Ok(())
    }

    /// Replace the host transform of a body
    ///
    /// If the body's shape is live, its effective scale is re-applied. A
    /// rejected scale leaves both the transform and the shape untouched.
    pub fn set_transform(&mut self, body: BodyHandle, transform: Transform) -> Result<()> {
        let entry = self.body(body)?;
        if let ShapeState::Created(shape) = entry.shape {
            let base = entry.shape_desc.as_ref().map_or(Vec3::ONE, |d| d.base_scale);
            let scale = effective_scale(base, transform.scale)?;
            self.shapes.set_scale(shape, scale)?;
        }
        self.body_mut(body)?.transform = transform;
        Ok(())
    }

    /// Set the shape description a body materializes on first use
    ///
    /// Only valid while the body is [`ShapeState::Unbound`]; geometry is
    /// fixed once the shape exists.
    pub fn set_shape_desc(&mut self, body: BodyHandle, desc: ShapeDesc) -> Result<()> {
        let entry = self.body_mut(body)?;
        if entry.shape != ShapeState::Unbound {
            return Err(Error::InvalidShape);
        }
        entry.shape_desc = Some(desc);
        Ok(())
    }

    /// Pull the transform of a host object into `body`
    pub fn sync_from_host(&mut self, body: BodyHandle, host: &impl HostObject) -> Result<()> {
        self.set_transform(body, host.transform())
    }

    pub fn set_sleeping(&mut self, body: BodyHandle, sleeping: bool) -> Result<()> {
        self.body_mut(body)?.sleeping = sleeping;
        Ok(())
    }

    pub fn is_sleeping(&self, body: BodyHandle) -> Result<bool> {
        self.body(body).map(Body::is_sleeping)
    }

    /// Record a simulated pose for render interpolation
    pub fn record_body_pose(
        &mut self,
        body: BodyHandle,
        position: Vec3,
        rotation: Quat,
    ) -> Result<()> {
        self.body_mut(body)?.poses.record(position, rotation);
        Ok(())
    }

    /// Pose blended with the interpolation factor of the body's owning world
    pub fn interpolated_pose(&self, body: BodyHandle) -> Result<(Vec3, Quat)> {
        let world = self.owning_world(body)?;
        Ok(self.body(body)?.poses.interpolate(world.interpolation_param()))
    }

    // ------------------------------------------------------------------
    // Force accumulation
    // ------------------------------------------------------------------

    /// Reset the body's accumulators to its weight in the owning world
    pub fn init_force_accumulators(&mut self, body: BodyHandle) -> Result<()> {
        let gravity = self.owning_world(body)?.gravity();
        let entry = self.body_mut(body)?;
        let mass = entry.mass;
        entry.forces.reset(gravity, mass);
        Ok(())
    }

    pub fn add_force(&mut self, body: BodyHandle, force: Vec3) -> Result<()> {
        self.body_mut(body)?.forces.add_force(force);
        Ok(())
    }

    pub fn add_torque(&mut self, body: BodyHandle, torque: Vec3) -> Result<()> {
        self.body_mut(body)?.forces.add_torque(torque);
        Ok(())
    }

    /// Force gathered since the last [`init_force_accumulators`](Self::init_force_accumulators)
    pub fn external_force(&self, body: BodyHandle) -> Result<Vec3> {
        Ok(self.body(body)?.forces.force)
    }

    pub fn external_torque(&self, body: BodyHandle) -> Result<Vec3> {
        Ok(self.body(body)?.forces.torque)
    }

    // ------------------------------------------------------------------
    // Ownership resolution and lazy shapes
    // ------------------------------------------------------------------

    /// Nearest body on the chain `start, parent, grandparent, ...` that owns
    /// a world
    pub fn resolve_owning_body(&self, start: BodyHandle) -> Result<BodyHandle> {
        self.body(start)?;
        let mut cursor = Some(start);
        // set_parent keeps the tree acyclic, so the walk ends within
        // body_count steps
        for _ in 0..=self.bodies.len() {
            let Some(current) = cursor else {
                break;
            };
            let Some(entry) = self.bodies.get(current) else {
                break;
            };
            if entry.world.is_some() {
                return Ok(current);
            }
            cursor = entry.parent;
        }
        Err(Error::NoOwningBody)
    }

    /// World of the nearest owning body
    fn owning_world(&self, body: BodyHandle) -> Result<&World> {
        let owner = self.resolve_owning_body(body)?;
        self.body(owner)?
            .world
            .ok_or(Error::NoOwningBody)
            .and_then(|w| self.world(w))
    }

    /// Base scale times host scale for the body's shape
    pub fn effective_scale(&self, body: BodyHandle) -> Result<Vec3> {
        let entry = self.body(body)?;
        let desc = entry.shape_desc.as_ref().ok_or(Error::MissingShapeDesc)?;
        effective_scale(desc.base_scale, entry.transform.scale)
    }

    /// Shape of a body, created on first use
    ///
    /// The shape is created in the world of the nearest owning body and
    /// immediately given the body's effective scale. Later calls return the
    /// cached handle without walking the hierarchy again.
    pub fn get_or_create_shape(&mut self, body: BodyHandle) -> Result<ShapeHandle> {
        match self.body(body)?.shape {
            ShapeState::Created(handle) => return Ok(handle),
            ShapeState::Destroyed => return Err(Error::InvalidShape),
            ShapeState::Unbound => {}
        }

        let owner = self.resolve_owning_body(body)?;
        let world = self.body(owner)?.world.ok_or(Error::NoOwningBody)?;
        let entry = self.body(body)?;
        let desc = entry.shape_desc.clone().ok_or(Error::MissingShapeDesc)?;
        let scale = effective_scale(desc.base_scale, entry.transform.scale)?;

        let shape = self.create_shape(world, &desc, desc.base_scale)?;
        if let Err(e) = self.shapes.set_scale(shape, scale) {
            self.shapes.destroy(shape);
            return Err(e);
        }
        self.body_mut(body)?.shape = ShapeState::Created(shape);
        tracing::debug!("Body {:?} bound to shape {:?} via owner {:?}", body, shape, owner);
        Ok(shape)
    }

    /// Re-apply the body's effective scale to its live shape
    pub fn update_scale(&mut self, body: BodyHandle) -> Result<()> {
        let shape = self.body(body)?.shape.handle().ok_or(Error::InvalidShape)?;
        let scale = self.effective_scale(body)?;
        self.shapes.set_scale(shape, scale)
    }

    /// Destroy the body's shape and mark the body [`ShapeState::Destroyed`]
    ///
    /// Releasing an `Unbound` body also moves it to `Destroyed`; releasing
    /// twice is a no-op.
    pub fn release_shape(&mut self, body: BodyHandle) -> Result<()> {
        let state = self.body(body)?.shape;
        if let ShapeState::Created(handle) = state {
            self.destroy_shape(handle);
        }
        self.body_mut(body)?.shape = ShapeState::Destroyed;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Shapes
    // ------------------------------------------------------------------

    /// Create a free-standing shape in `world`
    pub fn create_shape(
        &mut self,
        world: WorldHandle,
        desc: &ShapeDesc,
        initial_scale: Vec3,
    ) -> Result<ShapeHandle> {
        let entry = self.worlds.get(world).ok_or(Error::InvalidWorld)?;
        self.shapes.create(entry, desc, initial_scale)
    }

    pub fn set_shape_scale(&mut self, shape: ShapeHandle, scale: Vec3) -> Result<()> {
        self.shapes.set_scale(shape, scale)
    }

    /// Destroy a shape; bodies caching it move to [`ShapeState::Destroyed`]
    ///
    /// Destroying an already destroyed shape is a no-op.
    pub fn destroy_shape(&mut self, shape: ShapeHandle) {
        if self.shapes.destroy(shape).is_none() {
            return;
        }
        for body in self.bodies.values_mut() {
            if body.shape == ShapeState::Created(shape) {
                body.shape = ShapeState::Destroyed;
            }
        }
    }

    /// Read access to the shape registry
    pub fn shapes(&self) -> &ShapeRegistry {
        &self.shapes
    }

    // ------------------------------------------------------------------
    // Debug geometry
    // ------------------------------------------------------------------

    /// Exporter bound to this context's face limit
    pub fn exporter(&self) -> DebugGeometryExporter<'_> {
        DebugGeometryExporter::with_face_limit(&self.shapes, self.config.max_face_vertices)
    }

    /// Faces of a shape in shape-local space
    pub fn enumerate_faces(&self, shape: ShapeHandle) -> Result<FaceIter<'_>> {
        self.exporter().enumerate_faces(shape)
    }

    /// World-space wireframe of a body's shape, creating the shape if needed
    ///
    /// Faces are placed with the body's position and rotation only; the host
    /// scale is already part of the shape scale.
    pub fn body_wireframe(&mut self, body: BodyHandle) -> Result<DebugWireframe> {
        let shape = self.get_or_create_shape(body)?;
        let matrix = self.body(body)?.transform.rigid_matrix();
        self.exporter().wireframe(shape, &matrix)
    }
}

fn effective_scale(base: Vec3, host: Vec3) -> Result<Vec3> {
    validate_scale(host)?;
    validate_scale(validate_scale(base)? * host)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ShapeKind;

    fn box_desc() -> ShapeDesc {
        ShapeDesc::new(ShapeKind::unit_box())
    }

    /// world-owning root -> child proxy -> grandchild proxy with a shape
    fn chain(ctx: &mut WorldContext) -> (WorldHandle, BodyHandle, BodyHandle, BodyHandle) {
        let world = ctx.create_world();
        let root = ctx.create_body(BodyDesc::rigid(world)).unwrap();
        let child = ctx.create_body(BodyDesc::proxy(root)).unwrap();
        let grandchild = ctx
            .create_body(BodyDesc::proxy(child).with_shape(box_desc()))
            .unwrap();
        (world, root, child, grandchild)
    }

    #[test]
    fn test_resolve_three_level_chain() {
        let mut ctx = WorldContext::default();
        let (_, root, child, grandchild) = chain(&mut ctx);

        assert_eq!(ctx.resolve_owning_body(grandchild).unwrap(), root);
        assert_eq!(ctx.resolve_owning_body(child).unwrap(), root);
        assert_eq!(ctx.resolve_owning_body(root).unwrap(), root);
    }

    #[test]
    fn test_resolve_without_owner() {
        let mut ctx = WorldContext::default();
        let a = ctx.create_body(BodyDesc::default()).unwrap();
        let b = ctx.create_body(BodyDesc::proxy(a)).unwrap();

        assert!(matches!(ctx.resolve_owning_body(b), Err(Error::NoOwningBody)));
    }

    #[test]
    fn test_set_parent_rejects_cycles() {
        let mut ctx = WorldContext::default();
        let (_, root, child, grandchild) = chain(&mut ctx);

        assert!(matches!(
            ctx.set_parent(root, Some(grandchild)),
            Err(Error::CyclicOwnership)
        ));
        assert!(matches!(
            ctx.set_parent(child, Some(child)),
            Err(Error::CyclicOwnership)
        ));
        assert_eq!(ctx.get_parent(root).unwrap(), None);
        assert_eq!(ctx.get_parent(child).unwrap(), Some(root));

        ctx.set_parent(grandchild, Some(root)).unwrap();
        assert_eq!(ctx.get_parent(grandchild).unwrap(), Some(root));
        ctx.set_parent(grandchild, None).unwrap();
        assert!(matches!(
            ctx.resolve_owning_body(grandchild),
            Err(Error::NoOwningBody)
        ));
    }

    #[test]
    fn test_get_or_create_shape_caches() {
        let mut ctx = WorldContext::default();
        let (world, _, _, grandchild) = chain(&mut ctx);

        let first = ctx.get_or_create_shape(grandchild).unwrap();
        let second = ctx.get_or_create_shape(grandchild).unwrap();

        assert_eq!(first, second);
        assert_eq!(ctx.shapes().len(), 1);
        assert_eq!(ctx.shapes().get(first).unwrap().world(), world);
        assert_eq!(
            ctx.body(grandchild).unwrap().shape_state(),
            ShapeState::Created(first)
        );
    }

    #[test]
    fn test_cached_shape_survives_reparenting() {
        let mut ctx = WorldContext::default();
        let (_, _, _, grandchild) = chain(&mut ctx);
        let shape = ctx.get_or_create_shape(grandchild).unwrap();

        ctx.set_parent(grandchild, None).unwrap();
        assert_eq!(ctx.get_or_create_shape(grandchild).unwrap(), shape);
    }

    #[test]
    fn test_set_shape_desc_only_while_unbound() {
        let mut ctx = WorldContext::default();
        let (_, root, _, _) = chain(&mut ctx);

        ctx.set_shape_desc(root, ShapeDesc::new(ShapeKind::Sphere { radius: 1.0 }))
            .unwrap();
        ctx.get_or_create_shape(root).unwrap();
        assert!(matches!(
            ctx.set_shape_desc(root, box_desc()),
            Err(Error::InvalidShape)
        ));
    }

    #[test]
    fn test_missing_shape_desc() {
        let mut ctx = WorldContext::default();
        let (_, root, _, _) = chain(&mut ctx);
        assert!(matches!(
            ctx.get_or_create_shape(root),
            Err(Error::MissingShapeDesc)
        ));
    }

    #[test]
    fn test_effective_scale_is_product() {
        let mut ctx = WorldContext::default();
        let world = ctx.create_world();
        let body = ctx
            .create_body(
                BodyDesc::rigid(world)
                    .with_shape(box_desc().with_base_scale(Vec3::new(0.5, 2.0, 1.0)))
                    .with_transform(Transform::IDENTITY.with_scale(Vec3::new(4.0, 3.0, 2.0))),
            )
            .unwrap();

        assert_eq!(ctx.effective_scale(body).unwrap(), Vec3::new(2.0, 6.0, 2.0));
        let shape = ctx.get_or_create_shape(body).unwrap();
        assert_eq!(ctx.shapes().scale(shape).unwrap(), Vec3::new(2.0, 6.0, 2.0));
    }

    #[test]
    fn test_zero_host_scale_rejected() {
        let mut ctx = WorldContext::default();
        let world = ctx.create_world();
        let body = ctx
            .create_body(
                BodyDesc::rigid(world)
                    .with_shape(box_desc())
                    .with_transform(Transform::IDENTITY.with_scale(Vec3::new(1.0, 0.0, 1.0))),
            )
            .unwrap();

        assert!(matches!(
            ctx.get_or_create_shape(body),
            Err(Error::InvalidScale { .. })
        ));
        assert_eq!(ctx.body(body).unwrap().shape_state(), ShapeState::Unbound);
        assert!(ctx.shapes().is_empty());
    }

    #[test]
    fn test_set_transform_reapplies_scale() {
        let mut ctx = WorldContext::default();
        let world = ctx.create_world();
        let body = ctx
            .create_body(BodyDesc::rigid(world).with_shape(box_desc()))
            .unwrap();
        let shape = ctx.get_or_create_shape(body).unwrap();

        ctx.set_transform(body, Transform::IDENTITY.with_scale(Vec3::splat(5.0)))
            .unwrap();
        assert_eq!(ctx.shapes().scale(shape).unwrap(), Vec3::splat(5.0));

        let bad = Transform::IDENTITY.with_scale(Vec3::new(-1.0, 1.0, 1.0));
        assert!(matches!(
            ctx.set_transform(body, bad),
            Err(Error::InvalidScale { .. })
        ));
        assert_eq!(ctx.shapes().scale(shape).unwrap(), Vec3::splat(5.0));
        assert_eq!(ctx.body(body).unwrap().transform().scale, Vec3::splat(5.0));
    }

    #[test]
    fn test_update_scale_requires_live_shape() {
        let mut ctx = WorldContext::default();
        let world = ctx.create_world();
        let body = ctx
            .create_body(BodyDesc::rigid(world).with_shape(box_desc()))
            .unwrap();

        assert!(matches!(ctx.update_scale(body), Err(Error::InvalidShape)));
        ctx.get_or_create_shape(body).unwrap();
        ctx.update_scale(body).unwrap();
    }

    #[test]
    fn test_release_shape_is_terminal() {
        let mut ctx = WorldContext::default();
        let (_, _, _, grandchild) = chain(&mut ctx);
        let shape = ctx.get_or_create_shape(grandchild).unwrap();

        ctx.release_shape(grandchild).unwrap();
        ctx.release_shape(grandchild).unwrap();

        assert_eq!(
            ctx.body(grandchild).unwrap().shape_state(),
            ShapeState::Destroyed
        );
        assert!(!ctx.shapes().contains(shape));
        assert!(matches!(
            ctx.get_or_create_shape(grandchild),
            Err(Error::InvalidShape)
        ));
        assert!(matches!(ctx.update_scale(grandchild), Err(Error::InvalidShape)));
    }

    #[test]
    fn test_destroy_shape_marks_caching_body() {
        let mut ctx = WorldContext::default();
        let (_, _, _, grandchild) = chain(&mut ctx);
        let shape = ctx.get_or_create_shape(grandchild).unwrap();

        ctx.destroy_shape(shape);
        ctx.destroy_shape(shape);

        assert_eq!(
            ctx.body(grandchild).unwrap().shape_state(),
            ShapeState::Destroyed
        );
        assert!(matches!(
            ctx.set_shape_scale(shape, Vec3::ONE),
            Err(Error::InvalidShape)
        ));
        assert!(matches!(ctx.enumerate_faces(shape), Err(Error::InvalidShape)));
    }

    #[test]
    fn test_destroy_world_invalidates_contents() {
        let mut ctx = WorldContext::default();
        let (world, root, child, grandchild) = chain(&mut ctx);
        let shape = ctx.get_or_create_shape(grandchild).unwrap();
        let free = ctx.create_shape(world, &box_desc(), Vec3::ONE).unwrap();

        ctx.destroy_world(world).unwrap();

        assert!(matches!(ctx.world(world), Err(Error::InvalidWorld)));
        assert!(matches!(ctx.body(root), Err(Error::InvalidBody)));
        assert!(!ctx.shapes().contains(shape));
        assert!(!ctx.shapes().contains(free));
        // proxies survive but lose their shape and their owner
        assert_eq!(
            ctx.body(grandchild).unwrap().shape_state(),
            ShapeState::Destroyed
        );
        assert!(matches!(ctx.resolve_owning_body(child), Err(Error::NoOwningBody)));
        assert!(matches!(ctx.destroy_world(world), Err(Error::InvalidWorld)));
        assert!(matches!(
            ctx.create_shape(world, &box_desc(), Vec3::ONE),
            Err(Error::InvalidWorld)
        ));
    }

    #[test]
    fn test_destroy_body_detaches_children() {
        let mut ctx = WorldContext::default();
        let (world, root, child, _) = chain(&mut ctx);

        ctx.destroy_body(root).unwrap();

        assert_eq!(ctx.get_parent(child).unwrap(), None);
        assert_eq!(ctx.world(world).unwrap().body_count(), 0);
        assert!(matches!(ctx.destroy_body(root), Err(Error::InvalidBody)));
    }

    #[test]
    fn test_create_body_validates_links() {
        let mut ctx = WorldContext::default();
        let world = ctx.create_world();
        let body = ctx.create_body(BodyDesc::rigid(world)).unwrap();
        assert!(ctx.world(world).unwrap().owns_body(body));

        ctx.destroy_world(world).unwrap();
        assert!(matches!(
            ctx.create_body(BodyDesc::rigid(world)),
            Err(Error::InvalidWorld)
        ));
        assert!(matches!(
            ctx.create_body(BodyDesc::proxy(body)),
            Err(Error::InvalidBody)
        ));
    }

    #[test]
    fn test_interpolated_pose_uses_owner_world() {
        let mut ctx = WorldContext::default();
        let (world, _, _, grandchild) = chain(&mut ctx);

        ctx.record_body_pose(grandchild, Vec3::new(4.0, 0.0, 0.0), Quat::IDENTITY)
            .unwrap();
        ctx.set_interpolation_param(world, 0.25).unwrap();

        let (position, rotation) = ctx.interpolated_pose(grandchild).unwrap();
        assert!(position.abs_diff_eq(Vec3::new(1.0, 0.0, 0.0), 1e-6));
        assert!(rotation.abs_diff_eq(Quat::IDENTITY, 1e-6));
    }

    #[test]
    fn test_sleep_flag() {
        let mut ctx = WorldContext::default();
        let world = ctx.create_world();
        let body = ctx.create_body(BodyDesc::rigid(world)).unwrap();

        assert!(!ctx.is_sleeping(body).unwrap());
        ctx.set_sleeping(body, true).unwrap();
        assert!(ctx.is_sleeping(body).unwrap());
    }

    #[test]
    fn test_body_wireframe_in_world_space() {
        let mut ctx = WorldContext::default();
        let world = ctx.create_world();
        let transform = Transform::from_position(Vec3::new(10.0, 0.0, 0.0))
            .with_scale(Vec3::splat(2.0));
        let body = ctx
            .create_body(
                BodyDesc::rigid(world)
                    .with_shape(box_desc())
                    .with_transform(transform),
            )
            .unwrap();

        let wireframe = ctx.body_wireframe(body).unwrap();
        assert_eq!(wireframe.indices.len(), 12);
        for v in &wireframe.vertices {
            assert!((v.x - 10.0).abs() == 1.0);
            assert!(v.y.abs() == 1.0 && v.z.abs() == 1.0);
        }
    }

    #[test]
    fn test_set_gravity_rejects_non_finite() {
        let mut ctx = WorldContext::default();
        let world = ctx.create_world();
        ctx.set_gravity(world, Vec3::new(0.0, -1.0, 0.0)).unwrap();

        for bad in [Vec3::new(f32::NAN, 0.0, 0.0), Vec3::new(0.0, f32::INFINITY, 0.0)] {
            assert!(matches!(
                ctx.set_gravity(world, bad),
                Err(Error::InvalidGravity { .. })
            ));
        }
        assert_eq!(ctx.world(world).unwrap().gravity(), Vec3::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn test_force_accumulators_seeded_from_owner_gravity() {
        let mut ctx = WorldContext::default();
        let world = ctx.create_world();
        ctx.set_gravity(world, Vec3::new(0.0, -10.0, 0.0)).unwrap();
        let root = ctx
            .create_body(BodyDesc::rigid(world).with_mass(2.0))
            .unwrap();
        let child = ctx
            .create_body(BodyDesc::proxy(root).with_mass(0.5))
            .unwrap();

        ctx.init_force_accumulators(root).unwrap();
        ctx.init_force_accumulators(child).unwrap();
        assert_eq!(ctx.external_force(root).unwrap(), Vec3::new(0.0, -20.0, 0.0));
        assert_eq!(ctx.external_force(child).unwrap(), Vec3::new(0.0, -5.0, 0.0));

        ctx.add_force(root, Vec3::new(3.0, 0.0, 0.0)).unwrap();
        ctx.add_force(root, Vec3::new(1.0, 20.0, 0.0)).unwrap();
        ctx.add_torque(root, Vec3::new(0.0, 0.0, 2.0)).unwrap();
        assert_eq!(ctx.external_force(root).unwrap(), Vec3::new(4.0, 0.0, 0.0));
        assert_eq!(ctx.external_torque(root).unwrap(), Vec3::new(0.0, 0.0, 2.0));

        ctx.init_force_accumulators(root).unwrap();
        assert_eq!(ctx.external_force(root).unwrap(), Vec3::new(0.0, -20.0, 0.0));
        assert_eq!(ctx.external_torque(root).unwrap(), Vec3::ZERO);
    }

    #[test]
    fn test_force_accumulators_need_owner() {
        let mut ctx = WorldContext::default();
        let orphan = ctx.create_body(BodyDesc::default().with_mass(1.0)).unwrap();
        assert!(matches!(
            ctx.init_force_accumulators(orphan),
            Err(Error::NoOwningBody)
        ));

        let world = ctx.create_world();
        assert!(matches!(
            ctx.create_body(BodyDesc::rigid(world).with_mass(-1.0)),
            Err(Error::InvalidMass(_))
        ));
        assert!(matches!(
            ctx.create_body(BodyDesc::rigid(world).with_mass(f32::NAN)),
            Err(Error::InvalidMass(_))
        ));
    }
}
