use crate::handle::{BodyHandle, WorldHandle};
use glam::Vec3;
use std::collections::HashSet;

/// Physics world
///
/// Owning container for the bodies of one simulation instance. Shapes point
/// back at their world through [`Shape::world`](crate::Shape::world); the
/// set of shapes a world owns is kept by the [`ShapeRegistry`](crate::ShapeRegistry).
#[derive(Debug, Clone)]
pub struct World {
    handle: WorldHandle,
    gravity: Vec3,
    interpolation_param: f32,
    bodies: HashSet<BodyHandle>,
}

impl World {
    /// Create a world record for `handle`
    ///
    /// # Arguments
    /// * `handle` - Handle this world is stored under
    /// * `gravity` - Gravity vector (e.g., Vec3::new(0.0, -9.81, 0.0))
    pub fn new(handle: WorldHandle, gravity: Vec3) -> Self {
        Self {
            handle,
            gravity,
            interpolation_param: 1.0,
            bodies: HashSet::new(),
        }
    }

    pub fn handle(&self) -> WorldHandle {
        self.handle
    }

    /// Get the current gravity vector
    pub fn gravity(&self) -> Vec3 {
        self.gravity
    }

    /// Set the gravity vector
    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = gravity;
    }

    /// Blend factor between the previous and current body poses
    pub fn interpolation_param(&self) -> f32 {
        self.interpolation_param
    }

    /// Set the blend factor, clamped to `[0, 1]`
    pub fn set_interpolation_param(&mut self, param: f32) {
        self.interpolation_param = if param.is_nan() { 1.0 } else { param.clamp(0.0, 1.0) };
    }

    /// Bodies that reference this world directly
    pub fn bodies(&self) -> impl Iterator<Item = BodyHandle> + '_ {
        self.bodies.iter().copied()
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn owns_body(&self, body: BodyHandle) -> bool {
        self.bodies.contains(&body)
    }

    pub(crate) fn insert_body(&mut self, body: BodyHandle) {
        self.bodies.insert(body);
    }

    pub(crate) fn remove_body(&mut self, body: BodyHandle) {
        self.bodies.remove(&body);
    }

    pub(crate) fn take_bodies(&mut self) -> Vec<BodyHandle> {
        self.bodies.drain().collect()
    }
}
