//! Host scene boundary
//!
//! The core never reads a scene graph itself. Hosts push transforms through
//! [`HostObject`] and describe parent/child links with
//! [`WorldContext::set_parent`](crate::WorldContext::set_parent).

use crate::transform::Transform;
use glam::Vec3;

/// A host scene object with position, Euler rotation and scale
///
/// Implemented by [`Transform`] itself; host-side scene nodes implement it to
/// feed [`WorldContext::sync_from_host`](crate::WorldContext::sync_from_host).
pub trait HostObject {
    /// Get the current position
    fn position(&self) -> Vec3;

    /// Get the current rotation as Euler angles in degrees
    fn rotation_degrees(&self) -> Vec3;

    /// Get the current scale
    fn scale(&self) -> Vec3;

    /// Snapshot of the object as a [`Transform`]
    fn transform(&self) -> Transform {
        Transform {
            position: self.position(),
            rotation: self.rotation_degrees(),
            scale: self.scale(),
        }
    }
}

impl HostObject for Transform {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn rotation_degrees(&self) -> Vec3 {
        self.rotation
    }

    fn scale(&self) -> Vec3 {
        self.scale
    }

    fn transform(&self) -> Transform {
        *self
    }
}
