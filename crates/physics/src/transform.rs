//! Host transforms and shape offsets
//!
//! Rotations arrive from the host as Euler angles in degrees. They are
//! composed Z first, then X, then Y, which matches the convention of common
//! scene editors.

use crate::error::{Error, Result};
use glam::{EulerRot, Mat4, Quat, Vec3};

/// Convert Euler angles in degrees to a quaternion
///
/// The rotation applies `z` degrees around Z, then `x` around X, then `y`
/// around Y.
pub fn euler_degrees_to_quat(degrees: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        degrees.y.to_radians(),
        degrees.x.to_radians(),
        degrees.z.to_radians(),
    )
}

/// Check that every scale component is finite and strictly positive
pub fn validate_scale(scale: Vec3) -> Result<Vec3> {
    let valid = scale.is_finite() && scale.cmpgt(Vec3::ZERO).all();
    if valid {
        Ok(scale)
    } else {
        Err(Error::InvalidScale {
            x: scale.x,
            y: scale.y,
            z: scale.z,
        })
    }
}

/// Position, Euler rotation (degrees) and scale of a host scene object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Euler angles in degrees
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: Vec3::ONE,
    };

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    pub fn with_rotation(mut self, degrees: Vec3) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Rotation as a quaternion
    pub fn rotation_quat(&self) -> Quat {
        euler_degrees_to_quat(self.rotation)
    }

    /// Full translate-rotate-scale matrix
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation_quat(), self.position)
    }

    /// Translate-rotate matrix with unit scale
    ///
    /// Shape geometry already carries the host scale, so debug drawing places
    /// faces with this matrix rather than [`Transform::matrix`].
    pub fn rigid_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation_quat(), self.position)
    }
}

/// Placement of a shape relative to its body
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShapeOffset {
    pub position: Vec3,
    /// Euler angles in degrees
    pub rotation: Vec3,
}

impl ShapeOffset {
    pub fn new(position: Vec3, rotation: Vec3) -> Self {
        Self { position, rotation }
    }

    pub fn is_identity(&self) -> bool {
        self.position == Vec3::ZERO && self.rotation == Vec3::ZERO
    }

    pub fn rotation_quat(&self) -> Quat {
        euler_degrees_to_quat(self.rotation)
    }

    /// Offset matrix (unit scale)
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation_quat(), self.position)
    }
}
