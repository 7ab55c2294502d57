//! Error types for the physics core

use thiserror::Error;

/// Result type for physics core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while managing worlds, bodies and shapes
///
/// None of these are fatal: each one is scoped to the single shape or body
/// operation that produced it.
#[derive(Error, Debug)]
pub enum Error {
    /// World handle is stale or was never issued by this context
    #[error("invalid world handle")]
    InvalidWorld,

    /// Shape handle is stale or the shape was destroyed
    #[error("invalid shape handle")]
    InvalidShape,

    /// Body handle is stale or the body was destroyed
    #[error("invalid body handle")]
    InvalidBody,

    /// A scale component is zero, negative or not finite
    #[error("invalid scale ({x}, {y}, {z}): components must be positive")]
    InvalidScale { x: f32, y: f32, z: f32 },

    /// Body mass is negative or not finite
    #[error("invalid mass {0}: must be finite and non-negative")]
    InvalidMass(f32),

    /// Gravity vector has a non-finite component
    #[error("invalid gravity ({x}, {y}, {z}): components must be finite")]
    InvalidGravity { x: f32, y: f32, z: f32 },

    /// No body on the ownership chain references a world
    #[error("no owning body with a world found on the ownership chain")]
    NoOwningBody,

    /// Attaching a parent would close a loop in the ownership tree
    #[error("attaching the parent would create an ownership cycle")]
    CyclicOwnership,

    /// A face has more vertices than the export buffer allows
    #[error("face has {vertices} vertices, limit is {max}")]
    FaceTooLarge { vertices: usize, max: usize },

    /// Body has no shape description to materialize
    #[error("body has no shape description")]
    MissingShapeDesc,

    /// Shape parameters describe degenerate geometry
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Configuration value out of range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// TOML parsing error
    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
