//! Minimal rigid-body world core for host bindings
//!
//! Provides the pieces a scene-graph binding needs beneath it: a registry of
//! scalable collision shapes, worlds and bodies with lazy "nearest owning
//! ancestor" shape resolution, and a debug exporter that hands out the faces
//! of a shape for wireframe rendering.
//!
//! ```
//! use newton_physics::{BodyDesc, ShapeDesc, ShapeKind, Transform, WorldContext};
//! use newton_physics::glam::Vec3;
//!
//! let mut ctx = WorldContext::default();
//! let world = ctx.create_world();
//! let body = ctx
//!     .create_body(
//!         BodyDesc::rigid(world)
//!             .with_shape(ShapeDesc::new(ShapeKind::unit_box()))
//!             .with_transform(Transform::IDENTITY.with_scale(Vec3::new(2.0, 3.0, 4.0))),
//!     )
//!     .unwrap();
//!
//! let shape = ctx.get_or_create_shape(body).unwrap();
//! assert_eq!(ctx.shapes().scale(shape).unwrap(), Vec3::new(2.0, 3.0, 4.0));
//! assert_eq!(ctx.enumerate_faces(shape).unwrap().count(), 6);
//! ```

mod body;
mod collider;
mod config;
mod context;
mod debug;
mod error;
mod geometry;
mod handle;
mod host;
mod shape;
mod transform;
mod world;

// Only compile WASM bindings when "wasm" feature is enabled
#[cfg(feature = "wasm")]
mod wasm;

pub use body::{Body, BodyDesc, ForceAccumulator, PoseHistory, ShapeState};
pub use config::{
    PhysicsConfig, TessellationConfig, DEFAULT_MAX_FACE_VERTICES, MAX_TESSELLATION,
};
pub use context::WorldContext;
pub use debug::{DebugGeometryExporter, DebugWireframe, FaceIter, FaceLoop};
pub use error::{Error, Result};
pub use geometry::{Aabb, Geometry, ShapeKind, ShapeTag};
pub use handle::{BodyHandle, RawHandle, ShapeHandle, WorldHandle};
pub use host::HostObject;
pub use shape::{Shape, ShapeDesc, ShapeRegistry};
pub use transform::{euler_degrees_to_quat, validate_scale, ShapeOffset, Transform};
pub use world::World;

// Re-export for convenience
pub use glam;
pub use rapier3d;

#[cfg(feature = "wasm")]
pub use wasm::WasmWorldContext;
