use crate::handle::{BodyHandle, ShapeHandle, WorldHandle};
use crate::shape::ShapeDesc;
use crate::transform::Transform;
use glam::{Quat, Vec3};

/// Lifecycle of the shape attached to a body
///
/// `Unbound` until the shape is first requested, `Created` while the shape
/// is alive, `Destroyed` once it has been released. No shape operation is
/// valid on a `Destroyed` body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShapeState {
    #[default]
    Unbound,
    Created(ShapeHandle),
    Destroyed,
}

impl ShapeState {
    pub fn handle(&self) -> Option<ShapeHandle> {
        match self {
            ShapeState::Created(handle) => Some(*handle),
            _ => None,
        }
    }
}

/// Parameters for creating a body
#[derive(Debug, Clone, Default)]
pub struct BodyDesc {
    /// World owned by this body; `None` makes it a proxy that delegates to
    /// the nearest ancestor with a world
    pub world: Option<WorldHandle>,
    pub parent: Option<BodyHandle>,
    pub transform: Transform,
    pub shape: Option<ShapeDesc>,
    /// Mass used to seed the force accumulator with gravity; zero for
    /// static bodies
    pub mass: f32,
}

impl BodyDesc {
    /// A body that owns `world`
    pub fn rigid(world: WorldHandle) -> Self {
        Self {
            world: Some(world),
            ..Default::default()
        }
    }

    /// A child proxy that delegates world ownership to `parent`
    pub fn proxy(parent: BodyHandle) -> Self {
        Self {
            parent: Some(parent),
            ..Default::default()
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_shape(mut self, shape: ShapeDesc) -> Self {
        self.shape = Some(shape);
        self
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }
}

/// External force and torque gathered for the next step
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ForceAccumulator {
    pub force: Vec3,
    pub torque: Vec3,
}

impl ForceAccumulator {
    /// Start a step with the weight of `mass` under `gravity` and no torque
    pub fn reset(&mut self, gravity: Vec3, mass: f32) {
        self.force = gravity * mass;
        self.torque = Vec3::ZERO;
    }

    pub fn add_force(&mut self, force: Vec3) {
        self.force += force;
    }

    pub fn add_torque(&mut self, torque: Vec3) {
        self.torque += torque;
    }
}

/// Two most recent simulated poses of a body
///
/// Rendering blends between them using the world's interpolation parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseHistory {
    previous: (Vec3, Quat),
    current: (Vec3, Quat),
}

impl PoseHistory {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self {
            previous: (position, rotation),
            current: (position, rotation),
        }
    }

    /// Push a new pose, shifting the current one into the previous slot
    ///
    /// The new rotation is flipped into the same hemisphere as the old one so
    /// that interpolation takes the short path.
    pub fn record(&mut self, position: Vec3, rotation: Quat) {
        self.previous = self.current;
        let rotation = if self.previous.1.dot(rotation) < 0.0 {
            -rotation
        } else {
            rotation
        };
        self.current = (position, rotation);
    }

    /// Blend between previous (`t = 0`) and current (`t = 1`) pose
    pub fn interpolate(&self, t: f32) -> (Vec3, Quat) {
        let position = self.previous.0.lerp(self.current.0, t);
        let rotation = self.previous.1.slerp(self.current.1, t);
        (position, rotation)
    }

    pub fn current(&self) -> (Vec3, Quat) {
        self.current
    }
}

/// A rigid body, or a proxy that delegates to its nearest owning ancestor
#[derive(Debug, Clone)]
pub struct Body {
    pub(crate) world: Option<WorldHandle>,
    pub(crate) parent: Option<BodyHandle>,
    pub(crate) transform: Transform,
    pub(crate) shape_desc: Option<ShapeDesc>,
    pub(crate) shape: ShapeState,
    pub(crate) poses: PoseHistory,
    pub(crate) sleeping: bool,
    pub(crate) mass: f32,
    pub(crate) forces: ForceAccumulator,
}

impl Body {
    pub(crate) fn new(desc: BodyDesc) -> Self {
        let poses = PoseHistory::new(desc.transform.position, desc.transform.rotation_quat());
        Self {
            world: desc.world,
            parent: desc.parent,
            transform: desc.transform,
            shape_desc: desc.shape,
            shape: ShapeState::Unbound,
            poses,
            sleeping: false,
            mass: desc.mass,
            forces: ForceAccumulator::default(),
        }
    }

    /// World this body owns directly, if any
    pub fn world(&self) -> Option<WorldHandle> {
        self.world
    }

    pub fn parent(&self) -> Option<BodyHandle> {
        self.parent
    }

    /// Host transform last pushed for this body
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn shape_desc(&self) -> Option<&ShapeDesc> {
        self.shape_desc.as_ref()
    }

    pub fn shape_state(&self) -> ShapeState {
        self.shape
    }

    pub fn poses(&self) -> &PoseHistory {
        &self.poses
    }

    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn forces(&self) -> &ForceAccumulator {
        &self.forces
    }
}
