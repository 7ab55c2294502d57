use crate::{
    BodyDesc, BodyHandle, Error, RawHandle, ShapeDesc, ShapeHandle, ShapeKind, Transform,
    WorldContext, WorldHandle,
};
use glam::Vec3;
use std::cell::RefCell;
use wasm_bindgen::prelude::*;

fn js_error(e: Error) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub struct WasmWorldContext {
    inner: RefCell<WorldContext>,
}

impl Default for WasmWorldContext {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl WasmWorldContext {
    /// Create a context with default configuration
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: RefCell::new(WorldContext::default()),
        }
    }

    /// Create a context from a TOML configuration document
    #[wasm_bindgen(js_name = fromConfig)]
    pub fn from_config(toml: &str) -> Result<WasmWorldContext, JsValue> {
        let config = crate::PhysicsConfig::from_toml_str(toml).map_err(js_error)?;
        Ok(Self {
            inner: RefCell::new(WorldContext::new(config)),
        })
    }

    /// Create a world
    ///
    /// # Returns
    /// World ID
    #[wasm_bindgen(js_name = createWorld)]
    pub fn create_world(&self) -> u64 {
        self.inner.borrow_mut().create_world().to_raw()
    }

    /// Destroy a world and everything it owns
    #[wasm_bindgen(js_name = destroyWorld)]
    pub fn destroy_world(&self, world_id: u64) -> Result<(), JsValue> {
        self.inner
            .borrow_mut()
            .destroy_world(WorldHandle::from_raw(world_id))
            .map_err(js_error)
    }

    /// Create a body
    ///
    /// # Arguments
    /// * `world_id` - World owned by the body, or `undefined` for a proxy
    /// * `parent_id` - Parent body, or `undefined` for a root
    ///
    /// # Returns
    /// Body ID
    #[wasm_bindgen(js_name = createBody)]
    pub fn create_body(
        &self,
        world_id: Option<u64>,
        parent_id: Option<u64>,
    ) -> Result<u64, JsValue> {
        let desc = BodyDesc {
            world: world_id.map(WorldHandle::from_raw),
            parent: parent_id.map(BodyHandle::from_raw),
            ..Default::default()
        };
        let handle = self.inner.borrow_mut().create_body(desc).map_err(js_error)?;
        Ok(handle.to_raw())
    }

    /// Destroy a body and release its shape
    #[wasm_bindgen(js_name = destroyBody)]
    pub fn destroy_body(&self, body_id: u64) -> Result<(), JsValue> {
        self.inner
            .borrow_mut()
            .destroy_body(BodyHandle::from_raw(body_id))
            .map_err(js_error)
    }

    /// Attach a body to a parent; pass `undefined` to detach
    #[wasm_bindgen(js_name = setParent)]
    pub fn set_parent(&self, body_id: u64, parent_id: Option<u64>) -> Result<(), JsValue> {
        self.inner
            .borrow_mut()
            .set_parent(
                BodyHandle::from_raw(body_id),
                parent_id.map(BodyHandle::from_raw),
            )
            .map_err(js_error)
    }

    /// Give a body a box shape description (full edge lengths)
    #[wasm_bindgen(js_name = setBoxShape)]
    pub fn set_box_shape(
        &self,
        body_id: u64,
        width: f32,
        height: f32,
        depth: f32,
    ) -> Result<(), JsValue> {
        self.set_shape_desc(
            body_id,
            ShapeDesc::new(ShapeKind::Box {
                size: Vec3::new(width, height, depth),
            }),
        )
    }

    /// Give a body a sphere shape description
    #[wasm_bindgen(js_name = setSphereShape)]
    pub fn set_sphere_shape(&self, body_id: u64, radius: f32) -> Result<(), JsValue> {
        self.set_shape_desc(body_id, ShapeDesc::new(ShapeKind::Sphere { radius }))
    }

    /// Give a body a Y-axis cylinder shape description
    #[wasm_bindgen(js_name = setCylinderShape)]
    pub fn set_cylinder_shape(
        &self,
        body_id: u64,
        radius: f32,
        height: f32,
    ) -> Result<(), JsValue> {
        self.set_shape_desc(body_id, ShapeDesc::new(ShapeKind::Cylinder { radius, height }))
    }

    /// Push a host transform
    ///
    /// # Arguments
    /// * `pos_x`, `pos_y`, `pos_z` - Position
    /// * `rot_x`, `rot_y`, `rot_z` - Euler angles in degrees
    /// * `scale_x`, `scale_y`, `scale_z` - Scale
    #[allow(clippy::too_many_arguments)]
    #[wasm_bindgen(js_name = setTransform)]
    pub fn set_transform(
        &self,
        body_id: u64,
        pos_x: f32,
        pos_y: f32,
        pos_z: f32,
        rot_x: f32,
        rot_y: f32,
        rot_z: f32,
        scale_x: f32,
        scale_y: f32,
        scale_z: f32,
    ) -> Result<(), JsValue> {
        let transform = Transform {
            position: Vec3::new(pos_x, pos_y, pos_z),
            rotation: Vec3::new(rot_x, rot_y, rot_z),
            scale: Vec3::new(scale_x, scale_y, scale_z),
        };
        self.inner
            .borrow_mut()
            .set_transform(BodyHandle::from_raw(body_id), transform)
            .map_err(js_error)
    }

    /// Shape of a body, created on first use
    ///
    /// # Returns
    /// Shape ID
    #[wasm_bindgen(js_name = createShape)]
    pub fn create_shape(&self, body_id: u64) -> Result<u64, JsValue> {
        let shape = self
            .inner
            .borrow_mut()
            .get_or_create_shape(BodyHandle::from_raw(body_id))
            .map_err(js_error)?;
        Ok(shape.to_raw())
    }

    /// Re-apply the body's effective scale to its shape
    #[wasm_bindgen(js_name = updateScale)]
    pub fn update_scale(&self, body_id: u64) -> Result<(), JsValue> {
        self.inner
            .borrow_mut()
            .update_scale(BodyHandle::from_raw(body_id))
            .map_err(js_error)
    }

    /// Destroy a shape
    #[wasm_bindgen(js_name = destroyShape)]
    pub fn destroy_shape(&self, shape_id: u64) {
        self.inner
            .borrow_mut()
            .destroy_shape(ShapeHandle::from_raw(shape_id));
    }

    /// Face vertices of a shape, flattened
    ///
    /// # Returns
    /// Array [x0, y0, z0, x1, ...]; split with `faceSizes`
    #[wasm_bindgen(js_name = enumerateFaces)]
    pub fn enumerate_faces(&self, shape_id: u64) -> Result<Vec<f32>, JsValue> {
        let ctx = self.inner.borrow();
        let faces = ctx
            .enumerate_faces(ShapeHandle::from_raw(shape_id))
            .map_err(js_error)?;
        Ok(faces
            .flat_map(|face| face.vertices().to_vec())
            .flat_map(|v| v.to_array())
            .collect())
    }

    /// Vertex count of each face, in `enumerateFaces` order
    #[wasm_bindgen(js_name = faceSizes)]
    pub fn face_sizes(&self, shape_id: u64) -> Result<Vec<u32>, JsValue> {
        let ctx = self.inner.borrow();
        let faces = ctx
            .enumerate_faces(ShapeHandle::from_raw(shape_id))
            .map_err(js_error)?;
        Ok(faces.map(|face| face.len() as u32).collect())
    }
}

impl WasmWorldContext {
    fn set_shape_desc(&self, body_id: u64, desc: ShapeDesc) -> Result<(), JsValue> {
        self.inner
            .borrow_mut()
            .set_shape_desc(BodyHandle::from_raw(body_id), desc)
            .map_err(js_error)
    }
}
