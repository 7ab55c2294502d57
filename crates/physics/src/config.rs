//! Physics core configuration
//!
//! Loaded from TOML. Every field has a default, so an empty document is a
//! valid configuration:
//!
//! ```toml
//! max_face_vertices = 64
//! gravity = [0.0, -9.81, 0.0]
//!
//! [tessellation]
//! sphere_stacks = 8
//! sphere_slices = 12
//! cylinder_segments = 16
//! ```

use crate::error::{Error, Result};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default upper bound on vertices in one exported face
pub const DEFAULT_MAX_FACE_VERTICES: usize = 64;

/// Upper bound on each tessellation count
pub const MAX_TESSELLATION: u32 = 1024;

/// Top-level configuration for a [`WorldContext`](crate::WorldContext)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Largest face the debug exporter will hand out
    pub max_face_vertices: usize,
    /// Gravity assigned to newly created worlds
    pub gravity: [f32; 3],
    /// Tessellation density for curved shapes
    pub tessellation: TessellationConfig,
}

/// How finely curved shapes are turned into polygons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TessellationConfig {
    /// Latitude bands of a sphere (pole to pole)
    pub sphere_stacks: u32,
    /// Longitude segments of a sphere
    pub sphere_slices: u32,
    /// Segments around a cylinder; also the vertex count of each cap
    pub cylinder_segments: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            max_face_vertices: DEFAULT_MAX_FACE_VERTICES,
            gravity: [0.0, -9.81, 0.0],
            tessellation: TessellationConfig::default(),
        }
    }
}

impl Default for TessellationConfig {
    fn default() -> Self {
        Self {
            sphere_stacks: 8,
            sphere_slices: 12,
            cylinder_segments: 16,
        }
    }
}

impl PhysicsConfig {
    /// Parse and validate a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: PhysicsConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!("Loaded physics config from {}", path.display());
        Ok(config)
    }

    /// Gravity as a vector
    pub fn gravity(&self) -> Vec3 {
        Vec3::from_array(self.gravity)
    }

    /// Check that every value is usable
    pub fn validate(&self) -> Result<()> {
        if self.max_face_vertices < 3 {
            return Err(Error::InvalidConfig(format!(
                "max_face_vertices must be at least 3, got {}",
                self.max_face_vertices
            )));
        }
        if !self.gravity.iter().all(|g| g.is_finite()) {
            return Err(Error::InvalidConfig("gravity must be finite".to_string()));
        }
        self.tessellation.validate()
    }
}

impl TessellationConfig {
    /// Check that every count is within `[minimum, MAX_TESSELLATION]`
    pub fn validate(&self) -> Result<()> {
        check_count("sphere_stacks", self.sphere_stacks, 2)?;
        check_count("sphere_slices", self.sphere_slices, 3)?;
        check_count("cylinder_segments", self.cylinder_segments, 3)
    }
}

fn check_count(name: &str, value: u32, min: u32) -> Result<()> {
    if (min..=MAX_TESSELLATION).contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!(
            "{} must be in {}..={}, got {}",
            name, min, MAX_TESSELLATION, value
        )))
    }
}
