//! Per-face material data and the material name registry

use std::collections::HashMap;

use scenescript_math::Vec2;
use serde::{Serialize, Deserialize};

/// Index of a material in the scene's material table
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaterialId(pub u32);

impl MaterialId {
    /// No material assigned; the renderer falls back to the model's own
    pub const UNSPECIFIED: Self = Self(u32::MAX);
}

impl Default for MaterialId {
    fn default() -> Self {
        Self::UNSPECIFIED
    }
}

/// Material tuning for one face
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FaceData {
    pub material_id: MaterialId,
    pub saturation: f32,
    pub contrast: f32,
    /// Texture-space offset of this face
    pub uv_offset: Vec2,
}

impl Default for FaceData {
    fn default() -> Self {
        Self {
            material_id: MaterialId::UNSPECIFIED,
            saturation: 1.0,
            contrast: 1.0,
            uv_offset: Vec2::ZERO,
        }
    }
}

impl FaceData {
    /// Face data with a material, saturation, contrast and UV offset
    pub fn new(material_id: MaterialId, saturation: f32, contrast: f32, uv_offset: Vec2) -> Self {
        Self {
            material_id,
            saturation,
            contrast,
            uv_offset,
        }
    }
}

/// Material names registered by loaded assets, in registration order
#[derive(Debug, Default, Clone)]
pub(crate) struct MaterialRegistry {
    ids: HashMap<String, MaterialId>,
    names: Vec<String>,
}

impl MaterialRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a material name, returning its id
    ///
    /// Registering a name twice returns the id it already has.
    pub fn register(&mut self, name: &str) -> MaterialId {
        if let Some(id) = self.ids.get(name) {
            return *id;
        }
        let id = MaterialId(self.names.len() as u32);
        self.ids.insert(name.to_string(), id);
        self.names.push(name.to_string());
        id
    }

    /// Look up a material by name
    pub fn get(&self, name: &str) -> Option<MaterialId> {
        self.ids.get(name).copied()
    }

    /// Registered names, indexed by id
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_data_default() {
        let face = FaceData::default();
        assert_eq!(face.material_id, MaterialId::UNSPECIFIED);
        assert_eq!(face.saturation, 1.0);
        assert_eq!(face.contrast, 1.0);
        assert_eq!(face.uv_offset, Vec2::ZERO);
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut registry = MaterialRegistry::new();
        let brick = registry.register("graybrick");
        let wood = registry.register("wood");
        assert_ne!(brick, wood);
        assert_eq!(registry.register("graybrick"), brick);
        assert_eq!(registry.names(), ["graybrick", "wood"]);
    }

    #[test]
    fn test_lookup() {
        let mut registry = MaterialRegistry::new();
        let id = registry.register("doors");
        assert_eq!(registry.get("doors"), Some(id));
        assert_eq!(registry.get("missing"), None);
        assert_eq!(registry.names()[id.0 as usize], "doors");
    }
}
