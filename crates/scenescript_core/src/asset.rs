//! Model asset sources
//!
//! Geometry and material files are read by the engine, not by scripts. An
//! [`AssetSource`] answers the two questions the scene needs when a script
//! creates a model: how many faces it has and which material names its
//! material folder provides.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::SceneError;

/// Facts about a model asset needed to create a [`crate::Model`]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModelAsset {
    /// Triangle count of the geometry
    pub face_count: u32,
    /// Material names available to the model's faces
    pub materials: Vec<String>,
}

/// Resolves model paths to [`ModelAsset`]s
pub trait AssetSource {
    /// Describe the model at `obj_path`
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::AssetNotFound`] if the source has no such asset.
    fn load_model(
        &self,
        obj_path: &Path,
        mtl_dir: &Path,
        material_dir: &Path,
    ) -> Result<ModelAsset, SceneError>;
}

/// Asset source backed by a face-count manifest
///
/// Paths listed in the manifest use their own face count. Unlisted paths use
/// the default count, or fail when the manifest is strict. Every model gets
/// the same material list.
#[derive(Clone, Debug, Default)]
pub struct ManifestAssets {
    face_counts: HashMap<PathBuf, u32>,
    default_face_count: Option<u32>,
    materials: Vec<String>,
}

impl ManifestAssets {
    /// Manifest where unlisted models have `default_face_count` faces
    pub fn new(default_face_count: u32) -> Self {
        Self {
            default_face_count: Some(default_face_count),
            ..Self::default()
        }
    }

    /// Manifest that only knows the models listed with [`Self::with_model`]
    pub fn strict() -> Self {
        Self::default()
    }

    /// Builder: list a model with its face count
    pub fn with_model(mut self, obj_path: impl Into<PathBuf>, face_count: u32) -> Self {
        self.face_counts.insert(obj_path.into(), face_count);
        self
    }

    /// Builder: material names provided to every model
    pub fn with_materials(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.materials.extend(names.into_iter().map(Into::into));
        self
    }
}

impl AssetSource for ManifestAssets {
    fn load_model(
        &self,
        obj_path: &Path,
        _mtl_dir: &Path,
        _material_dir: &Path,
    ) -> Result<ModelAsset, SceneError> {
        let face_count = self
            .face_counts
            .get(obj_path)
            .copied()
            .or(self.default_face_count)
            .ok_or_else(|| SceneError::AssetNotFound(obj_path.to_path_buf()))?;

        Ok(ModelAsset {
            face_count,
            materials: self.materials.clone(),
        })
    }
}
