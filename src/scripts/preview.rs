//! Single-model preview scene

use rand::RngCore;

use scenescript_core::{Scene, SceneError};

use super::SceneScript;

/// Loads the building mask and nothing else
pub struct Preview;

impl SceneScript for Preview {
    fn name(&self) -> &'static str {
        "preview"
    }

    fn run(&self, scene: &mut Scene, _rng: &mut dyn RngCore) -> Result<(), SceneError> {
        scene.create_model_from_file("models/BUILDINGS/mask.obj", "models/BUILDINGS", "materials/BUILDINGS/")?;
        Ok(())
    }
}
