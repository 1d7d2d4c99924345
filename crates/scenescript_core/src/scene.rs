//! The scene: models, world state, materials and the commit journal
//!
//! Scripts create models through the scene, mutate them, and commit
//! keyframes. Each commit is validated as a whole before anything is
//! recorded, then appended to the journal.
//!
//! # Example
//! ```ignore
//! let mut scene = Scene::new(300, ManifestAssets::new(12));
//! let cube = scene.create_model_from_file("models/cube.obj", "models/", "materials/")?;
//! scene.model_mut(cube)?.transform.scale = Vec3::new(0.5, 1.0, 3.0);
//! scene.insert_keyframe(cube, 0, KeyframeFlags::POS_ROT_SCALE, &FaceSelection::First)?;
//! ```

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use scenescript_math::Rgba;
use serde::{Serialize, Deserialize};
use slotmap::SlotMap;

use crate::asset::AssetSource;
use crate::frame::FrameUpdate;
use crate::model::{Model, ModelKey, ModelKeyframes, PointLightComponent};
use crate::face::MaterialRegistry;
use crate::{FaceSelection, KeyframeFlags, KeyframeTrack, MaterialId, WorldProperties};

/// What a commit was addressed to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommitTarget {
    World,
    Model(ModelKey),
}

/// One accepted keyframe commit
#[derive(Clone, Debug, PartialEq)]
pub struct CommitRecord {
    pub frame: u32,
    pub target: CommitTarget,
    pub flags: KeyframeFlags,
    /// Resolved face ids; empty unless `flags` has `FACE_MATERIALS`
    pub faces: Vec<u32>,
}

/// Commit counts, for logging
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SceneStats {
    pub models: usize,
    pub point_lights: usize,
    pub commits: usize,
    pub world_keyframes: usize,
    pub model_keyframes: usize,
}

/// Property groups that changed when the scene moved to a frame
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameChanges {
    pub world: bool,
    /// Models with at least one changed group
    ///
    /// `AS_INSTANCE` is also reported when the model or its parent moved at
    /// this frame, since generated instances follow both.
    pub models: Vec<(ModelKey, KeyframeFlags)>,
}

/// Unified error type for scene operations
#[derive(Debug)]
pub enum SceneError {
    /// The asset source has no model at this path
    AssetNotFound(PathBuf),
    /// Key does not refer to a model in this scene
    UnknownModel(ModelKey),
    /// No loaded asset registered this material name
    UnknownMaterial(String),
    /// Commit frame is not inside the scene
    FrameOutOfRange { frame: u32, length: u32 },
    /// Face id does not exist on the model
    FaceOutOfRange { model: String, face: u32, face_count: u32 },
    /// Flags need geometry but the model has no faces
    NoGeometry { model: String, flags: KeyframeFlags },
    /// `POINT_LIGHT` committed on a model that is not a light
    NotAPointLight(String),
    /// `WORLD` committed on a model
    WorldOnModel(String),
    /// A frame update ended with writes that were never committed
    UncommittedWrites { frame: u32, targets: Vec<String> },
    /// IO error (file not found, permission denied, etc.)
    Io(io::Error),
    /// Parse error (invalid RON syntax)
    Parse(ron::error::SpannedError),
    /// Serialization error
    Serialize(ron::Error),
}

impl From<io::Error> for SceneError {
    fn from(e: io::Error) -> Self {
        SceneError::Io(e)
    }
}

impl From<ron::error::SpannedError> for SceneError {
    fn from(e: ron::error::SpannedError) -> Self {
        SceneError::Parse(e)
    }
}

impl From<ron::Error> for SceneError {
    fn from(e: ron::Error) -> Self {
        SceneError::Serialize(e)
    }
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneError::AssetNotFound(path) => write!(f, "Asset not found: {}", path.display()),
            SceneError::UnknownModel(key) => write!(f, "Unknown model: {:?}", key),
            SceneError::UnknownMaterial(name) => write!(f, "Unknown material: '{}'", name),
            SceneError::FrameOutOfRange { frame, length } => {
                write!(f, "Frame {} outside scene of length {}", frame, length)
            }
            SceneError::FaceOutOfRange { model, face, face_count } => {
                write!(f, "Face {} does not exist on '{}' ({} faces)", face, model, face_count)
            }
            SceneError::NoGeometry { model, flags } => {
                write!(f, "Cannot keyframe {:?} on '{}': it has no faces", flags, model)
            }
            SceneError::NotAPointLight(model) => {
                write!(f, "Cannot keyframe point-light data on '{}': not a point light", model)
            }
            SceneError::WorldOnModel(model) => {
                write!(f, "Cannot keyframe world data on model '{}'", model)
            }
            SceneError::UncommittedWrites { frame, targets } => {
                write!(f, "Frame {} has uncommitted writes to: {}", frame, targets.join(", "))
            }
            SceneError::Io(e) => write!(f, "IO error: {}", e),
            SceneError::Parse(e) => write!(f, "Parse error: {}", e),
            SceneError::Serialize(e) => write!(f, "Serialize error: {}", e),
        }
    }
}

impl std::error::Error for SceneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SceneError::Io(e) => Some(e),
            SceneError::Parse(e) => Some(e),
            SceneError::Serialize(e) => Some(e),
            _ => None,
        }
    }
}

/// A scene being authored
pub struct Scene {
    /// Number of frames; valid commit frames are `0..length`
    length: u32,
    models: SlotMap<ModelKey, Model>,
    /// Current world state; committed with [`Scene::insert_world_keyframe`]
    pub world: WorldProperties,
    world_keyframes: KeyframeTrack<WorldProperties>,
    materials: MaterialRegistry,
    assets: Box<dyn AssetSource>,
    journal: Vec<CommitRecord>,
    light_count: usize,
}

impl Scene {
    /// Create an empty scene of `length` frames
    ///
    /// The default world is seeded as the frame-0 world keyframe.
    pub fn new(length: u32, assets: impl AssetSource + 'static) -> Self {
        let world = WorldProperties::default();
        let mut world_keyframes = KeyframeTrack::new();
        world_keyframes.insert(0, world);
        Self {
            length,
            models: SlotMap::with_key(),
            world,
            world_keyframes,
            materials: MaterialRegistry::new(),
            assets: Box::new(assets),
            journal: Vec::new(),
            light_count: 0,
        }
    }

    /// Number of frames in the scene
    #[inline]
    pub fn length(&self) -> u32 {
        self.length
    }

    // --- Model creation ---

    /// Create a model from an `.obj` path, its `.mtl` folder and material folder
    ///
    /// Registers the asset's material names and seeds frame-0 keyframes.
    pub fn create_model_from_file(
        &mut self,
        obj_path: impl AsRef<Path>,
        mtl_dir: impl AsRef<Path>,
        material_dir: impl AsRef<Path>,
    ) -> Result<ModelKey, SceneError> {
        let obj_path = obj_path.as_ref();
        let asset = self.assets.load_model(obj_path, mtl_dir.as_ref(), material_dir.as_ref())?;
        for name in &asset.materials {
            self.materials.register(name);
        }

        let stem = obj_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "model".to_string());
        let name = self.unique_name(&stem);
        log::debug!("Created model '{}' from {} ({} faces)", name, obj_path.display(), asset.face_count);

        let model = Model::new(name, asset.face_count).with_source(obj_path);
        Ok(self.add_model(model))
    }

    /// Create a point light with the given radius and colour
    pub fn create_point_light(&mut self, radius: f32, color: Rgba) -> ModelKey {
        let name = format!("point_light_{}", self.light_count);
        self.light_count += 1;
        self.add_model(Model::new_point_light(name, PointLightComponent { radius, color }))
    }

    /// Add a model directly, seeding its frame-0 keyframes
    pub fn add_model(&mut self, mut model: Model) -> ModelKey {
        model.seed_baseline();
        self.models.insert(model)
    }

    fn unique_name(&self, stem: &str) -> String {
        let taken: HashSet<&str> = self.models.values().map(|m| m.name.as_str()).collect();
        if !taken.contains(stem) {
            return stem.to_string();
        }
        (1..)
            .map(|n| format!("{}_{}", stem, n))
            .find(|candidate| !taken.contains(candidate.as_str()))
            .unwrap_or_else(|| stem.to_string())
    }

    // --- Access ---

    /// Get a model by key
    pub fn model(&self, key: ModelKey) -> Result<&Model, SceneError> {
        self.models.get(key).ok_or(SceneError::UnknownModel(key))
    }

    /// Get a mutable model by key
    pub fn model_mut(&mut self, key: ModelKey) -> Result<&mut Model, SceneError> {
        self.models.get_mut(key).ok_or(SceneError::UnknownModel(key))
    }

    /// Find a model by name
    pub fn find(&self, name: &str) -> Option<(ModelKey, &Model)> {
        self.models.iter().find(|(_, m)| m.name == name)
    }

    /// Iterate over keys and models
    pub fn models(&self) -> impl Iterator<Item = (ModelKey, &Model)> {
        self.models.iter()
    }

    /// Number of models, point lights included
    #[inline]
    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    /// Mutable world state
    pub fn world_mut(&mut self) -> &mut WorldProperties {
        &mut self.world
    }

    /// Committed world keyframes
    pub fn world_keyframes(&self) -> &KeyframeTrack<WorldProperties> {
        &self.world_keyframes
    }

    /// Look up a material id by name
    pub fn material(&self, name: &str) -> Result<MaterialId, SceneError> {
        self.materials.get(name).ok_or_else(|| SceneError::UnknownMaterial(name.to_string()))
    }

    // --- Commits ---

    /// Open a frame update for `frame`
    pub fn begin_frame(&mut self, frame: u32) -> FrameUpdate<'_> {
        FrameUpdate::new(self, frame)
    }

    /// Commit the current value of the groups in `flags` for a model
    ///
    /// All checks run before anything is recorded, so a rejected commit
    /// leaves the scene unchanged.
    pub fn insert_keyframe(
        &mut self,
        key: ModelKey,
        frame: u32,
        flags: KeyframeFlags,
        faces: &FaceSelection,
    ) -> Result<(), SceneError> {
        self.check_frame(frame)?;

        let model = self.model(key)?;
        let faces = if flags.contains(KeyframeFlags::FACE_MATERIALS) {
            faces.resolve(model.number_of_faces())
        } else {
            Vec::new()
        };
        model.validate_commit(flags, &faces)?;
        if flags.contains(KeyframeFlags::AS_INSTANCE) {
            if let Some(parent) = model.as_instance_data.parent_object {
                if !self.models.contains_key(parent) {
                    return Err(SceneError::UnknownModel(parent));
                }
            }
        }

        let model = self.model_mut(key)?;
        model.record(frame, flags, &faces);
        log::trace!("Frame {}: keyframed {:?} on '{}'", frame, flags, model.name);

        self.journal.push(CommitRecord {
            frame,
            target: CommitTarget::Model(key),
            flags,
            faces,
        });
        Ok(())
    }

    /// Commit the current world state at `frame`
    pub fn insert_world_keyframe(&mut self, frame: u32) -> Result<(), SceneError> {
        self.check_frame(frame)?;
        self.world_keyframes.insert(frame, self.world);
        log::trace!("Frame {}: keyframed world", frame);

        self.journal.push(CommitRecord {
            frame,
            target: CommitTarget::World,
            flags: KeyframeFlags::WORLD,
            faces: Vec::new(),
        });
        Ok(())
    }

    fn check_frame(&self, frame: u32) -> Result<(), SceneError> {
        if frame >= self.length {
            return Err(SceneError::FrameOutOfRange {
                frame,
                length: self.length,
            });
        }
        Ok(())
    }

    /// Every accepted commit, in order
    pub fn journal(&self) -> &[CommitRecord] {
        &self.journal
    }

    /// Commit counts
    pub fn stats(&self) -> SceneStats {
        let world_keyframes = self
            .journal
            .iter()
            .filter(|c| c.target == CommitTarget::World)
            .count();
        SceneStats {
            models: self.models.len(),
            point_lights: self.models.values().filter(|m| m.is_point_light()).count(),
            commits: self.journal.len(),
            world_keyframes,
            model_keyframes: self.journal.len() - world_keyframes,
        }
    }

    // --- Playback ---

    /// Move every model and the world to the values held at `frame`
    pub fn apply_frame(&mut self, frame: u32) -> FrameChanges {
        let mut changes = FrameChanges::default();

        if let Some(world) = self.world_keyframes.sample(frame).copied() {
            if world != self.world {
                self.world = world;
                changes.world = true;
            }
        }

        let moving: HashSet<ModelKey> = self
            .models
            .iter()
            .filter(|(_, m)| m.keyframes().is_in_motion(frame))
            .map(|(k, _)| k)
            .collect();

        for (key, model) in self.models.iter_mut() {
            let mut changed = model.apply_frame(frame);
            let parent_moved = model
                .as_instance_data
                .parent_object
                .is_some_and(|parent| moving.contains(&parent));
            if model.as_instance_data.is_instanced()
                && (parent_moved || changed.contains(KeyframeFlags::POS_ROT_SCALE))
            {
                changed |= KeyframeFlags::AS_INSTANCE;
            }
            if !changed.is_empty() {
                changes.models.push((key, changed));
            }
        }

        changes
    }

    // --- Export ---

    /// Snapshot of every committed track
    pub fn recording(&self) -> Recording {
        Recording {
            length: self.length,
            materials: self.materials.names().to_vec(),
            world: self.world_keyframes.clone(),
            models: self
                .models
                .iter()
                .map(|(key, m)| ModelRecording {
                    key,
                    name: m.name.clone(),
                    source: m.source().map(Path::to_path_buf),
                    face_count: m.number_of_faces(),
                    keyframes: m.keyframes().clone(),
                })
                .collect(),
        }
    }
}

/// Keyframes of one model in a [`Recording`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelRecording {
    /// Key the model had in the scene; instance data parents refer to it
    pub key: ModelKey,
    pub name: String,
    #[serde(default)]
    pub source: Option<PathBuf>,
    pub face_count: u32,
    pub keyframes: ModelKeyframes,
}

/// Serializable export of a scene's keyframes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recording {
    pub length: u32,
    /// Material names, indexed by [`MaterialId`]
    pub materials: Vec<String>,
    pub world: KeyframeTrack<WorldProperties>,
    pub models: Vec<ModelRecording>,
}

impl Recording {
    /// Load a recording from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SceneError> {
        let contents = fs::read_to_string(path)?;
        let recording = ron::from_str(&contents)?;
        Ok(recording)
    }

    /// Save the recording to a RON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SceneError> {
        let pretty = ron::ser::PrettyConfig::new()
            .struct_names(true)
            .enumerate_arrays(false);
        let contents = ron::ser::to_string_pretty(self, pretty)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Find a model's recording by name
    pub fn model(&self, name: &str) -> Option<&ModelRecording> {
        self.models.iter().find(|m| m.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FaceData, ManifestAssets};
    use scenescript_math::{Vec2, Vec3};

    fn test_scene() -> Scene {
        let assets = ManifestAssets::new(12)
            .with_model("models/door.obj", 10)
            .with_materials(["graybrick", "doors"]);
        Scene::new(300, assets)
    }

    #[test]
    fn test_create_model_registers_materials() {
        let mut scene = test_scene();
        let door = scene.create_model_from_file("models/door.obj", "models/", "materials/").unwrap();

        assert_eq!(scene.model(door).unwrap().number_of_faces(), 10);
        assert_eq!(scene.model(door).unwrap().name, "door");
        assert!(scene.material("doors").is_ok());
        assert!(matches!(scene.material("marble"), Err(SceneError::UnknownMaterial(_))));
    }

    #[test]
    fn test_duplicate_stems_get_unique_names() {
        let mut scene = test_scene();
        let a = scene.create_model_from_file("models/mask.obj", "m/", "t/").unwrap();
        let b = scene.create_model_from_file("models/mask.obj", "m/", "t/").unwrap();
        let c = scene.create_model_from_file("other/mask.obj", "m/", "t/").unwrap();

        assert_eq!(scene.model(a).unwrap().name, "mask");
        assert_eq!(scene.model(b).unwrap().name, "mask_1");
        assert_eq!(scene.model(c).unwrap().name, "mask_2");
        assert_eq!(scene.find("mask_1").map(|(k, _)| k), Some(b));
    }

    #[test]
    fn test_missing_asset() {
        let mut scene = Scene::new(10, ManifestAssets::strict());
        let result = scene.create_model_from_file("models/none.obj", "m/", "t/");
        assert!(matches!(result, Err(SceneError::AssetNotFound(_))));
        assert_eq!(scene.model_count(), 0);
    }

    #[test]
    fn test_insert_keyframe_journals() {
        let mut scene = test_scene();
        let cube = scene.create_model_from_file("models/cube.obj", "m/", "t/").unwrap();
        scene.model_mut(cube).unwrap().transform.scale = Vec3::new(0.5, 1.0, 3.0);

        scene.insert_keyframe(cube, 0, KeyframeFlags::POS_ROT_SCALE, &FaceSelection::First).unwrap();

        assert_eq!(scene.journal().len(), 1);
        let record = &scene.journal()[0];
        assert_eq!(record.target, CommitTarget::Model(cube));
        assert!(record.faces.is_empty());
        let keyed = scene.model(cube).unwrap().keyframes().transforms.get(0).unwrap();
        assert_eq!(keyed.scale, Vec3::new(0.5, 1.0, 3.0));
    }

    #[test]
    fn test_rejected_commit_changes_nothing() {
        let mut scene = test_scene();
        let door = scene.create_model_from_file("models/door.obj", "m/", "t/").unwrap();
        scene.model_mut(door).unwrap().transform.translation.y = 0.95;

        let flags = KeyframeFlags::POS_ROT_SCALE | KeyframeFlags::FACE_MATERIALS;
        let result = scene.insert_keyframe(door, 4, flags, &FaceSelection::subset([0, 2, 6, 10]));

        assert!(matches!(result, Err(SceneError::FaceOutOfRange { face: 10, .. })));
        assert!(scene.journal().is_empty());
        assert!(scene.model(door).unwrap().keyframes().transforms.get(4).is_none());
    }

    #[test]
    fn test_frame_out_of_range() {
        let mut scene = test_scene();
        let cube = scene.create_model_from_file("models/cube.obj", "m/", "t/").unwrap();
        let result = scene.insert_keyframe(cube, 300, KeyframeFlags::VISIBILITY, &FaceSelection::First);
        assert!(matches!(result, Err(SceneError::FrameOutOfRange { frame: 300, length: 300 })));
        assert!(scene.insert_world_keyframe(300).is_err());
    }

    #[test]
    fn test_unknown_parent_rejected() {
        let mut other = test_scene();
        let _ = other.create_model_from_file("a.obj", "m/", "t/").unwrap();
        let foreign = other.create_model_from_file("b.obj", "m/", "t/").unwrap();

        let mut scene = test_scene();
        let leaf = scene.create_model_from_file("leaf.obj", "m/", "t/").unwrap();
        scene.model_mut(leaf).unwrap().as_instance_data.parent_object = Some(foreign);

        let result = scene.insert_keyframe(leaf, 1, KeyframeFlags::AS_INSTANCE, &FaceSelection::First);
        assert!(matches!(result, Err(SceneError::UnknownModel(key)) if key == foreign));
        assert!(scene.journal().is_empty());
    }

    #[test]
    fn test_world_keyframe() {
        let mut scene = test_scene();
        scene.world.camera_position = Vec3::new(-23.0, 11.0, -23.0);
        scene.insert_world_keyframe(0).unwrap();
        scene.world.camera_position.y += 0.27;
        scene.insert_world_keyframe(3).unwrap();

        assert_eq!(scene.world_keyframes().len(), 2);
        assert_eq!(scene.world_keyframes().get(0).unwrap().camera_position.y, 11.0);
        assert_eq!(scene.stats().world_keyframes, 2);
    }

    #[test]
    fn test_apply_frame_holds_values() {
        let mut scene = test_scene();
        let cube = scene.create_model_from_file("cube.obj", "m/", "t/").unwrap();
        let graybrick = scene.material("graybrick").unwrap();

        {
            let model = scene.model_mut(cube).unwrap();
            model.visibility = false;
            model.faces_mut()[3] = FaceData::new(graybrick, 0.0, 4.0, Vec2::new(0.5, 0.5));
        }
        scene
            .insert_keyframe(cube, 10, KeyframeFlags::VISIBILITY | KeyframeFlags::FACE_MATERIALS, &FaceSelection::subset([3]))
            .unwrap();

        // Scrub back to the baseline
        let changes = scene.apply_frame(5);
        let model = scene.model(cube).unwrap();
        assert!(model.visibility);
        // Face 3 had no keyframe before frame 10, so it keeps its current value
        assert_eq!(model.faces()[3].contrast, 4.0);
        assert_eq!(changes.models, vec![(cube, KeyframeFlags::VISIBILITY)]);

        scene.apply_frame(200);
        assert!(!scene.model(cube).unwrap().visibility);
    }

    #[test]
    fn test_apply_frame_flags_instances_of_moving_parent() {
        let mut scene = test_scene();
        let mask = scene.create_model_from_file("mask.obj", "m/", "t/").unwrap();
        let leaf = scene.create_model_from_file("leaf.obj", "m/", "t/").unwrap();

        scene.model_mut(leaf).unwrap().as_instance_data.parent_object = Some(mask);
        scene.insert_keyframe(leaf, 0, KeyframeFlags::AS_INSTANCE, &FaceSelection::First).unwrap();
        scene.model_mut(mask).unwrap().transform.scale.x = 0.12;
        scene.insert_keyframe(mask, 7, KeyframeFlags::POS_ROT_SCALE, &FaceSelection::First).unwrap();

        scene.apply_frame(0);
        let changes = scene.apply_frame(7);
        let leaf_change = changes.models.iter().find(|(k, _)| *k == leaf).map(|(_, f)| *f);
        assert_eq!(leaf_change, Some(KeyframeFlags::AS_INSTANCE));
    }

    #[test]
    fn test_point_light_names() {
        let mut scene = test_scene();
        let a = scene.create_point_light(0.5, [1.0; 4]);
        let b = scene.create_point_light(0.5, [1.0; 4]);
        assert_eq!(scene.model(a).unwrap().name, "point_light_0");
        assert_eq!(scene.model(b).unwrap().name, "point_light_1");
        assert_eq!(scene.stats().point_lights, 2);
    }

    #[test]
    fn test_error_display() {
        let err = SceneError::FaceOutOfRange {
            model: "door".to_string(),
            face: 9,
            face_count: 8,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("door"));
        assert!(msg.contains("9"));

        let err = SceneError::UncommittedWrites {
            frame: 4,
            targets: vec!["wall".to_string(), "world".to_string()],
        };
        assert!(format!("{}", err).contains("wall, world"));
    }
}
