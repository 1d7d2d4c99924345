//! Per-frame update transaction
//!
//! A [`FrameUpdate`] ties property writes to the keyframe commit that makes
//! them visible. [`FrameUpdate::edit`] mutates and commits in one call;
//! writes made through [`FrameUpdate::model_mut`] or
//! [`FrameUpdate::world_mut`] stay pending until a commit covering the
//! written property group is made. [`FrameUpdate::finish`] fails if any
//! group is still pending.

use crate::model::{Model, ModelKey, PointLightComponent};
use crate::{
    AsInstanceData, FaceData, FaceSelection, KeyframeFlags, Scene, SceneError, Transform, WorldProperties,
};

/// Model properties as of the last commit in this update
///
/// Taken on the first write to a model; each commit refreshes the groups it covers.
struct Snapshot {
    key: ModelKey,
    transform: Transform,
    visibility: bool,
    faces: Vec<FaceData>,
    point_light: Option<PointLightComponent>,
    as_instance: AsInstanceData,
}

impl Snapshot {
    fn take(key: ModelKey, model: &Model) -> Self {
        Self {
            key,
            transform: model.transform,
            visibility: model.visibility,
            faces: model.faces().to_vec(),
            point_light: model.point_light,
            as_instance: model.as_instance_data,
        }
    }

    /// Groups whose current value differs from the snapshot
    fn uncommitted(&self, model: &Model) -> KeyframeFlags {
        let mut flags = KeyframeFlags::empty();
        if model.transform != self.transform {
            flags |= KeyframeFlags::POS_ROT_SCALE;
        }
        if model.visibility != self.visibility {
            flags |= KeyframeFlags::VISIBILITY;
        }
        if model.faces() != self.faces.as_slice() {
            flags |= KeyframeFlags::FACE_MATERIALS;
        }
        if model.point_light != self.point_light {
            flags |= KeyframeFlags::POINT_LIGHT;
        }
        if model.as_instance_data != self.as_instance {
            flags |= KeyframeFlags::AS_INSTANCE;
        }
        flags
    }

    fn committed(&mut self, model: &Model, flags: KeyframeFlags, faces: &[u32]) {
        if flags.contains(KeyframeFlags::POS_ROT_SCALE) {
            self.transform = model.transform;
        }
        if flags.contains(KeyframeFlags::VISIBILITY) {
            self.visibility = model.visibility;
        }
        if flags.contains(KeyframeFlags::FACE_MATERIALS) {
            for id in faces {
                if let (Some(kept), Some(face)) = (self.faces.get_mut(*id as usize), model.faces().get(*id as usize)) {
                    *kept = *face;
                }
            }
        }
        if flags.contains(KeyframeFlags::POINT_LIGHT) {
            self.point_light = model.point_light;
        }
        if flags.contains(KeyframeFlags::AS_INSTANCE) {
            self.as_instance = model.as_instance_data;
        }
    }
}

/// Open set of writes and commits for one frame
pub struct FrameUpdate<'a> {
    scene: &'a mut Scene,
    frame: u32,
    /// Models written in this update
    written: Vec<Snapshot>,
    world_pending: bool,
    commits: usize,
}

impl<'a> FrameUpdate<'a> {
    pub(crate) fn new(scene: &'a mut Scene, frame: u32) -> Self {
        Self {
            scene,
            frame,
            written: Vec::new(),
            world_pending: false,
            commits: 0,
        }
    }

    /// Read a model
    pub fn model(&self, key: ModelKey) -> Result<&Model, SceneError> {
        self.scene.model(key)
    }

    /// Write to a model; changed groups stay pending until committed
    pub fn model_mut(&mut self, key: ModelKey) -> Result<&mut Model, SceneError> {
        let model = self.scene.model_mut(key)?;
        if !self.written.iter().any(|s| s.key == key) {
            self.written.push(Snapshot::take(key, model));
        }
        Ok(model)
    }

    /// Write to the world; the write is pending until the world is committed
    pub fn world_mut(&mut self) -> &mut WorldProperties {
        self.world_pending = true;
        &mut self.scene.world
    }

    /// Commit the groups in `flags` for a model at this frame
    pub fn commit(&mut self, key: ModelKey, flags: KeyframeFlags, faces: &FaceSelection) -> Result<(), SceneError> {
        self.scene.insert_keyframe(key, self.frame, flags, faces)?;
        if let Some(snapshot) = self.written.iter_mut().find(|s| s.key == key) {
            let model = self.scene.model(key)?;
            snapshot.committed(model, flags, &faces.resolve(model.number_of_faces()));
        }
        self.commits += 1;
        Ok(())
    }

    /// Commit the world at this frame
    pub fn commit_world(&mut self) -> Result<(), SceneError> {
        self.scene.insert_world_keyframe(self.frame)?;
        self.world_pending = false;
        self.commits += 1;
        Ok(())
    }

    /// Mutate a model, then commit `flags` for it
    pub fn edit<F>(&mut self, key: ModelKey, flags: KeyframeFlags, faces: &FaceSelection, f: F) -> Result<(), SceneError>
    where
        F: FnOnce(&mut Model),
    {
        f(self.model_mut(key)?);
        self.commit(key, flags, faces)
    }

    /// Mutate the world, then commit it
    pub fn edit_world<F>(&mut self, f: F) -> Result<(), SceneError>
    where
        F: FnOnce(&mut WorldProperties),
    {
        f(self.world_mut());
        self.commit_world()
    }

    /// Check if any write is still waiting for its commit
    pub fn has_pending(&self) -> bool {
        self.world_pending || !self.pending().is_empty()
    }

    /// Written models with the groups no commit has covered yet
    fn pending(&self) -> Vec<(&str, KeyframeFlags)> {
        self.written
            .iter()
            .filter_map(|snapshot| {
                let model = self.scene.model(snapshot.key).ok()?;
                let flags = snapshot.uncommitted(model);
                (!flags.is_empty()).then_some((model.name.as_str(), flags))
            })
            .collect()
    }

    fn pending_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .pending()
            .into_iter()
            .map(|(name, flags)| {
                let groups: Vec<&str> = flags.iter_names().map(|(group, _)| group).collect();
                format!("{} ({})", name, groups.join(" | "))
            })
            .collect();
        if self.world_pending {
            names.push("world".to_string());
        }
        names
    }

    /// Close the update, returning the number of commits made
    ///
    /// # Errors
    ///
    /// [`SceneError::UncommittedWrites`] if a written property group was never committed.
    pub fn finish(mut self) -> Result<usize, SceneError> {
        if self.has_pending() {
            let targets = self.pending_names();
            self.written.clear();
            self.world_pending = false;
            return Err(SceneError::UncommittedWrites {
                frame: self.frame,
                targets,
            });
        }
        Ok(self.commits)
    }
}

impl Drop for FrameUpdate<'_> {
    fn drop(&mut self) {
        if self.has_pending() {
            log::warn!(
                "Frame {} dropped with uncommitted writes to: {}",
                self.frame,
                self.pending_names().join(", ")
            );
        }
    }
}
