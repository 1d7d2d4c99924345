//! Models, point lights and their keyframe tracks
//!
//! A [`Model`] is the handle scripts mutate: transform, visibility, per-face
//! data and instance data. Point lights are models with no faces and a
//! [`PointLightComponent`]. Every committed keyframe is stored on the model
//! in its [`ModelKeyframes`].

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use scenescript_math::Rgba;
use serde::{Serialize, Deserialize};
use slotmap::new_key_type;

use crate::{AsInstanceData, FaceData, FaceSelection, KeyframeFlags, KeyframeTrack, SceneError, Transform};

new_key_type! {
    /// Key to a model in the scene
    ///
    /// Generational, so a key to a removed model never aliases a newer one.
    pub struct ModelKey;
}

/// Light emitted by a point-light model
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointLightComponent {
    /// Radius of the light's visible billboard
    pub radius: f32,
    /// Light colour; alpha is intensity
    pub color: Rgba,
}

impl Default for PointLightComponent {
    fn default() -> Self {
        Self {
            radius: 0.1,
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

/// Every keyframe committed for one model
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelKeyframes {
    pub transforms: KeyframeTrack<Transform>,
    /// Face id → track of that face's data; only faces ever committed appear
    pub face_data: BTreeMap<u32, KeyframeTrack<FaceData>>,
    pub point_light: KeyframeTrack<PointLightComponent>,
    pub as_instance: KeyframeTrack<AsInstanceData>,
    pub visibility: KeyframeTrack<bool>,
    /// Frames with a committed transform
    pub in_motion: BTreeSet<u32>,
}

impl ModelKeyframes {
    /// Face ids that have at least one face-data keyframe
    pub fn modified_faces(&self) -> impl Iterator<Item = u32> + '_ {
        self.face_data.keys().copied()
    }

    /// Whether a transform was committed at `frame`
    #[inline]
    pub fn is_in_motion(&self, frame: u32) -> bool {
        self.in_motion.contains(&frame)
    }
}

/// A model in the scene
#[derive(Clone, Debug)]
pub struct Model {
    /// Unique name within the scene (used in logs and errors)
    pub name: String,
    pub transform: Transform,
    pub visibility: bool,
    pub as_instance_data: AsInstanceData,
    /// Present only on point lights
    pub point_light: Option<PointLightComponent>,
    source: Option<PathBuf>,
    face_data: Vec<FaceData>,
    keyframes: ModelKeyframes,
}

impl Model {
    /// Create a model with `face_count` faces of default face data
    pub fn new(name: impl Into<String>, face_count: u32) -> Self {
        Self {
            name: name.into(),
            transform: Transform::identity(),
            visibility: true,
            as_instance_data: AsInstanceData::default(),
            point_light: None,
            source: None,
            face_data: vec![FaceData::default(); face_count as usize],
            keyframes: ModelKeyframes::default(),
        }
    }

    /// Create a face-less point light
    pub fn new_point_light(name: impl Into<String>, light: PointLightComponent) -> Self {
        let mut model = Self::new(name, 0);
        model.point_light = Some(light);
        model
    }

    /// Builder: record the file this model was created from
    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(path.into());
        self
    }

    /// File this model was created from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Number of faces (triangles) of the geometry
    #[inline]
    pub fn number_of_faces(&self) -> u32 {
        self.face_data.len() as u32
    }

    /// Ids of every face, in order
    pub fn all_faces(&self) -> Vec<u32> {
        (0..self.number_of_faces()).collect()
    }

    /// Check if the model has geometry (point lights do not)
    #[inline]
    pub fn has_geometry(&self) -> bool {
        !self.face_data.is_empty()
    }

    /// Check if the model is a point light
    #[inline]
    pub fn is_point_light(&self) -> bool {
        self.point_light.is_some()
    }

    /// Current face data
    pub fn faces(&self) -> &[FaceData] {
        &self.face_data
    }

    /// Mutable face data; the face count itself is fixed by the asset
    pub fn faces_mut(&mut self) -> &mut [FaceData] {
        &mut self.face_data
    }

    /// Assign `data` to every selected face
    ///
    /// Nothing is written if any selected face does not exist.
    pub fn set_faces(&mut self, data: FaceData, selection: &FaceSelection) -> Result<(), SceneError> {
        let ids = selection.resolve(self.number_of_faces());
        self.check_faces(&ids)?;
        for id in ids {
            self.face_data[id as usize] = data;
        }
        Ok(())
    }

    /// Committed keyframes
    pub fn keyframes(&self) -> &ModelKeyframes {
        &self.keyframes
    }

    fn check_faces(&self, ids: &[u32]) -> Result<(), SceneError> {
        let count = self.number_of_faces();
        match ids.iter().find(|id| **id >= count) {
            Some(face) => Err(SceneError::FaceOutOfRange {
                model: self.name.clone(),
                face: *face,
                face_count: count,
            }),
            None => Ok(()),
        }
    }

    /// Check that a commit of `flags` over `faces` is valid for this model
    ///
    /// Parent references in instance data are checked by the scene.
    pub(crate) fn validate_commit(&self, flags: KeyframeFlags, faces: &[u32]) -> Result<(), SceneError> {
        if flags.contains(KeyframeFlags::WORLD) {
            return Err(SceneError::WorldOnModel(self.name.clone()));
        }
        if flags.intersects(KeyframeFlags::FACE_MATERIALS | KeyframeFlags::AS_INSTANCE) && !self.has_geometry() {
            return Err(SceneError::NoGeometry {
                model: self.name.clone(),
                flags,
            });
        }
        if flags.contains(KeyframeFlags::FACE_MATERIALS) {
            self.check_faces(faces)?;
        }
        if flags.contains(KeyframeFlags::POINT_LIGHT) && !self.is_point_light() {
            return Err(SceneError::NotAPointLight(self.name.clone()));
        }
        Ok(())
    }

    /// Snapshot the property groups named by `flags` at `frame`
    ///
    /// Callers validate first with [`Self::validate_commit`].
    pub(crate) fn record(&mut self, frame: u32, flags: KeyframeFlags, faces: &[u32]) {
        if flags.contains(KeyframeFlags::POS_ROT_SCALE) {
            self.keyframes.transforms.insert(frame, self.transform);
            self.keyframes.in_motion.insert(frame);
        }
        if flags.contains(KeyframeFlags::FACE_MATERIALS) {
            for id in faces {
                self.keyframes
                    .face_data
                    .entry(*id)
                    .or_default()
                    .insert(frame, self.face_data[*id as usize]);
            }
        }
        if flags.contains(KeyframeFlags::POINT_LIGHT) {
            if let Some(light) = self.point_light {
                self.keyframes.point_light.insert(frame, light);
            }
        }
        if flags.contains(KeyframeFlags::AS_INSTANCE) {
            self.keyframes.as_instance.insert(frame, self.as_instance_data);
        }
        if flags.contains(KeyframeFlags::VISIBILITY) {
            self.keyframes.visibility.insert(frame, self.visibility);
        }
    }

    /// Baseline keyframes at frame 0 so every group samples to a value
    ///
    /// Face data is not seeded; faces pick up tracks on their first commit.
    pub(crate) fn seed_baseline(&mut self) {
        let mut flags = KeyframeFlags::POS_ROT_SCALE | KeyframeFlags::VISIBILITY;
        if self.is_point_light() {
            flags |= KeyframeFlags::POINT_LIGHT;
        }
        if self.has_geometry() {
            flags |= KeyframeFlags::AS_INSTANCE;
        }
        self.record(0, flags, &[]);
    }

    /// Set current properties to the values held at `frame`
    ///
    /// Returns the property groups whose value changed.
    pub(crate) fn apply_frame(&mut self, frame: u32) -> KeyframeFlags {
        let mut changed = KeyframeFlags::empty();

        if let Some(visible) = self.keyframes.visibility.sample(frame).copied() {
            if visible != self.visibility {
                self.visibility = visible;
                changed |= KeyframeFlags::VISIBILITY;
            }
        }
        if let Some(transform) = self.keyframes.transforms.sample(frame).copied() {
            if transform != self.transform {
                self.transform = transform;
                changed |= KeyframeFlags::POS_ROT_SCALE;
            }
        }
        if let (Some(light), Some(keyed)) = (self.point_light.as_mut(), self.keyframes.point_light.sample(frame)) {
            if light != keyed {
                *light = *keyed;
                changed |= KeyframeFlags::POINT_LIGHT;
            }
        }
        for (id, track) in &self.keyframes.face_data {
            let (Some(keyed), Some(face)) = (track.sample(frame), self.face_data.get_mut(*id as usize)) else {
                continue;
            };
            if face != keyed {
                *face = *keyed;
                changed |= KeyframeFlags::FACE_MATERIALS;
            }
        }
        if let Some(data) = self.keyframes.as_instance.sample(frame).copied() {
            if data != self.as_instance_data {
                self.as_instance_data = data;
                changed |= KeyframeFlags::AS_INSTANCE;
            }
        }

        changed
    }
}
