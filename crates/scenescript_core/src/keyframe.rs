//! Keyframe flags, face selections and keyframe tracks
//!
//! A keyframe commit names the property groups to snapshot with
//! [`KeyframeFlags`]. Each snapshot lands in a [`KeyframeTrack`], an ordered
//! frame → value map that playback samples with hold semantics.

use std::collections::BTreeMap;

use bitflags::bitflags;
use serde::{Serialize, Deserialize};

bitflags! {
    /// Property groups recorded by a keyframe commit
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct KeyframeFlags: u8 {
        /// Transform (translation, rotation, scale)
        const POS_ROT_SCALE = 1 << 0;
        /// Per-face material data for the selected faces
        const FACE_MATERIALS = 1 << 1;
        /// Point-light component (radius, colour)
        const POINT_LIGHT = 1 << 2;
        /// Instance data (procedural sub-geometry parameters)
        const AS_INSTANCE = 1 << 3;
        /// Global world state (camera, lighting, clip planes)
        const WORLD = 1 << 4;
        /// Visibility flag
        const VISIBILITY = 1 << 5;
    }
}

/// Which faces a `FACE_MATERIALS` commit or a face assignment applies to
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaceSelection {
    /// Face 0 only
    #[default]
    First,
    /// Every face of the model
    All,
    /// An explicit list of face ids
    Subset(Vec<u32>),
}

impl FaceSelection {
    /// Build a subset selection from any list of face ids
    pub fn subset(ids: impl IntoIterator<Item = u32>) -> Self {
        Self::Subset(ids.into_iter().collect())
    }

    /// Resolve to concrete face ids for a model with `face_count` faces
    ///
    /// Ids are not range-checked here.
    pub fn resolve(&self, face_count: u32) -> Vec<u32> {
        match self {
            FaceSelection::First => vec![0],
            FaceSelection::All => (0..face_count).collect(),
            FaceSelection::Subset(ids) => ids.clone(),
        }
    }
}

/// Keyframed values of one property, ordered by frame
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyframeTrack<T> {
    keys: BTreeMap<u32, T>,
}

impl<T> Default for KeyframeTrack<T> {
    fn default() -> Self {
        Self { keys: BTreeMap::new() }
    }
}

impl<T> KeyframeTrack<T> {
    /// Create an empty track
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `value` at `frame`, replacing any earlier value at that frame
    pub fn insert(&mut self, frame: u32, value: T) {
        self.keys.insert(frame, value);
    }

    /// Value recorded exactly at `frame`
    pub fn get(&self, frame: u32) -> Option<&T> {
        self.keys.get(&frame)
    }

    /// Value held at `frame`: the latest keyframe at or before it
    pub fn sample(&self, frame: u32) -> Option<&T> {
        self.keys.range(..=frame).next_back().map(|(_, v)| v)
    }

    /// Number of keyframes
    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Check if the track has no keyframes
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
