//! Scene object model for keyframed scene scripts
//!
//! Scripts talk to this crate the way they would talk to a rendering
//! engine's scripting API: create models, mutate their properties, and
//! commit keyframes. The crate validates and records every commit so the
//! result can be inspected, replayed, or exported.
//!
//! - [`Scene`] - Owns models, the world state, materials and the commit journal
//! - [`Model`] - Geometry handle with transform, visibility, face and instance data
//! - [`ModelKey`] - Generational key to a model in the scene
//! - [`KeyframeFlags`] - Property groups a commit records
//! - [`FaceSelection`] - Which faces a face-data commit covers
//! - [`KeyframeTrack`] - Ordered frame → value storage with hold sampling
//! - [`FrameUpdate`] - Per-frame transaction tying writes to commits
//! - [`WorldProperties`] - Camera, lighting and clip planes
//! - [`AsInstanceData`] - Parameters for engine-generated sub-geometry
//! - [`AssetSource`] - Resolves model paths to face counts and materials
//! - [`Recording`] - Serializable export of every track

mod transform;
mod keyframe;
mod face;
mod instance;
mod world;
mod model;
mod asset;
mod scene;
mod frame;
mod playback;

pub use transform::Transform;
pub use keyframe::{FaceSelection, KeyframeFlags, KeyframeTrack};
pub use face::{FaceData, MaterialId};
pub use instance::{AsInstanceData, BuildingInstances, RandomInstances};
pub use world::WorldProperties;
pub use model::{Model, ModelKey, ModelKeyframes, PointLightComponent};
pub use asset::{AssetSource, ManifestAssets, ModelAsset};
pub use scene::{
    CommitRecord, CommitTarget, FrameChanges, ModelRecording, Recording, Scene, SceneError, SceneStats,
};
pub use frame::FrameUpdate;
pub use playback::Playhead;

// Re-export math types used in public fields
pub use scenescript_math::{Rgba, Vec2, Vec3};
