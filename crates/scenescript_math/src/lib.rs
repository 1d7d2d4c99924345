//! Scene scripting mathematics
//!
//! Small vector types and the closed-form per-frame curves used by the scene
//! scripts.
//!
//! ## Core Types
//!
//! - [`Vec2`] - 2D vector (UV offsets, light direction, clip ranges)
//! - [`Vec3`] - 3D vector (translation, euler rotation, scale, camera)
//!
//! ## Curves
//!
//! - [`triangle_envelope`] - linear ramp up to a peak and back down
//! - [`centered_jitter`] - a unit random sample re-centred around a base value

mod vec2;
mod vec3;
pub mod curves;

pub use vec2::Vec2;
pub use vec3::Vec3;
pub use curves::{centered_jitter, triangle_envelope};

/// RGBA colour, each component 0.0-1.0 (alpha is often used as intensity)
pub type Rgba = [f32; 4];
