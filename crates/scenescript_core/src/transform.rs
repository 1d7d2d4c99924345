//! Model transform (translation, rotation, scale)
//!
//! A Transform places a model in the scene. Rotation is stored as euler
//! angles in radians and scale is per-axis.

use scenescript_math::Vec3;
use serde::{Serialize, Deserialize};

/// Translation, euler rotation and per-axis scale of a model
///
/// Also used as the min/max offset bounds of instance data, where each
/// field bounds the random offset applied to generated sub-geometry.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Position in scene space
    pub translation: Vec3,
    /// Euler rotation in radians (pitch, yaw, roll)
    pub rotation: Vec3,
    /// Per-axis scale factor
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// Identity transform: no translation or rotation, unit scale
    pub fn identity() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}
