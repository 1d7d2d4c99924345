//! Global world state: camera, main light and clip planes

use scenescript_math::{Rgba, Vec2, Vec3};
use serde::{Serialize, Deserialize};

/// Scene-wide properties, keyframed with [`crate::KeyframeFlags::WORLD`]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldProperties {
    /// Directional light colour; alpha is intensity
    pub main_light_colour: Rgba,
    /// Ambient colour; alpha is intensity
    pub ambient_colour: Rgba,
    /// Main light direction as (pitch, yaw) in radians
    pub main_light_direction: Vec2,
    /// Near/far distances of the shadow-casting light volume
    pub light_clip: Vec2,
    pub camera_position: Vec3,
    /// Camera euler rotation (pitch, yaw, roll) in radians
    pub camera_rotation: Vec3,
    /// Vertical field of view in radians
    pub fov: f32,
    /// Camera near/far clip planes
    pub clip: Vec2,
}

impl Default for WorldProperties {
    fn default() -> Self {
        Self {
            main_light_colour: [0.0, 0.0, 0.0, 0.0],
            ambient_colour: [0.1, 0.1, 0.1, 0.1],
            main_light_direction: Vec2::ZERO,
            light_clip: Vec2::new(0.1, 100.0),
            camera_position: Vec3::ZERO,
            camera_rotation: Vec3::ZERO,
            fov: 50f32.to_radians(),
            clip: Vec2::new(0.1, 100.0),
        }
    }
}

impl WorldProperties {
    /// Unit vector the main light shines along
    pub fn direction_vector(&self) -> Vec3 {
        let pitch = self.main_light_direction.x;
        let yaw = self.main_light_direction.y;
        Vec3::new(pitch.cos() * yaw.sin(), -pitch.sin(), yaw.cos() * pitch.cos()).normalized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const EPSILON: f32 = 0.0001;

    #[test]
    fn test_direction_vector_level_light() {
        let world = WorldProperties::default();
        let dir = world.direction_vector();
        assert!((dir.z - 1.0).abs() < EPSILON);
        assert!(dir.x.abs() < EPSILON);
        assert!(dir.y.abs() < EPSILON);
    }

    #[test]
    fn test_direction_vector_is_unit() {
        let world = WorldProperties {
            main_light_direction: Vec2::new(0.6, 1.4),
            ..Default::default()
        };
        assert!((world.direction_vector().length() - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_direction_vector_straight_down() {
        let world = WorldProperties {
            main_light_direction: Vec2::new(FRAC_PI_2, 0.0),
            ..Default::default()
        };
        assert!((world.direction_vector().y + 1.0).abs() < EPSILON);
    }
}
