//! Orbit around a flickering lamp-lit wall
//!
//! The camera circles the wall once over the scene while the main light
//! turns with it. Boxes and leaves are scattered onto a hidden mask, the
//! door cycles through an 8x5 texture atlas and four of the flames flicker.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use rand::{Rng, RngCore};

use scenescript_core::{
    FaceData, FaceSelection, KeyframeFlags, ModelKey, Scene, SceneError, Vec2, Vec3,
};
use scenescript_math::centered_jitter;

use super::SceneScript;

const OBJ_DIR: &str = "models/WALLROTATING/";
const MTL_DIR: &str = "models/WALLROTATING/";
const MATERIAL_DIR: &str = "materials/WALLROTATING/";

/// Faces of the door that carry the atlas texture
const DOOR_FACES: [u32; 4] = [0, 2, 6, 8];

const FLAME_COUNT: usize = 9;
const FLICKERING_FLAMES: [[f32; 3]; 4] = [
    [-2.9, 2.6, -0.8],
    [-1.6, 2.6, -0.8],
    [1.6, 2.6, -0.8],
    [2.9, 2.6, -0.8],
];
const DRIFTING_FLAME_X: [f32; 5] = [0.0, -2.5, 2.5, -5.0, 5.0];

/// Camera orbit around the rotating wall
pub struct RotatingWall;

fn load(scene: &mut Scene, file: &str) -> Result<ModelKey, SceneError> {
    scene.create_model_from_file(format!("{}{}", OBJ_DIR, file), MTL_DIR, MATERIAL_DIR)
}

impl SceneScript for RotatingWall {
    fn name(&self) -> &'static str {
        "rotating_wall"
    }

    fn run(&self, scene: &mut Scene, rng: &mut dyn RngCore) -> Result<(), SceneError> {
        let length = scene.length();
        let step = -TAU / length as f32;

        let floor = load(scene, "floor.obj")?;
        let wall = load(scene, "wall.obj")?;
        let door = load(scene, "door.obj")?;
        let arch = load(scene, "arch.obj")?;
        let mask = load(scene, "mask.obj")?;
        let lamp = load(scene, "lamp.obj")?;
        let boxes = load(scene, "box.obj")?;
        let leaf = load(scene, "leaf.obj")?;
        let street_light = load(scene, "streetLight.obj")?;
        let flames: Vec<ModelKey> = (0..FLAME_COUNT)
            .map(|_| scene.create_point_light(0.5, [1.0, 1.0, 1.0, 1.0]))
            .collect();

        // The mask's placement is first keyed inside the loop; only its visibility is keyed here
        {
            let m = scene.model_mut(mask)?;
            m.transform.scale = Vec3::new(0.1, 0.1, 0.2);
            m.transform.rotation.y = PI;
            m.transform.translation.z += 0.1;
            m.visibility = false;
        }

        let mut setup = scene.begin_frame(0);
        setup.edit(floor, KeyframeFlags::POS_ROT_SCALE, &FaceSelection::First, |m| {
            m.transform.scale = Vec3::new(7.0, 3.0, 7.0);
        })?;
        setup.commit(mask, KeyframeFlags::VISIBILITY, &FaceSelection::First)?;
        setup.edit(leaf, KeyframeFlags::POS_ROT_SCALE, &FaceSelection::First, |m| {
            m.transform.translation.z = -0.8;
        })?;
        setup.finish()?;

        {
            let m = scene.model_mut(wall)?;
            m.transform.scale = Vec3::new(0.1, 0.1, 0.2);
        }
        {
            let m = scene.model_mut(door)?;
            m.transform.translation = Vec3::new(0.0, 0.95, 0.0);
            m.transform.rotation.y = FRAC_PI_2;
            m.transform.scale = Vec3::new(0.05, 0.12, 0.12);
        }
        scene.model_mut(arch)?.transform.translation = Vec3::new(0.0, 2.0, 0.0);
        {
            let m = scene.model_mut(lamp)?;
            m.transform.scale = Vec3::splat(0.1);
            m.transform.rotation.y = PI;
        }
        {
            let m = scene.model_mut(boxes)?;
            m.transform.translation = Vec3::new(0.0, -3.0, 1.5);
            m.transform.scale = Vec3::splat(3.0);
        }
        {
            let m = scene.model_mut(street_light)?;
            m.transform.rotation = Vec3::new(PI, 0.0, 0.0);
            m.transform.scale = Vec3::new(0.3, 0.2, 0.3);
        }
        for (key, translation) in flames.iter().zip(FLICKERING_FLAMES) {
            scene.model_mut(*key)?.transform.translation = Vec3::from(translation);
        }

        {
            let world = scene.world_mut();
            world.main_light_colour = [1.0, 1.0, 1.0, 1.0];
            world.ambient_colour = [1.0, 1.0, 1.0, 0.01];
            world.main_light_direction = Vec2::new(0.4, 0.0);
            world.camera_position = Vec3::new(5.0, 1.0, 0.0);
            world.camera_rotation = Vec3::new(0.0, -FRAC_PI_2, 0.0);
            world.clip = Vec2::new(0.1, 1000.0);
            world.fov = 40f32.to_radians();
        }

        let graybrick = scene.material("graybrick")?;
        let wood = scene.material("wood")?;
        let doors = scene.material("doors")?;
        let concrete = scene.material("concrete")?;
        let door_faces = FaceSelection::subset(DOOR_FACES);

        let placed = KeyframeFlags::POS_ROT_SCALE;
        let faces = KeyframeFlags::FACE_MATERIALS;

        for f in 0..length {
            let mut frame = scene.begin_frame(f);
            let turned = f as f32 * step;

            frame.edit_world(|world| {
                world.camera_position = world.camera_position.rotated_about_y(step);
                world.main_light_direction = Vec2::new(0.4, turned);
                world.camera_rotation.y = turned - FRAC_PI_2;
            })?;

            let r: f32 = rng.gen();

            frame.edit(arch, placed, &FaceSelection::First, |m| {
                m.transform.scale = Vec3::new(
                    r * 0.01 + 0.145,
                    0.15 - length as f32 / 3000.0 + f as f32 / 3000.0 + (r - 0.5) * 0.1,
                    r + 0.5,
                );
            })?;
            frame.edit(door, faces | placed, &door_faces, |m| {
                m.transform.scale.y = centered_jitter(r, 0.01, 0.13);
            })?;
            frame.edit(wall, placed, &FaceSelection::First, |m| {
                m.transform.scale.y = centered_jitter(r, 0.01, 0.1);
            })?;
            frame.edit(mask, placed, &FaceSelection::First, |m| {
                m.transform.scale.x = centered_jitter(r, 0.05, 0.1);
            })?;

            let box_density = rng.gen::<f32>() / 10.0;
            frame.edit(boxes, placed | KeyframeFlags::AS_INSTANCE, &FaceSelection::First, |m| {
                m.transform.translation.y += 0.007;
                let inst = &mut m.as_instance_data;
                inst.parent_object = Some(mask);
                inst.random.seed = f;
                inst.random.density = box_density;
                inst.random.min_offset.scale = Vec3::new(0.4, 0.8, 0.3);
                inst.random.max_offset.scale = Vec3::new(1.7, 2.3, 2.5);
            })?;
            frame.edit(leaf, KeyframeFlags::AS_INSTANCE, &FaceSelection::First, |m| {
                let inst = &mut m.as_instance_data;
                inst.parent_object = Some(mask);
                inst.random.density = 2.0;
                inst.random.seed = f;
                inst.random.min_offset.translation.x = -1.0;
                inst.random.max_offset.translation.x = 1.0;
            })?;

            frame.edit(lamp, placed, &FaceSelection::First, |m| {
                m.transform.rotation.y = PI;
                m.transform.scale.y = centered_jitter(r, 0.01, 0.1);
                m.transform.translation.y -= 0.005;
            })?;
            frame.edit(street_light, placed, &FaceSelection::First, |m| {
                m.transform.translation = Vec3::new(r, r - 0.5, 1.5 + r);
            })?;

            let flicker = placed | KeyframeFlags::VISIBILITY;
            for key in &flames[..FLICKERING_FLAMES.len()] {
                let toggle = (rng.gen::<f32>() * 4.0) as u32 == 0;
                frame.edit(*key, flicker, &FaceSelection::First, |m| {
                    m.transform.translation.y -= 0.005;
                    if toggle {
                        m.visibility = !m.visibility;
                    }
                })?;
            }
            for (key, x) in flames[FLICKERING_FLAMES.len()..].iter().zip(DRIFTING_FLAME_X) {
                frame.edit(*key, placed, &FaceSelection::First, |m| {
                    m.transform.translation = Vec3::new(r + x, r + 2.8, 1.3 + r);
                })?;
            }

            let floor_face = FaceData::new(graybrick, 1.0, 5.0, Vec2::new(rng.gen(), rng.gen()));
            frame.edit(floor, faces, &FaceSelection::All, |m| {
                m.faces_mut().fill(floor_face);
            })?;
            frame.edit(boxes, faces, &FaceSelection::All, |m| {
                m.faces_mut().fill(FaceData::new(wood, 0.1, 1.6, Vec2::ZERO));
            })?;

            let wall_contrast = (rng.gen::<f32>() - 0.2) * 2.0 + 4.0;
            let wall_face = FaceData::new(graybrick, 0.0, wall_contrast, Vec2::new(rng.gen(), rng.gen()));
            frame.edit(wall, faces, &FaceSelection::All, |m| {
                m.faces_mut().fill(wall_face);
            })?;

            let arch_contrast = (rng.gen::<f32>() - 0.2) * 1.1 + 16.0;
            let arch_face = FaceData::new(graybrick, 1.0, arch_contrast, Vec2::new(rng.gen(), rng.gen()));
            frame.edit(arch, faces, &FaceSelection::All, |m| {
                m.faces_mut().fill(arch_face);
            })?;

            let atlas_cell = Vec2::new(
                (rng.gen::<f32>() * 8.0).floor() / 8.0,
                (rng.gen::<f32>() * 5.0).floor() / 5.0,
            );
            let door_face = FaceData::new(doors, 2.0, 1.0, atlas_cell);
            frame.model_mut(door)?.set_faces(door_face, &door_faces)?;
            frame.commit(door, faces, &door_faces)?;

            frame.edit(street_light, faces, &FaceSelection::All, |m| {
                m.faces_mut().fill(FaceData::new(concrete, 1.0, 1.5, Vec2::ZERO));
            })?;

            frame.finish()?;
        }

        let leaf_material = scene.material("leaf")?;
        let mut last = scene.begin_frame(0);
        last.edit(leaf, faces, &FaceSelection::All, |m| {
            m.faces_mut().fill(FaceData::new(leaf_material, 0.0, 2.0, Vec2::ZERO));
        })?;
        last.finish()?;

        log::debug!("Rotating wall committed {} frames", length);
        Ok(())
    }
}
