//! Procedural tower blocks
//!
//! Two hidden masks act as footprints. Struts and floors are instanced onto
//! them as building columns; over the scene the struts swell into a jenga
//! stack that peaks at the midpoint and collapses back, while the camera
//! rises in steps.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

use rand::{Rng, RngCore};

use scenescript_core::{
    AsInstanceData, FaceSelection, KeyframeFlags, ModelKey, Scene, SceneError, Vec2, Vec3,
};
use scenescript_math::triangle_envelope;

use super::SceneScript;

const OBJ_DIR: &str = "models/BUILDINGS/";
const MTL_DIR: &str = "models/BUILDINGS/";
const MATERIAL_DIR: &str = "materials/BUILDINGS/";

/// Tower blocks growing out of two hidden footprints
pub struct Buildings;

fn load(scene: &mut Scene, file: &str) -> Result<ModelKey, SceneError> {
    scene.create_model_from_file(format!("{}{}", OBJ_DIR, file), MTL_DIR, MATERIAL_DIR)
}

fn floor_template() -> AsInstanceData {
    let mut inst = AsInstanceData {
        layers: 10,
        layer_separation: 5.0,
        ..AsInstanceData::default()
    };
    inst.building.column_density = 1;
    inst
}

fn strut_template() -> AsInstanceData {
    let mut inst = AsInstanceData {
        layers: 10,
        layer_separation: 5.0,
        ..AsInstanceData::default()
    };
    let building = &mut inst.building;
    building.column_density = 30;
    building.struts_per_column_range = [4.0, 4.0];
    building.min_strut_offset.scale = Vec3::new(3.0, 5.0, 5.9);
    building.max_strut_offset.scale = Vec3::new(3.0, 5.0, 5.9);
    building.min_strut_offset.translation = Vec3::new(0.0, 0.0, -0.6);
    building.max_strut_offset.translation = Vec3::new(0.0, 0.0, -0.6);
    building.min_column_offset.scale = Vec3::new(1.0, 5.0, 5.9);
    building.max_column_offset.scale = Vec3::new(1.0, 5.0, 5.9);
    building.align_to_edge_idx = 1;
    inst
}

impl SceneScript for Buildings {
    fn name(&self) -> &'static str {
        "buildings"
    }

    fn run(&self, scene: &mut Scene, rng: &mut dyn RngCore) -> Result<(), SceneError> {
        let length = scene.length();
        let mid = length as f32 / 2.0;

        let mask = load(scene, "mask.obj")?;
        let mask1 = load(scene, "mask.obj")?;
        let floor = load(scene, "base.obj")?;
        let floor1 = load(scene, "base.obj")?;
        let strut = load(scene, "cube.obj")?;
        let strut1 = load(scene, "cube.obj")?;

        let mut setup = scene.begin_frame(0);
        setup.edit_world(|world| {
            world.main_light_colour = [1.0, 1.0, 1.0, 0.4];
            world.ambient_colour = [1.0, 1.0, 1.0, 0.1];
            world.main_light_direction = Vec2::new(0.6, 1.4);
            world.light_clip = Vec2::new(-30.0, 50.0);
            world.camera_position = Vec3::new(-23.0, 11.0, -23.0);
            world.camera_rotation = Vec3::new(-0.5, FRAC_PI_4, 0.0);
            world.fov = 25f32.to_radians();
            world.clip = Vec2::new(0.1, 1000.0);
        })?;

        let hidden = KeyframeFlags::POS_ROT_SCALE | KeyframeFlags::VISIBILITY;
        setup.edit(mask, hidden, &FaceSelection::First, |m| {
            m.transform.scale = Vec3::new(0.3, 0.1, 0.6);
            m.transform.translation.z += 20.0;
            m.visibility = false;
        })?;
        setup.edit(mask1, hidden, &FaceSelection::First, |m| {
            m.transform.scale = Vec3::new(0.3, 0.1, 0.6);
            m.transform.translation.x += 20.0;
            m.transform.rotation.y += FRAC_PI_2;
            m.visibility = false;
        })?;

        let placed = KeyframeFlags::POS_ROT_SCALE;
        setup.edit(floor, placed, &FaceSelection::First, |m| {
            m.transform.scale = Vec3::new(1.0, 2.0, 0.3);
            m.transform.translation.y += 2.4;
            m.transform.translation.z += 2.4;
        })?;
        let floor_height = setup.model(floor)?.transform.translation.y;
        setup.edit(floor1, placed, &FaceSelection::First, |m| {
            m.transform.scale = Vec3::new(1.0, 2.0, 0.3);
            m.transform.translation.y += floor_height;
            m.transform.translation.x += 2.4;
        })?;
        for key in [strut, strut1] {
            setup.edit(key, placed, &FaceSelection::First, |m| {
                m.transform.scale = Vec3::new(0.5, 1.0, 3.0);
            })?;
        }
        setup.finish()?;

        let mut floor_insts = [floor_template(), floor_template()];
        let mut strut_insts = [strut_template(), strut_template()];

        let instanced = KeyframeFlags::AS_INSTANCE | KeyframeFlags::FACE_MATERIALS;
        for f in 0..length {
            let mut frame = scene.begin_frame(f);

            if f % 3 == 0 {
                frame.edit_world(|world| {
                    world.camera_position.y += 0.27;
                    world.camera_rotation.x += 0.009;
                })?;
            }

            let distance = (f as f32 - mid).abs();
            let envelope = triangle_envelope(f as f32, mid, mid);
            for inst in &mut strut_insts {
                inst.layer_separation += 0.001;
                inst.building.jenga_factor = envelope;
                inst.building.column_density = (10.0 + distance / 6.0) as u32;
                inst.building.max_column_offset.translation.x = 0.8;
                inst.building.struts_per_column_range[0] = 4.0 - (1.0 - envelope) * 4.0;
                inst.building.max_strut_offset.scale.x = envelope * 15.0;
            }
            for inst in &mut floor_insts {
                inst.layer_separation += 0.001;
                inst.building.max_column_offset.rotation.y = 0.05;
                inst.building.min_column_offset.rotation.y = -0.05;
                inst.building.seed = (rng.gen::<f32>() * 100.0) as u32;
            }

            let targets = [
                (strut, &strut_insts[0], mask),
                (strut1, &strut_insts[1], mask1),
                (floor, &floor_insts[0], mask),
                (floor1, &floor_insts[1], mask1),
            ];
            for (key, inst, parent) in targets {
                frame.edit(key, instanced, &FaceSelection::All, |m| {
                    for face in m.faces_mut() {
                        face.contrast = 0.8 + rng.gen::<f32>() * 0.65;
                        face.uv_offset = Vec2::new(rng.gen(), rng.gen());
                    }
                    m.as_instance_data = inst.with_parent(parent);
                })?;
            }

            frame.finish()?;
        }

        log::debug!("Buildings committed {} frames", length);
        Ok(())
    }
}
