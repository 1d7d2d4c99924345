//! End-to-end runs of the bundled scripts

use std::collections::BTreeSet;
use std::f32::consts::PI;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serial_test::serial;

use scenescript::bootstrap::{self, BootstrapError};
use scenescript::config::{AppConfig, AssetConfig, BootstrapConfig};
use scenescript::scripts::{Buildings, RotatingWall, SceneScript, ScriptKind};
use scenescript_core::{CommitTarget, KeyframeFlags, Scene};

const EPSILON: f32 = 1e-3;

fn scene(length: u32) -> Scene {
    let mut assets = AssetConfig::default();
    assets.face_counts.insert("models/BUILDINGS/cube.obj".to_string(), 6);
    Scene::new(length, assets.to_manifest())
}

fn run(script: &dyn SceneScript, length: u32, seed: u64) -> Scene {
    let mut scene = scene(length);
    let mut rng = StdRng::seed_from_u64(seed);
    script.run(&mut scene, &mut rng).unwrap();
    scene
}

#[test]
fn test_buildings_commit_counts() {
    let scene = run(&Buildings, 300, 1);
    let instanced = KeyframeFlags::AS_INSTANCE | KeyframeFlags::FACE_MATERIALS;

    for name in ["cube", "cube_1", "base", "base_1"] {
        let (key, _) = scene.find(name).unwrap();
        let commits = scene
            .journal()
            .iter()
            .filter(|c| c.target == CommitTarget::Model(key) && c.flags == instanced)
            .count();
        assert_eq!(commits, 300, "{}", name);
    }

    let world: Vec<u32> = scene
        .journal()
        .iter()
        .filter(|c| c.target == CommitTarget::World)
        .map(|c| c.frame)
        .collect();
    assert_eq!(world.len(), 101);
    let distinct: BTreeSet<u32> = world.iter().copied().collect();
    assert_eq!(distinct.len(), 100);
    assert!(distinct.iter().all(|f| f % 3 == 0));
}

#[test]
fn test_buildings_parents_and_envelope() {
    let scene = run(&Buildings, 300, 2);
    let (mask, _) = scene.find("mask").unwrap();
    let (mask1, _) = scene.find("mask_1").unwrap();
    let (_, strut) = scene.find("cube").unwrap();
    let (_, floor1) = scene.find("base_1").unwrap();

    let track = &strut.keyframes().as_instance;
    let peak = track.get(150).unwrap();
    assert_eq!(peak.parent_object, Some(mask));
    assert!((peak.building.jenga_factor - 1.0).abs() < EPSILON);
    assert!((peak.building.max_strut_offset.scale.x - 15.0).abs() < EPSILON);
    assert_eq!(peak.building.column_density, 10);

    let start = track.get(0).unwrap();
    assert!(start.building.jenga_factor.abs() < EPSILON);
    assert_eq!(start.building.column_density, 35);

    let floor_inst = floor1.keyframes().as_instance.get(299).unwrap();
    assert_eq!(floor_inst.parent_object, Some(mask1));
    assert!(floor_inst.building.seed < 100);
}

#[test]
fn test_wall_door_touches_only_atlas_faces() {
    let scene = run(&RotatingWall, 300, 3);
    let (door, model) = scene.find("door").unwrap();

    for commit in scene.journal().iter().filter(|c| c.target == CommitTarget::Model(door)) {
        assert!(commit.flags.contains(KeyframeFlags::FACE_MATERIALS));
        assert_eq!(commit.faces, vec![0, 2, 6, 8]);
    }
    let touched: Vec<u32> = model.keyframes().modified_faces().collect();
    assert_eq!(touched, vec![0, 2, 6, 8]);

    let doors = scene.material("doors").unwrap();
    let face = model.keyframes().face_data[&6].get(42).unwrap();
    assert_eq!(face.material_id, doors);
    let (u, v) = (face.uv_offset.x * 8.0, face.uv_offset.y * 5.0);
    assert!((u - u.round()).abs() < 1e-4);
    assert!((v - v.round()).abs() < 1e-4);
}

#[test]
fn test_wall_camera_orbits() {
    let scene = run(&RotatingWall, 300, 4);
    let world = scene.world_keyframes();

    let half = world.get(149).unwrap();
    assert!((half.camera_position.x + 5.0).abs() < EPSILON);
    assert!((half.camera_position.y - 1.0).abs() < EPSILON);
    assert!(half.camera_position.z.abs() < EPSILON);

    let full = world.get(299).unwrap();
    assert!((full.camera_position.x - 5.0).abs() < EPSILON);
    assert!((full.camera_rotation.y - (-299.0 * PI / 150.0 - PI / 2.0)).abs() < EPSILON);
    assert_eq!(world.len(), 300);
}

#[test]
fn test_wall_mask_keys_visibility_before_placement() {
    let scene = run(&RotatingWall, 30, 6);
    let (mask, model) = scene.find("mask").unwrap();

    let first = scene
        .journal()
        .iter()
        .find(|c| c.target == CommitTarget::Model(mask))
        .unwrap();
    assert_eq!(first.flags, KeyframeFlags::VISIBILITY);
    assert_eq!(model.keyframes().visibility.get(0), Some(&false));

    let placed = model.keyframes().transforms.get(0).unwrap();
    assert_eq!(placed.rotation.y, PI);
    assert!((placed.translation.z - 0.1).abs() < EPSILON);
}

#[test]
fn test_wall_leaf_material_at_frame_zero() {
    let scene = run(&RotatingWall, 30, 5);
    let (_, leaf) = scene.find("leaf").unwrap();
    let leaf_material = scene.material("leaf").unwrap();
    for face in leaf.keyframes().modified_faces() {
        let data = leaf.keyframes().face_data[&face].get(0).unwrap();
        assert_eq!(data.material_id, leaf_material);
    }
    assert_eq!(leaf.keyframes().modified_faces().count(), 12);
}

#[test]
fn test_seeded_runs_match() {
    let a = run(&RotatingWall, 60, 9).recording();
    let b = run(&RotatingWall, 60, 9).recording();
    assert_eq!(a.world, b.world);
    let (wall_a, wall_b) = (a.model("wall").unwrap(), b.model("wall").unwrap());
    assert_eq!(wall_a.keyframes.face_data, wall_b.keyframes.face_data);
}

#[test]
fn test_run_with_replay() {
    let mut config = AppConfig::default();
    config.scene.script = ScriptKind::Buildings;
    config.scene.length = 30;
    config.scene.seed = Some(11);
    config.scene.replay = true;

    let run = scenescript::run(&config).unwrap();
    let replay = run.replay.unwrap();
    assert_eq!(replay.frames, 30);
    assert!(replay.model_updates > 0);
    assert_eq!(run.stats.models, 6);
}

#[test]
fn test_run_exports_recording() {
    let path = std::env::temp_dir().join("scenescript_preview_test.ron");
    let mut config = AppConfig::default();
    config.scene.script = ScriptKind::Preview;
    config.scene.length = 10;
    config.scene.output = Some(path.to_string_lossy().into_owned());

    scenescript::run(&config).unwrap();
    let recording = scenescript_core::Recording::load(&path).unwrap();
    assert_eq!(recording.length, 10);
    assert!(recording.model("mask").is_some());
    std::fs::remove_file(&path).ok();
}

#[test]
#[serial]
fn test_bootstrap_refuses_existing_home() {
    let config = BootstrapConfig {
        enabled: true,
        home_var: "SCENESCRIPT_TEST_HOME".to_string(),
        home: "/opt/engine".to_string(),
        ..BootstrapConfig::default()
    };

    std::env::remove_var("SCENESCRIPT_TEST_HOME");
    bootstrap::bootstrap(&config).unwrap();
    assert_eq!(std::env::var("SCENESCRIPT_TEST_HOME").unwrap(), "/opt/engine");

    assert_eq!(
        bootstrap::bootstrap(&config),
        Err(BootstrapError::AlreadySet("SCENESCRIPT_TEST_HOME".to_string()))
    );
    std::env::remove_var("SCENESCRIPT_TEST_HOME");
}

#[test]
#[serial]
fn test_bootstrap_empty_value_counts_as_unset() {
    std::env::set_var("SCENESCRIPT_TEST_EMPTY", "");
    bootstrap::set_engine_var("SCENESCRIPT_TEST_EMPTY", "/opt/engine").unwrap();
    std::env::remove_var("SCENESCRIPT_TEST_EMPTY");
}

#[test]
#[serial]
fn test_bootstrap_refuses_existing_path() {
    let config = BootstrapConfig {
        enabled: true,
        home_var: "SCENESCRIPT_TEST_PATH_HOME".to_string(),
        home: "/opt/engine".to_string(),
        path_var: "SCENESCRIPT_TEST_PATH".to_string(),
        path: Some("/opt/engine/lib".to_string()),
    };

    std::env::remove_var("SCENESCRIPT_TEST_PATH_HOME");
    std::env::set_var("SCENESCRIPT_TEST_PATH", "/usr/lib/engine");

    assert_eq!(
        bootstrap::bootstrap(&config),
        Err(BootstrapError::AlreadySet("SCENESCRIPT_TEST_PATH".to_string()))
    );
    assert_eq!(std::env::var("SCENESCRIPT_TEST_PATH").unwrap(), "/usr/lib/engine");

    std::env::remove_var("SCENESCRIPT_TEST_PATH_HOME");
    std::env::remove_var("SCENESCRIPT_TEST_PATH");
}
