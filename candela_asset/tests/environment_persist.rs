use candela_asset::Environment;
use candela_asset::assets::FACE_SUFFIXES;
use std::path::PathBuf;

fn fixture_dir(test: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("candela_env_{}_{test}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("failed to create fixture dir");
    dir
}

fn write_faces(dir: &PathBuf, name: &str, size: u32) -> String {
    let texel = [160u8, 120, 80, 255];
    let face: Vec<u8> = texel
        .iter()
        .copied()
        .cycle()
        .take((size * size) as usize * 4)
        .collect();

    for suffix in FACE_SUFFIXES {
        let path = dir.join(format!("{name}_{suffix}.tga"));
        image::save_buffer(&path, &face, size, size, image::ExtendedColorType::Rgba8)
            .expect("failed to write face fixture");
    }

    dir.join(name).to_string_lossy().into_owned()
}

#[test]
fn round_trip_preserves_source_fields_and_reloads() {
    let dir = fixture_dir("round_trip");
    let base = write_faces(&dir, "sky", 4);

    let env = Environment::with_source(&base, 3, 0, 0, ".tga");
    assert!(env.environment_map().is_some());
    assert_eq!(env.width(), 4);
    assert_eq!(env.height(), 4);

    let json = serde_json::to_string(&env).expect("environment should serialize");
    let restored: Environment = serde_json::from_str(&json).expect("environment should deserialize");

    assert_eq!(restored.file_path(), env.file_path());
    assert_eq!(restored.mip_count(), env.mip_count());
    assert_eq!(restored.width(), env.width());
    assert_eq!(restored.height(), env.height());
    assert_eq!(restored.file_type(), env.file_type());

    // A non-empty path must have triggered the reload.
    assert!(restored.environment_map().is_some());
    assert_eq!(restored.environment_map().unwrap().width, 4);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn deserializing_empty_path_skips_loading() {
    let json = r#"{"file_path":"","mip_count":0,"width":0,"height":0,"file_type":".tga"}"#;
    let env: Environment = serde_json::from_str(json).expect("environment should deserialize");

    assert!(env.environment_map().is_none());
    assert!(env.prefiltered_map().is_none());
    assert!(env.irradiance_map().is_none());
}

#[test]
fn serialized_form_is_five_fields_in_fixed_order() {
    let mut env = Environment::default();
    env.set_file_path("skies/dusk");
    env.set_mip_count(5);
    env.set_width(256);
    env.set_height(256);

    let json = serde_json::to_string(&env).expect("environment should serialize");
    assert_eq!(
        json,
        r#"{"file_path":"skies/dusk","mip_count":5,"width":256,"height":256,"file_type":".tga"}"#
    );
}

#[test]
fn construction_flags_gate_derived_maps() {
    let dir = fixture_dir("flags");
    let base = write_faces(&dir, "sky", 8);

    let env = Environment::open(&base, true, false);
    assert!(env.environment_map().is_some());
    assert!(env.prefiltered_map().is_some());
    assert!(env.irradiance_map().is_none());

    let env = Environment::open(&base, false, true);
    assert!(env.prefiltered_map().is_none());
    assert!(env.irradiance_map().is_some());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn prefiltered_map_respects_persisted_mip_count() {
    let dir = fixture_dir("mips");
    let base = write_faces(&dir, "sky", 8);

    let env = Environment::with_source(&base, 2, 0, 0, ".tga");
    assert_eq!(env.prefiltered_map().unwrap().mip_level_count, 2);

    let _ = std::fs::remove_dir_all(&dir);
}
