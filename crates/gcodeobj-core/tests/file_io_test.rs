// Embed/extract tests against real files
// Covers appending to existing gcode, the derived-file variant and
// the error classes callers rely on.

use gcodeobj_core::{CodecError, MarkerConfig, ObjCodec};
use std::fs;
use tempfile::TempDir;

const CUBE_OBJ: &str = "o cube\nv 0 0 0\nv 1 0 0\nv 1 1 0\nf 1 2 3\n";

#[test]
fn test_embed_appends_after_gcode() {
    let dir = TempDir::new().unwrap();
    let obj = dir.path().join("cube.obj");
    let gcode = dir.path().join("cube.gcode");
    fs::write(&obj, CUBE_OBJ).unwrap();
    fs::write(&gcode, "G28\nG1 X10 Y10\n").unwrap();

    let codec = ObjCodec::default();
    let written = codec.embed_file(&obj, &gcode).unwrap();
    assert_eq!(written, 5);

    let content = fs::read_to_string(&gcode).unwrap();
    assert_eq!(
        content,
        "G28\nG1 X10 Y10\n;objo cube\n;objv 0 0 0\n;objv 1 0 0\n;objv 1 1 0\n;objf 1 2 3\n"
    );
    assert_eq!(content.lines().count(), 2 + 5);
}

#[test]
fn test_embed_separates_unterminated_gcode() {
    let dir = TempDir::new().unwrap();
    let obj = dir.path().join("cube.obj");
    let gcode = dir.path().join("cube.gcode");
    fs::write(&obj, "v 0 0 0\n").unwrap();
    fs::write(&gcode, "G28\nM84").unwrap();

    ObjCodec::default().embed_file(&obj, &gcode).unwrap();

    assert_eq!(fs::read_to_string(&gcode).unwrap(), "G28\nM84\n;objv 0 0 0\n");
}

#[test]
fn test_embed_creates_missing_gcode() {
    let dir = TempDir::new().unwrap();
    let obj = dir.path().join("cube.obj");
    let gcode = dir.path().join("new.gcode");
    fs::write(&obj, CUBE_OBJ).unwrap();

    ObjCodec::default().embed_file(&obj, &gcode).unwrap();
    assert!(gcode.exists());
}

#[test]
fn test_embed_missing_source_leaves_target_alone() {
    let dir = TempDir::new().unwrap();
    let gcode = dir.path().join("never.gcode");

    let err = ObjCodec::default()
        .embed_file(dir.path().join("missing.obj"), &gcode)
        .unwrap_err();

    match err {
        CodecError::FileAccess { path, .. } => assert!(path.ends_with("missing.obj")),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!gcode.exists());
}

#[test]
fn test_round_trip_through_file() {
    let dir = TempDir::new().unwrap();
    let obj = dir.path().join("cube.obj");
    let gcode = dir.path().join("cube.gcode");
    fs::write(&obj, CUBE_OBJ).unwrap();
    fs::write(&gcode, "").unwrap();

    let codec = ObjCodec::default();
    codec.embed_file(&obj, &gcode).unwrap();
    assert_eq!(codec.extract_obj(&gcode).unwrap(), CUBE_OBJ);
}

#[test]
fn test_extract_interspersed_lines() {
    let dir = TempDir::new().unwrap();
    let gcode = dir.path().join("mixed.gcode");
    fs::write(&gcode, "G1 X1\n;objv 0 0 0\nG1 X2\n;objf 1 2 3\n").unwrap();

    let extraction = ObjCodec::default().extract_file(&gcode).unwrap();
    assert_eq!(extraction.lines().collect::<Vec<_>>(), vec!["v 0 0 0", "f 1 2 3"]);
    assert_eq!(extraction.lines_scanned, 4);
}

#[test]
fn test_extract_without_payload() {
    let dir = TempDir::new().unwrap();
    let gcode = dir.path().join("plain.gcode");
    fs::write(&gcode, "G28\nG1 X1\n").unwrap();

    let err = ObjCodec::default().extract_obj(&gcode).unwrap_err();
    assert!(err.is_payload_absent());
}

#[test]
fn test_extract_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = ObjCodec::default()
        .extract_obj(dir.path().join("gone.gcode"))
        .unwrap_err();
    assert!(err.is_file_access());
}

#[test]
fn test_extract_leaves_source_untouched() {
    let dir = TempDir::new().unwrap();
    let gcode = dir.path().join("print.gcode");
    let original = "G28\n;objv 0 0 0\n";
    fs::write(&gcode, original).unwrap();

    let codec = ObjCodec::default();
    codec.extract_obj(&gcode).unwrap();
    codec.extract_obj(&gcode).unwrap();

    assert_eq!(fs::read_to_string(&gcode).unwrap(), original);
}

#[test]
fn test_derived_file_is_overwritten() {
    let dir = TempDir::new().unwrap();
    let gcode = dir.path().join("print.gcode");
    fs::write(&gcode, "G28\n;objv 0 0 0\n;objv 1 1 1\n").unwrap();

    let codec = ObjCodec::default();
    let first = codec.extract_to_derived(&gcode).unwrap();
    assert_eq!(first.path, dir.path().join("print.obj"));
    assert_eq!(fs::read_to_string(&first.path).unwrap(), "v 0 0 0\nv 1 1 1\n");

    fs::write(&gcode, "G28\n;objv 9 9 9\n").unwrap();
    let second = codec.extract_to_derived(&gcode).unwrap();
    assert_eq!(second.path, first.path);
    assert_eq!(second.tagged_lines, 1);
    assert_eq!(fs::read_to_string(&second.path).unwrap(), "v 9 9 9\n");
}

#[test]
fn test_derived_file_not_written_without_payload() {
    let dir = TempDir::new().unwrap();
    let gcode = dir.path().join("plain.gcode");
    fs::write(&gcode, "G28\n").unwrap();

    let err = ObjCodec::default().extract_to_derived(&gcode).unwrap_err();
    assert!(err.is_payload_absent());
    assert!(!dir.path().join("plain.obj").exists());
}

#[test]
fn test_derived_path_conflict() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("mesh.obj");
    fs::write(&source, ";objv 0 0 0\n").unwrap();

    let err = ObjCodec::default().extract_to_derived(&source).unwrap_err();
    assert!(matches!(err, CodecError::DerivedPathConflict { .. }));
    assert_eq!(fs::read_to_string(&source).unwrap(), ";objv 0 0 0\n");
}

#[test]
fn test_custom_extension() {
    let dir = TempDir::new().unwrap();
    let gcode = dir.path().join("print.gcode");
    fs::write(&gcode, ";objv 0 0 0\n").unwrap();

    let codec = ObjCodec::new(MarkerConfig {
        derived_extension: "mesh".to_string(),
        ..MarkerConfig::default()
    })
    .unwrap();

    let derived = codec.extract_to_derived(&gcode).unwrap();
    assert_eq!(derived.path, dir.path().join("print.mesh"));
}

#[test]
fn test_embed_bad_source_leaves_gcode_intact() {
    let dir = TempDir::new().unwrap();
    let obj = dir.path().join("m.obj");
    let gcode = dir.path().join("m.gcode");
    fs::write(&obj, b"v 0 0 0\nv 1 0 0\n# caf\xe9\n").unwrap();
    fs::write(&gcode, "G28\n").unwrap();

    let err = ObjCodec::default().embed_file(&obj, &gcode).unwrap_err();
    match err {
        CodecError::FileAccess { path, .. } => assert_eq!(path, obj),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(fs::read_to_string(&gcode).unwrap(), "G28\n");
}

#[test]
fn test_extract_skips_non_utf8_gcode_comments() {
    let dir = TempDir::new().unwrap();
    let gcode = dir.path().join("latin1.gcode");
    fs::write(&gcode, b"; nozzle 210\xb0C\nG28\n;objv 0 0 0\n").unwrap();

    assert_eq!(ObjCodec::default().extract_obj(&gcode).unwrap(), "v 0 0 0\n");
}

#[test]
fn test_extract_to_same_file_through_other_spelling() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("mesh.gcode");
    fs::write(&source, ";objv 0 0 0\n").unwrap();

    fs::create_dir(dir.path().join("sub")).unwrap();
    let aliased = dir.path().join("sub").join("..").join("mesh.gcode");
    assert_ne!(aliased, source);
    let err = ObjCodec::default().extract_to(&source, aliased).unwrap_err();
    assert!(matches!(err, CodecError::DerivedPathConflict { .. }));
    assert_eq!(fs::read_to_string(&source).unwrap(), ";objv 0 0 0\n");
}

#[test]
fn test_derived_result_carries_text() {
    let dir = TempDir::new().unwrap();
    let gcode = dir.path().join("print.gcode");
    fs::write(&gcode, "G28\n;objv 0 0 0\n").unwrap();

    let derived = ObjCodec::default().extract_to_derived(&gcode).unwrap();
    assert_eq!(derived.text, "v 0 0 0\n");
    assert_eq!(derived.bytes, 8);

    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .filter(|name| name.ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}
