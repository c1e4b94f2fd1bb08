use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use futures::executor::block_on;
use futures::future::join_all;
use shapesmith::{
    DiagnosticSink, ExportError, MeshError, ModelExportService, OutputFormat, ShapeKind,
    ShapeSettings, ValidationError,
};

fn out_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR"))
        .join("export_test")
        .join(name);
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[derive(Default)]
struct CountingSink {
    errors: Mutex<Vec<String>>,
}

impl DiagnosticSink for CountingSink {
    fn log_error(&self, error: &ExportError) {
        self.errors.lock().unwrap().push(error.to_string());
    }

    fn log_message(&self, _message: &str) {}
}

fn face_lines(text: &str) -> Vec<Vec<usize>> {
    text.lines()
        .filter_map(|l| l.strip_prefix("f "))
        .map(|rest| rest.split_whitespace().map(|i| i.parse().unwrap()).collect())
        .collect()
}

#[test]
fn small_cube_as_obj() {
    let path = out_dir("scenario_a").join("cube.obj");
    let summary = block_on(ModelExportService::new().export(
        "a small cube",
        &path,
        OutputFormat::Obj,
    ))
    .unwrap();
    assert_eq!(summary.kind, ShapeKind::Cube);

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 8);
    let faces = face_lines(&text);
    assert_eq!(faces.len(), 6);
    for face in faces {
        assert_eq!(face.len(), 4);
        assert!(face.iter().all(|i| (1..=8).contains(i)));
    }
}

#[test]
fn shouted_sphere_as_stl() {
    let path = out_dir("scenario_b").join("sphere.stl");
    let summary = ModelExportService::new()
        .export("SPHERE please", &path, OutputFormat::Stl)
        .wait()
        .unwrap();
    assert_eq!(summary.kind, ShapeKind::Sphere);
    assert_eq!(summary.vertex_count, 72);
    assert_eq!(summary.face_count, 64);

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("solid sphere"));
    assert_eq!(text.lines().last(), Some("endsolid sphere"));
    assert_eq!(
        text.lines()
            .filter(|l| l.trim_start().starts_with("facet "))
            .count(),
        128
    );
    assert_eq!(text.lines().filter(|l| l.trim() == "endfacet").count(), 128);
    assert_eq!(
        text.lines()
            .filter(|l| l.trim_start().starts_with("vertex "))
            .count(),
        128 * 3
    );
}

#[test]
fn empty_description_defaults_to_cube() {
    let path = out_dir("scenario_c").join("default.obj");
    let summary = ModelExportService::new()
        .export("", &path, OutputFormat::Obj)
        .wait()
        .unwrap();
    assert_eq!(summary.kind, ShapeKind::Cube);
    assert_eq!(summary.vertex_count, 8);
    assert_eq!(summary.face_count, 6);
}

#[test]
fn sphere_counts_follow_segment_setting() {
    let dir = out_dir("segments");
    for n in [1u32, 3, 12] {
        let path = dir.join(format!("sphere_{n}.obj"));
        let service = ModelExportService::new().with_settings(ShapeSettings {
            sphere_segments: n,
            ..Default::default()
        });
        service
            .export("a Sphere", &path, OutputFormat::Obj)
            .wait()
            .unwrap();

        let n = n as usize;
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text.lines().filter(|l| l.starts_with("v ")).count(),
            (n + 1) * n
        );
        let faces = face_lines(&text);
        assert_eq!(faces.len(), n * n);
        assert!(faces.iter().flatten().all(|&i| i >= 1 && i <= (n + 1) * n));

        let stl_path = dir.join(format!("sphere_{n}.stl"));
        service
            .export("sphere", &stl_path, OutputFormat::Stl)
            .wait()
            .unwrap();
        let stl = fs::read_to_string(&stl_path).unwrap();
        assert_eq!(stl.matches("endfacet").count(), 2 * n * n);
    }
}

#[test]
fn blank_path_never_creates_a_file() {
    let sink = Arc::new(CountingSink::default());
    let service = ModelExportService::new().with_sink(sink.clone());

    for format in [OutputFormat::Obj, OutputFormat::Stl] {
        for description in ["", "cube", "sphere"] {
            let err = service.export(description, " ", format).wait().unwrap_err();
            assert!(matches!(
                err,
                ExportError::Validation(ValidationError::BlankOutputPath)
            ));
        }
    }
    assert_eq!(sink.errors.lock().unwrap().len(), 6);
}

#[test]
fn bad_parameters_fail_before_io() {
    let dir = out_dir("bad_parameters");
    let cases = [
        (
            ShapeSettings {
                sphere_segments: 0,
                ..Default::default()
            },
            "sphere",
        ),
        (
            ShapeSettings {
                sphere_radius: 0.0,
                ..Default::default()
            },
            "sphere",
        ),
        (
            ShapeSettings {
                cube_size: -3.0,
                ..Default::default()
            },
            "box",
        ),
    ];

    for (settings, description) in cases {
        let sink = Arc::new(CountingSink::default());
        let path = dir.join("never.obj");
        let err = ModelExportService::new()
            .with_settings(settings)
            .with_sink(sink.clone())
            .export(description, &path, OutputFormat::Obj)
            .wait()
            .unwrap_err();
        assert!(err.is_validation(), "{err}");
        assert_eq!(sink.errors.lock().unwrap().len(), 1);
        assert!(!path.exists());
    }
    assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);
}

#[test]
fn oversized_sphere_is_reported_not_fatal() {
    let dir = out_dir("oversized");
    let path = dir.join("huge.obj");
    let sink = Arc::new(CountingSink::default());
    let err = ModelExportService::new()
        .with_settings(ShapeSettings {
            sphere_segments: u32::MAX,
            ..Default::default()
        })
        .with_sink(sink.clone())
        .export("sphere", &path, OutputFormat::Obj)
        .wait()
        .unwrap_err();

    assert!(matches!(err, ExportError::Mesh(MeshError::TooLarge { .. })), "{err}");
    assert_eq!(sink.errors.lock().unwrap().len(), 1);
    assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);
}

#[test]
fn concurrent_exports_are_independent() {
    let dir = out_dir("concurrent");
    let service = ModelExportService::new();
    let tasks: Vec<_> = (0..16)
        .map(|i| {
            let (description, format) = if i % 2 == 0 {
                ("sphere", OutputFormat::Stl)
            } else {
                ("cube", OutputFormat::Obj)
            };
            service.export(
                description,
                dir.join(format!("model_{i}.{}", format.extension())),
                format,
            )
        })
        .collect();

    let results = block_on(join_all(tasks));
    for (i, result) in results.into_iter().enumerate() {
        let summary = result.unwrap();
        let expected = if i % 2 == 0 {
            ShapeKind::Sphere
        } else {
            ShapeKind::Cube
        };
        assert_eq!(summary.kind, expected);
        assert_eq!(
            fs::metadata(&summary.path).unwrap().len(),
            summary.bytes_written as u64
        );
    }
    // no staging files left next to the outputs
    assert_eq!(fs::read_dir(&dir).unwrap().count(), 16);
}

#[test]
fn same_path_ends_with_one_complete_file() {
    let path = out_dir("same_path").join("shared.obj");
    let service = ModelExportService::new();
    let tasks: Vec<_> = ["sphere", "cube", "sphere", "cube"]
        .into_iter()
        .map(|d| service.export(d, &path, OutputFormat::Obj))
        .collect();
    for result in block_on(join_all(tasks)) {
        result.unwrap();
    }

    let text = fs::read_to_string(&path).unwrap();
    let v_count = text.lines().filter(|l| l.starts_with("v ")).count();
    assert!(v_count == 8 || v_count == 72, "torn file with {v_count} vertices");
    assert_eq!(fs::read_dir(path.parent().unwrap()).unwrap().count(), 1);
}

#[test]
fn overwrites_existing_file() {
    let path = out_dir("overwrite").join("model.obj");
    fs::write(&path, "stale contents that are much longer than nothing\n".repeat(100)).unwrap();

    ModelExportService::new()
        .export_blocking("cube", &path, OutputFormat::Obj)
        .unwrap();
    let text = fs::read_to_string(&path).unwrap();
    assert!(!text.contains("stale"));
    assert_eq!(text.lines().count(), 14);
}
