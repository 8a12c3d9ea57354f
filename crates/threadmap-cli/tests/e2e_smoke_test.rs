use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::tempdir;

use threadmap_cli::{Args, CliError, run};

/// Collects all .toml scenes from a directory
fn collect_scenes(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("toml")
            })
            .collect()
    } else {
        Vec::new()
    };

    files.sort();
    files
}

fn demos_dir() -> PathBuf {
    // Demos are at workspace root, relative to workspace not the crate
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos")
}

fn args_for(input: &Path, output: &Path) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: output.to_string_lossy().to_string(),
        config: None,
        center_parents: false,
        centering_passes: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_valid_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let scenes = collect_scenes(demos_dir());

    assert!(!scenes.is_empty(), "No scenes found in demos/");

    let mut failed = Vec::new();

    for scene_path in &scenes {
        let output_path = temp_dir.path().join(format!(
            "{}.layout.toml",
            scene_path.file_stem().unwrap().to_string_lossy()
        ));

        match run(&args_for(scene_path, &output_path)) {
            Ok(()) => {
                let report = fs::read_to_string(&output_path).unwrap();
                let parsed: toml::Table = toml::from_str(&report).unwrap();
                assert!(
                    parsed.contains_key("thread"),
                    "{} produced no threads",
                    scene_path.display()
                );
            }
            Err(e) => failed.push((scene_path.clone(), e)),
        }
    }

    if !failed.is_empty() {
        eprintln!("\nScenes that failed:");
        for (path, err) in &failed {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} scene(s) failed unexpectedly", failed.len());
    }
}

#[test]
fn e2e_smoke_test_error_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let scenes = collect_scenes(demos_dir().join("errors"));

    assert!(!scenes.is_empty(), "No error scenes found in demos/errors/");

    let mut unexpectedly_succeeded = Vec::new();

    for scene_path in &scenes {
        let output_path = temp_dir.path().join(format!(
            "error_{}.layout.toml",
            scene_path.file_stem().unwrap().to_string_lossy()
        ));

        match run(&args_for(scene_path, &output_path)) {
            Err(CliError::Scene { .. }) => {}
            Err(other) => panic!(
                "{} failed with a non-scene error: {other}",
                scene_path.display()
            ),
            Ok(()) => unexpectedly_succeeded.push(scene_path.clone()),
        }
    }

    if !unexpectedly_succeeded.is_empty() {
        eprintln!("\nError scenes that unexpectedly succeeded:");
        for path in &unexpectedly_succeeded {
            eprintln!("  - {}", path.display());
        }
        panic!(
            "{} error scene(s) succeeded unexpectedly",
            unexpectedly_succeeded.len()
        );
    }
}

#[test]
fn e2e_pinned_thread_keeps_its_position() {
    let temp_dir = tempdir().unwrap();
    let output_path = temp_dir.path().join("pinned.layout.toml");

    run(&args_for(&demos_dir().join("pinned.toml"), &output_path)).unwrap();

    let report: toml::Table =
        toml::from_str(&fs::read_to_string(&output_path).unwrap()).unwrap();
    let threads = report["thread"].as_array().unwrap();
    let dragged = threads
        .iter()
        .find(|thread| thread["key"].as_str() == Some("dragged"))
        .unwrap();

    assert_eq!(dragged["manual"].as_bool(), Some(true));
    assert_eq!(dragged["y"].as_float(), Some(700.0));
}

#[test]
fn e2e_missing_input_is_an_io_error() {
    let temp_dir = tempdir().unwrap();
    let args = args_for(
        &temp_dir.path().join("absent.toml"),
        &temp_dir.path().join("out.toml"),
    );

    assert!(matches!(run(&args), Err(CliError::Threadmap(_))));
}
