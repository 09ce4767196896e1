use std::{fs, path::PathBuf};

use tempfile::tempdir;

use mindmap::MindmapError;
use mindmap_cli::{Args, run};

/// Collects all payload files (.json, .md) from a directory
fn collect_payload_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && matches!(
                        path.extension().and_then(|s| s.to_str()),
                        Some("json" | "md")
                    )
            })
            .collect()
    } else {
        Vec::new()
    };

    // Sort for consistent test output
    files.sort();
    files
}

fn demos_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos")
}

fn args_for(input: &PathBuf, output: PathBuf) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: output.to_string_lossy().to_string(),
        config: None,
        model: None,
        orientation: None,
        max_depth: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_valid_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let valid_demos = collect_payload_files(demos_path());

    assert!(!valid_demos.is_empty(), "No valid demos found in demos/");

    let mut failed_demos = Vec::new();

    for demo_path in &valid_demos {
        let output_path = temp_dir.path().join(format!(
            "{}.svg",
            demo_path.file_stem().unwrap().to_string_lossy()
        ));

        match run(&args_for(demo_path, output_path.clone())) {
            Ok(()) => {
                let svg = fs::read_to_string(&output_path).expect("SVG was written");
                assert!(svg.contains("<svg"), "{} produced no SVG", demo_path.display());
                assert!(
                    svg.contains("Generated by gemini at "),
                    "{} has no caption",
                    demo_path.display()
                );
            }
            Err(e) => failed_demos.push((demo_path.clone(), e)),
        }
    }

    if !failed_demos.is_empty() {
        eprintln!("\nValid demos that failed:");
        for (path, err) in &failed_demos {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} valid demo(s) failed unexpectedly", failed_demos.len());
    }
}

#[test]
fn e2e_smoke_test_error_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let error_demos = collect_payload_files(demos_path().join("errors"));

    assert!(
        !error_demos.is_empty(),
        "No error demos found in demos/errors/"
    );

    let mut unexpected = Vec::new();

    for demo_path in &error_demos {
        let output_path = temp_dir.path().join(format!(
            "error_{}.svg",
            demo_path.file_stem().unwrap().to_string_lossy()
        ));

        match run(&args_for(demo_path, output_path.clone())) {
            Err(MindmapError::Format { err, .. }) if err.code().is_some() => {
                assert!(!output_path.exists(), "no SVG is written on failure");
            }
            other => unexpected.push((demo_path.clone(), format!("{other:?}"))),
        }
    }

    if !unexpected.is_empty() {
        eprintln!("\nError demos without a coded format error:");
        for (path, result) in &unexpected {
            eprintln!("  - {}: {}", path.display(), result);
        }
        panic!("{} error demo(s) behaved unexpectedly", unexpected.len());
    }
}

#[test]
fn e2e_overrides_reach_the_output() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = demos_path().join("lecture_outline.md");
    let output = temp_dir.path().join("lecture.svg");

    let mut args = args_for(&input, output.clone());
    args.model = Some("gemini-pro".to_string());
    args.max_depth = Some(1);
    run(&args).unwrap();

    let svg = fs::read_to_string(&output).unwrap();
    assert!(svg.contains("Generated by gemini-pro at "));
    assert!(svg.contains("Processes"));
    assert!(!svg.contains("Round robin"));
}

#[test]
fn e2e_missing_input_is_io_error() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("does_not_exist.json");
    let output = temp_dir.path().join("out.svg");

    assert!(matches!(
        run(&args_for(&input, output)),
        Err(MindmapError::Io(_))
    ));
}
