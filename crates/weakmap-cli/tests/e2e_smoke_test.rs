use std::{fs, path::PathBuf};

use tempfile::tempdir;

use weakmap_cli::{Args, OutputFormat, run};

/// Collects all .json files from a directory
fn collect_json_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json")
            })
            .collect()
    } else {
        Vec::new()
    };

    files.sort();
    files
}

/// Demo inputs live at the workspace root.
fn demos_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos")
}

fn args(input: &PathBuf, output: PathBuf, format: OutputFormat) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: Some(output.to_string_lossy().to_string()),
        format,
        subject: None,
        domain: None,
        config: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_valid_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let valid_demos = collect_json_files(demos_path());
    assert!(!valid_demos.is_empty(), "No demos found in demos/");

    let mut failed_demos = Vec::new();

    for demo_path in &valid_demos {
        let stem = demo_path.file_stem().unwrap().to_string_lossy().to_string();

        for format in [OutputFormat::Svg, OutputFormat::Json] {
            let output_path = temp_dir
                .path()
                .join(format!("{stem}.{}", format.extension()));

            match run(&args(demo_path, output_path.clone(), format)) {
                Ok(()) => {
                    let written = fs::read_to_string(&output_path).expect("Output written");
                    assert!(!written.is_empty(), "{} produced empty output", stem);
                }
                Err(e) => failed_demos.push((demo_path.clone(), e)),
            }
        }
    }

    if !failed_demos.is_empty() {
        eprintln!("\nValid demos that failed:");
        for (path, err) in &failed_demos {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} valid demo(s) failed unexpectedly", failed_demos.len());
    }

    println!("✅ All {} valid demos passed", valid_demos.len());
}

#[test]
fn e2e_smoke_test_error_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let error_demos = collect_json_files(demos_path().join("errors"));
    assert!(
        !error_demos.is_empty(),
        "No error demos found in demos/errors/"
    );

    let mut unexpectedly_succeeded = Vec::new();

    for demo_path in &error_demos {
        let output_path = temp_dir.path().join(format!(
            "error_{}.svg",
            demo_path.file_stem().unwrap().to_string_lossy()
        ));

        if run(&args(demo_path, output_path, OutputFormat::Svg)).is_ok() {
            unexpectedly_succeeded.push(demo_path.clone());
        }
    }

    if !unexpectedly_succeeded.is_empty() {
        eprintln!("\nError demos that unexpectedly succeeded:");
        for path in &unexpectedly_succeeded {
            eprintln!("  - {}", path.display());
        }
        panic!(
            "{} error demo(s) succeeded unexpectedly",
            unexpectedly_succeeded.len()
        );
    }

    println!("✅ All {} error demos failed as expected", error_demos.len());
}

#[test]
fn e2e_scoped_json_layout() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = demos_path().join("mixed_subjects.json");
    let output_path = temp_dir.path().join("science.json");

    let mut args = args(&input, output_path.clone(), OutputFormat::Json);
    args.subject = Some("science".to_string());
    run(&args).expect("Scoped run succeeds");

    let document: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output_path).unwrap()).unwrap();
    let nodes = document["nodes"].as_array().unwrap();
    assert!(!nodes.is_empty());
    assert!(nodes.iter().all(|node| node["subject"] == "science"));
}

#[test]
fn e2e_explicit_config_is_applied() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("vertical.toml");
    fs::write(&config_path, "[layout]\norientation = \"vertical\"\n").unwrap();

    let input = demos_path().join("weakness_sample.json");
    let output_path = temp_dir.path().join("vertical.json");
    let mut args = args(&input, output_path.clone(), OutputFormat::Json);
    args.config = Some(config_path.to_string_lossy().to_string());
    run(&args).expect("Run with config succeeds");

    let document: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output_path).unwrap()).unwrap();
    assert_eq!(document["orientation"], "vertical");
}
