use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::tempdir;

use dagscope_cli::{Args, error_adapter::to_reportables, run, run_to};

/// Demo recordings live at the workspace root, not in the crate
fn demos_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos")
}

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

    // Sort for consistent test output
    files.sort();
    files
}

fn args(input: &Path, output: &Path) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: output.to_string_lossy().to_string(),
        config: None,
        log_level: "off".to_string(),
        sensitive_columns: Vec::new(),
        enable: Vec::new(),
        select_node: None,
        select_point: None,
        summary: false,
    }
}

#[test]
fn e2e_smoke_test_valid_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let valid_demos = collect_json_files(demos_path());

    assert!(!valid_demos.is_empty(), "No valid demos found in demos/");

    let mut failed_demos = Vec::new();

    for demo_path in &valid_demos {
        let output_filename = format!(
            "{}.svg",
            demo_path.file_stem().unwrap().to_string_lossy()
        );
        let output_path = temp_dir.path().join(output_filename);

        if let Err(e) = run(&args(demo_path, &output_path)) {
            failed_demos.push((demo_path.clone(), e));
            continue;
        }

        let svg = fs::read_to_string(&output_path).unwrap();
        assert!(svg.contains("data-node-id"), "{}", demo_path.display());
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
        let output_filename = format!(
            "error_{}.svg",
            demo_path.file_stem().unwrap().to_string_lossy()
        );
        let output_path = temp_dir.path().join(output_filename);

        match run(&args(demo_path, &output_path)) {
            Ok(()) => unexpectedly_succeeded.push(demo_path.clone()),
            Err(err) => assert!(!to_reportables(&err).is_empty()),
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

    println!(
        "✅ All {} error demos failed as expected",
        error_demos.len()
    );
}

#[test]
fn e2e_select_node_prints_details() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = demos_path().join("healthcare.json");
    let output = temp_dir.path().join("healthcare.svg");

    let args = Args {
        sensitive_columns: vec!["age_group".to_string(), "race".to_string()],
        select_node: Some("6".to_string()),
        summary: true,
        ..args(&input, &output)
    };

    let mut printed = Vec::new();
    run_to(&args, &mut printed).unwrap();
    let printed = String::from_utf8(printed).unwrap();

    assert!(printed.contains("Details: Operator 'Selection', Line 20"));
    assert!(printed.contains(r#""payload": "row_tables""#));
    assert!(printed.contains(r#""payload": "histograms""#));
    assert!(printed.contains(r#""payload": "bias_charts""#));
    assert!(printed.contains("NoBiasIntroducedFor(['age_group', 'race'])"));

    let svg = fs::read_to_string(&output).unwrap();
    assert!(svg.contains(r#"data-series="problem-nodes""#));
}

#[test]
fn e2e_select_respects_enabled_kinds() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = demos_path().join("healthcare.json");
    let output = temp_dir.path().join("healthcare.svg");

    let args = Args {
        enable: vec!["RowLineage".to_string()],
        select_node: Some("6".to_string()),
        ..args(&input, &output)
    };

    let mut printed = Vec::new();
    run_to(&args, &mut printed).unwrap();
    let printed = String::from_utf8(printed).unwrap();

    assert!(printed.contains(r#""payload": "row_tables""#));
    assert!(!printed.contains(r#""payload": "histograms""#));
    assert!(!printed.contains(r#""payload": "bias_charts""#));
}

#[test]
fn e2e_select_miss_prints_null() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = demos_path().join("adult.json");
    let output = temp_dir.path().join("adult.svg");

    let args = Args {
        select_point: Some("-10000,-10000".to_string()),
        ..args(&input, &output)
    };

    let mut printed = Vec::new();
    run_to(&args, &mut printed).unwrap();

    assert_eq!(String::from_utf8(printed).unwrap().trim(), "null");
}
