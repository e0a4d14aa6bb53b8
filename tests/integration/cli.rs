//! Integration tests driving the stac-merkle binary

use super::test_utils::{read_json, two_collection_catalog, write_json};
use serde_json::json;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run(args: &[&str], isolation: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_stac-merkle"))
        .args(args)
        .arg("--quiet")
        .env("STAC_MERKLE_CONFIG", isolation.join("no-global.toml"))
        .env_remove("STAC_MERKLE_LOG")
        .output()
        .unwrap()
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[test]
fn test_compute_then_verify_exit_zero() {
    let temp_dir = TempDir::new().unwrap();
    let catalog = temp_dir.path().join("catalog");
    two_collection_catalog(&catalog);
    let catalog_arg = path_arg(&catalog);

    let compute = run(&["compute", &catalog_arg], temp_dir.path());
    assert_eq!(compute.status.code(), Some(0), "{:?}", compute);
    let stdout = String::from_utf8_lossy(&compute.stdout);
    let root = read_json(&catalog.join("catalog.json"))["merkle:root"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(stdout.contains(&root));

    let verify = run(&["verify", &catalog_arg], temp_dir.path());
    assert_eq!(verify.status.code(), Some(0), "{:?}", verify);

    let embedded = run(&["verify", &catalog_arg, "--embedded"], temp_dir.path());
    assert_eq!(embedded.status.code(), Some(0), "{:?}", embedded);

    let check = run(
        &["check-tree", &path_arg(&catalog.join("merkle_tree.json"))],
        temp_dir.path(),
    );
    assert_eq!(check.status.code(), Some(0), "{:?}", check);
}

#[test]
fn test_tampered_catalog_verify_exit_one() {
    let temp_dir = TempDir::new().unwrap();
    let catalog = temp_dir.path().join("catalog");
    two_collection_catalog(&catalog);
    let catalog_arg = path_arg(&catalog);
    assert_eq!(run(&["compute", &catalog_arg], temp_dir.path()).status.code(), Some(0));

    let item_path = catalog.join("collections/flat/scene-b.json");
    let mut item = read_json(&item_path);
    item["id"] = json!("scene-b-edited");
    write_json(&item_path, &item);

    let verify = run(&["verify", &catalog_arg, "--format", "json"], temp_dir.path());
    assert_eq!(verify.status.code(), Some(1), "{:?}", verify);
    let report: serde_json::Value = serde_json::from_slice(&verify.stdout).unwrap();
    assert_eq!(report["passed"], false);
}

#[test]
fn test_explicit_artifact_location() {
    let temp_dir = TempDir::new().unwrap();
    let catalog = temp_dir.path().join("catalog");
    two_collection_catalog(&catalog);
    let artifact = temp_dir.path().join("out").join("tree.json");

    let compute = run(
        &[
            "compute",
            &path_arg(&catalog),
            "--merkle-tree-file",
            &path_arg(&artifact),
            "--function",
            "blake3",
        ],
        temp_dir.path(),
    );
    assert_eq!(compute.status.code(), Some(0), "{:?}", compute);
    assert!(artifact.is_file());

    let check = run(
        &["check-tree", &path_arg(&artifact), "--function", "blake3"],
        temp_dir.path(),
    );
    assert_eq!(check.status.code(), Some(0), "{:?}", check);
}

#[test]
fn test_missing_catalog_exit_two() {
    let temp_dir = TempDir::new().unwrap();
    let missing = path_arg(&temp_dir.path().join("nowhere"));

    let output = run(&["compute", &missing], temp_dir.path());
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("error:"));
}

#[test]
fn test_unsupported_function_exit_two() {
    let temp_dir = TempDir::new().unwrap();
    let catalog = temp_dir.path().join("catalog");
    two_collection_catalog(&catalog);

    let output = run(
        &["compute", &path_arg(&catalog), "--function", "md5"],
        temp_dir.path(),
    );
    assert_eq!(output.status.code(), Some(2));
}
