//! Integration tests for verification against artifacts and embedded values

use super::test_utils::{read_json, two_collection_catalog, write_json};
use serde_json::json;
use stac_merkle::tree::artifact::VerificationArtifact;
use stac_merkle::tree::builder::MerkleBuilder;
use stac_merkle::tree::verifier::{StructuralMismatch, Verifier};
use stac_merkle::types::NodeKind;
use std::fs;
use tempfile::TempDir;

/// Verifying straight after a build reports every node as passing
#[test]
fn test_verify_after_build_all_pass() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    two_collection_catalog(root);
    let outcome = MerkleBuilder::new(root.to_path_buf()).build().unwrap();

    let verifier = Verifier::new(root.to_path_buf());
    let report = verifier.verify(&outcome.artifact_path).unwrap();
    assert!(report.passed());
    assert_eq!(report.nodes.len(), 6);
    assert_eq!(report.merkle_root, outcome.merkle_root);

    assert!(verifier.verify_embedded().unwrap().passed());
}

/// Tampering with one leaf yields one hash mismatch and root mismatches on its ancestors only
#[test]
fn test_tampered_leaf_reports_single_mismatch_and_cascade() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    two_collection_catalog(root);
    let outcome = MerkleBuilder::new(root.to_path_buf()).build().unwrap();

    let item_path = root.join("collections/nested/scene-c/scene-c.json");
    let mut item = read_json(&item_path);
    item["properties"]["eo:cloud_cover"] = json!(99.0);
    write_json(&item_path, &item);

    for report in [
        Verifier::new(root.to_path_buf())
            .verify(&outcome.artifact_path)
            .unwrap(),
        Verifier::new(root.to_path_buf()).verify_embedded().unwrap(),
    ] {
        assert!(!report.passed());
        assert!(report.structural.is_empty());

        let hash_mismatches: Vec<&str> =
            report.hash_mismatches().map(|n| n.node_id.as_str()).collect();
        assert_eq!(hash_mismatches, vec!["scene-c"]);

        let mut root_mismatches: Vec<&str> =
            report.root_mismatches().map(|n| n.node_id.as_str()).collect();
        root_mismatches.sort();
        assert_eq!(root_mismatches, vec!["earth", "nested"]);

        let flat = report.nodes.iter().find(|n| n.node_id == "flat").unwrap();
        assert!(flat.passed());
    }
}

/// A collection removed after the build is reported as structural, not as an error
#[test]
fn test_removed_collection_is_structural_mismatch() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    two_collection_catalog(root);
    let outcome = MerkleBuilder::new(root.to_path_buf()).build().unwrap();

    fs::remove_dir_all(root.join("collections/flat")).unwrap();

    let report = Verifier::new(root.to_path_buf())
        .verify(&outcome.artifact_path)
        .unwrap();
    assert!(!report.passed());
    assert_eq!(
        report.first_structural_mismatch(),
        Some(&StructuralMismatch::MissingFromCatalog {
            parent_id: "earth".to_string(),
            node_id: "flat".to_string(),
            kind: NodeKind::Collection,
        })
    );
    assert_eq!(report.structural.len(), 1);
}

/// An artifact built for another catalog is rejected structurally
#[test]
fn test_artifact_of_other_catalog() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    two_collection_catalog(root);
    let outcome = MerkleBuilder::new(root.to_path_buf()).build().unwrap();

    let mut artifact = VerificationArtifact::load(&outcome.artifact_path).unwrap();
    artifact.root.node_id = "mars".to_string();
    artifact.save(&outcome.artifact_path).unwrap();

    let report = Verifier::new(root.to_path_buf())
        .verify(&outcome.artifact_path)
        .unwrap();
    assert!(matches!(
        report.first_structural_mismatch(),
        Some(StructuralMismatch::RootIdentity { expected_id, .. }) if expected_id == "mars"
    ));
}

/// Verification leaves every file untouched
#[test]
fn test_verify_is_read_only() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    two_collection_catalog(root);

    let catalog_before = fs::read_to_string(root.join("catalog.json")).unwrap();
    let report = Verifier::new(root.to_path_buf()).verify_embedded().unwrap();
    assert!(!report.passed());
    assert_eq!(fs::read_to_string(root.join("catalog.json")).unwrap(), catalog_before);
    assert!(!root.join("merkle_tree.json").exists());
}

/// The written artifact is internally consistent
#[test]
fn test_written_artifact_passes_self_check() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    two_collection_catalog(root);
    let outcome = MerkleBuilder::new(root.to_path_buf()).build().unwrap();

    let artifact = VerificationArtifact::load(&outcome.artifact_path).unwrap();
    let report = artifact
        .check_consistency(&stac_merkle::types::HashMethod::default())
        .unwrap();
    assert!(report.passed());
    assert_eq!(report.computed_root, outcome.merkle_root);
}
