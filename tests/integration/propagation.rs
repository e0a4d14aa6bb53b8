//! Integration tests for change propagation from items to the catalog root

use super::test_utils::{read_json, two_collection_catalog, write_json};
use serde_json::json;
use stac_merkle::tree::builder::MerkleBuilder;
use tempfile::TempDir;

/// Changing one item field changes the item, its collection and the catalog, and nothing else
#[test]
fn test_item_change_propagates_to_ancestors_only() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    two_collection_catalog(root);

    let builder = MerkleBuilder::new(root.to_path_buf());
    let before = builder.compute().unwrap();

    let item_path = root.join("collections/flat/scene-a.json");
    let mut item = read_json(&item_path);
    item["properties"]["eo:cloud_cover"] = json!(11.0);
    write_json(&item_path, &item);

    let after = builder.compute().unwrap();
    assert_eq!(before.tree.len(), after.tree.len());

    for index in 0..after.tree.len() {
        let id = after.tree.node(index).id();
        let changed = before.hashes[index] != after.hashes[index];
        match id {
            "scene-a" | "flat" | "earth" => assert!(changed, "{} should change", id),
            _ => assert!(!changed, "{} should not change", id),
        }
    }
    assert_ne!(before.merkle_root(), after.merkle_root());
}

/// Changing a collection's own metadata changes its root but not its items
#[test]
fn test_collection_metadata_change() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    two_collection_catalog(root);

    let builder = MerkleBuilder::new(root.to_path_buf());
    let before = builder.compute().unwrap();

    let path = root.join("collections/nested/collection.json");
    let mut collection = read_json(&path);
    collection["description"] = json!("edited");
    write_json(&path, &collection);

    let after = builder.compute().unwrap();
    for index in 0..after.tree.len() {
        let id = after.tree.node(index).id();
        let changed = before.hashes[index] != after.hashes[index];
        assert_eq!(changed, matches!(id, "nested" | "earth"), "unexpected result for {}", id);
    }
}

/// Adding an item changes the collection and catalog roots
#[test]
fn test_item_addition_changes_root() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    two_collection_catalog(root);

    let builder = MerkleBuilder::new(root.to_path_buf());
    let before = builder.compute().unwrap();

    write_json(
        &root.join("collections/flat/scene-z.json"),
        &super::test_utils::item_doc("scene-z", 0.0),
    );
    let after = builder.compute().unwrap();
    assert_ne!(before.merkle_root(), after.merkle_root());
}
