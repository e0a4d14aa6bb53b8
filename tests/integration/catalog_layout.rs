//! Integration tests for layout independence of collection roots

use super::test_utils::{catalog_doc, collection_doc, item_doc, write_json};
use stac_merkle::tree::builder::MerkleBuilder;
use stac_merkle::types::NodeKind;
use std::path::Path;
use tempfile::TempDir;

fn collection_root(root: &Path) -> String {
    let hashed = MerkleBuilder::new(root.to_path_buf()).compute().unwrap();
    let index = hashed
        .tree
        .nodes()
        .iter()
        .position(|n| n.kind() == NodeKind::Collection)
        .unwrap();
    hashed.hashes[index].root.clone().unwrap()
}

/// Flat and nested item storage produce the same collection root
#[test]
fn test_flat_and_nested_items_same_root() {
    let flat_dir = TempDir::new().unwrap();
    let flat = flat_dir.path();
    write_json(&flat.join("catalog.json"), &catalog_doc("cat"));
    let col = flat.join("collections").join("col");
    write_json(&col.join("collection.json"), &collection_doc("col"));
    write_json(&col.join("a.json"), &item_doc("a", 1.0));
    write_json(&col.join("b.json"), &item_doc("b", 2.0));

    let nested_dir = TempDir::new().unwrap();
    let nested = nested_dir.path();
    write_json(&nested.join("catalog.json"), &catalog_doc("cat"));
    let col = nested.join("collections").join("col");
    write_json(&col.join("collection.json"), &collection_doc("col"));
    write_json(&col.join("a").join("a.json"), &item_doc("a", 1.0));
    write_json(&col.join("b").join("b.json"), &item_doc("b", 2.0));

    assert_eq!(collection_root(flat), collection_root(nested));
}

/// Mixed layouts inside one collection are accepted
#[test]
fn test_mixed_layout_same_root() {
    let flat_dir = TempDir::new().unwrap();
    let flat = flat_dir.path();
    write_json(&flat.join("catalog.json"), &catalog_doc("cat"));
    let col = flat.join("collections").join("col");
    write_json(&col.join("collection.json"), &collection_doc("col"));
    write_json(&col.join("a.json"), &item_doc("a", 1.0));
    write_json(&col.join("b.json"), &item_doc("b", 2.0));

    let mixed_dir = TempDir::new().unwrap();
    let mixed = mixed_dir.path();
    write_json(&mixed.join("catalog.json"), &catalog_doc("cat"));
    let col = mixed.join("collections").join("col");
    write_json(&col.join("collection.json"), &collection_doc("col"));
    write_json(&col.join("a.json"), &item_doc("a", 1.0));
    write_json(&col.join("b").join("b.json"), &item_doc("b", 2.0));

    assert_eq!(collection_root(flat), collection_root(mixed));
}

/// File names, and therefore enumeration order, do not affect the root
#[test]
fn test_enumeration_order_does_not_change_root() {
    let first_dir = TempDir::new().unwrap();
    let first = first_dir.path();
    write_json(&first.join("catalog.json"), &catalog_doc("cat"));
    let col = first.join("collections").join("col");
    write_json(&col.join("collection.json"), &collection_doc("col"));
    write_json(&col.join("1.json"), &item_doc("a", 1.0));
    write_json(&col.join("2.json"), &item_doc("b", 2.0));
    write_json(&col.join("3.json"), &item_doc("c", 3.0));

    let second_dir = TempDir::new().unwrap();
    let second = second_dir.path();
    write_json(&second.join("catalog.json"), &catalog_doc("cat"));
    let col = second.join("collections").join("col");
    write_json(&col.join("collection.json"), &collection_doc("col"));
    write_json(&col.join("3.json"), &item_doc("a", 1.0));
    write_json(&col.join("1.json"), &item_doc("b", 2.0));
    write_json(&col.join("2.json"), &item_doc("c", 3.0));

    assert_eq!(collection_root(first), collection_root(second));
}

/// Key order inside a document does not affect its hash
#[test]
fn test_field_order_does_not_change_root() {
    let first_dir = TempDir::new().unwrap();
    let first = first_dir.path();
    write_json(&first.join("catalog.json"), &catalog_doc("cat"));
    let col = first.join("collections").join("col");
    write_json(&col.join("collection.json"), &collection_doc("col"));
    std::fs::write(
        col.join("a.json"),
        r#"{"type": "Feature", "id": "a", "properties": {"x": 1, "y": 2}}"#,
    )
    .unwrap();

    let second_dir = TempDir::new().unwrap();
    let second = second_dir.path();
    write_json(&second.join("catalog.json"), &catalog_doc("cat"));
    let col = second.join("collections").join("col");
    write_json(&col.join("collection.json"), &collection_doc("col"));
    std::fs::write(
        col.join("a.json"),
        r#"{"properties": {"y": 2, "x": 1}, "id": "a", "type": "Feature"}"#,
    )
    .unwrap();

    assert_eq!(collection_root(first), collection_root(second));
}
