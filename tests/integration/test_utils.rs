//! Shared test utilities for integration tests
//!
//! Catalog fixtures written into temporary directories.

use serde_json::{json, Value};
use std::fs;
use std::path::Path;

pub fn write_json(path: &Path, value: &Value) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}

pub fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

pub fn catalog_doc(id: &str) -> Value {
    json!({
        "type": "Catalog",
        "stac_version": "1.0.0",
        "id": id,
        "description": "Integration test catalog",
        "links": []
    })
}

pub fn collection_doc(id: &str) -> Value {
    json!({
        "type": "Collection",
        "stac_version": "1.0.0",
        "id": id,
        "description": format!("Collection {}", id),
        "license": "CC-BY-4.0",
        "extent": {
            "spatial": {"bbox": [[-180.0, -90.0, 180.0, 90.0]]},
            "temporal": {"interval": [["2020-01-01T00:00:00Z", null]]}
        },
        "links": []
    })
}

pub fn item_doc(id: &str, cloud_cover: f64) -> Value {
    json!({
        "type": "Feature",
        "stac_version": "1.0.0",
        "id": id,
        "bbox": [172.9, 1.3, 173.0, 1.4],
        "geometry": {"type": "Point", "coordinates": [172.95, 1.35]},
        "properties": {
            "datetime": "2024-05-01T10:00:00Z",
            "eo:cloud_cover": cloud_cover
        },
        "assets": {"visual": {"href": format!("./{}.tif", id), "type": "image/tiff"}},
        "links": []
    })
}

/// Catalog with two collections: `flat` holds two items beside its
/// `collection.json`, `nested` holds one item in its own directory.
pub fn two_collection_catalog(root: &Path) {
    write_json(&root.join("catalog.json"), &catalog_doc("earth"));

    let flat = root.join("collections").join("flat");
    write_json(&flat.join("collection.json"), &collection_doc("flat"));
    write_json(&flat.join("scene-a.json"), &item_doc("scene-a", 10.0));
    write_json(&flat.join("scene-b.json"), &item_doc("scene-b", 20.5));

    let nested = root.join("collections").join("nested");
    write_json(&nested.join("collection.json"), &collection_doc("nested"));
    write_json(
        &nested.join("scene-c").join("scene-c.json"),
        &item_doc("scene-c", 3.25),
    );
}
