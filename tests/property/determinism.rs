//! Property-based tests for determinism guarantees

use proptest::prelude::*;
use serde_json::{Map, Value};
use stac_merkle::document::Document;
use stac_merkle::tree::canonical::{canonical_json, strip_integrity_fields};
use stac_merkle::tree::hasher::{compute_merkle_root, compute_object_hash};
use stac_merkle::types::{HashFunction, HashMethod, Ordering};

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        (-1.0e9f64..1.0e9).prop_map(Value::from),
        "[a-zA-Z0-9 _\u{e9}\u{1f600}-]{0,10}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 48, 5, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5).prop_map(Value::Array),
            prop::collection::btree_map("[a-z:]{1,8}", inner, 0..5)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

/// Rebuild every object with its keys inserted in reverse order.
fn reverse_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut reversed = Map::new();
            for (k, v) in map.iter().rev() {
                reversed.insert(k.clone(), reverse_keys(v));
            }
            Value::Object(reversed)
        }
        Value::Array(items) => Value::Array(items.iter().map(reverse_keys).collect()),
        other => other.clone(),
    }
}

fn item_with(extra: Value) -> Value {
    serde_json::json!({
        "type": "Feature",
        "id": "item",
        "properties": {"payload": extra.clone()},
        "extra": extra
    })
}

fn arb_hashes() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(any::<[u8; 8]>(), 1..40).prop_map(|seeds| {
        seeds
            .iter()
            .map(|seed| HashFunction::Sha256.digest_hex(seed))
            .collect()
    })
}

proptest! {
    /// Canonical bytes never depend on key insertion order
    #[test]
    fn canonical_json_ignores_key_order(value in arb_json()) {
        prop_assert_eq!(canonical_json(&value), canonical_json(&reverse_keys(&value)));
    }

    /// Canonical output is ASCII-only valid JSON that parses back to an equal value
    #[test]
    fn canonical_json_is_ascii_json(value in arb_json()) {
        let text = canonical_json(&value);
        prop_assert!(text.is_ascii());
        let parsed: Value = serde_json::from_str(&text).unwrap();
        prop_assert_eq!(canonical_json(&parsed), text);
    }

    /// Object hashes are stable across recomputation and key reordering
    #[test]
    fn object_hash_is_deterministic(extra in arb_json()) {
        let method = HashMethod::default();
        let doc = Document::from_value(item_with(extra)).unwrap();
        let reordered = Document::from_value(reverse_keys(&Value::Object(doc.fields().clone()))).unwrap();

        let first = compute_object_hash(&doc, &method);
        prop_assert_eq!(&first, &compute_object_hash(&doc, &method));
        prop_assert_eq!(&first, &compute_object_hash(&reordered, &method));
    }

    /// Integrity keys at any depth do not contribute to the hash
    #[test]
    fn integrity_keys_are_ignored(extra in arb_json(), hash in "[0-9a-f]{64}") {
        let mut value = item_with(extra);
        value["merkle:root"] = Value::String(hash.clone());
        value["properties"]["merkle:object_hash"] = Value::String(hash);
        prop_assert_eq!(
            canonical_json(&strip_integrity_fields(value.clone())),
            canonical_json(&strip_integrity_fields(item_with(value["extra"].clone())))
        );
    }

    /// Sorted orderings make the root independent of input order
    #[test]
    fn sorted_root_ignores_input_order(hashes in arb_hashes()) {
        let mut reversed = hashes.clone();
        reversed.reverse();
        for ordering in [Ordering::Ascending, Ordering::Descending] {
            prop_assert_eq!(
                compute_merkle_root(hashes.clone(), HashFunction::Sha256, ordering).unwrap(),
                compute_merkle_root(reversed.clone(), HashFunction::Sha256, ordering).unwrap()
            );
        }
    }
}

/// A single hash is its own root under every function
#[test]
fn test_single_hash_is_root_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&any::<Vec<u8>>(), |seed| {
            for function in [
                HashFunction::Sha256,
                HashFunction::Sha384,
                HashFunction::Sha512,
                HashFunction::Blake3,
            ] {
                let hash = function.digest_hex(&seed);
                let root = compute_merkle_root(vec![hash.clone()], function, Ordering::Unsorted)
                    .unwrap();
                assert_eq!(root, hash);
            }
            Ok(())
        })
        .unwrap();
}
