//! STAC documents as a closed set of kinds over an ordered JSON map.
//!
//! Field order of the original file is preserved on write-back; hashing never
//! depends on it because the canonicalizer sorts keys. Numbers are written
//! back with their original text.

use crate::error::CatalogError;
use crate::types::{
    HashMethod, NodeKind, HASH_METHOD_KEY, MERKLE_EXTENSION_URL, OBJECT_HASH_KEY, ROOT_KEY,
};
use serde_json::{Map, Value};
use std::path::Path;

/// Field payload of a document
pub type Fields = Map<String, Value>;

/// A Catalog, Collection or Item document
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Catalog(Fields),
    Collection(Fields),
    Item(Fields),
}

const STAC_EXTENSIONS_KEY: &str = "stac_extensions";
const PROPERTIES_KEY: &str = "properties";

/// Node kind named by a JSON value's `type` field, if it is a STAC document.
pub fn peek_kind(value: &Value) -> Option<NodeKind> {
    value
        .get("type")
        .and_then(Value::as_str)
        .and_then(NodeKind::from_document_type)
}

impl Document {
    /// Build a document from a parsed JSON value.
    ///
    /// The value must be an object with a recognized `type` and a string `id`.
    pub fn from_value(value: Value) -> Result<Self, CatalogError> {
        let fields = match value {
            Value::Object(fields) => fields,
            other => {
                return Err(CatalogError::malformed(
                    "document",
                    format!("expected a JSON object, found {}", json_kind(&other)),
                ))
            }
        };

        let kind = match fields.get("type") {
            Some(Value::String(t)) => NodeKind::from_document_type(t).ok_or_else(|| {
                CatalogError::malformed("document", format!("unrecognized type '{}'", t))
            })?,
            Some(_) => return Err(CatalogError::malformed("document", "'type' is not a string")),
            None => return Err(CatalogError::malformed("document", "missing 'type'")),
        };

        match fields.get("id") {
            Some(Value::String(_)) => {}
            Some(_) => return Err(CatalogError::malformed("document", "'id' is not a string")),
            None => return Err(CatalogError::malformed("document", "missing 'id'")),
        }

        Ok(match kind {
            NodeKind::Catalog => Document::Catalog(fields),
            NodeKind::Collection => Document::Collection(fields),
            NodeKind::Item => Document::Item(fields),
        })
    }

    /// Read and parse a document file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let value = read_json(path)?;
        Document::from_value(value).map_err(|e| e.at(path))
    }

    /// Write the document back as 2-space indented JSON with a trailing newline.
    pub fn save(&self, path: &Path) -> Result<(), CatalogError> {
        let mut text = serde_json::to_string_pretty(self.fields())
            .map_err(|e| CatalogError::malformed(path.display().to_string(), e.to_string()))?;
        text.push('\n');
        std::fs::write(path, text).map_err(|e| CatalogError::io(path, e))
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Document::Catalog(_) => NodeKind::Catalog,
            Document::Collection(_) => NodeKind::Collection,
            Document::Item(_) => NodeKind::Item,
        }
    }

    pub fn fields(&self) -> &Fields {
        match self {
            Document::Catalog(f) | Document::Collection(f) | Document::Item(f) => f,
        }
    }

    fn fields_mut(&mut self) -> &mut Fields {
        match self {
            Document::Catalog(f) | Document::Collection(f) | Document::Item(f) => f,
        }
    }

    pub fn id(&self) -> &str {
        // Presence and type of `id` are checked in `from_value`.
        self.fields()
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Embedded `merkle:object_hash`: top level for catalogs and collections,
    /// under `properties` for items.
    pub fn object_hash(&self) -> Option<&str> {
        match self {
            Document::Item(fields) => fields
                .get(PROPERTIES_KEY)
                .and_then(|p| p.get(OBJECT_HASH_KEY))
                .and_then(Value::as_str),
            Document::Catalog(fields) | Document::Collection(fields) => {
                fields.get(OBJECT_HASH_KEY).and_then(Value::as_str)
            }
        }
    }

    pub fn root(&self) -> Option<&str> {
        if !self.kind().is_internal() {
            return None;
        }
        self.fields().get(ROOT_KEY).and_then(Value::as_str)
    }

    /// Hash method declared in the document itself.
    ///
    /// Items never declare one; they inherit from their parent.
    pub fn hash_method(&self) -> Result<Option<HashMethod>, CatalogError> {
        if !self.kind().is_internal() {
            return Ok(None);
        }
        match self.fields().get(HASH_METHOD_KEY) {
            None => Ok(None),
            Some(value) => serde_json::from_value(value.clone()).map(Some).map_err(|e| {
                CatalogError::malformed(self.id().to_string(), format!("invalid {}: {}", HASH_METHOD_KEY, e))
            }),
        }
    }

    /// Give an item a `properties` object to hold its object hash.
    ///
    /// A missing or `null` `properties` becomes `{}`. Hashing must see the
    /// document in this shape, otherwise the write-back changes the digest.
    pub fn ensure_integrity_location(&mut self) -> Result<(), CatalogError> {
        let id = self.id().to_string();
        let Document::Item(fields) = self else {
            return Ok(());
        };
        let properties = fields
            .entry(PROPERTIES_KEY)
            .or_insert_with(|| Value::Object(Map::new()));
        // A GeoJSON Feature may carry `"properties": null`.
        if properties.is_null() {
            *properties = Value::Object(Map::new());
        }
        if !properties.is_object() {
            return Err(CatalogError::malformed(id, "'properties' is not an object"));
        }
        Ok(())
    }

    pub fn set_object_hash(&mut self, hash: &str) -> Result<(), CatalogError> {
        self.ensure_integrity_location()?;
        let id = self.id().to_string();
        let target = match self {
            Document::Item(fields) => fields
                .get_mut(PROPERTIES_KEY)
                .and_then(Value::as_object_mut)
                .ok_or_else(|| CatalogError::malformed(id, "'properties' is not an object"))?,
            Document::Catalog(fields) | Document::Collection(fields) => fields,
        };
        target.insert(OBJECT_HASH_KEY.to_string(), Value::String(hash.to_string()));
        Ok(())
    }

    /// Record `merkle:root` and `merkle:hash_method`. No-op on items.
    pub fn set_root(&mut self, root: &str, method: &HashMethod) -> Result<(), CatalogError> {
        if !self.kind().is_internal() {
            return Ok(());
        }
        let method_value = serde_json::to_value(method)
            .map_err(|e| CatalogError::malformed(self.id().to_string(), e.to_string()))?;
        let fields = self.fields_mut();
        fields.insert(ROOT_KEY.to_string(), Value::String(root.to_string()));
        fields.insert(HASH_METHOD_KEY.to_string(), method_value);
        Ok(())
    }

    /// List the Merkle extension in `stac_extensions`, keeping the list sorted.
    pub fn ensure_merkle_extension(&mut self) -> Result<(), CatalogError> {
        let id = self.id().to_string();
        let extensions = self
            .fields_mut()
            .entry(STAC_EXTENSIONS_KEY)
            .or_insert_with(|| Value::Array(Vec::new()));
        let list = extensions
            .as_array_mut()
            .ok_or_else(|| CatalogError::malformed(id, "'stac_extensions' is not an array"))?;

        let present = list
            .iter()
            .any(|v| v.as_str() == Some(MERKLE_EXTENSION_URL));
        if !present {
            list.push(Value::String(MERKLE_EXTENSION_URL.to_string()));
        }
        list.sort_by(|a, b| extension_sort_key(a).cmp(&extension_sort_key(b)));
        Ok(())
    }
}

fn extension_sort_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Read a file and parse it as JSON.
pub fn read_json(path: &Path) -> Result<Value, CatalogError> {
    let bytes = std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CatalogError::NotFound(path.to_path_buf())
        } else {
            CatalogError::io(path, e)
        }
    })?;
    serde_json::from_slice(&bytes)
        .map_err(|e| CatalogError::malformed(path.display().to_string(), format!("invalid JSON: {}", e)))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
