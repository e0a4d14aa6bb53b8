//! Shared types: node kinds and the hash method descriptor.

use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Key of the per-document digest
pub const OBJECT_HASH_KEY: &str = "merkle:object_hash";
/// Key of the aggregate digest on catalogs and collections
pub const ROOT_KEY: &str = "merkle:root";
/// Key of the hash method descriptor on catalogs and collections
pub const HASH_METHOD_KEY: &str = "merkle:hash_method";
/// Extension schema URL listed in `stac_extensions` of every annotated document
pub const MERKLE_EXTENSION_URL: &str = "https://stacchain.github.io/merkle-tree/v1.0.0/schema.json";

/// Keys excluded from canonical content at every depth
pub const INTEGRITY_KEYS: [&str; 3] = [OBJECT_HASH_KEY, ROOT_KEY, HASH_METHOD_KEY];

/// Position of a document in the catalog hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Catalog,
    Collection,
    Item,
}

impl NodeKind {
    /// Map a document's `type` field to a node kind. STAC Items are GeoJSON `Feature`s.
    pub fn from_document_type(value: &str) -> Option<Self> {
        match value {
            "Catalog" => Some(NodeKind::Catalog),
            "Collection" => Some(NodeKind::Collection),
            "Feature" => Some(NodeKind::Item),
            _ => None,
        }
    }

    /// Catalogs and collections carry a `merkle:root`; items do not.
    pub fn is_internal(self) -> bool {
        !matches!(self, NodeKind::Item)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Catalog => "Catalog",
            NodeKind::Collection => "Collection",
            NodeKind::Item => "Item",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Digest function applied to canonical bytes and to child hash pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HashFunction {
    Sha256,
    Sha384,
    Sha512,
    Blake3,
}

impl HashFunction {
    pub fn as_str(self) -> &'static str {
        match self {
            HashFunction::Sha256 => "sha256",
            HashFunction::Sha384 => "sha384",
            HashFunction::Sha512 => "sha512",
            HashFunction::Blake3 => "blake3",
        }
    }
}

impl FromStr for HashFunction {
    type Err = CatalogError;

    /// Names are matched case-insensitively with dashes removed, so `SHA-256` is `sha256`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.replace('-', "").to_lowercase();
        match normalized.as_str() {
            "sha256" => Ok(HashFunction::Sha256),
            "sha384" => Ok(HashFunction::Sha384),
            "sha512" => Ok(HashFunction::Sha512),
            "blake3" => Ok(HashFunction::Blake3),
            _ => Err(CatalogError::UnsupportedHashFunction(s.to_string())),
        }
    }
}

impl TryFrom<String> for HashFunction {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HashFunction> for String {
    fn from(value: HashFunction) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for HashFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order applied to the hash list before the pairwise reduction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Ordering {
    Ascending,
    Descending,
    Unsorted,
}

impl Ordering {
    pub fn as_str(self) -> &'static str {
        match self {
            Ordering::Ascending => "ascending",
            Ordering::Descending => "descending",
            Ordering::Unsorted => "unsorted",
        }
    }

    /// Sort hex digests in place according to this ordering.
    pub fn apply(self, hashes: &mut [String]) {
        match self {
            Ordering::Ascending => hashes.sort(),
            Ordering::Descending => hashes.sort_by(|a, b| b.cmp(a)),
            Ordering::Unsorted => {}
        }
    }
}

impl FromStr for Ordering {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ascending" => Ok(Ordering::Ascending),
            "descending" => Ok(Ordering::Descending),
            "unsorted" => Ok(Ordering::Unsorted),
            _ => Err(CatalogError::UnsupportedOrdering(s.to_string())),
        }
    }
}

impl TryFrom<String> for Ordering {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Ordering> for String {
    fn from(value: Ordering) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Ordering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which top-level fields take part in `merkle:object_hash`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSelector {
    /// Every field (`["*"]` or `["all"]`)
    All,
    /// Only the named top-level fields that are present
    Fields(Vec<String>),
}

impl FieldSelector {
    pub fn from_fields(fields: &[String]) -> Self {
        match fields {
            [only] if only == "*" || only == "all" => FieldSelector::All,
            _ => FieldSelector::Fields(fields.to_vec()),
        }
    }

    pub fn includes(&self, key: &str) -> bool {
        match self {
            FieldSelector::All => true,
            FieldSelector::Fields(fields) => fields.iter().any(|f| f == key),
        }
    }
}

/// The `merkle:hash_method` descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashMethod {
    #[serde(default = "default_function")]
    pub function: HashFunction,

    #[serde(default = "default_fields")]
    pub fields: Vec<String>,

    #[serde(default = "default_ordering")]
    pub ordering: Ordering,

    #[serde(default)]
    pub description: String,
}

fn default_function() -> HashFunction {
    HashFunction::Sha256
}

fn default_fields() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_ordering() -> Ordering {
    Ordering::Ascending
}

pub(crate) fn default_description() -> String {
    "Computed by including the merkle:root of collections and the catalog's own merkle:object_hash."
        .to_string()
}

impl Default for HashMethod {
    fn default() -> Self {
        Self {
            function: default_function(),
            fields: default_fields(),
            ordering: default_ordering(),
            description: default_description(),
        }
    }
}

impl HashMethod {
    pub fn selector(&self) -> FieldSelector {
        FieldSelector::from_fields(&self.fields)
    }
}
