//! Catalog walker: discovers the Catalog → Collection → Item hierarchy on disk
//!
//! Nodes are collected into an index-based arena. Parents always receive a
//! smaller index than their children, so index order is a valid top-down
//! order and [`CatalogTree::post_order`] a valid bottom-up one.

use crate::document::{self, Document};
use crate::error::CatalogError;
use crate::tree::path;
use crate::types::NodeKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Index of a node in a [`CatalogTree`]
pub type NodeIndex = usize;

/// A discovered document with its position in the hierarchy
#[derive(Debug, Clone)]
pub struct CatalogNode {
    pub path: PathBuf,
    pub parent: Option<NodeIndex>,
    pub children: Vec<NodeIndex>,
    pub document: Document,
}

impl CatalogNode {
    pub fn kind(&self) -> NodeKind {
        self.document.kind()
    }

    pub fn id(&self) -> &str {
        self.document.id()
    }
}

/// Arena holding every discovered node; index 0 is the root catalog
#[derive(Debug, Clone)]
pub struct CatalogTree {
    base_dir: PathBuf,
    nodes: Vec<CatalogNode>,
    skipped: Vec<PathBuf>,
}

impl CatalogTree {
    fn new(base_dir: PathBuf) -> Self {
        Self {
            base_dir,
            nodes: Vec::new(),
            skipped: Vec::new(),
        }
    }

    fn skip(&mut self, path: &Path, reason: &str) {
        warn!(path = %path.display(), "{}; skipping", reason);
        self.skipped.push(path.to_path_buf());
    }

    /// Files and directories inside collections that were not recognized
    pub fn skipped(&self) -> &[PathBuf] {
        &self.skipped
    }

    fn push(&mut self, parent: Option<NodeIndex>, path: PathBuf, document: Document) -> NodeIndex {
        let index = self.nodes.len();
        self.nodes.push(CatalogNode {
            path,
            parent,
            children: Vec::new(),
            document,
        });
        if let Some(parent) = parent {
            self.nodes[parent].children.push(index);
        }
        index
    }

    pub fn root(&self) -> NodeIndex {
        0
    }

    /// Directory holding the root catalog document
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, index: NodeIndex) -> &CatalogNode {
        &self.nodes[index]
    }

    pub fn node_mut(&mut self, index: NodeIndex) -> &mut CatalogNode {
        &mut self.nodes[index]
    }

    pub fn nodes(&self) -> &[CatalogNode] {
        &self.nodes
    }

    /// Node path relative to the catalog directory, for logs and reports
    pub fn display_path(&self, index: NodeIndex) -> String {
        path::display_path(&self.base_dir, &self.nodes[index].path)
    }

    /// Lazily yield node indices with every child before its parent.
    pub fn post_order(&self) -> PostOrder<'_> {
        let stack = if self.nodes.is_empty() {
            Vec::new()
        } else {
            vec![(self.root(), 0)]
        };
        PostOrder { tree: self, stack }
    }
}

/// Depth-first, children-first iterator over a [`CatalogTree`]
pub struct PostOrder<'a> {
    tree: &'a CatalogTree,
    stack: Vec<(NodeIndex, usize)>,
}

impl Iterator for PostOrder<'_> {
    type Item = NodeIndex;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (index, next_child) = self.stack.last_mut()?;
            let children = &self.tree.nodes[*index].children;
            if *next_child < children.len() {
                let child = children[*next_child];
                *next_child += 1;
                self.stack.push((child, 0));
            } else {
                let (index, _) = self.stack.pop()?;
                return Some(index);
            }
        }
    }
}

/// Catalog layout configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkerConfig {
    /// Whether to follow symbolic links (default: false)
    #[serde(default)]
    pub follow_symlinks: bool,

    /// File name of catalog documents
    #[serde(default = "default_catalog_file")]
    pub catalog_file: String,

    /// File name of collection documents
    #[serde(default = "default_collection_file")]
    pub collection_file: String,

    /// Directory under a catalog holding one subdirectory per collection
    #[serde(default = "default_collections_dir")]
    pub collections_dir: String,
}

fn default_catalog_file() -> String {
    "catalog.json".to_string()
}

fn default_collection_file() -> String {
    "collection.json".to_string()
}

fn default_collections_dir() -> String {
    "collections".to_string()
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            catalog_file: default_catalog_file(),
            collection_file: default_collection_file(),
            collections_dir: default_collections_dir(),
        }
    }
}

/// Catalog walker
pub struct Walker {
    root: PathBuf,
    config: WalkerConfig,
}

impl Walker {
    /// Create a walker for a catalog document or the directory holding it
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            config: WalkerConfig::default(),
        }
    }

    /// Create a walker with custom configuration
    pub fn with_config(root: PathBuf, config: WalkerConfig) -> Self {
        Self { root, config }
    }

    /// Discover the full hierarchy. Read-only; calling again re-reads the disk.
    pub fn walk(&self) -> Result<CatalogTree, CatalogError> {
        let catalog_path = path::resolve_catalog_document(&self.root, &self.config.catalog_file)?;
        let base_dir = catalog_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let mut tree = CatalogTree::new(base_dir);
        self.walk_catalog(&mut tree, catalog_path, None)?;
        debug!(node_count = tree.len(), "Walked catalog");
        Ok(tree)
    }

    fn walk_catalog(
        &self,
        tree: &mut CatalogTree,
        catalog_path: PathBuf,
        parent: Option<NodeIndex>,
    ) -> Result<NodeIndex, CatalogError> {
        let document = load_expected(&catalog_path, NodeKind::Catalog)?;
        let catalog_dir = parent_dir(&catalog_path);
        let index = tree.push(parent, catalog_path, document);
        debug!(path = %tree.display_path(index), "Discovered catalog");

        let collections_dir = catalog_dir.join(&self.config.collections_dir);
        if !collections_dir.is_dir() {
            info!(
                path = %collections_dir.display(),
                "No collections directory; catalog has no children"
            );
            return Ok(index);
        }

        for entry in self.list_dir(&collections_dir)? {
            if !entry.file_type().is_dir() {
                tree.skip(entry.path(), "File in collections directory");
                continue;
            }
            let collection_dir = entry.path();
            let collection_path = collection_dir.join(&self.config.collection_file);
            if collection_path.is_file() {
                self.walk_collection(tree, collection_path, index)?;
            } else {
                let reason = if self.contains_items(collection_dir) {
                    format!("items present without a {}", self.config.collection_file)
                } else {
                    format!("neither a {} nor any items", self.config.collection_file)
                };
                return Err(CatalogError::AmbiguousStructure {
                    path: collection_dir.to_path_buf(),
                    reason,
                });
            }
        }

        Ok(index)
    }

    fn walk_collection(
        &self,
        tree: &mut CatalogTree,
        collection_path: PathBuf,
        parent: NodeIndex,
    ) -> Result<NodeIndex, CatalogError> {
        let document = load_expected(&collection_path, NodeKind::Collection)?;
        let collection_dir = parent_dir(&collection_path);
        let index = tree.push(Some(parent), collection_path.clone(), document);
        debug!(path = %tree.display_path(index), "Discovered collection");

        for entry in self.list_dir(&collection_dir)? {
            let entry_path = entry.path();
            if entry_path == collection_path.as_path() {
                continue;
            }

            if entry.file_type().is_file() {
                if !is_json(entry_path) {
                    tree.skip(entry_path, "Unrecognized non-JSON file");
                    continue;
                }
                match load_item(entry_path)? {
                    Some(item) => {
                        let item_index = tree.push(Some(index), entry_path.to_path_buf(), item);
                        debug!(path = %tree.display_path(item_index), "Discovered item");
                    }
                    None => tree.skip(entry_path, "JSON file is not an Item"),
                }
            } else if entry.file_type().is_dir() {
                let nested_collection = entry_path.join(&self.config.collection_file);
                let nested_catalog = entry_path.join(&self.config.catalog_file);
                if nested_collection.is_file() {
                    self.walk_collection(tree, nested_collection, index)?;
                } else if nested_catalog.is_file() {
                    self.walk_catalog(tree, nested_catalog, Some(index))?;
                } else if let Some((item_path, item)) = self.item_in_directory(entry_path)? {
                    let item_index = tree.push(Some(index), item_path, item);
                    debug!(path = %tree.display_path(item_index), "Discovered nested item");
                } else {
                    tree.skip(entry_path, "Unrecognized structure");
                }
            }
        }

        Ok(index)
    }

    /// An item directory holds exactly one JSON file, and that file is a Feature.
    fn item_in_directory(&self, dir: &Path) -> Result<Option<(PathBuf, Document)>, CatalogError> {
        let json_files: Vec<PathBuf> = self
            .list_dir(dir)?
            .into_iter()
            .filter(|e| e.file_type().is_file() && is_json(e.path()))
            .map(DirEntry::into_path)
            .collect();

        match json_files.as_slice() {
            [only] => Ok(load_item(only)?.map(|item| (only.clone(), item))),
            _ => Ok(None),
        }
    }

    /// Whether a directory holds Feature documents, flat or one level deeper
    fn contains_items(&self, dir: &Path) -> bool {
        WalkDir::new(dir)
            .min_depth(1)
            .max_depth(2)
            .follow_links(self.config.follow_symlinks)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file() && is_json(e.path()))
            .any(|e| {
                document::read_json(e.path())
                    .map(|value| document::peek_kind(&value) == Some(NodeKind::Item))
                    .unwrap_or(false)
            })
    }

    /// Immediate entries of a directory, sorted by file name for determinism
    fn list_dir(&self, dir: &Path) -> Result<Vec<DirEntry>, CatalogError> {
        WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name()
            .into_iter()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| CatalogError::io(dir, e.into()))
    }
}

fn load_expected(path: &Path, expected: NodeKind) -> Result<Document, CatalogError> {
    let document = Document::load(path)?;
    if document.kind() != expected {
        return Err(CatalogError::malformed(
            path.display().to_string(),
            format!("expected a {}, found a {}", expected, document.kind()),
        ));
    }
    Ok(document)
}

/// Parse a JSON file as an Item; `None` when it is some other kind of JSON.
fn load_item(path: &Path) -> Result<Option<Document>, CatalogError> {
    let value = document::read_json(path)?;
    if document::peek_kind(&value) != Some(NodeKind::Item) {
        return Ok(None);
    }
    Document::from_value(value).map(Some).map_err(|e| e.at(path))
}

fn is_json(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("json")
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}
