//! Merkle builder: hashes every document bottom-up and writes the results back

use crate::error::CatalogError;
use crate::tree::artifact::{ArtifactNode, VerificationArtifact, DEFAULT_ARTIFACT_FILE};
use crate::tree::hasher;
use crate::tree::walker::{CatalogNode, CatalogTree, NodeIndex, Walker, WalkerConfig};
use crate::types::HashMethod;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, instrument};

/// Hashes computed for one node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeHashes {
    pub object_hash: String,
    /// Present on catalogs and collections only
    pub root: Option<String>,
    /// Effective hash method after inheritance
    pub method: HashMethod,
}

impl NodeHashes {
    /// Hash a node contributes to its parent's root: `root` for internal nodes,
    /// `object_hash` for items.
    pub fn contributed_hash(&self) -> &str {
        self.root.as_deref().unwrap_or(&self.object_hash)
    }
}

/// A walked catalog with the hashes of every node, indexed like the arena
#[derive(Debug, Clone)]
pub struct HashedCatalog {
    pub tree: CatalogTree,
    pub hashes: Vec<NodeHashes>,
}

impl HashedCatalog {
    /// `merkle:root` of the top-level catalog
    pub fn merkle_root(&self) -> &str {
        self.hashes[self.tree.root()].contributed_hash()
    }

    /// Artifact mirroring the computed hashes
    pub fn to_artifact(&self) -> VerificationArtifact {
        VerificationArtifact::new(self.artifact_node(self.tree.root(), |_, hashes| {
            (hashes.object_hash.clone(), hashes.root.clone())
        }))
    }

    /// Artifact mirroring the hashes currently embedded in the documents.
    ///
    /// Missing values are recorded as empty strings, which never match.
    pub fn embedded_artifact(&self) -> VerificationArtifact {
        VerificationArtifact::new(self.artifact_node(self.tree.root(), |tree_node, hashes| {
            let document = &tree_node.document;
            let object_hash = document.object_hash().unwrap_or_default().to_string();
            let root = hashes
                .root
                .as_ref()
                .map(|_| document.root().unwrap_or_default().to_string());
            (object_hash, root)
        }))
    }

    fn artifact_node<F>(&self, index: NodeIndex, values: F) -> ArtifactNode
    where
        F: Fn(&CatalogNode, &NodeHashes) -> (String, Option<String>) + Copy,
    {
        let node = self.tree.node(index);
        let hashes = &self.hashes[index];
        let (object_hash, root) = values(node, hashes);
        ArtifactNode {
            node_id: node.id().to_string(),
            kind: node.kind(),
            object_hash,
            root,
            hash_method: hashes.root.as_ref().map(|_| hashes.method.clone()),
            children: node
                .children
                .iter()
                .map(|&child| self.artifact_node(child, values))
                .collect(),
        }
    }
}

/// Compute hashes for every node of a walked catalog without writing anything
///
/// Pass 1 resolves each node's effective hash method top-down (a document's
/// own `merkle:hash_method` wins, otherwise the parent's applies). Pass 2
/// hashes bottom-up. Each document is hashed as it will be written, i.e. with
/// the Merkle extension listed and an item's `properties` present, so a rerun
/// reproduces the same digests.
pub fn compute_hashes(
    tree: &CatalogTree,
    default_method: &HashMethod,
) -> Result<Vec<NodeHashes>, CatalogError> {
    let mut methods: Vec<HashMethod> = Vec::with_capacity(tree.len());
    for (index, node) in tree.nodes().iter().enumerate() {
        let inherited = match node.parent {
            Some(parent) => methods[parent].clone(),
            None => default_method.clone(),
        };
        let own = node.document.hash_method().map_err(|e| e.at(&node.path))?;
        let method = own.unwrap_or(inherited);
        debug!(path = %tree.display_path(index), function = %method.function, "Resolved hash method");
        methods.push(method);
    }

    let mut slots: Vec<Option<NodeHashes>> = vec![None; tree.len()];
    for index in tree.post_order() {
        let node = tree.node(index);
        let method = methods[index].clone();

        let mut annotated = node.document.clone();
        annotated
            .ensure_merkle_extension()
            .map_err(|e| e.at(&node.path))?;
        annotated
            .ensure_integrity_location()
            .map_err(|e| e.at(&node.path))?;
        let object_hash = hasher::compute_object_hash(&annotated, &method);

        let root = if node.kind().is_internal() {
            let mut hashes = Vec::with_capacity(node.children.len() + 1);
            for &child in &node.children {
                let child_hashes = slots[child]
                    .as_ref()
                    .ok_or_else(|| unreached(tree, child))?;
                hashes.push(child_hashes.contributed_hash().to_string());
            }
            hashes.push(object_hash.clone());
            Some(hasher::compute_merkle_root(hashes, method.function, method.ordering)?)
        } else {
            None
        };

        slots[index] = Some(NodeHashes {
            object_hash,
            root,
            method,
        });
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| slot.ok_or_else(|| unreached(tree, index)))
        .collect()
}

fn unreached(tree: &CatalogTree, index: NodeIndex) -> CatalogError {
    CatalogError::malformed(tree.display_path(index), "node not reached by traversal")
}

/// Result of a build pass
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub merkle_root: String,
    pub node_count: usize,
    pub artifact_path: PathBuf,
    pub artifact: VerificationArtifact,
}

/// Builds Merkle annotations for a catalog on disk
pub struct MerkleBuilder {
    root: PathBuf,
    hash_method: HashMethod,
    walker_config: Option<WalkerConfig>,
    artifact_path: Option<PathBuf>,
    artifact_file_name: String,
}

impl MerkleBuilder {
    /// Create a builder for a catalog document or the directory holding it
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            hash_method: HashMethod::default(),
            walker_config: None,
            artifact_path: None,
            artifact_file_name: DEFAULT_ARTIFACT_FILE.to_string(),
        }
    }

    /// Hash method used where no document declares one
    pub fn with_hash_method(mut self, method: HashMethod) -> Self {
        self.hash_method = method;
        self
    }

    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = Some(config);
        self
    }

    /// Explicit artifact location. Defaults to the artifact file name next to the catalog.
    pub fn with_artifact_path(mut self, path: PathBuf) -> Self {
        self.artifact_path = Some(path);
        self
    }

    pub fn with_artifact_file_name(mut self, name: impl Into<String>) -> Self {
        self.artifact_file_name = name.into();
        self
    }

    fn walker(&self) -> Walker {
        match &self.walker_config {
            Some(config) => Walker::with_config(self.root.clone(), config.clone()),
            None => Walker::new(self.root.clone()),
        }
    }

    /// Walk and hash the catalog without modifying it.
    pub fn compute(&self) -> Result<HashedCatalog, CatalogError> {
        let tree = match self.walker().walk() {
            Ok(tree) => tree,
            Err(e) => {
                error!("Catalog walk failed: {}", e);
                return Err(e);
            }
        };
        let hashes = compute_hashes(&tree, &self.hash_method)?;
        Ok(HashedCatalog { tree, hashes })
    }

    /// Compute every hash, rewrite each document in place and write the artifact.
    #[instrument(skip(self), fields(catalog = %self.root.display()))]
    pub fn build(&self) -> Result<BuildOutcome, CatalogError> {
        let start = Instant::now();
        info!("Starting Merkle build");

        let mut hashed = self.compute()?;
        let order: Vec<NodeIndex> = hashed.tree.post_order().collect();
        for index in order {
            let hashes = &hashed.hashes[index];
            let shown_path = hashed.tree.display_path(index);
            let node = hashed.tree.node_mut(index);

            let document = &mut node.document;
            document.ensure_merkle_extension()?;
            document.ensure_integrity_location()?;
            document.set_object_hash(&hashes.object_hash)?;
            if let Some(root) = &hashes.root {
                document.set_root(root, &hashes.method)?;
            }
            document.save(&node.path)?;

            info!(
                kind = %node.kind(),
                id = %node.id(),
                path = %shown_path,
                object_hash = %hashes.object_hash,
                root = hashes.root.as_deref().unwrap_or("-"),
                "Processed node"
            );
        }

        let artifact = hashed.to_artifact();
        let artifact_path = self.resolve_artifact_path(hashed.tree.base_dir());
        artifact.save(&artifact_path)?;

        let node_count = hashed.tree.len();
        let merkle_root = hashed.merkle_root().to_string();
        info!(
            node_count,
            merkle_root = %merkle_root,
            artifact = %artifact_path.display(),
            duration_ms = start.elapsed().as_millis(),
            "Merkle build completed"
        );

        Ok(BuildOutcome {
            merkle_root,
            node_count,
            artifact_path,
            artifact,
        })
    }

    fn resolve_artifact_path(&self, base_dir: &Path) -> PathBuf {
        self.artifact_path
            .clone()
            .unwrap_or_else(|| base_dir.join(&self.artifact_file_name))
    }
}
