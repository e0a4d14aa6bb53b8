//! Verification artifact: a persisted snapshot of the hash tree

use crate::error::CatalogError;
use crate::tree::hasher;
use crate::types::{HashMethod, NodeKind};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// Artifact file name used when no explicit location is given
pub const DEFAULT_ARTIFACT_FILE: &str = "merkle_tree.json";

/// One node of the persisted hash tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactNode {
    pub node_id: String,

    #[serde(rename = "type")]
    pub kind: NodeKind,

    #[serde(rename = "merkle:object_hash")]
    pub object_hash: String,

    #[serde(rename = "merkle:root", default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,

    /// Method the root was computed with. Absent on items, and on internal
    /// nodes of artifacts that predate it, where the parent's method applies.
    #[serde(rename = "merkle:hash_method", default, skip_serializing_if = "Option::is_none")]
    pub hash_method: Option<HashMethod>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ArtifactNode>,
}

impl ArtifactNode {
    /// Number of nodes in this subtree, including itself
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(ArtifactNode::count).sum::<usize>()
    }
}

/// The artifact file written by the builder and read by the verifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerificationArtifact {
    pub root: ArtifactNode,
}

impl VerificationArtifact {
    pub fn new(root: ArtifactNode) -> Self {
        Self { root }
    }

    /// Top-level `merkle:root`
    pub fn merkle_root(&self) -> Option<&str> {
        self.root.root.as_deref()
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CatalogError::NotFound(path.to_path_buf())
            } else {
                CatalogError::io(path, e)
            }
        })?;
        serde_json::from_str(&text).map_err(|e| CatalogError::InvalidArtifact {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Write as indented JSON, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), CatalogError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| CatalogError::io(parent, e))?;
        }
        let mut text = serde_json::to_string_pretty(self).map_err(|e| CatalogError::InvalidArtifact {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        text.push('\n');
        std::fs::write(path, text).map_err(|e| CatalogError::io(path, e))
    }

    /// Recompute every internal node's root from the hashes recorded in the
    /// artifact itself, without touching the catalog.
    ///
    /// Each node uses its recorded `merkle:hash_method`, else its parent's;
    /// `method` applies only where no ancestor records one.
    pub fn check_consistency(&self, method: &HashMethod) -> Result<ConsistencyReport, CatalogError> {
        let mut discrepancies = Vec::new();
        let computed_root = check_node(&self.root, method, &mut discrepancies)?;
        let recorded_root = self.root.root.clone();
        let root_matches = recorded_root.as_deref() == Some(computed_root.as_str());
        Ok(ConsistencyReport {
            computed_root,
            recorded_root,
            root_matches,
            discrepancies,
        })
    }
}

fn check_node(
    node: &ArtifactNode,
    method: &HashMethod,
    discrepancies: &mut Vec<ArtifactDiscrepancy>,
) -> Result<String, CatalogError> {
    if !node.kind.is_internal() {
        return Ok(node.object_hash.clone());
    }

    let method = node.hash_method.as_ref().unwrap_or(method);
    let mut hashes = Vec::with_capacity(node.children.len() + 1);
    for child in &node.children {
        hashes.push(check_node(child, method, discrepancies)?);
    }
    hashes.push(node.object_hash.clone());
    let computed = hasher::compute_merkle_root(hashes, method.function, method.ordering)?;
    debug!(node_id = %node.node_id, computed = %computed, "Recomputed artifact root");

    if node.root.as_deref() != Some(computed.as_str()) {
        warn!(kind = %node.kind, node_id = %node.node_id, "Artifact node has mismatched merkle:root");
        discrepancies.push(ArtifactDiscrepancy {
            node_id: node.node_id.clone(),
            kind: node.kind,
            recorded: node.root.clone(),
            computed: computed.clone(),
        });
    }
    Ok(computed)
}

/// An internal node whose recorded root disagrees with its recorded children
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactDiscrepancy {
    pub node_id: String,
    pub kind: NodeKind,
    pub recorded: Option<String>,
    pub computed: String,
}

/// Outcome of [`VerificationArtifact::check_consistency`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsistencyReport {
    pub computed_root: String,
    pub recorded_root: Option<String>,
    pub root_matches: bool,
    pub discrepancies: Vec<ArtifactDiscrepancy>,
}

impl ConsistencyReport {
    pub fn passed(&self) -> bool {
        self.root_matches && self.discrepancies.is_empty()
    }
}
