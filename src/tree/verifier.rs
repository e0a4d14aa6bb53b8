//! Verifier: recomputes hashes and diffs them against a baseline
//!
//! The baseline is either a verification artifact written by the builder or
//! the values embedded in the documents themselves. Nothing is written.

use crate::error::CatalogError;
use crate::tree::artifact::{ArtifactNode, VerificationArtifact};
use crate::tree::builder::MerkleBuilder;
use crate::tree::walker::WalkerConfig;
use crate::types::{HashMethod, NodeKind};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info, instrument, warn};

/// Expected vs. recomputed value of one digest
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HashCheck {
    /// `None` when the baseline has no value
    pub expected: Option<String>,
    pub actual: String,
}

impl HashCheck {
    fn new(expected: &str, actual: &str) -> Self {
        Self {
            expected: Some(expected.to_string()).filter(|e| !e.is_empty()),
            actual: actual.to_string(),
        }
    }

    pub fn matches(&self) -> bool {
        self.expected.as_deref() == Some(self.actual.as_str())
    }
}

/// Per-node verification result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeReport {
    pub node_id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub object_hash: HashCheck,
    /// Catalogs and collections only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<HashCheck>,
}

impl NodeReport {
    pub fn object_hash_matches(&self) -> bool {
        self.object_hash.matches()
    }

    pub fn root_matches(&self) -> bool {
        self.root.as_ref().map_or(true, HashCheck::matches)
    }

    pub fn passed(&self) -> bool {
        self.object_hash_matches() && self.root_matches()
    }
}

/// A node present on one side of the comparison only
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mismatch", rename_all = "snake_case")]
pub enum StructuralMismatch {
    /// In the catalog on disk but not in the baseline
    MissingFromBaseline {
        parent_id: String,
        node_id: String,
        #[serde(rename = "type")]
        kind: NodeKind,
    },
    /// In the baseline but no longer in the catalog
    MissingFromCatalog {
        parent_id: String,
        node_id: String,
        #[serde(rename = "type")]
        kind: NodeKind,
    },
    /// The top-level nodes do not describe the same catalog
    RootIdentity {
        expected_id: String,
        expected_kind: NodeKind,
        actual_id: String,
        actual_kind: NodeKind,
    },
}

impl std::fmt::Display for StructuralMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StructuralMismatch::MissingFromBaseline {
                parent_id,
                node_id,
                kind,
            } => write!(f, "{} '{}' under '{}' is not in the baseline", kind, node_id, parent_id),
            StructuralMismatch::MissingFromCatalog {
                parent_id,
                node_id,
                kind,
            } => write!(f, "{} '{}' under '{}' is missing from the catalog", kind, node_id, parent_id),
            StructuralMismatch::RootIdentity {
                expected_id,
                expected_kind,
                actual_id,
                actual_kind,
            } => write!(
                f,
                "baseline describes {} '{}' but the catalog root is {} '{}'",
                expected_kind, expected_id, actual_kind, actual_id
            ),
        }
    }
}

/// What the recomputed hashes were compared against
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Baseline {
    Artifact { path: PathBuf },
    Embedded,
}

/// Outcome of a verification pass
#[derive(Debug, Clone, Serialize)]
pub struct VerificationReport {
    pub baseline: Baseline,
    /// Recomputed top-level `merkle:root`
    pub merkle_root: String,
    pub nodes: Vec<NodeReport>,
    pub structural: Vec<StructuralMismatch>,
    pub checked_at: DateTime<Utc>,
}

impl VerificationReport {
    /// True only when every node matches and the structures agree
    pub fn passed(&self) -> bool {
        self.structural.is_empty() && self.nodes.iter().all(NodeReport::passed)
    }

    /// Nodes whose own content changed
    pub fn hash_mismatches(&self) -> impl Iterator<Item = &NodeReport> {
        self.nodes.iter().filter(|n| !n.object_hash_matches())
    }

    /// Internal nodes whose aggregate changed
    pub fn root_mismatches(&self) -> impl Iterator<Item = &NodeReport> {
        self.nodes.iter().filter(|n| !n.root_matches())
    }

    pub fn first_structural_mismatch(&self) -> Option<&StructuralMismatch> {
        self.structural.first()
    }
}

/// Verifies a catalog on disk without modifying it
pub struct Verifier {
    root: PathBuf,
    hash_method: HashMethod,
    walker_config: WalkerConfig,
}

impl Verifier {
    /// Create a verifier for a catalog document or the directory holding it
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            hash_method: HashMethod::default(),
            walker_config: WalkerConfig::default(),
        }
    }

    /// Hash method used where no document declares one
    pub fn with_hash_method(mut self, method: HashMethod) -> Self {
        self.hash_method = method;
        self
    }

    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Compare recomputed hashes with a verification artifact.
    #[instrument(skip(self), fields(catalog = %self.root.display()))]
    pub fn verify(&self, artifact_path: &Path) -> Result<VerificationReport, CatalogError> {
        let expected = VerificationArtifact::load(artifact_path)?;
        self.run(
            Baseline::Artifact {
                path: artifact_path.to_path_buf(),
            },
            |_| expected,
        )
    }

    /// Compare recomputed hashes with the values embedded in each document.
    #[instrument(skip(self), fields(catalog = %self.root.display()))]
    pub fn verify_embedded(&self) -> Result<VerificationReport, CatalogError> {
        self.run(Baseline::Embedded, |hashed| hashed.embedded_artifact())
    }

    fn run<F>(&self, baseline: Baseline, expected: F) -> Result<VerificationReport, CatalogError>
    where
        F: FnOnce(&crate::tree::builder::HashedCatalog) -> VerificationArtifact,
    {
        let start = Instant::now();
        info!(baseline = ?baseline, "Starting verification");

        let hashed = MerkleBuilder::new(self.root.clone())
            .with_hash_method(self.hash_method.clone())
            .with_walker_config(self.walker_config.clone())
            .compute()?;
        let expected = expected(&hashed);
        let actual = hashed.to_artifact();

        let mut report = VerificationReport {
            baseline,
            merkle_root: hashed.merkle_root().to_string(),
            nodes: Vec::with_capacity(hashed.tree.len()),
            structural: Vec::new(),
            checked_at: Utc::now(),
        };

        if expected.root.node_id != actual.root.node_id || expected.root.kind != actual.root.kind {
            report.structural.push(StructuralMismatch::RootIdentity {
                expected_id: expected.root.node_id.clone(),
                expected_kind: expected.root.kind,
                actual_id: actual.root.node_id.clone(),
                actual_kind: actual.root.kind,
            });
        }
        diff_node(&expected.root, &actual.root, &mut report);

        let hash_mismatches = report.hash_mismatches().count();
        let root_mismatches = report.root_mismatches().count();
        if report.passed() {
            info!(
                node_count = report.nodes.len(),
                merkle_root = %report.merkle_root,
                duration_ms = start.elapsed().as_millis(),
                "Verification successful"
            );
        } else {
            error!(
                node_count = report.nodes.len(),
                hash_mismatches,
                root_mismatches,
                structural_mismatches = report.structural.len(),
                duration_ms = start.elapsed().as_millis(),
                "Verification failed"
            );
        }
        Ok(report)
    }
}

/// Compare two matched nodes, then pair their children by `(type, node_id)`.
fn diff_node(expected: &ArtifactNode, actual: &ArtifactNode, report: &mut VerificationReport) {
    let node_report = NodeReport {
        node_id: actual.node_id.clone(),
        kind: actual.kind,
        object_hash: HashCheck::new(&expected.object_hash, &actual.object_hash),
        root: actual
            .root
            .as_deref()
            .map(|root| HashCheck::new(expected.root.as_deref().unwrap_or_default(), root)),
    };

    if node_report.passed() {
        info!(kind = %actual.kind, id = %actual.node_id, "Verified node");
    } else {
        warn!(
            kind = %actual.kind,
            id = %actual.node_id,
            object_hash_matches = node_report.object_hash_matches(),
            root_matches = node_report.root_matches(),
            "Node does not match baseline"
        );
    }
    report.nodes.push(node_report);

    let mut remaining: Vec<&ArtifactNode> = expected.children.iter().collect();
    for child in &actual.children {
        let position = remaining
            .iter()
            .position(|e| e.kind == child.kind && e.node_id == child.node_id);
        match position {
            Some(position) => {
                let expected_child = remaining.remove(position);
                diff_node(expected_child, child, report);
            }
            None => {
                let mismatch = StructuralMismatch::MissingFromBaseline {
                    parent_id: actual.node_id.clone(),
                    node_id: child.node_id.clone(),
                    kind: child.kind,
                };
                warn!("{}", mismatch);
                report.structural.push(mismatch);
            }
        }
    }

    for missing in remaining {
        let mismatch = StructuralMismatch::MissingFromCatalog {
            parent_id: actual.node_id.clone(),
            node_id: missing.node_id.clone(),
            kind: missing.kind,
        };
        warn!("{}", mismatch);
        report.structural.push(mismatch);
    }
}
