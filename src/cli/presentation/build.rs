//! Build presentation: summary of a compute run.

use crate::tree::builder::BuildOutcome;

pub fn format_build_outcome(outcome: &BuildOutcome) -> String {
    format!(
        "Merkle build completed:\n  Merkle root: {}\n  Nodes: {}\n  Artifact: {}",
        outcome.merkle_root,
        outcome.node_count,
        outcome.artifact_path.display()
    )
}
