//! Verification presentation: verify and check-tree reports.

use super::shared::{check_mark, section_title, status_label, to_json};
use crate::error::ApiError;
use crate::tree::artifact::ConsistencyReport;
use crate::tree::verifier::{Baseline, VerificationReport};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;

pub fn format_verification_report_text(report: &VerificationReport) -> String {
    let baseline = match &report.baseline {
        Baseline::Artifact { path } => path.display().to_string(),
        Baseline::Embedded => "embedded document values".to_string(),
    };
    let mut s = format!(
        "{}\n  Baseline: {}\n  Merkle root: {}\n  Nodes checked: {}\n  Result: {}",
        section_title("Verification"),
        baseline,
        report.merkle_root,
        report.nodes.len(),
        status_label(report.passed())
    );

    let failing: Vec<_> = report.nodes.iter().filter(|n| !n.passed()).collect();
    if !failing.is_empty() {
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec!["Type", "ID", "Object hash", "Root"]);
        for node in failing {
            let root = match &node.root {
                Some(check) => check_mark(check.matches()),
                None => "-",
            };
            table.add_row(vec![
                node.kind.as_str(),
                node.node_id.as_str(),
                check_mark(node.object_hash_matches()),
                root,
            ]);
        }
        s.push_str(&format!("\n\nMismatched nodes:\n{}", table));
    }

    if !report.structural.is_empty() {
        s.push_str(&format!("\n\nStructural mismatches ({}):", report.structural.len()));
        for mismatch in &report.structural {
            s.push_str(&format!("\n  - {}", mismatch));
        }
    }
    s
}

pub fn format_verification_report_json(report: &VerificationReport) -> Result<String, ApiError> {
    let out = serde_json::json!({
        "passed": report.passed(),
        "baseline": report.baseline,
        "merkle_root": report.merkle_root,
        "checked_at": report.checked_at.to_rfc3339(),
        "hash_mismatches": report.hash_mismatches().map(|n| &n.node_id).collect::<Vec<_>>(),
        "root_mismatches": report.root_mismatches().map(|n| &n.node_id).collect::<Vec<_>>(),
        "structural": report.structural,
        "nodes": report.nodes,
    });
    to_json(&out)
}

pub fn format_consistency_report_text(report: &ConsistencyReport, node_count: usize) -> String {
    let mut s = format!(
        "{}\n  Nodes: {}\n  Recorded root: {}\n  Computed root: {}\n  Result: {}",
        section_title("Artifact check"),
        node_count,
        report.recorded_root.as_deref().unwrap_or("-"),
        report.computed_root,
        status_label(report.passed())
    );
    if !report.discrepancies.is_empty() {
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec!["Type", "ID", "Recorded root", "Computed root"]);
        for d in &report.discrepancies {
            table.add_row(vec![
                d.kind.as_str(),
                d.node_id.as_str(),
                d.recorded.as_deref().unwrap_or("-"),
                d.computed.as_str(),
            ]);
        }
        s.push_str(&format!("\n\nDiscrepancies ({}):\n{}", report.discrepancies.len(), table));
    }
    s
}

pub fn format_consistency_report_json(report: &ConsistencyReport) -> Result<String, ApiError> {
    to_json(report)
}
