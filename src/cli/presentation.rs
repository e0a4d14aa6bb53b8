//! CLI presentation: text and json formatters per command family.

mod build;
mod shared;
mod verify;

pub use build::format_build_outcome;
pub use verify::{
    format_consistency_report_json, format_consistency_report_text,
    format_verification_report_json, format_verification_report_text,
};
