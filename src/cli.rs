//! CLI domain: parse, route, output, and presentation only.
//! No domain orchestration; single route table dispatches to tree services.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::{map_error, EXIT_ERROR, EXIT_MISMATCH, EXIT_OK};
pub use parse::{Cli, Commands};
pub use route::{CommandOutput, RunContext};
