//! Configuration sources, lowest precedence first: global file, catalog file, environment.

pub mod catalog_file;
pub mod environment;
pub mod global_file;
