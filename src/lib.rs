//! STAC Merkle: Tamper-Evident Catalog Hashing
//!
//! Computes deterministic content hashes for every document of a STAC catalog,
//! aggregates them into per-node Merkle roots, writes the results back into the
//! documents and verifies catalogs against a recorded baseline.

pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod logging;
pub mod tree;
pub mod types;
