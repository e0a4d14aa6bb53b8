//! Catalog Merkle Tree
//!
//! Represents a STAC catalog as a Merkle tree, where each document (catalog,
//! collection or item) has a deterministic hash and every catalog and
//! collection carries a root aggregating its subtree.

pub mod artifact;
pub mod builder;
pub mod canonical;
pub mod hasher;
pub mod path;
pub mod verifier;
pub mod walker;
