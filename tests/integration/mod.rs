//! Integration tests for STAC catalog hashing and verification

mod catalog_layout;
mod cli;
mod propagation;
mod test_utils;
mod verification;
