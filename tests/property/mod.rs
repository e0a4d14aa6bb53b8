//! Property-based tests for canonical encoding and root computation

mod determinism;
