//! Cross-layer integration tests for Schemata
//!
//! Tests that drive a document from declaration through linking, snapshots,
//! and teardown.

mod lifecycle;
mod sessions;
mod snapshots;
