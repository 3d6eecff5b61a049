//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: Error, handles, and the identifier policy.

mod errors;
mod handles;
mod idents;
