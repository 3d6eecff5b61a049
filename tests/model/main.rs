//! Integration tests for Layer 1: Model
//!
//! Tests for the declaration store: allocation, naming scopes, and teardown.

mod allocation;
mod roles;
mod teardown;
