//! Schemata - Schema compiler core
//!
//! This crate re-exports all layers of the Schemata system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: schemata_runtime    - Compile sessions, snapshots, CLI
//! Layer 2: schemata_linker     - Reference resolution, heights, role binding
//! Layer 1: schemata_model      - Declaration store, allocation, teardown
//! Layer 0: schemata_foundation - Errors, handles, identifier policy
//! ```

pub use schemata_foundation as foundation;
pub use schemata_linker as linker;
pub use schemata_model as model;
pub use schemata_runtime as runtime;
