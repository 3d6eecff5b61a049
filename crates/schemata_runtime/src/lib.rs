//! Compile sessions, snapshots, and the command-line tool for Schemata.
//!
//! This crate provides:
//! - [`Session`] - Drives declarations into a document, collecting diagnostics
//! - [`snapshot`] - `MessagePack` encoding of documents between processes
//! - The `schemata` binary, which links snapshots and prints the result

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod session;
pub mod snapshot;

pub use session::{CompileError, Diagnostic, Session};
pub use snapshot::{from_bytes, load_from_file, save_to_file, to_bytes};
