//! Multi-pass linker for Schemata documents.
//!
//! This crate provides:
//! - [`Linker`] - Consumes a [`Config`] and resolves every by-name reference
//! - [`LinkConfig`] - Linker options
//! - [`LinkedConfig`] - The read-only, fully resolved view handed to generators
//!
//! Passes run in a fixed order: declarations, references, heights, roles,
//! rolemaps, specs. Any failure tears the document down and returns only the
//! error, so a partially linked document is never observable.
//!
//! [`Config`]: schemata_model::Config

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod linked;
pub mod linker;
mod pass;

pub use config::LinkConfig;
pub use linked::LinkedConfig;
pub use linker::{Linker, link};
