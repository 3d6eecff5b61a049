//! Error types, identifier policy, and stable handles for Schemata.
//!
//! This crate provides:
//! - [`Error`] - Structured errors with kind, phase, and link context
//! - [`ident`] - The reserved-word policy consulted by every naming operation
//! - [`EntityId`], [`FieldId`], [`RoleId`], [`EnumId`], [`BitfieldId`] - Non-owning handles
//!   used by resolved cross-references

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod handle;
pub mod ident;

pub use error::{Error, ErrorContext, ErrorKind, LinkPass, NameScope, Phase, Result};
pub use handle::{BitfieldId, EntityId, EnumId, FieldId, RoleId};
pub use ident::{canonical, eq_ignore_case, is_reserved};
