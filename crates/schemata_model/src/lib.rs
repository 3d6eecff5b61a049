//! Declaration store, allocation invariants, and teardown for Schemata.
//!
//! This crate provides:
//! - [`Config`] - The document: entities, enumerations, bit-field sets, roles
//! - [`Entity`] and [`Field`] - Declared structures and their members
//! - [`Search`], [`Update`], [`Unique`] - Query, mutation, and uniqueness specs
//! - [`RoleTree`] and [`Rolemap`] - Access-control declarations
//! - [`teardown`] - Deterministic release of a whole document
//!
//! Every allocation operation validates names against the identifier policy
//! and the relevant naming scope before appending; a failed allocation leaves
//! the document unchanged.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod bitfield;
pub mod config;
pub mod entity;
pub mod enumeration;
pub mod field;
mod naming;
pub mod path;
pub mod role;
pub mod rolemap;
pub mod search;
pub mod teardown;
pub mod update;

pub use bitfield::{BitItem, Bitfield, MAX_BIT_INDEX};
pub use config::{Config, Label};
pub use entity::Entity;
pub use enumeration::{EnumItem, Enumeration};
pub use field::{
    DefaultValue, Field, FieldFlags, FieldType, Link, RefAction, Reference, StructSource,
    ValidOp, Validation,
};
pub use path::FieldPath;
pub use role::{ROLE_ALL, ROLE_DEFAULT, ROLE_NONE, Role, RoleTree};
pub use rolemap::{Grant, Operation, Rolemap};
pub use search::{
    Aggregate, AggregateKind, Direction, Distinct, Operator, Order, Search, SearchKind,
    SearchParam,
};
pub use teardown::{Released, teardown};
pub use update::{Constraint, Modifier, Modify, Unique, Update, UpdateKind};
