//! Dotted field paths used by search, update, and unique specs.
//!
//! Before linking a path is a list of names, e.g. `["user", "email"]` for
//! `user.email`. After linking it also carries the chain of resolved fields,
//! one per component; every component but the last is a reference or struct
//! field leading into the next entity.

use std::fmt;

use schemata_foundation::FieldId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A dotted path of field names and, once linked, the fields they name.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldPath {
    names: Vec<String>,
    #[cfg_attr(feature = "serde", serde(skip))]
    chain: Vec<FieldId>,
}

impl FieldPath {
    /// Creates an unresolved path from its components.
    #[must_use]
    pub fn new(names: Vec<String>) -> Self {
        Self {
            names,
            chain: Vec::new(),
        }
    }

    /// Creates an unresolved path from a dotted string like `user.email`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        Self::new(s.split('.').map(String::from).collect())
    }

    /// Returns the name components.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Returns the resolved chain (empty before linking).
    #[must_use]
    pub fn chain(&self) -> &[FieldId] {
        &self.chain
    }

    /// Returns the resolved terminal field.
    #[must_use]
    pub fn terminal(&self) -> Option<FieldId> {
        self.chain.last().copied()
    }

    /// Returns true if every component has been resolved.
    ///
    /// An empty path has nothing to resolve and always reports true. The
    /// linker only accepts one as a distinct selection of the searched entity.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.chain.len() == self.names.len()
    }

    /// Returns true if the path stays within the owning entity.
    #[must_use]
    pub fn is_local(&self) -> bool {
        self.names.len() == 1
    }

    /// Returns the dotted form of the path.
    #[must_use]
    pub fn dotted(&self) -> String {
        self.names.join(".")
    }

    /// Stores the resolved chain. Called by the linker.
    pub fn bind(&mut self, chain: Vec<FieldId>) {
        self.chain = chain;
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dotted())
    }
}
