//! Linker options.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Options controlling a [`Linker`](crate::Linker).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinkConfig {
    /// Re-verify naming invariants before resolving anything. Needed for
    /// documents that did not come through the allocation API.
    pub recheck_declarations: bool,

    /// Log a warning for each declared role no rolemap grants anything.
    pub warn_unused_roles: bool,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            recheck_declarations: true,
            warn_unused_roles: false,
        }
    }
}

impl LinkConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration for documents built in-process through the
    /// allocation API, which already enforced the naming invariants.
    ///
    /// Only the naming re-check is skipped. Handles of entities, fields,
    /// enumerations, and bit-field sets are still checked against their
    /// positions, so a store reordered through `entities_mut` and friends
    /// fails to link instead of binding the wrong declaration. Heights are
    /// always recomputed, overwriting any set by the caller.
    #[must_use]
    pub fn trusted() -> Self {
        Self {
            recheck_declarations: false,
            ..Self::default()
        }
    }

    /// Creates a configuration with every check and warning enabled.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            recheck_declarations: true,
            warn_unused_roles: true,
        }
    }

    /// Builder method to set declaration re-checking.
    #[must_use]
    pub fn with_recheck_declarations(mut self, recheck: bool) -> Self {
        self.recheck_declarations = recheck;
        self
    }

    /// Builder method to set unused-role warnings.
    #[must_use]
    pub fn with_warn_unused_roles(mut self, warn: bool) -> Self {
        self.warn_unused_roles = warn;
        self
    }
}
