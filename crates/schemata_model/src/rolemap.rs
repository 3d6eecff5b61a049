//! Per-entity role grants.
//!
//! A rolemap records, for each data-access operation on an entity, which
//! roles may invoke it. Grants are explicit: a role listed for one operation
//! is not implied for any other, and nothing propagates up or down the role
//! tree. The only shorthand is [`Operation::All`], which is itself an
//! explicit grant of every operation.

use std::fmt;

use schemata_foundation::{NameScope, Result, RoleId, eq_ignore_case};

use crate::naming::{check_unique, reserve_one};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A data-access operation that can be granted to roles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Operation {
    /// Every operation on the entity.
    All,
    /// Insert a row.
    Insert,
    /// A search returning one row.
    Search,
    /// A search returning a list.
    List,
    /// A search iterating rows.
    Iterate,
    /// A search counting rows.
    Count,
    /// An update.
    Update,
    /// A delete.
    Delete,
    /// Hide a field from serialized output for these roles.
    NoExport,
}

impl Operation {
    /// Returns true if the operation must name a target spec or field.
    #[must_use]
    pub const fn takes_target(self) -> bool {
        !matches!(self, Self::All | Self::Insert)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::All => "all",
            Self::Insert => "insert",
            Self::Search => "search",
            Self::List => "list",
            Self::Iterate => "iterate",
            Self::Count => "count",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::NoExport => "noexport",
        };
        f.write_str(s)
    }
}

/// Roles granted one operation, optionally on one named spec or field.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Grant {
    op: Operation,
    target: Option<String>,
    roles: Vec<String>,
    #[cfg_attr(feature = "serde", serde(skip))]
    resolved_roles: Vec<RoleId>,
    #[cfg_attr(feature = "serde", serde(skip))]
    resolved_target: Option<usize>,
}

impl Grant {
    /// Returns the operation.
    #[must_use]
    pub fn op(&self) -> Operation {
        self.op
    }

    /// Returns the targeted spec or field name.
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Returns the granted role names, in declaration order.
    #[must_use]
    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    /// Returns the resolved roles (empty before linking).
    #[must_use]
    pub fn resolved_roles(&self) -> &[RoleId] {
        &self.resolved_roles
    }

    /// Returns the position of the targeted spec or field in its owning list.
    #[must_use]
    pub fn resolved_target(&self) -> Option<usize> {
        self.resolved_target
    }

    /// Stores resolved roles and target. Called by the linker.
    pub fn bind(&mut self, roles: Vec<RoleId>, target: Option<usize>) {
        self.resolved_roles = roles;
        self.resolved_target = target;
    }

    fn matches(&self, op: Operation, target: Option<&str>) -> bool {
        self.op == op
            && match (&self.target, target) {
                (None, None) => true,
                (Some(a), Some(b)) => eq_ignore_case(a, b),
                _ => false,
            }
    }

    fn names_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| eq_ignore_case(r, role))
    }
}

/// All grants declared for one entity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rolemap {
    grants: Vec<Grant>,
}

impl Rolemap {
    /// Creates an empty rolemap.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Grants `role` the operation `op` (on `target`, if given).
    ///
    /// # Errors
    ///
    /// - `DuplicateName` if the role was already granted this exact entry
    /// - `Exhausted` if storage cannot grow
    pub fn grant(&mut self, op: Operation, target: Option<&str>, role: &str) -> Result<()> {
        if let Some(grant) = self.grants.iter_mut().find(|g| g.matches(op, target)) {
            check_unique(role, grant.roles.iter().map(String::as_str), NameScope::Grant)?;
            reserve_one(&mut grant.roles, "rolemap")?;
            grant.roles.push(role.to_string());
            return Ok(());
        }

        reserve_one(&mut self.grants, "rolemap")?;
        self.grants.push(Grant {
            op,
            target: target.map(String::from),
            roles: vec![role.to_string()],
            resolved_roles: Vec::new(),
            resolved_target: None,
        });
        Ok(())
    }

    /// Returns true if `role` was explicitly granted `op` on `target`, either
    /// directly or through an [`Operation::All`] grant.
    #[must_use]
    pub fn permits(&self, op: Operation, target: Option<&str>, role: &str) -> bool {
        self.grants
            .iter()
            .filter(|g| g.matches(op, target) || g.op == Operation::All)
            .any(|g| g.names_role(role))
    }

    /// Returns the grants in declaration order.
    #[must_use]
    pub fn grants(&self) -> &[Grant] {
        &self.grants
    }

    /// Mutable access to the grants for binding. Called by the linker.
    pub fn grants_mut(&mut self) -> &mut [Grant] {
        &mut self.grants
    }

    /// Returns true if nothing was granted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }

    /// Returns the number of distinct grant entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.grants.len()
    }
}
