//! The role tree.
//!
//! Roles live in an arena indexed by [`RoleId`]; each role owns its ordered
//! children through the arena and records its parent. Three roles are always
//! present at the root level: [`ROLE_ALL`], [`ROLE_NONE`], and
//! [`ROLE_DEFAULT`]. Names are unique across the whole tree.

use schemata_foundation::{Error, ErrorContext, NameScope, Result, RoleId, eq_ignore_case};

use crate::naming::{check_name, reserve_one};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The all-access role.
pub const ROLE_ALL: &str = "all";

/// The no-access role.
pub const ROLE_NONE: &str = "none";

/// The fallback role of a fresh connection.
pub const ROLE_DEFAULT: &str = "default";

const IMPLICIT: [&str; 3] = [ROLE_ALL, ROLE_NONE, ROLE_DEFAULT];

/// A node in the role tree.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Role {
    name: String,
    /// Documentation.
    pub doc: Option<String>,
    parent: Option<RoleId>,
    children: Vec<RoleId>,
    implicit: bool,
}

impl Role {
    /// Returns the role name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the parent role, or `None` for a root.
    #[must_use]
    pub fn parent(&self) -> Option<RoleId> {
        self.parent
    }

    /// Returns the child roles in declaration order.
    #[must_use]
    pub fn children(&self) -> &[RoleId] {
        &self.children
    }

    /// Returns true for the three built-in roles.
    #[must_use]
    pub fn is_implicit(&self) -> bool {
        self.implicit
    }
}

/// Arena-backed role tree.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RoleTree {
    roles: Vec<Role>,
    roots: Vec<RoleId>,
}

impl Default for RoleTree {
    fn default() -> Self {
        Self::new()
    }
}

impl RoleTree {
    /// Creates a tree holding only the implicit roles.
    #[must_use]
    pub fn new() -> Self {
        let roles: Vec<Role> = IMPLICIT
            .iter()
            .map(|name| Role {
                name: (*name).to_string(),
                doc: None,
                parent: None,
                children: Vec::new(),
                implicit: true,
            })
            .collect();
        let roots = (0..roles.len())
            .filter_map(|i| RoleId::from_index(i).ok())
            .collect();
        Self { roles, roots }
    }

    /// Allocates a role under `parent`, or at the root level.
    ///
    /// # Errors
    ///
    /// - `ReservedName` if the name is reserved
    /// - `DuplicateName` if any role in the tree has the name
    /// - `InvalidDeclaration` if `parent` is not in this tree
    /// - `Exhausted` if the arena cannot grow
    pub fn allocate(&mut self, parent: Option<RoleId>, name: &str) -> Result<RoleId> {
        check_name(name, self.roles.iter().map(Role::name), NameScope::Role)?;
        if let Some(p) = parent {
            if p.index() >= self.roles.len() {
                return Err(Error::invalid_declaration(format!(
                    "parent of role {name} is not in the role tree"
                )));
            }
        }

        let id = RoleId::from_index(self.roles.len())?;
        reserve_one(&mut self.roles, "role")?;
        match parent {
            Some(p) => reserve_one(&mut self.roles[p.index()].children, "role")?,
            None => reserve_one(&mut self.roots, "role")?,
        }

        self.roles.push(Role {
            name: name.to_string(),
            doc: None,
            parent,
            children: Vec::new(),
            implicit: false,
        });
        match parent {
            Some(p) => self.roles[p.index()].children.push(id),
            None => self.roots.push(id),
        }
        Ok(id)
    }

    /// Looks up a role by name, ignoring ASCII case.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<RoleId> {
        self.roles
            .iter()
            .position(|r| eq_ignore_case(&r.name, name))
            .and_then(|i| RoleId::from_index(i).ok())
    }

    /// Returns a role by handle.
    #[must_use]
    pub fn get(&self, id: RoleId) -> Option<&Role> {
        self.roles.get(id.index())
    }

    /// Returns a role by handle for editing its documentation.
    pub fn get_mut(&mut self, id: RoleId) -> Option<&mut Role> {
        self.roles.get_mut(id.index())
    }

    /// Returns the root roles in declaration order.
    #[must_use]
    pub fn roots(&self) -> &[RoleId] {
        &self.roots
    }

    /// Iterates all roles in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (RoleId, &Role)> {
        self.roles
            .iter()
            .enumerate()
            .filter_map(|(i, r)| RoleId::from_index(i).ok().map(|id| (id, r)))
    }

    /// Returns the number of roles, implicit ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// Returns true if the tree holds no roles at all.
    ///
    /// A tree built with [`RoleTree::new`] is never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Returns the names of the implicit roles.
    #[must_use]
    pub fn implicit_names() -> &'static [&'static str] {
        &IMPLICIT
    }

    /// Returns the ancestors of `id`, nearest first.
    #[must_use]
    pub fn ancestors(&self, id: RoleId) -> Vec<RoleId> {
        let mut out = Vec::new();
        let mut current = self.get(id).and_then(Role::parent);
        while let Some(p) = current {
            out.push(p);
            current = self.get(p).and_then(Role::parent);
        }
        out
    }

    /// Checks that parent and child links describe a single forest.
    ///
    /// Every listed root must have no parent, every listed child must name
    /// its lister as parent, and each role must be reachable from the roots
    /// exactly once. Trees built by [`RoleTree::allocate`] always pass; a
    /// decoded tree may not.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDeclaration` naming the first offending role.
    pub fn check_structure(&self) -> Result<()> {
        let broken = |id: RoleId, what: &str| {
            let name = self.get(id).map_or("?", Role::name);
            Error::invalid_declaration(format!("role {name} {what}"))
                .with_context(ErrorContext::new().with_spec(name))
        };

        let mut reached = vec![false; self.roles.len()];
        let mut pending: Vec<(Option<RoleId>, RoleId)> =
            self.roots.iter().rev().map(|&r| (None, r)).collect();
        while let Some((lister, id)) = pending.pop() {
            let Some(role) = self.get(id) else {
                return Err(Error::invalid_declaration(format!(
                    "role tree lists unknown role {}",
                    id.index()
                )));
            };
            if role.parent != lister {
                return Err(broken(id, "is listed under the wrong parent"));
            }
            if std::mem::replace(&mut reached[id.index()], true) {
                return Err(broken(id, "is listed more than once"));
            }
            pending.extend(role.children.iter().rev().map(|&c| (Some(id), c)));
        }

        match reached.iter().position(|r| !r) {
            Some(i) => Err(broken(RoleId::from_index(i)?, "is detached")),
            None => Ok(()),
        }
    }

    /// Releases the tree depth-first from the roots, returning the number of
    /// declared (non-implicit) roles released.
    pub(crate) fn release(mut self) -> usize {
        let roots = std::mem::take(&mut self.roots);
        roots.into_iter().map(|r| self.release_subtree(r)).sum()
    }

    fn release_subtree(&mut self, id: RoleId) -> usize {
        let Some(role) = self.roles.get_mut(id.index()) else {
            return 0;
        };
        let children = std::mem::take(&mut role.children);
        let own = usize::from(!role.implicit);
        role.doc = None;
        own + children
            .into_iter()
            .map(|c| self.release_subtree(c))
            .sum::<usize>()
    }
}
