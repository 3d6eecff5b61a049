//! Pass 3: role-tree consistency.
//!
//! The tree must be a forest reachable from its roots, hold the implicit
//! roles, and carry unique, unreserved names.

use std::collections::HashSet;

use schemata_foundation::{Error, ErrorContext, NameScope, Result, is_reserved};
use schemata_model::RoleTree;

pub(crate) fn check(tree: &RoleTree) -> Result<()> {
    for name in RoleTree::implicit_names() {
        let present = tree
            .find(name)
            .and_then(|id| tree.get(id))
            .is_some_and(|r| r.is_implicit() && r.parent().is_none());
        if !present {
            return Err(Error::invalid_declaration(format!(
                "implicit role {name} missing from the role tree"
            )));
        }
    }

    tree.check_structure()?;

    let mut seen = HashSet::new();
    for (_, role) in tree.iter() {
        let context = || ErrorContext::new().with_spec(role.name());
        if !role.is_implicit() && is_reserved(role.name()) {
            return Err(Error::reserved_name(role.name()).with_context(context()));
        }
        if !seen.insert(role.name().to_ascii_lowercase()) {
            return Err(Error::duplicate_name(role.name(), NameScope::Role).with_context(context()));
        }
    }
    Ok(())
}
