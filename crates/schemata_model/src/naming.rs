//! Shared name checks used by every allocation operation.

use schemata_foundation::{Error, NameScope, Result, eq_ignore_case, is_reserved};

/// Rejects reserved names and names already present in `existing`.
pub(crate) fn check_name<'a>(
    name: &str,
    existing: impl IntoIterator<Item = &'a str>,
    scope: NameScope,
) -> Result<()> {
    if name.is_empty() {
        return Err(Error::invalid_declaration(format!("empty {scope} name")));
    }
    if is_reserved(name) {
        return Err(Error::reserved_name(name));
    }
    check_unique(name, existing, scope)
}

/// Rejects `name` if it is already present in `existing`.
pub(crate) fn check_unique<'a>(
    name: &str,
    existing: impl IntoIterator<Item = &'a str>,
    scope: NameScope,
) -> Result<()> {
    if existing.into_iter().any(|other| eq_ignore_case(other, name)) {
        return Err(Error::duplicate_name(name, scope));
    }
    Ok(())
}

/// Makes room for one more element, reporting exhaustion as an error.
pub(crate) fn reserve_one<T>(items: &mut Vec<T>, what: &'static str) -> Result<()> {
    items.try_reserve(1).map_err(|_| Error::exhausted(what))
}
