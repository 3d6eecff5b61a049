//! The link passes, in execution order.
//!
//! Each pass that writes into the document first computes everything it
//! needs against a shared borrow, then applies the results. A pass that
//! fails therefore writes nothing.

pub(crate) mod declarations;
pub(crate) mod heights;
pub(crate) mod references;
pub(crate) mod rolemaps;
pub(crate) mod roles;
pub(crate) mod specs;

use std::collections::HashSet;

use schemata_foundation::{Error, NameScope, Result, is_reserved};

/// Checks that no name is reserved and none repeats, ignoring ASCII case.
pub(crate) fn check_names<'a>(
    names: impl IntoIterator<Item = &'a str>,
    scope: NameScope,
) -> Result<()> {
    let mut seen = HashSet::new();
    for name in names {
        if is_reserved(name) {
            return Err(Error::reserved_name(name));
        }
        if !seen.insert(name.to_ascii_lowercase()) {
            return Err(Error::duplicate_name(name, scope));
        }
    }
    Ok(())
}

/// Formats `entity.field` for diagnostics.
pub(crate) fn qualified(entity: &str, field: &str) -> String {
    format!("{entity}.{field}")
}
