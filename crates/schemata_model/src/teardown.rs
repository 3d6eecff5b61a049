//! Releasing a whole document.
//!
//! Every declaration is exclusively owned by its parent, so teardown is
//! structural: it consumes the [`Config`] and drops each part in a fixed
//! order. Resolved handles are plain indices and are never followed.

use tracing::trace;

use crate::config::Config;

/// Counts of declarations released by [`teardown`].
///
/// Implicit roles and the default output language are not counted, so
/// tearing down a fresh document yields `Released::default()`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Released {
    /// Enumerations.
    pub enumerations: usize,
    /// Declared roles.
    pub roles: usize,
    /// Bit-field sets.
    pub bitfields: usize,
    /// Entities.
    pub entities: usize,
    /// Fields across all entities.
    pub fields: usize,
    /// Search, update, delete, and unique specs across all entities.
    pub specs: usize,
    /// Rolemap entries across all entities.
    pub grants: usize,
    /// Output languages besides the default.
    pub languages: usize,
    /// Source file names.
    pub source_files: usize,
}

impl Released {
    /// Returns true if nothing declared was released.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Releases a document. `None` is accepted and releases nothing.
///
/// Order: enumerations, roles (depth-first over children), bit-field sets,
/// then each entity with its fields, specs, and rolemap, then the tables.
#[must_use = "the counts report what was released"]
pub fn teardown(config: Option<Config>) -> Released {
    let Some(config) = config else {
        trace!("teardown of absent document");
        return Released::default();
    };
    let parts = config.into_parts();
    let mut released = Released::default();

    released.enumerations = parts.enums.len();
    drop(parts.enums);

    released.roles = parts.roles.release();

    released.bitfields = parts.bitfields.len();
    drop(parts.bitfields);

    for entity in parts.entities {
        let (fields, specs, rolemap) = entity.into_parts();
        released.fields += fields.len();
        released.specs += specs;
        released.grants += rolemap.len();
        released.entities += 1;
    }

    released.languages = parts.langs.len().saturating_sub(1);
    released.source_files = parts.fnames.len();

    trace!(?released, "document released");
    released
}
