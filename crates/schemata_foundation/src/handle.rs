//! Stable, non-owning handles into the declaration store.
//!
//! Resolved cross-references (reference targets, struct sources, role grants)
//! are stored as handles rather than pointers, so releasing a document never
//! follows them.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

macro_rules! index_handle {
    ($(#[$meta:meta])* $name:ident, $what:literal) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        pub struct $name(u32);

        impl $name {
            /// Creates a handle for the given collection index.
            ///
            /// # Errors
            ///
            /// Returns `Exhausted` if the index does not fit in a handle.
            pub fn from_index(index: usize) -> Result<Self> {
                u32::try_from(index)
                    .map(Self)
                    .map_err(|_| Error::exhausted($what))
            }

            /// Returns the collection index of this handle.
            #[must_use]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

index_handle!(
    /// Handle to an entity in declaration order.
    EntityId,
    "entity"
);

index_handle!(
    /// Handle to a role in the role tree arena.
    RoleId,
    "role"
);

index_handle!(
    /// Handle to an enumeration in declaration order.
    EnumId,
    "enumeration"
);

index_handle!(
    /// Handle to a bit-field set in declaration order.
    BitfieldId,
    "bitfield"
);

/// Handle to a field: its owning entity plus its position in that entity.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldId {
    /// The owning entity.
    pub entity: EntityId,
    /// Position within the entity's field list.
    pub index: u32,
}

impl FieldId {
    /// Creates a field handle.
    ///
    /// # Errors
    ///
    /// Returns `Exhausted` if the index does not fit in a handle.
    pub fn new(entity: EntityId, index: usize) -> Result<Self> {
        let index = u32::try_from(index).map_err(|_| Error::exhausted("field"))?;
        Ok(Self { entity, index })
    }

    /// Returns the position within the owning entity.
    #[must_use]
    pub const fn position(self) -> usize {
        self.index as usize
    }
}

impl fmt::Debug for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldId({}.{})", self.entity.0, self.index)
    }
}
