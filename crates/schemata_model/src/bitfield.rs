//! Bit-field sets: named bits stored together in one 64-bit integer.

use schemata_foundation::{BitfieldId, Error, NameScope, Result, canonical, eq_ignore_case};

use crate::config::Label;
use crate::naming::{check_name, reserve_one};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Highest usable bit index.
pub const MAX_BIT_INDEX: u8 = 63;

/// One named bit.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BitItem {
    name: String,
    index: u8,
    /// Documentation.
    pub doc: Option<String>,
    /// Per-language display labels.
    pub labels: Vec<Label>,
}

impl BitItem {
    /// Returns the item name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the bit index, 0 through 63.
    #[must_use]
    pub fn index(&self) -> u8 {
        self.index
    }

    /// Returns the item as a mask.
    #[must_use]
    pub fn mask(&self) -> u64 {
        1u64 << self.index
    }
}

/// A declared bit-field set.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bitfield {
    id: BitfieldId,
    name: String,
    canonical: String,
    /// Documentation.
    pub doc: Option<String>,
    items: Vec<BitItem>,
    /// Labels shown when no bit is set.
    pub labels_unset: Vec<Label>,
    /// Labels shown when the value is null.
    pub labels_null: Vec<Label>,
}

impl Bitfield {
    pub(crate) fn new(id: BitfieldId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            canonical: canonical(name),
            doc: None,
            items: Vec::new(),
            labels_unset: Vec::new(),
            labels_null: Vec::new(),
        }
    }

    /// Returns this set's handle.
    #[must_use]
    pub fn id(&self) -> BitfieldId {
        self.id
    }

    /// Returns the declared name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the upper-cased identifier.
    #[must_use]
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Returns the items in declaration order.
    #[must_use]
    pub fn items(&self) -> &[BitItem] {
        &self.items
    }

    /// Looks up an item by name, ignoring ASCII case.
    #[must_use]
    pub fn item(&self, name: &str) -> Option<&BitItem> {
        self.items.iter().find(|i| eq_ignore_case(&i.name, name))
    }

    /// Allocates a named bit.
    ///
    /// Repeated indices are reported by the linker, not here.
    ///
    /// # Errors
    ///
    /// `ReservedName`, `DuplicateName` (within this set), `InvalidDeclaration`
    /// for an index outside 0..=63, or `Exhausted`.
    pub fn allocate_item(&mut self, name: &str, index: i64) -> Result<&mut BitItem> {
        check_name(name, self.items.iter().map(BitItem::name), NameScope::BitItem)?;
        let index = u8::try_from(index)
            .ok()
            .filter(|i| *i <= MAX_BIT_INDEX)
            .ok_or_else(|| {
                Error::invalid_declaration(format!(
                    "bit index {index} of {}.{name} outside 0..={MAX_BIT_INDEX}",
                    self.name
                ))
            })?;
        reserve_one(&mut self.items, "bitfield item")?;
        self.items.push(BitItem {
            name: name.to_string(),
            index,
            doc: None,
            labels: Vec::new(),
        });
        let last = self.items.len() - 1;
        Ok(&mut self.items[last])
    }
}
