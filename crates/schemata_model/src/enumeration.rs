//! Enumerations: named sets of integer-valued items.

use schemata_foundation::{EnumId, NameScope, Result, canonical, eq_ignore_case};

use crate::config::Label;
use crate::naming::{check_name, reserve_one};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One item of an enumeration.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EnumItem {
    name: String,
    /// The item's value. Items declared without one are numbered by the linker.
    pub value: Option<i64>,
    /// Documentation.
    pub doc: Option<String>,
    /// Per-language display labels.
    pub labels: Vec<Label>,
}

impl EnumItem {
    /// Returns the item name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A declared enumeration.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Enumeration {
    id: EnumId,
    name: String,
    canonical: String,
    /// Documentation.
    pub doc: Option<String>,
    items: Vec<EnumItem>,
}

impl Enumeration {
    pub(crate) fn new(id: EnumId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            canonical: canonical(name),
            doc: None,
            items: Vec::new(),
        }
    }

    /// Returns this enumeration's handle.
    #[must_use]
    pub fn id(&self) -> EnumId {
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
    pub fn items(&self) -> &[EnumItem] {
        &self.items
    }

    /// Mutable access to the items for numbering. Called by the linker.
    pub fn items_mut(&mut self) -> &mut [EnumItem] {
        &mut self.items
    }

    /// Looks up an item by name, ignoring ASCII case.
    #[must_use]
    pub fn item(&self, name: &str) -> Option<&EnumItem> {
        self.items.iter().find(|i| eq_ignore_case(&i.name, name))
    }

    /// Returns true if some item carries `value`.
    #[must_use]
    pub fn has_value(&self, value: i64) -> bool {
        self.items.iter().any(|i| i.value == Some(value))
    }

    /// Allocates an item.
    ///
    /// # Errors
    ///
    /// `ReservedName`, `DuplicateName` (within this enumeration), or `Exhausted`.
    pub fn allocate_item(&mut self, name: &str) -> Result<&mut EnumItem> {
        check_name(name, self.items.iter().map(EnumItem::name), NameScope::EnumItem)?;
        reserve_one(&mut self.items, "enumeration item")?;
        self.items.push(EnumItem {
            name: name.to_string(),
            value: None,
            doc: None,
            labels: Vec::new(),
        });
        let last = self.items.len() - 1;
        Ok(&mut self.items[last])
    }
}
