//! Update, delete, and unique specifications.
//!
//! An update separates the fields it modifies from the fields that constrain
//! which rows are modified. A delete is an update with no modified fields.

use schemata_foundation::eq_ignore_case;

use crate::path::FieldPath;
use crate::search::Operator;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Whether a mutation updates or deletes rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UpdateKind {
    /// Modify matching rows.
    Update,
    /// Delete matching rows.
    Delete,
}

/// How a modified field receives its new value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Modifier {
    /// Replace the value (passwords are hashed first).
    #[default]
    Set,
    /// Add to the value.
    Inc,
    /// Subtract from the value.
    Dec,
    /// Append to the value.
    Concat,
    /// Replace the value without hashing, even for passwords.
    StrSet,
}

/// A modified field.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Modify {
    /// The modified field; always local.
    pub path: FieldPath,
    /// How it is modified.
    pub modifier: Modifier,
}

/// A constraint selecting the rows to modify or delete.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Constraint {
    /// The constrained field.
    pub path: FieldPath,
    /// The comparison.
    pub op: Operator,
}

/// An update or delete specification.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Update {
    name: Option<String>,
    kind: UpdateKind,
    /// Documentation.
    pub doc: Option<String>,
    /// Modified fields, in declaration order. Always empty for deletes.
    pub modify: Vec<Modify>,
    /// Constraining fields, in declaration order.
    pub constrain: Vec<Constraint>,
}

impl Update {
    pub(crate) fn new(kind: UpdateKind, name: Option<&str>) -> Self {
        Self {
            name: name.map(String::from),
            kind,
            doc: None,
            modify: Vec::new(),
            constrain: Vec::new(),
        }
    }

    /// Returns the declared name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns whether this is an update or a delete.
    #[must_use]
    pub fn kind(&self) -> UpdateKind {
        self.kind
    }

    /// Returns a printable label: the name, or the modified and constraining
    /// field names.
    #[must_use]
    pub fn label(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        let modify = self.modify.iter().map(|m| m.path.dotted());
        let constrain = self.constrain.iter().map(|c| c.path.dotted());
        if self.modify.is_empty() {
            constrain.collect::<Vec<_>>().join("_")
        } else {
            format!(
                "{}_by_{}",
                modify.collect::<Vec<_>>().join("_"),
                constrain.collect::<Vec<_>>().join("_")
            )
        }
    }

    /// Adds a modified field.
    pub fn add_modify(&mut self, field: &str, modifier: Modifier) -> &mut Self {
        self.modify.push(Modify {
            path: FieldPath::parse(field),
            modifier,
        });
        self
    }

    /// Adds a constraint from a dotted path.
    pub fn add_constraint(&mut self, path: &str, op: Operator) -> &mut Self {
        self.constrain.push(Constraint {
            path: FieldPath::parse(path),
            op,
        });
        self
    }
}

/// A multi-column uniqueness constraint over local fields.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Unique {
    /// The fields, in declaration order.
    pub fields: Vec<FieldPath>,
}

impl Unique {
    pub(crate) fn new(fields: &[&str]) -> Self {
        Self {
            fields: fields.iter().map(|f| FieldPath::parse(f)).collect(),
        }
    }

    /// Returns the order-insensitive key used to detect duplicate constraints.
    #[must_use]
    pub fn key(&self) -> String {
        let mut names: Vec<_> = self
            .fields
            .iter()
            .map(|f| f.dotted().to_ascii_lowercase())
            .collect();
        names.sort();
        names.join(",")
    }

    /// Returns the first field named more than once, ignoring ASCII case.
    #[must_use]
    pub fn repeated_field(&self) -> Option<String> {
        self.fields.iter().enumerate().find_map(|(i, path)| {
            let dotted = path.dotted();
            self.fields[..i]
                .iter()
                .any(|p| eq_ignore_case(&p.dotted(), &dotted))
                .then_some(dotted)
        })
    }
}
