//! Search specifications: named queries over an entity.

use std::fmt;

use crate::path::FieldPath;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What a search returns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SearchKind {
    /// A single row (or the first match).
    #[default]
    Search,
    /// All matching rows as a list.
    List,
    /// All matching rows through a callback.
    Iterate,
    /// The number of matching rows.
    Count,
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Search => "search",
            Self::List => "list",
            Self::Iterate => "iterate",
            Self::Count => "count",
        };
        f.write_str(s)
    }
}

/// Comparison operator of a search parameter or update constraint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Operator {
    /// Equality.
    #[default]
    Eq,
    /// Inequality.
    Ne,
    /// Less than.
    Lt,
    /// Less than or equal.
    Le,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Ge,
    /// Substring match.
    Like,
    /// Bitwise and is non-zero.
    And,
    /// Bitwise or is non-zero.
    Or,
    /// Value is null; takes no argument.
    IsNull,
    /// Value is not null; takes no argument.
    NotNull,
    /// Text equality (including passwords, compared as plain strings).
    StrEq,
    /// Text inequality.
    StrNe,
}

impl Operator {
    /// Returns true if the operator takes no argument.
    #[must_use]
    pub const fn is_unary(self) -> bool {
        matches!(self, Self::IsNull | Self::NotNull)
    }
}

/// One constraint of a search: a field path compared with an operator.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchParam {
    /// The constrained field.
    pub path: FieldPath,
    /// The comparison.
    pub op: Operator,
}

/// Sort direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

/// An ordering directive.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Order {
    /// The field ordered by.
    pub path: FieldPath,
    /// The direction.
    pub direction: Direction,
}

/// Which row an aggregate keeps per group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AggregateKind {
    /// Row with the smallest value.
    MinRow,
    /// Row with the largest value.
    MaxRow,
}

/// Keep one row per group, chosen by the minimum or maximum of a field.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Aggregate {
    /// Minimum or maximum.
    pub kind: AggregateKind,
    /// The field compared.
    pub path: FieldPath,
    /// The field grouped by.
    pub group: FieldPath,
}

/// Return distinct rows of the entity reached by a struct path.
///
/// An empty path means distinct rows of the searched entity itself.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Distinct {
    /// The struct path, possibly empty.
    pub path: FieldPath,
}

/// A search specification.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Search {
    name: Option<String>,
    kind: SearchKind,
    /// Documentation.
    pub doc: Option<String>,
    /// Parameters, in declaration order.
    pub params: Vec<SearchParam>,
    /// Ordering directives, in declaration order.
    pub orders: Vec<Order>,
    /// Optional aggregate row selection.
    pub aggregate: Option<Aggregate>,
    /// Optional distinct selection.
    pub distinct: Option<Distinct>,
    /// Maximum number of rows.
    pub limit: Option<u64>,
    /// Rows skipped before returning.
    pub offset: Option<u64>,
    #[cfg_attr(feature = "serde", serde(skip))]
    unique: bool,
}

impl Search {
    pub(crate) fn new(kind: SearchKind, name: Option<&str>) -> Self {
        Self {
            name: name.map(String::from),
            kind,
            doc: None,
            params: Vec::new(),
            orders: Vec::new(),
            aggregate: None,
            distinct: None,
            limit: None,
            offset: None,
            unique: false,
        }
    }

    /// Returns the declared name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the search kind.
    #[must_use]
    pub fn kind(&self) -> SearchKind {
        self.kind
    }

    /// Returns a printable label: the name, or the dotted parameter paths.
    #[must_use]
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => self
                .params
                .iter()
                .map(|p| p.path.dotted())
                .collect::<Vec<_>>()
                .join("_"),
        }
    }

    /// Adds a parameter from a dotted path.
    pub fn add_param(&mut self, path: &str, op: Operator) -> &mut Self {
        self.params.push(SearchParam {
            path: FieldPath::parse(path),
            op,
        });
        self
    }

    /// Adds an ordering directive from a dotted path.
    pub fn add_order(&mut self, path: &str, direction: Direction) -> &mut Self {
        self.orders.push(Order {
            path: FieldPath::parse(path),
            direction,
        });
        self
    }

    /// Sets the aggregate.
    pub fn set_aggregate(&mut self, kind: AggregateKind, path: &str, group: &str) -> &mut Self {
        self.aggregate = Some(Aggregate {
            kind,
            path: FieldPath::parse(path),
            group: FieldPath::parse(group),
        });
        self
    }

    /// Sets the distinct selection; an empty string selects the entity itself.
    pub fn set_distinct(&mut self, path: &str) -> &mut Self {
        let path = if path.is_empty() {
            FieldPath::new(Vec::new())
        } else {
            FieldPath::parse(path)
        };
        self.distinct = Some(Distinct { path });
        self
    }

    /// Returns true if the linker determined that at most one row matches.
    #[must_use]
    pub fn returns_unique(&self) -> bool {
        self.unique
    }

    /// Records whether at most one row matches. Called by the linker.
    pub fn bind_unique(&mut self, unique: bool) {
        self.unique = unique;
    }
}
