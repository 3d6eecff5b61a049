//! Error types for the Schemata compiler core.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//! Allocation errors are local and recoverable; link errors are terminal for
//! the whole document.

use std::fmt;

use thiserror::Error;

/// Result type used throughout Schemata.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Schemata operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Records the link pass that produced this error, keeping any
    /// entity/field/spec context already attached.
    #[must_use]
    pub fn in_pass(mut self, pass: LinkPass) -> Self {
        let context = self.context.take().unwrap_or_default();
        self.context = Some(context.with_pass(pass));
        self
    }

    /// Returns the phase this error belongs to.
    ///
    /// An error tagged with a link pass is a link error whatever its kind:
    /// the linker re-raises some allocation kinds, and by then the document
    /// is gone.
    #[must_use]
    pub fn phase(&self) -> Phase {
        match &self.context {
            Some(ErrorContext { pass: Some(_), .. }) => Phase::Link,
            _ => self.kind.phase(),
        }
    }

    /// Creates a reserved name error.
    #[must_use]
    pub fn reserved_name(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::ReservedName(name.into()))
    }

    /// Creates a duplicate name error.
    #[must_use]
    pub fn duplicate_name(name: impl Into<String>, scope: NameScope) -> Self {
        Self::new(ErrorKind::DuplicateName {
            name: name.into(),
            scope,
        })
    }

    /// Creates a storage exhaustion error.
    #[must_use]
    pub fn exhausted(what: &'static str) -> Self {
        Self::new(ErrorKind::Exhausted(what))
    }

    /// Creates an invalid declaration error.
    #[must_use]
    pub fn invalid_declaration(reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidDeclaration(reason.into()))
    }

    /// Creates an invalid default value error.
    #[must_use]
    pub fn invalid_default(reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidDefault(reason.into()))
    }

    /// Creates an unknown field error.
    #[must_use]
    pub fn unknown_field(entity: impl Into<String>, field: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownField {
            entity: entity.into(),
            field: field.into(),
        })
    }

    /// Creates an unknown role error.
    #[must_use]
    pub fn unknown_role(role: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownRole(role.into()))
    }
}

/// Which stage of compilation an error belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Raised while declarations are being allocated. The store stays usable.
    Allocation,
    /// Raised by the linker. The document is discarded.
    Link,
    /// Raised by snapshot or file handling.
    Runtime,
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// A declared name matches a reserved identifier.
    #[error("reserved name: {0}")]
    ReservedName(String),

    /// A declared name collides with an existing one in the same scope.
    #[error("duplicate name: {name} ({scope})")]
    DuplicateName {
        /// The colliding name as declared.
        name: String,
        /// The scope in which it collided.
        scope: NameScope,
    },

    /// A collection could not grow or a handle index overflowed.
    #[error("storage exhausted while allocating {0}")]
    Exhausted(&'static str),

    /// A declaration is structurally invalid.
    #[error("invalid declaration: {0}")]
    InvalidDeclaration(String),

    /// A default value does not fit its field.
    #[error("invalid default: {0}")]
    InvalidDefault(String),

    /// A reference names an entity that does not exist.
    #[error("unknown target entity: {entity} (referenced by {field})")]
    UnknownTargetEntity {
        /// The referencing field, as `entity.field`.
        field: String,
        /// The missing entity name.
        entity: String,
    },

    /// A reference names a field that does not exist in its target entity.
    #[error("unknown target field: {entity}.{field}")]
    UnknownTargetField {
        /// The target entity.
        entity: String,
        /// The missing field name.
        field: String,
    },

    /// A reference target is neither unique nor a row identifier.
    #[error("invalid reference target: {from} -> {to}")]
    InvalidTarget {
        /// The referencing field, as `entity.field`.
        from: String,
        /// The target field, as `entity.field`.
        to: String,
    },

    /// The foreign-key graph contains a cycle.
    #[error("reference cycle: {}", .0.join(" -> "))]
    ReferenceCycle(Vec<String>),

    /// A rolemap names a role that is not in the role tree.
    #[error("unknown role: {0}")]
    UnknownRole(String),

    /// A field path component could not be resolved.
    #[error("unknown field: {entity}.{field}")]
    UnknownField {
        /// The entity in which resolution was attempted.
        entity: String,
        /// The missing field name.
        field: String,
    },

    /// A rolemap names a search, update, or delete that does not exist.
    #[error("unknown spec: {entity}.{spec}")]
    UnknownSpec {
        /// The entity owning the rolemap.
        entity: String,
        /// The missing spec name.
        spec: String,
    },

    /// A field names an enumeration that does not exist.
    #[error("unknown enumeration: {0}")]
    UnknownEnum(String),

    /// A field names a bit-field set that does not exist.
    #[error("unknown bitfield: {0}")]
    UnknownBitfield(String),

    /// Two items of an enumeration or bit-field set share a value.
    #[error("duplicate value {value} for {name}")]
    DuplicateValue {
        /// The enumeration or bit-field set, as `set.item`.
        name: String,
        /// The repeated value.
        value: i64,
    },

    /// An entity has more than one row identifier.
    #[error("multiple row identifiers in {0}")]
    MultipleRowIds(String),

    /// Snapshot encoding or decoding failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// File I/O failed.
    #[error("I/O error: {0}")]
    Io(String),
}

impl ErrorKind {
    /// Returns the phase in which this kind of error is raised.
    #[must_use]
    pub fn phase(&self) -> Phase {
        match self {
            Self::ReservedName(_)
            | Self::DuplicateName { .. }
            | Self::Exhausted(_)
            | Self::InvalidDeclaration(_)
            | Self::InvalidDefault(_) => Phase::Allocation,
            Self::UnknownTargetEntity { .. }
            | Self::UnknownTargetField { .. }
            | Self::InvalidTarget { .. }
            | Self::ReferenceCycle(_)
            | Self::UnknownRole(_)
            | Self::UnknownField { .. }
            | Self::UnknownSpec { .. }
            | Self::UnknownEnum(_)
            | Self::UnknownBitfield(_)
            | Self::DuplicateValue { .. }
            | Self::MultipleRowIds(_) => Phase::Link,
            Self::Serialization(_) | Self::Io(_) => Phase::Runtime,
        }
    }
}

/// The naming scope in which a duplicate was found.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NameScope {
    /// Entities, enumerations, and bit-field sets share one namespace.
    TopLevel,
    /// Fields within one entity.
    Field,
    /// Named searches within one entity.
    Search,
    /// Named updates within one entity.
    Update,
    /// Named deletes within one entity.
    Delete,
    /// Unique constraints within one entity.
    Unique,
    /// Items within one enumeration.
    EnumItem,
    /// Items within one bit-field set.
    BitItem,
    /// The whole role tree.
    Role,
    /// Roles granted to one rolemap entry.
    Grant,
}

impl fmt::Display for NameScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::TopLevel => "top level",
            Self::Field => "field",
            Self::Search => "search",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Unique => "unique",
            Self::EnumItem => "enumeration item",
            Self::BitItem => "bitfield item",
            Self::Role => "role",
            Self::Grant => "role grant",
        };
        f.write_str(s)
    }
}

/// The linker passes, in the order they run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LinkPass {
    /// Re-check of naming invariants and row identifiers.
    Declarations,
    /// Foreign keys, struct sources, enumeration and bit-field links.
    References,
    /// Dependency heights and cycle detection.
    Heights,
    /// Role tree consistency.
    Roles,
    /// Rolemap binding.
    Rolemaps,
    /// Search, update, delete, and unique field chains.
    Specs,
}

impl fmt::Display for LinkPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Declarations => "declarations",
            Self::References => "references",
            Self::Heights => "heights",
            Self::Roles => "roles",
            Self::Rolemaps => "rolemaps",
            Self::Specs => "specs",
        };
        f.write_str(s)
    }
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// The link pass that failed.
    pub pass: Option<LinkPass>,
    /// The entity (or enumeration, bit-field set) being processed.
    pub entity: Option<String>,
    /// The field being processed.
    pub field: Option<String>,
    /// The search, update, delete, or rolemap entry being processed.
    pub spec: Option<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the link pass.
    #[must_use]
    pub fn with_pass(mut self, pass: LinkPass) -> Self {
        self.pass = Some(pass);
        self
    }

    /// Sets the entity name.
    #[must_use]
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Sets the field name.
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Sets the spec name.
    #[must_use]
    pub fn with_spec(mut self, spec: impl Into<String>) -> Self {
        self.spec = Some(spec.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(pass) = self.pass {
            parts.push(format!("pass {pass}"));
        }
        if let Some(entity) = &self.entity {
            parts.push(format!("entity {entity}"));
        }
        if let Some(field) = &self.field {
            parts.push(format!("field {field}"));
        }
        if let Some(spec) = &self.spec {
            parts.push(format!("spec {spec}"));
        }
        write!(f, "{}", parts.join(", "))
    }
}
