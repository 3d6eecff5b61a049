//! Fields: named, typed members of an entity.
//!
//! A field may carry a foreign-key [`Reference`], a [`StructSource`] (for
//! `struct` fields embedding a referenced entity), or a [`Link`] to an
//! enumeration or bit-field set. All of these start as names and are
//! resolved to handles by the linker.

use std::fmt;

use schemata_foundation::{BitfieldId, EntityId, EnumId, Error, FieldId, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// =============================================================================
// FieldType
// =============================================================================

/// The closed set of field types.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FieldType {
    /// 64-bit signed integer.
    #[default]
    Int,
    /// Double-precision real.
    Real,
    /// UTF-8 text.
    Text,
    /// Password hash (text, never exported).
    Password,
    /// E-mail address (validated text).
    Email,
    /// Calendar date stored as epoch seconds.
    Date,
    /// Epoch seconds.
    Epoch,
    /// Opaque binary blob.
    Blob,
    /// Value of a named enumeration.
    Enum,
    /// Set of bits of a named bit-field set.
    Bitfield,
    /// Embedded entity, reached through a local foreign key.
    Struct,
}

impl FieldType {
    /// Returns true if values of this type are stored as text.
    #[must_use]
    pub const fn is_textual(self) -> bool {
        matches!(self, Self::Text | Self::Password | Self::Email)
    }

    /// Returns true if values of this type are stored as integers.
    #[must_use]
    pub const fn is_integral(self) -> bool {
        matches!(
            self,
            Self::Int | Self::Date | Self::Epoch | Self::Enum | Self::Bitfield
        )
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Int => "int",
            Self::Real => "real",
            Self::Text => "text",
            Self::Password => "password",
            Self::Email => "email",
            Self::Date => "date",
            Self::Epoch => "epoch",
            Self::Blob => "blob",
            Self::Enum => "enum",
            Self::Bitfield => "bitfield",
            Self::Struct => "struct",
        };
        f.write_str(s)
    }
}

// =============================================================================
// Flags, defaults, validation
// =============================================================================

/// Boolean attributes of a field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[allow(clippy::struct_excessive_bools)]
pub struct FieldFlags {
    /// The field is the entity's row identifier.
    pub rowid: bool,
    /// The field may be null.
    pub null: bool,
    /// The field's values are unique across rows.
    pub unique: bool,
    /// The field is never exported to serialized output.
    pub noexport: bool,
}

/// A default value. Its shape must fit the field type.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DefaultValue {
    /// Integer default (int, date, epoch, enum, bitfield, real).
    Integer(i64),
    /// Real default (real only).
    Real(f64),
    /// String default (text, email, password).
    Text(String),
}

impl DefaultValue {
    /// Returns true if this default can be stored in a field of type `ty`.
    #[must_use]
    pub fn fits(&self, ty: FieldType) -> bool {
        match self {
            Self::Integer(_) => ty.is_integral() || ty == FieldType::Real,
            Self::Real(_) => ty == FieldType::Real,
            Self::Text(_) => ty.is_textual(),
        }
    }
}

/// Comparison used by a validation rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ValidOp {
    /// Value (or length) at least the limit.
    Ge,
    /// Value (or length) at most the limit.
    Le,
    /// Value (or length) strictly greater than the limit.
    Gt,
    /// Value (or length) strictly less than the limit.
    Lt,
    /// Value (or length) equal to the limit.
    Eq,
}

/// A validation rule. For textual and blob fields the limit applies to length.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Validation {
    /// The comparison.
    pub op: ValidOp,
    /// The limit compared against.
    pub limit: DefaultValue,
}

/// What happens to a referencing row when its target is updated or deleted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RefAction {
    /// No action declared.
    #[default]
    None,
    /// Refuse the change.
    Restrict,
    /// Set the referencing field to null.
    Nullify,
    /// Propagate the change.
    Cascade,
    /// Reset the referencing field to its default.
    Default,
}

// =============================================================================
// References
// =============================================================================

/// A foreign-key edge from one field to another entity's unique field.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Reference {
    /// The field holding the key (the field carrying this reference).
    pub source_field: String,
    /// The referenced entity.
    pub target_entity: String,
    /// The referenced field.
    pub target_field: String,
    #[cfg_attr(feature = "serde", serde(skip))]
    target: Option<FieldId>,
    #[cfg_attr(feature = "serde", serde(skip))]
    source: Option<FieldId>,
}

impl Reference {
    /// Creates an unresolved reference.
    #[must_use]
    pub fn new(
        source_field: impl Into<String>,
        target_entity: impl Into<String>,
        target_field: impl Into<String>,
    ) -> Self {
        Self {
            source_field: source_field.into(),
            target_entity: target_entity.into(),
            target_field: target_field.into(),
            target: None,
            source: None,
        }
    }

    /// Returns the resolved target field.
    #[must_use]
    pub fn target(&self) -> Option<FieldId> {
        self.target
    }

    /// Returns the resolved owning field.
    #[must_use]
    pub fn source(&self) -> Option<FieldId> {
        self.source
    }

    /// Returns the entity the resolved target belongs to.
    #[must_use]
    pub fn target_entity_id(&self) -> Option<EntityId> {
        self.target.map(|t| t.entity)
    }

    /// Returns true once both handles are bound.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.target.is_some() && self.source.is_some()
    }

    /// Stores the resolved handles. Called by the linker.
    pub fn bind(&mut self, target: FieldId, source: FieldId) {
        self.target = Some(target);
        self.source = Some(source);
    }
}

/// The local foreign-key field through which a `struct` field embeds an entity.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StructSource {
    /// Name of the local field carrying the reference.
    pub field: String,
    #[cfg_attr(feature = "serde", serde(skip))]
    resolved: Option<FieldId>,
    #[cfg_attr(feature = "serde", serde(skip))]
    entity: Option<EntityId>,
}

impl StructSource {
    /// Creates an unresolved struct source.
    #[must_use]
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            resolved: None,
            entity: None,
        }
    }

    /// Returns the resolved local field.
    #[must_use]
    pub fn resolved(&self) -> Option<FieldId> {
        self.resolved
    }

    /// Returns the embedded entity.
    #[must_use]
    pub fn entity(&self) -> Option<EntityId> {
        self.entity
    }

    /// Stores the resolved handles. Called by the linker.
    pub fn bind(&mut self, field: FieldId, entity: EntityId) {
        self.resolved = Some(field);
        self.entity = Some(entity);
    }
}

/// A by-name link to a top-level declaration, resolved to a handle.
///
/// Only the name is encoded; the handle is skipped, so `T` needs no serde
/// bounds.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = ""))]
pub struct Link<T> {
    /// The declared name.
    pub name: String,
    #[cfg_attr(feature = "serde", serde(skip))]
    resolved: Option<T>,
}

impl<T: Copy> Link<T> {
    /// Creates an unresolved link.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resolved: None,
        }
    }

    /// Returns the resolved handle.
    #[must_use]
    pub fn resolved(&self) -> Option<T> {
        self.resolved
    }

    /// Stores the resolved handle. Called by the linker.
    pub fn bind(&mut self, handle: T) {
        self.resolved = Some(handle);
    }
}

// =============================================================================
// Field
// =============================================================================

/// A named, typed member of an entity.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Field {
    id: FieldId,
    name: String,
    ty: FieldType,
    reference: Option<Reference>,
    struct_source: Option<StructSource>,
    enumeration: Option<Link<EnumId>>,
    bitfield: Option<Link<BitfieldId>>,
    default: Option<DefaultValue>,
    /// Documentation.
    pub doc: Option<String>,
    /// Boolean attributes.
    pub flags: FieldFlags,
    /// Validation rules, in declaration order.
    pub validations: Vec<Validation>,
    /// Action on target update.
    pub on_update: RefAction,
    /// Action on target delete.
    pub on_delete: RefAction,
}

impl Field {
    pub(crate) fn new(id: FieldId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            ty: FieldType::Int,
            reference: None,
            struct_source: None,
            enumeration: None,
            bitfield: None,
            default: None,
            doc: None,
            flags: FieldFlags::default(),
            validations: Vec::new(),
            on_update: RefAction::None,
            on_delete: RefAction::None,
        }
    }

    /// Returns this field's handle.
    #[must_use]
    pub fn id(&self) -> FieldId {
        self.id
    }

    /// Returns the owning entity.
    #[must_use]
    pub fn parent(&self) -> EntityId {
        self.id.entity
    }

    /// Returns the declared name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the type tag.
    #[must_use]
    pub fn ty(&self) -> FieldType {
        self.ty
    }

    /// Returns the foreign-key reference, if any.
    #[must_use]
    pub fn reference(&self) -> Option<&Reference> {
        self.reference.as_ref()
    }

    /// Returns the struct source, if this is a `struct` field.
    #[must_use]
    pub fn struct_source(&self) -> Option<&StructSource> {
        self.struct_source.as_ref()
    }

    /// Returns the enumeration link, if this is an `enum` field.
    #[must_use]
    pub fn enumeration(&self) -> Option<&Link<EnumId>> {
        self.enumeration.as_ref()
    }

    /// Returns the bit-field link, if this is a `bitfield` field.
    #[must_use]
    pub fn bitfield(&self) -> Option<&Link<BitfieldId>> {
        self.bitfield.as_ref()
    }

    /// Returns the default value, if any.
    #[must_use]
    pub fn default_value(&self) -> Option<&DefaultValue> {
        self.default.as_ref()
    }

    /// Returns true if the field is unique or a row identifier.
    #[must_use]
    pub fn is_unique_key(&self) -> bool {
        self.flags.rowid || self.flags.unique
    }

    /// Returns true if following this field leads into another entity.
    #[must_use]
    pub fn leads_to_entity(&self) -> bool {
        self.reference.is_some() || self.struct_source.is_some()
    }

    /// Sets a plain type tag.
    ///
    /// # Errors
    ///
    /// `enum`, `bitfield`, and `struct` need a name; use [`Field::set_enum`],
    /// [`Field::set_bitfield`], or [`Field::set_struct`] instead.
    pub fn set_type(&mut self, ty: FieldType) -> Result<()> {
        if matches!(ty, FieldType::Enum | FieldType::Bitfield | FieldType::Struct) {
            return Err(Error::invalid_declaration(format!(
                "field {} needs a target name to become {ty}",
                self.name
            )));
        }
        self.retype(ty);
        Ok(())
    }

    /// Makes this an `enum` field naming an enumeration.
    pub fn set_enum(&mut self, enumeration: impl Into<String>) {
        self.retype(FieldType::Enum);
        self.enumeration = Some(Link::new(enumeration));
    }

    /// Makes this a `bitfield` field naming a bit-field set.
    pub fn set_bitfield(&mut self, bitfield: impl Into<String>) {
        self.retype(FieldType::Bitfield);
        self.bitfield = Some(Link::new(bitfield));
    }

    /// Makes this a `struct` field embedding the entity referenced by the
    /// local foreign-key field `source`.
    ///
    /// # Errors
    ///
    /// Returns an error if the field already carries a foreign key.
    pub fn set_struct(&mut self, source: impl Into<String>) -> Result<()> {
        if self.reference.is_some() {
            return Err(Error::invalid_declaration(format!(
                "struct field {} cannot carry a foreign key",
                self.name
            )));
        }
        self.retype(FieldType::Struct);
        self.struct_source = Some(StructSource::new(source));
        Ok(())
    }

    /// Declares a foreign key from this field to `target_entity.target_field`.
    ///
    /// # Errors
    ///
    /// Returns an error for `struct` fields, which reach other entities
    /// through their source field instead.
    pub fn set_reference(
        &mut self,
        target_entity: impl Into<String>,
        target_field: impl Into<String>,
    ) -> Result<()> {
        if self.ty == FieldType::Struct {
            return Err(Error::invalid_declaration(format!(
                "struct field {} cannot carry a foreign key",
                self.name
            )));
        }
        self.reference = Some(Reference::new(
            self.name.clone(),
            target_entity,
            target_field,
        ));
        Ok(())
    }

    /// Sets the default value.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDefault` if the value does not fit the current type.
    pub fn set_default(&mut self, value: DefaultValue) -> Result<()> {
        if !value.fits(self.ty) {
            return Err(Error::invalid_default(format!(
                "{value:?} does not fit {} field {}",
                self.ty, self.name
            )));
        }
        self.default = Some(value);
        Ok(())
    }

    /// Appends a validation rule.
    pub fn add_validation(&mut self, op: ValidOp, limit: DefaultValue) {
        self.validations.push(Validation { op, limit });
    }

    /// Mutable access to the reference for binding. Called by the linker.
    pub fn reference_mut(&mut self) -> Option<&mut Reference> {
        self.reference.as_mut()
    }

    /// Mutable access to the struct source for binding. Called by the linker.
    pub fn struct_source_mut(&mut self) -> Option<&mut StructSource> {
        self.struct_source.as_mut()
    }

    /// Mutable access to the enumeration link for binding. Called by the linker.
    pub fn enumeration_mut(&mut self) -> Option<&mut Link<EnumId>> {
        self.enumeration.as_mut()
    }

    /// Mutable access to the bit-field link for binding. Called by the linker.
    pub fn bitfield_mut(&mut self) -> Option<&mut Link<BitfieldId>> {
        self.bitfield.as_mut()
    }

    // Changing the type drops links belonging to the old type, and a default
    // that no longer fits.
    fn retype(&mut self, ty: FieldType) {
        self.ty = ty;
        if ty != FieldType::Enum {
            self.enumeration = None;
        }
        if ty != FieldType::Bitfield {
            self.bitfield = None;
        }
        if ty != FieldType::Struct {
            self.struct_source = None;
        }
        if self.default.as_ref().is_some_and(|d| !d.fits(ty)) {
            self.default = None;
        }
    }
}
