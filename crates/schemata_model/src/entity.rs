//! Entities: declared structures owning their fields and specs.

use schemata_foundation::{EntityId, Error, FieldId, NameScope, Result, canonical, eq_ignore_case};

use crate::field::Field;
use crate::naming::{check_name, check_unique, reserve_one};
use crate::rolemap::Rolemap;
use crate::search::{Search, SearchKind};
use crate::update::{Unique, Update, UpdateKind};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A declared structure: the record or table analogue.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Entity {
    id: EntityId,
    name: String,
    canonical: String,
    /// Documentation.
    pub doc: Option<String>,
    fields: Vec<Field>,
    searches: Vec<Search>,
    updates: Vec<Update>,
    deletes: Vec<Update>,
    uniques: Vec<Unique>,
    /// Whether an insert operation is generated.
    pub insert: bool,
    /// Role grants for this entity's operations.
    pub rolemap: Rolemap,
    #[cfg_attr(feature = "serde", serde(skip))]
    height: usize,
}

impl Entity {
    pub(crate) fn new(id: EntityId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            canonical: canonical(name),
            doc: None,
            fields: Vec::new(),
            searches: Vec::new(),
            updates: Vec::new(),
            deletes: Vec::new(),
            uniques: Vec::new(),
            insert: false,
            rolemap: Rolemap::new(),
            height: 0,
        }
    }

    /// Returns this entity's handle.
    #[must_use]
    pub fn id(&self) -> EntityId {
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

    /// Returns the dependency height: 0 without foreign keys, otherwise one
    /// more than the highest referenced entity. Meaningful only after linking.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Stores the computed height. Called by the linker, which overwrites it
    /// on every link.
    pub fn set_height(&mut self, height: usize) {
        self.height = height;
    }

    // -------------------------------------------------------------------------
    // Fields
    // -------------------------------------------------------------------------

    /// Allocates an `int` field.
    ///
    /// # Errors
    ///
    /// - `ReservedName` if the name is reserved
    /// - `DuplicateName` if this entity already has a field with the name
    /// - `Exhausted` if the field list cannot grow
    pub fn allocate_field(&mut self, name: &str) -> Result<&mut Field> {
        check_name(name, self.fields.iter().map(Field::name), NameScope::Field)?;
        let id = FieldId::new(self.id, self.fields.len())?;
        reserve_one(&mut self.fields, "field")?;
        self.fields.push(Field::new(id, name));
        let last = self.fields.len() - 1;
        Ok(&mut self.fields[last])
    }

    /// Returns the fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Mutable access to the fields.
    pub fn fields_mut(&mut self) -> &mut [Field] {
        &mut self.fields
    }

    /// Looks up a field by name, ignoring ASCII case.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| eq_ignore_case(f.name(), name))
    }

    /// Looks up a field by name for further declarations.
    pub fn field_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| eq_ignore_case(f.name(), name))
    }

    /// Returns the field at `index`.
    #[must_use]
    pub fn field_at(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    /// Returns the first row-identifier field.
    #[must_use]
    pub fn rowid(&self) -> Option<&Field> {
        self.fields.iter().find(|f| f.flags.rowid)
    }

    /// Returns true if any field carries a foreign key.
    #[must_use]
    pub fn has_references(&self) -> bool {
        self.fields.iter().any(|f| f.reference().is_some())
    }

    // -------------------------------------------------------------------------
    // Specs
    // -------------------------------------------------------------------------

    /// Allocates a search. Named searches must be unique among this
    /// entity's searches.
    ///
    /// # Errors
    ///
    /// `ReservedName`, `DuplicateName`, or `Exhausted`.
    pub fn allocate_search(&mut self, kind: SearchKind, name: Option<&str>) -> Result<&mut Search> {
        if let Some(name) = name {
            check_name(
                name,
                self.searches.iter().filter_map(Search::name),
                NameScope::Search,
            )?;
        }
        reserve_one(&mut self.searches, "search")?;
        self.searches.push(Search::new(kind, name));
        let last = self.searches.len() - 1;
        Ok(&mut self.searches[last])
    }

    /// Allocates an update.
    ///
    /// # Errors
    ///
    /// `ReservedName`, `DuplicateName` among named updates, or `Exhausted`.
    pub fn allocate_update(&mut self, name: Option<&str>) -> Result<&mut Update> {
        Self::allocate_mutation(&mut self.updates, UpdateKind::Update, name, NameScope::Update)
    }

    /// Allocates a delete.
    ///
    /// # Errors
    ///
    /// `ReservedName`, `DuplicateName` among named deletes, or `Exhausted`.
    pub fn allocate_delete(&mut self, name: Option<&str>) -> Result<&mut Update> {
        Self::allocate_mutation(&mut self.deletes, UpdateKind::Delete, name, NameScope::Delete)
    }

    fn allocate_mutation<'a>(
        list: &'a mut Vec<Update>,
        kind: UpdateKind,
        name: Option<&str>,
        scope: NameScope,
    ) -> Result<&'a mut Update> {
        if let Some(name) = name {
            check_name(name, list.iter().filter_map(Update::name), scope)?;
        }
        reserve_one(list, "update")?;
        list.push(Update::new(kind, name));
        let last = list.len() - 1;
        Ok(&mut list[last])
    }

    /// Allocates a multi-column unique constraint.
    ///
    /// # Errors
    ///
    /// - `InvalidDeclaration` for fewer than two fields
    /// - `DuplicateName` if a field is named twice, or a constraint over the
    ///   same fields exists
    /// - `Exhausted` if the list cannot grow
    pub fn allocate_unique(&mut self, fields: &[&str]) -> Result<&mut Unique> {
        if fields.len() < 2 {
            return Err(Error::invalid_declaration(format!(
                "unique constraint on {} needs at least two fields",
                self.name
            )));
        }
        let unique = Unique::new(fields);
        if let Some(field) = unique.repeated_field() {
            return Err(Error::duplicate_name(field, NameScope::Unique));
        }
        let key = unique.key();
        let existing: Vec<String> = self.uniques.iter().map(Unique::key).collect();
        check_unique(&key, existing.iter().map(String::as_str), NameScope::Unique)?;
        reserve_one(&mut self.uniques, "unique")?;
        self.uniques.push(unique);
        let last = self.uniques.len() - 1;
        Ok(&mut self.uniques[last])
    }

    /// Returns the searches in declaration order.
    #[must_use]
    pub fn searches(&self) -> &[Search] {
        &self.searches
    }

    /// Mutable access to the searches.
    pub fn searches_mut(&mut self) -> &mut [Search] {
        &mut self.searches
    }

    /// Returns the updates in declaration order.
    #[must_use]
    pub fn updates(&self) -> &[Update] {
        &self.updates
    }

    /// Mutable access to the updates.
    pub fn updates_mut(&mut self) -> &mut [Update] {
        &mut self.updates
    }

    /// Returns the deletes in declaration order.
    #[must_use]
    pub fn deletes(&self) -> &[Update] {
        &self.deletes
    }

    /// Mutable access to the deletes.
    pub fn deletes_mut(&mut self) -> &mut [Update] {
        &mut self.deletes
    }

    /// Returns the unique constraints in declaration order.
    #[must_use]
    pub fn uniques(&self) -> &[Unique] {
        &self.uniques
    }

    /// Mutable access to the unique constraints.
    pub fn uniques_mut(&mut self) -> &mut [Unique] {
        &mut self.uniques
    }

    /// Number of search, update, delete, and unique specs.
    #[must_use]
    pub fn spec_count(&self) -> usize {
        self.searches.len() + self.updates.len() + self.deletes.len() + self.uniques.len()
    }

    /// Splits off the owned collections for teardown.
    pub(crate) fn into_parts(self) -> (Vec<Field>, usize, Rolemap) {
        let specs = self.spec_count();
        (self.fields, specs, self.rolemap)
    }
}
