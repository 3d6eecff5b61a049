//! The document: every declaration of one compilation.
//!
//! A [`Config`] owns its entities, enumerations, bit-field sets, and role
//! tree, plus two append-only tables read by generators: output languages
//! (always containing the default empty-string entry at index 0) and source
//! file names.

use schemata_foundation::{
    BitfieldId, EntityId, EnumId, NameScope, Result, RoleId, eq_ignore_case,
};

use crate::bitfield::Bitfield;
use crate::entity::Entity;
use crate::enumeration::Enumeration;
use crate::naming::{check_name, reserve_one};
use crate::role::RoleTree;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A display label in one output language.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Label {
    /// Index into [`Config::languages`].
    pub lang: usize,
    /// The label text.
    pub text: String,
}

impl Label {
    /// Creates a label.
    #[must_use]
    pub fn new(lang: usize, text: impl Into<String>) -> Self {
        Self {
            lang,
            text: text.into(),
        }
    }
}

/// The declaration store of one compilation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    entities: Vec<Entity>,
    enums: Vec<Enumeration>,
    bitfields: Vec<Bitfield>,
    roles: RoleTree,
    langs: Vec<String>,
    fnames: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Creates an empty document with the implicit roles and the default
    /// output language.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            enums: Vec::new(),
            bitfields: Vec::new(),
            roles: RoleTree::new(),
            langs: vec![String::new()],
            fnames: Vec::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Allocation
    // -------------------------------------------------------------------------

    fn top_level_names(&self) -> impl Iterator<Item = &str> {
        self.entities
            .iter()
            .map(Entity::name)
            .chain(self.enums.iter().map(Enumeration::name))
            .chain(self.bitfields.iter().map(Bitfield::name))
    }

    /// Allocates an entity with no fields or specs.
    ///
    /// # Errors
    ///
    /// - `ReservedName` if the name is reserved
    /// - `DuplicateName` if an entity, enumeration, or bit-field set has the name
    /// - `Exhausted` if the entity list cannot grow
    pub fn allocate_entity(&mut self, name: &str) -> Result<EntityId> {
        check_name(name, self.top_level_names(), NameScope::TopLevel)?;
        let id = EntityId::from_index(self.entities.len())?;
        reserve_one(&mut self.entities, "entity")?;
        self.entities.push(Entity::new(id, name));
        Ok(id)
    }

    /// Allocates an enumeration with no items.
    ///
    /// # Errors
    ///
    /// Same as [`Config::allocate_entity`].
    pub fn allocate_enum(&mut self, name: &str) -> Result<EnumId> {
        check_name(name, self.top_level_names(), NameScope::TopLevel)?;
        let id = EnumId::from_index(self.enums.len())?;
        reserve_one(&mut self.enums, "enumeration")?;
        self.enums.push(Enumeration::new(id, name));
        Ok(id)
    }

    /// Allocates a bit-field set with no items.
    ///
    /// # Errors
    ///
    /// Same as [`Config::allocate_entity`].
    pub fn allocate_bitfield(&mut self, name: &str) -> Result<BitfieldId> {
        check_name(name, self.top_level_names(), NameScope::TopLevel)?;
        let id = BitfieldId::from_index(self.bitfields.len())?;
        reserve_one(&mut self.bitfields, "bitfield")?;
        self.bitfields.push(Bitfield::new(id, name));
        Ok(id)
    }

    /// Allocates a role under `parent`, or at the root level.
    ///
    /// # Errors
    ///
    /// See [`RoleTree::allocate`].
    pub fn allocate_role(&mut self, parent: Option<RoleId>, name: &str) -> Result<RoleId> {
        self.roles.allocate(parent, name)
    }

    /// Adds an output language, returning its index. Adding a known
    /// language returns the existing index.
    ///
    /// # Errors
    ///
    /// `Exhausted` if the table cannot grow.
    pub fn add_language(&mut self, lang: &str) -> Result<usize> {
        if let Some(i) = self.langs.iter().position(|l| l == lang) {
            return Ok(i);
        }
        reserve_one(&mut self.langs, "language")?;
        self.langs.push(lang.to_string());
        Ok(self.langs.len() - 1)
    }

    /// Records a source file name, returning its index.
    ///
    /// # Errors
    ///
    /// `Exhausted` if the table cannot grow.
    pub fn add_source_file(&mut self, name: &str) -> Result<usize> {
        if let Some(i) = self.fnames.iter().position(|f| f == name) {
            return Ok(i);
        }
        reserve_one(&mut self.fnames, "source file")?;
        self.fnames.push(name.to_string());
        Ok(self.fnames.len() - 1)
    }

    // -------------------------------------------------------------------------
    // Access
    // -------------------------------------------------------------------------

    /// Returns an entity by handle.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.index())
    }

    /// Returns an entity by handle for further declarations.
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id.index())
    }

    /// Returns the entities in declaration order.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Mutable access to every entity.
    pub fn entities_mut(&mut self) -> &mut [Entity] {
        &mut self.entities
    }

    /// Looks up an entity by name, ignoring ASCII case.
    #[must_use]
    pub fn find_entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| eq_ignore_case(e.name(), name))
    }

    /// Looks up an enumeration by name, ignoring ASCII case.
    #[must_use]
    pub fn find_enum(&self, name: &str) -> Option<&Enumeration> {
        self.enums.iter().find(|e| eq_ignore_case(e.name(), name))
    }

    /// Looks up a bit-field set by name, ignoring ASCII case.
    #[must_use]
    pub fn find_bitfield(&self, name: &str) -> Option<&Bitfield> {
        self.bitfields.iter().find(|b| eq_ignore_case(b.name(), name))
    }

    /// Returns the enumerations in declaration order.
    #[must_use]
    pub fn enums(&self) -> &[Enumeration] {
        &self.enums
    }

    /// Mutable access to the enumerations.
    pub fn enums_mut(&mut self) -> &mut [Enumeration] {
        &mut self.enums
    }

    /// Returns an enumeration by handle.
    #[must_use]
    pub fn enumeration(&self, id: EnumId) -> Option<&Enumeration> {
        self.enums.get(id.index())
    }

    /// Returns the bit-field sets in declaration order.
    #[must_use]
    pub fn bitfields(&self) -> &[Bitfield] {
        &self.bitfields
    }

    /// Mutable access to the bit-field sets.
    pub fn bitfields_mut(&mut self) -> &mut [Bitfield] {
        &mut self.bitfields
    }

    /// Returns a bit-field set by handle.
    #[must_use]
    pub fn bitfield(&self, id: BitfieldId) -> Option<&Bitfield> {
        self.bitfields.get(id.index())
    }

    /// Returns the role tree.
    #[must_use]
    pub fn roles(&self) -> &RoleTree {
        &self.roles
    }

    /// Mutable access to the role tree.
    pub fn roles_mut(&mut self) -> &mut RoleTree {
        &mut self.roles
    }

    /// Returns the output-language table. Index 0 is always the default.
    #[must_use]
    pub fn languages(&self) -> &[String] {
        &self.langs
    }

    /// Returns the source file-name table.
    #[must_use]
    pub fn source_files(&self) -> &[String] {
        &self.fnames
    }

    /// Splits the document into its parts for teardown.
    pub(crate) fn into_parts(self) -> Parts {
        Parts {
            entities: self.entities,
            enums: self.enums,
            bitfields: self.bitfields,
            roles: self.roles,
            langs: self.langs,
            fnames: self.fnames,
        }
    }
}

/// The owned parts of a document, in the shape teardown consumes them.
pub(crate) struct Parts {
    pub(crate) entities: Vec<Entity>,
    pub(crate) enums: Vec<Enumeration>,
    pub(crate) bitfields: Vec<Bitfield>,
    pub(crate) roles: RoleTree,
    pub(crate) langs: Vec<String>,
    pub(crate) fnames: Vec<String>,
}
