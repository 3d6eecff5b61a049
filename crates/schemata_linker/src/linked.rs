//! The read-only view of a linked document.

use schemata_foundation::{EntityId, FieldId, RoleId, eq_ignore_case};
use schemata_model::{
    Bitfield, Config, Entity, Enumeration, Field, Operation, Reference, RoleTree,
};

/// A fully linked document.
///
/// Every reference, struct source, enumeration and bit-field link, rolemap
/// entry, and spec field chain is resolved, and every entity has its height.
/// Generators read it; nothing can modify it. Recover the [`Config`] with
/// [`LinkedConfig::into_config`] to tear it down.
#[derive(Clone, Debug)]
pub struct LinkedConfig {
    config: Config,
    by_height: Vec<EntityId>,
    unused_roles: Vec<RoleId>,
}

impl LinkedConfig {
    pub(crate) fn new(config: Config, unused_roles: Vec<RoleId>) -> Self {
        let mut by_height: Vec<EntityId> = config.entities().iter().map(Entity::id).collect();
        by_height.sort_by_key(|id| config.entity(*id).map_or(0, Entity::height));
        Self {
            config,
            by_height,
            unused_roles,
        }
    }

    /// Returns the underlying document.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the entities in declaration order.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        self.config.entities()
    }

    /// Iterates the entities so that every referenced entity comes before
    /// any entity referencing it. Ties keep declaration order.
    pub fn entities_by_height(&self) -> impl Iterator<Item = &Entity> {
        self.by_height
            .iter()
            .filter_map(|id| self.config.entity(*id))
    }

    /// Returns an entity by handle.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.config.entity(id)
    }

    /// Looks up an entity by name, ignoring ASCII case.
    #[must_use]
    pub fn find_entity(&self, name: &str) -> Option<&Entity> {
        self.config.find_entity(name)
    }

    /// Returns a field by handle.
    #[must_use]
    pub fn field(&self, id: FieldId) -> Option<&Field> {
        self.config
            .entity(id.entity)
            .and_then(|e| e.field_at(id.position()))
    }

    /// Returns the field a foreign key points at.
    #[must_use]
    pub fn reference_target(&self, field: &Field) -> Option<&Field> {
        field
            .reference()
            .and_then(Reference::target)
            .and_then(|id| self.field(id))
    }

    /// Returns the entity a `struct` field embeds.
    #[must_use]
    pub fn struct_entity(&self, field: &Field) -> Option<&Entity> {
        field
            .struct_source()
            .and_then(|s| s.entity())
            .and_then(|id| self.entity(id))
    }

    /// Returns the enumeration an `enum` field draws from.
    #[must_use]
    pub fn field_enum(&self, field: &Field) -> Option<&Enumeration> {
        field
            .enumeration()
            .and_then(|l| l.resolved())
            .and_then(|id| self.config.enumeration(id))
    }

    /// Returns the bit-field set a `bitfield` field draws from.
    #[must_use]
    pub fn field_bitfield(&self, field: &Field) -> Option<&Bitfield> {
        field
            .bitfield()
            .and_then(|l| l.resolved())
            .and_then(|id| self.config.bitfield(id))
    }

    /// Returns true if `role` was granted `op` (on `target`) for `entity`.
    /// Grants are explicit; roles inherit nothing from the tree.
    #[must_use]
    pub fn permits(&self, entity: &str, op: Operation, target: Option<&str>, role: &str) -> bool {
        self.find_entity(entity)
            .is_some_and(|e| e.rolemap.permits(op, target, role))
    }

    /// Returns the role tree.
    #[must_use]
    pub fn roles(&self) -> &RoleTree {
        self.config.roles()
    }

    /// Returns the declared roles no rolemap grants anything.
    #[must_use]
    pub fn unused_roles(&self) -> &[RoleId] {
        &self.unused_roles
    }

    /// Returns the enumerations, with every item value assigned.
    #[must_use]
    pub fn enums(&self) -> &[Enumeration] {
        self.config.enums()
    }

    /// Returns the bit-field sets.
    #[must_use]
    pub fn bitfields(&self) -> &[Bitfield] {
        self.config.bitfields()
    }

    /// Returns the output-language table.
    #[must_use]
    pub fn languages(&self) -> &[String] {
        self.config.languages()
    }

    /// Returns the source file-name table.
    #[must_use]
    pub fn source_files(&self) -> &[String] {
        self.config.source_files()
    }

    /// Returns the name of the role with handle `id`.
    #[must_use]
    pub fn role_name(&self, id: RoleId) -> Option<&str> {
        self.roles().get(id).map(|r| r.name())
    }

    /// Returns true if `name` is a role of this document.
    #[must_use]
    pub fn has_role(&self, name: &str) -> bool {
        self.roles().iter().any(|(_, r)| eq_ignore_case(r.name(), name))
    }

    /// Gives back the document, typically for teardown.
    #[must_use]
    pub fn into_config(self) -> Config {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use crate::link;
    use schemata_model::{Config, FieldType, Operation, teardown};

    fn chain() -> Config {
        let mut config = Config::new();
        for (name, target) in [("comment", Some("post")), ("post", Some("author")), ("author", None)] {
            let id = config.allocate_entity(name).unwrap();
            let e = config.entity_mut(id).unwrap();
            e.allocate_field("id").unwrap().flags.rowid = true;
            if let Some(target) = target {
                e.allocate_field("parent")
                    .unwrap()
                    .set_reference(target, "id")
                    .unwrap();
            }
        }
        config
    }

    #[test]
    fn height_order_puts_dependencies_first() {
        let linked = link(chain()).unwrap();
        let order: Vec<_> = linked.entities_by_height().map(|e| e.name()).collect();
        assert_eq!(order, ["author", "post", "comment"]);
        let declared: Vec<_> = linked.entities().iter().map(|e| e.name()).collect();
        assert_eq!(declared, ["comment", "post", "author"]);
    }

    #[test]
    fn resolved_links_are_readable() {
        let mut config = chain();
        config.allocate_enum("mood").unwrap();
        config.enums_mut()[0].allocate_item("happy").unwrap();
        let author = config.entities_mut().last_mut().unwrap();
        author.allocate_field("mood").unwrap().set_enum("mood");
        author.rolemap.grant(Operation::Insert, None, "default").unwrap();
        author.insert = true;

        let linked = link(config).unwrap();
        let author = linked.find_entity("author").unwrap();
        let mood = author.field("mood").unwrap();
        assert_eq!(mood.ty(), FieldType::Enum);
        assert_eq!(linked.field_enum(mood).unwrap().name(), "mood");
        assert!(linked.permits("author", Operation::Insert, None, "default"));
        assert!(!linked.permits("author", Operation::Insert, None, "all"));
        assert!(linked.has_role("NONE"));
    }

    #[test]
    fn into_config_round_trips_for_teardown() {
        let linked = link(chain()).unwrap();
        let released = teardown(Some(linked.into_config()));
        assert_eq!(released.entities, 3);
        assert_eq!(released.fields, 5);
    }
}
