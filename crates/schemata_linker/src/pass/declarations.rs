//! Pass 0: re-verify the naming invariants the allocation API enforces.
//!
//! A document built through the allocation API already satisfies these. One
//! decoded from a snapshot, or assembled by other means, may not. This pass
//! also checks that no entity has more than one row identifier.
//!
//! [`check_handles`] runs on every link, re-checking or not: later passes
//! bind by handle, so a handle that disagrees with its position would bind
//! the wrong declaration.

use schemata_foundation::{Error, ErrorContext, ErrorKind, FieldId, NameScope, Result};
use schemata_model::{Bitfield, Config, Entity, Enumeration, MAX_BIT_INDEX};

use super::check_names;

/// Verifies that every entity, field, enumeration, and bit-field set
/// handle matches the position it is stored at.
pub(crate) fn check_handles(config: &Config) -> Result<()> {
    let misplaced = |what: &str, name: &str, position: usize, claims: String| {
        Error::invalid_declaration(format!(
            "{what} {name} stored at position {position} claims {claims}"
        ))
        .with_context(ErrorContext::new().with_entity(name))
    };

    for (position, entity) in config.entities().iter().enumerate() {
        if entity.id().index() != position {
            return Err(misplaced(
                "entity",
                entity.name(),
                position,
                format!("{:?}", entity.id()),
            ));
        }
        for (index, field) in entity.fields().iter().enumerate() {
            if field.id() != FieldId::new(entity.id(), index)? {
                return Err(Error::invalid_declaration(format!(
                    "field {} stored at position {index} claims {:?}",
                    field.name(),
                    field.id()
                ))
                .with_context(
                    ErrorContext::new()
                        .with_entity(entity.name())
                        .with_field(field.name()),
                ));
            }
        }
    }
    for (position, enumeration) in config.enums().iter().enumerate() {
        if enumeration.id().index() != position {
            return Err(misplaced(
                "enumeration",
                enumeration.name(),
                position,
                format!("{:?}", enumeration.id()),
            ));
        }
    }
    for (position, bitfield) in config.bitfields().iter().enumerate() {
        if bitfield.id().index() != position {
            return Err(misplaced(
                "bitfield",
                bitfield.name(),
                position,
                format!("{:?}", bitfield.id()),
            ));
        }
    }
    Ok(())
}

pub(crate) fn check(config: &Config) -> Result<()> {
    let top_level = config
        .entities()
        .iter()
        .map(Entity::name)
        .chain(config.enums().iter().map(Enumeration::name))
        .chain(config.bitfields().iter().map(Bitfield::name));
    check_names(top_level, NameScope::TopLevel)?;

    for entity in config.entities() {
        check_entity(entity)
            .map_err(|e| e.with_context(ErrorContext::new().with_entity(entity.name())))?;
    }
    for enumeration in config.enums() {
        check_names(
            enumeration.items().iter().map(|i| i.name()),
            NameScope::EnumItem,
        )
        .map_err(|e| e.with_context(ErrorContext::new().with_entity(enumeration.name())))?;
    }
    for bitfield in config.bitfields() {
        check_bitfield(bitfield)
            .map_err(|e| e.with_context(ErrorContext::new().with_entity(bitfield.name())))?;
    }
    Ok(())
}

fn check_entity(entity: &Entity) -> Result<()> {
    check_names(entity.fields().iter().map(|f| f.name()), NameScope::Field)?;
    check_names(
        entity.searches().iter().filter_map(|s| s.name()),
        NameScope::Search,
    )?;
    check_names(
        entity.updates().iter().filter_map(|u| u.name()),
        NameScope::Update,
    )?;
    check_names(
        entity.deletes().iter().filter_map(|d| d.name()),
        NameScope::Delete,
    )?;

    let mut keys: Vec<String> = Vec::with_capacity(entity.uniques().len());
    for unique in entity.uniques() {
        if unique.fields.len() < 2 {
            return Err(Error::invalid_declaration(
                "unique constraint needs at least two fields",
            ));
        }
        if let Some(field) = unique.repeated_field() {
            return Err(Error::duplicate_name(field, NameScope::Unique));
        }
        let key = unique.key();
        if keys.contains(&key) {
            return Err(Error::duplicate_name(key, NameScope::Unique));
        }
        keys.push(key);
    }

    let rowids = entity.fields().iter().filter(|f| f.flags.rowid).count();
    if rowids > 1 {
        return Err(Error::new(ErrorKind::MultipleRowIds(
            entity.name().to_string(),
        )));
    }
    Ok(())
}

fn check_bitfield(bitfield: &Bitfield) -> Result<()> {
    check_names(
        bitfield.items().iter().map(|i| i.name()),
        NameScope::BitItem,
    )?;
    if let Some(item) = bitfield.items().iter().find(|i| i.index() > MAX_BIT_INDEX) {
        return Err(Error::invalid_declaration(format!(
            "bit index {} of {} outside 0..={MAX_BIT_INDEX}",
            item.index(),
            item.name()
        )));
    }
    Ok(())
}
