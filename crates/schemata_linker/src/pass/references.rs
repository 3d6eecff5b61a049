//! Pass 1: resolve foreign keys, struct sources, and enumeration and
//! bit-field links.
//!
//! Enumeration items declared without a value are numbered here, one past
//! the largest value seen so far in declaration order, before enum defaults
//! are checked against them.

use schemata_foundation::{
    BitfieldId, EntityId, EnumId, Error, ErrorContext, ErrorKind, FieldId, Result, eq_ignore_case,
};
use schemata_model::{
    Bitfield, Config, DefaultValue, Entity, Enumeration, Field, FieldType, RefAction,
};

use super::qualified;

enum Binding {
    Reference { target: FieldId, source: FieldId },
    Struct { field: FieldId, entity: EntityId },
    Enum(EnumId),
    Bitfield(BitfieldId),
}

pub(crate) fn resolve(config: &mut Config) -> Result<()> {
    let values = config
        .enums()
        .iter()
        .map(|e| {
            number(e).map_err(|err| err.with_context(ErrorContext::new().with_entity(e.name())))
        })
        .collect::<Result<Vec<_>>>()?;
    for bitfield in config.bitfields() {
        check_bitfield(bitfield)
            .map_err(|err| err.with_context(ErrorContext::new().with_entity(bitfield.name())))?;
    }

    let mut bindings = Vec::new();
    for entity in config.entities() {
        for field in entity.fields() {
            resolve_field(config, &values, entity, field, &mut bindings).map_err(|err| {
                err.with_context(
                    ErrorContext::new()
                        .with_entity(entity.name())
                        .with_field(field.name()),
                )
            })?;
        }
    }

    for (enumeration, values) in config.enums_mut().iter_mut().zip(values) {
        for (item, value) in enumeration.items_mut().iter_mut().zip(values) {
            item.value = Some(value);
        }
    }
    for (id, binding) in bindings {
        let Some(field) = config
            .entities_mut()
            .get_mut(id.entity.index())
            .and_then(|e| e.fields_mut().get_mut(id.position()))
        else {
            continue;
        };
        match binding {
            Binding::Reference { target, source } => {
                if let Some(r) = field.reference_mut() {
                    r.bind(target, source);
                }
            }
            Binding::Struct {
                field: local,
                entity,
            } => {
                if let Some(s) = field.struct_source_mut() {
                    s.bind(local, entity);
                }
            }
            Binding::Enum(e) => {
                if let Some(link) = field.enumeration_mut() {
                    link.bind(e);
                }
            }
            Binding::Bitfield(b) => {
                if let Some(link) = field.bitfield_mut() {
                    link.bind(b);
                }
            }
        }
    }
    Ok(())
}

/// Computes the value of every item of an enumeration.
fn number(enumeration: &Enumeration) -> Result<Vec<i64>> {
    if enumeration.items().is_empty() {
        return Err(Error::invalid_declaration(format!(
            "enumeration {} has no items",
            enumeration.name()
        )));
    }
    let mut values: Vec<i64> = Vec::with_capacity(enumeration.items().len());
    let mut max: Option<i64> = None;
    for item in enumeration.items() {
        let value = match (item.value, max) {
            (Some(v), _) => v,
            (None, None) => 0,
            (None, Some(m)) => m.checked_add(1).ok_or_else(|| {
                Error::invalid_declaration(format!(
                    "no value left for {}",
                    qualified(enumeration.name(), item.name())
                ))
            })?,
        };
        if values.contains(&value) {
            return Err(Error::new(ErrorKind::DuplicateValue {
                name: qualified(enumeration.name(), item.name()),
                value,
            }));
        }
        max = Some(max.map_or(value, |m| m.max(value)));
        values.push(value);
    }
    Ok(values)
}

fn check_bitfield(bitfield: &Bitfield) -> Result<()> {
    if bitfield.items().is_empty() {
        return Err(Error::invalid_declaration(format!(
            "bitfield {} has no items",
            bitfield.name()
        )));
    }
    let mut seen = 0u64;
    for item in bitfield.items() {
        if seen & item.mask() != 0 {
            return Err(Error::new(ErrorKind::DuplicateValue {
                name: qualified(bitfield.name(), item.name()),
                value: i64::from(item.index()),
            }));
        }
        seen |= item.mask();
    }
    Ok(())
}

fn resolve_field(
    config: &Config,
    values: &[Vec<i64>],
    entity: &Entity,
    field: &Field,
    out: &mut Vec<(FieldId, Binding)>,
) -> Result<()> {
    match field.reference() {
        Some(reference) => {
            if !eq_ignore_case(&reference.source_field, field.name()) {
                return Err(Error::invalid_declaration(format!(
                    "reference source {} is not the field carrying it",
                    reference.source_field
                )));
            }
            let from = qualified(entity.name(), field.name());
            let target_entity = config
                .find_entity(&reference.target_entity)
                .ok_or_else(|| {
                    Error::new(ErrorKind::UnknownTargetEntity {
                        field: from.clone(),
                        entity: reference.target_entity.clone(),
                    })
                })?;
            let target = target_entity
                .field(&reference.target_field)
                .ok_or_else(|| {
                    Error::new(ErrorKind::UnknownTargetField {
                        entity: target_entity.name().to_string(),
                        field: reference.target_field.clone(),
                    })
                })?;
            if !target.is_unique_key() || target.ty() != field.ty() {
                return Err(Error::new(ErrorKind::InvalidTarget {
                    from,
                    to: qualified(target_entity.name(), target.name()),
                }));
            }
            for action in [field.on_update, field.on_delete] {
                if action == RefAction::Nullify && !field.flags.null {
                    return Err(Error::invalid_declaration(format!(
                        "{from} nullifies on change but is not nullable"
                    )));
                }
            }
            out.push((
                field.id(),
                Binding::Reference {
                    target: target.id(),
                    source: field.id(),
                },
            ));
        }
        None => {
            if field.on_update != RefAction::None || field.on_delete != RefAction::None {
                return Err(Error::invalid_declaration(format!(
                    "referential action on {} without a foreign key",
                    field.name()
                )));
            }
        }
    }

    if let Some(source) = field.struct_source() {
        let local = entity
            .field(&source.field)
            .ok_or_else(|| Error::unknown_field(entity.name(), &source.field))?;
        let Some(reference) = local.reference() else {
            return Err(Error::new(ErrorKind::InvalidTarget {
                from: qualified(entity.name(), field.name()),
                to: qualified(entity.name(), local.name()),
            }));
        };
        let embedded = config
            .find_entity(&reference.target_entity)
            .ok_or_else(|| {
                Error::new(ErrorKind::UnknownTargetEntity {
                    field: qualified(entity.name(), local.name()),
                    entity: reference.target_entity.clone(),
                })
            })?;
        out.push((
            field.id(),
            Binding::Struct {
                field: local.id(),
                entity: embedded.id(),
            },
        ));
    }

    if let Some(link) = field.enumeration() {
        let enumeration = config
            .find_enum(&link.name)
            .ok_or_else(|| Error::new(ErrorKind::UnknownEnum(link.name.clone())))?;
        if let Some(DefaultValue::Integer(v)) = field.default_value() {
            let known = values
                .get(enumeration.id().index())
                .is_some_and(|numbered| numbered.contains(v));
            if !known {
                return Err(Error::invalid_default(format!(
                    "{v} is not a value of {}",
                    enumeration.name()
                )));
            }
        }
        out.push((field.id(), Binding::Enum(enumeration.id())));
    }

    if let Some(link) = field.bitfield() {
        let bitfield = config
            .find_bitfield(&link.name)
            .ok_or_else(|| Error::new(ErrorKind::UnknownBitfield(link.name.clone())))?;
        if let Some(DefaultValue::Integer(v)) = field.default_value() {
            let declared = bitfield.items().iter().fold(0u64, |m, i| m | i.mask());
            if u64::from_ne_bytes(v.to_ne_bytes()) & !declared != 0 {
                return Err(Error::invalid_default(format!(
                    "{v} sets bits not declared in {}",
                    bitfield.name()
                )));
            }
        }
        out.push((field.id(), Binding::Bitfield(bitfield.id())));
    }

    if field.ty() == FieldType::Struct && field.struct_source().is_none() {
        return Err(Error::invalid_declaration(format!(
            "struct field {} has no source",
            field.name()
        )));
    }
    Ok(())
}
