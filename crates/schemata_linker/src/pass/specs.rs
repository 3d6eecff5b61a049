//! Pass 5: bind the field chains of search, update, delete, and unique specs.
//!
//! A dotted path resolves one component at a time. Every component except
//! the last must be a reference or struct field, and resolution continues in
//! the entity it leads to. References and struct sources are bound by now.

use schemata_foundation::{Error, ErrorContext, FieldId, Result};
use schemata_model::{
    Config, Entity, Field, FieldPath, FieldType, Modifier, Operator, Search, SearchKind, Unique,
    Update, UpdateKind,
};

use super::qualified;

/// What the last component of a path must be.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Terminal {
    /// A value-bearing field: anything but `struct`.
    Value,
    /// A field leading to another entity.
    Entity,
}

#[derive(Default)]
struct SearchChains {
    params: Vec<Vec<FieldId>>,
    orders: Vec<Vec<FieldId>>,
    aggregate: Option<(Vec<FieldId>, Vec<FieldId>)>,
    distinct: Option<Vec<FieldId>>,
    unique: bool,
}

struct UpdateChains {
    modify: Vec<Vec<FieldId>>,
    constrain: Vec<Vec<FieldId>>,
}

struct EntityChains {
    searches: Vec<SearchChains>,
    updates: Vec<UpdateChains>,
    deletes: Vec<UpdateChains>,
    uniques: Vec<Vec<Vec<FieldId>>>,
}

pub(crate) fn bind(config: &mut Config) -> Result<()> {
    let mut all = Vec::with_capacity(config.entities().len());
    for entity in config.entities() {
        all.push(entity_chains(config, entity)?);
    }

    for (entity, chains) in config.entities_mut().iter_mut().zip(all) {
        for (search, c) in entity.searches_mut().iter_mut().zip(chains.searches) {
            for (param, chain) in search.params.iter_mut().zip(c.params) {
                param.path.bind(chain);
            }
            for (order, chain) in search.orders.iter_mut().zip(c.orders) {
                order.path.bind(chain);
            }
            if let (Some(aggregate), Some((path, group))) = (&mut search.aggregate, c.aggregate) {
                aggregate.path.bind(path);
                aggregate.group.bind(group);
            }
            if let (Some(distinct), Some(chain)) = (&mut search.distinct, c.distinct) {
                distinct.path.bind(chain);
            }
            search.bind_unique(c.unique);
        }
        for (update, c) in entity.updates_mut().iter_mut().zip(chains.updates) {
            bind_update(update, c);
        }
        for (delete, c) in entity.deletes_mut().iter_mut().zip(chains.deletes) {
            bind_update(delete, c);
        }
        for (unique, chains) in entity.uniques_mut().iter_mut().zip(chains.uniques) {
            for (path, chain) in unique.fields.iter_mut().zip(chains) {
                path.bind(chain);
            }
        }
    }
    Ok(())
}

fn bind_update(update: &mut Update, chains: UpdateChains) {
    for (modify, chain) in update.modify.iter_mut().zip(chains.modify) {
        modify.path.bind(chain);
    }
    for (constraint, chain) in update.constrain.iter_mut().zip(chains.constrain) {
        constraint.path.bind(chain);
    }
}

fn entity_chains(config: &Config, entity: &Entity) -> Result<EntityChains> {
    let in_spec = move |spec: String| {
        move |e: Error| e.with_context(ErrorContext::new().with_entity(entity.name()).with_spec(spec))
    };

    let searches = entity
        .searches()
        .iter()
        .map(|s| search_chains(config, entity, s).map_err(in_spec(s.label())))
        .collect::<Result<Vec<_>>>()?;
    let updates = entity
        .updates()
        .iter()
        .map(|u| update_chains(config, entity, u).map_err(in_spec(u.label())))
        .collect::<Result<Vec<_>>>()?;
    let deletes = entity
        .deletes()
        .iter()
        .map(|d| update_chains(config, entity, d).map_err(in_spec(d.label())))
        .collect::<Result<Vec<_>>>()?;
    let uniques = entity
        .uniques()
        .iter()
        .map(|u| unique_chains(config, entity, u).map_err(in_spec(u.key())))
        .collect::<Result<Vec<_>>>()?;

    Ok(EntityChains {
        searches,
        updates,
        deletes,
        uniques,
    })
}

fn search_chains(config: &Config, owner: &Entity, search: &Search) -> Result<SearchChains> {
    let mut chains = SearchChains::default();
    for param in &search.params {
        let chain = resolve(config, owner, &param.path, Terminal::Value)?;
        check_operator(config, &chain, param.op, &param.path)?;
        chains.params.push(chain);
    }
    for order in &search.orders {
        chains
            .orders
            .push(resolve(config, owner, &order.path, Terminal::Value)?);
    }
    if let Some(aggregate) = &search.aggregate {
        chains.aggregate = Some((
            resolve(config, owner, &aggregate.path, Terminal::Value)?,
            resolve(config, owner, &aggregate.group, Terminal::Value)?,
        ));
    }
    if let Some(distinct) = &search.distinct {
        chains.distinct = Some(resolve(config, owner, &distinct.path, Terminal::Entity)?);
    }

    chains.unique = search.kind() == SearchKind::Search
        && search.params.iter().zip(&chains.params).any(|(param, chain)| {
            param.path.is_local()
                && matches!(param.op, Operator::Eq | Operator::StrEq)
                && chain
                    .first()
                    .and_then(|id| field(config, *id))
                    .is_some_and(Field::is_unique_key)
        });
    Ok(chains)
}

fn update_chains(config: &Config, owner: &Entity, update: &Update) -> Result<UpdateChains> {
    if update.kind() == UpdateKind::Delete && !update.modify.is_empty() {
        return Err(Error::invalid_declaration("a delete cannot modify fields"));
    }
    let mut modify = Vec::with_capacity(update.modify.len());
    for m in &update.modify {
        let chain = resolve_local(config, owner, &m.path)?;
        check_modifier(config, &chain, m.modifier, &m.path)?;
        modify.push(chain);
    }
    let mut constrain = Vec::with_capacity(update.constrain.len());
    for c in &update.constrain {
        let chain = resolve(config, owner, &c.path, Terminal::Value)?;
        check_operator(config, &chain, c.op, &c.path)?;
        constrain.push(chain);
    }
    Ok(UpdateChains { modify, constrain })
}

fn unique_chains(config: &Config, owner: &Entity, unique: &Unique) -> Result<Vec<Vec<FieldId>>> {
    unique
        .fields
        .iter()
        .map(|path| resolve_local(config, owner, path))
        .collect()
}

fn resolve_local(config: &Config, owner: &Entity, path: &FieldPath) -> Result<Vec<FieldId>> {
    if !path.is_local() {
        return Err(Error::invalid_declaration(format!(
            "{path} must name a field of {}",
            owner.name()
        )));
    }
    resolve(config, owner, path, Terminal::Value)
}

/// Resolves `path` starting at `owner`, returning one field per component.
fn resolve(
    config: &Config,
    owner: &Entity,
    path: &FieldPath,
    terminal: Terminal,
) -> Result<Vec<FieldId>> {
    let count = path.names().len();
    if count == 0 && terminal == Terminal::Value {
        return Err(Error::invalid_declaration("empty field path"));
    }
    let mut entity = owner;
    let mut chain = Vec::with_capacity(count);
    for (i, name) in path.names().iter().enumerate() {
        let field = entity
            .field(name)
            .ok_or_else(|| Error::unknown_field(entity.name(), name))?;
        chain.push(field.id());

        let last = i + 1 == count;
        if last && terminal == Terminal::Value {
            if field.ty() == FieldType::Struct {
                return Err(Error::invalid_declaration(format!(
                    "{path} ends at struct field {}",
                    qualified(entity.name(), field.name())
                )));
            }
            break;
        }

        let next = field
            .reference()
            .and_then(|r| r.target_entity_id())
            .or_else(|| field.struct_source().and_then(|s| s.entity()))
            .and_then(|id| config.entity(id));
        match next {
            Some(next) => entity = next,
            None => {
                return Err(Error::invalid_declaration(format!(
                    "{} in {path} does not lead to another entity",
                    qualified(entity.name(), field.name())
                )));
            }
        }
    }
    Ok(chain)
}

fn field(config: &Config, id: FieldId) -> Option<&Field> {
    config
        .entity(id.entity)
        .and_then(|e| e.field_at(id.position()))
}

fn terminal_type(config: &Config, chain: &[FieldId]) -> Option<FieldType> {
    chain
        .last()
        .and_then(|id| field(config, *id))
        .map(Field::ty)
}

fn check_operator(
    config: &Config,
    chain: &[FieldId],
    op: Operator,
    path: &FieldPath,
) -> Result<()> {
    let Some(ty) = terminal_type(config, chain) else {
        return Ok(());
    };
    let fits = match op {
        Operator::Like => ty.is_textual(),
        Operator::And | Operator::Or => ty.is_integral(),
        _ => true,
    };
    if fits {
        Ok(())
    } else {
        Err(Error::invalid_declaration(format!(
            "operator {op:?} does not apply to {ty} field {path}"
        )))
    }
}

fn check_modifier(
    config: &Config,
    chain: &[FieldId],
    modifier: Modifier,
    path: &FieldPath,
) -> Result<()> {
    let Some(ty) = terminal_type(config, chain) else {
        return Ok(());
    };
    let fits = match modifier {
        Modifier::Inc | Modifier::Dec => ty.is_integral() || ty == FieldType::Real,
        Modifier::Concat => ty.is_textual(),
        Modifier::Set | Modifier::StrSet => true,
    };
    if fits {
        Ok(())
    } else {
        Err(Error::invalid_declaration(format!(
            "modifier {modifier:?} does not apply to {ty} field {path}"
        )))
    }
}
