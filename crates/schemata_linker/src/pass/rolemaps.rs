//! Pass 4: bind rolemap entries to roles and to the specs they target.
//!
//! Grants are recorded exactly as declared. Nothing propagates to ancestors
//! or descendants in the role tree.

use schemata_foundation::{Error, ErrorContext, ErrorKind, Result, RoleId, eq_ignore_case};
use schemata_model::{Config, Entity, Grant, Operation, RoleTree, SearchKind};
use tracing::warn;

type GrantBinding = (Vec<RoleId>, Option<usize>);

/// Binds every grant, returning the declared roles that nothing grants.
pub(crate) fn bind(config: &mut Config) -> Result<Vec<RoleId>> {
    let mut bindings: Vec<Vec<GrantBinding>> = Vec::with_capacity(config.entities().len());
    for entity in config.entities() {
        let mut per_entity = Vec::with_capacity(entity.rolemap.len());
        for grant in entity.rolemap.grants() {
            let bound = bind_grant(config.roles(), entity, grant).map_err(|e| {
                let spec = match grant.target() {
                    Some(t) => format!("{} {t}", grant.op()),
                    None => grant.op().to_string(),
                };
                e.with_context(ErrorContext::new().with_entity(entity.name()).with_spec(spec))
            })?;
            per_entity.push(bound);
        }
        if !entity.insert
            && entity
                .rolemap
                .grants()
                .iter()
                .any(|g| g.op() == Operation::Insert)
        {
            warn!(entity = entity.name(), "insert granted but never declared");
        }
        bindings.push(per_entity);
    }

    let mut used = vec![false; config.roles().len()];
    for (roles, _) in bindings.iter().flatten() {
        for role in roles {
            used[role.index()] = true;
        }
    }
    let unused = config
        .roles()
        .iter()
        .filter(|(id, role)| !role.is_implicit() && !used[id.index()])
        .map(|(id, _)| id)
        .collect();

    for (entity, per_entity) in config.entities_mut().iter_mut().zip(bindings) {
        for (grant, (roles, target)) in entity.rolemap.grants_mut().iter_mut().zip(per_entity) {
            grant.bind(roles, target);
        }
    }
    Ok(unused)
}

fn bind_grant(tree: &RoleTree, entity: &Entity, grant: &Grant) -> Result<GrantBinding> {
    let roles = grant
        .roles()
        .iter()
        .map(|name| tree.find(name).ok_or_else(|| Error::unknown_role(name)))
        .collect::<Result<Vec<_>>>()?;

    let op = grant.op();
    let target = match (op.takes_target(), grant.target()) {
        (false, None) => None,
        (false, Some(t)) => {
            return Err(Error::invalid_declaration(format!(
                "{op} grant cannot target {t}"
            )));
        }
        (true, None) => {
            return Err(Error::invalid_declaration(format!(
                "{op} grant needs a target"
            )));
        }
        (true, Some(t)) => Some(resolve_target(entity, op, t)?),
    };
    Ok((roles, target))
}

fn resolve_target(entity: &Entity, op: Operation, target: &str) -> Result<usize> {
    let named = |name: Option<&str>| name.is_some_and(|n| eq_ignore_case(n, target));
    let kind = match op {
        Operation::Search => Some(SearchKind::Search),
        Operation::List => Some(SearchKind::List),
        Operation::Iterate => Some(SearchKind::Iterate),
        Operation::Count => Some(SearchKind::Count),
        _ => None,
    };
    let position = match (op, kind) {
        (_, Some(kind)) => entity
            .searches()
            .iter()
            .position(|s| s.kind() == kind && named(s.name())),
        (Operation::Update, _) => entity.updates().iter().position(|u| named(u.name())),
        (Operation::Delete, _) => entity.deletes().iter().position(|d| named(d.name())),
        (Operation::NoExport, _) => {
            return entity
                .fields()
                .iter()
                .position(|f| eq_ignore_case(f.name(), target))
                .ok_or_else(|| Error::unknown_field(entity.name(), target));
        }
        _ => None,
    };
    position.ok_or_else(|| {
        Error::new(ErrorKind::UnknownSpec {
            entity: entity.name().to_string(),
            spec: target.to_string(),
        })
    })
}
