//! Integration tests for role binding

use schemata_foundation::{ErrorKind, LinkPass};
use schemata_linker::{LinkConfig, Linker, link};
use schemata_model::{Config, Operation, Operator, SearchKind};

fn document() -> Config {
    let mut config = Config::new();
    let user = config.allocate_role(None, "user").unwrap();
    config.allocate_role(Some(user), "moderator").unwrap();
    config.allocate_role(None, "auditor").unwrap();
    let id = config.allocate_entity("post").unwrap();
    let e = config.entity_mut(id).unwrap();
    e.allocate_field("id").unwrap().flags.rowid = true;
    e.allocate_search(SearchKind::Search, Some("byid"))
        .unwrap()
        .add_param("id", Operator::Eq);
    e.insert = true;
    config
}

#[test]
fn grants_resolve_to_roles() {
    let mut config = document();
    let post = &mut config.entities_mut()[0];
    post.rolemap.grant(Operation::Insert, None, "user").unwrap();
    post.rolemap
        .grant(Operation::Search, Some("byid"), "moderator")
        .unwrap();

    let linked = link(config).unwrap();
    assert!(linked.permits("post", Operation::Insert, None, "user"));
    assert!(!linked.permits("post", Operation::Insert, None, "moderator"));
    assert!(linked.permits("post", Operation::Search, Some("byid"), "moderator"));
    assert!(!linked.permits("post", Operation::Search, Some("byid"), "user"));
    let unused: Vec<_> = linked
        .unused_roles()
        .iter()
        .filter_map(|&id| linked.role_name(id))
        .collect();
    assert_eq!(unused, ["auditor"]);
}

#[test]
fn unknown_role() {
    let mut config = document();
    config.entities_mut()[0]
        .rolemap
        .grant(Operation::Insert, None, "ghost")
        .unwrap();

    let err = link(config).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnknownRole("ghost".to_string()));
    let ctx = err.context.unwrap();
    assert_eq!(ctx.pass, Some(LinkPass::Rolemaps));
    assert_eq!(ctx.entity.as_deref(), Some("post"));
}

#[test]
fn unknown_search_target() {
    let mut config = document();
    config.entities_mut()[0]
        .rolemap
        .grant(Operation::Search, Some("bytitle"), "user")
        .unwrap();

    let err = link(config).unwrap_err();
    assert_eq!(
        err.kind,
        ErrorKind::UnknownSpec {
            entity: "post".to_string(),
            spec: "bytitle".to_string(),
        }
    );
}

#[test]
fn implicit_roles_can_be_granted() {
    let mut config = document();
    config.entities_mut()[0]
        .rolemap
        .grant(Operation::All, None, "all")
        .unwrap();

    let linked = Linker::new(LinkConfig::strict()).link(config).unwrap();
    assert!(linked.permits("post", Operation::Search, Some("byid"), "all"));
    assert!(linked.has_role("default"));
}
