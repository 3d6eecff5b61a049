//! Declare, link, and release a whole document.

use schemata_foundation::ErrorKind;
use schemata_linker::link;
use schemata_model::{Config, FieldType, Operation, Operator, SearchKind, teardown};

fn user_and_session() -> Config {
    let mut config = Config::new();
    config.allocate_role(None, "user").unwrap();

    let user = config.allocate_entity("user").unwrap();
    let e = config.entity_mut(user).unwrap();
    e.allocate_field("id").unwrap().flags.rowid = true;
    let email = e.allocate_field("email").unwrap();
    email.set_type(FieldType::Email).unwrap();
    email.flags.unique = true;
    e.allocate_search(SearchKind::Search, Some("byemail"))
        .unwrap()
        .add_param("email", Operator::Eq);
    e.rolemap
        .grant(Operation::Search, Some("byemail"), "user")
        .unwrap();

    let session = config.allocate_entity("session").unwrap();
    let e = config.entity_mut(session).unwrap();
    e.allocate_field("id").unwrap().flags.rowid = true;
    e.allocate_field("user_id")
        .unwrap()
        .set_reference("user", "id")
        .unwrap();
    e.allocate_search(SearchKind::List, Some("byuser"))
        .unwrap()
        .add_param("user_id.email", Operator::Eq);
    e.insert = true;
    e.rolemap.grant(Operation::Insert, None, "user").unwrap();
    config
}

#[test]
fn user_session_end_to_end() {
    let linked = link(user_and_session()).unwrap();

    let user = linked.find_entity("user").unwrap();
    let session = linked.find_entity("session").unwrap();
    assert_eq!(user.height(), 0);
    assert_eq!(session.height(), 1);

    let target = linked
        .reference_target(session.field("user_id").unwrap())
        .unwrap();
    assert_eq!(target.id(), user.field("id").unwrap().id());
    assert!(user.searches()[0].returns_unique());
    assert!(!session.searches()[0].returns_unique());
    assert!(linked.permits("session", Operation::Insert, None, "user"));

    let released = teardown(Some(linked.into_config()));
    assert_eq!(released.entities, 2);
    assert_eq!(released.fields, 4);
    assert_eq!(released.specs, 2);
    assert_eq!(released.grants, 2);
    assert_eq!(released.roles, 1);
}

#[test]
fn failed_link_releases_the_document() {
    let mut config = user_and_session();
    config.entities_mut()[1]
        .rolemap
        .grant(Operation::Delete, Some("purge"), "user")
        .unwrap();

    let err = link(config).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownSpec { .. }));
}

#[test]
fn linking_twice_is_stable() {
    let first = link(user_and_session()).unwrap();
    let second = link(first.into_config()).unwrap();
    assert_eq!(second.find_entity("session").unwrap().height(), 1);
}
