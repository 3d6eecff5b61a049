//! Integration tests for teardown

use schemata_model::{Config, Operation, Released, SearchKind, teardown};

#[test]
fn absent_document() {
    assert_eq!(teardown(None), Released::default());
}

#[test]
fn empty_document() {
    assert!(teardown(Some(Config::new())).is_empty());
}

#[test]
fn releases_every_declaration_once() {
    let mut config = Config::new();
    config.allocate_enum("status").unwrap();
    config.allocate_role(None, "admin").unwrap();
    config.add_source_file("db.ort").unwrap();
    config.add_source_file("db.ort").unwrap();
    for name in ["user", "session"] {
        let id = config.allocate_entity(name).unwrap();
        let e = config.entity_mut(id).unwrap();
        e.allocate_field("id").unwrap();
        e.allocate_search(SearchKind::List, None).unwrap();
        e.rolemap.grant(Operation::List, Some("x"), "admin").unwrap();
    }

    let released = teardown(Some(config));
    assert_eq!(released.entities, 2);
    assert_eq!(released.fields, 2);
    assert_eq!(released.specs, 2);
    assert_eq!(released.grants, 2);
    assert_eq!(released.enumerations, 1);
    assert_eq!(released.roles, 1);
    assert_eq!(released.source_files, 1);
    assert_eq!(released.languages, 0);
}
