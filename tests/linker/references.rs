//! Integration tests for reference resolution

use schemata_foundation::{ErrorKind, LinkPass, Phase};
use schemata_linker::link;
use schemata_model::{Config, FieldType, RefAction};

use crate::{entity_with_rowid, reference};

#[test]
fn session_references_user() {
    let mut config = Config::new();
    entity_with_rowid(&mut config, "user");
    entity_with_rowid(&mut config, "session");
    reference(&mut config, "session", "user_id", "user");

    let linked = link(config).unwrap();
    let session = linked.find_entity("session").unwrap();
    let user_id = session.field("user_id").unwrap();
    let target = linked.reference_target(user_id).unwrap();
    assert_eq!(target.name(), "id");
    assert_eq!(linked.entity(target.parent()).unwrap().name(), "user");
    assert_eq!(user_id.reference().unwrap().source(), Some(user_id.id()));
}

#[test]
fn forward_reference_resolves() {
    let mut config = Config::new();
    entity_with_rowid(&mut config, "session");
    reference(&mut config, "session", "user_id", "user");
    entity_with_rowid(&mut config, "user");

    assert!(link(config).is_ok());
}

#[test]
fn unknown_target_entity() {
    let mut config = Config::new();
    entity_with_rowid(&mut config, "session");
    reference(&mut config, "session", "user_id", "user");

    let err = link(config).unwrap_err();
    assert_eq!(
        err.kind,
        ErrorKind::UnknownTargetEntity {
            field: "session.user_id".to_string(),
            entity: "user".to_string(),
        }
    );
    assert_eq!(err.context.unwrap().pass, Some(LinkPass::References));
}

#[test]
fn target_must_be_unique() {
    let mut config = Config::new();
    let user = config.allocate_entity("user").unwrap();
    config.entity_mut(user).unwrap().allocate_field("id").unwrap();
    entity_with_rowid(&mut config, "session");
    reference(&mut config, "session", "user_id", "user");

    let err = link(config).unwrap_err();
    assert_eq!(
        err.kind,
        ErrorKind::InvalidTarget {
            from: "session.user_id".to_string(),
            to: "user.id".to_string(),
        }
    );
}

#[test]
fn nullify_requires_null() {
    let mut config = Config::new();
    entity_with_rowid(&mut config, "user");
    entity_with_rowid(&mut config, "session");
    reference(&mut config, "session", "user_id", "user");
    let session = config.find_entity("session").unwrap().id();
    config
        .entity_mut(session)
        .unwrap()
        .field_mut("user_id")
        .unwrap()
        .on_delete = RefAction::Nullify;

    let err = link(config).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidDeclaration(_)));
    assert_eq!(err.phase(), Phase::Link);
}

#[test]
fn enum_items_are_numbered() {
    let mut config = Config::new();
    config.allocate_enum("status").unwrap();
    let status = &mut config.enums_mut()[0];
    status.allocate_item("active").unwrap();
    status.allocate_item("banned").unwrap().value = Some(10);
    status.allocate_item("gone").unwrap();
    let user = config.allocate_entity("user").unwrap();
    config
        .entity_mut(user)
        .unwrap()
        .allocate_field("status")
        .unwrap()
        .set_enum("status");

    let linked = link(config).unwrap();
    let values: Vec<_> = linked.enums()[0].items().iter().map(|i| i.value).collect();
    assert_eq!(values, [Some(0), Some(10), Some(11)]);
    let field = linked.find_entity("user").unwrap().field("status").unwrap();
    assert_eq!(field.ty(), FieldType::Enum);
    assert_eq!(linked.field_enum(field).unwrap().name(), "status");
}

#[test]
fn unknown_enumeration() {
    let mut config = Config::new();
    let user = config.allocate_entity("user").unwrap();
    config
        .entity_mut(user)
        .unwrap()
        .allocate_field("status")
        .unwrap()
        .set_enum("status");

    let err = link(config).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnknownEnum("status".to_string()));
}

#[test]
fn two_rowids_rejected() {
    let mut config = Config::new();
    entity_with_rowid(&mut config, "user");
    let user = config.find_entity("user").unwrap().id();
    config
        .entity_mut(user)
        .unwrap()
        .allocate_field("other")
        .unwrap()
        .flags
        .rowid = true;

    let err = link(config).unwrap_err();
    assert_eq!(err.kind, ErrorKind::MultipleRowIds("user".to_string()));
    assert_eq!(err.context.unwrap().pass, Some(LinkPass::Declarations));
}
