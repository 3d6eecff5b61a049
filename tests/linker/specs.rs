//! Integration tests for search, update, and unique chains

use schemata_foundation::{ErrorKind, LinkPass};
use schemata_linker::link;
use schemata_model::{Config, FieldType, Modifier, Operator, SearchKind};

use crate::{entity_with_rowid, reference};

/// `comment -> post -> author`, each with a text field.
fn blog() -> Config {
    let mut config = Config::new();
    for name in ["author", "post", "comment"] {
        entity_with_rowid(&mut config, name);
        let id = config.find_entity(name).unwrap().id();
        config
            .entity_mut(id)
            .unwrap()
            .allocate_field("body")
            .unwrap()
            .set_type(FieldType::Text)
            .unwrap();
    }
    reference(&mut config, "post", "author_id", "author");
    reference(&mut config, "comment", "post_id", "post");
    config
}

fn entity_mut<'a>(config: &'a mut Config, name: &str) -> &'a mut schemata_model::Entity {
    let id = config.find_entity(name).unwrap().id();
    config.entity_mut(id).unwrap()
}

#[test]
fn search_crosses_two_references() {
    let mut config = blog();
    entity_mut(&mut config, "comment")
        .allocate_search(SearchKind::List, Some("byauthor"))
        .unwrap()
        .add_param("post_id.author_id.body", Operator::Like);

    let linked = link(config).unwrap();
    let comment = linked.find_entity("comment").unwrap();
    let path = &comment.searches()[0].params[0].path;
    assert_eq!(path.chain().len(), 3);
    let terminal = linked.field(path.terminal().unwrap()).unwrap();
    assert_eq!(terminal.name(), "body");
    assert_eq!(linked.entity(terminal.parent()).unwrap().name(), "author");
}

#[test]
fn unknown_component() {
    let mut config = blog();
    entity_mut(&mut config, "comment")
        .allocate_search(SearchKind::Search, Some("bytitle"))
        .unwrap()
        .add_param("post_id.title", Operator::Eq);

    let err = link(config).unwrap_err();
    assert_eq!(
        err.kind,
        ErrorKind::UnknownField {
            entity: "post".to_string(),
            field: "title".to_string(),
        }
    );
    let ctx = err.context.unwrap();
    assert_eq!(ctx.pass, Some(LinkPass::Specs));
    assert_eq!(ctx.entity.as_deref(), Some("comment"));
}

#[test]
fn search_on_rowid_returns_unique() {
    let mut config = blog();
    let post = entity_mut(&mut config, "post");
    post.allocate_search(SearchKind::Search, Some("byid"))
        .unwrap()
        .add_param("id", Operator::Eq);
    post.allocate_search(SearchKind::Search, Some("bybody"))
        .unwrap()
        .add_param("body", Operator::Eq);

    let linked = link(config).unwrap();
    let searches = linked.find_entity("post").unwrap().searches();
    assert!(searches[0].returns_unique());
    assert!(!searches[1].returns_unique());
}

#[test]
fn update_modifies_local_fields_only() {
    let mut config = blog();
    entity_mut(&mut config, "comment")
        .allocate_update(Some("retitle"))
        .unwrap()
        .add_modify("post_id.body", Modifier::Set);

    let err = link(config).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidDeclaration(_)));
}

#[test]
fn update_constrains_through_references() {
    let mut config = blog();
    entity_mut(&mut config, "comment")
        .allocate_update(Some("edit"))
        .unwrap()
        .add_modify("body", Modifier::Concat)
        .add_constraint("post_id.id", Operator::Eq);

    let linked = link(config).unwrap();
    let update = &linked.find_entity("comment").unwrap().updates()[0];
    assert!(update.modify[0].path.is_local());
    assert_eq!(update.constrain[0].path.chain().len(), 2);
}

#[test]
fn unique_fields_resolve() {
    let mut config = blog();
    entity_mut(&mut config, "post")
        .allocate_unique(&["author_id", "body"])
        .unwrap();

    let linked = link(config).unwrap();
    let unique = &linked.find_entity("post").unwrap().uniques()[0];
    assert!(unique.fields.iter().all(|p| p.is_resolved()));
}
