//! Integration tests for declaration allocation

use proptest::prelude::*;
use schemata_foundation::{ErrorKind, NameScope};
use schemata_model::{Config, SearchKind};

// =============================================================================
// Top-Level Names
// =============================================================================

#[test]
fn reserved_entity_rejected_in_any_case() {
    let mut config = Config::new();
    for name in ["where", "Where", "WHERE"] {
        let err = config.allocate_entity(name).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ReservedName(name.to_string()));
    }
    assert!(config.entities().is_empty());
}

#[test]
fn duplicate_entity_differs_only_in_case() {
    let mut config = Config::new();
    config.allocate_entity("Foo").unwrap();
    let err = config.allocate_entity("foo").unwrap_err();
    assert_eq!(
        err.kind,
        ErrorKind::DuplicateName {
            name: "foo".to_string(),
            scope: NameScope::TopLevel,
        }
    );
    assert_eq!(config.entities().len(), 1);
}

#[test]
fn enumerations_share_the_entity_namespace() {
    let mut config = Config::new();
    config.allocate_entity("status").unwrap();
    assert!(config.allocate_enum("Status").is_err());
    assert!(config.allocate_bitfield("STATUS").is_err());
    assert!(config.enums().is_empty());
    assert!(config.bitfields().is_empty());
}

#[test]
fn canonical_names_are_upper_case() {
    let mut config = Config::new();
    let id = config.allocate_entity("userSession").unwrap();
    assert_eq!(config.entity(id).unwrap().canonical(), "USERSESSION");
}

// =============================================================================
// Entity Members
// =============================================================================

#[test]
fn same_field_name_in_two_entities() {
    let mut config = Config::new();
    let a = config.allocate_entity("a").unwrap();
    let b = config.allocate_entity("b").unwrap();
    config.entity_mut(a).unwrap().allocate_field("Bar").unwrap();
    config.entity_mut(b).unwrap().allocate_field("bar").unwrap();

    let err = config
        .entity_mut(a)
        .unwrap()
        .allocate_field("bar")
        .unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::DuplicateName {
            scope: NameScope::Field,
            ..
        }
    ));
}

#[test]
fn field_handles_follow_declaration_order() {
    let mut config = Config::new();
    let id = config.allocate_entity("user").unwrap();
    let e = config.entity_mut(id).unwrap();
    e.allocate_field("id").unwrap();
    e.allocate_field("email").unwrap();

    let email = config.entity(id).unwrap().field("EMAIL").unwrap();
    assert_eq!(email.id().entity, id);
    assert_eq!(email.id().position(), 1);
}

#[test]
fn anonymous_searches_never_collide() {
    let mut config = Config::new();
    let id = config.allocate_entity("user").unwrap();
    let e = config.entity_mut(id).unwrap();
    e.allocate_search(SearchKind::List, None).unwrap();
    e.allocate_search(SearchKind::List, None).unwrap();
    e.allocate_search(SearchKind::Search, Some("byid")).unwrap();
    assert!(e.allocate_search(SearchKind::Count, Some("ByID")).is_err());
    assert_eq!(e.searches().len(), 3);
}

#[test]
fn single_field_unique_is_invalid() {
    let mut config = Config::new();
    let id = config.allocate_entity("user").unwrap();
    let e = config.entity_mut(id).unwrap();
    let err = e.allocate_unique(&["email"]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidDeclaration(_)));
    assert!(e.uniques().is_empty());
}

#[test]
fn unique_naming_a_field_twice_is_duplicate() {
    let mut config = Config::new();
    let id = config.allocate_entity("user").unwrap();
    let e = config.entity_mut(id).unwrap();
    let err = e.allocate_unique(&["id", "ID"]).unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::DuplicateName {
            scope: NameScope::Unique,
            ..
        }
    ));
    assert!(e.uniques().is_empty());
}

#[test]
fn bit_index_out_of_range() {
    let mut config = Config::new();
    config.allocate_bitfield("perms").unwrap();
    let set = &mut config.bitfields_mut()[0];
    assert!(set.allocate_item("read", 0).is_ok());
    assert!(set.allocate_item("write", 63).is_ok());
    assert!(set.allocate_item("exec", 64).is_err());
    assert!(set.allocate_item("none", -1).is_err());
    assert_eq!(set.items().len(), 2);
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #[test]
    fn accepted_names_are_pairwise_distinct(names in prop::collection::vec("[a-zA-Z]{1,6}", 1..40)) {
        let mut config = Config::new();
        for name in &names {
            let _ = config.allocate_entity(name);
        }
        let accepted: Vec<String> = config
            .entities()
            .iter()
            .map(|e| e.name().to_ascii_lowercase())
            .collect();
        let mut deduped = accepted.clone();
        deduped.sort();
        deduped.dedup();
        prop_assert_eq!(accepted.len(), deduped.len());
        for name in &accepted {
            prop_assert!(!schemata_foundation::is_reserved(name));
        }
    }

    #[test]
    fn failed_allocation_leaves_document_unchanged(name in "[a-z]{1,8}") {
        let mut config = Config::new();
        config.allocate_entity(&name).ok();
        let before = config.clone();
        if config.allocate_entity(&name.to_ascii_uppercase()).is_err() {
            prop_assert_eq!(&before, &config);
        }
    }
}
