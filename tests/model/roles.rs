//! Integration tests for the role tree

use schemata_foundation::{ErrorKind, NameScope};
use schemata_model::{Config, ROLE_ALL, ROLE_DEFAULT, ROLE_NONE, RoleTree};

#[test]
fn implicit_roles_are_present() {
    let tree = RoleTree::new();
    for name in [ROLE_ALL, ROLE_NONE, ROLE_DEFAULT] {
        let id = tree.find(name).unwrap();
        assert!(tree.get(id).unwrap().is_implicit());
    }
    assert_eq!(tree.roots().len(), 3);
}

#[test]
fn role_names_are_unique_across_the_tree() {
    let mut config = Config::new();
    let admin = config.allocate_role(None, "admin").unwrap();
    config.allocate_role(Some(admin), "operator").unwrap();

    let err = config.allocate_role(None, "Operator").unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::DuplicateName {
            scope: NameScope::Role,
            ..
        }
    ));
    let err = config.allocate_role(Some(admin), "default").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ReservedName(_)));
}

#[test]
fn children_keep_declaration_order() {
    let mut tree = RoleTree::new();
    let admin = tree.allocate(None, "admin").unwrap();
    let b = tree.allocate(Some(admin), "beta").unwrap();
    let a = tree.allocate(Some(admin), "alpha").unwrap();
    assert_eq!(tree.get(admin).unwrap().children(), [b, a]);
    assert_eq!(tree.ancestors(a), [admin]);
}
