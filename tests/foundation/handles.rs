//! Integration tests for handles

use schemata_foundation::{EntityId, FieldId, RoleId};

#[test]
fn handles_round_trip_their_index() {
    let id = EntityId::from_index(7).unwrap();
    assert_eq!(id.index(), 7);
    assert_eq!(format!("{id:?}"), "EntityId(7)");
}

#[test]
fn handles_order_by_index() {
    let a = RoleId::from_index(1).unwrap();
    let b = RoleId::from_index(2).unwrap();
    assert!(a < b);
}

#[test]
fn field_handles_carry_their_entity() {
    let entity = EntityId::from_index(3).unwrap();
    let field = FieldId::new(entity, 4).unwrap();
    assert_eq!(field.entity, entity);
    assert_eq!(field.position(), 4);
}

#[cfg(target_pointer_width = "64")]
#[test]
fn oversized_index_is_exhausted() {
    let err = EntityId::from_index(usize::MAX).unwrap_err();
    assert!(matches!(
        err.kind,
        schemata_foundation::ErrorKind::Exhausted("entity")
    ));
}
