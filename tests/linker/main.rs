//! Integration tests for Layer 2: Linker
//!
//! Tests for reference resolution, heights, role binding, and spec chains.

mod heights;
mod references;
mod rolemaps;
mod specs;

use schemata_model::Config;

/// Declares an entity with a row identifier `id`.
pub fn entity_with_rowid(config: &mut Config, name: &str) {
    let id = config.allocate_entity(name).unwrap();
    config
        .entity_mut(id)
        .unwrap()
        .allocate_field("id")
        .unwrap()
        .flags
        .rowid = true;
}

/// Adds a field `field` to `entity` referencing `target.id`.
pub fn reference(config: &mut Config, entity: &str, field: &str, target: &str) {
    let id = config.find_entity(entity).unwrap().id();
    config
        .entity_mut(id)
        .unwrap()
        .allocate_field(field)
        .unwrap()
        .set_reference(target, "id")
        .unwrap();
}
