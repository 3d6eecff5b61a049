//! Integration tests for dependency heights

use proptest::prelude::*;
use schemata_foundation::{ErrorKind, LinkPass};
use schemata_linker::link;
use schemata_model::Config;

use crate::{entity_with_rowid, reference};

#[test]
fn referenced_entity_is_lower() {
    let mut config = Config::new();
    entity_with_rowid(&mut config, "session");
    entity_with_rowid(&mut config, "user");
    reference(&mut config, "session", "user_id", "user");

    let linked = link(config).unwrap();
    assert_eq!(linked.find_entity("user").unwrap().height(), 0);
    assert_eq!(linked.find_entity("session").unwrap().height(), 1);
    let order: Vec<&str> = linked.entities_by_height().map(|e| e.name()).collect();
    assert_eq!(order, ["user", "session"]);
}

#[test]
fn three_entity_cycle() {
    let mut config = Config::new();
    for name in ["a", "b", "c"] {
        entity_with_rowid(&mut config, name);
    }
    reference(&mut config, "a", "b_id", "b");
    reference(&mut config, "b", "c_id", "c");
    reference(&mut config, "c", "a_id", "a");

    let err = link(config).unwrap_err();
    assert_eq!(format!("{err}"), "reference cycle: a -> b -> c -> a");
    assert_eq!(err.context.unwrap().pass, Some(LinkPass::Heights));
}

#[test]
fn self_reference_is_a_cycle() {
    let mut config = Config::new();
    entity_with_rowid(&mut config, "node");
    reference(&mut config, "node", "parent_id", "node");

    let err = link(config).unwrap_err();
    assert_eq!(
        err.kind,
        ErrorKind::ReferenceCycle(vec!["node".to_string(), "node".to_string()])
    );
}

// =============================================================================
// Property Tests
// =============================================================================

/// Edges `(from, to)` with `to < from`, so the graph is acyclic.
fn dag(max: usize) -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (2..max).prop_flat_map(|n| {
        let edges = prop::collection::vec((1..n, any::<prop::sample::Index>()), 0..n * 2)
            .prop_map(|raw| {
                raw.into_iter()
                    .map(|(from, to)| (from, to.index(from)))
                    .collect::<Vec<_>>()
            });
        (Just(n), edges)
    })
}

fn build(n: usize, edges: &[(usize, usize)]) -> Config {
    let mut config = Config::new();
    for i in 0..n {
        entity_with_rowid(&mut config, &format!("e{i}"));
    }
    for (k, &(from, to)) in edges.iter().enumerate() {
        reference(&mut config, &format!("e{from}"), &format!("r{k}"), &format!("e{to}"));
    }
    config
}

proptest! {
    #[test]
    fn acyclic_graphs_link_with_ordered_heights((n, edges) in dag(12)) {
        let linked = link(build(n, &edges)).unwrap();
        for &(from, to) in &edges {
            let src = linked.find_entity(&format!("e{from}")).unwrap().height();
            let dst = linked.find_entity(&format!("e{to}")).unwrap().height();
            prop_assert!(src > dst);
        }
        let mut seen = Vec::new();
        for entity in linked.entities_by_height() {
            for field in entity.fields() {
                if let Some(target) = linked.reference_target(field) {
                    prop_assert!(seen.contains(&target.parent()));
                }
            }
            seen.push(entity.id());
        }
    }

    #[test]
    fn rings_always_fail(n in 1usize..8, extra in 0usize..4) {
        let mut edges: Vec<(usize, usize)> = (0..n).map(|i| (i, (i + 1) % n)).collect();
        edges.extend((0..extra).map(|k| (k % n, 0)));
        let err = link(build(n, &edges)).unwrap_err();
        let is_cycle = matches!(&err.kind, ErrorKind::ReferenceCycle(names) if names.first() == names.last());
        prop_assert!(is_cycle);
    }
}
