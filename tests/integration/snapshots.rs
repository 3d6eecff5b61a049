//! Snapshot files: save, load, and re-link.

use schemata_foundation::ErrorKind;
use schemata_linker::LinkConfig;
use schemata_model::{Config, teardown};
use schemata_runtime::{load_from_file, save_to_file, to_bytes};

fn document() -> Config {
    let mut config = Config::new();
    config.add_source_file("blog.ort").unwrap();
    for name in ["author", "post"] {
        let id = config.allocate_entity(name).unwrap();
        config
            .entity_mut(id)
            .unwrap()
            .allocate_field("id")
            .unwrap()
            .flags
            .rowid = true;
    }
    let post = config.find_entity("post").unwrap().id();
    config
        .entity_mut(post)
        .unwrap()
        .allocate_field("author_id")
        .unwrap()
        .set_reference("author", "id")
        .unwrap();
    config
}

#[test]
fn file_round_trip() {
    let path = std::env::temp_dir().join("schemata_test_blog.snap");
    save_to_file(&document(), &path).unwrap();

    let linked = load_from_file(&path, LinkConfig::default()).unwrap();
    assert_eq!(linked.source_files(), ["blog.ort"]);
    assert_eq!(linked.find_entity("post").unwrap().height(), 1);
    assert!(!teardown(Some(linked.into_config())).is_empty());

    std::fs::remove_file(&path).ok();
}

#[test]
fn loading_rechecks_declarations_even_when_trusted() {
    let mut config = document();
    config.entities_mut()[0]
        .allocate_field("other")
        .unwrap()
        .flags
        .rowid = true;
    let path = std::env::temp_dir().join("schemata_test_rowids.snap");
    std::fs::write(&path, to_bytes(&config).unwrap()).unwrap();

    let err = load_from_file(&path, LinkConfig::trusted()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::MultipleRowIds("author".to_string()));

    std::fs::remove_file(&path).ok();
}
