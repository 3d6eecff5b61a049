//! Compile sessions collecting diagnostics across declarations.

use schemata_foundation::{ErrorKind, NameScope};
use schemata_model::FieldType;
use schemata_runtime::Session;

#[test]
fn diagnostics_keep_their_file() {
    let mut session = Session::new();
    session.begin_file("users.ort");
    let user = session.entity("user").unwrap();
    session.field(user, "Name", |f| f.set_type(FieldType::Text));
    session.field(user, "name", |_| Ok(()));
    session.begin_file("roles.ort");
    session.role(None, "order");

    let err = session.finish().unwrap_err();
    assert_eq!(err.diagnostics.len(), 2);
    assert_eq!(err.diagnostics[0].file.as_deref(), Some("users.ort"));
    assert_eq!(
        err.diagnostics[0].error.kind,
        ErrorKind::DuplicateName {
            name: "name".to_string(),
            scope: NameScope::Field,
        }
    );
    assert_eq!(err.diagnostics[1].file.as_deref(), Some("roles.ort"));
    assert!(matches!(
        err.diagnostics[1].error.kind,
        ErrorKind::ReservedName(_)
    ));
}

#[test]
fn clean_session_links_in_height_order() {
    let mut session = Session::new();
    let session_entity = session.entity("session").unwrap();
    let user = session.entity("user").unwrap();
    session.field(user, "id", |f| {
        f.flags.rowid = true;
        Ok(())
    });
    session.field(session_entity, "user_id", |f| f.set_reference("user", "id"));

    let linked = session.finish().unwrap();
    let order: Vec<&str> = linked.entities_by_height().map(|e| e.name()).collect();
    assert_eq!(order, ["user", "session"]);
}
