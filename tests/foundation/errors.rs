//! Integration tests for Error types
//!
//! Tests error construction, display, context, and phases.

use schemata_foundation::{Error, ErrorContext, ErrorKind, LinkPass, NameScope, Phase};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn error_duplicate_name() {
    let err = Error::duplicate_name("Foo", NameScope::TopLevel);
    assert_eq!(
        err.kind,
        ErrorKind::DuplicateName {
            name: "Foo".to_string(),
            scope: NameScope::TopLevel,
        }
    );
    assert_eq!(format!("{err}"), "duplicate name: Foo (top level)");
}

#[test]
fn error_unknown_field() {
    let err = Error::unknown_field("user", "nickname");
    assert_eq!(format!("{err}"), "unknown field: user.nickname");
}

#[test]
fn error_exhausted() {
    let err = Error::exhausted("entity");
    assert!(matches!(err.kind, ErrorKind::Exhausted("entity")));
    assert!(format!("{err}").contains("entity"));
}

#[test]
fn error_reference_cycle_display() {
    let err = Error::new(ErrorKind::ReferenceCycle(vec![
        "a".to_string(),
        "b".to_string(),
        "a".to_string(),
    ]));
    assert_eq!(format!("{err}"), "reference cycle: a -> b -> a");
}

// =============================================================================
// Phases
// =============================================================================

#[test]
fn allocation_errors_are_local() {
    assert_eq!(Error::reserved_name("where").phase(), Phase::Allocation);
    assert_eq!(Error::invalid_default("x").phase(), Phase::Allocation);
}

#[test]
fn link_errors_are_terminal() {
    assert_eq!(Error::unknown_role("ghost").phase(), Phase::Link);
    assert_eq!(
        Error::new(ErrorKind::MultipleRowIds("user".to_string())).phase(),
        Phase::Link
    );
}

#[test]
fn io_errors_are_runtime() {
    assert_eq!(
        Error::new(ErrorKind::Io("disk".to_string())).phase(),
        Phase::Runtime
    );
}

// =============================================================================
// Context
// =============================================================================

#[test]
fn in_pass_keeps_existing_context() {
    let err = Error::unknown_role("ghost")
        .with_context(ErrorContext::new().with_entity("user").with_spec("insert"))
        .in_pass(LinkPass::Rolemaps);
    let ctx = err.context.unwrap();
    assert_eq!(ctx.pass, Some(LinkPass::Rolemaps));
    assert_eq!(ctx.entity.as_deref(), Some("user"));
    assert_eq!(ctx.spec.as_deref(), Some("insert"));
}

#[test]
fn in_pass_without_context() {
    let err = Error::unknown_role("ghost").in_pass(LinkPass::Rolemaps);
    assert_eq!(format!("{}", err.context.unwrap()), "pass rolemaps");
}

#[test]
fn with_context_replaces() {
    let err = Error::reserved_name("where")
        .with_context(ErrorContext::new().with_entity("a"))
        .with_context(ErrorContext::new().with_field("b"));
    let ctx = err.context.unwrap();
    assert_eq!(ctx.entity, None);
    assert_eq!(ctx.field.as_deref(), Some("b"));
}
