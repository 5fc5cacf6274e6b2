//! Tests for the error taxonomy and its diagnostics helpers

use weft_domain::error::Error;

#[test]
fn test_circular_dependency_display_joins_path() {
    let err = Error::circular_dependency(vec!["A".into(), "B".into(), "A".into()]);

    assert_eq!(err.to_string(), "Circular dependency detected: A -> B -> A");
    assert_eq!(
        err.cycle_path(),
        Some(&["A".to_string(), "B".to_string(), "A".to_string()][..])
    );
}

#[test]
fn test_resolution_wrapper_exposes_cause() {
    let leaf = Error::service_not_found("Mailer", &["App".to_string()]);
    let wrapped = Error::resolution("App", vec!["App".into(), "Mailer".into()], leaf);

    assert!(wrapped.is_not_found());
    assert!(wrapped.is_not_found_for("Mailer"));
    assert!(!wrapped.is_not_found_for("App"));
    assert_eq!(
        wrapped.resolution_chain(),
        &["App".to_string(), "Mailer".to_string()]
    );
    assert!(wrapped.to_string().starts_with("Failed to resolve 'App'"));
}

#[test]
fn test_resolution_wrapper_does_not_nest() {
    let leaf = Error::no_active_scope("Ctx");
    let once = Error::resolution("Outer", vec!["Outer".into()], leaf);
    let twice = Error::resolution("Other", vec![], once);

    match &twice {
        Error::Resolution { id, source, .. } => {
            assert_eq!(id, "Outer");
            assert!(matches!(**source, Error::NoActiveScope { .. }));
        }
        other => panic!("expected resolution wrapper, got {other:?}"),
    }
}

#[test]
fn test_auto_resolve_keeps_source() {
    let io = std::io::Error::other("disk full");
    let err = Error::auto_resolve_with_source("FileCache", "constructor failed", io);

    let source = std::error::Error::source(&err);
    assert!(source.is_some(), "AutoResolve should carry its source");
    assert!(err.to_string().contains("FileCache"));
}

#[test]
fn test_string_conversions_are_internal() {
    let err: Error = "boom".into();
    assert!(matches!(err, Error::Internal { .. }));
    assert!(err.resolution_chain().is_empty());
}
