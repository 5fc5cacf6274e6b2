//! Tests for the definition store and class registry

use crate::fixtures::*;
use std::any::TypeId;
use std::sync::Arc;
use weft_application::{ClassRegistry, DefinitionStore};
use weft_domain::entities::{Arguments, ClassDescriptor, Concrete};
use weft_domain::error::Error;
use weft_domain::ports::Instance;
use weft_domain::value_objects::Lifetime;

#[test]
fn test_rebinding_replaces_definition() {
    let mut store = DefinitionStore::new();
    store.singleton("Logger", "ConsoleLogger").unwrap();
    store.transient("Logger", "FileLogger").unwrap();

    let definition = store.get("Logger").unwrap();
    assert_eq!(definition.lifetime(), Lifetime::Transient);
    assert_eq!(definition.concrete().class_name(), Some("FileLogger"));
    assert_eq!(store.len(), 1);
}

#[test]
fn test_empty_identifiers_are_rejected() {
    let mut store = DefinitionStore::new();

    assert!(matches!(
        store.singleton("", "ConsoleLogger"),
        Err(Error::Configuration { .. })
    ));
    assert!(store.singleton("Logger", " ").is_err());
    assert!(store.when("").needs("Logger").give("FileLogger").is_err());
    assert!(store.tag(["Logger"], [""]).is_err());
    assert!(store.is_empty());
}

#[test]
fn test_scoped_instance_binding_is_rejected() {
    let mut store = DefinitionStore::new();
    let logger: Instance = Arc::new(ConsoleLogger);

    assert!(matches!(
        store.bind("Logger", Concrete::Instance(Arc::clone(&logger)), Lifetime::Scoped),
        Err(Error::Configuration { .. })
    ));
    assert!(store.is_empty());

    store
        .bind("Logger", Concrete::Instance(logger), Lifetime::Transient)
        .unwrap();
    assert!(store.has("Logger"));
}

#[test]
fn test_tags_keep_order_and_ignore_duplicates() {
    let mut store = DefinitionStore::new();
    store.tag(["b", "a"], ["reports"]).unwrap();
    store.tag(["a", "c"], ["reports", "exports"]).unwrap();

    assert_eq!(store.tagged("reports"), &["b", "a", "c"]);
    assert_eq!(store.tagged("exports"), &["a", "c"]);
    assert_eq!(store.tags_of("a"), vec!["exports", "reports"]);
    assert!(store.tagged("missing").is_empty());
}

#[test]
fn test_contextual_rules_are_per_consumer() {
    let mut store = DefinitionStore::new();
    store
        .when("AuditService")
        .needs("Logger")
        .give("FileLogger")
        .unwrap();

    let rule = store.contextual("AuditService", "Logger").unwrap();
    assert_eq!(rule.class_name(), Some("FileLogger"));
    assert!(store.contextual("ReportService", "Logger").is_none());
    assert!(!store.has("Logger"));
}

#[test]
fn test_summaries_are_sorted_and_complete() {
    let mut store = DefinitionStore::new();
    store.scoped("Session", "Session").unwrap();
    store.singleton("Logger", "ConsoleLogger").unwrap();
    store.tag(["Logger"], ["core"]).unwrap();
    store.extend("Logger", |inner, _| Ok(inner)).unwrap();

    let summaries = store.summaries();

    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].id, "Logger");
    assert_eq!(summaries[0].concrete, "class");
    assert_eq!(summaries[0].tags, vec!["core"]);
    assert_eq!(summaries[0].extenders, 1);
    assert_eq!(summaries[1].lifetime, Lifetime::Scoped);
}

#[test]
fn test_class_registry_indexes_by_type() {
    let mut classes = ClassRegistry::new();
    classes
        .register(ClassDescriptor::concrete("Engine", |_: &Arguments| Ok(Engine)))
        .unwrap();
    classes.register(ClassDescriptor::interface("Cache")).unwrap();

    let by_type = classes.for_type(TypeId::of::<Engine>()).unwrap();
    assert_eq!(by_type.name(), "Engine");
    assert!(classes.is_instantiable("Engine"));
    assert!(!classes.is_instantiable("Cache"));
    assert!(!classes.is_instantiable("Unknown"));
    assert_eq!(classes.names(), vec!["Cache", "Engine"]);
}

#[test]
fn test_class_registry_replacement_drops_stale_type_index() {
    let mut classes = ClassRegistry::new();
    classes
        .register(ClassDescriptor::concrete("Motor", |_: &Arguments| Ok(Engine)))
        .unwrap();
    classes
        .register(ClassDescriptor::concrete("Motor", |_: &Arguments| Ok(Radio)))
        .unwrap();

    assert!(classes.for_type(TypeId::of::<Engine>()).is_none());
    assert_eq!(classes.for_type(TypeId::of::<Radio>()).unwrap().name(), "Motor");
    assert_eq!(classes.len(), 1);
}
