//! Tests for definitions, concretes and lifetimes

use weft_domain::entities::{Concrete, ServiceDefinition};
use weft_domain::ports::{Instance, Service, into_instance};
use weft_domain::value_objects::{Lifetime, ScopeId};

struct ConsoleLogger;
impl Service for ConsoleLogger {}

#[test]
fn test_concrete_conversions() {
    let by_name: Concrete = "ConsoleLogger".into();
    let instance: Instance = into_instance(ConsoleLogger);
    let prebuilt: Concrete = instance.into();
    let factory = Concrete::factory(|_resolver| Ok(into_instance(ConsoleLogger)));

    assert_eq!(by_name.class_name(), Some("ConsoleLogger"));
    assert_eq!(by_name.kind(), "class");
    assert_eq!(prebuilt.kind(), "instance");
    assert_eq!(factory.kind(), "factory");
    assert_eq!(format!("{factory:?}"), "Factory(..)");
}

#[test]
fn test_definition_accessors() {
    let definition = ServiceDefinition::new("Logger", Concrete::class("ConsoleLogger"), Lifetime::Singleton);

    assert_eq!(definition.id(), "Logger");
    assert_eq!(definition.lifetime(), Lifetime::Singleton);
    assert_eq!(definition.concrete().class_name(), Some("ConsoleLogger"));
}

#[test]
fn test_lifetime_labels() {
    assert_eq!(Lifetime::default(), Lifetime::Transient);
    assert!(!Lifetime::Transient.is_cached());
    assert!(Lifetime::Scoped.is_cached());
    assert_eq!(Lifetime::Singleton.to_string(), "singleton");

    let json = serde_json::to_string(&Lifetime::Scoped).unwrap_or_default();
    assert_eq!(json, "\"scoped\"");
}

#[test]
fn test_scope_id_display() {
    let id = ScopeId::new(7);
    assert_eq!(id.get(), 7);
    assert_eq!(id.to_string(), "scope-7");
}
