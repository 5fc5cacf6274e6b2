//! Resolution properties exercised through the public facade

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use weft::application::PrototypeAnalyzer;
use weft::prelude::*;

struct ConsoleLogger;
impl Service for ConsoleLogger {}

struct Widget;
impl Service for Widget {}

struct RequestContext {
    disposed: Arc<AtomicUsize>,
}
impl Service for RequestContext {
    fn dispose(&self) {
        self.disposed.fetch_add(1, Ordering::SeqCst);
    }
}

struct DefaultClient;
impl Service for DefaultClient {}

struct HardenedClient;
impl Service for HardenedClient {}

/// Consumer holding a single dependency
struct Holder {
    dependency: Instance,
}
impl Service for Holder {}

fn holder(name: &str, dependency: &str) -> ClassDescriptor {
    ClassDescriptor::concrete(name, |args: &Arguments| {
        Ok(Holder {
            dependency: args.service("dependency")?,
        })
    })
    .param(ParameterDecl::service("dependency", dependency))
}

fn request_context(disposed: &Arc<AtomicUsize>) -> ClassDescriptor {
    let disposed = Arc::clone(disposed);
    ClassDescriptor::concrete("RequestContext", move |_: &Arguments| {
        Ok(RequestContext {
            disposed: Arc::clone(&disposed),
        })
    })
}

fn leaf_builder() -> ContainerBuilder {
    let mut builder = Container::builder();
    builder
        .class(ClassDescriptor::concrete("ConsoleLogger", |_: &Arguments| Ok(ConsoleLogger)))
        .unwrap()
        .class(ClassDescriptor::concrete("Widget", |_: &Arguments| Ok(Widget)))
        .unwrap()
        .class(ClassDescriptor::concrete("DefaultClient", |_: &Arguments| Ok(DefaultClient)))
        .unwrap()
        .class(ClassDescriptor::concrete("HardenedClient", |_: &Arguments| Ok(HardenedClient)))
        .unwrap();
    builder
}

// ============================================================================
// Lifetimes
// ============================================================================

#[test]
fn test_singleton_identity() {
    let mut builder = leaf_builder();
    builder
        .bind("Logger", "ConsoleLogger", Lifetime::Singleton)
        .unwrap();
    let kernel = builder.build().kernel();

    let first = kernel.get("Logger").unwrap();
    let second = kernel.get("Logger").unwrap();

    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_transient_distinctness() {
    let mut builder = leaf_builder();
    builder
        .bind("Widget", "Widget", Lifetime::Transient)
        .unwrap();
    let kernel = builder.build().kernel();

    let first = kernel.get("Widget").unwrap();
    let second = kernel.get("Widget").unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
}

#[test]
fn test_scoped_isolation() {
    let disposed = Arc::new(AtomicUsize::new(0));
    let mut builder = leaf_builder();
    builder
        .class(request_context(&disposed))
        .unwrap()
        .scoped("Ctx", "RequestContext")
        .unwrap();
    let kernel = builder.build().kernel();

    let first_scope = kernel.begin_scope();
    let a = kernel.get("Ctx").unwrap();
    let b = kernel.get("Ctx").unwrap();
    kernel.end_scope(first_scope).unwrap();

    let second_scope = kernel.begin_scope();
    let c = kernel.get("Ctx").unwrap();
    kernel.end_scope(second_scope).unwrap();

    assert!(Arc::ptr_eq(&a, &b));
    assert!(!Arc::ptr_eq(&a, &c));
    assert_ne!(first_scope, second_scope);
}

#[test]
fn test_scope_disposal() {
    let disposed = Arc::new(AtomicUsize::new(0));
    let mut builder = leaf_builder();
    builder
        .class(request_context(&disposed))
        .unwrap()
        .scoped("Ctx", "RequestContext")
        .unwrap();
    let kernel = builder.build().kernel();

    let scope = kernel.begin_scope();
    let before = kernel.get("Ctx").unwrap();
    kernel.get("Ctx").unwrap();
    assert_eq!(kernel.end_scope(scope).unwrap(), 1);
    assert_eq!(disposed.load(Ordering::SeqCst), 1);

    // The ended frame is gone: ending it again fails and lookups need a new scope
    assert!(matches!(kernel.end_scope(scope), Err(Error::Scope { .. })));
    assert!(matches!(
        kernel.get("Ctx").unwrap_err().cause(),
        Error::NoActiveScope { .. }
    ));

    let _guard = kernel.enter_scope();
    let after = kernel.get("Ctx").unwrap();
    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(disposed.load(Ordering::SeqCst), 1);
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_cycle_detection() {
    let mut builder = leaf_builder();
    builder
        .class(holder("A", "B"))
        .unwrap()
        .class(holder("B", "A"))
        .unwrap();
    let kernel = builder.build().kernel();

    let err = kernel.get("A").unwrap_err();

    let path: Vec<&str> = err.cycle_path().unwrap().iter().map(String::as_str).collect();
    assert_eq!(path, vec!["A", "B", "A"]);
    assert!(matches!(err.cause(), Error::CircularDependency { .. }));
}

#[test]
fn test_missing_binding() {
    let mut builder = leaf_builder();
    builder
        .class(ClassDescriptor::interface("Unregistered"))
        .unwrap();
    let kernel = builder.build().kernel();

    let err = kernel.get("Unregistered").unwrap_err();

    assert!(err.is_not_found_for("Unregistered"));
    assert!(matches!(err, Error::Resolution { ref id, .. } if id == "Unregistered"));
    // Retrying without fixing the definition fails the same way
    assert!(kernel.get("Unregistered").unwrap_err().is_not_found_for("Unregistered"));
}

// ============================================================================
// Contextual bindings
// ============================================================================

#[test]
fn test_contextual_override() {
    let mut builder = leaf_builder();
    builder
        .class(holder("PaymentService", "HttpClient"))
        .unwrap()
        .class(holder("ReportService", "HttpClient"))
        .unwrap()
        .singleton("HttpClient", "DefaultClient")
        .unwrap();
    builder
        .when("PaymentService")
        .needs("HttpClient")
        .give("HardenedClient")
        .unwrap();
    let kernel = builder.build().kernel();

    let payment = kernel.get_as::<Holder>("PaymentService").unwrap();
    let report = kernel.get_as::<Holder>("ReportService").unwrap();

    assert!(payment.dependency.is::<HardenedClient>());
    assert!(report.dependency.is::<DefaultClient>());
    assert!(kernel.get("HttpClient").unwrap().is::<DefaultClient>());
}

// ============================================================================
// Prototype cache
// ============================================================================

#[test]
fn test_prototype_cache_idempotence() {
    let mut builder = leaf_builder();
    builder.class(holder("PaymentService", "Widget")).unwrap();
    let container = builder.build();
    let class = container.classes().get("PaymentService").unwrap();

    let first = container.prototypes().get_or_analyze(&class).unwrap();
    let second = container.prototypes().get_or_analyze(&class).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(container.prototypes().analysis_count(), 1);
    assert_eq!(*first, PrototypeAnalyzer::analyze(&class).unwrap());
    assert_eq!(first.dependencies(), vec!["Widget"]);

    // Resolving reuses the cached plan and only analyzes the autowired dependency
    container.kernel().get("PaymentService").unwrap();
    assert_eq!(container.prototypes().analysis_count(), 2);
    assert!(container.prototypes().peek("Widget").is_some());
}
