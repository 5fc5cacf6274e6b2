//! Shared service types and class descriptors for the unit suite

use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use weft_application::ContainerBuilder;
use weft_domain::entities::{Arguments, ClassDescriptor, ParameterDecl};
use weft_domain::error::Result;
use weft_domain::ports::{Instance, Service};

pub struct ConsoleLogger;
impl Service for ConsoleLogger {}

#[derive(Debug)]
pub struct FileLogger;
impl Service for FileLogger {}

pub struct Engine;
impl Service for Engine {}

pub struct Radio;
impl Service for Radio {}

/// Generic service whose dependencies are its lowercased parameter names
pub struct Node {
    pub name: String,
    pub deps: Vec<Instance>,
}
impl Service for Node {}

/// Wraps another instance, used by extender tests
pub struct Decorated {
    pub inner: Instance,
}
impl Service for Decorated {}

/// Optional service and plain value parameters
pub struct Reporter {
    pub cache: Option<Instance>,
    pub retries: i64,
}
impl Service for Reporter {}

/// Counts disposals
pub struct Connection {
    pub disposed: Arc<AtomicUsize>,
}
impl Service for Connection {
    fn dispose(&self) {
        self.disposed.fetch_add(1, Ordering::SeqCst);
    }
}

/// Receives a radio through a setter
#[derive(Default)]
pub struct Dashboard {
    pub radio: Mutex<Option<Instance>>,
}
impl Service for Dashboard {}

/// Class named `name` depending on each id in `deps`
pub fn node(name: &str, deps: &[&str]) -> ClassDescriptor {
    let label = name.to_string();
    let params: Vec<String> = deps.iter().map(|dep| dep.to_lowercase()).collect();
    let captured = params.clone();
    let class = ClassDescriptor::concrete(name, move |args: &Arguments| {
        let deps = captured
            .iter()
            .map(|param| args.service(param))
            .collect::<Result<Vec<_>>>()?;
        Ok(Node {
            name: label.clone(),
            deps,
        })
    });
    deps.iter()
        .zip(params)
        .fold(class, |class, (dep, param)| {
            class.param(ParameterDecl::service(param, *dep))
        })
}

pub fn reporter() -> ClassDescriptor {
    ClassDescriptor::concrete("Reporter", |args: &Arguments| {
        Ok(Reporter {
            cache: args.optional_service("cache")?,
            retries: args.parse("retries")?,
        })
    })
    .param(ParameterDecl::service("cache", "Cache").optional())
    .param(ParameterDecl::builtin("retries", "int").default_value(json!(3)))
}

pub fn connection(disposed: &Arc<AtomicUsize>) -> ClassDescriptor {
    let disposed = Arc::clone(disposed);
    ClassDescriptor::concrete("Connection", move |_: &Arguments| {
        Ok(Connection {
            disposed: Arc::clone(&disposed),
        })
    })
}

pub fn dashboard() -> ClassDescriptor {
    ClassDescriptor::concrete("Dashboard", |_: &Arguments| Ok(Dashboard::default()))
        .inject_into::<Dashboard, _, _, _>("radio", "Radio", |dashboard, radio| {
            if let Ok(mut slot) = dashboard.radio.lock() {
                *slot = Some(radio);
            }
            Ok(())
        })
}

/// Builder with the leaf classes every suite uses
pub fn base_builder() -> ContainerBuilder {
    let mut builder = ContainerBuilder::new();
    for class in [
        ClassDescriptor::concrete("ConsoleLogger", |_: &Arguments| Ok(ConsoleLogger)),
        ClassDescriptor::concrete("FileLogger", |_: &Arguments| Ok(FileLogger)),
        ClassDescriptor::concrete("Engine", |_: &Arguments| Ok(Engine)),
        ClassDescriptor::concrete("Radio", |_: &Arguments| Ok(Radio)),
        ClassDescriptor::interface("Cache"),
    ] {
        builder
            .class(class)
            .expect("leaf classes have valid names");
    }
    builder
}
