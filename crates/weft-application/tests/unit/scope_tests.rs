//! Tests for scoped lifetimes through the kernel

use crate::fixtures::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use weft_domain::entities::Arguments;
use weft_domain::error::Error;

fn scoped_kernel(disposed: &Arc<AtomicUsize>) -> weft_application::Kernel {
    let mut builder = base_builder();
    builder
        .class(connection(disposed))
        .unwrap()
        .scoped("Connection", "Connection")
        .unwrap();
    builder.build().kernel()
}

#[test]
fn test_scoped_without_scope_fails() {
    let disposed = Arc::new(AtomicUsize::new(0));
    let kernel = scoped_kernel(&disposed);

    let err = kernel.get("Connection").unwrap_err();
    assert!(matches!(err.cause(), Error::NoActiveScope { id } if id == "Connection"));
}

#[test]
fn test_scoped_instance_reused_within_scope() {
    let disposed = Arc::new(AtomicUsize::new(0));
    let kernel = scoped_kernel(&disposed);

    let scope = kernel.begin_scope();
    let a = kernel.get("Connection").unwrap();
    let b = kernel.get("Connection").unwrap();
    assert!(Arc::ptr_eq(&a, &b));

    assert_eq!(kernel.end_scope(scope).unwrap(), 1);
    assert_eq!(disposed.load(Ordering::SeqCst), 1);
}

#[test]
fn test_nested_scope_gets_its_own_instance() {
    let disposed = Arc::new(AtomicUsize::new(0));
    let kernel = scoped_kernel(&disposed);

    let outer = kernel.begin_scope();
    let a = kernel.get("Connection").unwrap();

    let inner = kernel.begin_scope();
    assert_eq!(kernel.active_scope(), Some(inner));
    let b = kernel.get("Connection").unwrap();
    assert!(!Arc::ptr_eq(&a, &b));

    kernel.end_scope(inner).unwrap();
    assert_eq!(disposed.load(Ordering::SeqCst), 1);

    let c = kernel.get("Connection").unwrap();
    assert!(Arc::ptr_eq(&a, &c));

    kernel.end_scope(outer).unwrap();
    assert_eq!(disposed.load(Ordering::SeqCst), 2);
    assert_eq!(kernel.scope_depth(), 0);
}

#[test]
fn test_ending_outer_scope_first_is_rejected() {
    let disposed = Arc::new(AtomicUsize::new(0));
    let kernel = scoped_kernel(&disposed);

    let outer = kernel.begin_scope();
    let inner = kernel.begin_scope();

    assert!(matches!(kernel.end_scope(outer), Err(Error::Scope { .. })));
    assert_eq!(kernel.scope_depth(), 2);

    kernel.end_scope(inner).unwrap();
    kernel.end_scope(outer).unwrap();
    assert!(matches!(kernel.end_scope(outer), Err(Error::Scope { .. })));
}

#[test]
fn test_scope_guard_ends_on_drop() {
    let disposed = Arc::new(AtomicUsize::new(0));
    let kernel = scoped_kernel(&disposed);

    {
        let guard = kernel.enter_scope();
        assert_eq!(kernel.active_scope(), Some(guard.id()));
        kernel.get("Connection").unwrap();
    }

    assert_eq!(kernel.scope_depth(), 0);
    assert_eq!(disposed.load(Ordering::SeqCst), 1);
}

#[test]
fn test_dropping_kernel_disposes_open_scopes() {
    let disposed = Arc::new(AtomicUsize::new(0));
    let kernel = scoped_kernel(&disposed);

    kernel.begin_scope();
    kernel.get("Connection").unwrap();
    kernel.begin_scope();
    kernel.get("Connection").unwrap();
    drop(kernel);

    assert_eq!(disposed.load(Ordering::SeqCst), 2);
}

#[test]
fn test_make_scoped_outside_scope_is_not_cached() {
    let disposed = Arc::new(AtomicUsize::new(0));
    let kernel = scoped_kernel(&disposed);

    let made = kernel.make("Connection", Arguments::new()).unwrap();
    assert!(made.is::<Connection>());

    let scope = kernel.begin_scope();
    assert_eq!(kernel.end_scope(scope).unwrap(), 0);
}

#[test]
fn test_kernels_have_independent_scopes() {
    let disposed = Arc::new(AtomicUsize::new(0));
    let mut builder = base_builder();
    builder
        .class(connection(&disposed))
        .unwrap()
        .scoped("Connection", "Connection")
        .unwrap();
    let container = builder.build();

    let first = container.kernel();
    let second = container.kernel();
    let a_scope = first.begin_scope();
    let b_scope = second.begin_scope();

    assert_ne!(a_scope, b_scope);
    let a = first.get("Connection").unwrap();
    let b = second.get("Connection").unwrap();
    assert!(!Arc::ptr_eq(&a, &b));
}
