// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tests for the context module.

use super::registry::{TaskContext, TaskId};
use super::thread_key::ThreadKey;
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn test_start_then_lookup() {
    let context = TaskContext::new();
    assert_eq!(context.lookup(), None);
    context.start(TaskId(1));
    assert_eq!(context.lookup(), Some(TaskId(1)));
}

#[test]
fn test_start_overwrites() {
    let context = TaskContext::new();
    context.start(TaskId(1));
    context.start(TaskId(2));
    assert_eq!(context.lookup(), Some(TaskId(2)));
    assert_eq!(context.len(), 1);
}

#[test]
fn test_stop_ignores_task_argument() {
    let context = TaskContext::new();
    context.start(TaskId(5));
    // a mismatched id still clears this thread's binding
    context.stop(TaskId(99));
    assert_eq!(context.lookup(), None);
}

#[test]
fn test_stop_without_binding_is_noop() {
    let context = TaskContext::new();
    context.stop(TaskId(1));
    assert!(context.is_empty());
}

#[test]
fn test_stop_clears_only_current_thread() {
    let context = Arc::new(TaskContext::new());
    let started = Arc::new(Barrier::new(2));
    let stopped = Arc::new(Barrier::new(2));

    let other = {
        let context = context.clone();
        let started = started.clone();
        let stopped = stopped.clone();
        thread::spawn(move || {
            context.start(TaskId(20));
            started.wait();
            stopped.wait();
            context.lookup()
        })
    };

    context.start(TaskId(10));
    started.wait();
    context.stop(TaskId(10));
    assert_eq!(context.lookup(), None);
    stopped.wait();

    assert_eq!(other.join().unwrap(), Some(TaskId(20)));
}

#[test]
fn test_thread_isolation_under_contention() {
    let context = Arc::new(TaskContext::new());
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8u64)
        .map(|n| {
            let context = context.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                context.start(TaskId(n));
                barrier.wait();
                for _ in 0..1000 {
                    assert_eq!(context.lookup(), Some(TaskId(n)));
                }
                context.stop(TaskId(n));
                context.lookup()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), None);
    }
    assert!(context.is_empty());
}

#[test]
fn test_synthetic_keys() {
    let context = TaskContext::new();
    let a = ThreadKey::synthetic(1);
    let b = ThreadKey::synthetic(2);
    context.start_for(a, TaskId(100));
    context.start_for(b, TaskId(200));
    assert_eq!(context.lookup_for(a), Some(TaskId(100)));
    assert_eq!(context.lookup_for(b), Some(TaskId(200)));
    // the real thread is a different key
    assert_eq!(context.lookup(), None);

    context.stop_for(a, TaskId(100));
    assert_eq!(context.lookup_for(a), None);
    assert_eq!(context.lookup_for(b), Some(TaskId(200)));
}

#[test]
fn test_scope_guard() {
    let context = Arc::new(TaskContext::new());
    {
        let guard = context.scope(TaskId(4));
        assert_eq!(guard.task(), TaskId(4));
        assert_eq!(context.lookup(), Some(TaskId(4)));
    }
    assert_eq!(context.lookup(), None);
}

#[test]
fn test_scope_guard_clears_on_panic() {
    let context = Arc::new(TaskContext::new());
    let inner = context.clone();
    let result = thread::spawn(move || {
        let _guard = inner.scope(TaskId(9));
        panic!("task failed");
    })
    .join();
    assert!(result.is_err());
    assert!(context.is_empty());
}

#[test]
fn test_clear() {
    let context = TaskContext::new();
    context.start_for(ThreadKey::synthetic(1), TaskId(1));
    context.start(TaskId(2));
    context.clear();
    assert!(context.is_empty());
}
