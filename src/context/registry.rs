// SPDX-License-Identifier: MIT OR Apache-2.0

//! The concurrent thread-to-task map.

use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::thread_key::ThreadKey;

/// Identifier for a task.
///
/// Ids are assigned by whoever schedules tasks; this crate never interprets them
/// beyond equality and rendering.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TaskId {
    fn from(id: u64) -> Self {
        TaskId(id)
    }
}

/// Mapping from thread of control to the task it is currently executing.
///
/// At most one task is bound to a key at any instant. All operations take the
/// internal lock for the duration of a single map operation, so a reader sees
/// either the old binding or the new one, never anything in between.
///
/// The `*_for` methods take an explicit [`ThreadKey`]; the others use
/// [`ThreadKey::current`].
#[derive(Debug, Default)]
pub struct TaskContext {
    bindings: RwLock<HashMap<ThreadKey, TaskId>>,
}

impl TaskContext {
    pub fn new() -> Self {
        Self::default()
    }

    /**
    Binds the calling thread to `task`.

    Calling this twice on the same thread replaces the first binding.
    */
    pub fn start(&self, task: TaskId) {
        self.start_for(ThreadKey::current(), task);
    }

    /**
    Removes the calling thread's binding.

    The binding is removed whatever task it holds; `task` is not compared.
    Stopping a thread that has no binding does nothing.
    */
    pub fn stop(&self, task: TaskId) {
        self.stop_for(ThreadKey::current(), task);
    }

    /// The task bound to the calling thread, if any.
    #[inline]
    pub fn lookup(&self) -> Option<TaskId> {
        self.lookup_for(ThreadKey::current())
    }

    pub fn start_for(&self, key: ThreadKey, task: TaskId) {
        self.bindings.write().insert(key, task);
    }

    pub fn stop_for(&self, key: ThreadKey, _task: TaskId) {
        self.bindings.write().remove(&key);
    }

    pub fn lookup_for(&self, key: ThreadKey) -> Option<TaskId> {
        self.bindings.read().get(&key).copied()
    }

    /**
    Binds the calling thread to `task` until the returned guard is dropped.

    ```rust
    use std::sync::Arc;
    use tasklog::context::{TaskContext, TaskId};

    let context = Arc::new(TaskContext::new());
    {
        let _guard = context.scope(TaskId(3));
        assert_eq!(context.lookup(), Some(TaskId(3)));
    }
    assert_eq!(context.lookup(), None);
    ```
    */
    pub fn scope(self: &Arc<Self>, task: TaskId) -> TaskLogGuard {
        let key = ThreadKey::current();
        self.start_for(key, task);
        TaskLogGuard {
            context: self.clone(),
            key,
            task,
        }
    }

    /// Number of threads that currently have a binding.
    pub fn len(&self) -> usize {
        self.bindings.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.read().is_empty()
    }

    /// Drops every binding. Used on teardown.
    pub fn clear(&self) {
        self.bindings.write().clear();
    }
}

/// Stops a task binding when dropped.
///
/// Returned by [`TaskContext::scope`] and [`Router::task_scope`](crate::Router::task_scope).
/// The guard remembers the key it was created on, so it clears the right
/// binding even if it is dropped during unwinding.
#[must_use = "the task binding ends when the guard is dropped"]
#[derive(Debug)]
pub struct TaskLogGuard {
    context: Arc<TaskContext>,
    key: ThreadKey,
    task: TaskId,
}

impl TaskLogGuard {
    pub fn task(&self) -> TaskId {
        self.task
    }
}

impl Drop for TaskLogGuard {
    fn drop(&mut self) {
        self.context.stop_for(self.key, self.task);
    }
}
