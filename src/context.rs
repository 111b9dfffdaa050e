// SPDX-License-Identifier: MIT OR Apache-2.0

//! Thread-to-task attribution.
//!
//! Log calls do not carry a task id. Instead, the code that runs a task brackets
//! its work with [`TaskContext::start`] and [`TaskContext::stop`], and every event
//! produced on that thread in between is attributed to the task.
//!
//! # Overview
//!
//! - [`TaskId`]: opaque integer identifying a unit of work, e.g. one analysis run.
//! - [`ThreadKey`]: the identity a binding is keyed by. Usually the calling thread,
//!   but synthetic keys can be created for tests and for executors that multiplex
//!   several logical threads of control onto one OS thread.
//! - [`TaskContext`]: the concurrent `ThreadKey -> TaskId` map.
//! - [`TaskLogGuard`]: stops the binding when dropped.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use tasklog::context::{TaskContext, TaskId};
//!
//! let context = Arc::new(TaskContext::new());
//! assert_eq!(context.lookup(), None);
//!
//! context.start(TaskId(7));
//! assert_eq!(context.lookup(), Some(TaskId(7)));
//!
//! // other threads are unaffected
//! let other = context.clone();
//! std::thread::spawn(move || assert_eq!(other.lookup(), None))
//!     .join()
//!     .unwrap();
//!
//! context.stop(TaskId(7));
//! assert_eq!(context.lookup(), None);
//! ```
//!
//! The context is an ordinary value owned by whoever builds the
//! [`Router`](crate::Router); there is no hidden global.

mod registry;
mod thread_key;

#[cfg(test)]
mod tests;

pub use registry::{TaskContext, TaskId, TaskLogGuard};
pub use thread_key::ThreadKey;
