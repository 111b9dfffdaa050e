// SPDX-License-Identifier: MIT OR Apache-2.0

//! # In-Memory Sink
//!
//! A sink that keeps every delivered event in memory. It is useful for:
//!
//! - Unit testing code that logs through a [`Router`](crate::Router)
//! - Embedding the router in a host that wants to display recent log lines itself
//!
//! Events are stored as-is, so tests can assert on attributes and the
//! originating thread as well as on the rendered text.

use crate::error::SinkError;
use crate::event::Event;
use crate::format::{Formatter, PlainFormatter};
use crate::sink::Sink;
use parking_lot::Mutex;

/// A sink that stores delivered events in a `Vec<Event>`.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use tasklog::{InMemorySink, Router};
///
/// let router = Router::builder().build();
/// let sink = Arc::new(InMemorySink::new());
/// router.attach("memory", sink.clone());
///
/// router.emit("memory", "Test message {}", &[&42], Default::default()).unwrap();
///
/// let logs = sink.drain_logs();
/// assert!(logs.contains("Test message 42"));
/// ```
#[derive(Debug, Default)]
pub struct InMemorySink {
    events: Mutex<Vec<Event>>,
}

// ============================================================================
// BOILERPLATE TRAIT IMPLEMENTATIONS
// ============================================================================
//
// - Debug/Default: derived
// - Clone: NOT implemented - sinks are shared through Arc; cloning would fork the buffer
// - PartialEq/Eq/Hash: NOT implemented - equality of a live buffer is not meaningful
// - Send/Sync: automatic through Mutex

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns every stored event, oldest first.
    pub fn drain_events(&self) -> Vec<Event> {
        std::mem::take(&mut *self.events.lock())
    }

    /// Removes every stored event and returns them plain-formatted, joined by newlines.
    pub fn drain_logs(&self) -> String {
        self.drain_events()
            .iter()
            .filter_map(|event| PlainFormatter.format(event).ok())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Prints every stored event to stderr and clears the buffer.
    pub fn drain_to_console(&self) {
        for line in self.drain_logs().lines() {
            eprintln!("{}", line);
        }
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl Sink for InMemorySink {
    fn deliver(&self, event: &Event) -> Result<(), SinkError> {
        self.events.lock().push(event.clone());
        Ok(())
    }
}
