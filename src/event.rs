// SPDX-License-Identifier: MIT OR Apache-2.0

//! The record that flows through the router.
//!
//! An [`Event`] is built once, by the router or by a caller, and then handed by
//! reference to every sink. Sinks never modify it; anything a sink needs to change
//! for its own output (the console's colors, for example) is applied to the
//! rendered string instead.
//!
//! # Example
//!
//! ```rust
//! use tasklog::{Attributes, Event, Level};
//!
//! let event = Event::new(Level::Info, "scheduler", "task #{} started on {}")
//!     .with_args(["3", "cuckoo1"])
//!     .with_attributes(Attributes::new().action("task.start").status("success"));
//!
//! assert_eq!(event.message(), "task #3 started on cuckoo1");
//! ```

use chrono::{DateTime, Utc};

use crate::Level;
use crate::attributes::Attributes;
use crate::context::{TaskContext, TaskId, ThreadKey};

/**
A single log event.

Construct with [`Event::new`] and the `with_*` methods. The creation timestamp
and originating thread are captured in [`Event::new`], so an event built on one
thread keeps that thread's identity even if it is delivered elsewhere.
*/
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    level: Level,
    logger_name: String,
    raw_message: String,
    args: Vec<String>,
    attributes: Attributes,
    created: DateTime<Utc>,
    thread: ThreadKey,
}

impl Event {
    pub fn new(level: Level, logger_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            logger_name: logger_name.into(),
            raw_message: message.into(),
            args: Vec::new(),
            attributes: Attributes::default(),
            created: Utc::now(),
            thread: ThreadKey::current(),
        }
    }

    /// Positional arguments substituted into `{}` placeholders.
    pub fn with_args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: ToString,
    {
        self.args = args.into_iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Attributes this event as coming from `thread` rather than the constructing thread.
    pub fn on_thread(mut self, thread: ThreadKey) -> Self {
        self.thread = thread;
        self
    }

    pub fn at(mut self, created: DateTime<Utc>) -> Self {
        self.created = created;
        self
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn logger_name(&self) -> &str {
        &self.logger_name
    }

    pub fn raw_message(&self) -> &str {
        &self.raw_message
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    pub fn thread(&self) -> ThreadKey {
        self.thread
    }

    /**
    The message with positional arguments applied.

    Without arguments the message is returned verbatim. Otherwise each `{}`
    consumes the next argument and `{{` and `}}` produce literal braces. A `{}`
    with no argument left is kept as written, and surplus arguments are ignored,
    so a malformed call still logs something readable.
    */
    pub fn message(&self) -> String {
        if self.args.is_empty() {
            return self.raw_message.clone();
        }
        let mut out = String::with_capacity(self.raw_message.len());
        let mut args = self.args.iter();
        let mut chars = self.raw_message.chars().peekable();
        while let Some(c) = chars.next() {
            match (c, chars.peek()) {
                ('{', Some('{')) | ('}', Some('}')) => {
                    chars.next();
                    out.push(c);
                }
                ('{', Some('}')) => {
                    chars.next();
                    match args.next() {
                        Some(arg) => out.push_str(arg),
                        None => out.push_str("{}"),
                    }
                }
                _ => out.push(c),
            }
        }
        out
    }

    /// The `task_id` attribute if set, otherwise the task bound to this event's thread.
    pub fn effective_task_id(&self, context: &TaskContext) -> Option<TaskId> {
        self.attributes
            .task_id
            .or_else(|| context.lookup_for(self.thread))
    }
}
