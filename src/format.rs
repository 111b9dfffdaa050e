// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rendering events to text.
//!
//! Two strategies are provided:
//!
//! - [`PlainFormatter`] renders `2017-04-01 12:00:00,123 [name] LEVEL: message`.
//! - [`JsonFormatter`] renders one JSON object per event and doubles as a filter
//!   that only admits events with both `action` and `status` attributes.

use std::fmt::Debug;
use std::sync::Arc;

use chrono::Local;
use serde::Serialize;

use crate::context::{TaskContext, TaskId};
use crate::error::SinkError;
use crate::event::Event;

pub trait Formatter: Debug + Send + Sync {
    /// Whether the event should be rendered at all.
    fn filter(&self, _event: &Event) -> bool {
        true
    }

    fn format(&self, event: &Event) -> Result<String, SinkError>;
}

/// Human-readable single-line formatter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PlainFormatter;

impl PlainFormatter {
    pub const fn new() -> Self {
        PlainFormatter
    }

    /// Renders the line with `body` standing in for the event's message.
    pub fn format_with_body(&self, event: &Event, body: &str) -> String {
        format!(
            "{} [{}] {}: {}",
            event
                .created()
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S,%3f"),
            event.logger_name(),
            event.level(),
            body
        )
    }
}

impl Formatter for PlainFormatter {
    fn format(&self, event: &Event) -> Result<String, SinkError> {
        Ok(self.format_with_body(event, &event.message()))
    }
}

#[derive(Debug, Serialize)]
struct JsonLine<'a> {
    action: Option<&'a str>,
    task_id: Option<TaskId>,
    status: Option<&'a str>,
    time: i64,
    message: String,
    level: &'static str,
}

/**
Structured formatter for the JSON log.

The `task_id` field comes from the event's attribute, or else from the task bound
to the event's thread in the shared [`TaskContext`].
*/
#[derive(Debug, Clone)]
pub struct JsonFormatter {
    context: Arc<TaskContext>,
}

impl JsonFormatter {
    pub fn new(context: Arc<TaskContext>) -> Self {
        Self { context }
    }
}

impl Formatter for JsonFormatter {
    fn filter(&self, event: &Event) -> bool {
        event.attributes().is_structured()
    }

    fn format(&self, event: &Event) -> Result<String, SinkError> {
        let attributes = event.attributes();
        let line = JsonLine {
            action: attributes.action.as_deref(),
            task_id: event.effective_task_id(&self.context),
            status: attributes.status.as_deref(),
            time: event.created().timestamp(),
            message: event.message(),
            level: event.level().lowercase_name(),
        };
        Ok(serde_json::to_string(&line)?)
    }
}
