// SPDX-License-Identifier: MIT OR Apache-2.0
use std::sync::Arc;

use crate::Level;
use crate::collaborators::ErrorStore;
use crate::error::SinkError;
use crate::event::Event;
use crate::sink::Sink;

/**
Forwards task errors to the persistent [`ErrorStore`].

Only events at [`Level::Error`] or above that carry a `task_id` attribute are
forwarded. The task bound to the thread is not consulted; an error
is only attached to a task when the caller says so. The store receives the
message body alone, without timestamp, logger name or level.

A failing store does not fail the log call. The failure is reported on stderr
and the event is dropped.
*/
#[derive(Debug)]
pub struct ErrorStoreSink {
    store: Arc<dyn ErrorStore>,
}

impl ErrorStoreSink {
    pub const THRESHOLD: Level = Level::Error;

    pub fn new(store: Arc<dyn ErrorStore>) -> Self {
        Self { store }
    }
}

impl Sink for ErrorStoreSink {
    fn deliver(&self, event: &Event) -> Result<(), SinkError> {
        if event.level() < Self::THRESHOLD {
            return Ok(());
        }
        let Some(task_id) = event.attributes().task_id else {
            return Ok(());
        };
        let message = event.message();
        if let Err(source) = self.store.append_error(&message, task_id) {
            let error = SinkError::Store { task_id, source };
            eprintln!("tasklog: {}", error);
        }
        Ok(())
    }

    fn emit_level(&self) -> Level {
        Self::THRESHOLD
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::Attributes;
    use crate::context::TaskId;
    use crate::error::BoxError;
    use parking_lot::Mutex;

    #[derive(Debug, Default)]
    struct Recording(Mutex<Vec<(String, TaskId)>>);

    impl ErrorStore for Recording {
        fn append_error(&self, message: &str, task_id: TaskId) -> Result<(), BoxError> {
            self.0.lock().push((message.to_string(), task_id));
            Ok(())
        }
    }

    #[derive(Debug)]
    struct Unavailable;

    impl ErrorStore for Unavailable {
        fn append_error(&self, _message: &str, _task_id: TaskId) -> Result<(), BoxError> {
            Err("database is locked".into())
        }
    }

    #[test]
    fn below_error_is_ignored() {
        let store = Arc::new(Recording::default());
        let sink = ErrorStoreSink::new(store.clone());
        let event = Event::new(Level::Warning, "t", "careful")
            .with_attributes(Attributes::new().task_id(7));
        sink.deliver(&event).unwrap();
        assert!(store.0.lock().is_empty());
    }

    #[test]
    fn error_with_task_is_forwarded_once() {
        let store = Arc::new(Recording::default());
        let sink = ErrorStoreSink::new(store.clone());
        let event = Event::new(Level::Error, "t", "machine {} died")
            .with_args(["cuckoo1"])
            .with_attributes(Attributes::new().task_id(7));
        sink.deliver(&event).unwrap();

        let calls = store.0.lock();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, TaskId(7));
        assert_eq!(calls[0].0, "machine cuckoo1 died");
    }

    #[test]
    fn error_without_task_is_dropped() {
        let store = Arc::new(Recording::default());
        let sink = ErrorStoreSink::new(store.clone());
        sink.deliver(&Event::new(Level::Critical, "t", "no task"))
            .unwrap();
        assert!(store.0.lock().is_empty());
    }

    #[test]
    fn store_failure_is_swallowed() {
        let sink = ErrorStoreSink::new(Arc::new(Unavailable));
        let event = Event::new(Level::Error, "t", "boom")
            .with_attributes(Attributes::new().task_id(1));
        assert!(sink.deliver(&event).is_ok());
    }

    #[test]
    fn emits_at_error() {
        let sink = ErrorStoreSink::new(Arc::new(Recording::default()));
        assert_eq!(sink.emit_level(), Level::Error);
    }
}
