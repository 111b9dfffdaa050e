// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sinks that append to one fixed log file.
//!
//! [`FileSink`] pairs a [`WatchedFile`] with a [`Formatter`]. The two file sinks
//! of the standard topology are instances of it:
//!
//! - [`RollingFileSink`] writes every event as a plain text line.
//! - [`JsonFileSink`] writes only events with `action` and `status` attributes,
//!   one JSON object per line.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::context::TaskContext;
use crate::error::SinkError;
use crate::event::Event;
use crate::format::{Formatter, JsonFormatter, PlainFormatter};
use crate::sink::Sink;
use crate::watched_file::WatchedFile;

/// Appends formatted events to a watched file.
#[derive(Debug)]
pub struct FileSink<F> {
    file: WatchedFile,
    formatter: F,
}

pub type RollingFileSink = FileSink<PlainFormatter>;
pub type JsonFileSink = FileSink<JsonFormatter>;

impl<F: Formatter> FileSink<F> {
    pub fn new(path: impl Into<PathBuf>, formatter: F) -> Result<Self, SinkError> {
        Ok(Self {
            file: WatchedFile::open(path)?,
            formatter,
        })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

impl RollingFileSink {
    pub fn plain(path: impl Into<PathBuf>) -> Result<Self, SinkError> {
        FileSink::new(path, PlainFormatter)
    }
}

impl JsonFileSink {
    pub fn json(path: impl Into<PathBuf>, context: Arc<TaskContext>) -> Result<Self, SinkError> {
        FileSink::new(path, JsonFormatter::new(context))
    }
}

impl<F: Formatter> Sink for FileSink<F> {
    fn deliver(&self, event: &Event) -> Result<(), SinkError> {
        if !self.formatter.filter(event) {
            return Ok(());
        }
        let line = self.formatter.format(event)?;
        self.file.write_line(&line)
    }

    fn flush(&self) {
        self.file.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Level;
    use crate::attributes::Attributes;
    use crate::context::{TaskId, ThreadKey};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn plain_sink_writes_every_event() {
        let temp = TempDir::new().unwrap();
        let sink = RollingFileSink::plain(temp.path().join("cuckoo.log")).unwrap();

        sink.deliver(&Event::new(Level::Info, "a", "one")).unwrap();
        sink.deliver(&Event::new(Level::Error, "b", "two")).unwrap();

        let content = fs::read_to_string(sink.path()).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("[a] INFO: one"));
        assert!(lines[1].ends_with("[b] ERROR: two"));
    }

    #[test]
    fn json_sink_drops_unstructured_events() {
        let temp = TempDir::new().unwrap();
        let context = Arc::new(TaskContext::new());
        let sink = JsonFileSink::json(temp.path().join("cuckoo.json"), context).unwrap();

        sink.deliver(&Event::new(Level::Info, "t", "plain text")).unwrap();
        sink.deliver(
            &Event::new(Level::Info, "t", "only action")
                .with_attributes(Attributes::new().action("procstart")),
        )
        .unwrap();

        assert_eq!(fs::read_to_string(sink.path()).unwrap(), "");
    }

    #[test]
    fn json_sink_writes_one_line_per_structured_event() {
        let temp = TempDir::new().unwrap();
        let context = Arc::new(TaskContext::new());
        let key = ThreadKey::synthetic(3);
        context.start_for(key, TaskId(12));
        let sink = JsonFileSink::json(temp.path().join("cuckoo.json"), context).unwrap();

        sink.deliver(
            &Event::new(Level::Info, "t", "started")
                .with_attributes(Attributes::new().action("procstart").status("success"))
                .on_thread(key),
        )
        .unwrap();

        let content = fs::read_to_string(sink.path()).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 1);
        let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(value["action"], "procstart");
        assert_eq!(value["status"], "success");
        assert_eq!(value["task_id"], 12);
        assert_eq!(value["level"], "info");
        assert_eq!(value["message"], "started");
        assert!(value["time"].is_i64());
    }

    #[test]
    fn json_sink_recreates_deleted_file() {
        let temp = TempDir::new().unwrap();
        let sink = JsonFileSink::json(
            temp.path().join("log/cuckoo.json"),
            Arc::new(TaskContext::new()),
        )
        .unwrap();
        let structured = |message: &str| {
            Event::new(Level::Info, "t", message)
                .with_attributes(Attributes::new().action("vm.start").status("success"))
        };

        sink.deliver(&structured("first")).unwrap();
        fs::remove_file(sink.path()).unwrap();
        sink.deliver(&structured("second")).unwrap();

        let content = fs::read_to_string(sink.path()).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 1);
        let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(value["message"], "second");
    }
}
