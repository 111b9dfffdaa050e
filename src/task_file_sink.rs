// SPDX-License-Identifier: MIT OR Apache-2.0
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::collaborators::PathResolver;
use crate::context::{TaskContext, TaskId};
use crate::error::SinkError;
use crate::event::Event;
use crate::format::{Formatter, PlainFormatter};
use crate::sink::Sink;

/**
Appends events to the log file of the task bound to the event's thread.

Events from threads with no task binding are dropped. The file is opened fresh
for every write, and a missing task directory is created on first use. A write
that still fails is returned as an error rather than dropped.
*/
#[derive(Debug)]
pub struct TaskFileSink {
    context: Arc<TaskContext>,
    paths: Arc<dyn PathResolver>,
    filename: String,
    formatter: PlainFormatter,
    write_lock: Mutex<()>,
}

impl TaskFileSink {
    pub const FILENAME: &'static str = "cuckoo.log";

    pub fn new(context: Arc<TaskContext>, paths: Arc<dyn PathResolver>) -> Self {
        Self {
            context,
            paths,
            filename: Self::FILENAME.to_string(),
            formatter: PlainFormatter,
            write_lock: Mutex::new(()),
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    pub fn path_for(&self, task: TaskId) -> PathBuf {
        self.paths.path_for(&self.filename, Some(task))
    }

    fn append(&self, task: TaskId, line: &str) -> Result<(), SinkError> {
        let path = self.path_for(task);
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');

        let _guard = self.write_lock.lock();
        if let Some(parent) = path.parent().filter(|p| !p.exists()) {
            fs::create_dir_all(parent).map_err(|e| SinkError::io(&path, e))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| SinkError::io(&path, e))?;
        file.write_all(buf.as_bytes())
            .map_err(|e| SinkError::io(&path, e))
    }
}

impl Sink for TaskFileSink {
    fn deliver(&self, event: &Event) -> Result<(), SinkError> {
        let Some(task) = self.context.lookup_for(event.thread()) else {
            return Ok(());
        };
        let line = self.formatter.format(event)?;
        self.append(task, &line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Level;
    use crate::collaborators::CwdPaths;
    use crate::context::ThreadKey;
    use tempfile::TempDir;

    fn sink(temp: &TempDir) -> (Arc<TaskContext>, TaskFileSink) {
        let context = Arc::new(TaskContext::new());
        let paths = Arc::new(CwdPaths::new(temp.path()));
        (context.clone(), TaskFileSink::new(context, paths))
    }

    #[test]
    fn no_binding_is_a_noop() {
        let temp = TempDir::new().unwrap();
        let (_context, sink) = sink(&temp);
        sink.deliver(&Event::new(Level::Info, "t", "system line"))
            .unwrap();
        assert!(!temp.path().join("storage").exists());
    }

    #[test]
    fn writes_to_bound_task_directory() {
        let temp = TempDir::new().unwrap();
        let (context, sink) = sink(&temp);
        let key = ThreadKey::synthetic(1);
        context.start_for(key, TaskId(5));

        sink.deliver(&Event::new(Level::Info, "t", "one").on_thread(key))
            .unwrap();
        sink.deliver(&Event::new(Level::Info, "t", "two").on_thread(key))
            .unwrap();

        let content = fs::read_to_string(sink.path_for(TaskId(5))).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("INFO: one"));
        assert!(lines[1].ends_with("INFO: two"));
    }

    #[test]
    fn ignores_task_id_attribute() {
        let temp = TempDir::new().unwrap();
        let (_context, sink) = sink(&temp);
        let event = Event::new(Level::Info, "t", "m")
            .with_attributes(crate::Attributes::new().task_id(5))
            .on_thread(ThreadKey::synthetic(1));
        sink.deliver(&event).unwrap();
        assert!(!sink.path_for(TaskId(5)).exists());
    }

    #[test]
    fn unwritable_path_fails_loudly() {
        let temp = TempDir::new().unwrap();
        let (context, sink) = sink(&temp);
        // a regular file where the task directory should be
        let blocker = temp.path().join("storage");
        fs::write(&blocker, b"not a directory").unwrap();

        let key = ThreadKey::synthetic(2);
        context.start_for(key, TaskId(1));
        let result = sink.deliver(&Event::new(Level::Info, "t", "m").on_thread(key));
        assert!(matches!(result, Err(SinkError::Io { .. })));
    }
}
