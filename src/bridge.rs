// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration with the [`log`] facade.
//!
//! Once a router is [installed](Router::install), every `log::info!`,
//! `log::error!` and friends anywhere in the process is dispatched to all of the
//! router's sinks. Structured attributes ride along as key-values:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tasklog::Router;
//!
//! let router = Arc::new(Router::builder().root("/srv/cwd").build());
//! router.init_sink("cuckoo.json").unwrap();
//! router.clone().install().unwrap();
//!
//! log::info!(action = "vmcapture", status = "success"; "captured memory dump");
//! log::error!(task_id = 7; "analysis timed out");
//! ```
//!
//! Level mapping: `Error` → [`Level::Error`], `Warn` → [`Level::Warning`],
//! `Info` → [`Level::Info`], `Debug` and `Trace` → [`Level::Debug`]. The record's
//! target becomes the event's logger name.

use std::sync::Arc;

use log::kv::{Key, Value};

use crate::Level;
use crate::attributes::Attributes;
use crate::context::TaskId;
use crate::error::RouterError;
use crate::event::Event;
use crate::router::Router;

/// A [`log::Log`] implementation that feeds a [`Router`].
#[derive(Debug, Clone)]
pub struct LogBridge {
    router: Arc<Router>,
}

impl LogBridge {
    pub fn new(router: Arc<Router>) -> Self {
        Self { router }
    }

    /// Converts a `log` record into an event attributed to the calling thread.
    pub fn event_for(record: &log::Record<'_>) -> Event {
        Event::new(
            Level::from(record.level()),
            record.target(),
            record.args().to_string(),
        )
        .with_attributes(attributes_of(record))
    }
}

fn task_id_of(value: &Value<'_>) -> Option<TaskId> {
    value
        .to_u64()
        .or_else(|| value.to_string().parse().ok())
        .map(TaskId)
}

fn attributes_of(record: &log::Record<'_>) -> Attributes {
    let source = record.key_values();
    let text = |name: &str| source.get(Key::from_str(name)).map(|v| v.to_string());
    Attributes {
        action: text("action"),
        status: text("status"),
        task_id: source
            .get(Key::from_str("task_id"))
            .and_then(|v| task_id_of(&v)),
    }
}

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        Level::from(metadata.level()) >= self.router.level()
    }

    fn log(&self, record: &log::Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        // failures are already reported on stderr by dispatch
        let _ = self.router.dispatch(&Self::event_for(record));
    }

    fn flush(&self) {
        self.router.flush();
    }
}

impl Router {
    /**
    Installs this router as the process-wide [`log`] logger.

    Can succeed at most once per process; later calls return
    [`RouterError::Install`]. Later [`Router::set_level`] calls also move the
    `log` max level.
    */
    pub fn install(self: Arc<Self>) -> Result<(), RouterError> {
        log::set_boxed_logger(Box::new(LogBridge::new(self.clone())))?;
        self.mark_installed();
        log::set_max_level(self.level().to_level_filter());
        Ok(())
    }
}
