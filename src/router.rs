// SPDX-License-Identifier: MIT OR Apache-2.0

//! Named sinks and event dispatch.
//!
//! A [`Router`] owns a set of sinks, each registered under a name, and the
//! [`TaskContext`] that attributes events to tasks. It offers two ways in:
//!
//! - [`Router::dispatch`] (and [`Router::log`]) offer one event to every attached
//!   sink, in attach order. This is the everyday path, and the one the
//!   [`log` bridge](crate::bridge) uses.
//! - [`Router::emit`] builds an event for one named sink and delivers it there
//!   only. This is how audit records are written to `cuckoo.json` without also
//!   appearing on the console.
//!
//! # The standard topology
//!
//! | name          | sink                                                        |
//! |---------------|-------------------------------------------------------------|
//! | `cuckoo.log`  | plain text at `pathFor("cuckoo.log")`                       |
//! | `cuckoo.json` | JSON lines at `pathFor("cuckoo.json")`, structured only     |
//! | `console`     | colored plain text on stdout                                |
//! | `database`    | errors with a `task_id` forwarded to the [`ErrorStore`]     |
//! | `task`        | plain text at `pathFor("cuckoo.log", task)` while bound     |
//!
//! # Example
//!
//! ```rust
//! use tasklog::{Attributes, Level, Router, context::TaskId};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let router = Router::builder().root(dir.path()).build();
//! router.init_sink("cuckoo.log").unwrap();
//! router.init_sink("task").unwrap();
//!
//! router.task_log_start(TaskId(1));
//! router
//!     .log(Level::Info, "analysis", "starting analysis", &[], Attributes::default())
//!     .unwrap();
//! router.task_log_stop(TaskId(1));
//!
//! let task_log = dir.path().join("storage/analyses/1/cuckoo.log");
//! assert!(std::fs::read_to_string(task_log).unwrap().contains("starting analysis"));
//! ```

use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;

use crate::Level;
use crate::attributes::Attributes;
use crate::collaborators::{CwdPaths, ErrorStore, PathResolver};
use crate::console_sink::ConsoleSink;
use crate::context::{TaskContext, TaskId, TaskLogGuard};
use crate::error::{DispatchError, RouterError, SinkError};
use crate::error_store_sink::ErrorStoreSink;
use crate::event::Event;
use crate::file_sink::{JsonFileSink, RollingFileSink};
use crate::sink::Sink;
use crate::task_file_sink::TaskFileSink;

/// The sinks the router knows how to build by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SinkKind {
    /// `cuckoo.log`
    RollingLog,
    /// `cuckoo.json`
    Json,
    /// `console`
    Console,
    /// `database`
    Database,
    /// `task`
    Task,
}

impl SinkKind {
    pub const ALL: [SinkKind; 5] = [
        SinkKind::RollingLog,
        SinkKind::Json,
        SinkKind::Console,
        SinkKind::Database,
        SinkKind::Task,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            SinkKind::RollingLog => "cuckoo.log",
            SinkKind::Json => "cuckoo.json",
            SinkKind::Console => "console",
            SinkKind::Database => "database",
            SinkKind::Task => "task",
        }
    }
}

impl Display for SinkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SinkKind {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SinkKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| RouterError::UnknownSink(s.to_string()))
    }
}

/// Configures a [`Router`] before any sink is attached.
#[derive(Debug, Default)]
pub struct RouterBuilder {
    context: Option<Arc<TaskContext>>,
    paths: Option<Arc<dyn PathResolver>>,
    error_store: Option<Arc<dyn ErrorStore>>,
    level: Level,
    color: Option<bool>,
}

impl RouterBuilder {
    /// Shares an existing task context instead of creating a fresh one.
    pub fn context(mut self, context: Arc<TaskContext>) -> Self {
        self.context = Some(context);
        self
    }

    /// Resolves log paths under `root` with the [`CwdPaths`] layout.
    pub fn root(self, root: impl Into<PathBuf>) -> Self {
        self.paths(Arc::new(CwdPaths::new(root)))
    }

    pub fn paths(mut self, paths: Arc<dyn PathResolver>) -> Self {
        self.paths = Some(paths);
        self
    }

    pub fn error_store(mut self, store: Arc<dyn ErrorStore>) -> Self {
        self.error_store = Some(store);
        self
    }

    /// Minimum level for [`Router::dispatch`]. Defaults to [`Level::Info`].
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Forces console coloring on or off. By default it follows whether stdout is a terminal.
    pub fn color(mut self, color: bool) -> Self {
        self.color = Some(color);
        self
    }

    pub fn build(self) -> Router {
        Router {
            context: self.context.unwrap_or_default(),
            paths: self
                .paths
                .unwrap_or_else(|| Arc::new(CwdPaths::new("."))),
            error_store: self.error_store,
            level: RwLock::new(self.level),
            color: self.color,
            sinks: RwLock::new(Vec::new()),
            installed: AtomicBool::new(false),
        }
    }
}

/// Routes events to named sinks, attributing them to the task bound to the calling thread.
#[derive(Debug)]
pub struct Router {
    context: Arc<TaskContext>,
    paths: Arc<dyn PathResolver>,
    error_store: Option<Arc<dyn ErrorStore>>,
    level: RwLock<Level>,
    color: Option<bool>,
    sinks: RwLock<Vec<(String, Arc<dyn Sink>)>>,
    installed: AtomicBool,
}

impl Router {
    pub fn builder() -> RouterBuilder {
        RouterBuilder::default()
    }

    pub fn context(&self) -> &Arc<TaskContext> {
        &self.context
    }

    pub fn level(&self) -> Level {
        *self.level.read()
    }

    /// Changes the dispatch level. Once [installed](Router::install), the `log`
    /// facade's max level follows.
    pub fn set_level(&self, level: Level) {
        *self.level.write() = level;
        if self.is_installed() {
            log::set_max_level(level.to_level_filter());
        }
    }

    /// Whether this router is the process-wide `log` logger.
    pub fn is_installed(&self) -> bool {
        self.installed.load(Ordering::Acquire)
    }

    pub(crate) fn mark_installed(&self) {
        self.installed.store(true, Ordering::Release);
    }

    // ------------------------------------------------------------------
    // initialization
    // ------------------------------------------------------------------

    /**
    Builds and attaches the standard sink called `name`.

    Fails with [`RouterError::UnknownSink`] for a name outside the standard
    topology, so typos surface at startup rather than as lost events. Initializing
    a name a second time replaces the earlier sink.
    */
    pub fn init_sink(&self, name: &str) -> Result<(), RouterError> {
        self.init_kind(name.parse()?)
    }

    pub fn init_kind(&self, kind: SinkKind) -> Result<(), RouterError> {
        let opened = |source: SinkError| RouterError::Open {
            name: kind.name().to_string(),
            source,
        };
        let sink: Arc<dyn Sink> = match kind {
            SinkKind::RollingLog => Arc::new(
                RollingFileSink::plain(self.paths.path_for(kind.name(), None)).map_err(opened)?,
            ),
            SinkKind::Json => Arc::new(
                JsonFileSink::json(self.paths.path_for(kind.name(), None), self.context.clone())
                    .map_err(opened)?,
            ),
            SinkKind::Console => {
                let console = ConsoleSink::stdout();
                Arc::new(match self.color {
                    Some(color) => console.colorize(color),
                    None => console,
                })
            }
            SinkKind::Database => {
                let store = self
                    .error_store
                    .clone()
                    .ok_or(RouterError::MissingErrorStore)?;
                Arc::new(ErrorStoreSink::new(store))
            }
            SinkKind::Task => Arc::new(TaskFileSink::new(self.context.clone(), self.paths.clone())),
        };
        self.attach(kind.name(), sink);
        Ok(())
    }

    /// Attaches a custom sink under `name`, replacing any sink already registered there.
    pub fn attach(&self, name: impl Into<String>, sink: Arc<dyn Sink>) {
        let name = name.into();
        let mut sinks = self.sinks.write();
        match sinks.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = sink,
            None => sinks.push((name, sink)),
        }
    }

    pub fn detach(&self, name: &str) -> Option<Arc<dyn Sink>> {
        let mut sinks = self.sinks.write();
        let index = sinks.iter().position(|(existing, _)| existing == name)?;
        Some(sinks.remove(index).1)
    }

    pub fn sink(&self, name: &str) -> Option<Arc<dyn Sink>> {
        self.sinks
            .read()
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, sink)| sink.clone())
    }

    /// Names of the attached sinks, in attach order.
    pub fn sink_names(&self) -> Vec<String> {
        self.sinks.read().iter().map(|(name, _)| name.clone()).collect()
    }

    // ------------------------------------------------------------------
    // task bracket
    // ------------------------------------------------------------------

    /// Attributes events from the calling thread to `task` until [`Router::task_log_stop`].
    pub fn task_log_start(&self, task: TaskId) {
        self.context.start(task);
    }

    /// Ends the calling thread's task binding, whichever task it holds.
    pub fn task_log_stop(&self, task: TaskId) {
        self.context.stop(task);
    }

    /// Like [`Router::task_log_start`], ending the binding when the guard drops.
    pub fn task_scope(&self, task: TaskId) -> TaskLogGuard {
        self.context.scope(task)
    }

    // ------------------------------------------------------------------
    // single-sink emit
    // ------------------------------------------------------------------

    /**
    Delivers a message to the one sink registered as `name`.

    The event takes the sink's [emit level](Sink::emit_level), the current time
    and the calling thread. Returns the sink's own delivery result.

    # Panics

    If no sink is registered as `name`. Sink names are fixed at initialization, so
    a miss here is a programming error; use [`Router::try_emit`] to handle it
    instead.
    */
    pub fn emit(
        &self,
        name: &str,
        message: &str,
        args: &[&dyn Display],
        attributes: Attributes,
    ) -> Result<(), SinkError> {
        let sink = self.expect_sink(name);
        let event = Event::new(sink.emit_level(), name, message)
            .with_args(args)
            .with_attributes(attributes);
        sink.deliver(&event)
    }

    /// Like [`Router::emit`], but reports an unregistered name as an error.
    pub fn try_emit(
        &self,
        name: &str,
        message: &str,
        args: &[&dyn Display],
        attributes: Attributes,
    ) -> Result<(), RouterError> {
        let sink = self
            .sink(name)
            .ok_or_else(|| RouterError::NotInitialized(name.to_string()))?;
        let event = Event::new(sink.emit_level(), name, message)
            .with_args(args)
            .with_attributes(attributes);
        sink.deliver(&event).map_err(|source| RouterError::Sink {
            name: name.to_string(),
            source,
        })
    }

    /**
    Delivers a prebuilt event to the sink registered as `name`.

    # Panics

    If no sink is registered as `name`.
    */
    pub fn emit_event(&self, name: &str, event: &Event) -> Result<(), SinkError> {
        self.expect_sink(name).deliver(event)
    }

    fn expect_sink(&self, name: &str) -> Arc<dyn Sink> {
        match self.sink(name) {
            Some(sink) => sink,
            None => panic!("tasklog: sink `{}` was never initialized", name),
        }
    }

    // ------------------------------------------------------------------
    // stream dispatch
    // ------------------------------------------------------------------

    /**
    Offers `event` to every attached sink.

    Events below the router's level are discarded. A failing sink does not stop
    delivery to the sinks after it; each failure is reported on stderr and
    collected into the returned [`DispatchError`].
    */
    pub fn dispatch(&self, event: &Event) -> Result<(), DispatchError> {
        if event.level() < self.level() {
            return Ok(());
        }
        // snapshot so sinks run without holding the registry lock
        let sinks = self.sinks.read().clone();
        let mut failures = Vec::new();
        for (name, sink) in sinks {
            if let Err(error) = sink.deliver(event) {
                eprintln!("tasklog: sink `{}` failed: {}", name, error);
                failures.push((name, error));
            }
        }
        if failures.is_empty() {
            Ok(())
        } else {
            Err(DispatchError { failures })
        }
    }

    /// Builds an event on the calling thread and [dispatches](Router::dispatch) it.
    pub fn log(
        &self,
        level: Level,
        logger_name: &str,
        message: &str,
        args: &[&dyn Display],
        attributes: Attributes,
    ) -> Result<(), DispatchError> {
        let event = Event::new(level, logger_name, message)
            .with_args(args)
            .with_attributes(attributes);
        self.dispatch(&event)
    }

    // ------------------------------------------------------------------
    // lifecycle
    // ------------------------------------------------------------------

    pub fn flush(&self) {
        for (_, sink) in self.sinks.read().iter() {
            sink.flush();
        }
    }

    /// Flushes and detaches every sink and clears all task bindings.
    pub fn teardown(&self) {
        let sinks = std::mem::take(&mut *self.sinks.write());
        for (_, sink) in sinks {
            sink.flush();
        }
        self.context.clear();
    }
}
