// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types.

use std::path::PathBuf;

use thiserror::Error;

/// Boxed error returned by collaborators such as an [`ErrorStore`](crate::collaborators::ErrorStore).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A sink failed to deliver one event.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("cannot write log file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot encode event: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("error store rejected record for task {task_id}: {source}")]
    Store {
        task_id: crate::context::TaskId,
        #[source]
        source: BoxError,
    },
}

impl SinkError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SinkError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Building or addressing the router failed.
#[derive(Error, Debug)]
pub enum RouterError {
    #[error("unknown sink name `{0}`")]
    UnknownSink(String),

    #[error("sink `{0}` has not been initialized")]
    NotInitialized(String),

    #[error("sink `database` requires an error store")]
    MissingErrorStore,

    #[error("cannot open sink `{name}`: {source}")]
    Open {
        name: String,
        #[source]
        source: SinkError,
    },

    #[error("cannot read configuration {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("sink `{name}` failed: {source}")]
    Sink {
        name: String,
        #[source]
        source: SinkError,
    },

    #[error("cannot install log bridge: {0}")]
    Install(#[from] log::SetLoggerError),
}

/// One or more sinks failed while an event was dispatched to all of them.
///
/// Every sink is still offered the event; this lists the ones that failed, in
/// attach order.
#[derive(Error, Debug)]
#[error("{} sink(s) failed: {}", .failures.len(), describe(.failures))]
pub struct DispatchError {
    pub failures: Vec<(String, SinkError)>,
}

fn describe(failures: &[(String, SinkError)]) -> String {
    failures
        .iter()
        .map(|(name, error)| format!("{}: {}", name, error))
        .collect::<Vec<_>>()
        .join("; ")
}
