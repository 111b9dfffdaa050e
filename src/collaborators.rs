// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interfaces to the systems the router writes through but does not own.

use std::fmt::Debug;
use std::path::{Path, PathBuf};

use crate::context::TaskId;
use crate::error::BoxError;

/// Persistent per-task error records, e.g. the task database.
pub trait ErrorStore: Debug + Send + Sync {
    /// Records `message` as an error of `task_id`.
    fn append_error(&self, message: &str, task_id: TaskId) -> Result<(), BoxError>;
}

/// Maps log file names to paths, optionally scoped to a task.
pub trait PathResolver: Debug + Send + Sync {
    fn path_for(&self, filename: &str, task: Option<TaskId>) -> PathBuf;
}

/**
The working-directory layout.

Global logs live in `<root>/log/`, task logs in `<root>/storage/analyses/<task>/`.

```rust
use std::path::Path;
use tasklog::collaborators::{CwdPaths, PathResolver};
use tasklog::context::TaskId;

let paths = CwdPaths::new("/srv/cwd");
assert_eq!(paths.path_for("cuckoo.log", None), Path::new("/srv/cwd/log/cuckoo.log"));
assert_eq!(
    paths.path_for("cuckoo.log", Some(TaskId(4))),
    Path::new("/srv/cwd/storage/analyses/4/cuckoo.log"),
);
```
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CwdPaths {
    root: PathBuf,
}

impl CwdPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl PathResolver for CwdPaths {
    fn path_for(&self, filename: &str, task: Option<TaskId>) -> PathBuf {
        match task {
            None => self.root.join("log").join(filename),
            Some(task) => self
                .root
                .join("storage")
                .join("analyses")
                .join(task.to_string())
                .join(filename),
        }
    }
}
