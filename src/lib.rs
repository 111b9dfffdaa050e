//SPDX-License-Identifier: MIT OR Apache-2.0
/*!
# tasklog

tasklog routes log events from a multi-threaded analysis host to several
destinations at once, and attributes each event to the analysis task that the
emitting thread is working on.

# The problem

A sandbox host runs many analysis tasks concurrently, one per worker thread.
Operators want one log of everything, a structured audit trail, colored console
output, errors recorded against the task that raised them, and a separate log
file per task. The code doing the logging should not have to know any of that;
it just logs.

# The topology

A [`Router`] owns named sinks. The standard ones are:

| name          | destination                                                       |
|---------------|-------------------------------------------------------------------|
| `cuckoo.log`  | plain text, reopened if deleted or rotated                        |
| `cuckoo.json` | one JSON object per line, for events with `action` and `status`   |
| `console`     | stdout, with the message colored by severity                      |
| `database`    | error events carrying a `task_id`, handed to an [`ErrorStore`](collaborators::ErrorStore) |
| `task`        | the log file of the task bound to the emitting thread             |

# Tasks and threads

A worker calls [`Router::task_log_start`] when it picks up a task and
[`Router::task_log_stop`] when it is done (or holds a [`Router::task_scope`]
guard). While the binding is in place, every event emitted on that thread lands
in the task's own log file as well as the global ones.

```rust
use tasklog::{Attributes, Level, Router, context::TaskId};

let dir = tempfile::tempdir().unwrap();
let router = Router::builder().root(dir.path()).color(false).build();
for name in ["cuckoo.log", "cuckoo.json", "task"] {
    router.init_sink(name).unwrap();
}

{
    let _task = router.task_scope(TaskId(7));
    router
        .log(
            Level::Info,
            "analysis",
            "guest {} booted",
            &[&"win10"],
            Attributes::new().action("vm.start").status("success"),
        )
        .unwrap();
}

let task_log = dir.path().join("storage/analyses/7/cuckoo.log");
assert!(std::fs::read_to_string(task_log).unwrap().contains("guest win10 booted"));
let audit = std::fs::read_to_string(dir.path().join("log/cuckoo.json")).unwrap();
assert!(audit.contains(r#""task_id":7"#));
```

# The `log` facade

[`Router::install`] makes the router the process-wide [`log`] logger, so
`log::info!` and friends anywhere in the program reach every sink. See
[`bridge`].
*/

mod attributes;
pub mod bridge;
pub mod collaborators;
pub mod colors;
mod config;
mod console_sink;
pub mod context;
mod error;
mod error_store_sink;
mod event;
mod file_sink;
mod format;
mod inmemory_sink;
mod level;
mod macros;
mod router;
mod sink;
mod task_file_sink;
mod watched_file;

pub use attributes::Attributes;
pub use config::RouterConfig;
pub use console_sink::ConsoleSink;
pub use error::{BoxError, DispatchError, RouterError, SinkError};
pub use error_store_sink::ErrorStoreSink;
pub use event::Event;
pub use file_sink::{FileSink, JsonFileSink, RollingFileSink};
pub use format::{Formatter, JsonFormatter, PlainFormatter};
pub use inmemory_sink::InMemorySink;
pub use level::{Level, ParseLevelError};
pub use router::{Router, RouterBuilder, SinkKind};
pub use sink::Sink;
pub use task_file_sink::TaskFileSink;
pub use watched_file::WatchedFile;
