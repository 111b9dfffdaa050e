// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shorthand for [`Router::emit`](crate::Router::emit) and
//! [`Router::log`](crate::Router::log).
//!
//! Both macros take positional arguments after the message and, after a `;`,
//! attributes written as `key = value`. The keys are the [`Attributes`](crate::Attributes)
//! builder methods: `action`, `status` and `task_id`.

/**
Delivers a message to one named sink.

```rust
use std::sync::Arc;
use tasklog::{InMemorySink, Router, emit};

let router = Router::builder().build();
let sink = Arc::new(InMemorySink::new());
router.attach("cuckoo.json", sink.clone());

emit!(router, "cuckoo.json", "dumped {} bytes", 4096; action = "memdump", status = "success").unwrap();

let event = &sink.drain_events()[0];
assert_eq!(event.message(), "dumped 4096 bytes");
assert_eq!(event.attributes().action.as_deref(), Some("memdump"));
```

# Panics

If no sink is registered under the name, like [`Router::emit`](crate::Router::emit).
*/
#[macro_export]
macro_rules! emit {
    ($router:expr, $sink:expr, $msg:expr $(, $arg:expr)* $(; $($key:ident = $value:expr),+)?) => {
        $router.emit(
            $sink,
            $msg,
            &[$(&$arg as &dyn ::std::fmt::Display),*],
            $crate::Attributes::new() $($(.$key($value))+)?,
        )
    };
}

/**
Builds an event at `level` and offers it to every attached sink.

```rust
use std::sync::Arc;
use tasklog::{InMemorySink, Level, Router, dispatch};

let router = Router::builder().build();
let sink = Arc::new(InMemorySink::new());
router.attach("memory", sink.clone());

dispatch!(router, Level::Error, "scheduler", "machine {} unreachable", "win7"; task_id = 12).unwrap();

let event = &sink.drain_events()[0];
assert_eq!(event.logger_name(), "scheduler");
assert_eq!(event.attributes().task_id.map(|t| t.0), Some(12));
```
*/
#[macro_export]
macro_rules! dispatch {
    ($router:expr, $level:expr, $logger:expr, $msg:expr $(, $arg:expr)* $(; $($key:ident = $value:expr),+)?) => {
        $router.log(
            $level,
            $logger,
            $msg,
            &[$(&$arg as &dyn ::std::fmt::Display),*],
            $crate::Attributes::new() $($(.$key($value))+)?,
        )
    };
}
