// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::context::TaskId;

/**
Named attributes attached to an event.

The set is closed: sinks only ever look at these three fields, so they are
fields rather than a string-keyed bag.

```rust
use tasklog::{Attributes, context::TaskId};

let attrs = Attributes::new().action("procstart").status("success").task_id(3);
assert!(attrs.is_structured());
assert_eq!(attrs.task_id, Some(TaskId(3)));
```
*/
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Attributes {
    pub action: Option<String>,
    pub status: Option<String>,
    pub task_id: Option<TaskId>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn task_id(mut self, task_id: u64) -> Self {
        self.task_id = Some(TaskId(task_id));
        self
    }

    /// True when both `action` and `status` are present and non-empty.
    ///
    /// Only such events are written to the structured JSON log.
    pub fn is_structured(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        present(&self.action) && present(&self.status)
    }
}
