// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt::Display;
use std::thread::ThreadId;

/// Identity of a thread of control, used only as a lookup key.
///
/// [`ThreadKey::current`] names the calling OS thread. [`ThreadKey::synthetic`]
/// names a logical thread that the caller manages itself, which lets tests
/// drive the [`TaskContext`](super::TaskContext) map deterministically.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ThreadKey {
    Os(ThreadId),
    Synthetic(u64),
}

impl ThreadKey {
    /// The key of the calling thread.
    #[inline]
    pub fn current() -> ThreadKey {
        ThreadKey::Os(std::thread::current().id())
    }

    pub const fn synthetic(id: u64) -> ThreadKey {
        ThreadKey::Synthetic(id)
    }
}

impl Display for ThreadKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThreadKey::Os(id) => write!(f, "{:?}", id),
            ThreadKey::Synthetic(id) => write!(f, "synthetic({})", id),
        }
    }
}
