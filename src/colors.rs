// SPDX-License-Identifier: MIT OR Apache-2.0

//! ANSI color helpers for console output.

use crate::Level;

/// Marker that makes an informational console line stand out.
pub const COMPLETION_MARKER: &str = "analysis procedure completed";

fn paint(code: u8, text: &str) -> String {
    format!("\x1b[{}m{}\x1b[0m", code, text)
}

pub fn red(text: &str) -> String {
    paint(31, text)
}

pub fn yellow(text: &str) -> String {
    paint(33, text)
}

pub fn cyan(text: &str) -> String {
    paint(36, text)
}

/**
Colors a message body by severity.

Warnings are yellow, errors and criticals red. Any other body containing
[`COMPLETION_MARKER`] is cyan; everything else is returned unchanged.

```rust
use tasklog::{Level, colors};

assert_eq!(colors::colorize_body(Level::Warning, "disk low"), colors::yellow("disk low"));
assert_eq!(colors::colorize_body(Level::Info, "hello"), "hello");
```
*/
pub fn colorize_body(level: Level, body: &str) -> String {
    match level {
        Level::Warning => yellow(body),
        Level::Error | Level::Critical => red(body),
        _ if body.contains(COMPLETION_MARKER) => cyan(body),
        _ => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_mapping() {
        assert_eq!(colorize_body(Level::Error, "x"), "\x1b[31mx\x1b[0m");
        assert_eq!(colorize_body(Level::Critical, "x"), red("x"));
        assert_eq!(colorize_body(Level::Debug, "x"), "x");
    }

    #[test]
    fn marker_only_applies_below_warning() {
        let body = "Task #1: analysis procedure completed";
        assert_eq!(colorize_body(Level::Info, body), cyan(body));
        assert_eq!(colorize_body(Level::Error, body), red(body));
    }
}
