// SPDX-License-Identifier: MIT OR Apache-2.0
use std::io::{IsTerminal, Write};

use parking_lot::Mutex;

use crate::colors::colorize_body;
use crate::error::SinkError;
use crate::event::Event;
use crate::format::PlainFormatter;
use crate::sink::Sink;

/**
Writes plain-formatted lines to stdout, coloring the message body by severity.

Only the body is colored; the timestamp, logger name and level stay plain.
Write failures are ignored: the console is best-effort.
 */
pub struct ConsoleSink {
    out: Mutex<Box<dyn Write + Send>>,
    colorize: bool,
    formatter: PlainFormatter,
}

impl std::fmt::Debug for ConsoleSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleSink")
            .field("colorize", &self.colorize)
            .finish_non_exhaustive()
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::stdout()
    }
}

impl ConsoleSink {
    /// A sink on stdout that colors only when stdout is a terminal.
    pub fn stdout() -> Self {
        let colorize = std::io::stdout().is_terminal();
        Self::with_writer(std::io::stdout(), colorize)
    }

    /// A sink on an arbitrary writer. Used for tests and for hosts that redirect the console.
    pub fn with_writer(out: impl Write + Send + 'static, colorize: bool) -> Self {
        Self {
            out: Mutex::new(Box::new(out)),
            colorize,
            formatter: PlainFormatter,
        }
    }

    pub fn colorize(mut self, colorize: bool) -> Self {
        self.colorize = colorize;
        self
    }

    pub fn render(&self, event: &Event) -> String {
        let body = event.message();
        if self.colorize {
            self.formatter
                .format_with_body(event, &colorize_body(event.level(), &body))
        } else {
            self.formatter.format_with_body(event, &body)
        }
    }
}

impl Sink for ConsoleSink {
    fn deliver(&self, event: &Event) -> Result<(), SinkError> {
        let mut line = self.render(event);
        line.push('\n');
        let mut out = self.out.lock();
        let _ = out.write_all(line.as_bytes());
        let _ = out.flush();
        Ok(())
    }

    fn flush(&self) {
        let _ = self.out.lock().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Level;
    use crate::colors::{cyan, yellow};
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Capture {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().clone()).unwrap()
        }
    }

    #[test]
    fn warning_colors_body_only() {
        let capture = Capture::default();
        let sink = ConsoleSink::with_writer(capture.clone(), true);
        sink.deliver(&Event::new(Level::Warning, "guest", "timeout reached"))
            .unwrap();
        let text = capture.text();
        assert!(
            text.ends_with(&format!("[guest] WARNING: {}\n", yellow("timeout reached"))),
            "{:?}",
            text
        );
        assert_eq!(text.matches("\x1b[").count(), 2);
    }

    #[test]
    fn completion_marker_is_cyan() {
        let sink = ConsoleSink::with_writer(Capture::default(), true);
        let body = "Task #3: analysis procedure completed";
        let line = sink.render(&Event::new(Level::Info, "scheduler", body));
        assert!(line.ends_with(&cyan(body)));
    }

    #[test]
    fn ordinary_info_is_unmarked() {
        let sink = ConsoleSink::with_writer(Capture::default(), true);
        let line = sink.render(&Event::new(Level::Info, "scheduler", "hello"));
        assert!(!line.contains('\x1b'));
        assert!(line.ends_with("[scheduler] INFO: hello"));
    }

    #[test]
    fn coloring_can_be_disabled() {
        let sink = ConsoleSink::with_writer(Capture::default(), false);
        let line = sink.render(&Event::new(Level::Error, "x", "boom"));
        assert!(!line.contains('\x1b'));
    }
}
