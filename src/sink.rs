// SPDX-License-Identifier: MIT OR Apache-2.0
use crate::Level;
use crate::error::SinkError;
use crate::event::Event;
use std::fmt::Debug;

pub trait Sink: Debug + Send + Sync {
    /**
    Renders, filters and delivers one event.

    Returning `Ok` covers both "written" and "intentionally dropped": a sink that
    filters the event out, or has no task to attribute it to, is not failing.
    */
    fn deliver(&self, event: &Event) -> Result<(), SinkError>;

    /**
    The level of events built by [`Router::emit`](crate::Router::emit) for this sink.

    Most sinks take [`Level::Info`]; a sink that only handles errors raises it so that
    emitting to it by name still passes its gate.
    */
    fn emit_level(&self) -> Level {
        Level::Info
    }

    /**
    The process may imminently exit.  Push out anything buffered.
    */
    fn flush(&self) {}
}

/*
Boilerplate notes.

# Sink

Clone makes no sense for something that owns a file handle; sinks are shared through Arc instead.
PartialEq/Eq/Hash: identity vs configuration equality is ambiguous, skip.
Default: most sinks need a path or a collaborator, so no.
Send/Sync: required, the router delivers from whichever thread logs.
*/
