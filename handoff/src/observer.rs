//!
//! Progress reporting for the producer and consumer roles
//!
//! Every role reports what it is doing as a stream of `Event`s. The stream is
//! purely for observability: the handoff slot never calls an observer, so
//! nothing here runs inside the slot's critical sections (except in the
//! lock-held discipline, where the consumer's whole processing step is
//! inside the lock by construction).
//!

use std::fmt;
use std::io::{self, Write};
use std::sync::Mutex;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Producer,
    Consumer,
}

impl Role {
    /// Short tag used as the line prefix
    pub fn tag(self) -> &'static str {
        match self {
            Role::Producer => "prod",
            Role::Consumer => "cons",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Producer => write!(f, "producer"),
            Role::Consumer => write!(f, "consumer"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// An iteration begins
    Start,
    /// One unit step of simulated work finished
    Working { step: u32, total: u32 },
    /// The producer placed an item in the slot
    Handed { seq: u64 },
    /// The consumer removed an item from the slot
    Received { seq: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub role: Role,
    pub iteration: usize,
    pub kind: EventKind,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = self.role.tag();
        let i = self.iteration;
        match self.kind {
            EventKind::Start => write!(f, "{tag}({i}): start"),
            EventKind::Working { step, total } => {
                write!(f, "\t{tag}({i}): working {step} / {total}")
            }
            EventKind::Handed { seq } => write!(f, "\t{tag}({i}): handed item {seq}"),
            EventKind::Received { seq } => write!(f, "\t{tag}({i}): received item {seq}"),
        }
    }
}

pub trait Observer: Send + Sync {
    fn on_event(&self, event: &Event);
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl Observer for NullObserver {
    fn on_event(&self, _event: &Event) {}
}

/// Writes one line per event to the wrapped writer
pub struct LineObserver<W: Write + Send> {
    out: Mutex<W>,
}

impl<W: Write + Send> LineObserver<W> {
    pub fn new(out: W) -> Self {
        Self { out: Mutex::new(out) }
    }

    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl LineObserver<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> Observer for LineObserver<W> {
    fn on_event(&self, event: &Event) {
        let mut out = self
            .out
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        // A broken progress stream must not stop the handoff.
        let _ = writeln!(out, "{event}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_lines() {
        let observer = LineObserver::new(Vec::new());
        let events = [
            Event {
                role: Role::Producer,
                iteration: 0,
                kind: EventKind::Start,
            },
            Event {
                role: Role::Producer,
                iteration: 0,
                kind: EventKind::Working { step: 1, total: 3 },
            },
            Event {
                role: Role::Producer,
                iteration: 0,
                kind: EventKind::Handed { seq: 0 },
            },
            Event {
                role: Role::Consumer,
                iteration: 0,
                kind: EventKind::Received { seq: 0 },
            },
        ];
        for e in &events {
            observer.on_event(e);
        }

        let text = String::from_utf8(observer.into_inner()).unwrap();
        assert_eq!(
            text,
            "prod(0): start\n\tprod(0): working 1 / 3\n\tprod(0): handed item 0\n\tcons(0): received item 0\n"
        );
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::Producer.to_string(), "producer");
        assert_eq!(Role::Consumer.tag(), "cons");
    }
}
