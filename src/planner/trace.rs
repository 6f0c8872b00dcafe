//! Structured tracing of rule invocations.
//!
//! Rules never log through a global; callers pass a [`Tracer`] into every
//! entry point. [`LogTracer`] forwards to the `log` facade, which the binary
//! wires to `env_logger`.

use crate::planner::rule::Decline;
use crate::planner::shape::RuleShape;
use crate::search::Rename;
use parking_lot::Mutex;
use std::fmt;

/// One observable step of a rule invocation
#[derive(Debug, Clone, Copy)]
pub enum TraceEvent<'a> {
    Attempt {
        rule: &'a str,
    },
    Matched {
        rule: &'a str,
        shape: RuleShape,
    },
    FieldNames {
        names: &'a [String],
    },
    /// Bottom projection output that is not a plain field reference
    ComputedField {
        position: usize,
        name: &'a str,
    },
    FilterRendered {
        text: &'a str,
    },
    Renames {
        renames: &'a [Rename],
    },
    Declined {
        rule: &'a str,
        reason: &'a Decline,
    },
    Fired {
        rule: &'a str,
        search: &'a str,
        fields: &'a [String],
    },
}

impl TraceEvent<'_> {
    /// Whether this event deserves a warning rather than a debug line
    pub fn is_warning(&self) -> bool {
        matches!(self, TraceEvent::ComputedField { .. })
    }
}

impl fmt::Display for TraceEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceEvent::Attempt { rule } => write!(f, "{}", rule),
            TraceEvent::Matched { rule, shape } => write!(f, "{}: matched {}", rule, shape),
            TraceEvent::FieldNames { names } => write!(f, "fieldNames: [{}]", names.join(", ")),
            TraceEvent::ComputedField { position, name } => write!(
                f,
                "projection output {} ({}) is computed; pushing its declared field",
                position, name
            ),
            TraceEvent::FilterRendered { text } => write!(f, "filter: {}", text),
            TraceEvent::Renames { renames } => {
                let list = renames
                    .iter()
                    .map(|r| r.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "renames: [{}]", list)
            }
            TraceEvent::Declined { rule, reason } => write!(f, "{}: declined ({})", rule, reason),
            TraceEvent::Fired {
                rule,
                search,
                fields,
            } => write!(
                f,
                "{}: search=[{}] fieldNames: [{}]",
                rule,
                search,
                fields.join(", ")
            ),
        }
    }
}

/// Sink for trace events
pub trait Tracer: Send + Sync {
    fn trace(&self, event: &TraceEvent<'_>);
}

/// Forwards events to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTracer;

impl Tracer for LogTracer {
    fn trace(&self, event: &TraceEvent<'_>) {
        if event.is_warning() {
            log::warn!(target: "searchpush::pushdown", "{}", event);
        } else {
            log::debug!(target: "searchpush::pushdown", "{}", event);
        }
    }
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTracer;

impl Tracer for NoopTracer {
    fn trace(&self, _event: &TraceEvent<'_>) {}
}

/// Keeps rendered events in memory
#[derive(Debug, Default)]
pub struct MemoryTracer {
    lines: Mutex<Vec<String>>,
}

impl MemoryTracer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rendered events recorded so far, oldest first
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }
}

impl Tracer for MemoryTracer {
    fn trace(&self, event: &TraceEvent<'_>) {
        self.lines.lock().push(event.to_string());
    }
}
