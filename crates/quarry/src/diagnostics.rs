//! Execution trace boundary.
//!
//! Core query logic never talks to an observability backend directly.
//! All instrumentation flows through `TraceEvent` and `TraceSink`; the
//! default sink is a no-op, and tests install a buffering sink through
//! the thread-local override.
//!
//! Trace events are best-effort diagnostics: they identify queries by
//! fingerprint only and never carry query text or row data.

use crate::query::fingerprint::QueryFingerprint;
use std::{cell::RefCell, rc::Rc};

thread_local! {
    static SINK: RefCell<Option<Rc<dyn TraceSink>>> = const { RefCell::new(None) };
}

///
/// TraceEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TraceEvent {
    /// Emitted after translation, immediately before the row source
    /// is asked for a cursor.
    ExecuteStart { fingerprint: QueryFingerprint },

    /// Emitted when a result stream is drained to exhaustion.
    ExecuteFinish {
        fingerprint: QueryFingerprint,
        rows: u64,
    },
}

///
/// TraceSink
///
/// Receiver for trace events. Sinks use interior mutability; events
/// arrive on the thread that executes the query.
///

pub trait TraceSink {
    fn record(&self, event: TraceEvent);
}

/// Install a sink for the current thread.
pub fn set_sink(sink: Rc<dyn TraceSink>) {
    SINK.with(|slot| *slot.borrow_mut() = Some(sink));
}

/// Remove the current thread's sink.
pub fn clear_sink() {
    SINK.with(|slot| *slot.borrow_mut() = None);
}

pub(crate) fn emit(event: TraceEvent) {
    SINK.with(|slot| {
        if let Some(sink) = slot.borrow().as_ref() {
            sink.record(event);
        }
    });
}
