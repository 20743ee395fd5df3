//! Entry/exit correlation.
//!
//! Open entries are keyed by `(thread_id, method_name)`. There is no call
//! stack: a second entry for the same key replaces the first, which is then
//! never matched. An exit with no open entry is dropped.

use std::collections::{BTreeMap, HashMap};

use crate::event::{CompletedInterval, EventKind, TraceEvent};
use crate::timestamp::seconds_between;

/// Stateful matcher fed one event at a time, in input order.
#[derive(Debug, Default)]
pub struct IntervalMatcher {
    /// thread id -> method name -> most recent unmatched entry
    open: HashMap<String, HashMap<String, TraceEvent>>,
    completed: Vec<CompletedInterval>,
}

/// What [`IntervalMatcher::finalize`] hands back.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    /// Completed intervals in the order their exits were observed.
    pub intervals: Vec<CompletedInterval>,
    /// Entries still open at end of input, across all threads and methods.
    pub unmatched_count: usize,
}

impl IntervalMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, event: TraceEvent) {
        match event.kind {
            EventKind::Entry => self.open_entry(event),
            EventKind::Exit => self.close_entry(event),
        }
    }

    fn open_entry(&mut self, entry: TraceEvent) {
        let methods = self.open.entry(entry.thread_id.clone()).or_default();
        if let Some(replaced) = methods.insert(entry.method_name.clone(), entry) {
            tracing::trace!(
                thread = %replaced.thread_id,
                method = %replaced.method_name,
                "open entry replaced before its exit"
            );
        }
    }

    fn close_entry(&mut self, exit: TraceEvent) {
        let Some(methods) = self.open.get_mut(&exit.thread_id) else {
            tracing::trace!(thread = %exit.thread_id, method = %exit.method_name, "exit without entry");
            return;
        };
        let Some(entry) = methods.remove(&exit.method_name) else {
            tracing::trace!(thread = %exit.thread_id, method = %exit.method_name, "exit without entry");
            return;
        };
        if methods.is_empty() {
            self.open.remove(&exit.thread_id);
        }

        let duration_seconds = seconds_between(entry.timestamp, exit.timestamp);
        self.completed.push(CompletedInterval {
            entry,
            exit,
            duration_seconds,
        });
    }

    /// Number of entries currently waiting for an exit.
    pub fn open_count(&self) -> usize {
        self.open.values().map(HashMap::len).sum()
    }

    /// Open entries per thread, ordered by thread id.
    pub fn unmatched_by_thread(&self) -> BTreeMap<&str, usize> {
        self.open
            .iter()
            .map(|(thread, methods)| (thread.as_str(), methods.len()))
            .collect()
    }

    pub fn finalize(self) -> MatchOutcome {
        let unmatched_count = self.open_count();
        MatchOutcome {
            intervals: self.completed,
            unmatched_count,
        }
    }
}
