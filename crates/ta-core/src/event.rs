//! Typed trace events and matched intervals.

use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

/// Whether a trace line marks the start or the end of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Entry,
    Exit,
}

impl EventKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Entry => "entry",
            Self::Exit => "exit",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One parsed trace line.
///
/// An event only exists once its timestamp has parsed successfully.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceEvent {
    /// When the line was logged (naive, zone discarded).
    pub timestamp: NaiveDateTime,
    /// Opaque thread identifier used as a grouping key.
    pub thread_id: String,
    /// Operation name, taken from the first token of the matching pattern.
    pub method_name: String,
    pub kind: EventKind,
    /// The line as parsed, after trimming and line-number removal.
    #[serde(skip)]
    pub raw_line: String,
}

/// An entry matched with the exit that closed it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletedInterval {
    pub entry: TraceEvent,
    pub exit: TraceEvent,
    /// `exit.timestamp - entry.timestamp`. Negative when the log is out of order.
    pub duration_seconds: f64,
}

impl CompletedInterval {
    pub fn thread_id(&self) -> &str {
        &self.entry.thread_id
    }

    pub fn method_name(&self) -> &str {
        &self.entry.method_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn event(kind: EventKind, second: u32) -> TraceEvent {
        TraceEvent {
            timestamp: NaiveDate::from_ymd_opt(2025, 1, 1)
                .unwrap()
                .and_hms_opt(10, 0, second)
                .unwrap(),
            thread_id: "T1".to_string(),
            method_name: "doRequest".to_string(),
            kind,
            raw_line: String::new(),
        }
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&EventKind::Entry).unwrap(), "\"entry\"");
        assert_eq!(EventKind::Exit.to_string(), "exit");
    }

    #[test]
    fn test_raw_line_is_not_serialized() {
        let mut e = event(EventKind::Entry, 0);
        e.raw_line = "[1/1/25, 10:00:00:000 UTC] T1 ...".to_string();
        let json = serde_json::to_value(&e).unwrap();
        assert!(json.get("raw_line").is_none());
        assert_eq!(json["thread_id"], "T1");
    }

    #[test]
    fn test_interval_accessors_use_entry() {
        let interval = CompletedInterval {
            entry: event(EventKind::Entry, 1),
            exit: event(EventKind::Exit, 4),
            duration_seconds: 3.0,
        };
        assert_eq!(interval.thread_id(), "T1");
        assert_eq!(interval.method_name(), "doRequest");
    }
}
