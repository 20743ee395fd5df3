//! Turn raw log lines into [`TraceEvent`]s.
//!
//! Lines look like:
//!
//! ```text
//! [9/12/25, 13:25:29:271 CDT] 0000004f id=00000000 com.example.Service > doRequest ENTRY
//! 17|[9/12/25, 13:25:32:902 CDT] 0000004f id=00000000 com.example.Service < doRequest RETURN
//! ```
//!
//! An optional `<digits>|` line-number prefix is dropped first. Anything that
//! does not have this shape, or that contains neither pattern, is not a trace
//! line and yields `Ok(None)`. A line with the right shape but a bad timestamp
//! is an error.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::AnalyzerConfig;
use crate::event::{EventKind, TraceEvent};
use crate::timestamp::{TimestampFormatError, parse_timestamp};

/// `[timestamp] thread id=word dotted.path >|< free text`
static TRACE_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[([^\]]+)\]\s+(\w+)\s+id=\w+\s+[\w.]+\s+[><]\s+(.+)").unwrap()
});

/// Method name used when a pattern has no tokens.
const UNKNOWN_METHOD: &str = "unknown";

/// Classifies lines against a pair of entry/exit patterns.
#[derive(Debug, Clone)]
pub struct LineParser {
    entry_pattern: String,
    exit_pattern: String,
    entry_method: String,
    exit_method: String,
}

impl LineParser {
    pub fn new(entry_pattern: impl Into<String>, exit_pattern: impl Into<String>) -> Self {
        let entry_pattern = entry_pattern.into();
        let exit_pattern = exit_pattern.into();
        Self {
            entry_method: method_name_from_pattern(&entry_pattern).to_string(),
            exit_method: method_name_from_pattern(&exit_pattern).to_string(),
            entry_pattern,
            exit_pattern,
        }
    }

    pub fn from_config(config: &AnalyzerConfig) -> Self {
        Self::new(config.entry_pattern(), config.exit_pattern())
    }

    /// Parses one line.
    ///
    /// The entry pattern is checked before the exit pattern, so a line
    /// containing both is an entry.
    pub fn parse(&self, line: &str) -> Result<Option<TraceEvent>, TimestampFormatError> {
        let line = strip_line_number(line.trim());
        if line.is_empty() {
            return Ok(None);
        }

        let Some(caps) = TRACE_LINE_RE.captures(line) else {
            return Ok(None);
        };
        let (Some(timestamp), Some(thread_id), Some(rest)) = (caps.get(1), caps.get(2), caps.get(3))
        else {
            return Ok(None);
        };
        let rest = rest.as_str();

        if rest.split_whitespace().nth(1).is_none() {
            return Ok(None);
        }

        let (kind, method_name) = if rest.contains(&self.entry_pattern) {
            (EventKind::Entry, &self.entry_method)
        } else if rest.contains(&self.exit_pattern) {
            (EventKind::Exit, &self.exit_method)
        } else {
            return Ok(None);
        };

        let timestamp = parse_timestamp(timestamp.as_str())?;

        Ok(Some(TraceEvent {
            timestamp,
            thread_id: thread_id.as_str().to_string(),
            method_name: method_name.clone(),
            kind,
            raw_line: line.to_string(),
        }))
    }
}

/// Drops a leading `<digits>|` prefix, if present.
fn strip_line_number(line: &str) -> &str {
    match line.split_once('|') {
        Some((prefix, rest))
            if !prefix.is_empty() && prefix.bytes().all(|b| b.is_ascii_digit()) =>
        {
            rest
        }
        _ => line,
    }
}

/// First whitespace-delimited token of a pattern (`"doRequest ENTRY"` -> `"doRequest"`).
///
/// The name comes from the configured pattern, not the log line, so every
/// line matching a pattern reports the same method.
pub fn method_name_from_pattern(pattern: &str) -> &str {
    pattern.split_whitespace().next().unwrap_or(UNKNOWN_METHOD)
}
