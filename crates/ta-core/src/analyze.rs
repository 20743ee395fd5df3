//! Line-to-report pipeline.

use serde::Serialize;
use thiserror::Error;

use crate::config::AnalyzerConfig;
use crate::event::CompletedInterval;
use crate::matcher::IntervalMatcher;
use crate::parse::LineParser;
use crate::report::{Report, aggregate};
use crate::timestamp::TimestampFormatError;

/// Errors that abort an analysis run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnalyzeError {
    /// A line shaped like a trace line carried an unparseable timestamp.
    #[error("line {line}: {source}")]
    Timestamp {
        line: usize,
        #[source]
        source: TimestampFormatError,
    },
}

/// Everything produced by one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub report: Report,
    /// All completed intervals in observation order.
    pub intervals: Vec<CompletedInterval>,
    pub lines_read: usize,
    pub events_parsed: usize,
}

/// Feeds lines through the parser and matcher, one at a time.
///
/// Lines must be supplied in file order. Call [`Analyzer::finish`] once the
/// input is exhausted.
#[derive(Debug)]
pub struct Analyzer {
    parser: LineParser,
    matcher: IntervalMatcher,
    threshold_seconds: f64,
    lines_read: usize,
    events_parsed: usize,
}

impl Analyzer {
    pub fn new(config: &AnalyzerConfig) -> Self {
        Self {
            parser: LineParser::from_config(config),
            matcher: IntervalMatcher::new(),
            threshold_seconds: config.threshold_seconds(),
            lines_read: 0,
            events_parsed: 0,
        }
    }

    pub fn feed_line(&mut self, line: &str) -> Result<(), AnalyzeError> {
        self.lines_read += 1;

        let event = self
            .parser
            .parse(line)
            .map_err(|source| AnalyzeError::Timestamp {
                line: self.lines_read,
                source,
            })?;

        match event {
            Some(event) => {
                self.events_parsed += 1;
                self.matcher.observe(event);
            }
            None => tracing::trace!(line = self.lines_read, "not a trace line"),
        }
        Ok(())
    }

    pub fn finish(self) -> Analysis {
        for (thread, count) in self.matcher.unmatched_by_thread() {
            tracing::debug!(thread, count, "unmatched entries");
        }

        let outcome = self.matcher.finalize();
        let report = aggregate(
            &outcome.intervals,
            self.threshold_seconds,
            outcome.unmatched_count,
        );

        tracing::debug!(
            lines = self.lines_read,
            events = self.events_parsed,
            pairs = report.total_pairs,
            slow = report.slow.len(),
            unmatched = report.unmatched_count,
            "analysis finished"
        );

        Analysis {
            report,
            intervals: outcome.intervals,
            lines_read: self.lines_read,
            events_parsed: self.events_parsed,
        }
    }
}

/// Runs a whole input through a fresh [`Analyzer`].
pub fn analyze_lines<I, S>(lines: I, config: &AnalyzerConfig) -> Result<Analysis, AnalyzeError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut analyzer = Analyzer::new(config);
    for line in lines {
        analyzer.feed_line(line.as_ref())?;
    }
    Ok(analyzer.finish())
}
