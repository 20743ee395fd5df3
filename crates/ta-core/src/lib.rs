//! Core logic for the trace log analyzer.
//!
//! This crate contains:
//! - Line parsing: recognizing entry/exit trace lines and their timestamps
//! - Interval matching: pairing entries with exits per thread and method
//! - Reporting: threshold filtering and duration statistics

mod analyze;
mod config;
pub mod event;
pub mod matcher;
pub mod parse;
pub mod report;
pub mod timestamp;

pub use analyze::{AnalyzeError, Analysis, Analyzer, analyze_lines};
pub use config::{AnalyzerConfig, ValidationError};
pub use event::{CompletedInterval, EventKind, TraceEvent};
pub use matcher::{IntervalMatcher, MatchOutcome};
pub use parse::LineParser;
pub use report::{DurationStats, Report, aggregate};
pub use timestamp::{TimestampFormatError, parse_timestamp};
