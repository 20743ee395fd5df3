//! Threshold filtering and summary statistics over completed intervals.

use serde::Serialize;

use crate::event::CompletedInterval;

/// Min/max/mean of `duration_seconds` across every completed interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DurationStats {
    pub min_seconds: f64,
    pub max_seconds: f64,
    pub mean_seconds: f64,
}

/// Summary of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub threshold_seconds: f64,
    pub total_pairs: usize,
    /// Intervals at or above the threshold, slowest first. Ties keep observation order.
    pub slow: Vec<CompletedInterval>,
    /// `None` when nothing completed.
    pub stats: Option<DurationStats>,
    pub unmatched_count: usize,
}

/// Builds a [`Report`]. Pure: no I/O, no mutation of the input.
pub fn aggregate(
    intervals: &[CompletedInterval],
    threshold_seconds: f64,
    unmatched_count: usize,
) -> Report {
    let mut slow: Vec<CompletedInterval> = intervals
        .iter()
        .filter(|i| i.duration_seconds >= threshold_seconds)
        .cloned()
        .collect();
    // stable
    slow.sort_by(|a, b| b.duration_seconds.total_cmp(&a.duration_seconds));

    Report {
        threshold_seconds,
        total_pairs: intervals.len(),
        slow,
        stats: duration_stats(intervals),
        unmatched_count,
    }
}

#[allow(clippy::cast_precision_loss)]
fn duration_stats(intervals: &[CompletedInterval]) -> Option<DurationStats> {
    let first = intervals.first()?.duration_seconds;

    let (min, max, sum) = intervals.iter().map(|i| i.duration_seconds).fold(
        (first, first, 0.0),
        |(min, max, sum), d| (min.min(d), max.max(d), sum + d),
    );

    Some(DurationStats {
        min_seconds: min,
        max_seconds: max,
        mean_seconds: sum / intervals.len() as f64,
    })
}
