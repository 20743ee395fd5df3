//! Analyze command: read a trace log and print the report.
//!
//! Human-readable output mirrors a terminal table; `--json` emits the full
//! analysis, including every matched interval.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::Serialize;
use ta_core::{Analysis, Analyzer, AnalyzerConfig, CompletedInterval};

/// Path that selects standard input.
const STDIN_PATH: &str = "-";

/// JSON document for `--json`.
#[derive(Debug, Serialize)]
struct JsonOutput<'a> {
    source: &'a str,
    entry_pattern: &'a str,
    exit_pattern: &'a str,
    #[serde(flatten)]
    analysis: &'a Analysis,
}

/// Runs the analysis over `source` and writes the report to `writer`.
pub fn run<W: Write>(
    writer: &mut W,
    source: &Path,
    settings: &AnalyzerConfig,
    json: bool,
) -> Result<()> {
    let name = source.display().to_string();
    let analysis = if source.as_os_str() == STDIN_PATH {
        analyze_reader(std::io::stdin().lock(), settings, "stdin")?
    } else {
        let file = File::open(source).with_context(|| format!("failed to open {name}"))?;
        analyze_reader(BufReader::new(file), settings, &name)?
    };

    if json {
        let output = JsonOutput {
            source: &name,
            entry_pattern: settings.entry_pattern(),
            exit_pattern: settings.exit_pattern(),
            analysis: &analysis,
        };
        serde_json::to_writer_pretty(&mut *writer, &output)?;
        writeln!(writer)?;
    } else {
        write_report(writer, &name, settings, &analysis)?;
    }

    Ok(())
}

/// Feeds every line of `reader` through a fresh analyzer.
pub fn analyze_reader<R: BufRead>(
    reader: R,
    settings: &AnalyzerConfig,
    name: &str,
) -> Result<Analysis> {
    let mut analyzer = Analyzer::new(settings);
    for line in reader.lines() {
        let line = line.with_context(|| format!("failed to read {name}"))?;
        analyzer
            .feed_line(&line)
            .with_context(|| format!("failed to analyze {name}"))?;
    }
    Ok(analyzer.finish())
}

/// Writes the human-readable report.
pub fn write_report<W: Write>(
    writer: &mut W,
    name: &str,
    settings: &AnalyzerConfig,
    analysis: &Analysis,
) -> Result<()> {
    let report = &analysis.report;
    let threshold = report.threshold_seconds;

    writeln!(writer, "Analyzing trace file: {name}")?;
    writeln!(writer, "Looking for entry pattern: '{}'", settings.entry_pattern())?;
    writeln!(writer, "Looking for exit pattern: '{}'", settings.exit_pattern())?;
    writeln!(writer, "Threshold: {threshold:?} seconds")?;
    writeln!(writer, "{}", "-".repeat(80))?;

    writeln!(writer)?;
    writeln!(writer, "Analysis Results:")?;
    writeln!(writer, "Total matched entry/exit pairs: {}", report.total_pairs)?;

    writeln!(writer)?;
    if report.slow.is_empty() {
        writeln!(writer, "No operations found exceeding {threshold:?} seconds threshold.")?;
    } else {
        let rule = "-".repeat(120);
        writeln!(writer, "Operations exceeding {threshold:?} seconds threshold:")?;
        writeln!(writer, "{rule}")?;
        writeln!(
            writer,
            "{}",
            table_row("Thread ID", "Method", "Duration (s)", "Entry Time", "Exit Time")
        )?;
        writeln!(writer, "{rule}")?;
        for interval in &report.slow {
            writeln!(writer, "{}", interval_row(interval))?;
        }
    }

    if report.unmatched_count > 0 {
        writeln!(writer)?;
        writeln!(
            writer,
            "Warning: {} unmatched entry points found (no corresponding exits)",
            report.unmatched_count
        )?;
    }

    if let Some(stats) = &report.stats {
        writeln!(writer)?;
        writeln!(writer, "Timing Statistics:")?;
        writeln!(writer, "  Minimum duration: {:.3} seconds", stats.min_seconds)?;
        writeln!(writer, "  Maximum duration: {:.3} seconds", stats.max_seconds)?;
        writeln!(writer, "  Average duration: {:.3} seconds", stats.mean_seconds)?;
    }

    Ok(())
}

fn interval_row(interval: &CompletedInterval) -> String {
    table_row(
        interval.thread_id(),
        interval.method_name(),
        &format!("{:.3}", interval.duration_seconds),
        &time_of_day(interval.entry.timestamp),
        &time_of_day(interval.exit.timestamp),
    )
}

fn table_row(thread: &str, method: &str, duration: &str, entry: &str, exit: &str) -> String {
    format!("{thread:<10} {method:<30} {duration:<12} {entry:<25} {exit}")
        .trim_end()
        .to_string()
}

/// `HH:MM:SS.mmm`
fn time_of_day(ts: NaiveDateTime) -> String {
    ts.format("%H:%M:%S%.3f").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use ta_core::analyze_lines;

    const LOG: &[&str] = &[
        "[1/1/25, 10:00:00:000 UTC] T1 id=a com.example.Service > doRequest ENTRY",
        "[1/1/25, 10:00:01:000 UTC] T2 id=b com.example.Service > doRequest ENTRY",
        "unrelated startup noise",
        "[1/1/25, 10:00:03:500 UTC] T1 id=a com.example.Service < doRequest RETURN",
        "[1/1/25, 10:00:06:250 UTC] T2 id=b com.example.Service < doRequest RETURN",
        "[1/1/25, 10:00:07:000 UTC] T3 id=c com.example.Service > doRequest ENTRY",
        "[1/1/25, 10:00:08:000 UTC] T4 id=d com.example.Service > doRequest ENTRY",
        "[1/1/25, 10:00:08:125 UTC] T4 id=d com.example.Service < doRequest RETURN",
    ];

    fn settings(threshold: f64) -> AnalyzerConfig {
        AnalyzerConfig::new("doRequest ENTRY", "doRequest RETURN", threshold).unwrap()
    }

    fn render(threshold: f64) -> String {
        let settings = settings(threshold);
        let analysis = analyze_lines(LOG, &settings).unwrap();
        let mut output = Vec::new();
        write_report(&mut output, "trace.log", &settings, &analysis).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_report_lists_slow_operations_slowest_first() {
        assert_snapshot!(render(3.0), @r"
        Analyzing trace file: trace.log
        Looking for entry pattern: 'doRequest ENTRY'
        Looking for exit pattern: 'doRequest RETURN'
        Threshold: 3.0 seconds
        --------------------------------------------------------------------------------

        Analysis Results:
        Total matched entry/exit pairs: 3

        Operations exceeding 3.0 seconds threshold:
        ------------------------------------------------------------------------------------------------------------------------
        Thread ID  Method                         Duration (s) Entry Time                Exit Time
        ------------------------------------------------------------------------------------------------------------------------
        T2         doRequest                      5.250        10:00:01.000              10:00:06.250
        T1         doRequest                      3.500        10:00:00.000              10:00:03.500

        Warning: 1 unmatched entry points found (no corresponding exits)

        Timing Statistics:
          Minimum duration: 0.125 seconds
          Maximum duration: 5.250 seconds
          Average duration: 2.958 seconds
        ");
    }

    #[test]
    fn test_report_without_slow_operations() {
        assert_snapshot!(render(10.0), @r"
        Analyzing trace file: trace.log
        Looking for entry pattern: 'doRequest ENTRY'
        Looking for exit pattern: 'doRequest RETURN'
        Threshold: 10.0 seconds
        --------------------------------------------------------------------------------

        Analysis Results:
        Total matched entry/exit pairs: 3

        No operations found exceeding 10.0 seconds threshold.

        Warning: 1 unmatched entry points found (no corresponding exits)

        Timing Statistics:
          Minimum duration: 0.125 seconds
          Maximum duration: 5.250 seconds
          Average duration: 2.958 seconds
        ");
    }

    #[test]
    fn test_empty_log_has_no_statistics() {
        let settings = settings(1.0);
        let analysis = analyze_lines(Vec::<String>::new(), &settings).unwrap();
        let mut output = Vec::new();
        write_report(&mut output, "empty.log", &settings, &analysis).unwrap();
        let output = String::from_utf8(output).unwrap();

        assert!(output.contains("Total matched entry/exit pairs: 0"));
        assert!(!output.contains("Timing Statistics"));
        assert!(!output.contains("Warning"));
    }

    #[test]
    fn test_analyze_reader_reports_failing_line() {
        let input = "[1/1/25, 10:00:00:000 UTC] T1 id=a x.y > doRequest ENTRY\n\
                     [13/1/25, 10:00:00:000 UTC] T1 id=a x.y < doRequest RETURN\n";
        let err = analyze_reader(input.as_bytes(), &settings(1.0), "bad.log").unwrap_err();
        let message = format!("{err:#}");
        assert!(message.starts_with("failed to analyze bad.log: line 2: timestamp"));
    }

    #[test]
    fn test_run_writes_json() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("trace.log");
        std::fs::write(&path, LOG.join("\n")).unwrap();

        let mut output = Vec::new();
        run(&mut output, &path, &settings(3.0), true).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&output).unwrap();

        assert_eq!(json["entry_pattern"], "doRequest ENTRY");
        assert_eq!(json["report"]["total_pairs"], 3);
        assert_eq!(json["report"]["unmatched_count"], 1);
        assert_eq!(json["report"]["slow"][0]["entry"]["thread_id"], "T2");
        assert_eq!(json["intervals"].as_array().unwrap().len(), 3);
        assert_eq!(json["intervals"][0]["exit"]["kind"], "exit");
        assert_eq!(json["lines_read"], 8);
        assert_eq!(json["events_parsed"], 7);
    }

    #[test]
    fn test_run_fails_on_missing_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("missing.log");
        let err = run(&mut Vec::new(), &path, &settings(1.0), false).unwrap_err();
        assert!(err.to_string().starts_with("failed to open"));
    }
}
