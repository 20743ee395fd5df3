//! Command-line argument definitions.

use std::path::PathBuf;

use clap::Parser;

/// Trace log analyzer.
///
/// Matches entry and exit lines per thread and reports operations whose
/// duration meets or exceeds a threshold.
#[derive(Debug, Parser)]
#[command(name = "ta", version, about, long_about = None)]
#[command(after_long_help = r#"EXAMPLES:
  # Report doRequest calls taking 3 seconds or more
  ta trace.log --entry "doRequest ENTRY" --exit "doRequest RETURN" --threshold 3

  # Match any entry/return pair, reading from stdin
  cat trace.log | ta - --entry "ENTRY" --exit "RETURN" --threshold 1.5
"#)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the trace log file (`-` reads stdin).
    pub logfile: PathBuf,

    /// Entry pattern to search for (e.g., "doRequest ENTRY").
    #[arg(long = "entry")]
    pub entry_pattern: Option<String>,

    /// Exit pattern to search for (e.g., "doRequest RETURN").
    #[arg(long = "exit")]
    pub exit_pattern: Option<String>,

    /// Time threshold in seconds to report slow operations.
    #[arg(long = "threshold")]
    pub threshold_seconds: Option<f64>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}
