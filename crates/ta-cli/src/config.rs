//! Configuration loading and management.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use ta_core::AnalyzerConfig;

use crate::Cli;

/// Keys whose environment values are taken verbatim instead of being parsed
/// as numbers or booleans (`TA_ENTRY_PATTERN=404` is still a pattern).
const PATTERN_KEYS: &[&str] = &["entry_pattern", "exit_pattern"];

/// Application configuration.
///
/// Every field may be left unset in files; command-line flags fill the gaps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Substring marking an operation's entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_pattern: Option<String>,

    /// Substring marking an operation's exit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_pattern: Option<String>,

    /// Minimum duration, in seconds, for an operation to be reported as slow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold_seconds: Option<f64>,
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (TA_*)
        let env = Env::prefixed("TA_");
        figment = figment.merge(env.clone().ignore(PATTERN_KEYS));
        for (key, value) in env.only(PATTERN_KEYS).iter() {
            figment = figment.merge(Serialized::default(key.as_str(), value));
        }

        figment.extract()
    }

    /// Applies command-line overrides and validates the result.
    pub fn resolve(self, cli: &Cli) -> Result<AnalyzerConfig> {
        let entry_pattern = cli
            .entry_pattern
            .clone()
            .or(self.entry_pattern)
            .context("no entry pattern: pass --entry or set entry_pattern in the config")?;
        let exit_pattern = cli
            .exit_pattern
            .clone()
            .or(self.exit_pattern)
            .context("no exit pattern: pass --exit or set exit_pattern in the config")?;
        let threshold_seconds = cli
            .threshold_seconds
            .or(self.threshold_seconds)
            .context("no threshold: pass --threshold or set threshold_seconds in the config")?;

        AnalyzerConfig::new(entry_pattern, exit_pattern, threshold_seconds)
            .context("invalid analysis settings")
    }
}

/// Returns the platform-specific config directory for ta.
///
/// On Linux: `~/.config/ta`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("ta"))
}
