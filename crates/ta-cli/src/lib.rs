//! Trace analyzer CLI library.
//!
//! This crate provides the CLI interface for the trace analyzer.

mod cli;
pub mod commands;
mod config;

pub use cli::Cli;
pub use config::Config;
