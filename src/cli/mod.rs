//! Command-line interface

pub mod commands;
pub mod demos;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{CounterCommand, PipelineCommand};
use std::ffi::OsString;
use std::path::PathBuf;

/// Runs the reference dispatch scenarios
#[derive(Debug, Parser, Clone)]
#[command(name = "birbs")]
#[command(version = "0.1.0")]
#[command(about = "In-process event dispatch demos", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a manager configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available demos
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Durable counter appending to a text context
    Counter(CounterCommand),

    /// Numeric pipeline with a suspending step
    Pipeline(PipelineCommand),

    /// Mutually exclusive group of greeters
    Group,

    /// Run every demo in turn
    All,
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}
