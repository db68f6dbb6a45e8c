//! CLI command definitions

use clap::Args;

/// Trigger the durable counter demo
#[derive(Debug, Args, Clone)]
pub struct CounterCommand {
    /// Number of times to broadcast the counter
    #[arg(short, long, default_value_t = 2)]
    pub times: usize,

    /// Payload sent with the first broadcast (counter increment)
    #[arg(long)]
    pub step: Option<u64>,
}

/// Trigger the numeric pipeline demo
#[derive(Debug, Args, Clone)]
pub struct PipelineCommand {
    /// Suspension of the divide step, in milliseconds
    #[arg(long, default_value_t = 50)]
    pub delay_ms: u64,

    /// Make the divide step fail to exercise on_fail
    #[arg(long)]
    pub fail: bool,
}
