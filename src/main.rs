use anyhow::{Context, Result};
use birbs::cli::commands::{CounterCommand, PipelineCommand};
use birbs::cli::demos::{self, DemoReport};
use birbs::cli::output::{format_report, style, CROSS, INFO};
use birbs::cli::{Cli, Command};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    let config = demos::load_config(cli.config.as_deref())?;
    println!(
        "{} Loaded {} context(s)",
        INFO,
        style(config.contexts.len()).bold()
    );

    let reports = match &cli.command {
        Command::Counter(cmd) => vec![demos::run_counter(&config, cmd).await?],
        Command::Pipeline(cmd) => vec![demos::run_pipeline(&config, cmd).await?],
        Command::Group => vec![demos::run_group(&config).await?],
        Command::All => run_all(&config).await?,
    };

    let mut failures = 0;
    for report in &reports {
        println!("\n{}", format_report(report));
        failures += report.outcomes.iter().filter(|o| !o.is_success()).count();
    }

    if failures > 0 {
        println!("{} {} dispatch(es) failed", CROSS, style(failures).red());
        std::process::exit(1);
    }

    Ok(())
}

async fn run_all(config: &birbs::core::config::ManagerConfig) -> Result<Vec<DemoReport>> {
    let counter = CounterCommand { times: 2, step: None };
    let pipeline = PipelineCommand {
        delay_ms: 50,
        fail: false,
    };

    Ok(vec![
        demos::run_counter(config, &counter).await?,
        demos::run_pipeline(config, &pipeline).await?,
        demos::run_group(config).await?,
    ])
}
