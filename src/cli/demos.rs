//! Reference scenarios run by the `birbs` binary

use crate::cli::commands::{CounterCommand, PipelineCommand};
use crate::core::{
    config::ManagerConfig, BirbOptions, Context, DispatchOutcome, Payload, Pipeline, Procedure,
    Work,
};
use crate::execution::EventManager;
use anyhow::{Context as _, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Configuration used when no `--config` file is given
pub const DEFAULT_CONFIG: &str = r#"
defaults:
  lifetime: SINGLE
contexts:
  - identifier: main
procedures:
  counter:
    lifetime: DURABLE
  mutation:
    lifetime: SINGLE
  hello:
    lifetime: DURABLE
    group: greeters
  goodbye:
    lifetime: DURABLE
    group: greeters
  meh:
    lifetime: DURABLE
    group: greeters
"#;

/// What a demo did, ready for printing
#[derive(Debug, Clone)]
pub struct DemoReport {
    pub title: String,
    pub lines: Vec<String>,
    pub outcomes: Vec<DispatchOutcome>,
}

impl DemoReport {
    fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            lines: Vec::new(),
            outcomes: Vec::new(),
        }
    }
}

/// Load the manager configuration, falling back to [`DEFAULT_CONFIG`]
pub fn load_config(path: Option<&std::path::Path>) -> Result<ManagerConfig> {
    match path {
        Some(path) => ManagerConfig::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None => ManagerConfig::from_yaml(DEFAULT_CONFIG).context("Invalid built-in config"),
    }
}

fn first_context(config: &ManagerConfig) -> Result<String> {
    config
        .contexts
        .first()
        .map(|c| c.identifier.clone())
        .context("Config must declare at least one context")
}

/// Appends its counter to the text, then advances by the payload (default 1)
struct Counter {
    next: AtomicU64,
}

#[async_trait]
impl Work<String> for Counter {
    async fn run(&self, context: &Context<String>, payload: Option<Payload>) -> Result<()> {
        let step = payload.and_then(|p| p.as_u64()).unwrap_or(1);
        let current = self.next.fetch_add(step, Ordering::SeqCst);
        context.with_state(|text| text.push_str(&current.to_string()));
        Ok(())
    }
}

pub async fn run_counter(config: &ManagerConfig, cmd: &CounterCommand) -> Result<DemoReport> {
    let target = first_context(config)?;
    let manager = EventManager::from_config(config, |_| "text ".to_string());
    let counter = Procedure::new(
        "counter",
        config.options_for("counter"),
        Counter {
            next: AtomicU64::new(1),
        },
    );
    manager.add_procedure(counter, &target)?;

    let mut report = DemoReport::new("counter");
    for round in 0..cmd.times {
        let payload = if round == 0 { cmd.step.map(Payload::from) } else { None };
        manager.broadcast("counter", Some(&target), payload);
        report.outcomes.extend(manager.settle().await);

        let text = manager
            .context(&target)
            .map(|c| c.snapshot())
            .unwrap_or_default();
        report.lines.push(format!("after trigger {}: {:?}", round + 1, text));
    }

    Ok(report)
}

fn add(name: &str, amount: f64) -> Procedure<f64> {
    Procedure::from_fn(name, BirbOptions::single(), move |ctx: Context<f64>, _payload| async move {
        ctx.with_state(|value| *value += amount);
        Ok(())
    })
}

fn divide(delay: Duration, fail: bool) -> Procedure<f64> {
    Procedure::from_fn("divide", BirbOptions::single(), move |ctx: Context<f64>, _payload| async move {
        ctx.with_state(|value| *value /= 2.0);
        tokio::time::sleep(delay).await;
        if fail {
            anyhow::bail!("divide step refused to continue");
        }
        Ok(())
    })
}

pub async fn run_pipeline(config: &ManagerConfig, cmd: &PipelineCommand) -> Result<DemoReport> {
    let context = Context::new(first_context(config)?, 10.0_f64);
    let events = Arc::new(Mutex::new(Vec::new()));
    let finished = Arc::clone(&events);
    let failed = Arc::clone(&events);

    let pipeline = Pipeline::new("mutation", config.options_for("mutation"))
        .on_finish(move |ctx: &Context<f64>| {
            if let Ok(mut events) = finished.lock() {
                events.push(format!("on_finish saw {}", ctx.snapshot()));
            }
        })
        .on_fail(move |err| {
            if let Ok(mut events) = failed.lock() {
                events.push(format!("on_fail: {}", err));
            }
        })
        .add_step(add("add", 8.0))
        .add_step(divide(Duration::from_millis(cmd.delay_ms), cmd.fail))
        .add_step(add("micro_add", 0.000888));

    context.sign(pipeline);

    let mut report = DemoReport::new("pipeline");
    // Steps are not signed on the context, so these are no-ops.
    context.trigger("add", None).trigger("divide", None);
    report
        .lines
        .push(format!("after triggering bare steps: {}", context.snapshot()));

    context.trigger("mutation", None);
    report.outcomes = context.settle().await;

    if let Ok(events) = events.lock() {
        report.lines.extend(events.iter().cloned());
    }
    report.lines.push(format!("final value: {}", context.snapshot()));
    Ok(report)
}

fn greet(name: &str, options: BirbOptions, word: &'static str) -> Procedure<String> {
    Procedure::from_fn(name, options, move |ctx: Context<String>, _payload| async move {
        ctx.with_state(|text| *text = format!("{} {}", word, text));
        Ok(())
    })
}

pub async fn run_group(config: &ManagerConfig) -> Result<DemoReport> {
    let context = Context::new(first_context(config)?, "i am a test text".to_string());
    context
        .sign(greet("hello", config.options_for("hello"), "Hello!"))
        .sign(greet("goodbye", config.options_for("goodbye"), "Goodbye!"))
        .sign(greet("meh", config.options_for("meh"), "Meh!"));

    let mut report = DemoReport::new("group");
    report
        .lines
        .push(format!("signed: {}", context.signed_names().join(", ")));

    context
        .trigger("hello", None)
        .trigger("goodbye", None)
        .trigger("hello", None)
        .trigger("meh", None);
    report.outcomes = context.settle().await;

    report.lines.push(format!("text: {:?}", context.snapshot()));
    report
        .lines
        .push(format!("still signed: {}", context.signed_names().len()));
    Ok(report)
}
