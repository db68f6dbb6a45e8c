//! Test utility functions for birbs

use birbs::{BirbOptions, Context, DispatchOutcome, Payload, Procedure, Work};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Text context used by most scenarios
pub fn text_context(identifier: &str, text: &str) -> Context<String> {
    Context::new(identifier, text.to_string())
}

/// Procedure that prepends `word` to the context text
pub fn prepend(name: &str, options: BirbOptions, word: &'static str) -> Procedure<String> {
    Procedure::from_fn(name, options, move |ctx: Context<String>, _payload| async move {
        ctx.with_state(|text| *text = format!("{} {}", word, text));
        Ok(())
    })
}

/// Work body that counts how many times it ran
pub struct CountingWork {
    pub runs: Arc<AtomicUsize>,
}

#[async_trait]
impl Work<String> for CountingWork {
    async fn run(&self, _context: &Context<String>, _payload: Option<Payload>) -> anyhow::Result<()> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Procedure plus a shared handle to its run count
pub fn counting(name: &str, options: BirbOptions) -> (Procedure<String>, Arc<AtomicUsize>) {
    let runs = Arc::new(AtomicUsize::new(0));
    let procedure = Procedure::new(
        name,
        options,
        CountingWork {
            runs: Arc::clone(&runs),
        },
    );
    (procedure, runs)
}

/// Appends its own counter to the text and advances it by the payload (default 1)
pub struct TextCounter {
    pub next: AtomicU64,
}

impl TextCounter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for TextCounter {
    fn default() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }
}

#[async_trait]
impl Work<String> for TextCounter {
    async fn run(&self, context: &Context<String>, payload: Option<Payload>) -> anyhow::Result<()> {
        let step = payload.and_then(|p| p.as_u64()).unwrap_or(1);
        let current = self.next.fetch_add(step, Ordering::SeqCst);
        context.with_state(|text| text.push_str(&current.to_string()));
        Ok(())
    }
}

/// Procedure on a numeric context that applies `op` after an optional suspension
pub fn numeric<F>(name: &str, delay: Option<Duration>, op: F) -> Procedure<f64>
where
    F: Fn(f64) -> f64 + Send + Sync + Copy + 'static,
{
    Procedure::from_fn(name, BirbOptions::single(), move |ctx: Context<f64>, _payload| async move {
        ctx.with_state(|value| *value = op(*value));
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(())
    })
}

/// Assert every collected dispatch completed
pub fn assert_all_succeeded(outcomes: &[DispatchOutcome]) {
    for outcome in outcomes {
        assert!(
            outcome.is_success(),
            "dispatch '{}' on '{}' did not succeed: {:?}",
            outcome.name,
            outcome.context,
            outcome.status
        );
    }
}
