//! Procedure - the leaf unit of work

use crate::core::{
    context::Context,
    error::BirbError,
    executable::{Executable, Payload},
    options::BirbOptions,
};
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// User-supplied body of a procedure
///
/// State that must survive between durable triggers belongs in the
/// implementing type, not in the context.
#[async_trait]
pub trait Work<S>: Send + Sync {
    async fn run(&self, context: &Context<S>, payload: Option<Payload>) -> anyhow::Result<()>;
}

/// Adapter turning an async closure into a [`Work`] body
struct FnWork<F>(F);

#[async_trait]
impl<S, F, Fut> Work<S> for FnWork<F>
where
    S: Send + 'static,
    F: Fn(Context<S>, Option<Payload>) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    async fn run(&self, context: &Context<S>, payload: Option<Payload>) -> anyhow::Result<()> {
        (self.0)(context.clone(), payload).await
    }
}

/// A named unit of work wrapping a single body
pub struct Procedure<S> {
    name: String,
    options: BirbOptions,
    work: Arc<dyn Work<S>>,
}

impl<S: Send + 'static> Procedure<S> {
    pub fn new(name: impl Into<String>, options: BirbOptions, work: impl Work<S> + 'static) -> Self {
        Self {
            name: name.into(),
            options,
            work: Arc::new(work),
        }
    }

    /// Build a procedure from an async closure
    ///
    /// The closure receives an owned handle to the context, so the returned
    /// future may hold it across `.await` points.
    pub fn from_fn<F, Fut>(name: impl Into<String>, options: BirbOptions, f: F) -> Self
    where
        F: Fn(Context<S>, Option<Payload>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self::new(name, options, FnWork(f))
    }
}

// Clones share the same body, so body-owned counters are shared too.
impl<S> Clone for Procedure<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            options: self.options.clone(),
            work: Arc::clone(&self.work),
        }
    }
}

impl<S> std::fmt::Debug for Procedure<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Procedure")
            .field("name", &self.name)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<S: Send + 'static> Executable<S> for Procedure<S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn options(&self) -> &BirbOptions {
        &self.options
    }

    async fn execute(&self, context: &Context<S>, payload: Option<Payload>) -> Result<(), BirbError> {
        debug!("Running procedure '{}' on context '{}'", self.name, context.identifier());
        self.work
            .run(context, payload)
            .await
            .map_err(|source| BirbError::Procedure {
                name: self.name.clone(),
                source,
            })
    }
}
