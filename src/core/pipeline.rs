//! Pipeline - ordered composite of units of work

use crate::core::{
    context::Context,
    error::BirbError,
    executable::{Birbable, Executable, Payload},
    options::BirbOptions,
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Called with the context once every step has succeeded
pub type FinishHandler<S> = Arc<dyn Fn(&Context<S>) + Send + Sync>;

/// Called with the error the failing step returned; recovering it ends the run early
pub type FailHandler = Arc<dyn Fn(&BirbError) + Send + Sync>;

/// A unit of work that runs its steps one after another against one context
pub struct Pipeline<S> {
    name: String,
    options: BirbOptions,

    /// Steps in execution order, unique by name
    steps: Vec<Birbable<S>>,

    on_finish: Option<FinishHandler<S>>,
    on_fail: Option<FailHandler>,
}

impl<S: Send + 'static> Pipeline<S> {
    pub fn new(name: impl Into<String>, options: BirbOptions) -> Self {
        Self {
            name: name.into(),
            options,
            steps: Vec::new(),
            on_finish: None,
            on_fail: None,
        }
    }

    /// Set the callback invoked after the last step completes
    pub fn on_finish<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Context<S>) + Send + Sync + 'static,
    {
        self.on_finish = Some(Arc::new(handler));
        self
    }

    /// Set the callback that recovers step failures
    ///
    /// Without one, a failing step fails the pipeline itself.
    pub fn on_fail<F>(mut self, handler: F) -> Self
    where
        F: Fn(&BirbError) + Send + Sync + 'static,
    {
        self.on_fail = Some(Arc::new(handler));
        self
    }

    /// Append a step. A step with an existing name replaces it in place.
    pub fn add_step(mut self, step: impl Into<Birbable<S>>) -> Self {
        let step = step.into();
        match self.steps.iter().position(|s| s.name() == step.name()) {
            Some(idx) => self.steps[idx] = step,
            None => self.steps.push(step),
        }
        self
    }

    /// Get a step by name
    pub fn step(&self, name: &str) -> Option<&Birbable<S>> {
        self.steps.iter().find(|s| s.name() == name)
    }

    pub fn steps(&self) -> &[Birbable<S>] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl<S> Clone for Pipeline<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            options: self.options.clone(),
            steps: self.steps.clone(),
            on_finish: self.on_finish.clone(),
            on_fail: self.on_fail.clone(),
        }
    }
}

impl<S> std::fmt::Debug for Pipeline<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("name", &self.name)
            .field("options", &self.options)
            .field("steps", &self.steps)
            .field("on_finish", &self.on_finish.is_some())
            .field("on_fail", &self.on_fail.is_some())
            .finish()
    }
}

#[async_trait]
impl<S: Send + 'static> Executable<S> for Pipeline<S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn options(&self) -> &BirbOptions {
        &self.options
    }

    /// Steps receive no payload; only the pipeline itself is handed one.
    async fn execute(&self, context: &Context<S>, _payload: Option<Payload>) -> Result<(), BirbError> {
        info!(
            "Starting pipeline '{}' ({} steps) on context '{}'",
            self.name,
            self.steps.len(),
            context.identifier()
        );

        for step in &self.steps {
            debug!("Pipeline '{}' running step '{}'", self.name, step.name());

            if let Err(error) = step.execute(context, None).await {
                return match &self.on_fail {
                    Some(handler) => {
                        warn!(
                            "Pipeline '{}' step '{}' failed, handled by on_fail: {}",
                            self.name,
                            step.name(),
                            error
                        );
                        handler(&error);
                        Ok(())
                    }
                    None => Err(BirbError::StepFailed {
                        pipeline: self.name.clone(),
                        step: step.name().to_string(),
                        source: Box::new(error),
                    }),
                };
            }
        }

        info!("Pipeline '{}' finished", self.name);
        if let Some(handler) = &self.on_finish {
            handler(context);
        }

        Ok(())
    }
}
