//! Event manager - fans triggers out across named contexts

use crate::core::{
    config::ManagerConfig,
    context::Context,
    error::BirbError,
    executable::{Birbable, Payload},
    state::DispatchOutcome,
};
use tracing::{debug, info};

/// Holds contexts by identifier and forwards registrations and triggers to them
pub struct EventManager<S> {
    /// Contexts in insertion order, unique by identifier
    contexts: Vec<Context<S>>,
}

impl<S: Send + 'static> EventManager<S> {
    pub fn new() -> Self {
        Self {
            contexts: Vec::new(),
        }
    }

    /// Build a manager with one context per configured identifier
    pub fn from_config<F>(config: &ManagerConfig, mut state_factory: F) -> Self
    where
        F: FnMut(&str) -> S,
    {
        let mut manager = Self::new();
        for context_config in &config.contexts {
            let state = state_factory(&context_config.identifier);
            manager.add_context(Context::new(context_config.identifier.clone(), state));
        }
        manager
    }

    fn position(&self, identifier: &str) -> Option<usize> {
        self.contexts.iter().position(|c| c.identifier() == identifier)
    }

    /// Add a context, replacing any context with the same identifier
    pub fn add_context(&mut self, context: Context<S>) -> &mut Self {
        debug!("Adding context '{}'", context.identifier());
        match self.position(context.identifier()) {
            Some(idx) => self.contexts[idx] = context,
            None => self.contexts.push(context),
        }
        self
    }

    pub fn remove_context(&mut self, identifier: &str) -> &mut Self {
        if let Some(idx) = self.position(identifier) {
            self.contexts.remove(idx);
            debug!("Removed context '{}'", identifier);
        }
        self
    }

    /// Get a context by identifier
    pub fn context(&self, identifier: &str) -> Option<&Context<S>> {
        self.contexts.iter().find(|c| c.identifier() == identifier)
    }

    pub fn contexts(&self) -> &[Context<S>] {
        &self.contexts
    }

    fn require(&self, identifier: &str) -> Result<&Context<S>, BirbError> {
        self.context(identifier)
            .ok_or_else(|| BirbError::ContextNotFound(identifier.to_string()))
    }

    /// Sign a unit of work on the named context
    pub fn add_procedure(
        &self,
        unit: impl Into<Birbable<S>>,
        context: &str,
    ) -> Result<&Self, BirbError> {
        self.require(context)?.sign(unit);
        Ok(self)
    }

    /// Unsign a unit of work from the named context
    pub fn remove_birbable(&self, name: &str, context: &str) -> Result<&Self, BirbError> {
        self.require(context)?.unsign(name);
        Ok(self)
    }

    /// Trigger `name` on one context, or on every context
    ///
    /// When `context` is omitted or unknown the trigger goes to every context.
    pub fn broadcast(&self, name: &str, context: Option<&str>, payload: Option<Payload>) -> &Self {
        if let Some(target) = context.and_then(|identifier| self.context(identifier)) {
            debug!("Broadcasting '{}' to context '{}'", name, target.identifier());
            target.trigger(name, payload);
            return self;
        }

        info!("Broadcasting '{}' to {} contexts", name, self.contexts.len());
        for target in &self.contexts {
            target.trigger(name, payload.clone());
        }
        self
    }

    /// Settle every context and collect all outcomes
    pub async fn settle(&self) -> Vec<DispatchOutcome> {
        let mut outcomes = Vec::new();
        for context in &self.contexts {
            outcomes.extend(context.settle().await);
        }
        outcomes
    }
}

impl<S: Send + 'static> Default for EventManager<S> {
    fn default() -> Self {
        Self::new()
    }
}
