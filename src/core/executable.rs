//! Unit-of-work capability shared by procedures and pipelines

use crate::core::{
    context::Context,
    error::BirbError,
    options::{BirbOptions, Group, Lifetime},
    pipeline::Pipeline,
    procedure::Procedure,
};
use async_trait::async_trait;

/// Optional data handed to a unit of work when it is triggered
pub type Payload = serde_json::Value;

/// A name-identified, lifetime-tagged unit of work that runs against a context
#[async_trait]
pub trait Executable<S>: Send + Sync {
    /// Registration key on a context
    fn name(&self) -> &str;

    fn options(&self) -> &BirbOptions;

    fn lifetime(&self) -> Lifetime {
        self.options().lifetime
    }

    fn group(&self) -> Option<&Group> {
        self.options().group.as_ref()
    }

    fn belongs_to_group(&self) -> bool {
        self.group().is_some()
    }

    /// Run the work. Durable units must tolerate being called repeatedly.
    async fn execute(&self, context: &Context<S>, payload: Option<Payload>) -> Result<(), BirbError>;
}

/// Anything that can be signed on a context
pub enum Birbable<S> {
    Procedure(Procedure<S>),
    Pipeline(Pipeline<S>),
}

impl<S> Clone for Birbable<S> {
    fn clone(&self) -> Self {
        match self {
            Birbable::Procedure(procedure) => Birbable::Procedure(procedure.clone()),
            Birbable::Pipeline(pipeline) => Birbable::Pipeline(pipeline.clone()),
        }
    }
}

impl<S> std::fmt::Debug for Birbable<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Birbable::Procedure(procedure) => procedure.fmt(f),
            Birbable::Pipeline(pipeline) => pipeline.fmt(f),
        }
    }
}

#[async_trait]
impl<S: Send + 'static> Executable<S> for Birbable<S> {
    fn name(&self) -> &str {
        match self {
            Birbable::Procedure(procedure) => procedure.name(),
            Birbable::Pipeline(pipeline) => pipeline.name(),
        }
    }

    fn options(&self) -> &BirbOptions {
        match self {
            Birbable::Procedure(procedure) => procedure.options(),
            Birbable::Pipeline(pipeline) => pipeline.options(),
        }
    }

    async fn execute(&self, context: &Context<S>, payload: Option<Payload>) -> Result<(), BirbError> {
        match self {
            Birbable::Procedure(procedure) => procedure.execute(context, payload).await,
            Birbable::Pipeline(pipeline) => pipeline.execute(context, payload).await,
        }
    }
}

impl<S> From<Procedure<S>> for Birbable<S> {
    fn from(procedure: Procedure<S>) -> Self {
        Birbable::Procedure(procedure)
    }
}

impl<S> From<Pipeline<S>> for Birbable<S> {
    fn from(pipeline: Pipeline<S>) -> Self {
        Birbable::Pipeline(pipeline)
    }
}
