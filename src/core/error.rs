//! Error types for dispatch operations

use thiserror::Error;

/// Errors produced while executing or routing units of work
#[derive(Debug, Error)]
pub enum BirbError {
    /// A procedure body returned an error
    #[error("procedure '{name}' failed: {source}")]
    Procedure {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    /// A pipeline step failed and halted the remaining steps
    #[error("pipeline '{pipeline}' failed at step '{step}': {source}")]
    StepFailed {
        pipeline: String,
        step: String,
        #[source]
        source: Box<BirbError>,
    },

    /// The event manager has no context with this identifier
    #[error("context not found: {0}")]
    ContextNotFound(String),
}

impl BirbError {
    /// The innermost error, following nested step failures
    pub fn root_cause(&self) -> &BirbError {
        match self {
            BirbError::StepFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
