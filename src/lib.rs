//! birbs - in-process event dispatch over contexts, procedures and pipelines

pub mod cli;
pub mod core;
pub mod execution;

// Re-export commonly used types
pub use core::{
    BirbError, BirbOptions, Birbable, Context, DispatchOutcome, DispatchStatus, Executable, Group,
    Lifetime, Payload, Pipeline, Procedure, Work,
};
pub use execution::EventManager;
