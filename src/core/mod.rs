//! Core domain models for birbs
//!
//! This module defines contexts, the units of work that can be signed on
//! them, and their options and configuration.

pub mod config;
pub mod context;
pub mod error;
pub mod executable;
pub mod options;
pub mod pipeline;
pub mod procedure;
pub mod state;

pub use context::*;
pub use error::*;
pub use executable::*;
pub use options::*;
pub use pipeline::*;
pub use procedure::*;
pub use state::*;
