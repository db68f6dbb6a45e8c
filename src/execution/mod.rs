//! Dispatch of triggered work

pub mod dispatcher;
pub mod manager;

pub use dispatcher::Dispatcher;
pub use manager::EventManager;
