//! Scenario-based tests for birbs

mod helpers;

mod fan_out;
mod groups;
