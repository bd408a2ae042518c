//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod health_check;
pub mod run_debate;
