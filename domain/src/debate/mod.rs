//! Debate orchestration domain
//!
//! The rules of a council debate: how the panel is formed, how rounds are
//! recorded, how critique is anonymized, and how the synthesizer is chosen.

pub mod ballot;
pub mod outcome;
pub mod panel;
pub mod round;
pub mod synthesizer;
pub mod transcript;
