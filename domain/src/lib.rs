//! Domain layer for ai-council
//!
//! This crate contains the debate entities, value objects, and rules.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Council Debate
//!
//! A debate runs a fixed number of rounds over a panel of provider
//! identities:
//!
//! - **Round one**: every panel member proposes an answer to the question
//! - **Critique rounds**: members review the previous round's proposals,
//!   anonymized behind shuffled ballot labels so arguments are judged
//!   without attribution
//! - **Synthesis**: one identity reads the full transcript, identities
//!   revealed, and delivers the council's verdict
//!
//! ## Elimination
//!
//! An identity that fails in a round sits out the rest of the debate. The
//! moment fewer than two voices remain, the debate collapses; a council of
//! one is not a debate.

pub mod catalog;
pub mod core;
pub mod debate;
pub mod prompt;

// Re-export commonly used types
pub use catalog::{CatalogEntry, IdentityCatalog};
pub use core::{
    error::DebateError,
    identity::{ProviderId, UnknownProvider},
    question::{Question, QuestionSource},
};
pub use debate::{
    ballot::{BallotEntry, BlindBallot},
    outcome::{FailureCategory, ResponseOutcome},
    panel::{Panel, PanelMode, PanelSelection},
    round::Round,
    synthesizer::{SynthesizerChoice, select_synthesizer},
    transcript::{DebateReport, DebateTranscript, SynthesisVerdict},
};
pub use prompt::PromptTemplate;
