//! Domain error types
//!
//! These are the structural failures that end a debate. Individual provider
//! call failures are not errors here; they are recorded as
//! [`crate::debate::outcome::ResponseOutcome`] values inside a round.

use thiserror::Error;

use crate::core::identity::ProviderId;
use crate::debate::round::Round;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DebateError {
    /// Fewer than two usable identities after panel resolution. Raised
    /// before any provider is called.
    #[error(
        "insufficient panel: {usable} of {requested} requested identities usable, need at least 2{}",
        fmt_unavailable(.unavailable)
    )]
    InsufficientPanel {
        requested: usize,
        usable: usize,
        unavailable: Vec<ProviderId>,
    },

    /// A round finished with fewer than two successful responses, so the
    /// debate cannot continue. Carries the finished round for diagnostics.
    #[error(
        "round {} collapsed: only {} of {} participants responded",
        .round.number(),
        .round.success_count(),
        .round.participants().len()
    )]
    RoundCollapsed { round: Round },

    /// The preferred synthesizer identity is not available. There is no
    /// fallback to a different identity.
    #[error("synthesizer '{preferred}' is not available")]
    NoSynthesizerAvailable { preferred: ProviderId },
}

fn fmt_unavailable(ids: &[ProviderId]) -> String {
    if ids.is_empty() {
        String::new()
    } else {
        let names: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
        format!(" (unavailable: {})", names.join(", "))
    }
}
