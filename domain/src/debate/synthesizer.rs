//! Synthesizer selection

use serde::{Deserialize, Serialize};

use crate::catalog::IdentityCatalog;
use crate::core::error::DebateError;
use crate::core::identity::ProviderId;

/// The chosen synthesizer and whether it also debated (Value Object)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesizerChoice {
    pub id: ProviderId,
    /// True when the synthesizer is a member of the final panel. A
    /// participant synthesizer judges a debate it argued in; the flag makes
    /// that visible downstream instead of blocking it.
    pub participant: bool,
}

/// Pick the synthesizer for a finished debate.
///
/// The preferred identity is taken as long as it is available. There is no
/// substitution: an unavailable preference is an error, not a reason to
/// silently hand the verdict to someone else.
pub fn select_synthesizer(
    preferred: ProviderId,
    final_panel: &[ProviderId],
    catalog: &IdentityCatalog,
) -> Result<SynthesizerChoice, DebateError> {
    if !catalog.is_available(preferred) {
        return Err(DebateError::NoSynthesizerAvailable { preferred });
    }
    Ok(SynthesizerChoice {
        id: preferred,
        participant: final_panel.contains(&preferred),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogEntry;

    fn catalog() -> IdentityCatalog {
        IdentityCatalog::new(vec![
            CatalogEntry::available(ProviderId::Gemini, ""),
            CatalogEntry::available(ProviderId::OpenAi, ""),
            CatalogEntry::available(ProviderId::Claude, ""),
            CatalogEntry::unavailable(ProviderId::Grok),
        ])
    }

    #[test]
    fn test_outside_synthesizer_is_not_participant() {
        let final_panel = vec![ProviderId::Gemini, ProviderId::Claude];
        let choice = select_synthesizer(ProviderId::OpenAi, &final_panel, &catalog()).unwrap();
        assert_eq!(choice.id, ProviderId::OpenAi);
        assert!(!choice.participant);
    }

    #[test]
    fn test_panel_member_is_flagged_participant() {
        let final_panel = vec![ProviderId::Gemini, ProviderId::Claude];
        let choice = select_synthesizer(ProviderId::Claude, &final_panel, &catalog()).unwrap();
        assert_eq!(choice.id, ProviderId::Claude);
        assert!(choice.participant);
    }

    #[test]
    fn test_unavailable_preference_is_an_error_not_a_swap() {
        let final_panel = vec![ProviderId::Gemini, ProviderId::Claude];
        let error = select_synthesizer(ProviderId::Grok, &final_panel, &catalog()).unwrap_err();
        match error {
            DebateError::NoSynthesizerAvailable { preferred } => {
                assert_eq!(preferred, ProviderId::Grok);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
