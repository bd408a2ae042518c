//! Panel resolution: deciding which identities debate

use serde::{Deserialize, Serialize};

use crate::catalog::IdentityCatalog;
use crate::core::error::DebateError;
use crate::core::identity::ProviderId;

/// How the caller asked for the panel to be formed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelSelection {
    /// The configured default panel
    Default(Vec<ProviderId>),
    /// Every identity in the catalog
    FullRoster,
    /// An explicit list, kept in the caller's order
    Explicit(Vec<ProviderId>),
}

/// Which selection mode produced a panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelMode {
    Default,
    Full,
    Custom,
}

impl PanelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PanelMode::Default => "default",
            PanelMode::Full => "full",
            PanelMode::Custom => "custom",
        }
    }
}

impl std::fmt::Display for PanelMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A resolved debate panel (Value Object)
///
/// Holds at least two available identities; resolution fails otherwise.
/// A debate needs opposition, so a panel of one is never formed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Panel {
    members: Vec<ProviderId>,
    mode: PanelMode,
}

impl Panel {
    /// Resolve a selection against the catalog.
    ///
    /// Requested identities without availability are dropped, and the error
    /// names them when fewer than two remain. Duplicates in an explicit
    /// list are collapsed to their first occurrence.
    pub fn resolve(
        selection: &PanelSelection,
        catalog: &IdentityCatalog,
    ) -> Result<Panel, DebateError> {
        let (requested, mode) = match selection {
            PanelSelection::Default(ids) => (dedupe(ids), PanelMode::Default),
            PanelSelection::FullRoster => (catalog.roster().collect(), PanelMode::Full),
            PanelSelection::Explicit(ids) => (dedupe(ids), PanelMode::Custom),
        };

        let members: Vec<ProviderId> = requested
            .iter()
            .copied()
            .filter(|id| catalog.is_available(*id))
            .collect();

        if members.len() < 2 {
            let unavailable = requested
                .iter()
                .copied()
                .filter(|id| !catalog.is_available(*id))
                .collect();
            return Err(DebateError::InsufficientPanel {
                requested: requested.len(),
                usable: members.len(),
                unavailable,
            });
        }

        Ok(Panel { members, mode })
    }

    /// Panel members in dispatch order.
    pub fn members(&self) -> &[ProviderId] {
        &self.members
    }

    pub fn mode(&self) -> PanelMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, id: ProviderId) -> bool {
        self.members.contains(&id)
    }
}

fn dedupe(ids: &[ProviderId]) -> Vec<ProviderId> {
    let mut out: Vec<ProviderId> = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(id) {
            out.push(*id);
        }
    }
    out
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
            CatalogEntry::available(ProviderId::DeepSeek, ""),
        ])
    }

    #[test]
    fn test_default_panel_filters_unavailable() {
        let selection = PanelSelection::Default(vec![
            ProviderId::Claude,
            ProviderId::Grok,
            ProviderId::DeepSeek,
        ]);
        let panel = Panel::resolve(&selection, &catalog()).unwrap();
        assert_eq!(panel.members(), &[ProviderId::Claude, ProviderId::DeepSeek]);
        assert_eq!(panel.mode(), PanelMode::Default);
    }

    #[test]
    fn test_full_roster_takes_every_available() {
        let panel = Panel::resolve(&PanelSelection::FullRoster, &catalog()).unwrap();
        assert_eq!(
            panel.members(),
            &[
                ProviderId::Gemini,
                ProviderId::OpenAi,
                ProviderId::Claude,
                ProviderId::DeepSeek,
            ]
        );
        assert_eq!(panel.mode(), PanelMode::Full);
    }

    #[test]
    fn test_explicit_panel_keeps_caller_order() {
        let selection = PanelSelection::Explicit(vec![
            ProviderId::DeepSeek,
            ProviderId::Gemini,
            ProviderId::DeepSeek,
        ]);
        let panel = Panel::resolve(&selection, &catalog()).unwrap();
        assert_eq!(panel.members(), &[ProviderId::DeepSeek, ProviderId::Gemini]);
        assert_eq!(panel.mode(), PanelMode::Custom);
    }

    #[test]
    fn test_explicit_panel_too_small_names_unavailable() {
        let selection = PanelSelection::Explicit(vec![ProviderId::Claude, ProviderId::Grok]);
        let error = Panel::resolve(&selection, &catalog()).unwrap_err();
        match error {
            DebateError::InsufficientPanel {
                requested,
                usable,
                unavailable,
            } => {
                assert_eq!(requested, 2);
                assert_eq!(usable, 1);
                assert_eq!(unavailable, vec![ProviderId::Grok]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_single_identity_is_never_a_panel() {
        let selection = PanelSelection::Explicit(vec![ProviderId::Claude]);
        assert!(Panel::resolve(&selection, &catalog()).is_err());
    }
}
