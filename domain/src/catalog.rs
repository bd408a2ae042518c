//! Identity catalog: the configured roster, personas, and availability

use serde::{Deserialize, Serialize};

use crate::core::identity::ProviderId;

/// One configured identity (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: ProviderId,
    /// Debate stance injected into this identity's prompts; empty means none
    pub persona: String,
    /// Whether credentials for this identity were present at startup
    pub available: bool,
}

impl CatalogEntry {
    /// An identity with working credentials.
    pub fn available(id: ProviderId, persona: impl Into<String>) -> Self {
        Self {
            id,
            persona: persona.into(),
            available: true,
        }
    }

    /// An identity that cannot be called in this run.
    pub fn unavailable(id: ProviderId) -> Self {
        Self {
            id,
            persona: String::new(),
            available: false,
        }
    }
}

/// The configured roster for a run (Value Object)
///
/// Built once at startup from config and the credential environment, then
/// passed around immutably. Availability never changes mid-debate; a
/// provider that breaks after startup surfaces as failed outcomes, not as a
/// catalog change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityCatalog {
    entries: Vec<CatalogEntry>,
}

impl IdentityCatalog {
    /// Build a catalog. On duplicate identities the first entry wins.
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        let mut deduped: Vec<CatalogEntry> = Vec::with_capacity(entries.len());
        for entry in entries {
            if !deduped.iter().any(|e| e.id == entry.id) {
                deduped.push(entry);
            }
        }
        Self { entries: deduped }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Every configured identity, available or not, in roster order.
    pub fn roster(&self) -> impl Iterator<Item = ProviderId> + '_ {
        self.entries.iter().map(|e| e.id)
    }

    /// Identities that can be called in this run, in roster order.
    pub fn available(&self) -> Vec<ProviderId> {
        self.entries
            .iter()
            .filter(|e| e.available)
            .map(|e| e.id)
            .collect()
    }

    pub fn is_available(&self, id: ProviderId) -> bool {
        self.entries.iter().any(|e| e.id == id && e.available)
    }

    /// Persona for an identity. Empty when the identity is unknown or has
    /// no persona configured; callers skip injection on empty.
    pub fn persona(&self, id: ProviderId) -> &str {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.persona.as_str())
            .unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> IdentityCatalog {
        IdentityCatalog::new(vec![
            CatalogEntry::available(ProviderId::Gemini, "the integrator"),
            CatalogEntry::available(ProviderId::Claude, ""),
            CatalogEntry::unavailable(ProviderId::Grok),
        ])
    }

    #[test]
    fn test_roster_keeps_order() {
        let ids: Vec<ProviderId> = catalog().roster().collect();
        assert_eq!(
            ids,
            vec![ProviderId::Gemini, ProviderId::Claude, ProviderId::Grok]
        );
    }

    #[test]
    fn test_available_filters_roster() {
        assert_eq!(
            catalog().available(),
            vec![ProviderId::Gemini, ProviderId::Claude]
        );
        assert!(!catalog().is_available(ProviderId::Grok));
        assert!(!catalog().is_available(ProviderId::DeepSeek));
    }

    #[test]
    fn test_persona_falls_back_to_empty() {
        let catalog = catalog();
        assert_eq!(catalog.persona(ProviderId::Gemini), "the integrator");
        assert_eq!(catalog.persona(ProviderId::Claude), "");
        assert_eq!(catalog.persona(ProviderId::DeepSeek), "");
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let catalog = IdentityCatalog::new(vec![
            CatalogEntry::available(ProviderId::Claude, "first"),
            CatalogEntry::available(ProviderId::Claude, "second"),
        ]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.persona(ProviderId::Claude), "first");
    }
}
