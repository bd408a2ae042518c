//! Builds the identity catalog from config and the credential environment

use crate::config::FileConfig;
use crate::providers::read_credential;
use council_domain::{CatalogEntry, IdentityCatalog, ProviderId};
use tracing::debug;

/// Snapshot the roster for one run.
///
/// Credentials are read once here. A key exported or revoked later does
/// not change the catalog; mid-run breakage shows up as failed outcomes.
pub fn build_catalog(config: &FileConfig) -> IdentityCatalog {
    let entries = ProviderId::ALL
        .into_iter()
        .map(|id| {
            let credentialed = read_credential(&config.providers.get(id).api_key_env).is_some();
            if !credentialed {
                debug!("{} has no credentials, marked unavailable", id);
            }
            entry_for(config, id, credentialed)
        })
        .collect();
    IdentityCatalog::new(entries)
}

/// Restrict a catalog to identities that passed their health probe.
///
/// Entries keep their roster position and persona; only availability
/// changes.
pub fn restrict_catalog(catalog: &IdentityCatalog, healthy: &[ProviderId]) -> IdentityCatalog {
    let entries = catalog
        .entries()
        .iter()
        .map(|entry| {
            if entry.available && healthy.contains(&entry.id) {
                entry.clone()
            } else {
                CatalogEntry::unavailable(entry.id)
            }
        })
        .collect();
    IdentityCatalog::new(entries)
}

fn entry_for(config: &FileConfig, id: ProviderId, credentialed: bool) -> CatalogEntry {
    if credentialed {
        CatalogEntry::available(id, config.persona_for(id))
    } else {
        CatalogEntry::unavailable(id)
    }
}
