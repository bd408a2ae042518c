//! Debate round entity

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::identity::ProviderId;
use crate::debate::ballot::BlindBallot;
use crate::debate::outcome::ResponseOutcome;

/// One completed debate round (Entity)
///
/// Records an outcome for every dispatched participant, keyed by identity.
/// Round one collects proposals; later rounds carry the ballot their
/// critique prompts were built from. The ballot is diagnostic state and is
/// left out of serialized transcripts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    number: u32,
    participants: Vec<ProviderId>,
    outcomes: BTreeMap<ProviderId, ResponseOutcome>,
    #[serde(skip)]
    ballot: Option<BlindBallot>,
}

impl Round {
    /// Assemble a completed round.
    ///
    /// Every participant must have an outcome, success or failure.
    pub fn new(
        number: u32,
        participants: Vec<ProviderId>,
        outcomes: BTreeMap<ProviderId, ResponseOutcome>,
        ballot: Option<BlindBallot>,
    ) -> Self {
        debug_assert!(
            participants.iter().all(|id| outcomes.contains_key(id)),
            "every participant needs an outcome"
        );
        debug_assert_eq!(participants.len(), outcomes.len());
        Self {
            number,
            participants,
            outcomes,
            ballot,
        }
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    /// Identities dispatched in this round, in panel order.
    pub fn participants(&self) -> &[ProviderId] {
        &self.participants
    }

    pub fn outcomes(&self) -> &BTreeMap<ProviderId, ResponseOutcome> {
        &self.outcomes
    }

    pub fn outcome(&self, id: ProviderId) -> Option<&ResponseOutcome> {
        self.outcomes.get(&id)
    }

    /// The ballot this round's critique prompts were built from, if any.
    pub fn ballot(&self) -> Option<&BlindBallot> {
        self.ballot.as_ref()
    }

    pub fn success_count(&self) -> usize {
        self.outcomes.values().filter(|o| o.is_success()).count()
    }

    /// Participants that responded successfully, in panel order.
    ///
    /// These are the only identities dispatched in the next round.
    pub fn survivors(&self) -> Vec<ProviderId> {
        self.participants
            .iter()
            .copied()
            .filter(|id| {
                self.outcomes
                    .get(id)
                    .is_some_and(ResponseOutcome::is_success)
            })
            .collect()
    }

    /// Successful responses in panel order, as ballot material.
    pub fn proposals(&self) -> Vec<(ProviderId, String)> {
        self.participants
            .iter()
            .filter_map(|id| {
                self.outcomes
                    .get(id)
                    .and_then(ResponseOutcome::text)
                    .map(|text| (*id, text.to_string()))
            })
            .collect()
    }
}
