//! Debate transcript and final report

use std::collections::BTreeSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::identity::ProviderId;
use crate::core::question::Question;
use crate::debate::panel::Panel;
use crate::debate::round::Round;

/// The accumulated rounds of one debate (Entity)
///
/// `panel` is the resolved panel the debate started with; participation can
/// only shrink from there as rounds eliminate failed identities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateTranscript {
    question: Question,
    panel: Panel,
    rounds: Vec<Round>,
}

impl DebateTranscript {
    pub fn new(question: Question, panel: Panel) -> Self {
        Self {
            question,
            panel,
            rounds: Vec::new(),
        }
    }

    /// Append a completed round. Rounds are numbered from one and arrive in
    /// order.
    pub fn push_round(&mut self, round: Round) {
        debug_assert_eq!(round.number() as usize, self.rounds.len() + 1);
        self.rounds.push(round);
    }

    pub fn question(&self) -> &Question {
        &self.question
    }

    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn round_count(&self) -> usize {
        self.rounds.len()
    }

    pub fn last_round(&self) -> Option<&Round> {
        self.rounds.last()
    }

    /// The panel after elimination: identities that responded successfully
    /// in the last round. This is the panel the synthesizer is judged
    /// against.
    pub fn final_panel(&self) -> Vec<ProviderId> {
        self.last_round()
            .map(Round::survivors)
            .unwrap_or_default()
    }

    /// Identities that produced at least one successful response, in
    /// roster order.
    pub fn contributors(&self) -> Vec<ProviderId> {
        let mut seen = BTreeSet::new();
        for round in &self.rounds {
            for id in round.survivors() {
                seen.insert(id);
            }
        }
        seen.into_iter().collect()
    }
}

/// The synthesizer's verdict on a finished debate (Value Object)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisVerdict {
    pub synthesizer: ProviderId,
    /// True when the synthesizer also argued in the final panel
    pub synthesizer_is_participant: bool,
    /// Markdown with consensus, disagreements, decision, risks, action items
    pub text: String,
    pub latency: Duration,
}

/// Complete result of a debate: transcript plus verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateReport {
    pub transcript: DebateTranscript,
    pub verdict: SynthesisVerdict,
    pub total_duration: Duration,
}

impl DebateReport {
    /// Identities worth crediting in the report header.
    pub fn contributors(&self) -> Vec<ProviderId> {
        self.transcript.contributors()
    }
}
