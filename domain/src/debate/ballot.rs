//! Blind ballot for critique rounds
//!
//! Before a critique round, the previous round's successful proposals are
//! shuffled and labeled `A`, `B`, `C`, ... so that a label carries no
//! information about who wrote the proposal. The label-to-author mapping
//! stays inside the ballot and is never rendered into a prompt.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::core::identity::ProviderId;

/// One labeled proposal on a ballot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BallotEntry {
    label: char,
    author: ProviderId,
    text: String,
}

impl BallotEntry {
    pub fn label(&self) -> char {
        self.label
    }

    pub fn author(&self) -> ProviderId {
        self.author
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Anonymized label assignment for one critique round (Value Object)
///
/// Labels are contiguous starting at `A` and cover exactly the proposals the
/// ballot was cast over. A fresh ballot is cast per round, so labels from
/// different rounds are unrelated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlindBallot {
    entries: Vec<BallotEntry>,
}

impl BlindBallot {
    /// Shuffle the proposals and label them `A`, `B`, `C`, ...
    ///
    /// The caller owns the randomness so runs can be made reproducible.
    pub fn cast<R: Rng + ?Sized>(proposals: Vec<(ProviderId, String)>, rng: &mut R) -> Self {
        debug_assert!(proposals.len() <= 26, "label space is A-Z");
        let mut proposals = proposals;
        proposals.shuffle(rng);
        let entries = proposals
            .into_iter()
            .enumerate()
            .map(|(i, (author, text))| BallotEntry {
                label: (b'A' + i as u8) as char,
                author,
                text,
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in label order.
    pub fn entries(&self) -> &[BallotEntry] {
        &self.entries
    }

    /// Who wrote the proposal behind a label.
    pub fn author_of(&self, label: char) -> Option<ProviderId> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.author)
    }

    /// The label assigned to an author's proposal.
    pub fn label_of(&self, author: ProviderId) -> Option<char> {
        self.entries
            .iter()
            .find(|e| e.author == author)
            .map(|e| e.label)
    }

    /// Labeled proposals to show a reviewer: every entry except their own.
    pub fn proposals_for(&self, reviewer: ProviderId) -> Vec<(char, &str)> {
        self.entries
            .iter()
            .filter(|e| e.author != reviewer)
            .map(|e| (e.label, e.text.as_str()))
            .collect()
    }

    /// Authors present on this ballot, in label order.
    pub fn authors(&self) -> impl Iterator<Item = ProviderId> + '_ {
        self.entries.iter().map(|e| e.author)
    }
}
