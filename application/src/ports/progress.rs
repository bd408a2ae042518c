//! Progress notification port
//!
//! Defines the interface for reporting progress during a debate.

use council_domain::{ProviderId, Round};

/// Callback for progress updates while a debate runs
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console bars, plain logs, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called when a round is dispatched
    fn on_round_start(&self, number: u32, total_rounds: u32, participants: usize);

    /// Called as each participant's call settles within a round
    fn on_participant_complete(&self, number: u32, id: ProviderId, success: bool);

    /// Called when every participant of a round has settled
    fn on_round_complete(&self, round: &Round);

    /// Called when the synthesis call is dispatched
    fn on_synthesis_start(&self, synthesizer: ProviderId);

    /// Called when the synthesis call settles
    fn on_synthesis_complete(&self, success: bool);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_round_start(&self, _number: u32, _total_rounds: u32, _participants: usize) {}
    fn on_participant_complete(&self, _number: u32, _id: ProviderId, _success: bool) {}
    fn on_round_complete(&self, _round: &Round) {}
    fn on_synthesis_start(&self, _synthesizer: ProviderId) {}
    fn on_synthesis_complete(&self, _success: bool) {}
}
