//! Round execution: fan a round out to every participant and fold the
//! results into a complete outcome map.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tracing::{info, warn};

use council_domain::{
    BlindBallot, FailureCategory, IdentityCatalog, PromptTemplate, ProviderId, ResponseOutcome,
    Round,
};

use crate::ports::progress::ProgressNotifier;
use crate::ports::provider::{ProviderGateway, ProviderRequest};

/// Run one round: call every participant concurrently and wait for all of
/// them to settle.
///
/// A failed call eliminates that identity from later rounds but never
/// cancels its siblings. With a ballot this is a critique round and each
/// participant sees the labeled proposals minus their own; without one it
/// is the proposal round.
pub(super) async fn execute_round<G: ProviderGateway + 'static>(
    gateway: &Arc<G>,
    number: u32,
    participants: &[ProviderId],
    question: &str,
    ballot: Option<BlindBallot>,
    catalog: &IdentityCatalog,
    call_timeout: Duration,
    progress: &dyn ProgressNotifier,
) -> Round {
    let mut join_set = JoinSet::new();

    for id in participants {
        let id = *id;
        let persona = catalog.persona(id);
        let (system, prompt) = match &ballot {
            None => (
                PromptTemplate::initial_system(persona),
                PromptTemplate::initial_prompt(question),
            ),
            Some(ballot) => (
                PromptTemplate::critique_system(persona),
                PromptTemplate::critique_prompt(number, question, &ballot.proposals_for(id)),
            ),
        };
        let request = ProviderRequest::new(prompt, system, call_timeout);
        let gateway = Arc::clone(gateway);

        join_set.spawn(async move {
            let result = gateway.call(id, request).await;
            (id, result)
        });
    }

    let mut outcomes = BTreeMap::new();

    while let Some(result) = join_set.join_next().await {
        match result {
            Ok((id, Ok(reply))) => {
                info!(
                    "{} responded in round {} ({:.1}s)",
                    id,
                    number,
                    reply.latency.as_secs_f64()
                );
                progress.on_participant_complete(number, id, true);
                outcomes.insert(id, ResponseOutcome::success(reply.text, reply.latency));
            }
            Ok((id, Err(e))) => {
                warn!("{} failed in round {}: {}", id, number, e);
                progress.on_participant_complete(number, id, false);
                outcomes.insert(id, ResponseOutcome::failure(e.category(), e.to_string()));
            }
            Err(e) => {
                warn!("Task join error: {}", e);
            }
        }
    }

    // A panicked task reported nothing; record a failure so the round still
    // carries an outcome for every participant.
    for id in participants {
        if !outcomes.contains_key(id) {
            outcomes.insert(
                *id,
                ResponseOutcome::failure(FailureCategory::Unknown, "task aborted before settling"),
            );
        }
    }

    Round::new(number, participants.to_vec(), outcomes, ballot)
}
