//! Synthesis: one call that turns the finished transcript into a verdict.

use std::time::Duration;

use tracing::info;

use council_domain::{
    DebateTranscript, IdentityCatalog, PromptTemplate, SynthesisVerdict, SynthesizerChoice,
};

use crate::ports::provider::{ProviderGateway, ProviderRequest};

use super::RunDebateError;

/// Ask the chosen synthesizer for the council's verdict.
///
/// This is the only prompt in the debate that reveals identities. Synthesis
/// failure is a hard error; a debate without a verdict has no result worth
/// returning.
pub(super) async fn synthesize<G: ProviderGateway>(
    gateway: &G,
    transcript: &DebateTranscript,
    choice: &SynthesizerChoice,
    catalog: &IdentityCatalog,
    call_timeout: Duration,
) -> Result<SynthesisVerdict, RunDebateError> {
    let rendered = PromptTemplate::synthesis_transcript(transcript, catalog);
    let prompt = PromptTemplate::synthesis_prompt(
        transcript.question().content(),
        transcript.round_count(),
        &rendered,
    );
    let request = ProviderRequest::new(prompt, PromptTemplate::synthesis_system(), call_timeout);

    info!(
        "Synthesis by {} (participant: {})",
        choice.id, choice.participant
    );

    let reply = gateway
        .call(choice.id, request)
        .await
        .map_err(|source| RunDebateError::SynthesisFailed {
            synthesizer: choice.id,
            source,
        })?;

    if reply.text.trim().is_empty() {
        return Err(RunDebateError::EmptyVerdict {
            synthesizer: choice.id,
        });
    }

    Ok(SynthesisVerdict {
        synthesizer: choice.id,
        synthesizer_is_participant: choice.participant,
        text: reply.text,
        latency: reply.latency,
    })
}
