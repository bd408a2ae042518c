//! Run Debate use case
//!
//! Orchestrates the full debate flow: panel resolution, the round loop
//! with elimination, and the final synthesis call.

mod rounds;
mod synthesis;

use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;
use tracing::{debug, info, warn};

use council_domain::{
    BlindBallot, DebateError, DebateReport, DebateTranscript, IdentityCatalog, Panel,
    PanelSelection, ProviderId, Question, select_synthesizer,
};

use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::provider::{ProviderError, ProviderGateway};

/// Errors that can occur while running a debate
#[derive(Error, Debug)]
pub enum RunDebateError {
    #[error("a debate needs at least one round")]
    NoRounds,

    #[error(transparent)]
    Debate(#[from] DebateError),

    #[error("synthesis by '{synthesizer}' failed: {source}")]
    SynthesisFailed {
        synthesizer: ProviderId,
        #[source]
        source: ProviderError,
    },

    #[error("synthesizer '{synthesizer}' returned an empty verdict")]
    EmptyVerdict { synthesizer: ProviderId },
}

/// Input for the RunDebate use case
#[derive(Debug, Clone)]
pub struct RunDebateInput {
    /// The question the council debates
    pub question: Question,
    /// Number of rounds, at least one; round one proposes, the rest critique
    pub rounds: u32,
    /// How to form the panel
    pub panel: PanelSelection,
    /// Preferred synthesizer identity; never substituted
    pub synthesizer: ProviderId,
    /// Time bound handed to the gateway per call
    pub call_timeout: Duration,
    /// Fixed ballot shuffle seed for reproducible runs; entropy when unset
    pub ballot_seed: Option<u64>,
}

impl RunDebateInput {
    pub fn new(
        question: impl Into<Question>,
        panel: PanelSelection,
        synthesizer: ProviderId,
    ) -> Self {
        Self {
            question: question.into(),
            rounds: 2,
            panel,
            synthesizer,
            call_timeout: Duration::from_secs(120),
            ballot_seed: None,
        }
    }

    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = rounds;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn with_ballot_seed(mut self, seed: u64) -> Self {
        self.ballot_seed = Some(seed);
        self
    }
}

/// Use case for running a council debate
pub struct RunDebateUseCase<G: ProviderGateway + 'static> {
    gateway: Arc<G>,
}

impl<G: ProviderGateway + 'static> RunDebateUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        input: RunDebateInput,
        catalog: &IdentityCatalog,
    ) -> Result<DebateReport, RunDebateError> {
        self.execute_with_progress(input, catalog, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunDebateInput,
        catalog: &IdentityCatalog,
        progress: &dyn ProgressNotifier,
    ) -> Result<DebateReport, RunDebateError> {
        if input.rounds == 0 {
            return Err(RunDebateError::NoRounds);
        }

        let panel = Panel::resolve(&input.panel, catalog)?;
        info!(
            "Starting debate: {} participants, {} round(s), synthesizer '{}'",
            panel.len(),
            input.rounds,
            input.synthesizer
        );

        let started = Instant::now();
        let mut rng: StdRng = match input.ballot_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut transcript = DebateTranscript::new(input.question.clone(), panel.clone());
        let mut participants: Vec<ProviderId> = panel.members().to_vec();
        let mut ballot: Option<BlindBallot> = None;

        for number in 1..=input.rounds {
            progress.on_round_start(number, input.rounds, participants.len());

            let round = rounds::execute_round(
                &self.gateway,
                number,
                &participants,
                input.question.content(),
                ballot.take(),
                catalog,
                input.call_timeout,
                progress,
            )
            .await;

            let dispatched = round.participants().len();
            let successes = round.success_count();
            info!(
                "Round {} settled: {}/{} responded",
                number, successes, dispatched
            );
            if dispatched >= 3 && successes < 3 {
                warn!(
                    "Only {}/{} models responded in round {}. Debate quality is degraded",
                    successes, dispatched, number
                );
            }
            progress.on_round_complete(&round);

            let survivors = round.survivors();
            if survivors.len() < 2 {
                return Err(DebateError::RoundCollapsed { round }.into());
            }

            if number < input.rounds {
                let next = BlindBallot::cast(round.proposals(), &mut rng);
                let mapping: Vec<String> = next
                    .entries()
                    .iter()
                    .map(|e| format!("{}={}", e.label(), e.author()))
                    .collect();
                debug!("Ballot for round {}: {}", number + 1, mapping.join(", "));
                ballot = Some(next);
            }

            transcript.push_round(round);
            participants = survivors;
        }

        let choice = select_synthesizer(input.synthesizer, &transcript.final_panel(), catalog)?;
        progress.on_synthesis_start(choice.id);
        let verdict = synthesis::synthesize(
            self.gateway.as_ref(),
            &transcript,
            &choice,
            catalog,
            input.call_timeout,
        )
        .await;
        progress.on_synthesis_complete(verdict.is_ok());
        let verdict = verdict?;

        info!(
            "Debate finished in {:.1}s",
            started.elapsed().as_secs_f64()
        );

        Ok(DebateReport {
            transcript,
            verdict,
            total_duration: started.elapsed(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::provider::{ProviderReply, ProviderRequest};
    use async_trait::async_trait;
    use council_domain::{CatalogEntry, FailureCategory, PromptTemplate};
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    // === Mock gateway ===

    struct MockGateway {
        replies: Mutex<HashMap<ProviderId, VecDeque<Result<String, ProviderError>>>>,
        calls: Mutex<Vec<(ProviderId, ProviderRequest)>>,
    }

    impl MockGateway {
        fn new() -> Self {
            Self {
                replies: Mutex::new(HashMap::new()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn script(&self, id: ProviderId, reply: Result<&str, ProviderError>) {
            self.replies
                .lock()
                .unwrap()
                .entry(id)
                .or_default()
                .push_back(reply.map(str::to_string));
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        fn calls_for(&self, id: ProviderId) -> Vec<ProviderRequest> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|(called, _)| *called == id)
                .map(|(_, request)| request.clone())
                .collect()
        }
    }

    #[async_trait]
    impl ProviderGateway for MockGateway {
        async fn call(
            &self,
            id: ProviderId,
            request: ProviderRequest,
        ) -> Result<ProviderReply, ProviderError> {
            self.calls.lock().unwrap().push((id, request));
            let scripted = self
                .replies
                .lock()
                .unwrap()
                .get_mut(&id)
                .and_then(|queue| queue.pop_front());
            match scripted {
                Some(Ok(text)) => Ok(ProviderReply {
                    text,
                    latency: Duration::from_millis(10),
                }),
                Some(Err(e)) => Err(e),
                None => Err(ProviderError::Unknown(format!(
                    "no scripted reply for {id}"
                ))),
            }
        }
    }

    // === Fixtures ===

    fn catalog() -> IdentityCatalog {
        IdentityCatalog::new(vec![
            CatalogEntry::available(ProviderId::Gemini, "the integrator"),
            CatalogEntry::available(ProviderId::OpenAi, ""),
            CatalogEntry::available(ProviderId::Claude, "the systems conservative"),
            CatalogEntry::unavailable(ProviderId::Grok),
            CatalogEntry::available(ProviderId::DeepSeek, ""),
        ])
    }

    fn trio() -> PanelSelection {
        PanelSelection::Explicit(vec![
            ProviderId::Claude,
            ProviderId::Gemini,
            ProviderId::DeepSeek,
        ])
    }

    /// Scripts a clean two-round debate: neutral proposal texts so prompts
    /// can be checked for identity leaks, then a verdict from OpenAI.
    fn script_two_rounds(gateway: &MockGateway) {
        gateway.script(ProviderId::Claude, Ok("use a queue"));
        gateway.script(ProviderId::Gemini, Ok("use a log"));
        gateway.script(ProviderId::DeepSeek, Ok("use a table"));
        gateway.script(ProviderId::Claude, Ok("the log is fragile"));
        gateway.script(ProviderId::Gemini, Ok("the queue is slow"));
        gateway.script(ProviderId::DeepSeek, Ok("both overcomplicate"));
        gateway.script(ProviderId::OpenAi, Ok("final verdict"));
    }

    fn input() -> RunDebateInput {
        RunDebateInput::new(Question::new("Pick a storage design"), trio(), ProviderId::OpenAi)
            .with_rounds(2)
            .with_ballot_seed(7)
    }

    // === Tests ===

    #[tokio::test]
    async fn test_two_round_debate_happy_path() {
        let gateway = Arc::new(MockGateway::new());
        script_two_rounds(&gateway);
        let use_case = RunDebateUseCase::new(Arc::clone(&gateway));

        let report = use_case.execute(input(), &catalog()).await.unwrap();

        assert_eq!(report.transcript.round_count(), 2);
        for round in report.transcript.rounds() {
            assert_eq!(round.success_count(), 3);
        }
        assert_eq!(report.verdict.synthesizer, ProviderId::OpenAi);
        assert!(!report.verdict.synthesizer_is_participant);
        assert_eq!(report.verdict.text, "final verdict");
        assert_eq!(gateway.call_count(), 7);
    }

    #[tokio::test]
    async fn test_round_one_prompts_carry_personas() {
        let gateway = Arc::new(MockGateway::new());
        script_two_rounds(&gateway);
        let use_case = RunDebateUseCase::new(Arc::clone(&gateway));

        use_case.execute(input(), &catalog()).await.unwrap();

        let claude = gateway.calls_for(ProviderId::Claude);
        assert!(claude[0].persona.contains("the systems conservative"));
        assert!(claude[0].prompt.contains("Pick a storage design"));

        let deepseek = gateway.calls_for(ProviderId::DeepSeek);
        assert!(!deepseek[0].persona.contains("Your stance"));
    }

    #[tokio::test]
    async fn test_critique_prompts_are_blind_and_exclude_self() {
        let gateway = Arc::new(MockGateway::new());
        script_two_rounds(&gateway);
        let use_case = RunDebateUseCase::new(Arc::clone(&gateway));

        use_case.execute(input(), &catalog()).await.unwrap();

        let claude_round_two = &gateway.calls_for(ProviderId::Claude)[1];
        let prompt = &claude_round_two.prompt;

        // Two proposals: the other members', never the reviewer's own
        assert_eq!(prompt.matches("--- Proposal").count(), 2);
        assert!(prompt.contains("--- Proposal A ---"));
        assert!(prompt.contains("use a log"));
        assert!(prompt.contains("use a table"));
        assert!(!prompt.contains("use a queue"));

        // No identity leaks through the ballot
        for name in ["Claude", "Gemini", "DeepSeek", "claude", "gemini", "deepseek"] {
            assert!(!prompt.contains(name), "identity '{name}' leaked into prompt");
        }
    }

    #[tokio::test]
    async fn test_ballot_seed_makes_runs_reproducible() {
        let mut prompts = Vec::new();
        for _ in 0..2 {
            let gateway = Arc::new(MockGateway::new());
            script_two_rounds(&gateway);
            let use_case = RunDebateUseCase::new(Arc::clone(&gateway));
            use_case.execute(input(), &catalog()).await.unwrap();
            prompts.push(gateway.calls_for(ProviderId::Gemini)[1].prompt.clone());
        }
        assert_eq!(prompts[0], prompts[1]);
    }

    #[tokio::test]
    async fn test_failed_participant_is_eliminated() {
        let gateway = Arc::new(MockGateway::new());
        gateway.script(ProviderId::Claude, Ok("use a queue"));
        gateway.script(
            ProviderId::Gemini,
            Err(ProviderError::RateLimit("429".into())),
        );
        gateway.script(ProviderId::DeepSeek, Ok("use a table"));
        gateway.script(ProviderId::Claude, Ok("still a queue"));
        gateway.script(ProviderId::DeepSeek, Ok("still a table"));
        gateway.script(ProviderId::OpenAi, Ok("verdict"));
        let use_case = RunDebateUseCase::new(Arc::clone(&gateway));

        let report = use_case.execute(input(), &catalog()).await.unwrap();

        let round_two = &report.transcript.rounds()[1];
        assert_eq!(
            round_two.participants(),
            &[ProviderId::Claude, ProviderId::DeepSeek]
        );
        assert_eq!(gateway.calls_for(ProviderId::Gemini).len(), 1);
        assert_eq!(gateway.call_count(), 6);

        // The survivor's critique round shows exactly one proposal
        let claude_round_two = &gateway.calls_for(ProviderId::Claude)[1];
        assert_eq!(claude_round_two.prompt.matches("--- Proposal").count(), 1);
        assert!(claude_round_two.prompt.contains("use a table"));

        // The recorded outcome keeps the failure category
        let round_one = &report.transcript.rounds()[0];
        assert_eq!(
            round_one
                .outcome(ProviderId::Gemini)
                .unwrap()
                .failure_category(),
            Some(FailureCategory::RateLimit)
        );
    }

    #[tokio::test]
    async fn test_collapse_stops_the_debate() {
        let gateway = Arc::new(MockGateway::new());
        gateway.script(ProviderId::Claude, Ok("use a queue"));
        gateway.script(
            ProviderId::Gemini,
            Err(ProviderError::Timeout(Duration::from_secs(120))),
        );
        gateway.script(ProviderId::DeepSeek, Err(ProviderError::Auth("401".into())));
        let use_case = RunDebateUseCase::new(Arc::clone(&gateway));

        let error = use_case.execute(input(), &catalog()).await.unwrap_err();

        match error {
            RunDebateError::Debate(DebateError::RoundCollapsed { round }) => {
                assert_eq!(round.number(), 1);
                assert_eq!(round.success_count(), 1);
                assert_eq!(
                    round
                        .outcome(ProviderId::Gemini)
                        .unwrap()
                        .failure_category(),
                    Some(FailureCategory::Timeout)
                );
            }
            other => panic!("unexpected error: {other}"),
        }
        // No second round, no synthesis
        assert_eq!(gateway.call_count(), 3);
    }

    #[tokio::test]
    async fn test_collapse_applies_to_the_final_round() {
        let gateway = Arc::new(MockGateway::new());
        gateway.script(ProviderId::Claude, Ok("use a queue"));
        gateway.script(ProviderId::Gemini, Err(ProviderError::Unknown("down".into())));
        gateway.script(ProviderId::DeepSeek, Err(ProviderError::Unknown("down".into())));
        let use_case = RunDebateUseCase::new(Arc::clone(&gateway));

        let error = use_case
            .execute(input().with_rounds(1), &catalog())
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            RunDebateError::Debate(DebateError::RoundCollapsed { .. })
        ));
        assert_eq!(gateway.call_count(), 3);
    }

    #[tokio::test]
    async fn test_insufficient_panel_makes_no_calls() {
        let gateway = Arc::new(MockGateway::new());
        let use_case = RunDebateUseCase::new(Arc::clone(&gateway));
        let selection =
            PanelSelection::Explicit(vec![ProviderId::Claude, ProviderId::Grok]);
        let input = RunDebateInput::new(Question::new("q"), selection, ProviderId::OpenAi);

        let error = use_case.execute(input, &catalog()).await.unwrap_err();

        match error {
            RunDebateError::Debate(DebateError::InsufficientPanel { unavailable, .. }) => {
                assert_eq!(unavailable, vec![ProviderId::Grok]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_zero_rounds_is_rejected() {
        let gateway = Arc::new(MockGateway::new());
        let use_case = RunDebateUseCase::new(Arc::clone(&gateway));

        let error = use_case
            .execute(input().with_rounds(0), &catalog())
            .await
            .unwrap_err();

        assert!(matches!(error, RunDebateError::NoRounds));
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unavailable_synthesizer_is_never_substituted() {
        let gateway = Arc::new(MockGateway::new());
        gateway.script(ProviderId::Claude, Ok("use a queue"));
        gateway.script(ProviderId::Gemini, Ok("use a log"));
        gateway.script(ProviderId::DeepSeek, Ok("use a table"));
        let use_case = RunDebateUseCase::new(Arc::clone(&gateway));

        let input = RunDebateInput::new(Question::new("q"), trio(), ProviderId::Grok)
            .with_rounds(1);
        let error = use_case.execute(input, &catalog()).await.unwrap_err();

        match error {
            RunDebateError::Debate(DebateError::NoSynthesizerAvailable { preferred }) => {
                assert_eq!(preferred, ProviderId::Grok);
            }
            other => panic!("unexpected error: {other}"),
        }
        // Rounds ran, synthesis never dispatched
        assert_eq!(gateway.call_count(), 3);
    }

    #[tokio::test]
    async fn test_participant_synthesizer_is_flagged() {
        let gateway = Arc::new(MockGateway::new());
        gateway.script(ProviderId::Claude, Ok("use a queue"));
        gateway.script(ProviderId::Gemini, Ok("use a log"));
        gateway.script(ProviderId::DeepSeek, Ok("use a table"));
        gateway.script(ProviderId::Claude, Ok("verdict from inside"));
        let use_case = RunDebateUseCase::new(Arc::clone(&gateway));

        let input = RunDebateInput::new(Question::new("q"), trio(), ProviderId::Claude)
            .with_rounds(1);
        let report = use_case.execute(input, &catalog()).await.unwrap();

        assert_eq!(report.verdict.synthesizer, ProviderId::Claude);
        assert!(report.verdict.synthesizer_is_participant);
    }

    #[tokio::test]
    async fn test_synthesis_prompt_reveals_identities() {
        let gateway = Arc::new(MockGateway::new());
        script_two_rounds(&gateway);
        let use_case = RunDebateUseCase::new(Arc::clone(&gateway));

        use_case.execute(input(), &catalog()).await.unwrap();

        let synthesis_call = &gateway.calls_for(ProviderId::OpenAi)[0];
        assert_eq!(synthesis_call.persona, PromptTemplate::synthesis_system());
        let prompt = &synthesis_call.prompt;
        assert!(prompt.contains("## Round 1: Initial Responses"));
        assert!(prompt.contains("## Round 2: Critique"));
        assert!(prompt.contains("**Claude**"));
        assert!(prompt.contains("use a queue"));
        assert!(prompt.contains("the log is fragile"));
    }

    #[tokio::test]
    async fn test_empty_verdict_is_an_error() {
        let gateway = Arc::new(MockGateway::new());
        script_two_rounds(&gateway);
        // Overwrite the verdict with whitespace
        gateway.replies.lock().unwrap().remove(&ProviderId::OpenAi);
        gateway.script(ProviderId::OpenAi, Ok("   "));
        let use_case = RunDebateUseCase::new(Arc::clone(&gateway));

        let error = use_case.execute(input(), &catalog()).await.unwrap_err();

        assert!(matches!(
            error,
            RunDebateError::EmptyVerdict {
                synthesizer: ProviderId::OpenAi
            }
        ));
    }

    #[tokio::test]
    async fn test_synthesis_failure_propagates() {
        let gateway = Arc::new(MockGateway::new());
        script_two_rounds(&gateway);
        gateway.replies.lock().unwrap().remove(&ProviderId::OpenAi);
        gateway.script(
            ProviderId::OpenAi,
            Err(ProviderError::RateLimit("429".into())),
        );
        let use_case = RunDebateUseCase::new(Arc::clone(&gateway));

        let error = use_case.execute(input(), &catalog()).await.unwrap_err();

        match error {
            RunDebateError::SynthesisFailed { synthesizer, source } => {
                assert_eq!(synthesizer, ProviderId::OpenAi);
                assert!(matches!(source, ProviderError::RateLimit(_)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
