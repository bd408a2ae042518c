//! Prompt templates for the debate flow
//!
//! Critique prompts only ever see ballot labels; real identities appear in
//! exactly one place, the synthesis transcript.

use crate::catalog::IdentityCatalog;
use crate::debate::transcript::DebateTranscript;

/// Templates for generating prompts at each debate stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt for the proposal round
    pub fn initial_system(persona: &str) -> String {
        let base = r#"You are one voice on a council of AI models debating a question.
Give your strongest answer with concrete reasoning. Take a clear position;
a hedged non-answer wastes the council's time. Be concise but complete."#;
        with_stance(base, persona)
    }

    /// User prompt for the proposal round
    pub fn initial_prompt(question: &str) -> String {
        format!(
            r#"The council has been asked:

{}

Give your answer and the reasoning behind it."#,
            question
        )
    }

    /// System prompt for critique rounds
    pub fn critique_system(persona: &str) -> String {
        let base = r#"You are one voice on a council of AI models debating a question.
You are now reviewing anonymous proposals from the other members. Judge the
arguments on their merits; you do not know who wrote what. Attack weak
reasoning directly and concede strong points when you must."#;
        with_stance(base, persona)
    }

    /// User prompt for a critique round
    ///
    /// `proposals` are the labeled texts to show this reviewer, with the
    /// reviewer's own proposal already removed.
    pub fn critique_prompt(round: u32, question: &str, proposals: &[(char, &str)]) -> String {
        let mut prompt = format!(
            r#"This is round {} of the debate on:

{}

The other council members proposed the following. Authorship is hidden.
"#,
            round, question
        );

        for (label, text) in proposals {
            prompt.push_str(&format!("\n--- Proposal {} ---\n{}\n", label, text));
        }

        prompt.push_str(
            r#"
For each proposal, say where it is right, where it is wrong, and what it
misses. Then restate your own position: defend it, or revise it where a
proposal genuinely changed your mind."#,
        );

        prompt
    }

    /// System prompt for the synthesis call
    pub fn synthesis_system() -> &'static str {
        r#"You are the moderator of a council of AI models that has finished debating.
You have the full transcript with every identity revealed. Weigh the
arguments, not the names. Deliver a verdict the caller can act on."#
    }

    /// User prompt for synthesis
    pub fn synthesis_prompt(question: &str, rounds: usize, transcript: &str) -> String {
        format!(
            r#"The council debated the following question over {} round(s):

{}

Full transcript:

{}

Based on the entire debate, produce the council's verdict with these sections:

1. **Consensus**: points the members genuinely agreed on
2. **Disagreements**: disputes that remained unresolved, and who held which position
3. **Decision**: the single recommended answer, with your reasoning
4. **Risks**: caveats and failure modes of that decision
5. **Action Items**: concrete next steps, as a short list

Format your response with clear markdown headers."#,
            rounds, question, transcript
        )
    }

    /// Render the full debate for the synthesizer, identities revealed
    ///
    /// Failed calls appear as short notes so the synthesizer knows a voice
    /// went missing rather than silent.
    pub fn synthesis_transcript(transcript: &DebateTranscript, catalog: &IdentityCatalog) -> String {
        let mut out = String::new();
        for round in transcript.rounds() {
            let heading = if round.number() == 1 {
                "Initial Responses"
            } else {
                "Critique"
            };
            out.push_str(&format!("## Round {}: {}\n", round.number(), heading));
            for id in round.participants() {
                let Some(outcome) = round.outcome(*id) else {
                    continue;
                };
                match outcome.text() {
                    Some(text) => {
                        let persona = catalog.persona(*id);
                        if persona.is_empty() {
                            out.push_str(&format!("\n**{}**\n{}\n", id.display_name(), text));
                        } else {
                            out.push_str(&format!(
                                "\n**{}** (stance: {})\n{}\n",
                                id.display_name(),
                                persona,
                                text
                            ));
                        }
                    }
                    None => {
                        let category = outcome
                            .failure_category()
                            .map(|c| c.as_str())
                            .unwrap_or("unknown");
                        out.push_str(&format!(
                            "\n**{}** did not respond ({})\n",
                            id.display_name(),
                            category
                        ));
                    }
                }
            }
            out.push('\n');
        }
        out
    }
}

fn with_stance(base: &str, persona: &str) -> String {
    if persona.trim().is_empty() {
        base.to_string()
    } else {
        format!("{}\n\nYour stance in this debate: {}", base, persona)
    }
}
