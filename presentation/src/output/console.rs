//! Console output formatter for debate results

use colored::Colorize;
use council_domain::{DebateReport, ProviderId, Round};

/// Words shown per response in round summaries; the saved markdown
/// report carries the full text
const PREVIEW_WORDS: usize = 50;

/// Formats debate reports for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete report: question, every round, then the verdict
    pub fn format(report: &DebateReport) -> String {
        let transcript = &report.transcript;
        let mut output = String::new();

        output.push_str(&Self::header("AI Council Debate"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n\n",
            "Question:".cyan().bold(),
            transcript.question().content()
        ));
        output.push_str(&format!(
            "{} {} [{}]\n",
            "Panel:".cyan().bold(),
            Self::names(transcript.panel().members()),
            transcript.panel().mode()
        ));

        for round in transcript.rounds() {
            output.push_str(&Self::section_header(&format!(
                "Round {}: {}",
                round.number(),
                Self::round_label(round)
            )));
            output.push_str(&Self::round_body(round));
        }

        output.push_str(&Self::section_header("Council Synthesis"));
        output.push_str(&format!(
            "\n{}\n\n{}\n",
            Self::synthesizer_label(report).yellow().bold(),
            report.verdict.text
        ));

        output.push_str(&Self::footer());
        output
    }

    /// Format the verdict only (concise output)
    pub fn format_synthesis_only(report: &DebateReport) -> String {
        let mut output = String::new();

        output.push_str(&format!("{}\n\n", "=== Council Verdict ===".cyan().bold()));
        output.push_str(&format!(
            "{} {}\n\n",
            "Q:".bold(),
            report.transcript.question().content()
        ));
        output.push_str(&format!(
            "{}\n\n",
            format!(
                "{} | Duration: {:.1}s | Rounds: {}",
                Self::synthesizer_label(report),
                report.total_duration.as_secs_f64(),
                report.transcript.round_count()
            )
            .dimmed()
        ));
        output.push_str(&report.verdict.text);
        output.push('\n');

        output
    }

    /// Format the complete report as JSON
    pub fn format_json(report: &DebateReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }

    fn round_body(round: &Round) -> String {
        let mut output = String::new();
        for id in round.participants() {
            match round.outcome(*id) {
                Some(outcome) if outcome.is_success() => {
                    let latency = outcome.latency().unwrap_or_default().as_secs_f64();
                    output.push_str(&format!(
                        "\n{}\n{}\n",
                        format!("── {} ({latency:.1}s) ──", id.display_name())
                            .yellow()
                            .bold(),
                        Self::preview(outcome.text().unwrap_or_default())
                    ));
                }
                Some(outcome) => {
                    let category = outcome
                        .failure_category()
                        .map(|c| c.as_str())
                        .unwrap_or("unknown");
                    output.push_str(&format!(
                        "\n{}\nNo response ({}): {}\n",
                        format!("── {} ──", id.display_name()).red().bold(),
                        category,
                        outcome.failure_detail().unwrap_or_default()
                    ));
                }
                None => {}
            }
        }
        output
    }

    fn synthesizer_label(report: &DebateReport) -> String {
        let stance = if report.verdict.synthesizer_is_participant {
            "participant"
        } else {
            "non-participant"
        };
        format!(
            "Synthesizer: {} ({stance})",
            report.verdict.synthesizer.display_name()
        )
    }

    fn round_label(round: &Round) -> &'static str {
        if round.number() == 1 {
            "Initial Responses"
        } else {
            "Critique"
        }
    }

    /// First N words of a response; the full text lives in the report file
    fn preview(text: &str) -> String {
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.len() <= PREVIEW_WORDS {
            text.trim().to_string()
        } else {
            format!("{}...", words[..PREVIEW_WORDS].join(" "))
        }
    }

    fn names(ids: &[ProviderId]) -> String {
        ids.iter()
            .map(|id| id.display_name())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}
