//! Markdown report files for finished debates

use chrono::Local;
use council_domain::{DebateReport, ProviderId, Round};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tracing::info;

const TITLE_LIMIT: usize = 50;
const SLUG_LIMIT: usize = 40;

/// Writes one markdown file per debate into the output directory.
///
/// Filenames are `{timestamp}_{slug}.md`, so a directory listing sorts
/// chronologically.
pub struct MarkdownReportWriter {
    output_dir: PathBuf,
}

impl MarkdownReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Render and save the report. Returns the path written.
    ///
    /// `models` maps identities to their configured model names for the
    /// response headings; identities missing from the map get a bare
    /// heading. Inbox runs pass the question file's stem as
    /// `slug_override` so the report is traceable to its source file.
    pub fn save(
        &self,
        report: &DebateReport,
        models: &BTreeMap<ProviderId, String>,
        slug_override: Option<&str>,
    ) -> std::io::Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let stem = slug(slug_override.unwrap_or(report.transcript.question().content()));
        let filename = format!("{stamp}_{stem}.md");
        let path = self.output_dir.join(filename);

        fs::write(&path, render(report, models))?;
        info!("Debate saved to: {}", path.display());
        Ok(path)
    }
}

fn render(report: &DebateReport, models: &BTreeMap<ProviderId, String>) -> String {
    let transcript = &report.transcript;
    let question = transcript.question();
    let title: String = question.content().chars().take(TITLE_LIMIT).collect();
    let contributors = report
        .contributors()
        .iter()
        .map(|id| id.display_name())
        .collect::<Vec<_>>()
        .join(", ");

    let mut lines: Vec<String> = vec![
        format!("# AI Council Debate: {title}"),
        String::new(),
        format!("**Date:** {}", Local::now().format("%Y-%m-%d %H:%M:%S")),
        format!("**Models:** {contributors}"),
        format!("**Rounds:** {}", transcript.round_count()),
        format!("**Duration:** {:.1}s", report.total_duration.as_secs_f64()),
        format!("**Source:** {}", question.source()),
        String::new(),
        "---".to_string(),
        String::new(),
    ];

    for round in transcript.rounds() {
        lines.push(format!(
            "## Round {}: {}",
            round.number(),
            round_label(round)
        ));
        lines.push(String::new());

        for id in round.participants() {
            lines.push(heading(*id, models));
            lines.push(String::new());
            match round.outcome(*id) {
                Some(outcome) if outcome.is_success() => {
                    lines.push(outcome.text().unwrap_or_default().to_string());
                    lines.push(String::new());
                    let latency = outcome.latency().unwrap_or_default();
                    lines.push(format!("*Latency: {:.2}s*", latency.as_secs_f64()));
                }
                Some(outcome) => {
                    let category = outcome
                        .failure_category()
                        .map(|c| c.as_str())
                        .unwrap_or("unknown");
                    let detail = outcome.failure_detail().unwrap_or_default();
                    lines.push(format!("*No response ({category}): {detail}*"));
                }
                None => lines.push("*No response recorded*".to_string()),
            }
            lines.push(String::new());
        }
    }

    lines.push(format!(
        "## Synthesis (by {})",
        report.verdict.synthesizer.display_name()
    ));
    lines.push(String::new());
    if !report.verdict.synthesizer_is_participant {
        lines.push("*The synthesizer did not take part in the debate rounds.*".to_string());
        lines.push(String::new());
    }
    lines.push(report.verdict.text.clone());
    lines.push(String::new());

    lines.join("\n")
}

fn round_label(round: &Round) -> &'static str {
    if round.number() == 1 {
        "Initial Responses"
    } else {
        "Critique"
    }
}

fn heading(id: ProviderId, models: &BTreeMap<ProviderId, String>) -> String {
    match models.get(&id) {
        Some(model) => format!("### {} ({model})", id.display_name()),
        None => format!("### {}", id.display_name()),
    }
}

/// Filename-safe slug from the question text
fn slug(text: &str) -> String {
    let mut slug = String::new();
    for c in text.chars() {
        if c.is_alphanumeric() {
            for lower in c.to_lowercase() {
                slug.push(lower);
            }
        } else if (c.is_whitespace() || c == '-' || c == '_')
            && !slug.is_empty()
            && !slug.ends_with('-')
        {
            slug.push('-');
        }
    }
    let slug: String = slug.chars().take(SLUG_LIMIT).collect();
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "debate".to_string()
    } else {
        slug.to_string()
    }
}
