//! CLI entrypoint for ai-council
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use council_application::{
    HealthCheckUseCase, RunDebateError, RunDebateInput, RunDebateUseCase, healthy_ids,
};
use council_domain::{
    DebateReport, IdentityCatalog, PanelSelection, ProviderId, Question, QuestionSource,
};
use council_infrastructure::{
    ConfigLoader, FileConfig, MarkdownReportWriter, ProviderRegistry, build_catalog, inbox,
    restrict_catalog,
};
use council_presentation::{Cli, ConsoleFormatter, OutputFormat, ProgressReporter, SimpleProgress};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load .env before anything reads credentials
    dotenvy::dotenv().ok();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow::anyhow!("config error: {e}"))?
    };
    config.validate().context("invalid configuration")?;

    info!("Starting AI Council");

    // === Dependency Injection ===
    let registry = Arc::new(ProviderRegistry::from_config(&config));
    if registry.configured_ids().is_empty() {
        bail!("No providers available. Check the API keys in .env or the environment.");
    }

    let mut catalog = build_catalog(&config);
    if !cli.skip_health_check {
        catalog = check_providers(&registry, catalog, cli.quiet).await?;
    }

    let synthesizer = match &cli.synthesizer {
        Some(name) => parse_provider(name)?,
        None => config.synthesizer(),
    };
    let output_dir = cli
        .output_dir
        .clone()
        .unwrap_or_else(|| config.defaults.output_dir.clone());
    let writer = MarkdownReportWriter::new(output_dir);
    let models = model_map(&registry);

    let use_case = RunDebateUseCase::new(Arc::clone(&registry));

    if cli.inbox {
        return run_inbox(
            &cli,
            &config,
            &use_case,
            &catalog,
            synthesizer,
            &writer,
            &models,
        )
        .await;
    }

    // Single question mode
    let question = if let Some(path) = &cli.file {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("could not read {}", path.display()))?;
        match Question::try_new(text.trim()) {
            Some(q) => q.with_source(QuestionSource::File(path.clone())),
            None => bail!("question file {} is empty", path.display()),
        }
    } else {
        match cli.question.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => Question::new(text),
            _ => bail!("A question is required. Pass it as an argument, or use --file or --inbox."),
        }
    };

    let rounds = effective_rounds(cli.rounds, None, &config);
    let selection = panel_selection(cli.panel.as_deref(), cli.full, &config)?;
    let input = debate_input(question, selection, synthesizer, rounds, &cli, &config);

    print_header(&cli, rounds, synthesizer, input.question.content());

    let report = run_debate(&use_case, input, &catalog, &cli).await?;

    println!("{}", render(&report, cli.output));

    let saved = writer.save(&report, &models, None)?;
    println!("Saved to: {}", saved.display());

    Ok(())
}

/// Process every question file in the inbox, oldest first.
///
/// One bad file does not stop the run: it is archived with a `FAILED_`
/// prefix and the loop moves on.
async fn run_inbox(
    cli: &Cli,
    config: &FileConfig,
    use_case: &RunDebateUseCase<ProviderRegistry>,
    catalog: &IdentityCatalog,
    synthesizer: ProviderId,
    writer: &MarkdownReportWriter,
    models: &BTreeMap<ProviderId, String>,
) -> Result<()> {
    let inbox_dir = cli
        .inbox_dir
        .clone()
        .unwrap_or_else(|| config.inbox.dir.clone());
    let archive_dir = config.inbox.archive_dir.clone();
    inbox::ensure_dirs(&inbox_dir, &archive_dir)?;

    let files = inbox::scan(&inbox_dir)?;
    if files.is_empty() {
        println!("No files in inbox.");
        return Ok(());
    }

    for path in files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let result: Result<PathBuf> = async {
            let question = inbox::read_question(&path)?;

            // CLI flags always win; frontmatter fills in when they are unset
            let rounds = effective_rounds(cli.rounds, question.overrides.rounds, config);
            let csv = cli
                .panel
                .clone()
                .or_else(|| question.overrides.panel.clone());
            let full = cli.full || question.overrides.full.unwrap_or(false);
            let selection = panel_selection(csv.as_deref(), full, config)?;

            let q = Question::new(question.text.as_str())
                .with_source(QuestionSource::Inbox(question.path.clone()));
            let input = debate_input(q, selection, synthesizer, rounds, cli, config);

            print_header(cli, rounds, synthesizer, &question.text);

            let report = run_debate(use_case, input, catalog, cli).await?;

            println!("{}", render(&report, cli.output));
            Ok(writer.save(&report, models, question.stem())?)
        }
        .await;

        match result {
            Ok(saved) => {
                let archived = inbox::archive(&path, &archive_dir, false)?;
                println!(
                    "Processed: {} -> {} (archived: {})",
                    name,
                    saved.display(),
                    archived
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default()
                );
            }
            Err(e) => {
                error!("Failed: {} -- {}", name, e);
                inbox::archive(&path, &archive_dir, true)?;
            }
        }
    }

    Ok(())
}

/// Run one debate with the progress surface the flags call for: silent under
/// `--quiet`, plain text lines when `-v` logging is active (log output and
/// redrawn bars do not share a terminal well), live bars otherwise.
async fn run_debate(
    use_case: &RunDebateUseCase<ProviderRegistry>,
    input: RunDebateInput,
    catalog: &IdentityCatalog,
    cli: &Cli,
) -> Result<DebateReport, RunDebateError> {
    if cli.quiet {
        use_case.execute(input, catalog).await
    } else if cli.verbose > 0 {
        use_case
            .execute_with_progress(input, catalog, &SimpleProgress)
            .await
    } else {
        let progress = ProgressReporter::new();
        use_case
            .execute_with_progress(input, catalog, &progress)
            .await
    }
}

/// Probe the credentialed identities and narrow the catalog to the ones
/// that answered.
async fn check_providers(
    registry: &Arc<ProviderRegistry>,
    catalog: IdentityCatalog,
    quiet: bool,
) -> Result<IdentityCatalog> {
    let candidates = catalog.available();
    if candidates.is_empty() {
        bail!("No providers available. Check the API keys in .env or the environment.");
    }

    if !quiet {
        println!("\nChecking providers...");
    }
    let results = HealthCheckUseCase::new(Arc::clone(registry))
        .execute(&candidates)
        .await;

    let mut failed: Vec<String> = Vec::new();
    for result in &results {
        match &result.outcome {
            Ok(latency) => {
                if !quiet {
                    println!("  OK   {} ({:.2}s)", result.id, latency.as_secs_f64());
                }
            }
            Err(e) => {
                if !quiet {
                    println!("  FAIL {}: {}", result.id, first_line(&e.to_string()));
                }
                failed.push(result.id.to_string());
            }
        }
    }

    if failed.is_empty() {
        if !quiet {
            println!();
        }
        return Ok(catalog);
    }

    let healthy = healthy_ids(&results);
    if healthy.is_empty() {
        bail!("No providers passed the health check.");
    }

    if !quiet {
        println!("\n{} provider(s) failed: {}", failed.len(), failed.join(", "));
        println!(
            "Continuing with: {}\n",
            healthy
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    Ok(restrict_catalog(&catalog, &healthy))
}

fn parse_provider(name: &str) -> Result<ProviderId> {
    Ok(name.parse::<ProviderId>()?)
}

/// First line of an error, truncated so FAIL rows stay on one line
fn first_line(text: &str) -> String {
    text.lines()
        .next()
        .unwrap_or("unknown error")
        .chars()
        .take(120)
        .collect()
}

/// Resolve the panel request. `--panel` beats `--full` beats the
/// configured default panel.
fn panel_selection(csv: Option<&str>, full: bool, config: &FileConfig) -> Result<PanelSelection> {
    if let Some(csv) = csv {
        let mut ids = Vec::new();
        for name in csv.split(',') {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            ids.push(parse_provider(name)?);
        }
        if ids.is_empty() {
            bail!("--panel must name at least one identity");
        }
        Ok(PanelSelection::Explicit(ids))
    } else if full {
        Ok(PanelSelection::FullRoster)
    } else {
        Ok(PanelSelection::Default(config.default_panel()))
    }
}

fn effective_rounds(cli_rounds: Option<u32>, file_rounds: Option<u32>, config: &FileConfig) -> u32 {
    let requested = cli_rounds.or(file_rounds).unwrap_or(config.defaults.rounds);
    if requested > config.defaults.max_rounds {
        warn!(
            "{} rounds requested, clamping to max_rounds = {}",
            requested, config.defaults.max_rounds
        );
        config.defaults.max_rounds
    } else {
        requested
    }
}

fn debate_input(
    question: Question,
    selection: PanelSelection,
    synthesizer: ProviderId,
    rounds: u32,
    cli: &Cli,
    config: &FileConfig,
) -> RunDebateInput {
    let mut input = RunDebateInput::new(question, selection, synthesizer)
        .with_rounds(rounds)
        .with_call_timeout(config.call_timeout());
    if let Some(seed) = cli.ballot_seed {
        input = input.with_ballot_seed(seed);
    }
    input
}

fn model_map(registry: &ProviderRegistry) -> BTreeMap<ProviderId, String> {
    registry
        .configured_ids()
        .into_iter()
        .filter_map(|id| registry.model_of(id).map(|model| (id, model.to_string())))
        .collect()
}

fn print_header(cli: &Cli, rounds: u32, synthesizer: ProviderId, question: &str) {
    if cli.quiet {
        return;
    }
    let preview: String = question.chars().take(80).collect();
    let ellipsis = if question.chars().count() > 80 {
        "..."
    } else {
        ""
    };
    println!();
    println!("+============================================================+");
    println!("|                 AI Council - Model Debate                  |");
    println!("+============================================================+");
    println!();
    println!("Question: {preview}{ellipsis}");
    println!(
        "Rounds: {} | Synthesizer: {}",
        rounds,
        synthesizer.display_name()
    );
    println!();
}

fn render(report: &DebateReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Full => ConsoleFormatter::format(report),
        OutputFormat::Synthesis => ConsoleFormatter::format_synthesis_only(report),
        OutputFormat::Json => ConsoleFormatter::format_json(report),
    }
}
