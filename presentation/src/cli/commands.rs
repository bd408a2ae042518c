//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for debate results
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Round summaries plus the verdict
    Full,
    /// Only the synthesis verdict
    Synthesis,
    /// The complete report as JSON
    Json,
}

/// CLI arguments for ai-council
#[derive(Parser, Debug)]
#[command(name = "ai-council")]
#[command(author, version, about = "AI Council - multi-model debate with blind critique rounds")]
#[command(long_about = r#"
ai-council puts a question to a panel of AI models and lets them debate it.

Round 1 collects independent proposals from every panelist. Later rounds
are blind critiques: each panelist sees the other proposals with authorship
hidden behind shuffled labels, so arguments win on merit rather than brand.
A synthesizer model then weighs the whole transcript and issues a verdict.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./council.toml      Project-level config
3. ~/.config/ai-council/config.toml   Global config

Example:
  ai-council "Should we adopt an event-sourced design?"
  ai-council --panel claude,gemini,grok --rounds 3 "Monolith or services?"
  ai-council --inbox
"#)]
pub struct Cli {
    /// The question to debate (omit when using --file or --inbox)
    pub question: Option<String>,

    /// Read the question from a markdown file
    #[arg(long, value_name = "PATH", conflicts_with = "question")]
    pub file: Option<PathBuf>,

    /// Debate every question file in the inbox directory
    #[arg(long, conflicts_with_all = ["question", "file"])]
    pub inbox: bool,

    /// Override the inbox directory
    #[arg(long, value_name = "DIR")]
    pub inbox_dir: Option<PathBuf>,

    /// Number of debate rounds
    #[arg(short, long, value_name = "N")]
    pub rounds: Option<u32>,

    /// Comma-separated panel identities, overriding the default panel
    #[arg(short, long, value_name = "NAMES")]
    pub panel: Option<String>,

    /// Put every configured identity on the panel
    #[arg(long, conflicts_with = "panel")]
    pub full: bool,

    /// Identity that synthesizes the verdict
    #[arg(short, long, value_name = "NAME")]
    pub synthesizer: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "full")]
    pub output: OutputFormat,

    /// Directory for saved reports
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Skip the connectivity probe at startup
    #[arg(long)]
    pub skip_health_check: bool,

    /// Fixed seed for ballot shuffling, to reproduce a debate
    #[arg(long, value_name = "SEED", hide = true)]
    pub ballot_seed: Option<u64>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
