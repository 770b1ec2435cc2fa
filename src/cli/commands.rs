//! CLI command definitions for debate-forge.
//!
//! Two commands: `run` drives a full debate and writes its record, and
//! `check-topic` runs only the topic validator.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tracing::{error, info};

use crate::config::{load_config, stamp_log_path, DebateConfig};
use crate::debate::{
    resolve_seed, validate_topic, workflow_dot, DebateLogWriter, DebateOrchestrator,
    DebateOutcome, DebateRecord, LlmTurnGenerator, TemplateTurnGenerator, TurnGenerator,
};
use crate::error::{DebateError, DebateResult};
use crate::llm::{LiteLlmClient, LlmProvider};

/// Fixed-round two-agent debate runner.
#[derive(Parser)]
#[command(name = "debate-forge")]
#[command(about = "Run a fixed-round debate between two agent personas and judge the result")]
#[command(version)]
#[command(
    long_about = "debate-forge runs a turn-alternating debate between two personas under a round limit,\nthen scores the transcript and declares a winner.\n\nExample usage:\n  debate-forge run --topic \"Should AI be regulated?\" --seed 42 --offline"
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,
}

/// Available CLI subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Run a full debate and write its record.
    Run(RunArgs),

    /// Validate a topic and print its sanitized form.
    CheckTopic(CheckTopicArgs),

    /// Print the debate workflow as a Graphviz DOT graph.
    Graph(GraphArgs),
}

/// Arguments for `debate-forge run`.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Debate topic. Read from stdin when omitted.
    #[arg(short, long)]
    pub topic: Option<String>,

    /// YAML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Run seed; overrides the configuration.
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Where to write the JSON record; used verbatim.
    #[arg(long)]
    pub log_path: Option<PathBuf>,

    /// Number of turns; overrides the configuration.
    #[arg(short = 'r', long)]
    pub max_rounds: Option<usize>,

    /// Generate arguments from built-in templates instead of an LLM.
    #[arg(long)]
    pub offline: bool,

    /// OpenRouter API key (can also be set via OPENROUTER_API_KEY env var).
    #[arg(long, env = "OPENROUTER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Output the debate record as JSON instead of the transcript.
    #[arg(short = 'j', long)]
    pub json: bool,
}

/// Arguments for `debate-forge check-topic`.
#[derive(Parser, Debug)]
pub struct CheckTopicArgs {
    /// Topic to validate.
    pub topic: String,

    /// Output JSON.
    #[arg(short = 'j', long)]
    pub json: bool,
}

/// Arguments for `debate-forge graph`.
#[derive(Parser, Debug)]
pub struct GraphArgs {
    /// YAML configuration file supplying personas and the round limit.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write the DOT document here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Parse CLI arguments and return the Cli struct.
///
/// This allows main.rs to access CLI arguments (like log_level) before running commands.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Run the CLI by parsing arguments and executing the command.
pub async fn run() -> anyhow::Result<()> {
    run_with_cli(parse_cli()).await
}

/// Run the CLI with the parsed arguments.
pub async fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Run(args) => run_debate_command(args).await,
        Commands::CheckTopic(args) => run_check_topic_command(args),
        Commands::Graph(args) => run_graph_command(args),
    }
}

// ============================================================================
// run
// ============================================================================

/// Builds the effective configuration from the optional file and flag overrides.
fn resolve_config(args: &RunArgs) -> DebateResult<DebateConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => {
            let mut config = DebateConfig::default();
            config.log_path = stamp_log_path(&config.log_path, chrono::Local::now());
            config
        }
    };

    if let Some(max_rounds) = args.max_rounds {
        config = config.with_max_rounds(max_rounds);
    }
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if let Some(path) = &args.log_path {
        config = config.with_log_path(path);
    }

    config.validate()?;
    Ok(config)
}

/// Builds the record of a finished run and writes it to the configured path.
fn persist_record(
    outcome: &DebateOutcome,
    config: &DebateConfig,
) -> DebateResult<(DebateRecord, DebateLogWriter)> {
    let record = DebateRecord::from_state(&outcome.state, &config.personas, outcome.seed)?;
    let writer = DebateLogWriter::new(&config.log_path);
    writer.write(&record)?;
    Ok((record, writer))
}

/// Logs a fatal error with the component that raised it.
fn report(err: DebateError) -> anyhow::Error {
    error!(component = err.component(), error = %err, "Debate aborted");
    err.into()
}

fn read_topic_from_stdin() -> anyhow::Result<String> {
    eprint!("Enter debate topic: ");
    io::stderr().flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read topic from stdin")?;
    Ok(line)
}

fn build_llm_client(api_key: Option<String>) -> anyhow::Result<Arc<dyn LlmProvider>> {
    if std::env::var("LITELLM_API_BASE").is_err() {
        if let Some(key) = api_key {
            info!("Using OpenRouter with specified API key");
            return Ok(Arc::new(LiteLlmClient::new_with_defaults(key)));
        }
    }

    info!("Using LiteLLM client from environment");
    Ok(Arc::new(LiteLlmClient::from_env().map_err(|e| {
        anyhow::anyhow!(
            "Failed to initialize LLM client: {}. Please provide --api-key, set \
             OPENROUTER_API_KEY/LITELLM_API_BASE, or pass --offline.",
            e
        )
    })?))
}

fn build_generator(
    args: &RunArgs,
    config: &DebateConfig,
    seed: u64,
) -> anyhow::Result<Box<dyn TurnGenerator>> {
    if args.offline {
        info!(seed, "Using offline template generator");
        return Ok(Box::new(TemplateTurnGenerator::new(seed)));
    }

    let provider = build_llm_client(args.api_key.clone())?;
    Ok(Box::new(LlmTurnGenerator::new(provider, config.generator_config())))
}

fn print_transcript(outcome: &DebateOutcome, config: &DebateConfig) {
    let state = &outcome.state;
    println!("\n=== Debate: {} ===", state.topic);
    println!("Seed: {}\n", outcome.seed);

    for turn in &state.turns {
        println!(
            "[Round {}] {}:\n{}\n",
            turn.round,
            config.personas.get(turn.actor).name,
            turn.text
        );
    }

    println!("{}", state.judgment);
}

async fn run_debate_command(args: RunArgs) -> anyhow::Result<()> {
    let config = resolve_config(&args).map_err(report)?;
    let seed = resolve_seed(config.seed);

    let raw_topic = match &args.topic {
        Some(topic) => topic.clone(),
        None => read_topic_from_stdin()?,
    };

    let generator = build_generator(&args, &config, seed)?;
    let mut orchestrator = DebateOrchestrator::new(config.debate_settings(seed), generator);

    let outcome = orchestrator.run(&raw_topic).await.map_err(report)?;
    let (record, writer) = persist_record(&outcome, &config).map_err(report)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    print_transcript(&outcome, &config);
    println!("\nLog written:");
    println!("  JSON: {}", writer.json_path().display());
    println!("  Text: {}", writer.text_path().display());
    Ok(())
}

// ============================================================================
// check-topic
// ============================================================================

#[derive(Debug, Serialize)]
struct CheckTopicOutput {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    original_length: usize,
}

fn run_check_topic_command(args: CheckTopicArgs) -> anyhow::Result<()> {
    let result = validate_topic(&args.topic);

    if args.json {
        let output = CheckTopicOutput {
            valid: result.is_ok(),
            topic: result.as_ref().ok().map(|t| t.as_str().to_string()),
            error: result.as_ref().err().map(|e| e.to_string()),
            original_length: args.topic.chars().count(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    }

    let topic = result.context("Topic rejected")?;
    if !args.json {
        println!("{}", topic);
    }
    Ok(())
}

// ============================================================================
// graph
// ============================================================================

fn run_graph_command(args: GraphArgs) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => load_config(path).map_err(|e| report(e.into()))?,
        None => DebateConfig::default(),
    };
    let dot = workflow_dot(&config.debate_settings(config.seed.unwrap_or_default()));

    match &args.output {
        Some(path) => {
            std::fs::write(path, &dot)
                .with_context(|| format!("Failed to write graph to {}", path.display()))?;
            info!(path = %path.display(), "Workflow graph written");
        }
        None => print!("{}", dot),
    }
    Ok(())
}
