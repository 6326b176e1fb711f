use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use serde_json::{Map, Value};

use placard::config::Config;
use placard::inference::huggingface::HfClient;
use placard::inference::params::ModelConfig;
use placard::output::terminal;
use placard::pipeline::labeler::{label_topics, RunOptions};
use placard::pipeline::policy::InteractivePolicy;
use placard::prompt::{build_prompt, PromptSpec, PromptStyle};
use placard::terms::input::{StmWeighting, TermInput};
use placard::terms::normalize::normalize;

/// Placard: LLM-assisted labeling for topic models.
///
/// Reads the top terms of each topic from a JSON file, asks a hosted
/// language model for a short label per topic, and prints the results.
#[derive(Parser)]
#[command(name = "placard", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Label topics by querying a hosted language model
    Label {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        prompt: PromptArgs,

        /// Model id on the inference API (default: PLACARD_MODEL env var,
        /// falling back to Mixtral-8x7B-Instruct)
        #[arg(long)]
        model: Option<String>,

        /// Generation parameter override as key=value (repeatable)
        #[arg(long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,

        /// Minutes of accumulated waiting before asking whether to keep
        /// waiting on rate limits (0 = ask on the first rate limit)
        #[arg(long, default_value = "0")]
        max_wait: u64,

        /// Disable the progress bar
        #[arg(long)]
        no_progress: bool,

        /// Write the full run record as JSON to this path
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Print the prompts that would be sent, without calling the model
    Prompts {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        prompt: PromptArgs,
    },
}

#[derive(Args)]
struct InputArgs {
    /// JSON file holding the topic terms (array of term lists, flat term
    /// array, token/probability records, or an STM labeled-matrix object)
    #[arg(long)]
    input: PathBuf,

    /// Which STM labeled matrix to use: prob, frex, lift or score
    #[arg(long, default_value = "prob")]
    weighting: String,

    /// Treat an array-of-arrays input as a term matrix with one topic
    /// per column instead of one term list per topic
    #[arg(long)]
    columns: bool,
}

#[derive(Args)]
struct PromptArgs {
    /// Prompt style: json, plain or json-roles
    #[arg(long, default_value = "json")]
    style: String,

    /// Background context mentioned in every prompt
    #[arg(long, default_value = "")]
    context: String,

    /// Separator used to join a topic's terms
    #[arg(long, default_value = "; ")]
    separator: String,

    /// Maximum label length in words
    #[arg(long, default_value = "5")]
    max_words: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("placard=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Label {
            input,
            prompt,
            model,
            params,
            max_wait,
            no_progress,
            output,
        } => {
            let config = Config::load();
            let term_input = load_terms(&input)?;
            let prompt_spec = prompt_spec(&prompt)?;

            let overrides = parse_param_overrides(&params)?;
            let model_id = model.unwrap_or(config.model);
            let model_config = ModelConfig::new(model_id, &overrides, config.api_token);

            if model_config.token.is_none() {
                println!(
                    "{}",
                    "No HF_API_TOKEN set. Anonymous calls hit the free rate limit quickly."
                        .yellow()
                );
            }

            let options = RunOptions {
                prompt_spec,
                model: model_config,
                max_wait_minutes: max_wait,
                progress: !no_progress,
                ..RunOptions::default()
            };

            let client = HfClient::new(&config.api_url);
            let record = label_topics(&client, &InteractivePolicy, term_input, &options).await?;

            terminal::display_labels(&record);

            if let Some(path) = output {
                let json = serde_json::to_string_pretty(&record)?;
                std::fs::write(&path, json)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("Run record written to {}", path.display());
            }
        }

        Commands::Prompts { input, prompt } => {
            let term_input = load_terms(&input)?;
            let prompt_spec = prompt_spec(&prompt)?;

            let topics = normalize(term_input)?;
            for (i, terms) in topics.iter().enumerate() {
                println!("{}", format!("--- Topic {} ---", i + 1).bold());
                println!("{}\n", build_prompt(terms, &prompt_spec));
            }
        }
    }

    Ok(())
}

/// Read and classify the term input file.
fn load_terms(args: &InputArgs) -> Result<TermInput> {
    let weighting = StmWeighting::from_str(&args.weighting)?;
    let raw = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let value: Value = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not valid JSON", args.input.display()))?;

    let input = TermInput::from_json(&value, weighting)?;
    Ok(match input {
        TermInput::Topics(rows) if args.columns => TermInput::Matrix(rows),
        other => other,
    })
}

fn prompt_spec(args: &PromptArgs) -> Result<PromptSpec> {
    let style = PromptStyle::from_str(&args.style)?;
    Ok(PromptSpec::new(
        style,
        args.separator.clone(),
        args.context.clone(),
        args.max_words,
    )?)
}

/// Parse repeated `--param key=value` flags. Values parse as JSON where
/// possible (numbers, booleans) and fall back to plain strings.
fn parse_param_overrides(pairs: &[String]) -> Result<Map<String, Value>> {
    let mut overrides = Map::new();
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .with_context(|| format!("--param '{pair}' is not of the form key=value"))?;
        let value = serde_json::from_str(value).unwrap_or_else(|_| Value::from(value));
        overrides.insert(key.to_string(), value);
    }
    Ok(overrides)
}
