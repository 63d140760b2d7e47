//! BiLD translation evaluation launcher
//!
//! The `run-bild-translation` command validates a translation evaluation
//! run and hands it to the evaluation pipeline:
//!
//! ```text
//! run-bild-translation --model bild --large t5-large --small t5-small \
//!     --dataset_name wmt14 --dataset_config de-en \
//!     --source_lang de --target_lang en --bild_fallback_threshold 0.6
//! ```
//!
//! The launcher exits with the pipeline's own exit status.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use bild_launch::plan::{DEFAULT_ENTRY_SCRIPT, DEFAULT_INTERPRETER};
use bild_launch::{
    execute, validate, DatasetName, EntryPoint, LaunchOutcome, LaunchPlan, RunParameters,
};
use clap::{Parser, ValueEnum};
use serde_json::json;
use tracing::{info, Level};

#[derive(Parser, Debug)]
#[command(name = "run-bild-translation")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Launch a BiLD translation evaluation run", long_about = None)]
struct Cli {
    /// Model name or path, or `bild` for big-little decoding
    #[arg(long)]
    model: String,

    /// Large model (required with --model bild)
    #[arg(long)]
    large: Option<String>,

    /// Small model (required with --model bild)
    #[arg(long)]
    small: Option<String>,

    /// Model name or path to initialize the small model's decoder with
    #[arg(long = "initialize_decoder_small_with")]
    initialize_decoder_small_with: Option<String>,

    /// Evaluation corpus
    #[arg(long = "dataset_name", value_enum)]
    dataset_name: DatasetArg,

    /// Dataset configuration (e.g. de-en)
    #[arg(long = "dataset_config")]
    dataset_config: String,

    /// Source language code
    #[arg(long = "source_lang")]
    source_lang: String,

    /// Target language code
    #[arg(long = "target_lang")]
    target_lang: String,

    /// BiLD fallback threshold
    #[arg(long = "bild_fallback_threshold")]
    bild_fallback_threshold: Option<f64>,

    /// BiLD rollback threshold
    #[arg(long = "bild_rollback_threshold")]
    bild_rollback_threshold: Option<f64>,

    /// Interpreter running the evaluation pipeline
    #[arg(long, env = "BILD_PYTHON", default_value = DEFAULT_INTERPRETER)]
    python: String,

    /// Evaluation pipeline entry point
    #[arg(long, env = "BILD_ENTRY_POINT", default_value = DEFAULT_ENTRY_SCRIPT)]
    entry_point: PathBuf,

    /// Print the launch plan without running it
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines (and a JSON plan with --dry-run)
    #[arg(long)]
    json: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum DatasetArg {
    #[value(name = "wmt14")]
    Wmt14,
    #[value(name = "iwslt2017")]
    Iwslt2017,
}

impl From<DatasetArg> for DatasetName {
    fn from(arg: DatasetArg) -> Self {
        match arg {
            DatasetArg::Wmt14 => DatasetName::Wmt14,
            DatasetArg::Iwslt2017 => DatasetName::Iwslt2017,
        }
    }
}

impl Cli {
    fn run_parameters(&self) -> RunParameters {
        RunParameters {
            model: self.model.clone(),
            large_model: self.large.clone(),
            small_model: self.small.clone(),
            decoder_init_source: self.initialize_decoder_small_with.clone(),
            dataset_name: self.dataset_name.into(),
            dataset_config: self.dataset_config.clone(),
            source_lang: self.source_lang.clone(),
            target_lang: self.target_lang.clone(),
            fallback_threshold: self.bild_fallback_threshold,
            rollback_threshold: self.bild_rollback_threshold,
        }
    }

    fn entry_point(&self) -> EntryPoint {
        EntryPoint::new(self.python.clone(), self.entry_point.clone())
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    bild_launch::init_tracing(cli.json, level);

    let config = validate(cli.run_parameters()).context("Invalid run configuration")?;
    let plan = LaunchPlan::from_config(&cli.entry_point(), &config);

    info!(
        model = %config.model(),
        dataset = %config.dataset_name(),
        direction = %format!("{}->{}", config.source_lang(), config.target_lang()),
        bild = config.is_bild(),
        "Run configuration validated"
    );

    if cli.dry_run {
        println!("{}", render_plan(&plan, config.params(), cli.json)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!("{}", render_plan(&plan, config.params(), false)?);

    let outcome = execute(&plan)
        .await
        .context("Failed to run the evaluation pipeline")?;

    Ok(exit_code(&outcome))
}

/// Render the plan for stdout.
///
/// Text form lists the command line one quoted token per line; JSON form is
/// a document with the run `parameters` and the full `plan`.
fn render_plan(plan: &LaunchPlan, params: &RunParameters, json: bool) -> Result<String> {
    if json {
        let doc = json!({ "parameters": params, "plan": plan });
        return Ok(serde_json::to_string_pretty(&doc)?);
    }

    let mut out = String::from("[\n");
    for token in plan.command_line() {
        out.push_str(&format!("  {:?},\n", token));
    }
    out.push(']');
    Ok(out)
}

/// Mirror the child's exit status.
fn exit_code(outcome: &LaunchOutcome) -> ExitCode {
    ExitCode::from(status_byte(outcome))
}

fn status_byte(outcome: &LaunchOutcome) -> u8 {
    u8::try_from(outcome.process_exit_code()).unwrap_or(1)
}
