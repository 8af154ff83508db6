//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves settings and starts logging
//! - loads the model artifact
//! - scores one applicant or a CSV batch
//! - prints reports and writes optional exports

use std::path::Path;

use clap::Parser;
use serde::Serialize;
use tracing::info;

use crate::cli::{BatchArgs, Command, SampleArgs, ScoreArgs};
use crate::config::Settings;
use crate::data::SampleConfig;
use crate::domain::ApplicationInput;
use crate::error::{AppError, EXIT_IO};
use crate::io::artifact::load_configured;
use crate::models::ModelParameters;
use crate::scoring::{Assessment, Explanation, ScoringPipeline};

pub mod batch;

/// How many rejected rows `batch` lists unless `--all-rejects` is given.
const REJECT_PREVIEW: usize = 10;

/// Entry point for the `credit` binary.
pub fn run() -> Result<(), AppError> {
    // `credit` and `credit --income 900000` should behave like `credit score ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    let settings = Settings::load()?.with_model_override(cli.model);
    crate::telemetry::init(&settings.log_level)?;

    match cli.command {
        Command::Score(args) => handle_score(&settings, &args),
        Command::Batch(args) => handle_batch(&settings, &args),
        Command::Sample(args) => handle_sample(&args),
        Command::Inspect => handle_inspect(&settings),
    }
}

fn load_model(settings: &Settings) -> Result<ModelParameters, AppError> {
    Ok(load_configured(settings.model_path.as_deref())?)
}

#[derive(Debug, Serialize)]
struct ScoreReport<'a> {
    model: &'a str,
    input: &'a ApplicationInput,
    #[serde(flatten)]
    assessment: &'a Assessment,
    #[serde(skip_serializing_if = "Option::is_none")]
    explanation: Option<&'a Explanation>,
}

fn handle_score(settings: &Settings, args: &ScoreArgs) -> Result<(), AppError> {
    let params = load_model(settings)?;
    let pipeline = ScoringPipeline::new(&params);

    let input = args.to_input();
    let applicant = input.validate()?;
    let assessment = pipeline.assess(&applicant)?;
    let explanation = if args.explain {
        Some(pipeline.explain(&applicant)?)
    } else {
        None
    };

    if args.json {
        let report = ScoreReport {
            model: params.name(),
            input: &input,
            assessment: &assessment,
            explanation: explanation.as_ref(),
        };
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| AppError::new(EXIT_IO, format!("Failed to serialize assessment: {e}")))?;
        println!("{json}");
        return Ok(());
    }

    println!("{}", crate::report::format_assessment(&input, &assessment));
    if let Some(explanation) = &explanation {
        println!("{}", crate::report::format_explanation(explanation));
    }
    Ok(())
}

fn handle_batch(settings: &Settings, args: &BatchArgs) -> Result<(), AppError> {
    let params = load_model(settings)?;
    let pipeline = ScoringPipeline::new(&params);

    let ingested = crate::io::ingest::load_applications(&args.input)?;
    let output = batch::score_batch(&pipeline, ingested);

    println!("{}", crate::report::format_batch_summary(&output.summary));

    let limit = if args.all_rejects { None } else { Some(REJECT_PREVIEW) };
    let rejections = crate::report::format_rejections(&output.rejected, limit);
    if !rejections.is_empty() {
        println!("{rejections}");
    }

    if let Some(path) = &args.output {
        crate::io::export::write_results_csv(path, &output.scored)?;
        info!(path = %path.display(), rows = output.scored.len(), "wrote scored applications");
    }
    Ok(())
}

fn handle_sample(args: &SampleArgs) -> Result<(), AppError> {
    let config = SampleConfig {
        count: args.count,
        seed: args.seed,
    };
    let records = crate::data::generate_applications(&config)?;

    match args.output.as_deref() {
        Some(path) => write_sample_file(path, &records),
        None => crate::io::export::write_applications(std::io::stdout().lock(), &records),
    }
}

fn write_sample_file(path: &Path, records: &[crate::io::ingest::ApplicationRecord]) -> Result<(), AppError> {
    crate::io::export::write_applications_csv(path, records)?;
    info!(path = %path.display(), rows = records.len(), "wrote sample applications");
    Ok(())
}

fn handle_inspect(settings: &Settings) -> Result<(), AppError> {
    let params = load_model(settings)?;
    match &settings.model_path {
        Some(path) => println!("Artifact: {}", path.display()),
        None => println!("Artifact: built-in illustrative model"),
    }
    println!("{}", crate::report::format_model_summary(&params));
    Ok(())
}

const SUBCOMMANDS: [&str; 5] = ["score", "batch", "sample", "inspect", "help"];

/// Rewrite argv so `credit` defaults to `credit score`.
///
/// Rules:
/// - `credit`                          -> `credit score`
/// - `credit --income 900000 ...`      -> `credit score --income 900000 ...`
/// - `credit --model m.json batch ...` -> unchanged (a subcommand is named)
/// - `credit --help/--version/-h`      -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("score".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version");
    if is_top_level_help_or_version {
        return argv;
    }

    let names_subcommand = argv[1..].iter().any(|a| SUBCOMMANDS.contains(&a.as_str()));
    if names_subcommand {
        return argv;
    }

    // A leading flag means "score flags".
    if arg1.starts_with('-') {
        argv.insert(1, "score".to_string());
        return argv;
    }

    argv
}
