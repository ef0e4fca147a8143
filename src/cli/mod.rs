// ============================================================
// Layer 1 - CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and hands off to Layer 2. The only
// layer that prints to stdout.

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, PredictArgs, TrainArgs};

use crate::domain::prediction::{PredictError, PredictionRequest};

/// Sample URLs used when `predict` is run without arguments.
const DEFAULT_URLS: &[&str] = &[
    "http://www.google.com",
    "https://github.com",
    "http://example-malicious-site.com/login",
    "http://secure-update-banking.com",
    "http://localhost/admin/config.php",
];

#[derive(Parser, Debug)]
#[command(
    name = "url-guard",
    version,
    about = "Train and run a character-level CNN that flags defacement URLs."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)   => run_train(args),
            Commands::Predict(args) => run_predict(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting training on corpus '{}'", args.corpus);
    let report = TrainUseCase::new(args.into()).execute()?;

    println!("Balanced rows per class: {}", report.per_class);
    println!(
        "Rows: {} train / {} validation / {} test, vocabulary size {}",
        report.train_rows, report.val_rows, report.test_rows, report.vocab_size,
    );
    println!("Test Accuracy: {:.2}%", report.test.accuracy * 100.0);
    println!("Test Loss: {:.4}", report.test.loss);
    println!("Training complete. Model and vocabulary saved.");
    Ok(())
}

fn run_predict(args: PredictArgs) -> Result<()> {
    use crate::application::predict_use_case::ModelContext;

    // Loading happens once, before any URL is looked at
    let ctx = ModelContext::load(&args.artifact_dir).map_err(|e| {
        tracing::error!("Cannot load artifacts from '{}': {:#}", args.artifact_dir, e);
        PredictError::NotLoaded
    })?;

    let urls: Vec<String> = if args.urls.is_empty() {
        DEFAULT_URLS.iter().map(|s| s.to_string()).collect()
    } else {
        args.urls
    };

    for url in urls {
        match ctx.predict(&PredictionRequest::new(url.clone())) {
            Ok(res) if args.json => println!("{}", serde_json::to_string(&res)?),
            Ok(res) => {
                println!("URL: {}", res.url);
                println!("Prediction Score: {:.4} -> {}\n", res.prediction_score, res.label);
            }
            Err(e) if e.is_client_error() => {
                tracing::warn!("Rejected '{}': {}", url, e);
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}
