//! Command implementations for the moodlens CLI.

use std::sync::Arc;

use tracing::info;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::TrainingConfig;
use crate::error::Result;
use crate::feedback::{FeedbackService, FileFeedbackStore};
use crate::model::{DEFAULT_LABEL, InferenceService, TrainingPipeline};

/// Execute a CLI command.
pub fn execute_command(args: MoodlensArgs) -> Result<()> {
    match &args.command {
        Command::Train(train_args) => train(train_args, &args),
        Command::Predict(predict_args) => predict(predict_args, &args),
        Command::Submit(submit_args) => submit(submit_args, &args),
        Command::Stats(stats_args) => stats(stats_args, &args),
    }
}

/// Train and save a model.
fn train(args: &TrainArgs, cli_args: &MoodlensArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => TrainingConfig::from_file(path)?,
        None => TrainingConfig::default(),
    };
    if let Some(output) = &args.output {
        config.artifact_path = output.clone();
    }

    info!(corpus = %args.corpus.display(), "starting training");
    let report = TrainingPipeline::new(config)?.run(&args.corpus)?;

    output_result("Training finished", &report, cli_args)
}

/// Classify comments with a stored model.
fn predict(args: &PredictArgs, cli_args: &MoodlensArgs) -> Result<()> {
    let service = InferenceService::from_path(&args.model);

    let predictions = args
        .texts
        .iter()
        .map(|text| match service.predict_detailed(text) {
            Some(prediction) => PredictionRow {
                text: text.clone(),
                label: prediction.label,
                confidence: Some(prediction.confidence),
            },
            None => PredictionRow {
                text: text.clone(),
                label: DEFAULT_LABEL.to_string(),
                confidence: None,
            },
        })
        .collect();

    output_result(
        "Predictions",
        &PredictionResults {
            model_loaded: !service.is_degraded(),
            predictions,
        },
        cli_args,
    )
}

/// Label and store one comment.
fn submit(args: &SubmitArgs, cli_args: &MoodlensArgs) -> Result<()> {
    let store = Arc::new(FileFeedbackStore::open(&args.store)?);
    let service = FeedbackService::new(InferenceService::from_path(&args.model), store);

    let record = service.submit(&args.username, &args.comment, args.rating)?;
    output_result("Feedback recorded", &record, cli_args)
}

/// Show dashboard statistics.
fn stats(args: &StatsArgs, cli_args: &MoodlensArgs) -> Result<()> {
    let store = Arc::new(FileFeedbackStore::open(&args.store)?);
    let service = FeedbackService::new(InferenceService::new(None), store);

    let mut dashboard = service.dashboard()?;
    if let Some(limit) = args.limit {
        dashboard.reviews.truncate(limit);
    }
    output_result("Dashboard", &dashboard, cli_args)
}
