//! Output formatting for CLI commands.

use serde::Serialize;

use crate::cli::args::{MoodlensArgs, OutputFormat};
use crate::error::Result;
use crate::feedback::{Dashboard, FeedbackRecord};
use crate::model::TrainingReport;

/// One classified comment.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionRow {
    pub text: String,
    pub label: String,
    /// Absent when the default label was used.
    pub confidence: Option<f64>,
}

/// Result structure for prediction.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionResults {
    pub model_loaded: bool,
    pub predictions: Vec<PredictionRow>,
}

/// Human-readable rendering of a command result.
pub trait HumanOutput: Serialize {
    fn print_human(&self);
}

/// Output a result in the requested format.
pub fn output_result<T: HumanOutput>(message: &str, result: &T, args: &MoodlensArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            if args.verbosity() > 1 {
                println!("{message}");
                println!();
            }
            result.print_human();
            Ok(())
        }
        OutputFormat::Json => output_json(result, args),
    }
}

fn output_json<T: Serialize>(result: &T, args: &MoodlensArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    println!("{json}");
    Ok(())
}

impl HumanOutput for TrainingReport {
    fn print_human(&self) {
        println!("Model trained successfully.");
        println!("═══════════════════════════");
        println!("Artifact: {}", self.artifact_path.display());
        println!("Training rows: {}", self.rows);
        if self.dropped_rows > 0 {
            println!("Dropped rows: {}", self.dropped_rows);
        }
        println!(
            "Features: {} word + {} char",
            self.word_features, self.char_features
        );
        println!(
            "Iterations: {}{}",
            self.training.iterations,
            if self.training.converged {
                ""
            } else {
                " (limit reached)"
            }
        );
        println!("Final loss: {:.6}", self.training.final_loss);
        println!();
        println!("Labels:");
        println!("───────");
        for (label, count) in &self.label_counts {
            println!("  {label} ({count})");
        }
    }
}

impl HumanOutput for PredictionResults {
    fn print_human(&self) {
        for row in &self.predictions {
            match row.confidence {
                Some(confidence) => println!("{} ({:.2})\t{}", row.label, confidence, row.text),
                None => println!("{}\t{}", row.label, row.text),
            }
        }
    }
}

impl HumanOutput for FeedbackRecord {
    fn print_human(&self) {
        println!("Recorded feedback #{}: {}", self.id, self.sentiment);
    }
}

impl HumanOutput for Dashboard {
    fn print_human(&self) {
        println!("Feedback Statistics:");
        println!("════════════════════");
        println!("Total reviews: {}", self.stats.total_count);
        println!("Average rating: {:.1}", self.stats.average_rating);
        println!("Dominant emotion: {}", self.stats.dominant_sentiment);

        if !self.reviews.is_empty() {
            println!();
            println!("Recent reviews:");
            println!("───────────────");
            for review in &self.reviews {
                println!(
                    "#{} {} [{}] {}/5 {}: {}",
                    review.id,
                    review.created_at.format("%Y-%m-%d %H:%M"),
                    review.sentiment,
                    review.rating,
                    review.username,
                    review.comment
                );
            }
        }
    }
}
