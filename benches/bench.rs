//! Criterion benchmarks for moodlens.
//!
//! Covers the per-request path (normalize, extract, classify) and feedback
//! aggregation.

use std::hint::black_box;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use moodlens::analysis::normalizer::TextNormalizer;
use moodlens::feedback::FeedbackAggregator;
use moodlens::model::{Corpus, LabeledExample, ModelArtifact, TrainingPipeline};

/// Generate labeled comments for training.
fn generate_corpus(count: usize) -> Corpus {
    let words = [
        ("happy", "joy"),
        ("wonderful", "joy"),
        ("delightful", "joy"),
        ("furious", "anger"),
        ("rude", "anger"),
        ("outrageous", "anger"),
        ("lonely", "sadness"),
        ("gloomy", "sadness"),
        ("disappointed", "sadness"),
    ];
    let filler = ["the", "room", "staff", "breakfast", "view", "pool", "night"];

    let examples = (0..count)
        .map(|i| {
            let (word, label) = words[(i * 7) % words.len()];
            let text = format!(
                "{} {} was {} {}",
                filler[i % filler.len()],
                filler[(i * 3) % filler.len()],
                word,
                filler[(i * 5) % filler.len()]
            );
            LabeledExample {
                text,
                label: label.to_string(),
            }
        })
        .collect();
    Corpus::from_examples(examples)
}

fn trained_model() -> ModelArtifact {
    TrainingPipeline::default()
        .train(&generate_corpus(300))
        .expect("benchmark corpus trains")
}

/// Benchmark the inference path.
fn bench_inference(c: &mut Criterion) {
    let mut group = c.benchmark_group("inference");
    let model = trained_model();
    let normalizer = TextNormalizer::new();
    let comment = "The staff were WONDERFUL, but breakfast was a bit gloomy!!";

    group.bench_function("normalize", |b| {
        b.iter(|| black_box(normalizer.normalize(black_box(comment))))
    });

    let normalized = normalizer.normalize(comment);
    group.bench_function("extract_features", |b| {
        b.iter(|| black_box(model.extractor().transform(black_box(&normalized))))
    });

    group.bench_function("predict", |b| {
        b.iter(|| black_box(model.predict(black_box(comment))))
    });

    group.finish();
}

/// Benchmark dashboard aggregation.
fn bench_aggregation(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregation");
    let labels = ["joy", "anger", "sadness", "fear", "Neutral"];
    let records: Vec<(i64, &str)> = (0..10_000)
        .map(|i| ((i % 5 + 1) as i64, labels[i % labels.len()]))
        .collect();

    group.throughput(Throughput::Elements(records.len() as u64));
    group.bench_function("compute_10k", |b| {
        b.iter(|| black_box(FeedbackAggregator::compute(black_box(&records))))
    });

    group.finish();
}

/// Benchmark training on a small corpus.
fn bench_training(c: &mut Criterion) {
    let mut group = c.benchmark_group("training");
    group.sample_size(10);
    let corpus = generate_corpus(300);

    group.bench_function("train_300", |b| {
        b.iter(|| black_box(TrainingPipeline::default().train(black_box(&corpus))))
    });

    group.finish();
}

criterion_group!(benches, bench_inference, bench_aggregation, bench_training);
criterion_main!(benches);
