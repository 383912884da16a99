use std::path::Path;

use anyhow::Context;
use itertools::Itertools;
use serde_derive::Serialize;

use nocturne::config::AppConfig;
use nocturne::datasetutils;
use nocturne::io;
use nocturne::io::{ItemId, Rating, UserId};
use nocturne::metrics::evaluation_reporter::EvaluationReporter;
use nocturne::metrics::score_predictions;
use nocturne::ratings::{ItemIndex, RatingStore};
use nocturne::stopwatch::Stopwatch;
use nocturne::usercf;
use nocturne::usercf::similarity::SimilarityEngine;
use nocturne::usercf::{PredictionTable, RatingBounds};

fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1).unwrap_or_default();
    let config = AppConfig::new(config_path);

    let training_data_path = &config.data.training_data_path;
    let test_data_path = &config.data.test_data_path;
    if !Path::new(training_data_path).is_file() {
        anyhow::bail!("Training data file does not exist: {}", training_data_path);
    }
    if !Path::new(test_data_path).is_file() {
        anyhow::bail!("Test data file does not exist: {}", test_data_path);
    }
    println!("training_data_file:{}", training_data_path);
    println!("test_data_file:{}", test_data_path);

    let training_events = io::read_rating_events(training_data_path)?;
    let test_events = io::read_rating_events(test_data_path)?;

    if config.log.verbose {
        datasetutils::determine_dataset_statistics("training split", &training_events)?;
        datasetutils::determine_dataset_statistics("test split", &test_events)?;
    }

    let train_store = RatingStore::from_events(&training_events);
    let item_index = ItemIndex::from_events(&training_events);
    let test_store = RatingStore::from_events(&test_events);

    let center = train_store.mean_rating()?;
    let bounds = RatingBounds {
        floor: config.model.rating_floor,
        ceiling: config.model.rating_ceiling,
    };
    let engine = SimilarityEngine::new();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.evaluation.num_workers)
        .build()
        .context("cannot build the prediction thread pool")?;
    let (predictions, durations) = pool.install(|| {
        usercf::predict_all(&train_store, &test_store, &item_index, &engine, center, &bounds)
    });

    let mut stopwatch = Stopwatch::new();
    for (user_id, duration_as_micros) in durations {
        stopwatch.record(user_id, duration_as_micros);
    }

    let baseline = usercf::baseline_all(&test_store, center);

    let mut baseline_reporter = EvaluationReporter::new();
    score_predictions(&mut baseline_reporter, &baseline, &test_store)?;
    let mut model_reporter = EvaluationReporter::new();
    score_predictions(&mut model_reporter, &predictions, &test_store)?;

    if !config.evaluation.predictions_path.is_empty() {
        write_predictions(&config.evaluation.predictions_path, &predictions, &test_store)?;
        println!("predictions_file:{}", &config.evaluation.predictions_path);
    }

    println!("===============================================================");
    println!("===               START EVALUATING TEST FILE               ====");
    println!("===============================================================");
    println!("{}", model_reporter.get_name());
    println!("baseline by guessing mean: {}", baseline_reporter.result());
    println!("model: {}", model_reporter.result());
    println!("baseline rmse: {:.4}", baseline_reporter.rmse());
    println!("model rmse: {:.4}", model_reporter.rmse());
    println!("Qty predictions: {}", predictions.qty_predictions());
    println!(
        "Qty degenerate-weight fallbacks: {}",
        predictions.qty_degenerate_fallbacks()
    );
    println!("Qty cached similarities: {}", engine.qty_cached());
    println!("Qty test users: {}", stopwatch.get_n());
    println!("Prediction latency per test user");
    println!("p90 (microseconds): {}", stopwatch.get_percentile_in_micros(0.90));
    println!("p95 (microseconds): {}", stopwatch.get_percentile_in_micros(0.95));
    println!("p99.5 (microseconds): {}", stopwatch.get_percentile_in_micros(0.995));

    Ok(())
}

#[derive(Serialize)]
struct PredictionRecord {
    user_id: UserId,
    item_id: ItemId,
    predicted: Rating,
    actual: Rating,
}

/// Dumps the prediction table as tab-separated records, sorted by user and
/// item for reproducible output.
fn write_predictions(
    out_path: &str,
    predictions: &PredictionTable,
    test_store: &RatingStore,
) -> anyhow::Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(out_path)
        .with_context(|| format!("cannot write predictions to {}", out_path))?;

    let sorted_rows = predictions
        .iter()
        .sorted_by_key(|(user_id, item_id, _predicted)| (*user_id, *item_id));
    for (user_id, item_id, predicted) in sorted_rows {
        let actual = test_store.rating(user_id, item_id).unwrap_or(f64::NAN);
        writer.serialize(PredictionRecord {
            user_id,
            item_id,
            predicted,
            actual,
        })?;
    }
    writer.flush()?;
    Ok(())
}
