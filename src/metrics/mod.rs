use crate::error::NocturneError;
use crate::metrics::evaluation_reporter::EvaluationReporter;
use crate::ratings::RatingStore;
use crate::usercf::PredictionTable;

pub mod evaluation_reporter;
pub mod mae;
pub mod rmse;

pub trait PredictionMetric {
    fn add(&mut self, predicted: f64, actual: f64);
    fn result(&self) -> f64;
    fn get_name(&self) -> String;
}

/// Feeds every ground-truth cell and its prediction into the reporter.
///
/// The predictor must have produced an entry for every ground-truth cell;
/// a hole in the table is an error, as is an empty ground truth.
pub fn score_predictions(
    reporter: &mut EvaluationReporter,
    predictions: &PredictionTable,
    ground_truth: &RatingStore,
) -> Result<(), NocturneError> {
    if ground_truth.is_empty() {
        return Err(NocturneError::EmptyDataset("ground truth"));
    }
    for user_id in ground_truth.users() {
        if let Some(items) = ground_truth.ratings_of(user_id) {
            for (item_id, actual) in items.iter() {
                let predicted = predictions.prediction(user_id, *item_id).ok_or(
                    NocturneError::MissingPrediction {
                        user: user_id,
                        item: *item_id,
                    },
                )?;
                reporter.add(predicted, *actual);
            }
        }
    }
    Ok(())
}
