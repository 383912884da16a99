use std::time::Instant;

use hashbrown::HashMap;
use rayon::prelude::*;

use crate::io::{ItemId, Rating, UserId};
use crate::ratings::{ItemIndex, RatingStore};
use crate::stopwatch::UserDurationMicros;
use crate::usercf::similarity::SimilarityEngine;

pub mod similarity;

/// Lower and upper bound of the rating scale predictions are clamped to.
#[derive(Clone, Copy, Debug)]
pub struct RatingBounds {
    pub floor: Rating,
    pub ceiling: Rating,
}

/// Predicted ratings for every (user, item) cell of a test split, plus the
/// number of cells where the weighted average was degenerate and the global
/// mean was used instead.
#[derive(Debug, Default, PartialEq)]
pub struct PredictionTable {
    pub(crate) predictions: HashMap<UserId, HashMap<ItemId, Rating>>,
    pub(crate) qty_degenerate_fallbacks: usize,
}

impl PredictionTable {
    pub fn prediction(&self, user_id: UserId, item_id: ItemId) -> Option<Rating> {
        self.predictions.get(&user_id)?.get(&item_id).copied()
    }

    pub fn qty_predictions(&self) -> usize {
        self.predictions.values().map(|items| items.len()).sum()
    }

    pub fn qty_degenerate_fallbacks(&self) -> usize {
        self.qty_degenerate_fallbacks
    }

    pub fn iter(&self) -> impl Iterator<Item = (UserId, ItemId, Rating)> + '_ {
        self.predictions.iter().flat_map(|(user_id, items)| {
            items
                .iter()
                .map(move |(item_id, rating)| (*user_id, *item_id, *rating))
        })
    }
}

/// Outcome of predicting a single (user, item) cell.
pub enum Prediction {
    /// Similarity-weighted average over training users, not yet clamped.
    Weighted(Rating),
    /// No training user rated the item.
    Unrated,
    /// Training users rated the item but their similarity weights sum to
    /// exactly zero, leaving the weighted average undefined.
    DegenerateWeight,
}

/// Raw prediction of one test cell: the similarity-weighted average of the
/// ratings that training users gave this item.
///
/// Weights enter the denominator signed, not as absolute values. Negatively
/// correlated raters push the prediction away from their own rating;
/// absolute-value weighting measurably degrades accuracy.
pub fn predict_one(
    train: &RatingStore,
    item_index: &ItemIndex,
    engine: &SimilarityEngine,
    user_id: UserId,
    item_id: ItemId,
    center: Rating,
) -> Prediction {
    let raters = match item_index.users_for_item(item_id) {
        Some(raters) => raters,
        None => return Prediction::Unrated,
    };

    let mut weighted_sum = 0.0;
    let mut weight_sum = 0.0;
    for rater in raters {
        let weight = engine.similarity(train, user_id, *rater, center);
        if let Some(rating) = train.rating(*rater, item_id) {
            weighted_sum += weight * rating;
            weight_sum += weight;
        }
    }

    if weight_sum == 0.0 {
        return Prediction::DegenerateWeight;
    }
    Prediction::Weighted(weighted_sum / weight_sum)
}

/// Clamps a raw prediction onto the rating scale. Values outside the bounds
/// are clamped without rounding; values inside (bounds included) round to
/// the nearest integer, ties away from zero (`f64::round`).
pub fn clamp_or_round(raw: Rating, bounds: &RatingBounds) -> Rating {
    if raw < bounds.floor {
        bounds.floor
    } else if raw > bounds.ceiling {
        bounds.ceiling
    } else {
        raw.round()
    }
}

/// Fills the prediction table for every (user, item) cell of the test split.
///
/// Cells whose item never occurs in training get the raw `center` value,
/// unrounded and unclamped. Cells with a degenerate zero weight sum also
/// fall back to the raw `center` and are counted on the returned table.
///
/// Test users are processed in parallel; the similarity cache behind
/// `engine` is the only shared state and recomputes deterministic values on
/// lost updates. Per-user wall-clock durations are returned alongside the
/// table for latency reporting.
pub fn predict_all(
    train: &RatingStore,
    test: &RatingStore,
    item_index: &ItemIndex,
    engine: &SimilarityEngine,
    center: Rating,
    bounds: &RatingBounds,
) -> (PredictionTable, Vec<UserDurationMicros>) {
    let test_users: Vec<UserId> = test.users().collect();

    let per_user: Vec<(UserId, HashMap<ItemId, Rating>, usize, f64)> = test_users
        .into_par_iter()
        .map(|user_id| {
            let started = Instant::now();
            let mut user_predictions = HashMap::new();
            let mut qty_fallbacks = 0_usize;
            if let Some(test_items) = test.ratings_of(user_id) {
                for item_id in test_items.keys() {
                    let predicted =
                        match predict_one(train, item_index, engine, user_id, *item_id, center) {
                            Prediction::Weighted(raw) => clamp_or_round(raw, bounds),
                            Prediction::Unrated => center,
                            Prediction::DegenerateWeight => {
                                qty_fallbacks += 1;
                                center
                            }
                        };
                    user_predictions.insert(*item_id, predicted);
                }
            }
            let duration_as_micros = started.elapsed().as_micros() as f64;
            (user_id, user_predictions, qty_fallbacks, duration_as_micros)
        })
        .collect();

    let mut predictions = HashMap::with_capacity(per_user.len());
    let mut qty_degenerate_fallbacks = 0;
    let mut durations = Vec::with_capacity(per_user.len());
    for (user_id, user_predictions, qty_fallbacks, duration_as_micros) in per_user {
        predictions.insert(user_id, user_predictions);
        qty_degenerate_fallbacks += qty_fallbacks;
        durations.push((user_id, duration_as_micros));
    }

    (
        PredictionTable {
            predictions,
            qty_degenerate_fallbacks,
        },
        durations,
    )
}

/// The trivial baseline: predict the global mean for every test cell.
pub fn baseline_all(test: &RatingStore, center: Rating) -> PredictionTable {
    let mut predictions = HashMap::with_capacity(test.qty_users());
    for user_id in test.users() {
        if let Some(test_items) = test.ratings_of(user_id) {
            let user_predictions = test_items.keys().map(|item_id| (*item_id, center)).collect();
            predictions.insert(user_id, user_predictions);
        }
    }
    PredictionTable {
        predictions,
        qty_degenerate_fallbacks: 0,
    }
}
