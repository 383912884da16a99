use chrono::NaiveDateTime;
use rayon::prelude::*;

use crate::error::NocturneError;
use crate::io::{ItemId, RatingEvent, UserId};

#[derive(Debug)]
pub struct DatasetStats {
    pub descriptive_name: String,
    pub qty_ratings: usize,
    pub qty_unique_users: usize,
    pub qty_unique_items: usize,
    pub mean_rating: f64,
    pub density: f64,
    pub min_time_date_time: NaiveDateTime,
    pub max_time_date_time: NaiveDateTime,
}

/// Computes and prints descriptive statistics for one dataset split.
pub fn determine_dataset_statistics(
    descriptive_name: &str,
    rating_events: &[RatingEvent],
) -> Result<DatasetStats, NocturneError> {
    if rating_events.is_empty() {
        return Err(NocturneError::EmptyDataset("rating events"));
    }
    let qty_ratings = rating_events.len();

    let mut user_ids: Vec<UserId> = rating_events
        .into_par_iter()
        .map(|(user_id, _item_id, _rating, _time)| *user_id)
        .collect();
    user_ids.par_sort_unstable();
    user_ids.dedup();
    let qty_unique_users = user_ids.len();

    let mut item_ids: Vec<ItemId> = rating_events
        .into_par_iter()
        .map(|(_user_id, item_id, _rating, _time)| *item_id)
        .collect();
    item_ids.par_sort_unstable();
    item_ids.dedup();
    let qty_unique_items = item_ids.len();

    let sum_of_ratings: f64 = rating_events
        .par_iter()
        .map(|(_user_id, _item_id, rating, _time)| *rating)
        .sum();
    let mean_rating = sum_of_ratings / qty_ratings as f64;
    let density = qty_ratings as f64 / (qty_unique_users as f64 * qty_unique_items as f64);

    let min_time = rating_events
        .par_iter()
        .map(|(_user_id, _item_id, _rating, time)| *time)
        .min()
        .unwrap_or_default();
    let max_time = rating_events
        .par_iter()
        .map(|(_user_id, _item_id, _rating, time)| *time)
        .max()
        .unwrap_or_default();
    let min_time_date_time = NaiveDateTime::from_timestamp(min_time as i64, 0);
    let max_time_date_time = NaiveDateTime::from_timestamp(max_time as i64, 0);

    println!("Loaded {}", descriptive_name);
    println!("\tRatings: {}", qty_ratings);
    println!("\tUsers: {}", qty_unique_users);
    println!("\tItems: {}", qty_unique_items);
    println!("\tMean rating: {:.4}", mean_rating);
    println!("\tDensity: {:.6}", density);
    println!("\tSpan: {} / {}", min_time_date_time, max_time_date_time);

    Ok(DatasetStats {
        descriptive_name: descriptive_name.to_string(),
        qty_ratings,
        qty_unique_users,
        qty_unique_items,
        mean_rating,
        density,
        min_time_date_time,
        max_time_date_time,
    })
}
