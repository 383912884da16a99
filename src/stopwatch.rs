use tdigest::TDigest;

use crate::io::UserId;

pub type UserDurationMicros = (UserId, f64);

/// Collects per-user prediction durations for the latency report at the end
/// of an evaluation run.
#[derive(Clone, Default)]
pub struct Stopwatch {
    prediction_durations: Vec<UserDurationMicros>,
}

impl Stopwatch {
    pub fn new() -> Stopwatch {
        Stopwatch {
            prediction_durations: Vec::new(),
        }
    }

    pub fn record(&mut self, user_id: UserId, duration_as_micros: f64) {
        self.prediction_durations.push((user_id, duration_as_micros));
    }

    pub fn get_n(&self) -> usize {
        self.prediction_durations.len()
    }

    /// `quantile` is a fraction, e.g. 0.95 for p95.
    pub fn get_percentile_in_micros(&self, quantile: f64) -> f64 {
        let t_digest = TDigest::new_with_size(100);
        let durations = self
            .prediction_durations
            .iter()
            .map(|tuple| tuple.1)
            .collect();
        let sorted_digest = t_digest.merge_unsorted(durations);
        sorted_digest.estimate_quantile(quantile)
    }

    pub fn get_raw_durations(&self) -> Vec<UserDurationMicros> {
        self.prediction_durations.clone()
    }
}
