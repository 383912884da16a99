use std::sync::Mutex;

use hashbrown::HashMap;

use crate::io::{Rating, UserId};
use crate::ratings::RatingStore;

/// Memoized user-user similarity: the cosine of the two users' rating
/// vectors over their common items, centered on a fixed global constant.
///
/// Centering on a global constant instead of each user's own mean is a
/// deliberate property of the model; downstream error characteristics
/// depend on it, so it must not be replaced with per-user centering.
pub struct SimilarityEngine {
    cache: Mutex<HashMap<(UserId, UserId), f64>>,
}

impl Default for SimilarityEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SimilarityEngine {
    pub fn new() -> SimilarityEngine {
        SimilarityEngine {
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Similarity coefficient between `user_a` and `user_b`.
    ///
    /// Returns 0.0 when either user is unknown, when the users share no
    /// items, or when either centered vector has zero norm over the shared
    /// items. These degenerate zeros are indistinguishable from a computed
    /// coefficient of exactly 0.0 and both contribute nothing to a weighted
    /// sum downstream.
    ///
    /// The cache key is the unordered user pair: lookups probe (a,b) and
    /// then (b,a), while writes store under the key order of this call.
    /// Degenerate zeros are returned without being cached.
    ///
    /// Concurrent callers may race on the same uncached pair; both compute
    /// the same deterministic value, so either write is acceptable.
    pub fn similarity(
        &self,
        store: &RatingStore,
        user_a: UserId,
        user_b: UserId,
        center: Rating,
    ) -> f64 {
        if let Some(cached) = self.lookup(user_a, user_b) {
            return cached;
        }

        let ratings_a = match store.ratings_of(user_a) {
            Some(ratings) => ratings,
            None => return 0.0,
        };
        let ratings_b = match store.ratings_of(user_b) {
            Some(ratings) => ratings,
            None => return 0.0,
        };

        let mut product = 0.0;
        let mut sum_of_squares_a = 0.0;
        let mut sum_of_squares_b = 0.0;
        for (item_id, rating_a) in ratings_a.iter() {
            if let Some(rating_b) = ratings_b.get(item_id) {
                let centered_a = rating_a - center;
                let centered_b = rating_b - center;
                product += centered_a * centered_b;
                sum_of_squares_a += centered_a * centered_a;
                sum_of_squares_b += centered_b * centered_b;
            }
        }

        let norm_product = sum_of_squares_a.sqrt() * sum_of_squares_b.sqrt();
        if norm_product == 0.0 {
            // no common items, or all shared ratings sit exactly on the center
            return 0.0;
        }

        let coef = product / norm_product;
        self.cache.lock().unwrap().insert((user_a, user_b), coef);
        coef
    }

    fn lookup(&self, user_a: UserId, user_b: UserId) -> Option<f64> {
        let cache = self.cache.lock().unwrap();
        cache
            .get(&(user_a, user_b))
            .or_else(|| cache.get(&(user_b, user_a)))
            .copied()
    }

    /// Empties the cache. The engine behaves as freshly constructed.
    pub fn reset(&self) {
        self.cache.lock().unwrap().clear();
    }

    pub fn qty_cached(&self) -> usize {
        self.cache.lock().unwrap().len()
    }
}
