#[macro_use]
extern crate bencher;
extern crate rand;

use bencher::Bencher;
use rand::Rng;

use nocturne::io::{ItemId, RatingEvent, UserId};
use nocturne::ratings::RatingStore;
use nocturne::usercf::similarity::SimilarityEngine;

benchmark_group!(benches, similarity_cold_cache, similarity_warm_cache);
benchmark_main!(benches);

const QTY_USERS: UserId = 200;
const QTY_ITEMS: ItemId = 100;
const RATINGS_PER_USER: usize = 30;
const CENTER: f64 = 3.5;

fn synthetic_rating_events() -> Vec<RatingEvent> {
    let mut rng = rand::thread_rng();
    let mut events = Vec::with_capacity(QTY_USERS as usize * RATINGS_PER_USER);
    for user_id in 1..=QTY_USERS {
        for _ in 0..RATINGS_PER_USER {
            let item_id = rng.gen_range(1..=QTY_ITEMS);
            let rating = rng.gen_range(1..=5) as f64;
            events.push((user_id, item_id, rating, 0));
        }
    }
    events
}

fn similarity_cold_cache(bench: &mut Bencher) {
    let events = synthetic_rating_events();
    let store = RatingStore::from_events(&events);
    bench.iter(|| {
        let engine = SimilarityEngine::new();
        let mut total = 0.0;
        for user_id in 2..=QTY_USERS {
            total += engine.similarity(&store, 1, user_id, CENTER);
        }
        total
    });
}

fn similarity_warm_cache(bench: &mut Bencher) {
    let events = synthetic_rating_events();
    let store = RatingStore::from_events(&events);
    let engine = SimilarityEngine::new();
    for user_id in 2..=QTY_USERS {
        engine.similarity(&store, 1, user_id, CENTER);
    }
    bench.iter(|| {
        let mut total = 0.0;
        for user_id in 2..=QTY_USERS {
            total += engine.similarity(&store, user_id, 1, CENTER);
        }
        total
    });
}
