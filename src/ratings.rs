use hashbrown::{HashMap, HashSet};

use crate::error::NocturneError;
use crate::io::{ItemId, Rating, RatingEvent, UserId};

/// Sparse user-item rating matrix, stored as a map of maps over observed
/// cells only. Built once per dataset split and never mutated afterwards.
pub struct RatingStore {
    ratings: HashMap<UserId, HashMap<ItemId, Rating>>,
}

impl RatingStore {
    /// A duplicated (user, item) pair keeps the last rating seen, following
    /// map insert semantics.
    pub fn from_events(events: &[RatingEvent]) -> Self {
        let mut ratings: HashMap<UserId, HashMap<ItemId, Rating>> = HashMap::new();
        for (user_id, item_id, rating, _time) in events {
            ratings.entry(*user_id).or_default().insert(*item_id, *rating);
        }
        RatingStore { ratings }
    }

    pub fn users(&self) -> impl Iterator<Item = UserId> + '_ {
        self.ratings.keys().copied()
    }

    pub fn qty_users(&self) -> usize {
        self.ratings.len()
    }

    pub fn contains_user(&self, user_id: UserId) -> bool {
        self.ratings.contains_key(&user_id)
    }

    pub fn rating(&self, user_id: UserId, item_id: ItemId) -> Option<Rating> {
        self.ratings.get(&user_id)?.get(&item_id).copied()
    }

    pub fn ratings_of(&self, user_id: UserId) -> Option<&HashMap<ItemId, Rating>> {
        self.ratings.get(&user_id)
    }

    pub fn qty_ratings(&self) -> usize {
        self.ratings.values().map(|items| items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    /// Arithmetic mean over every stored rating. Summation order follows map
    /// iteration order, which is commutative here.
    pub fn mean_rating(&self) -> Result<f64, NocturneError> {
        let mut sum = 0.0;
        let mut qty = 0_usize;
        for items in self.ratings.values() {
            for rating in items.values() {
                sum += rating;
                qty += 1;
            }
        }
        if qty == 0 {
            return Err(NocturneError::EmptyDataset("rating store"));
        }
        Ok(sum / qty as f64)
    }
}

/// Inverted index from item to the users who rated it. The per-item user
/// order is the order the events appeared in the input file, which keeps
/// evaluation runs deterministic.
pub struct ItemIndex {
    users_for_item: HashMap<ItemId, Vec<UserId>>,
}

impl ItemIndex {
    pub fn from_events(events: &[RatingEvent]) -> Self {
        let mut users_for_item: HashMap<ItemId, Vec<UserId>> = HashMap::new();
        let mut seen: HashSet<(ItemId, UserId)> = HashSet::new();
        for (user_id, item_id, _rating, _time) in events {
            if seen.insert((*item_id, *user_id)) {
                users_for_item.entry(*item_id).or_default().push(*user_id);
            }
        }
        ItemIndex { users_for_item }
    }

    pub fn users_for_item(&self, item_id: ItemId) -> Option<&[UserId]> {
        self.users_for_item
            .get(&item_id)
            .map(|users| users.as_slice())
    }

    pub fn qty_items(&self) -> usize {
        self.users_for_item.len()
    }
}

#[cfg(test)]
mod ratings_test {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn should_build_store_from_events() {
        let events = vec![(1, 10, 5.0, 0), (2, 10, 3.0, 0), (1, 20, 4.0, 0)];
        let store = RatingStore::from_events(&events);
        assert_eq!(2, store.qty_users());
        assert_eq!(3, store.qty_ratings());
        assert_eq!(Some(5.0), store.rating(1, 10));
        assert_eq!(Some(3.0), store.rating(2, 10));
        assert_eq!(None, store.rating(2, 20));
        assert!(store.contains_user(1));
        assert!(!store.contains_user(3));
    }

    #[test]
    fn duplicate_events_keep_the_last_rating() {
        let events = vec![(1, 10, 5.0, 0), (1, 10, 2.0, 1)];
        let store = RatingStore::from_events(&events);
        assert_eq!(Some(2.0), store.rating(1, 10));
        assert_eq!(1, store.qty_ratings());
    }

    #[test]
    fn mean_is_independent_of_event_order() {
        let events = vec![(1, 10, 5.0, 0), (2, 10, 3.0, 0), (1, 20, 4.0, 0)];
        let mut reversed = events.clone();
        reversed.reverse();
        let mean = RatingStore::from_events(&events).mean_rating().unwrap();
        let mean_reversed = RatingStore::from_events(&reversed).mean_rating().unwrap();
        assert!(approx_eq!(f64, 4.0, mean, epsilon = 1e-12));
        assert!(approx_eq!(f64, mean, mean_reversed, epsilon = 1e-12));
    }

    #[test]
    fn mean_of_empty_store_is_an_error() {
        let store = RatingStore::from_events(&[]);
        let err = store.mean_rating().unwrap_err();
        assert!(matches!(err, NocturneError::EmptyDataset(_)));
    }

    #[test]
    fn item_index_keeps_file_order() {
        let events = vec![
            (5, 10, 4.0, 0),
            (1, 10, 5.0, 0),
            (3, 10, 2.0, 0),
            (1, 20, 4.0, 0),
        ];
        let index = ItemIndex::from_events(&events);
        assert_eq!(Some(&[5, 1, 3][..]), index.users_for_item(10));
        assert_eq!(Some(&[1][..]), index.users_for_item(20));
        assert_eq!(None, index.users_for_item(99));
        assert_eq!(2, index.qty_items());
    }

    #[test]
    fn item_index_ignores_duplicate_pairs() {
        let events = vec![(1, 10, 5.0, 0), (1, 10, 3.0, 1), (2, 10, 4.0, 2)];
        let index = ItemIndex::from_events(&events);
        assert_eq!(Some(&[1, 2][..]), index.users_for_item(10));
    }
}
