//! SimilarityIndex - exact cosine k-nearest-neighbor lists
//!
//! The index is built once over the whole store and never mutated afterwards,
//! so any number of threads can query it through a shared reference.
//!
//! ## Algorithm
//! 1. L2-normalise every embedding once
//! 2. For each user (in parallel), measure the cosine distance to every other user
//! 3. Keep the `k` closest, ascending by distance, ties by ascending id
//! 4. Prepend the user itself at distance 0
//!
//! Brute force is O(n² · d); fine for populations that fit a single batch run.

use crate::similarity::{normalize, normalized_distance};
use crate::types::{Neighbor, NeighborList};
use data_loader::{UserId, UserStore};
use rayon::prelude::*;
use tracing::{info, instrument};

/// Precomputed neighbor lists for every user
#[derive(Debug, Clone)]
pub struct SimilarityIndex {
    neighbors: Vec<NeighborList>,
    k: usize,
}

impl SimilarityIndex {
    /// Build neighbor lists of `k + 1` entries (self included) for every user.
    ///
    /// Populations smaller than `k + 1` yield shorter lists.
    #[instrument(skip(store), fields(users = store.len()))]
    pub fn build(store: &UserStore, k: usize) -> Self {
        let normalized: Vec<Option<Vec<f32>>> = store
            .users()
            .par_iter()
            .map(|u| normalize(&u.embedding))
            .collect();

        let neighbors: Vec<NeighborList> = (0..normalized.len())
            .into_par_iter()
            .map(|user_id| Self::neighbors_of(user_id, &normalized, k))
            .collect();

        info!("Built similarity index: {} users, k = {}", neighbors.len(), k);
        Self { neighbors, k }
    }

    fn neighbors_of(user_id: UserId, normalized: &[Option<Vec<f32>>], k: usize) -> NeighborList {
        let mut others: Vec<Neighbor> = normalized
            .iter()
            .enumerate()
            .filter(|(other, _)| *other != user_id)
            .map(|(other, vector)| {
                let distance = match (&normalized[user_id], vector) {
                    (Some(a), Some(b)) => normalized_distance(a, b),
                    _ => 1.0,
                };
                Neighbor { user_id: other, distance }
            })
            .collect();

        others.sort_unstable_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });
        others.truncate(k);

        let mut list = Vec::with_capacity(others.len() + 1);
        list.push(Neighbor { user_id, distance: 0.0 });
        list.extend(others);
        list
    }

    /// The `min(k, built k) + 1` closest users to `user_id`, self first.
    ///
    /// Returns `None` for an id outside the population.
    pub fn query(&self, user_id: UserId, k: usize) -> Option<&[Neighbor]> {
        self.neighbors
            .get(user_id)
            .map(|list| &list[..(k + 1).min(list.len())])
    }

    /// Neighbor count each list was built with (self excluded)
    pub fn k(&self) -> usize {
        self.k
    }

    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }
}
