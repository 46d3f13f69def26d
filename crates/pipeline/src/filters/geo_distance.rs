//! Filter to enforce the geographic radius.
//!
//! Measures the great-circle distance from the querying user to each
//! candidate, records it on the candidate, and drops anyone too far away.

use crate::geo::distance_km;
use crate::traits::Filter;
use anyhow::Result;
use data_loader::UserStore;
use sources::{Candidate, UserContext};
use std::sync::Arc;

/// Removes candidates farther than `max_km` from the querying user.
///
/// ## Algorithm
/// For each candidate:
/// 1. Look up the candidate's coordinates in the UserStore
/// 2. Compute the haversine distance to the querying user
/// 3. Keep only if `distance <= max_km`, storing the distance on the candidate
///
/// Candidates unknown to the store are dropped.
pub struct GeoDistanceFilter {
    store: Arc<UserStore>,
    max_km: f64,
}

impl GeoDistanceFilter {
    /// Create a new GeoDistanceFilter.
    ///
    /// # Arguments
    /// * `store` - Shared reference to the UserStore for coordinate lookups
    /// * `max_km` - Inclusive radius in kilometres (typically 750)
    pub fn new(store: Arc<UserStore>, max_km: f64) -> Self {
        Self { store, max_km }
    }
}

impl Filter for GeoDistanceFilter {
    fn name(&self) -> &'static str {
        "GeoDistanceFilter"
    }

    fn apply(
        &self,
        candidates: Vec<Candidate>,
        context: &UserContext,
    ) -> Result<Vec<Candidate>> {
        let filtered: Vec<Candidate> = candidates
            .into_iter()
            .filter_map(|mut candidate| {
                let other = self.store.get_user(candidate.user_id)?;
                let distance = distance_km(
                    context.latitude,
                    context.longitude,
                    other.latitude,
                    other.longitude,
                );
                if distance > self.max_km {
                    return None;
                }
                candidate.distance_km = Some(distance);
                Some(candidate)
            })
            .collect();

        Ok(filtered)
    }
}
