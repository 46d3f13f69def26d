//! # Recommendation Engine
//!
//! Recommends nearby, similar users for one querying user:
//! 1. Fetch the user's precomputed neighbor list (self skipped)
//! 2. Relaxation loop: for each similarity bar from `initial_threshold`
//!    down to `min_threshold`, keep neighbors that clear the bar and live
//!    within `max_geo_distance_km`; stop at the first bar that yields at
//!    least `num_recommendations`
//! 3. Fallback: if no bar got there, lower the bar to 0 and keep every
//!    neighbor inside the radius; anti-correlated neighbors (negative
//!    cosine similarity) never qualify, so similarities stay in `[0, 1]`
//! 4. Rank by similarity (stable, so ties keep neighbor-list order),
//!    truncate, and attach a meetup midpoint and place name per pair
//!
//! Neighbor lists start with the user itself, which step 1 skips. Every
//! pipeline still runs [`SelfExclusionFilter`] first as a guard against an
//! index whose first entry is not the user.
//!
//! The engine only reads the shared store and index, so clones of it can run
//! on any number of threads.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, instrument, warn};

use data_loader::{User, UserId, UserStore};
use pipeline::filters::{GeoDistanceFilter, SelfExclusionFilter, SimilarityThresholdFilter};
use pipeline::{distance_km, midpoint, FilterPipeline, PlaceLookup, RegionTable};
use sources::{Candidate, SimilarityIndex, UserContext};

use crate::config::RecommendationConfig;
use crate::error::EngineError;

/// One suggested connection for the querying user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub candidate_id: UserId,
    pub candidate_name: String,
    /// `1 - cosine distance` between the two embeddings
    pub similarity: f32,
    pub distance_km: f64,
    pub midpoint_lat: f64,
    pub midpoint_lon: f64,
    pub suggested_location: String,
}

#[derive(Clone)]
pub struct RecommendationEngine {
    store: Arc<UserStore>,
    index: Arc<SimilarityIndex>,
    places: Arc<dyn PlaceLookup>,
}

impl RecommendationEngine {
    /// Create an engine over a loaded store and its similarity index.
    ///
    /// Place names come from [`RegionTable::builtin`] unless replaced with
    /// [`with_place_lookup`](Self::with_place_lookup).
    pub fn new(store: Arc<UserStore>, index: Arc<SimilarityIndex>) -> Self {
        Self {
            store,
            index,
            places: Arc::new(RegionTable::builtin()),
        }
    }

    pub fn with_place_lookup(mut self, places: Arc<dyn PlaceLookup>) -> Self {
        self.places = places;
        self
    }

    pub fn store(&self) -> &Arc<UserStore> {
        &self.store
    }

    pub fn index(&self) -> &Arc<SimilarityIndex> {
        &self.index
    }

    pub fn population(&self) -> usize {
        self.store.len()
    }

    /// Recommend up to `config.num_recommendations` users for `user_id`.
    ///
    /// # Errors
    /// * [`EngineError::InvalidUser`] if `user_id` is negative or not in the store
    /// * [`EngineError::InvalidConfig`] if `config` fails validation
    ///
    /// Finding fewer candidates than requested, even none, is not an error.
    #[instrument(skip(self, config), level = "debug")]
    pub fn recommend(
        &self,
        user_id: i64,
        config: &RecommendationConfig,
    ) -> Result<Vec<Recommendation>, EngineError> {
        config.validate()?;
        let user = self.resolve_user(user_id)?;
        let user_id = user.id;
        let context = UserContext::new(user.id, user.latitude, user.longitude);

        let candidates: Vec<Candidate> = self
            .index
            .query(user_id, self.index.k())
            .unwrap_or_default()
            .iter()
            .skip(1)
            .map(Candidate::from_neighbor)
            .collect();

        for threshold in config.thresholds() {
            let pipeline = FilterPipeline::new()
                .add_filter(SelfExclusionFilter)
                .add_filter(SimilarityThresholdFilter::new(threshold))
                .add_filter(GeoDistanceFilter::new(
                    self.store.clone(),
                    config.max_geo_distance_km,
                ));
            let accepted = pipeline.apply(candidates.clone(), &context)?;
            debug!(
                "User {}: threshold {:.3} accepted {} of {} neighbors",
                user_id,
                threshold,
                accepted.len(),
                candidates.len()
            );

            if accepted.len() >= config.num_recommendations {
                return Ok(self.rank_and_assemble(&context, accepted, config.num_recommendations));
            }
        }

        // No bar produced enough: keep anyone non-negative inside the radius
        let pipeline = FilterPipeline::new()
            .add_filter(SelfExclusionFilter)
            .add_filter(SimilarityThresholdFilter::new(0.0))
            .add_filter(GeoDistanceFilter::new(
                self.store.clone(),
                config.max_geo_distance_km,
            ));
        let accepted = pipeline.apply(candidates, &context)?;
        debug!(
            "User {}: fallback to geographic filter only, {} candidates",
            user_id,
            accepted.len()
        );

        Ok(self.rank_and_assemble(&context, accepted, config.num_recommendations))
    }

    fn resolve_user(&self, user_id: i64) -> Result<&User, EngineError> {
        usize::try_from(user_id)
            .ok()
            .and_then(|id| self.store.get_user(id))
            .ok_or_else(|| {
                warn!(
                    "Invalid user id {} (population {}), returning no recommendations",
                    user_id,
                    self.store.len()
                );
                EngineError::InvalidUser {
                    user_id,
                    population: self.store.len(),
                }
            })
    }

    /// Sort by similarity descending, keep `limit`, then attach midpoints
    /// and place names. Only the survivors of the truncation are resolved.
    fn rank_and_assemble(
        &self,
        context: &UserContext,
        mut accepted: Vec<Candidate>,
        limit: usize,
    ) -> Vec<Recommendation> {
        // `sort_by` is stable: equal similarities keep neighbor-list order
        accepted.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        accepted.truncate(limit);

        accepted
            .into_iter()
            .filter_map(|candidate| {
                let other = self.store.get_user(candidate.user_id)?;
                let distance = candidate.distance_km.unwrap_or_else(|| {
                    distance_km(context.latitude, context.longitude, other.latitude, other.longitude)
                });
                let (midpoint_lat, midpoint_lon) = midpoint(
                    context.latitude,
                    context.longitude,
                    other.latitude,
                    other.longitude,
                );
                Some(Recommendation {
                    candidate_id: other.id,
                    candidate_name: other.name.clone(),
                    similarity: candidate.similarity,
                    distance_km: distance,
                    midpoint_lat,
                    midpoint_lon,
                    suggested_location: self.places.resolve(midpoint_lat, midpoint_lon),
                })
            })
            .collect()
    }
}
