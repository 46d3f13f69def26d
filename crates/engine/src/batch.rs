//! Batch evaluation over the whole population.
//!
//! Every user is evaluated independently on the rayon pool; rows come back in
//! user-id order. A user that fails (bad id, bad config) gets an empty row
//! and the batch carries on.

use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::config::RecommendationConfig;
use crate::engine::{Recommendation, RecommendationEngine};
use crate::error::EngineError;

/// One output row: parallel columns, one entry per accepted recommendation,
/// in descending similarity order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EvaluationRow {
    pub user_id: i64,
    pub recommended_names: Vec<String>,
    pub midpoint_lats: Vec<f64>,
    pub midpoint_lons: Vec<f64>,
    pub suggested_locations: Vec<String>,
}

impl EvaluationRow {
    pub fn empty(user_id: i64) -> Self {
        Self {
            user_id,
            ..Self::default()
        }
    }

    pub fn from_recommendations(user_id: i64, recommendations: &[Recommendation]) -> Self {
        Self {
            user_id,
            recommended_names: recommendations.iter().map(|r| r.candidate_name.clone()).collect(),
            midpoint_lats: recommendations.iter().map(|r| r.midpoint_lat).collect(),
            midpoint_lons: recommendations.iter().map(|r| r.midpoint_lon).collect(),
            suggested_locations: recommendations
                .iter()
                .map(|r| r.suggested_location.clone())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.recommended_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recommended_names.is_empty()
    }
}

/// Running similarity statistics; `min`/`max` are `None` until a value arrives
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SimilarityStats {
    pub count: usize,
    pub sum: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl SimilarityStats {
    pub fn record(&mut self, similarity: f64) {
        self.count += 1;
        self.sum += similarity;
        self.min = Some(self.min.map_or(similarity, |m| m.min(similarity)));
        self.max = Some(self.max.map_or(similarity, |m| m.max(similarity)));
    }

    pub fn merge(mut self, other: SimilarityStats) -> Self {
        self.count += other.count;
        self.sum += other.sum;
        self.min = match (self.min, other.min) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.max = match (self.max, other.max) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        self
    }

    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Population-wide aggregates of a batch run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EvaluationSummary {
    pub users: usize,
    pub users_with_recommendations: usize,
    pub users_without_recommendations: usize,
    pub failed_users: usize,
    pub total_recommendations: usize,
    pub similarity: SimilarityStats,
}

#[derive(Debug, Clone, Default)]
pub struct EvaluationReport {
    /// One row per evaluated user, in input order
    pub rows: Vec<EvaluationRow>,
    pub summary: EvaluationSummary,
}

/// Per-user result before aggregation
struct UserEvaluation {
    row: EvaluationRow,
    stats: SimilarityStats,
    failed: bool,
}

/// Drives the engine over many users with one fixed configuration
pub struct BatchEvaluator {
    engine: RecommendationEngine,
    config: RecommendationConfig,
}

impl BatchEvaluator {
    /// Fails fast on an invalid configuration instead of failing every user
    pub fn new(engine: RecommendationEngine, config: RecommendationConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self { engine, config })
    }

    pub fn config(&self) -> &RecommendationConfig {
        &self.config
    }

    /// Evaluate every user id in `[0, population)`
    pub fn evaluate(&self) -> EvaluationReport {
        let user_ids: Vec<i64> = (0..self.engine.population() as i64).collect();
        self.evaluate_users(&user_ids)
    }

    /// Evaluate an arbitrary list of ids; invalid ids yield empty rows.
    #[instrument(skip(self, user_ids), fields(users = user_ids.len()))]
    pub fn evaluate_users(&self, user_ids: &[i64]) -> EvaluationReport {
        // Indexed parallel collect keeps input order
        let evaluations: Vec<UserEvaluation> = user_ids
            .par_iter()
            .map(|&user_id| self.evaluate_one(user_id))
            .collect();

        let mut summary = EvaluationSummary::default();
        let mut rows = Vec::with_capacity(evaluations.len());

        for evaluation in evaluations {
            summary.users += 1;
            if evaluation.failed {
                summary.failed_users += 1;
            }
            if evaluation.row.is_empty() {
                summary.users_without_recommendations += 1;
            } else {
                summary.users_with_recommendations += 1;
            }
            summary.total_recommendations += evaluation.row.len();
            summary.similarity = summary.similarity.merge(evaluation.stats);
            rows.push(evaluation.row);
        }

        info!(
            "Evaluated {} users: {} with recommendations, {} without, {} failed, mean similarity {}",
            summary.users,
            summary.users_with_recommendations,
            summary.users_without_recommendations,
            summary.failed_users,
            summary
                .similarity
                .mean()
                .map(|m| format!("{:.4}", m))
                .unwrap_or_else(|| "n/a".to_string())
        );

        EvaluationReport { rows, summary }
    }

    fn evaluate_one(&self, user_id: i64) -> UserEvaluation {
        match self.engine.recommend(user_id, &self.config) {
            Ok(recommendations) => {
                let mut stats = SimilarityStats::default();
                for rec in &recommendations {
                    stats.record(rec.similarity as f64);
                }
                UserEvaluation {
                    row: EvaluationRow::from_recommendations(user_id, &recommendations),
                    stats,
                    failed: false,
                }
            }
            Err(err) => {
                // The engine already warned about invalid ids
                if !matches!(err, EngineError::InvalidUser { .. }) {
                    warn!("Evaluation failed for user {}: {}", user_id, err);
                }
                UserEvaluation {
                    row: EvaluationRow::empty(user_id),
                    stats: SimilarityStats::default(),
                    failed: true,
                }
            }
        }
    }
}
