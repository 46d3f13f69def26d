//! Recommendation configuration and the threshold relaxation schedule.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};

/// Upper bound on relaxation passes a config may ask for
pub const MAX_RELAXATION_PASSES: usize = 1_000;

/// Slack when counting passes: thresholds arrive as f32, so a ratio such as
/// `(0.9 - 0.6) / 0.1` lands a few ulps below 3
const PASS_COUNT_TOLERANCE: f64 = 1e-4;

/// Knobs for one `recommend` call.
///
/// Defaults: 5 recommendations, similarity relaxed from 0.85 down to 0.75 in
/// steps of 0.05, and a 750 km geographic cutoff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationConfig {
    /// Target number of recommendations
    pub num_recommendations: usize,
    /// First similarity bar tried
    pub initial_threshold: f32,
    /// Lowest similarity bar tried before falling back
    pub min_threshold: f32,
    /// Amount the bar drops per pass
    pub step: f32,
    /// Inclusive geographic radius, applied on every pass and in the fallback
    pub max_geo_distance_km: f64,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            num_recommendations: 5,
            initial_threshold: 0.85,
            min_threshold: 0.75,
            step: 0.05,
            max_geo_distance_km: 750.0,
        }
    }
}

impl RecommendationConfig {
    pub fn with_num_recommendations(mut self, count: usize) -> Self {
        self.num_recommendations = count;
        self
    }

    pub fn with_thresholds(mut self, initial: f32, min: f32, step: f32) -> Self {
        self.initial_threshold = initial;
        self.min_threshold = min;
        self.step = step;
        self
    }

    pub fn with_max_geo_distance_km(mut self, km: f64) -> Self {
        self.max_geo_distance_km = km;
        self
    }

    /// Check every field before the engine relies on it
    pub fn validate(&self) -> Result<(), EngineError> {
        let invalid = |msg: String| Err(EngineError::InvalidConfig(msg));

        if self.num_recommendations == 0 {
            return invalid("num_recommendations must be at least 1".to_string());
        }
        for (name, value) in [
            ("initial_threshold", self.initial_threshold),
            ("min_threshold", self.min_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return invalid(format!("{} must be within [0, 1], got {}", name, value));
            }
        }
        if self.min_threshold > self.initial_threshold {
            return invalid(format!(
                "min_threshold {} exceeds initial_threshold {}",
                self.min_threshold, self.initial_threshold
            ));
        }
        if !self.step.is_finite() || self.step <= 0.0 {
            return invalid(format!("step must be positive, got {}", self.step));
        }
        if self.extra_passes() >= MAX_RELAXATION_PASSES {
            return invalid(format!(
                "step {} is too small: more than {} relaxation passes",
                self.step, MAX_RELAXATION_PASSES
            ));
        }
        if !self.max_geo_distance_km.is_finite() || self.max_geo_distance_km < 0.0 {
            return invalid(format!(
                "max_geo_distance_km must be a non-negative distance, got {}",
                self.max_geo_distance_km
            ));
        }
        Ok(())
    }

    /// Passes after the first, i.e. `floor((initial - min) / step)`.
    ///
    /// Saturates instead of overflowing for degenerate steps; `validate`
    /// rejects anything above [`MAX_RELAXATION_PASSES`].
    fn extra_passes(&self) -> usize {
        let span = (self.initial_threshold as f64 - self.min_threshold as f64).max(0.0);
        let ratio = span / self.step as f64 + PASS_COUNT_TOLERANCE;
        if !ratio.is_finite() {
            return usize::MAX;
        }
        ratio.floor() as usize
    }

    /// Similarity bars tried in order: `initial - i * step` while `>= min`.
    ///
    /// Computed by index rather than repeated subtraction so rounding can
    /// never skip the floor itself (0.85 - 0.05 - 0.05 < 0.75 in floating
    /// point). Never yields more than [`MAX_RELAXATION_PASSES`] bars, even for
    /// a config that was not validated.
    pub fn thresholds(&self) -> Vec<f32> {
        let initial = self.initial_threshold as f64;
        let step = self.step as f64;

        let passes = self.extra_passes().min(MAX_RELAXATION_PASSES - 1);
        (0..=passes)
            .map(|i| ((initial - i as f64 * step) as f32).max(self.min_threshold))
            .collect()
    }
}
