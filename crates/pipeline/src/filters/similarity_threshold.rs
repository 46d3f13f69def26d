//! Filter to enforce a minimum similarity.
//!
//! The recommendation engine lowers this threshold step by step, so one
//! filter instance exists per relaxation pass.

use crate::traits::Filter;
use anyhow::Result;
use sources::{Candidate, UserContext};

/// Removes candidates with `similarity < threshold`.
///
/// A candidate exactly at the threshold is kept.
pub struct SimilarityThresholdFilter {
    threshold: f32,
}

impl SimilarityThresholdFilter {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }
}

impl Filter for SimilarityThresholdFilter {
    fn name(&self) -> &'static str {
        "SimilarityThresholdFilter"
    }

    fn apply(
        &self,
        candidates: Vec<Candidate>,
        _context: &UserContext,
    ) -> Result<Vec<Candidate>> {
        let filtered: Vec<Candidate> = candidates
            .into_iter()
            .filter(|candidate| candidate.similarity >= self.threshold)
            .collect();
        Ok(filtered)
    }
}
