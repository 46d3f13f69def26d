//! Filter to remove the querying user from their own candidates.
//!
//! Neighbor lists always start with the user itself; this is typically the
//! first filter in the pipeline.

use crate::traits::Filter;
use anyhow::Result;
use sources::{Candidate, UserContext};

/// Removes candidates whose id equals the querying user's id.
pub struct SelfExclusionFilter;

impl Filter for SelfExclusionFilter {
    fn name(&self) -> &'static str {
        "SelfExclusionFilter"
    }

    fn apply(
        &self,
        candidates: Vec<Candidate>,
        context: &UserContext,
    ) -> Result<Vec<Candidate>> {
        let filtered: Vec<Candidate> = candidates
            .into_iter()
            .filter(|candidate| candidate.user_id != context.user_id)
            .collect();
        Ok(filtered)
    }
}
