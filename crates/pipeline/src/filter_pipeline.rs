//! Ordered composition of [`Filter`]s.

use crate::traits::Filter;
use anyhow::Result;
use sources::{Candidate, UserContext};
use tracing::debug;

/// Runs filters left to right, each one seeing the previous one's survivors.
///
/// ```ignore
/// let accepted = FilterPipeline::new()
///     .add_filter(SelfExclusionFilter)
///     .add_filter(SimilarityThresholdFilter::new(0.85))
///     .add_filter(GeoDistanceFilter::new(store.clone(), 750.0))
///     .apply(candidates, &context)?;
/// ```
#[derive(Default)]
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a filter; it runs after every filter already added
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn filter_names(&self) -> Vec<&'static str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Candidates that survive every filter, in their original relative order.
    ///
    /// Stops early once nothing is left; the first filter error aborts the run.
    pub fn apply(&self, candidates: Vec<Candidate>, context: &UserContext) -> Result<Vec<Candidate>> {
        let mut survivors = candidates;
        for filter in &self.filters {
            if survivors.is_empty() {
                break;
            }
            let before = survivors.len();
            survivors = filter.apply(survivors, context)?;
            debug!(
                user_id = context.user_id,
                "{} removed {} of {} candidates",
                filter.name(),
                before - survivors.len(),
                before
            );
        }
        Ok(survivors)
    }
}
