//! The [`Filter`] seam: one step that narrows a user's neighbor candidates.

use anyhow::Result;
use sources::{Candidate, UserContext};

/// A candidate filter for one querying user.
///
/// Implementations may annotate survivors (the geographic filter records
/// `distance_km`) but must keep them in input order: ranking later relies on
/// a stable sort over neighbor-list order.
pub trait Filter: Send + Sync {
    /// Short name used in pipeline logs
    fn name(&self) -> &'static str;

    fn apply(&self, candidates: Vec<Candidate>, context: &UserContext) -> Result<Vec<Candidate>>;
}
