//! Errors surfaced by the recommendation engine.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// Negative id or id past the end of the population. Non-fatal: callers
    /// record an empty result for this user and carry on.
    #[error("Invalid user id {user_id}: population has {population} users")]
    InvalidUser { user_id: i64, population: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Filter pipeline failed: {0}")]
    Pipeline(#[from] anyhow::Error),
}
