//! Error types for the data-loader crate.
//!
//! File-level failures carry the file and 1-based line; record-level failures
//! carry the offending user id.

use crate::types::UserId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("Population file not found: {path}")]
    FileNotFound { path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A line that could not be split or a field that could not be parsed
    #[error("{file}:{line}: {reason}")]
    Parse {
        file: String,
        line: usize,
        reason: String,
    },

    #[error("{file}:{line}: expected {expected} fields, found {found}")]
    FieldCount {
        file: String,
        line: usize,
        expected: usize,
        found: usize,
    },

    /// embeddings.dat names a user that users.dat does not have
    #[error("Embedding given for unknown user {user_id}")]
    UnknownUser { user_id: UserId },

    /// Ids must run `0..n` without gaps, in file order
    #[error("User ids must be dense and 0-based: expected {expected}, found {found}")]
    NonDenseIds { expected: UserId, found: UserId },

    #[error("User {user_id} has invalid coordinates ({latitude}, {longitude})")]
    InvalidCoordinates {
        user_id: UserId,
        latitude: f64,
        longitude: f64,
    },

    #[error("User {user_id} has a non-finite age")]
    InvalidAge { user_id: UserId },

    #[error("User {user_id} has an embedding of length {found}, expected {expected}")]
    EmbeddingDimension {
        user_id: UserId,
        expected: usize,
        found: usize,
    },

    /// Empty or containing NaN/infinite components
    #[error("User {user_id} has an unusable embedding: {reason}")]
    BadEmbedding { user_id: UserId, reason: String },

    #[error("Population is empty")]
    EmptyPopulation,
}

pub type Result<T> = std::result::Result<T, DataLoadError>;
