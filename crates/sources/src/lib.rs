//! # Sources Crate
//!
//! Candidate retrieval for connection recommendations.
//!
//! ## Components
//!
//! - **similarity**: cosine distance and normalisation over embeddings
//! - **similarity_index**: [`SimilarityIndex`], exact k-nearest-neighbor lists
//!   built once over the whole population and shared read-only
//! - **types**: [`Neighbor`], [`Candidate`], [`UserContext`]
//! - **user_context**: build a [`UserContext`] from the store
//!
//! ## Example Usage
//!
//! ```ignore
//! use sources::{SimilarityIndex, Candidate};
//! use data_loader::UserStore;
//! use std::sync::Arc;
//!
//! let store = Arc::new(UserStore::load_from_files("data/population".as_ref())?);
//! let index = SimilarityIndex::build(&store, 50);
//!
//! let candidates: Vec<Candidate> = index
//!     .query(0, 50)
//!     .unwrap()
//!     .iter()
//!     .skip(1)
//!     .map(Candidate::from_neighbor)
//!     .collect();
//! ```

pub mod types;
pub mod similarity;
pub mod similarity_index;
pub mod user_context;

pub use types::{Candidate, Neighbor, NeighborList, UserContext};
pub use similarity::{cosine_distance, normalize};
pub use similarity_index::SimilarityIndex;
