//! Filter implementations for the candidate pipeline.
//!
//! This module contains all the concrete filter implementations
//! that can be composed into a FilterPipeline.

pub mod geo_distance;
pub mod self_exclusion;
pub mod similarity_threshold;

// Re-export for convenience
pub use geo_distance::GeoDistanceFilter;
pub use self_exclusion::SelfExclusionFilter;
pub use similarity_threshold::SimilarityThresholdFilter;
