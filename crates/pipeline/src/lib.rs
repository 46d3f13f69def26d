//! Geographic math, place naming and candidate filtering.
//!
//! This crate provides:
//! - `geo`: great-circle distance and meetup midpoint
//! - `place`: the [`PlaceLookup`] contract and the static [`RegionTable`]
//! - the [`Filter`] trait, concrete filters and [`FilterPipeline`] for composing them
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::FilterPipeline;
//! use pipeline::filters::*;
//!
//! let pipeline = FilterPipeline::new()
//!     .add_filter(SelfExclusionFilter)
//!     .add_filter(SimilarityThresholdFilter::new(0.85))
//!     .add_filter(GeoDistanceFilter::new(store.clone(), 750.0));
//!
//! let accepted = pipeline.apply(candidates, &context)?;
//! ```

pub mod geo;
pub mod place;
pub mod traits;
pub mod filters;
pub mod filter_pipeline;

// Re-export main types
pub use filter_pipeline::FilterPipeline;
pub use geo::{distance_km, midpoint, EARTH_RADIUS_KM};
pub use place::{fallback_label, PlaceLookup, Region, RegionTable};
pub use traits::Filter;
