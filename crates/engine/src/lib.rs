//! # Engine Crate
//!
//! Adaptive connection recommendations on top of the similarity index.
//!
//! ## Components
//!
//! - **config**: [`RecommendationConfig`] and its threshold relaxation schedule
//! - **engine**: [`RecommendationEngine`], one user at a time
//! - **batch**: [`BatchEvaluator`], the whole population in parallel plus
//!   similarity statistics
//! - **output**: the augmented user table and the JSON summary
//!
//! ## Example Usage
//!
//! ```ignore
//! use engine::{BatchEvaluator, RecommendationConfig, RecommendationEngine};
//! use sources::SimilarityIndex;
//! use std::sync::Arc;
//!
//! let store = Arc::new(UserStore::load_from_files("data/population".as_ref())?);
//! let index = Arc::new(SimilarityIndex::build(&store, 50));
//! let engine = RecommendationEngine::new(store.clone(), index);
//!
//! let recs = engine.recommend(0, &RecommendationConfig::default())?;
//!
//! let evaluator = BatchEvaluator::new(engine, RecommendationConfig::default())?;
//! let report = evaluator.evaluate();
//! engine::output::write_output_table("out.dat".as_ref(), &store, &report.rows)?;
//! ```

pub mod batch;
pub mod config;
pub mod engine;
pub mod error;
pub mod output;

pub use batch::{BatchEvaluator, EvaluationReport, EvaluationRow, EvaluationSummary, SimilarityStats};
pub use config::RecommendationConfig;
pub use engine::{Recommendation, RecommendationEngine};
pub use error::EngineError;
