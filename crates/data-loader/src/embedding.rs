//! Embedding model: turns interest tags and numeric attributes into one vector.
//!
//! The model is fitted once over the population and then queried for every
//! user. It is a plain value passed to whoever needs it; nothing is cached in
//! module state.
//!
//! Layout of a transformed vector:
//!
//! ```text
//! [ tf-idf weight per vocabulary tag (L2-normalised) ..., age, latitude, longitude ]
//! ```
//!
//! The three numeric features are min-max scaled to `[0, 1]` over the fitted
//! population and multiplied by `numeric_weight`.

use crate::error::{DataLoadError, Result};
use crate::types::{Embedding, User};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashSet};

/// Default multiplier applied to the scaled numeric features
pub const DEFAULT_NUMERIC_WEIGHT: f32 = 0.5;

/// Observed `[min, max]` of one numeric column
#[derive(Debug, Clone, Copy, PartialEq)]
struct Range {
    min: f64,
    max: f64,
}

impl Range {
    fn fit(values: impl Iterator<Item = f64>) -> Self {
        values.fold(
            Range { min: f64::INFINITY, max: f64::NEG_INFINITY },
            |r, v| Range { min: r.min.min(v), max: r.max.max(v) },
        )
    }

    /// Constant columns scale to 0
    fn scale(&self, v: f64) -> f32 {
        let span = self.max - self.min;
        if span <= f64::EPSILON {
            0.0
        } else {
            ((v - self.min) / span).clamp(0.0, 1.0) as f32
        }
    }
}

fn normalize_tag(tag: &str) -> String {
    tag.trim().to_lowercase()
}

/// Fitted tag vocabulary and numeric scalers.
#[derive(Debug, Clone)]
pub struct EmbeddingModel {
    /// Normalised tag -> column, in sorted tag order
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f32>,
    age: Range,
    latitude: Range,
    longitude: Range,
    numeric_weight: f32,
}

impl EmbeddingModel {
    /// Fit the vocabulary, idf weights and numeric ranges over `users`.
    pub fn fit(users: &[User]) -> Result<Self> {
        if users.is_empty() {
            return Err(DataLoadError::EmptyPopulation);
        }

        // Document frequency: count each tag once per user
        let mut doc_freq: BTreeMap<String, u32> = BTreeMap::new();
        for user in users {
            let tags: HashSet<String> = user.interests.iter().map(|t| normalize_tag(t)).collect();
            for tag in tags {
                if !tag.is_empty() {
                    *doc_freq.entry(tag).or_insert(0) += 1;
                }
            }
        }

        // Smoothed idf: ln((1 + n) / (1 + df)) + 1
        let n = users.len() as f32;
        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(doc_freq.len());
        for (column, (tag, df)) in doc_freq.into_iter().enumerate() {
            vocabulary.insert(tag, column);
            idf.push(((1.0 + n) / (1.0 + df as f32)).ln() + 1.0);
        }

        Ok(Self {
            vocabulary,
            idf,
            age: Range::fit(users.iter().map(|u| u.age as f64)),
            latitude: Range::fit(users.iter().map(|u| u.latitude)),
            longitude: Range::fit(users.iter().map(|u| u.longitude)),
            numeric_weight: DEFAULT_NUMERIC_WEIGHT,
        })
    }

    /// Configure the numeric feature multiplier (default: 0.5)
    pub fn with_numeric_weight(mut self, weight: f32) -> Self {
        self.numeric_weight = weight;
        self
    }

    /// Length of every vector produced by [`transform`](Self::transform)
    pub fn dimensionality(&self) -> usize {
        self.vocabulary.len() + 3
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Embed one user. Tags outside the fitted vocabulary are ignored.
    pub fn transform(&self, user: &User) -> Embedding {
        let mut embedding = vec![0.0_f32; self.dimensionality()];

        for tag in &user.interests {
            if let Some(&column) = self.vocabulary.get(&normalize_tag(tag)) {
                embedding[column] += self.idf[column];
            }
        }

        let tags = &mut embedding[..self.vocabulary.len()];
        let norm = tags.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            tags.iter_mut().for_each(|v| *v /= norm);
        }

        let base = self.vocabulary.len();
        embedding[base] = self.age.scale(user.age as f64) * self.numeric_weight;
        embedding[base + 1] = self.latitude.scale(user.latitude) * self.numeric_weight;
        embedding[base + 2] = self.longitude.scale(user.longitude) * self.numeric_weight;

        embedding
    }

    /// Embed every user in parallel, preserving input order
    pub fn transform_all(&self, users: &[User]) -> Vec<Embedding> {
        users.par_iter().map(|u| self.transform(u)).collect()
    }
}
