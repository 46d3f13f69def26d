//! UserStore building and validation.
//!
//! Loading parses both files in parallel, attaches (or computes) embeddings
//! and validates the id and coordinate invariants before anything downstream
//! sees the store.

use crate::embedding::EmbeddingModel;
use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use std::path::Path;
use tracing::info;

impl UserStore {
    /// Load the population from a directory.
    ///
    /// Steps:
    /// 1. Parse users.dat and embeddings.dat in parallel
    /// 2. Insert users in id order
    /// 3. Attach precomputed embeddings, or fit an [`EmbeddingModel`] when
    ///    embeddings.dat is absent
    /// 4. Validate
    pub fn load_from_files(data_dir: &Path) -> Result<Self> {
        info!("Loading population from {:?}", data_dir);

        let users_path = data_dir.join("users.dat");
        let embeddings_path = data_dir.join("embeddings.dat");
        let has_embeddings = embeddings_path.exists();

        let (users, embeddings) = rayon::join(
            || parser::parse_users(&users_path),
            || {
                if has_embeddings {
                    parser::parse_embeddings(&embeddings_path).map(Some)
                } else {
                    Ok(None)
                }
            },
        );
        let mut users = users?;
        let embeddings = embeddings?;

        // Users may appear in any order on disk; ids must still be dense
        users.sort_by_key(|u| u.id);

        let mut store = UserStore::new();
        for user in users {
            store.insert_user(user);
        }

        match embeddings {
            Some(embeddings) => {
                info!("Attaching {} precomputed embeddings", embeddings.len());
                store.attach_embeddings(embeddings)?;
            }
            None => {
                let model = EmbeddingModel::fit(&store.users)?;
                info!(
                    "No embeddings.dat found, fitted embedding model ({} dimensions)",
                    model.dimensionality()
                );
                store.apply_model(&model);
            }
        }

        store.validate()?;

        info!("Loaded {} users", store.len());
        Ok(store)
    }

    /// Attach `(id, embedding)` pairs to already inserted users
    pub fn attach_embeddings(&mut self, embeddings: Vec<(UserId, Embedding)>) -> Result<()> {
        for (id, embedding) in embeddings {
            let user = self
                .users
                .get_mut(id)
                .filter(|u| u.id == id)
                .ok_or(DataLoadError::UnknownUser { user_id: id })?;
            user.embedding = embedding;
        }
        Ok(())
    }

    /// Replace every user's embedding with the model's transform
    pub fn apply_model(&mut self, model: &EmbeddingModel) {
        let embeddings = model.transform_all(&self.users);
        for (user, embedding) in self.users.iter_mut().zip(embeddings) {
            user.embedding = embedding;
        }
    }

    /// Validate data integrity
    ///
    /// Checks that:
    /// - ids are exactly `0..n` in order
    /// - coordinates are valid degrees and age is finite
    /// - every user has a finite embedding of one shared dimensionality
    pub fn validate(&self) -> Result<()> {
        let dimensionality = self.dimensionality();

        for (index, user) in self.users.iter().enumerate() {
            if user.id != index {
                return Err(DataLoadError::NonDenseIds {
                    expected: index,
                    found: user.id,
                });
            }
            if !(-90.0..=90.0).contains(&user.latitude) || !(-180.0..=180.0).contains(&user.longitude) {
                return Err(DataLoadError::InvalidCoordinates {
                    user_id: user.id,
                    latitude: user.latitude,
                    longitude: user.longitude,
                });
            }
            if !user.age.is_finite() {
                return Err(DataLoadError::InvalidAge { user_id: user.id });
            }
            if user.embedding.is_empty() {
                return Err(DataLoadError::BadEmbedding {
                    user_id: user.id,
                    reason: "no embedding".to_string(),
                });
            }
            if Some(user.embedding.len()) != dimensionality {
                return Err(DataLoadError::EmbeddingDimension {
                    user_id: user.id,
                    expected: dimensionality.unwrap_or(0),
                    found: user.embedding.len(),
                });
            }
            if user.embedding.iter().any(|v| !v.is_finite()) {
                return Err(DataLoadError::BadEmbedding {
                    user_id: user.id,
                    reason: "non-finite component".to_string(),
                });
            }
        }
        Ok(())
    }
}
