//! Core domain types for the user population.
//!
//! Users are addressed by a dense 0-based id, so the store is a plain `Vec`
//! indexed by that id rather than a map. Once loading finishes the store is
//! only ever read.

use serde::{Deserialize, Serialize};

// =============================================================================
// Type Aliases
// =============================================================================

/// Dense 0-based index of a user in the population
pub type UserId = usize;

/// Fixed-length feature vector summarising a user's interests and attributes
pub type Embedding = Vec<f32>;

// =============================================================================
// User
// =============================================================================

/// A member of the population.
///
/// `latitude` and `longitude` are in degrees. `embedding` is empty until the
/// loader attaches one, either from `embeddings.dat` or from an
/// [`EmbeddingModel`](crate::EmbeddingModel).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub age: f32,
    pub latitude: f64,
    pub longitude: f64,
    /// Free-text interest tags as they appeared in the source table
    pub interests: Vec<String>,
    pub embedding: Embedding,
}

impl User {
    /// Convenience constructor used by tests and the embedding model.
    pub fn new(id: UserId, name: impl Into<String>, age: f32, latitude: f64, longitude: f64) -> Self {
        Self {
            id,
            name: name.into(),
            age,
            latitude,
            longitude,
            interests: Vec::new(),
            embedding: Vec::new(),
        }
    }

    pub fn with_interests<I, S>(mut self, interests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.interests = interests.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_embedding(mut self, embedding: Embedding) -> Self {
        self.embedding = embedding;
        self
    }
}

// =============================================================================
// UserStore - the id-addressed record store
// =============================================================================

/// Immutable store of every user, addressed by [`UserId`].
///
/// Invariant after a successful [`validate`](UserStore::validate):
/// `users[i].id == i` for every `i`, and every user carries an embedding of
/// the same dimensionality.
#[derive(Debug, Default, Clone)]
pub struct UserStore {
    pub(crate) users: Vec<User>,
}

impl UserStore {
    /// Creates a new, empty store
    pub fn new() -> Self {
        Self { users: Vec::new() }
    }

    /// Get a user by id
    pub fn get_user(&self, id: UserId) -> Option<&User> {
        self.users.get(id)
    }

    pub fn contains(&self, id: UserId) -> bool {
        id < self.users.len()
    }

    /// All users in id order
    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Embedding length shared by the population, `None` for an empty store
    pub fn dimensionality(&self) -> Option<usize> {
        self.users.first().map(|u| u.embedding.len())
    }

    /// Append a user during the build phase.
    ///
    /// The store does not reorder: callers insert users in id order and
    /// [`validate`](UserStore::validate) rejects anything else.
    pub fn insert_user(&mut self, user: User) {
        self.users.push(user);
    }
}
