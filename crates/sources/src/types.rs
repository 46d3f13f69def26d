//! Shared types for neighbor retrieval and candidate filtering.

use data_loader::UserId;

/// One entry of a neighbor list: another user and its cosine distance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub user_id: UserId,
    /// Cosine distance in `[0, 2]`; 0 means identical direction
    pub distance: f32,
}

/// Ordered neighbors of one user: self first, then ascending distance
pub type NeighborList = Vec<Neighbor>;

/// A neighbor under consideration for recommendation.
///
/// `distance_km` stays `None` until a geographic filter has measured it.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub user_id: UserId,
    /// `1 - cosine distance`
    pub similarity: f32,
    pub distance_km: Option<f64>,
}

impl Candidate {
    pub fn new(user_id: UserId, similarity: f32) -> Self {
        Self {
            user_id,
            similarity,
            distance_km: None,
        }
    }

    pub fn from_neighbor(neighbor: &Neighbor) -> Self {
        Self::new(neighbor.user_id, 1.0 - neighbor.distance)
    }
}

/// What filters need to know about the querying user
#[derive(Debug, Clone, PartialEq)]
pub struct UserContext {
    pub user_id: UserId,
    pub latitude: f64,
    pub longitude: f64,
}

impl UserContext {
    pub fn new(user_id: UserId, latitude: f64, longitude: f64) -> Self {
        Self {
            user_id,
            latitude,
            longitude,
        }
    }
}
