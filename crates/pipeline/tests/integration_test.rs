//! Integration tests for the pipeline.
//!
//! These tests run real neighbor lists from the similarity index through the
//! filters and the place lookup together.

use data_loader::{User, UserStore};
use pipeline::filters::*;
use pipeline::{midpoint, FilterPipeline, PlaceLookup, RegionTable};
use sources::{user_context::build_user_context, Candidate, SimilarityIndex};
use std::sync::Arc;

fn create_test_setup() -> (Arc<UserStore>, SimilarityIndex) {
    let mut store = UserStore::new();

    // (name, lat, lon, embedding)
    let population = [
        ("Jana", 48.1486, 17.1077, vec![1.0, 0.0, 0.0]),     // Bratislava
        ("Tomas", 48.2082, 16.3738, vec![0.95, 0.05, 0.0]),  // Vienna, very similar
        ("Eva", 48.7164, 21.2611, vec![0.8, 0.2, 0.0]),      // Kosice, similar
        ("Lucia", 40.7128, -74.0060, vec![1.0, 0.01, 0.0]),  // New York, near-identical but far away
        ("Marek", 48.1500, 17.1100, vec![0.0, 0.0, 1.0]),    // Bratislava, dissimilar
    ];

    for (id, (name, lat, lon, embedding)) in population.into_iter().enumerate() {
        store.insert_user(User::new(id, name, 30.0, lat, lon).with_embedding(embedding));
    }
    store.validate().unwrap();

    let index = SimilarityIndex::build(&store, 4);
    (Arc::new(store), index)
}

fn candidates_for(index: &SimilarityIndex, user_id: usize) -> Vec<Candidate> {
    index
        .query(user_id, 4)
        .unwrap()
        .iter()
        .map(Candidate::from_neighbor)
        .collect()
}

#[test]
fn test_full_pipeline_filters_correctly() {
    let (store, index) = create_test_setup();
    let context = build_user_context(&store, 0).unwrap();

    let pipeline = FilterPipeline::new()
        .add_filter(SelfExclusionFilter)
        .add_filter(SimilarityThresholdFilter::new(0.85))
        .add_filter(GeoDistanceFilter::new(store.clone(), 750.0));

    let accepted = pipeline.apply(candidates_for(&index, 0), &context).unwrap();

    // Removed: Jana (self), Lucia (too far), Marek (dissimilar)
    let ids: Vec<_> = accepted.iter().map(|c| c.user_id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert!(accepted.iter().all(|c| c.distance_km.unwrap() <= 750.0));
}

#[test]
fn test_pipeline_without_threshold_keeps_dissimilar_neighbors() {
    let (store, index) = create_test_setup();
    let context = build_user_context(&store, 0).unwrap();

    let pipeline = FilterPipeline::new()
        .add_filter(SelfExclusionFilter)
        .add_filter(GeoDistanceFilter::new(store.clone(), 750.0));

    let accepted = pipeline.apply(candidates_for(&index, 0), &context).unwrap();

    let ids: Vec<_> = accepted.iter().map(|c| c.user_id).collect();
    assert!(ids.contains(&4), "Marek is nearby, only dissimilar");
    assert!(!ids.contains(&3), "Lucia is too far regardless of similarity");
}

#[test]
fn test_accepted_pairs_resolve_to_places() {
    let (store, index) = create_test_setup();
    let context = build_user_context(&store, 0).unwrap();
    let places = RegionTable::builtin();

    let pipeline = FilterPipeline::new()
        .add_filter(SelfExclusionFilter)
        .add_filter(GeoDistanceFilter::new(store.clone(), 100.0));

    let accepted = pipeline.apply(candidates_for(&index, 0), &context).unwrap();

    for candidate in accepted {
        let other = store.get_user(candidate.user_id).unwrap();
        let (lat, lon) = midpoint(context.latitude, context.longitude, other.latitude, other.longitude);
        let label = places.resolve(lat, lon);
        assert!(!label.is_empty());
        // Bratislava/Vienna midpoint lands in the Austrian countryside
        if candidate.user_id == 1 {
            assert_eq!(label, "Austria");
        }
    }
}
