//! Behavioural tests for the recommendation engine and batch evaluator.
//!
//! Properties are checked over a synthetic population of users spread across
//! central Europe, with a handful placed on other continents. The concrete
//! scenarios use tiny hand-built populations.

use std::sync::Arc;

use data_loader::{User, UserStore};
use engine::{BatchEvaluator, EngineError, RecommendationConfig, RecommendationEngine};
use pipeline::filters::{GeoDistanceFilter, SelfExclusionFilter, SimilarityThresholdFilter};
use pipeline::{distance_km, FilterPipeline};
use sources::{user_context::build_user_context, Candidate, SimilarityIndex};

// ============================================================================
// Fixtures
// ============================================================================

const POPULATION: usize = 40;

fn synthetic_store() -> UserStore {
    let mut store = UserStore::new();
    for id in 0..POPULATION {
        let embedding: Vec<f32> = (0..8)
            .map(|d| (((id * 7 + d * 13) % 23) as f32 / 23.0) + if d == 0 { 1.0 } else { 0.0 })
            .collect();
        // Every tenth user lives in New York
        let (latitude, longitude) = if id % 10 == 9 {
            (40.7128, -74.0060)
        } else {
            (47.0 + (id % 7) as f64 * 0.5, 14.0 + (id % 11) as f64 * 0.8)
        };
        store.insert_user(
            User::new(id, format!("user{id}"), 20.0 + id as f32, latitude, longitude)
                .with_interests(["hiking"])
                .with_embedding(embedding),
        );
    }
    store
}

/// Embeddings with mixed signs, so many pairs are anti-correlated
fn signed_store() -> UserStore {
    let mut store = UserStore::new();
    for id in 0..POPULATION {
        let embedding: Vec<f32> = (0..6)
            .map(|d| (((id * 5 + d * 11) % 19) as f32 / 9.0) - 1.0)
            .map(|v| if v == 0.0 { 0.25 } else { v })
            .collect();
        let (latitude, longitude) = (48.0 + (id % 5) as f64 * 0.2, 17.0 + (id % 4) as f64 * 0.3);
        store.insert_user(
            User::new(id, format!("user{id}"), 30.0, latitude, longitude).with_embedding(embedding),
        );
    }
    store
}

fn build_engine(store: UserStore, k: usize) -> RecommendationEngine {
    let store = Arc::new(store);
    let index = Arc::new(SimilarityIndex::build(&store, k));
    RecommendationEngine::new(store, index)
}

fn pair_store(other: (f64, f64), other_embedding: Vec<f32>) -> UserStore {
    let mut store = UserStore::new();
    store.insert_user(User::new(0, "Jana", 29.0, 48.1486, 17.1077).with_embedding(vec![1.0, 0.0]));
    store.insert_user(User::new(1, "Tomas", 31.0, other.0, other.1).with_embedding(other_embedding));
    store
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_recommend_is_deterministic() {
    let engine = build_engine(synthetic_store(), 15);
    let config = RecommendationConfig::default();

    for user_id in 0..POPULATION as i64 {
        let first = engine.recommend(user_id, &config).unwrap();
        let second = engine.recommend(user_id, &config).unwrap();
        assert_eq!(first, second, "user {} changed between calls", user_id);
    }
}

#[test]
fn test_never_recommends_self() {
    let engine = build_engine(synthetic_store(), 15);
    let config = RecommendationConfig::default().with_num_recommendations(20);

    for user_id in 0..POPULATION {
        let recs = engine.recommend(user_id as i64, &config).unwrap();
        assert!(recs.iter().all(|r| r.candidate_id != user_id));
    }
}

#[test]
fn test_similarity_stays_in_unit_interval_with_signed_embeddings() {
    let engine = build_engine(signed_store(), 30);

    // Counts above the population force the fallback path
    for count in [1, 5, 50] {
        let config = RecommendationConfig::default().with_num_recommendations(count);
        for user_id in 0..POPULATION as i64 {
            for rec in engine.recommend(user_id, &config).unwrap() {
                assert!(
                    (0.0..=1.0).contains(&rec.similarity),
                    "user {} got similarity {}",
                    user_id,
                    rec.similarity
                );
            }
        }
    }

    let evaluator = BatchEvaluator::new(
        engine,
        RecommendationConfig::default().with_num_recommendations(50),
    )
    .unwrap();
    let summary = evaluator.evaluate().summary;
    assert!(summary.similarity.min.is_none_or(|m| m >= 0.0));
}

#[test]
fn test_anti_correlated_neighbor_never_returned() {
    let engine = build_engine(pair_store((48.1600, 17.0500), vec![-1.0, 0.1]), 5);

    let recs = engine
        .recommend(0, &RecommendationConfig::default().with_num_recommendations(1))
        .unwrap();

    assert!(recs.is_empty());
}

#[test]
fn test_tiny_step_is_rejected_not_fatal() {
    let engine = build_engine(synthetic_store(), 15);
    let config = RecommendationConfig::default().with_thresholds(0.85, 0.75, f32::MIN_POSITIVE);

    assert!(matches!(
        engine.recommend(0, &config),
        Err(EngineError::InvalidConfig(_))
    ));
    assert!(BatchEvaluator::new(engine, config).is_err());
}

#[test]
fn test_lower_threshold_admits_superset() {
    let store = Arc::new(synthetic_store());
    let index = SimilarityIndex::build(&store, 15);
    let config = RecommendationConfig::default().with_thresholds(0.95, 0.5, 0.05);

    for user_id in 0..POPULATION {
        let context = build_user_context(&store, user_id).unwrap();
        let candidates: Vec<Candidate> = index
            .query(user_id, 15)
            .unwrap()
            .iter()
            .map(Candidate::from_neighbor)
            .collect();

        let mut previous: Vec<usize> = Vec::new();
        for threshold in config.thresholds() {
            let pipeline = FilterPipeline::new()
                .add_filter(SelfExclusionFilter)
                .add_filter(SimilarityThresholdFilter::new(threshold))
                .add_filter(GeoDistanceFilter::new(store.clone(), config.max_geo_distance_km));
            let accepted: Vec<usize> = pipeline
                .apply(candidates.clone(), &context)
                .unwrap()
                .iter()
                .map(|c| c.user_id)
                .collect();

            assert!(previous.iter().all(|id| accepted.contains(id)));
            previous = accepted;
        }
    }
}

#[test]
fn test_geo_bound_and_cap_hold_on_every_path() {
    let engine = build_engine(synthetic_store(), 15);
    let store = engine.store().clone();

    for count in [1, 3, 10] {
        for max_km in [50.0, 300.0, 750.0] {
            let config = RecommendationConfig::default()
                .with_num_recommendations(count)
                .with_max_geo_distance_km(max_km);

            for user in store.users() {
                let recs = engine.recommend(user.id as i64, &config).unwrap();
                assert!(recs.len() <= count);
                for rec in &recs {
                    let other = store.get_user(rec.candidate_id).unwrap();
                    let d = distance_km(user.latitude, user.longitude, other.latitude, other.longitude);
                    assert!(d <= max_km, "{} km exceeds {} km", d, max_km);
                    assert!((rec.distance_km - d).abs() < 1e-9);
                }
                assert!(recs.windows(2).all(|w| w[0].similarity >= w[1].similarity));
            }
        }
    }
}

#[test]
fn test_distance_symmetry_over_population() {
    let store = synthetic_store();
    for a in store.users() {
        for b in store.users() {
            let ab = distance_km(a.latitude, a.longitude, b.latitude, b.longitude);
            let ba = distance_km(b.latitude, b.longitude, a.latitude, a.longitude);
            assert!((ab - ba).abs() < 1e-9);
        }
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_close_similar_neighbor_returned_on_first_pass() {
    // Cosine similarity 0.90, about 4 km away
    let engine = build_engine(pair_store((48.1600, 17.0500), vec![0.9, 0.19_f32.sqrt()]), 5);
    let config = RecommendationConfig::default()
        .with_num_recommendations(1)
        .with_max_geo_distance_km(50.0);

    let recs = engine.recommend(0, &config).unwrap();

    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].candidate_id, 1);
    assert!((recs[0].similarity - 0.90).abs() < 1e-4);
    assert!(recs[0].distance_km <= 50.0);
    assert_eq!(recs[0].suggested_location, "Bratislava, Slovakia");
}

#[test]
fn test_nobody_in_range_yields_empty() {
    // Identical taste, other side of the Atlantic
    let engine = build_engine(pair_store((40.7128, -74.0060), vec![1.0, 0.0]), 5);

    let recs = engine.recommend(0, &RecommendationConfig::default()).unwrap();

    assert!(recs.is_empty());
}

#[test]
fn test_dissimilar_neighbor_only_admitted_by_fallback() {
    // Similarity 0.60, below the 0.75 floor but next door
    let engine = build_engine(pair_store((48.1600, 17.0500), vec![0.6, 0.8]), 5);

    let recs = engine
        .recommend(0, &RecommendationConfig::default().with_num_recommendations(1))
        .unwrap();

    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].candidate_name, "Tomas");
    assert!((recs[0].similarity - 0.60).abs() < 1e-4);
}

#[test]
fn test_fallback_still_enforces_distance() {
    let engine = build_engine(pair_store((48.7164, 21.2611), vec![0.6, 0.8]), 5);
    // Kosice is ~310 km from Bratislava
    let config = RecommendationConfig::default().with_max_geo_distance_km(100.0);

    assert!(engine.recommend(0, &config).unwrap().is_empty());
}

#[test]
fn test_invalid_ids_are_rejected_without_panicking() {
    let engine = build_engine(synthetic_store(), 15);
    let config = RecommendationConfig::default();

    for user_id in [-1, -500, POPULATION as i64, i64::MAX] {
        assert!(matches!(
            engine.recommend(user_id, &config),
            Err(EngineError::InvalidUser { .. })
        ));
    }
}

// ============================================================================
// Batch evaluation
// ============================================================================

#[test]
fn test_batch_tolerates_invalid_ids() {
    let evaluator =
        BatchEvaluator::new(build_engine(synthetic_store(), 15), RecommendationConfig::default())
            .unwrap();

    let report = evaluator.evaluate_users(&[-1, 0, POPULATION as i64, 1]);

    assert_eq!(report.rows.len(), 4);
    assert_eq!(
        report.rows.iter().map(|r| r.user_id).collect::<Vec<_>>(),
        vec![-1, 0, POPULATION as i64, 1]
    );
    assert!(report.rows[0].is_empty());
    assert!(report.rows[2].is_empty());
    assert_eq!(report.summary.users, 4);
    assert_eq!(report.summary.failed_users, 2);
}

#[test]
fn test_batch_summary_is_consistent_with_rows() {
    let engine = build_engine(synthetic_store(), 15);
    let expected: Vec<_> = (0..POPULATION as i64)
        .map(|id| engine.recommend(id, &RecommendationConfig::default()).unwrap())
        .collect();

    let evaluator = BatchEvaluator::new(engine, RecommendationConfig::default()).unwrap();
    let report = evaluator.evaluate();
    let summary = &report.summary;

    assert_eq!(report.rows.len(), POPULATION);
    assert_eq!(summary.users, POPULATION);
    assert_eq!(summary.failed_users, 0);
    assert_eq!(
        summary.users_with_recommendations + summary.users_without_recommendations,
        POPULATION
    );

    let total: usize = report.rows.iter().map(|r| r.len()).sum();
    assert_eq!(summary.total_recommendations, total);
    assert_eq!(summary.similarity.count, total);

    for (row, recs) in report.rows.iter().zip(&expected) {
        assert_eq!(row.len(), recs.len());
        assert_eq!(row.midpoint_lats.len(), row.len());
        assert_eq!(row.midpoint_lons.len(), row.len());
        assert_eq!(row.suggested_locations.len(), row.len());
        for (name, rec) in row.recommended_names.iter().zip(recs) {
            assert_eq!(name, &rec.candidate_name);
        }
    }

    if let (Some(min), Some(max), Some(mean)) =
        (summary.similarity.min, summary.similarity.max, summary.similarity.mean())
    {
        assert!(min - 1e-9 <= mean && mean <= max + 1e-9);
    }
}

#[test]
fn test_batch_rejects_invalid_config() {
    let engine = build_engine(synthetic_store(), 15);
    let config = RecommendationConfig::default().with_thresholds(0.7, 0.8, 0.05);

    assert!(matches!(
        BatchEvaluator::new(engine, config),
        Err(EngineError::InvalidConfig(_))
    ));
}
