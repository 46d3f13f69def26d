//! Example: list the nearest neighbors of a user
//!
//! Run with: cargo run --package sources --example generate_candidates
//!
//! This example shows how to:
//! 1. Load the population
//! 2. Build the similarity index
//! 3. Turn a neighbor list into candidates
//! 4. Display the results

use data_loader::UserStore;
use sources::{user_context::build_user_context, Candidate, SimilarityIndex};
use std::path::Path;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    println!("=== Neighbor Retrieval Example ===\n");

    println!("Loading population...");
    let start = Instant::now();
    let store = UserStore::load_from_files(Path::new("data/population"))?;
    println!("Loaded {} users in {:?}\n", store.len(), start.elapsed());

    println!("Building similarity index...");
    let start = Instant::now();
    let index = SimilarityIndex::build(&store, 20);
    println!("Built index in {:?}\n", start.elapsed());

    let user_id = 0;
    let context = build_user_context(&store, user_id)?;
    println!(
        "Target user {} at ({:.4}, {:.4})",
        context.user_id, context.latitude, context.longitude
    );

    let candidates: Vec<Candidate> = index
        .query(user_id, 20)
        .unwrap_or_default()
        .iter()
        .skip(1)
        .map(Candidate::from_neighbor)
        .collect();

    println!("\nTop 5 neighbors:");
    for (i, candidate) in candidates.iter().take(5).enumerate() {
        if let Some(user) = store.get_user(candidate.user_id) {
            println!("  {}. {} (similarity: {:.3})", i + 1, user.name, candidate.similarity);
        }
    }

    Ok(())
}
