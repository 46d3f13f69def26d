use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use data_loader::{UserId, UserStore};
use engine::{
    BatchEvaluator, EngineError, Recommendation, RecommendationConfig, RecommendationEngine,
};
use pipeline::distance_km;
use sources::SimilarityIndex;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::warn;

/// MeetupRecs - nearby, like-minded connection recommendations
#[derive(Parser)]
#[command(name = "meetup-recs")]
#[command(about = "Recommends similar users within meeting distance", long_about = None)]
struct Cli {
    /// Directory holding users.dat (and optionally embeddings.dat)
    #[arg(short, long, default_value = "data/population")]
    data_dir: PathBuf,

    /// Neighbors kept per user in the similarity index
    #[arg(long, default_value = "50")]
    neighbors: usize,

    #[command(subcommand)]
    command: Commands,
}

/// Recommendation knobs shared by `recommend` and `evaluate`
#[derive(Args, Clone)]
struct ConfigArgs {
    /// Number of recommendations per user
    #[arg(long, default_value = "5")]
    count: usize,

    /// First similarity bar tried
    #[arg(long, default_value = "0.85")]
    initial_threshold: f32,

    /// Lowest similarity bar before the geographic-only fallback
    #[arg(long, default_value = "0.75")]
    min_threshold: f32,

    /// Amount the similarity bar drops per pass
    #[arg(long, default_value = "0.05")]
    step: f32,

    /// Maximum distance between two users, in kilometres
    #[arg(long, default_value = "750")]
    max_km: f64,
}

impl ConfigArgs {
    fn to_config(&self) -> RecommendationConfig {
        RecommendationConfig::default()
            .with_num_recommendations(self.count)
            .with_thresholds(self.initial_threshold, self.min_threshold, self.step)
            .with_max_geo_distance_km(self.max_km)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Get connection recommendations for a user
    Recommend {
        /// User ID to get recommendations for
        #[arg(long, allow_negative_numbers = true)]
        user_id: i64,

        #[command(flatten)]
        config: ConfigArgs,

        /// Show similarity and distance for each recommendation
        #[arg(long)]
        explain: bool,
    },

    /// Show a user's profile and nearest neighbors
    User {
        /// User ID to display
        #[arg(long)]
        user_id: UserId,
    },

    /// Recommend for every user and write the augmented user table
    Evaluate {
        /// Output table path
        #[arg(long)]
        output: PathBuf,

        /// Optional JSON file for the run summary
        #[arg(long)]
        summary_json: Option<PathBuf>,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Run benchmark to test performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    println!("Loading population from {}...", cli.data_dir.display());
    let start = Instant::now();
    let store = Arc::new(
        UserStore::load_from_files(&cli.data_dir).context("Failed to load population")?,
    );
    println!(
        "{} Loaded {} users in {:?}",
        "✓".green(),
        store.len(),
        start.elapsed()
    );

    let start = Instant::now();
    let index = Arc::new(SimilarityIndex::build(&store, cli.neighbors));
    println!(
        "{} Built similarity index (k = {}) in {:?}",
        "✓".green(),
        cli.neighbors,
        start.elapsed()
    );

    let engine = RecommendationEngine::new(store, index);

    match cli.command {
        Commands::Recommend {
            user_id,
            config,
            explain,
        } => handle_recommend(&engine, user_id, &config.to_config(), explain)?,
        Commands::User { user_id } => handle_user(&engine, user_id)?,
        Commands::Evaluate {
            output,
            summary_json,
            config,
        } => handle_evaluate(engine, output, summary_json, config.to_config())?,
        Commands::Benchmark {
            requests,
            concurrent,
        } => handle_benchmark(engine, requests, concurrent).await?,
    }

    Ok(())
}

/// Handle the 'recommend' command
fn handle_recommend(
    engine: &RecommendationEngine,
    user_id: i64,
    config: &RecommendationConfig,
    explain: bool,
) -> Result<()> {
    let recommendations = match engine.recommend(user_id, config) {
        Ok(recs) => recs,
        // Already logged by the engine; an unknown user just has nobody to meet
        Err(EngineError::InvalidUser { .. }) => Vec::new(),
        Err(err) => return Err(err.into()),
    };

    print_recommendations(user_id, &recommendations, explain);
    Ok(())
}

/// Handle the 'user' command
fn handle_user(engine: &RecommendationEngine, user_id: UserId) -> Result<()> {
    let store = engine.store();
    let user = store
        .get_user(user_id)
        .ok_or_else(|| anyhow!("User {} not found", user_id))?;

    println!("{}", format!("User ID: {}", user.id).bold().blue());
    println!("{}Name: {}", "• ".green(), user.name);
    println!("{}Age: {}", "• ".green(), user.age);
    println!(
        "{}Location: ({:.4}, {:.4})",
        "• ".green(),
        user.latitude,
        user.longitude
    );
    println!("{}Interests: {}", "• ".cyan(), user.interests.join(", "));

    let neighbors = engine
        .index()
        .query(user_id, 10)
        .ok_or_else(|| anyhow!("User {} has no neighbor list", user_id))?;

    println!("Nearest neighbors by taste:");
    for neighbor in neighbors.iter().skip(1) {
        if let Some(other) = store.get_user(neighbor.user_id) {
            let km = distance_km(user.latitude, user.longitude, other.latitude, other.longitude);
            println!(
                "  - {} (id {}): similarity {:.3}, {:.1} km away",
                other.name,
                other.id,
                1.0 - neighbor.distance,
                km
            );
        }
    }
    Ok(())
}

/// Handle the 'evaluate' command
fn handle_evaluate(
    engine: RecommendationEngine,
    output: PathBuf,
    summary_json: Option<PathBuf>,
    config: RecommendationConfig,
) -> Result<()> {
    let store = engine.store().clone();
    let evaluator = BatchEvaluator::new(engine, config).context("Invalid recommendation config")?;

    let start = Instant::now();
    let report = evaluator.evaluate();
    let elapsed = start.elapsed();

    engine::output::write_output_table(&output, &store, &report.rows)?;
    if let Some(path) = &summary_json {
        engine::output::write_summary_json(path, &report.summary)?;
    }

    let summary = &report.summary;
    println!("{}", "Evaluation summary:".bold().blue());
    println!("Users evaluated: {} in {:?}", summary.users, elapsed);
    println!(
        "With recommendations: {}, without: {}, failed: {}",
        summary.users_with_recommendations.to_string().green(),
        summary.users_without_recommendations.to_string().yellow(),
        summary.failed_users.to_string().red()
    );
    println!("Total recommendations: {}", summary.total_recommendations);
    match (
        summary.similarity.mean(),
        summary.similarity.min,
        summary.similarity.max,
    ) {
        (Some(mean), Some(min), Some(max)) => println!(
            "Similarity: mean {:.4}, min {:.4}, max {:.4}",
            mean, min, max
        ),
        _ => println!("Similarity: no recommendations produced"),
    }
    println!("{} Wrote {}", "✓".green(), output.display());

    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    engine: RecommendationEngine,
    requests: usize,
    concurrent: usize,
) -> Result<()> {
    let population = engine.population();
    if population == 0 || requests == 0 {
        println!("Nothing to benchmark");
        return Ok(());
    }

    let config = Arc::new(RecommendationConfig::default());
    let permits = Arc::new(Semaphore::new(concurrent.max(1)));

    let user_ids: Vec<i64> = (0..requests)
        .map(|_| (rand::random::<u64>() % population as u64) as i64)
        .collect();

    let wall = Instant::now();
    let mut handles = Vec::with_capacity(requests);
    for user_id in user_ids {
        let engine = engine.clone();
        let config = config.clone();
        let permits = permits.clone();
        handles.push(tokio::spawn(async move {
            let _permit = permits.acquire_owned().await?;
            let start = Instant::now();
            tokio::task::spawn_blocking(move || engine.recommend(user_id, &config)).await??;
            Ok::<_, anyhow::Error>(start.elapsed())
        }));
    }

    let mut timings = Vec::with_capacity(requests);
    for handle in handles {
        match handle.await? {
            Ok(elapsed) => timings.push(elapsed),
            Err(err) => warn!("Benchmark request failed: {}", err),
        }
    }
    let wall_time = wall.elapsed();

    if timings.is_empty() {
        return Err(anyhow!("Every benchmark request failed"));
    }

    timings.sort();
    let percentile = |p: f64| -> Duration {
        let rank = ((timings.len() as f64 * p) as usize).min(timings.len() - 1);
        timings[rank]
    };
    let total: Duration = timings.iter().sum();
    let avg_latency = total / timings.len() as u32;
    let throughput = timings.len() as f64 / wall_time.as_secs_f64();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Requests: {} ({} concurrent)", timings.len(), concurrent);
    println!("Total time: {:?}", wall_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

/// Helper function to format and print recommendations
fn print_recommendations(user_id: i64, recommendations: &[Recommendation], explain: bool) {
    println!(
        "{}",
        format!("Recommendations for user {}:", user_id).bold().blue()
    );
    if recommendations.is_empty() {
        println!("  (none)");
        return;
    }

    for (i, rec) in recommendations.iter().enumerate() {
        println!(
            "{}. {} - meet near {} ({:.4}, {:.4})",
            (i + 1).to_string().green(),
            rec.candidate_name,
            rec.suggested_location,
            rec.midpoint_lat,
            rec.midpoint_lon
        );
        if explain {
            println!(
                "   Similarity {:.3}, {:.1} km apart (user id {})",
                rec.similarity, rec.distance_km, rec.candidate_id
            );
        }
    }
}
