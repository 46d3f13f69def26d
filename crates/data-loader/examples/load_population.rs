use data_loader::UserStore;
use std::path::Path;
use std::time::Instant;

fn main() {
    let data_dir = Path::new("data/population");

    println!("Loading population...\n");

    let start = Instant::now();
    let store = UserStore::load_from_files(data_dir)
        .expect("Failed to load population");
    let elapsed = start.elapsed();

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Users: {}", store.len());
    println!("Embedding dimensions: {}", store.dimensionality().unwrap_or(0));
    println!("\nPerformance: {:.0} users/second",
             store.len() as f64 / elapsed.as_secs_f64());
}
