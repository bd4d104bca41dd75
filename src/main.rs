use std::io::BufRead;
use std::sync::Arc;

use tracing::info;

use pairwork::config::Config;
use pairwork::engine::{Engine, InMemoryStore};
use pairwork::model::RawAssignment;

/// Reads one raw assignment JSON object per stdin line, saves them as a single
/// batch and prints the longest collaboration.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let store = Arc::new(InMemoryStore::new());
    let engine = Engine::new(store, Config::from_env());
    let config = engine.config();
    info!("pairwork starting");
    info!("  max_batch_size: {}", config.max_batch_size);
    info!("  self_pairs: {:?}", config.self_pairs);
    info!("  check_within_batch: {}", config.check_within_batch);

    let mut rows = Vec::new();
    for line in std::io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let row: RawAssignment = serde_json::from_str(&line)?;
        rows.push(row);
    }

    let saved = engine.save_raw_batch(&rows).await?;
    info!("loaded {saved} assignments");

    match engine.longest_collaboration().await? {
        Some(result) => println!("{}", serde_json::to_string(&result)?),
        None => {
            tracing::warn!("no overlapping work periods found");
            std::process::exit(2);
        }
    }
    Ok(())
}
