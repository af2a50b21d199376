use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing_subscriber::EnvFilter;

use hackathon_leaderboard::{LeaderboardConfig, LiveChannel, MemoryStore, Snapshot};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = LeaderboardConfig::load()
        .unwrap()
        .with_tick_interval(Duration::from_secs(2));
    let store = Arc::new(MemoryStore::seeded().with_latency(config.latency()));
    let channel = LiveChannel::new(Arc::clone(&store), &config);
    channel.connect();

    let initial = channel.snapshot(1).await.unwrap();
    println!("{}", serde_json::to_string_pretty(&initial).unwrap());

    let subscription = channel
        .subscribe(1, |snapshot: &Snapshot| {
            for entry in &snapshot.entries {
                println!(
                    "#{} {} ({}) - {} votes",
                    entry.rank, entry.project_title, entry.team_name, entry.vote_count
                );
            }
            println!("-- {}", snapshot.computed_at);
        })
        .unwrap();

    store.approve_project(3, true).await.unwrap();
    for voter in 100..120 {
        store.vote(voter, 3).await.unwrap();
        sleep(Duration::from_millis(300)).await;
    }

    subscription.unsubscribe();
    channel.disconnect();
}
