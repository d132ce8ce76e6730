//! Tweet Check Script
//!
//! Looks up a single tweet from the command line and prints the record together
//! with what every attempted source returned. Takes the tweet URL or id as the
//! first argument, or prompts for it.
//!
//! ```bash
//! cargo run --bin check_tweet -- https://x.com/jack/status/20
//! RUST_LOG=debug cargo run --bin check_tweet -- 20
//! ```

use std::io::{self, Write};

use tweetcheck::{normalize, ScraperConfig, TweetPipeline};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    env_logger::init();

    println!("🐦 Tweet Check Tool");
    println!("===================");

    let input = match std::env::args().nth(1) {
        Some(arg) => arg,
        None => {
            print!("🔗 Enter a tweet URL or ID: ");
            io::stdout().flush()?;
            let mut line = String::new();
            io::stdin().read_line(&mut line)?;
            line.trim().to_string()
        }
    };

    if input.is_empty() {
        println!("❌ Tweet URL or ID cannot be empty!");
        return Err("Tweet URL or ID is required".into());
    }

    let tweet_id = match normalize(&input) {
        Ok(id) => id,
        Err(e) => {
            println!("❌ {}", e);
            return Err(e.into());
        }
    };
    println!("🆔 Tweet ID: {}", tweet_id);

    let config = ScraperConfig::from_env()?;
    let pipeline = TweetPipeline::from_config(&config);

    println!("\n🔍 Checking sources...");
    let trace = pipeline.fetch_tweet_traced(&tweet_id).await;

    println!("\n📋 Attempts:");
    println!("{}", serde_json::to_string_pretty(&trace.attempts)?);

    println!("\n📄 Record:");
    println!("{}", serde_json::to_string_pretty(&trace.record)?);

    if trace.record.exists {
        println!("\n✅ Tweet exists");
    } else {
        println!("\n🚫 Tweet not found");
    }

    Ok(())
}
