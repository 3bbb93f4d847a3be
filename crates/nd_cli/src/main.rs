use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use nd_core::{Config, Result};
use nd_digest::DigestPipeline;
use nd_feeds::{HttpContentFetcher, HttpFeedFetcher, Ingestor};
use tracing::info;

#[derive(Debug, Clone)]
struct HumanDuration(Duration);

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut total = 0u64;
        let mut digits = String::new();
        let mut saw_value = false;

        for c in s.trim().chars() {
            if c.is_ascii_digit() {
                digits.push(c);
            } else if c.is_whitespace() {
                continue;
            } else {
                let value: u64 = digits
                    .parse()
                    .map_err(|_| format!("expected a number before '{}'", c))?;
                digits.clear();
                saw_value = true;
                total += match c {
                    's' => value,
                    'm' => value * 60,
                    'h' => value * 3600,
                    'd' => value * 86400,
                    _ => return Err(format!("unknown duration unit '{}'", c)),
                };
            }
        }
        if !digits.is_empty() {
            total += digits
                .parse::<u64>()
                .map_err(|_| "invalid number in duration".to_string())?;
            saw_value = true;
        }
        if !saw_value {
            return Err("duration must include a number".to_string());
        }

        Ok(HumanDuration(Duration::from_secs(total)))
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the feed configuration file
    #[arg(long, default_value = "sources.json")]
    config: String,
    #[arg(
        long,
        default_value = "notion",
        help = "Store backend. Available backends: notion (default), memory"
    )]
    store: String,
    #[arg(
        long,
        default_value = "openai",
        help = "Summarizer backend. Available backends: openai (default), dummy, none"
    )]
    summarizer: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Fetch configured feeds and store the new articles
    Ingest {
        /// Run in periodic mode with the specified interval (e.g. 1h, 30m, 1d, 1h15m30s)
        #[arg(long)]
        interval: Option<HumanDuration>,
    },
    /// Compose and publish a digest of recent articles
    Digest,
    /// List the configured feeds
    Feeds,
}

async fn run_ingest(ingestor: &Ingestor) -> Result<()> {
    let report = ingestor.run().await?;
    info!(
        "📈 Ingest report: {} added, {} skipped, {} failed",
        report.added, report.skipped, report.failed
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let config = Config::load(&cli.config)?;
    info!("⚙️ Loaded {} feeds from {}", config.feeds.len(), cli.config);

    match cli.command {
        Commands::Ingest { interval } => {
            let store = nd_store::create_store(&cli.store)?;
            info!("💾 Store initialized (using {})", cli.store);
            let fetcher = Arc::new(HttpFeedFetcher::new(&config.ingest)?);
            let ingestor = Ingestor::new(store, fetcher, config);

            if let Some(interval) = interval {
                info!("Running in periodic mode with {}s interval", interval.0.as_secs());
                loop {
                    if let Err(e) = run_ingest(&ingestor).await {
                        eprintln!("Error during ingest: {}", e);
                    }
                    info!("Waiting {}s before next ingest", interval.0.as_secs());
                    tokio::time::sleep(interval.0).await;
                }
            } else {
                run_ingest(&ingestor).await?;
            }
        }
        Commands::Digest => {
            let store = nd_store::create_store(&cli.store)?;
            info!("💾 Store initialized (using {})", cli.store);
            let summarizer = if config.digest.ai_summary_enabled && cli.summarizer != "none" {
                Some(nd_inference::create_summarizer(
                    &cli.summarizer,
                    &config.summarizer,
                )?)
            } else {
                None
            };
            let fetcher = Arc::new(HttpContentFetcher::new()?);
            let pipeline = DigestPipeline::new(store, fetcher, summarizer, config);
            match pipeline.run().await? {
                Some(location) => info!("📣 Digest available at {}", location),
                None => info!("Nothing to publish today"),
            }
        }
        Commands::Feeds => {
            for feed in &config.feeds {
                println!("{} [{}] {}", feed.name, feed.category, feed.url);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_unit_durations() {
        assert_eq!(HumanDuration::from_str("30s").unwrap().0.as_secs(), 30);
        assert_eq!(HumanDuration::from_str("5m").unwrap().0.as_secs(), 300);
        assert_eq!(HumanDuration::from_str("1h").unwrap().0.as_secs(), 3600);
        assert_eq!(HumanDuration::from_str("2d").unwrap().0.as_secs(), 172800);
    }

    #[test]
    fn parses_compound_durations() {
        assert_eq!(
            HumanDuration::from_str("1h15m30s").unwrap().0.as_secs(),
            4530
        );
    }

    #[test]
    fn bare_numbers_are_seconds() {
        assert_eq!(HumanDuration::from_str("90").unwrap().0.as_secs(), 90);
    }

    #[test]
    fn rejects_garbage() {
        assert!(HumanDuration::from_str("abc").is_err());
        assert!(HumanDuration::from_str("").is_err());
        assert!(HumanDuration::from_str("1x").is_err());
    }
}
