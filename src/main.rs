// Buyers-guide scraper binary.
//
// Configuration comes from the environment (PARTSCRAPE_URL, PARTSCRAPE_OUTPUT,
// PARTSCRAPE_RETRIES, PARTSCRAPE_HEADLESS); a positional argument overrides
// the starting URL. Any fatal failure is logged and exits non-zero.

use partscrape::{ScrapeConfig, scrape};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,chromiumoxide=warn")),
        )
        .init();

    let mut config = ScrapeConfig::from_env();
    if let Some(url) = std::env::args().nth(1) {
        config = config.with_start_url(url);
    }

    match scrape(config).await {
        Ok(summary) => {
            info!(
                "scraped {} rows ({} parts resolved, {} failed) -> {}",
                summary.rows,
                summary.parts_resolved,
                summary.parts_failed,
                summary.output_path.display()
            );
        }
        Err(e) => {
            error!("scrape failed: {e}");
            std::process::exit(1);
        }
    }
}
