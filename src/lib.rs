pub mod browser_setup;
pub mod config;
pub mod engine;
pub mod extract;
pub mod navigator;
pub mod output;
pub mod part_info;
pub mod retry;
pub mod surface;

pub use browser_setup::{download_managed_browser, find_browser_executable, launch_browser};
pub use config::ScrapeConfig;
pub use engine::{ScrapeError, ScrapeResult};
pub use extract::links::PartLink;
pub use extract::specs::SpecMap;
pub use output::{CSV_HEADER, OutputRow, PartRecord, ScrapeSummary};
pub use retry::with_retries;

/// Run one full buyers-guide scrape with the given configuration.
pub async fn scrape(config: ScrapeConfig) -> ScrapeResult<ScrapeSummary> {
    engine::run(&config).await
}
