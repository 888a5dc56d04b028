//! Run engine: error taxonomy and the orchestrator that drives a scrape.

pub mod orchestrator;
pub mod types;

pub use orchestrator::run;
pub use types::{ScrapeError, ScrapeResult};
