//! Error type for scrape runs.
//!
//! Only fatal conditions become a `ScrapeError`: structural absence on the
//! page resolves through fallbacks, and transient navigation failures are
//! retried and then confined to one part's record. What reaches this type
//! terminates the run.

use anyhow::Result;
use std::fmt;

/// Fatal failure of a scrape run.
#[derive(Debug, Clone)]
pub enum ScrapeError {
    /// Configuration error (e.g. unparseable start URL)
    Config(String),
    /// Browser launch or root navigation error
    Browser(String),
    /// Output file error
    Output(String),
    /// Other errors
    Other(String),
}

impl fmt::Display for ScrapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::Browser(msg) => write!(f, "Browser error: {msg}"),
            Self::Output(msg) => write!(f, "Output error: {msg}"),
            Self::Other(msg) => write!(f, "Scrape error: {msg}"),
        }
    }
}

impl std::error::Error for ScrapeError {}

impl From<anyhow::Error> for ScrapeError {
    fn from(err: anyhow::Error) -> Self {
        // Use {:#} to preserve full error chain with context
        Self::Other(format!("{err:#}"))
    }
}

/// Convenience alias for Result with `ScrapeError`
pub type ScrapeResult<T> = Result<T, ScrapeError>;
