//! Run configuration for buyers-guide extraction.
//!
//! Every option has a default; the environment (and one optional positional
//! argument, handled in `main`) can override them. Configuration loading never
//! aborts a run: malformed values fall back to the default with a warning.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// Fixed base delay for the retry executor, in milliseconds.
///
/// Attempt `n` sleeps `n × RETRY_BASE_DELAY_MS` before the next try.
pub const RETRY_BASE_DELAY_MS: u64 = 500;

/// Default bound on retry attempts for one part extraction.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default starting URL when neither env nor argument provides one.
pub const DEFAULT_START_URL: &str = "https://example.com/buyers-guide";

/// Default output CSV path.
pub const DEFAULT_OUTPUT_PATH: &str = "./buyers_guide.csv";

/// Main configuration for a scrape run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Root buyers-guide URL to open.
    pub(crate) start_url: String,
    /// Path of the CSV written at the end of the run.
    pub(crate) output_path: PathBuf,
    /// Attempt bound for one part's detail extraction.
    pub(crate) max_retries: u32,
    /// Run Chromium headless.
    pub(crate) headless: bool,
    /// Timeout for `page.goto()` in seconds.
    pub(crate) page_load_timeout_secs: u64,
    /// Timeout for the DOM-ready poll in seconds.
    ///
    /// Detail surfaces only need a parseable DOM, not network idle; this
    /// bounds how long the readyState poll runs before proceeding anyway.
    pub(crate) dom_ready_timeout_secs: u64,
    /// Bounded wait for a new browsing surface after an info click, in
    /// milliseconds. Past it, the original surface is the detail surface.
    pub(crate) new_surface_timeout_ms: u64,
    /// Chrome user data directory override. `None` uses a per-process temp dir.
    #[serde(skip)]
    pub(crate) chrome_data_dir: Option<PathBuf>,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            start_url: DEFAULT_START_URL.to_string(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            max_retries: DEFAULT_MAX_RETRIES,
            headless: true,
            page_load_timeout_secs: 30,
            dom_ready_timeout_secs: 10,
            new_surface_timeout_ms: 2000,
            chrome_data_dir: None,
        }
    }
}

impl ScrapeConfig {
    /// Build a config from the process environment.
    ///
    /// Recognized variables: `PARTSCRAPE_URL`, `PARTSCRAPE_OUTPUT`,
    /// `PARTSCRAPE_RETRIES`, `PARTSCRAPE_HEADLESS`.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("PARTSCRAPE_URL")
            && !url.trim().is_empty()
        {
            config.start_url = url;
        }

        if let Ok(path) = std::env::var("PARTSCRAPE_OUTPUT")
            && !path.trim().is_empty()
        {
            config.output_path = PathBuf::from(path);
        }

        if let Ok(raw) = std::env::var("PARTSCRAPE_RETRIES") {
            match raw.trim().parse::<u32>() {
                Ok(n) if n >= 1 => config.max_retries = n,
                _ => warn!(
                    "PARTSCRAPE_RETRIES is not a positive integer ({raw:?}), keeping default {}",
                    config.max_retries
                ),
            }
        }

        if let Ok(raw) = std::env::var("PARTSCRAPE_HEADLESS") {
            config.headless = !matches!(raw.trim(), "0" | "false" | "no");
        }

        config
    }

    /// Override the starting URL.
    #[must_use]
    pub fn with_start_url(mut self, url: impl Into<String>) -> Self {
        self.start_url = url.into();
        self
    }

    /// Override the output CSV path.
    #[must_use]
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Override the retry bound.
    #[must_use]
    pub fn with_max_retries(mut self, attempts: u32) -> Self {
        self.max_retries = attempts;
        self
    }

    /// Toggle headless mode.
    #[must_use]
    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set the Chrome user data directory for profile isolation.
    #[must_use]
    pub fn with_chrome_data_dir(mut self, dir: PathBuf) -> Self {
        self.chrome_data_dir = Some(dir);
        self
    }

    #[must_use]
    pub fn start_url(&self) -> &str {
        &self.start_url
    }

    #[must_use]
    pub fn output_path(&self) -> &std::path::Path {
        &self.output_path
    }

    #[must_use]
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn page_load_timeout(&self) -> Duration {
        Duration::from_secs(self.page_load_timeout_secs)
    }

    #[must_use]
    pub fn dom_ready_timeout(&self) -> Duration {
        Duration::from_secs(self.dom_ready_timeout_secs)
    }

    #[must_use]
    pub fn new_surface_timeout(&self) -> Duration {
        Duration::from_millis(self.new_surface_timeout_ms)
    }

    #[must_use]
    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(RETRY_BASE_DELAY_MS)
    }
}
