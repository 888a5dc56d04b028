//! Browsing-surface wrapper.
//!
//! The extraction heuristics never touch the live browser; everything they
//! need from it goes through this narrow capability: navigate to a URL and
//! wait for a parseable DOM, snapshot the rendered HTML, click elements
//! addressed by visible text, and close quietly. Clicks and closes are
//! best-effort by design — a failed expand or cleanup must never abort data
//! collection.

use anyhow::{Context, Result};
use chromiumoxide::Browser;
use chromiumoxide::cdp::browser_protocol::target::TargetId;
use chromiumoxide::page::Page;
use regex::Regex;
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

use crate::config::ScrapeConfig;
use crate::extract::normalize_ws;

const DOM_READY_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// One browsing surface (a page/tab) owned by this process.
pub struct Surface {
    page: Page,
}

impl Surface {
    /// Open a fresh surface and navigate it to `url`.
    ///
    /// Navigation failure is a hard error (the surface is closed first);
    /// the DOM-ready wait past `goto` is soft — a slow page proceeds with
    /// whatever has parsed.
    pub async fn open(browser: &Browser, url: &str, config: &ScrapeConfig) -> Result<Self> {
        let page = browser
            .new_page("about:blank")
            .await
            .context("failed to create page")?;
        let surface = Self { page };

        if let Err(e) = surface.navigate(url, config).await {
            surface.close_quiet().await;
            return Err(e);
        }
        Ok(surface)
    }

    /// Wrap a page created elsewhere (e.g. one the runtime opened for a
    /// click-triggered navigation).
    #[must_use]
    pub fn from_page(page: Page) -> Self {
        Self { page }
    }

    async fn navigate(&self, url: &str, config: &ScrapeConfig) -> Result<()> {
        let timeout = config.page_load_timeout();
        match tokio::time::timeout(timeout, self.page.goto(url)).await {
            Ok(result) => {
                result.with_context(|| format!("navigation to {url} failed"))?;
            }
            Err(_) => {
                anyhow::bail!("navigation to {url} timed out after {}s", timeout.as_secs());
            }
        }
        self.wait_dom_ready(config.dom_ready_timeout()).await;
        Ok(())
    }

    /// Poll `document.readyState` until the DOM is parseable.
    ///
    /// "interactive" is enough — detail extraction reads markup, it does not
    /// wait for images or network idle. Timing out is not an error; the
    /// caller proceeds with whatever the snapshot yields.
    pub async fn wait_dom_ready(&self, timeout: Duration) {
        let start = Instant::now();
        loop {
            match self.page.evaluate("document.readyState").await {
                Ok(result) => {
                    if let Ok(value) = result.into_value::<serde_json::Value>()
                        && let Some(state) = value.as_str()
                        && state != "loading"
                    {
                        trace!(
                            "DOM ready ({state}) after {:.2}s",
                            start.elapsed().as_secs_f64()
                        );
                        return;
                    }
                }
                Err(e) => trace!("readyState probe failed: {e}, retrying"),
            }
            if start.elapsed() >= timeout {
                warn!(
                    "DOM not ready after {}s, proceeding anyway",
                    timeout.as_secs()
                );
                return;
            }
            tokio::time::sleep(DOM_READY_POLL_INTERVAL).await;
        }
    }

    /// Rendered HTML of the surface.
    pub async fn snapshot(&self) -> Result<String> {
        self.page
            .content()
            .await
            .context("failed to read page content")
    }

    /// Current URL, best-effort.
    pub async fn url(&self) -> Option<String> {
        self.page.url().await.ok().flatten()
    }

    /// Click every element under `selector` whose normalized visible text
    /// equals one of `labels`, once each. Returns how many clicks landed;
    /// every failure is swallowed.
    pub async fn click_all_matching(&self, selector: &str, labels: &[String]) -> usize {
        let elements = match self.page.find_elements(selector).await {
            Ok(elements) => elements,
            Err(e) => {
                trace!("element scan for clicks failed: {e}");
                return 0;
            }
        };

        let mut clicked = 0;
        for element in elements {
            let text = match element.inner_text().await {
                Ok(Some(text)) => normalize_ws(&text),
                _ => continue,
            };
            if !labels.iter().any(|label| *label == text) {
                continue;
            }
            match element.click().await {
                Ok(_) => clicked += 1,
                Err(e) => trace!("click on {text:?} failed: {e}"),
            }
        }
        clicked
    }

    /// Click the first element under `selector` whose normalized visible
    /// text matches `pattern`. Returns whether a click landed.
    pub async fn click_first_matching(&self, selector: &str, pattern: &Regex) -> bool {
        let elements = match self.page.find_elements(selector).await {
            Ok(elements) => elements,
            Err(e) => {
                trace!("element scan for clicks failed: {e}");
                return false;
            }
        };

        for element in elements {
            let text = match element.inner_text().await {
                Ok(Some(text)) => normalize_ws(&text),
                _ => continue,
            };
            if !pattern.is_match(&text) {
                continue;
            }
            match element.click().await {
                Ok(_) => return true,
                Err(e) => {
                    trace!("click on {text:?} failed: {e}");
                    return false;
                }
            }
        }
        false
    }

    /// CDP target identity, used to tell pre-existing surfaces from ones the
    /// runtime creates in response to a click.
    #[must_use]
    pub fn target_id(&self) -> TargetId {
        self.page.target_id().clone()
    }

    /// Close the surface, swallowing any error. Cleanup, not a result.
    pub async fn close_quiet(self) {
        if let Err(e) = self.page.close().await {
            debug!("surface close failed (ignored): {e}");
        }
    }
}
