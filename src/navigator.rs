//! Detail-surface navigation.
//!
//! Opening a part's target URL is not always the end of the journey: some
//! detail pages hide the real data behind an "info" affordance, and clicking
//! it either navigates in place or makes the runtime open a new tab. Both
//! outcomes are valid; a bounded wait decides which happened. The navigator
//! releases only surfaces it opened itself, and close failures are swallowed.

use anyhow::Result;
use chromiumoxide::Browser;
use chromiumoxide::cdp::browser_protocol::target::TargetId;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use std::time::{Duration, Instant};
use tracing::{debug, trace};
use url::Url;

use crate::config::ScrapeConfig;
use crate::extract::{INFO_PATTERN, element_text};
use crate::surface::Surface;

static CLICKABLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("a, button").expect("BUG: hardcoded selector 'a, button' is statically valid")
});

const NEW_SURFACE_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// The surface a part's description and specifications are read from, plus
/// whatever transient surface got it there.
pub struct DetailSurface {
    active: Surface,
    origin: Option<Surface>,
}

impl DetailSurface {
    /// The surface to extract from.
    #[must_use]
    pub fn surface(&self) -> &Surface {
        &self.active
    }

    /// Close every surface this navigation opened. Best-effort; close
    /// failures are logged and dropped.
    pub async fn release(self) {
        if let Some(origin) = self.origin {
            origin.close_quiet().await;
        }
        self.active.close_quiet().await;
    }
}

/// Open `url` and resolve the surface the detail data actually lives on.
///
/// 1. Fresh surface, navigate, wait for a parseable DOM.
/// 2. No info affordance → that surface is the detail surface.
/// 3. Info affordance → click it and race "new surface appears" against the
///    bounded wait; a new surface wins, otherwise the original (possibly
///    navigated in place) is used.
pub async fn open_detail_surface(
    browser: &Browser,
    url: &Url,
    config: &ScrapeConfig,
) -> Result<DetailSurface> {
    let original = Surface::open(browser, url.as_str(), config).await?;

    let has_info = match original.snapshot().await {
        Ok(html) => find_info_affordance(&html).is_some(),
        Err(e) => {
            trace!("snapshot for info scan failed: {e}");
            false
        }
    };

    if !has_info {
        return Ok(DetailSurface {
            active: original,
            origin: None,
        });
    }

    debug!("info affordance present on {url}, following it");
    let known = known_targets(browser).await;

    if !original
        .click_first_matching("a, button", &INFO_PATTERN)
        .await
    {
        trace!("info affordance did not take the click, using original surface");
        return Ok(DetailSurface {
            active: original,
            origin: None,
        });
    }

    // An empty known set means enumeration failed; diffing against it would
    // claim pre-existing surfaces as new. Treat the click as in-place.
    if known.is_empty() {
        original.wait_dom_ready(config.dom_ready_timeout()).await;
        return Ok(DetailSurface {
            active: original,
            origin: None,
        });
    }

    // Race: either the runtime spawns a new target for the click, or the
    // click navigated in place and the deadline passes.
    let deadline = Instant::now() + config.new_surface_timeout();
    loop {
        if let Ok(pages) = browser.pages().await
            && let Some(page) = pages
                .into_iter()
                .find(|p| !known.contains(p.target_id()))
        {
            debug!("click opened a new surface, extracting there");
            let fresh = Surface::from_page(page);
            fresh.wait_dom_ready(config.dom_ready_timeout()).await;
            return Ok(DetailSurface {
                active: fresh,
                origin: Some(original),
            });
        }
        if Instant::now() >= deadline {
            break;
        }
        tokio::time::sleep(NEW_SURFACE_POLL_INTERVAL).await;
    }

    debug!("no new surface within the wait, click resolved in place");
    original.wait_dom_ready(config.dom_ready_timeout()).await;
    Ok(DetailSurface {
        active: original,
        origin: None,
    })
}

/// Visible text of the first info affordance in a snapshot, if any.
#[must_use]
pub fn find_info_affordance(html: &str) -> Option<String> {
    find_affordance(html, &INFO_PATTERN)
}

fn find_affordance(html: &str, pattern: &Regex) -> Option<String> {
    let doc = Html::parse_document(html);
    doc.select(&CLICKABLE_SELECTOR)
        .map(element_text)
        .find(|text| pattern.is_match(text))
}

async fn known_targets(browser: &Browser) -> HashSet<TargetId> {
    match browser.pages().await {
        Ok(pages) => pages.iter().map(|p| p.target_id().clone()).collect(),
        Err(e) => {
            trace!("target enumeration failed: {e}");
            HashSet::new()
        }
    }
}
