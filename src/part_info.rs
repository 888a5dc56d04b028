//! Part record extraction: link → detail surface → record.
//!
//! Composes the navigator, the labeled-value extractor, and the spec
//! aggregator into one part record, retry-wrapped. A missing link, an
//! unresolvable target, or an exhausted retry budget all degrade to a record
//! with fewer fields filled — never to a dropped row or a propagated error.

use anyhow::Result;
use chromiumoxide::Browser;
use scraper::Html;
use tracing::{debug, warn};
use url::Url;

use crate::config::ScrapeConfig;
use crate::extract::labeled::labeled_value;
use crate::extract::links::PartLink;
use crate::extract::specs::{SpecMap, collect_specs};
use crate::extract::DESCRIPTION_PATTERN;
use crate::navigator::open_detail_surface;
use crate::output::PartRecord;
use crate::retry::with_retries;

/// How a part's extraction ended, for run-summary tallies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartOutcome {
    /// No link in the row; nothing was attempted.
    Absent,
    /// Detail extraction succeeded.
    Resolved,
    /// A link existed but extraction failed; a partial record was emitted.
    Failed,
}

/// A part record plus its outcome.
#[derive(Debug)]
pub struct PartFetch {
    pub record: PartRecord,
    pub outcome: PartOutcome,
}

/// Produce the record for one part link of one row.
///
/// `None` short-circuits to the all-empty record. A link without a
/// resolvable absolute target (no `href`, or a join failure against the base
/// URL) yields the part name alone, without navigating. Otherwise the full
/// detail flow runs under the retry executor, a fresh surface per attempt.
pub async fn extract_part_info(
    browser: &Browser,
    base: &Url,
    link: Option<PartLink>,
    config: &ScrapeConfig,
) -> PartFetch {
    let Some(link) = link else {
        return PartFetch {
            record: PartRecord::empty(),
            outcome: PartOutcome::Absent,
        };
    };

    let part = link.text;
    // Anchors sometimes carry javascript:/mailto: pseudo-targets; only a
    // navigable http(s) URL counts as resolved.
    let target = link
        .href
        .as_deref()
        .and_then(|href| base.join(href).ok())
        .filter(|u| matches!(u.scheme(), "http" | "https"));
    let Some(target) = target else {
        debug!("part {part:?}: no resolvable target URL, skipping navigation");
        return PartFetch {
            record: PartRecord {
                part,
                ..PartRecord::empty()
            },
            outcome: PartOutcome::Failed,
        };
    };

    let label = format!("part {part:?}");
    let result = with_retries(
        &label,
        config.max_retries(),
        config.retry_base_delay(),
        || fetch_detail(browser, &target, config),
    )
    .await;

    match result {
        Ok((description, specs)) => PartFetch {
            record: PartRecord {
                part,
                url: target.to_string(),
                description,
                specs,
            },
            outcome: PartOutcome::Resolved,
        },
        Err(e) => {
            warn!("part {part:?}: extraction failed after retries: {e:#}");
            PartFetch {
                record: PartRecord {
                    part,
                    url: target.to_string(),
                    ..PartRecord::empty()
                },
                outcome: PartOutcome::Failed,
            }
        }
    }
}

/// One attempt of the detail flow: open, snapshot, extract, release.
/// The surface is released on every path so a retry starts clean.
async fn fetch_detail(
    browser: &Browser,
    url: &Url,
    config: &ScrapeConfig,
) -> Result<(String, SpecMap)> {
    let detail = open_detail_surface(browser, url, config).await?;
    let extracted = detail
        .surface()
        .snapshot()
        .await
        .map(|html| extract_detail(&html));
    detail.release().await;
    extracted
}

/// Description plus merged specs from a detail snapshot.
fn extract_detail(html: &str) -> (String, SpecMap) {
    let doc = Html::parse_document(html);
    (labeled_value(&doc, &DESCRIPTION_PATTERN), collect_specs(&doc))
}
