//! Run orchestration.
//!
//! Drives the whole pipeline: launch the browser, open the root surface,
//! resolve the guide rows, and walk them strictly in order — row *i+1* does
//! not start until row *i*'s record is appended, so output order always
//! mirrors the source table. Within a row, the two part extractions run
//! concurrently against independent surfaces. The CSV is written once, at
//! the end, and browser teardown runs on success and failure alike.

use chromiumoxide::Browser;
use std::path::PathBuf;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use url::Url;

use crate::browser_setup::launch_browser;
use crate::config::ScrapeConfig;
use crate::extract::links::DISCLOSURE_CLICK_SELECTOR;
use crate::extract::{GuideRow, parse_guide};
use crate::output::{OutputRow, ScrapeSummary, write_csv};
use crate::part_info::{PartOutcome, extract_part_info};
use crate::surface::Surface;

use super::types::{ScrapeError, ScrapeResult};

/// Execute one full scrape run.
pub async fn run(config: &ScrapeConfig) -> ScrapeResult<ScrapeSummary> {
    let base = Url::parse(config.start_url()).map_err(|e| {
        ScrapeError::Config(format!("invalid start URL {:?}: {e}", config.start_url()))
    })?;

    info!("starting buyers-guide scrape of {base}");
    let (browser, handler_task, user_data_dir) =
        launch_browser(config.headless(), config.chrome_data_dir.clone())
            .await
            .map_err(|e| ScrapeError::Browser(format!("{e:#}")))?;

    let outcome = scrape_guide(&browser, &base, config).await;

    teardown(browser, handler_task, user_data_dir).await;
    outcome
}

async fn scrape_guide(
    browser: &Browser,
    base: &Url,
    config: &ScrapeConfig,
) -> ScrapeResult<ScrapeSummary> {
    let root = Surface::open(browser, base.as_str(), config)
        .await
        .map_err(|e| ScrapeError::Browser(format!("{e:#}")))?;

    // Redirects may have moved us; part hrefs resolve against where the
    // guide actually loaded.
    let base = match root.url().await.and_then(|u| Url::parse(&u).ok()) {
        Some(resolved) => resolved,
        None => base.clone(),
    };
    let base = &base;

    let rows = resolve_guide_rows(&root).await?;
    info!("resolved {} guide rows", rows.len());

    let mut out_rows: Vec<OutputRow> = Vec::with_capacity(rows.len());
    let mut parts_resolved = 0usize;
    let mut parts_failed = 0usize;

    for (index, row) in rows.into_iter().enumerate() {
        debug!(
            "row {index}: vehicle={:?} engine={:?} skp={} interchange={}",
            row.vehicle,
            row.engine,
            row.skp.is_some(),
            row.interchange.is_some(),
        );

        // Both part extractions for this row run concurrently; the slots are
        // positional, so completion order cannot reorder anything.
        let (skp, interchange) = tokio::join!(
            extract_part_info(browser, base, row.skp, config),
            extract_part_info(browser, base, row.interchange, config),
        );

        for fetch in [&skp, &interchange] {
            match fetch.outcome {
                PartOutcome::Resolved => parts_resolved += 1,
                PartOutcome::Failed => parts_failed += 1,
                PartOutcome::Absent => {}
            }
        }

        out_rows.push(OutputRow {
            vehicle: row.vehicle,
            engine: row.engine,
            skp: skp.record,
            interchange: interchange.record,
        });
    }

    root.close_quiet().await;

    write_csv(config.output_path(), &out_rows)
        .map_err(|e| ScrapeError::Output(format!("{e:#}")))?;

    Ok(ScrapeSummary {
        rows: out_rows.len(),
        parts_resolved,
        parts_failed,
        output_path: config.output_path().to_path_buf(),
    })
}

/// Snapshot the root surface and resolve its rows, giving collapsed rows one
/// chance to reveal hidden detail first.
///
/// Disclosure affordances discovered in the first parse are clicked on the
/// live page, best-effort; if any click landed, one fresh snapshot replaces
/// the stale parse. Expansion failure is ignored — partial data beats a
/// failed row.
async fn resolve_guide_rows(root: &Surface) -> ScrapeResult<Vec<GuideRow>> {
    let html = root
        .snapshot()
        .await
        .map_err(|e| ScrapeError::Browser(format!("{e:#}")))?;
    let rows = parse_guide(&html);

    let mut labels: Vec<String> = Vec::new();
    for row in &rows {
        for label in &row.disclosures {
            if !labels.contains(label) {
                labels.push(label.clone());
            }
        }
    }
    if labels.is_empty() {
        return Ok(rows);
    }

    let clicked = root
        .click_all_matching(DISCLOSURE_CLICK_SELECTOR, &labels)
        .await;
    if clicked == 0 {
        return Ok(rows);
    }

    debug!("expanded {clicked} disclosure affordances, refreshing snapshot");
    match root.snapshot().await {
        Ok(fresh) => Ok(parse_guide(&fresh)),
        Err(e) => {
            warn!("re-snapshot after expansion failed, keeping first parse: {e:#}");
            Ok(rows)
        }
    }
}

/// Best-effort browser teardown: close, wait for the process to exit, stop
/// the event handler, remove the profile directory. Each failure is logged
/// and dropped.
async fn teardown(mut browser: Browser, handler_task: JoinHandle<()>, user_data_dir: PathBuf) {
    if let Err(e) = browser.close().await {
        warn!("failed to close browser: {e}");
    }
    if let Err(e) = browser.wait().await {
        warn!("failed to wait for browser exit: {e}");
    }
    handler_task.abort();
    if let Err(e) = std::fs::remove_dir_all(&user_data_dir) {
        warn!(
            "failed to remove profile directory {}: {e}",
            user_data_dir.display()
        );
    }
}
