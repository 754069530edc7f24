use anyhow::{Context, Result};
use futures_util::future::try_join_all;
use tabsweep_core::extract::{extract_ids, extract_ids_ordered, ExtractStrategy};
use tabsweep_core::reconcile::{deletion_candidates, is_unchanged};
use tabsweep_core::render::render_document;
use tracing::{debug, warn};

use crate::config::Config;
use crate::control::TabControl;
use crate::editor::EditorBridge;

/// What one reconciliation run did, in closure order.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub cancelled: bool,
    pub closed: Vec<String>,
    pub failed: Vec<String>,
}

/// One full batch-close run: list, fetch details, render, edit, diff,
/// close. Nothing is closed unless every read step succeeded and the user
/// actually changed the document.
pub async fn run(config: &Config, json: bool) -> Result<SweepReport> {
    let control = TabControl::new(&config.control_bin);

    let listing = control.list_tabs().await.context("listing tabs")?;
    let ids = extract_ids_ordered(&listing, ExtractStrategy::LinePrefix);
    if ids.is_empty() {
        println!("no open tabs");
        return Ok(SweepReport::default());
    }
    debug!("listed_tabs: {}", ids.len());

    // Independent reads; fan out, but all must land before anything
    // destructive can happen.
    let records = try_join_all(ids.iter().map(|id| control.tab_info(id)))
        .await
        .context("fetching tab details")?;

    let original = render_document(&records);
    let edited = EditorBridge::new(&config.editor_bin)
        .edit(&original)
        .await
        .context("editing the tab document")?;

    if is_unchanged(&original, &edited) {
        println!("aborted, nothing closed");
        return Ok(SweepReport {
            cancelled: true,
            ..SweepReport::default()
        });
    }

    let survivors = extract_ids(&edited, ExtractStrategy::Anywhere);
    let doomed = deletion_candidates(&records, &survivors);

    // Close requests stay sequential; the audit output keeps listing
    // order and the control binary never sees concurrent closes.
    let mut report = SweepReport::default();
    for record in doomed {
        if json {
            println!("{}", serde_json::to_string(record).context("audit json")?);
        } else {
            println!("closing [{}] {} {}", record.id, record.title, record.url);
        }
        match control.close_tab(&record.id).await {
            Ok(()) => report.closed.push(record.id.clone()),
            Err(err) => {
                warn!("close_failed: {err}");
                eprintln!("{err}");
                report.failed.push(record.id.clone());
            }
        }
    }

    if !json {
        println!(
            "closed {} of {} marked tabs",
            report.closed.len(),
            report.closed.len() + report.failed.len()
        );
    }
    if !report.failed.is_empty() {
        eprintln!("{} close request(s) failed", report.failed.len());
    }
    Ok(report)
}
