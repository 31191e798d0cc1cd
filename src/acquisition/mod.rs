//! Roster acquisition: rate-limited, batched parallel fetch of every page of
//! current confinements.
//!
//! Pages are fetched in fixed-size batches over a bounded worker pool. A
//! batch always runs to completion before the stop decision: if every page in
//! it yielded zero records (failures count as empty), the paginated set has
//! been passed and acquisition stops. A hard cap on batch count guards
//! against runaway pagination on unexpected server behavior.

pub mod extract;
pub mod fetch;
pub mod rate_limit;
pub mod session;

use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::config::JailConfig;
use crate::error::AcquireError;
use crate::roster::Roster;

use fetch::fetch_page;
use rate_limit::RateLimiter;
use session::Session;

/// Perform one full roster acquisition: handshake, then batched parallel
/// page fetches until an entirely-empty batch or the batch cap.
///
/// Per-page failures are logged and treated as empty pages; only a failed
/// handshake aborts the acquisition.
pub async fn acquire(config: &JailConfig) -> Result<Roster, AcquireError> {
    let session = Session::establish(config).await?;
    let limiter = RateLimiter::new(config.delay);

    info!("fetching current confinements from jail (parallel)");
    let mut roster = Roster::new();
    let mut batch_start = 1u32;
    let mut pages_checked = 0u32;

    for batch_num in 1..=config.max_batches {
        let results = run_batch(&session, &limiter, config, batch_start).await;
        pages_checked = batch_start + config.batch_size - 1;

        let mut empty_pages = 0u32;
        let mut pages_with_data = 0u32;
        for (index, result) in results {
            match result {
                Ok(records) if !records.is_empty() => {
                    pages_with_data += 1;
                    for record in records {
                        roster.insert(record);
                    }
                }
                Ok(_) => empty_pages += 1,
                Err(failure) => {
                    warn!("page {index} failed: {failure}");
                    empty_pages += 1;
                }
            }
        }

        info!("batch {batch_num}: {pages_with_data} pages with data, {empty_pages} empty");

        if empty_pages == config.batch_size {
            info!("all pages in batch were empty, stopping pagination");
            break;
        }
        batch_start += config.batch_size;
    }

    info!(
        "loaded {} inmate name variations (checked up to page {pages_checked})",
        roster.key_count(),
    );
    Ok(roster)
}

/// Submit one batch of consecutive page indices over the bounded worker pool
/// and wait for all of them. Completion order is irrelevant; each result is
/// tagged with its page index.
async fn run_batch(
    session: &Session,
    limiter: &RateLimiter,
    config: &JailConfig,
    batch_start: u32,
) -> Vec<(u32, Result<Vec<crate::roster::RosterRecord>, crate::error::PageFailure>)> {
    stream::iter(batch_start..batch_start + config.batch_size)
        .map(|index| async move { (index, fetch_page(session, limiter, config, index).await) })
        .buffer_unordered(config.fetch_workers)
        .collect()
        .await
}
