//! Single-page fetch with bounded transport retry.

use std::time::Duration;

use tracing::{debug, info};

use crate::acquisition::extract;
use crate::acquisition::rate_limit::RateLimiter;
use crate::acquisition::session::Session;
use crate::config::JailConfig;
use crate::error::PageFailure;
use crate::roster::RosterRecord;

/// Fetch one 1-based page of current confinements and extract its records.
///
/// Waits for a rate-limiter turn first, so the caller can submit many pages
/// concurrently and still respect the configured request spacing. A page
/// failure is classified, not fatal: the acquirer folds it into the "empty"
/// bucket.
pub async fn fetch_page(
    session: &Session,
    limiter: &RateLimiter,
    config: &JailConfig,
    index: u32,
) -> Result<Vec<RosterRecord>, PageFailure> {
    limiter.await_turn().await;

    let body = post_with_retry(session, config, index).await?;
    let records = tokio::task::spawn_blocking(move || extract::extract_records(&body, index)).await?;

    if records.is_empty() {
        debug!("no inmates found on page {index}");
    } else {
        info!("page {index}: found {} inmates", records.len());
    }
    Ok(records)
}

/// POST the confinement fetch form, retrying on 5xx, 429, and connect/timeout
/// errors with exponential backoff up to `max_retries` attempts.
async fn post_with_retry(
    session: &Session,
    config: &JailConfig,
    index: u32,
) -> Result<String, PageFailure> {
    let idx = index.to_string();
    let mut retries = 0u32;

    loop {
        let result = session
            .client()
            .post(config.confinements_url())
            .form(&[
                ("JMSAgencyID", config.jms_agency_id.as_str()),
                ("search", ""),
                ("agency", ""),
                ("sort", "name"),
                ("IDX", idx.as_str()),
            ])
            .send()
            .await;

        match result {
            Ok(response) => {
                let status = response.status();

                if status.is_server_error() && retries < config.max_retries {
                    retries += 1;
                    let delay = Duration::from_millis(500 * 2u64.pow(retries - 1));
                    debug!("page {index}: status {status}, retry {retries} in {delay:?}");
                    tokio::time::sleep(delay).await;
                    continue;
                }

                if status.as_u16() == 429 && retries < config.max_retries {
                    retries += 1;
                    let retry_after = response
                        .headers()
                        .get("retry-after")
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(2);
                    tokio::time::sleep(Duration::from_secs(retry_after.min(10))).await;
                    continue;
                }

                if !status.is_success() {
                    return Err(PageFailure::Status(status.as_u16()));
                }

                return response.text().await.map_err(PageFailure::Transport);
            }
            Err(e) if (e.is_timeout() || e.is_connect()) && retries < config.max_retries => {
                retries += 1;
                let delay = Duration::from_millis(500 * 2u64.pow(retries - 1));
                debug!("page {index}: transport error, retry {retries} in {delay:?}: {e}");
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(PageFailure::Transport(e)),
        }
    }
}
