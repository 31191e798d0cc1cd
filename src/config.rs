//! Jail endpoint configuration.
//!
//! Defaults target the Southern Software "Citizen Connect" booking search for
//! Dorchester County, SC. Every field is overridable so tests can point the
//! client at a local mock server and tune pacing.

use std::time::Duration;

/// Default delay between outbound requests. Kept conservative so a full
/// roster pull stays polite to the unauthenticated endpoint.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

/// Configuration for the jail roster client.
#[derive(Debug, Clone)]
pub struct JailConfig {
    /// Base URL of the booking search application (no trailing slash).
    pub base_url: String,
    /// Agency identifier used on the landing page query string.
    pub agency_id: String,
    /// JMS agency identifier carried in the confinement fetch payload.
    pub jms_agency_id: String,
    /// Human-readable facility name copied into matched verdicts.
    pub facility_name: String,
    /// Minimum spacing between outbound requests across all workers.
    pub delay: Duration,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Bounded transport-level retry attempts per page.
    pub max_retries: u32,
    /// Pages fetched concurrently before a stop/continue decision.
    pub batch_size: u32,
    /// Safety bound against runaway pagination.
    pub max_batches: u32,
    /// Bounded worker pool size. Kept smaller than `batch_size` so the rate
    /// limiter, not the pool, governs request pacing.
    pub fetch_workers: usize,
}

impl Default for JailConfig {
    fn default() -> Self {
        Self {
            base_url: "https://cc.southernsoftware.com/bookingsearch".to_string(),
            agency_id: "DorchesterCoSC".to_string(),
            jms_agency_id: "SC018013C".to_string(),
            facility_name: "Dorchester County Detention Center".to_string(),
            delay: DEFAULT_DELAY,
            timeout: Duration::from_secs(30),
            max_retries: 3,
            batch_size: 20,
            max_batches: 3,
            fetch_workers: 3,
        }
    }
}

impl JailConfig {
    /// Landing page URL. Visiting it once establishes session cookies.
    pub fn landing_url(&self) -> String {
        format!("{}/index.php?AgencyID={}", self.base_url, self.agency_id)
    }

    /// Endpoint serving paginated current-confinement fragments.
    pub fn confinements_url(&self) -> String {
        format!("{}/fetchesforajax/fetch_current_confinements.php", self.base_url)
    }
}
