//! Error taxonomy for roster acquisition.
//!
//! Failures are contained at the smallest possible scope: a malformed record
//! is skipped, a failed page becomes an empty page, and only a failed session
//! handshake surfaces as [`AcquireError`] — which the custody checker folds
//! into an error-bearing verdict rather than propagating to the caller.

use thiserror::Error;

/// Total acquisition failure. Nothing was fetched; the roster cache stays
/// unset so a later call may retry.
#[derive(Debug, Error)]
pub enum AcquireError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("session handshake failed: {0}")]
    Handshake(#[source] reqwest::Error),

    #[error("session handshake returned status {0}")]
    HandshakeStatus(u16),
}

/// Why a single page fetch produced no records.
///
/// Classified rather than stringly-typed so the acquirer can log the reason
/// while still folding the page into the "empty" bucket for the stop
/// heuristic.
#[derive(Debug, Error)]
pub enum PageFailure {
    #[error("status {0}")]
    Status(u16),

    #[error("transport: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("extraction task failed: {0}")]
    Extraction(#[from] tokio::task::JoinError),
}
