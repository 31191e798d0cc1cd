// Copyright 2026 Rollcall Contributors
// SPDX-License-Identifier: Apache-2.0

//! Rollcall — batch custody checks against a county jail's live
//! confinement roster.
//!
//! The core is the acquisition and matching subsystem: a rate-limited,
//! batched parallel fetcher over the jail's paginated confinement endpoint,
//! per-record extraction from booking-card markup, and exact-match lookup of
//! normalized name keys. Subject ingestion and report rendering sit at the
//! edges and never touch the acquisition internals.

pub mod acquisition;
pub mod config;
pub mod custody;
pub mod error;
pub mod ingest;
pub mod report;
pub mod roster;
pub mod types;
