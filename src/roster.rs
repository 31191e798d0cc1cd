//! In-memory confinement roster and the name-key scheme used to index it.
//!
//! The roster is built once per acquisition and is read-only afterwards;
//! rebuilding means replacing the whole map, never patching it in place.
//! Each record is indexed under two keys — the full name triple and the
//! triple with the middle name omitted — so a lookup still succeeds when the
//! two sides disagree only on the presence of a middle name.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

/// Canonical lookup key for a name triple.
///
/// Lowercases and whitespace-collapses each component, then joins the
/// non-empty components with single spaces in last-first-middle order.
/// Deterministic and total: any non-empty last/first yields a non-empty key.
/// Applied identically to roster records and subject queries; no fuzzy
/// distance beyond case/whitespace normalization (a nickname, transposition,
/// or misspelling will not match — a known precision tradeoff).
pub fn name_key(last: &str, first: &str, middle: &str) -> String {
    [last, first, middle]
        .iter()
        .map(|part| {
            part.split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
                .to_lowercase()
        })
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// One confined individual, as extracted from a booking-card block.
/// Immutable once constructed.
#[derive(Debug, Clone, Serialize)]
pub struct RosterRecord {
    /// Name exactly as displayed on the roster page.
    pub full_name: String,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    /// Booking identifier pulled from the detail link.
    pub booking_number: Option<String>,
    pub booking_date: Option<String>,
    pub arrest_datetime: Option<String>,
    pub arresting_agency: Option<String>,
    pub bond_amount: Option<String>,
    /// Charge descriptions joined with `"; "`.
    pub charges: Option<String>,
    pub mugshot_url: Option<String>,
    /// 1-based page index the record was extracted from.
    pub page: u32,
}

impl RosterRecord {
    /// Lookup keys for this record: full triple first, then without middle.
    /// Collapses to a single key when there is no middle name.
    pub fn keys(&self) -> Vec<String> {
        let full = name_key(&self.last_name, &self.first_name, &self.middle_name);
        let short = name_key(&self.last_name, &self.first_name, "");
        if full == short {
            vec![full]
        } else {
            vec![full, short]
        }
    }
}

/// The full set of currently confined individuals, keyed by [`name_key`].
///
/// Multiple keys may point at the same record. Last-write-wins on key
/// collision: duplicate keys represent the same individual appearing on more
/// than one page.
#[derive(Debug, Default)]
pub struct Roster {
    by_key: HashMap<String, Arc<RosterRecord>>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index a record under all of its keys.
    pub fn insert(&mut self, record: RosterRecord) {
        let record = Arc::new(record);
        for key in record.keys() {
            self.by_key.insert(key, Arc::clone(&record));
        }
    }

    /// Look up a record by canonical key.
    pub fn lookup(&self, key: &str) -> Option<&RosterRecord> {
        self.by_key.get(key).map(Arc::as_ref)
    }

    /// Number of indexed name variations (not distinct individuals).
    pub fn key_count(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}
