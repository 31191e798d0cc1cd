//! Custody matching against the memoized roster.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{error, info};

use crate::acquisition;
use crate::config::JailConfig;
use crate::error::AcquireError;
use crate::roster::Roster;
use crate::types::{CustodyVerdict, Subject};

/// Checks subjects against the jail's current-confinement roster.
///
/// The roster is acquired at most once per checker: the first `check` (or
/// `roster`) call triggers acquisition, and the once-initialized slot serves
/// every later call without network activity. Concurrent first-callers are
/// serialized by the cell, so they cannot trigger redundant acquisitions. A
/// failed acquisition leaves the slot empty; a later call may retry.
#[derive(Debug)]
pub struct CustodyChecker {
    config: JailConfig,
    roster: OnceCell<Arc<Roster>>,
}

impl CustodyChecker {
    pub fn new(config: JailConfig) -> Self {
        Self {
            config,
            roster: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &JailConfig {
        &self.config
    }

    /// The cached roster, acquiring it on first call.
    pub async fn roster(&self) -> Result<&Arc<Roster>, AcquireError> {
        self.roster
            .get_or_try_init(|| async { acquisition::acquire(&self.config).await.map(Arc::new) })
            .await
    }

    /// Resolve one subject to a verdict. Never fails: acquisition errors are
    /// carried inside the verdict, so a batch of N subjects always yields N
    /// verdicts.
    pub async fn check(&self, subject: &Subject) -> CustodyVerdict {
        info!("checking custody for: {}", subject.full_name());

        let roster = match self.roster().await {
            Ok(roster) => roster,
            Err(e) => {
                error!("error checking custody for {}: {e}", subject.full_name());
                return CustodyVerdict::acquisition_failed(subject, e.to_string());
            }
        };

        for key in subject.lookup_keys() {
            if let Some(record) = roster.lookup(&key) {
                info!(
                    "IN CUSTODY: {} matched as {}",
                    subject.full_name(),
                    record.full_name
                );
                return CustodyVerdict::matched(subject, record, &self.config.facility_name);
            }
        }

        info!("not in custody: {}", subject.full_name());
        CustodyVerdict::unmatched(subject)
    }

    /// Check every subject in order. One verdict per subject, always.
    pub async fn check_all(&self, subjects: &[Subject]) -> Vec<CustodyVerdict> {
        let mut verdicts = Vec::with_capacity(subjects.len());
        for (i, subject) in subjects.iter().enumerate() {
            info!(
                "[{}/{}] checking: {}",
                i + 1,
                subjects.len(),
                subject.full_name()
            );
            verdicts.push(self.check(subject).await);
        }
        verdicts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::RosterRecord;

    fn record(last: &str, first: &str, middle: &str) -> RosterRecord {
        RosterRecord {
            full_name: format!("{last} {first} {middle}").trim().to_string(),
            first_name: first.to_string(),
            middle_name: middle.to_string(),
            last_name: last.to_string(),
            booking_number: Some("48213".to_string()),
            booking_date: Some("10/27/2025".to_string()),
            arrest_datetime: None,
            arresting_agency: None,
            bond_amount: Some("$5,000.00".to_string()),
            charges: Some("Burglary 2nd Degree".to_string()),
            mugshot_url: None,
            page: 1,
        }
    }

    fn checker_with(records: Vec<RosterRecord>) -> CustodyChecker {
        let mut roster = Roster::new();
        for r in records {
            roster.insert(r);
        }
        let checker = CustodyChecker::new(JailConfig::default());
        checker
            .roster
            .set(Arc::new(roster))
            .expect("fresh cell accepts a roster");
        checker
    }

    #[tokio::test]
    async fn exact_key_matches() {
        let checker = checker_with(vec![record("SMITH", "JOHN", "")]);
        let verdict = checker.check(&Subject::new("Smith", "John", "")).await;

        assert!(verdict.in_custody);
        assert_eq!(verdict.matched_as.as_deref(), Some("SMITH JOHN"));
        assert_eq!(verdict.booking_number.as_deref(), Some("48213"));
        assert_eq!(
            verdict.custody_location.as_deref(),
            Some("Dorchester County Detention Center")
        );
        assert!(verdict.error.is_none());
    }

    #[tokio::test]
    async fn one_letter_difference_does_not_match() {
        let checker = checker_with(vec![record("SMITH", "JOHN", "")]);
        let verdict = checker.check(&Subject::new("Smith", "Jon", "")).await;

        assert!(!verdict.in_custody);
        assert!(verdict.booking_number.is_none());
        assert!(verdict.error.is_none());
    }

    #[tokio::test]
    async fn subject_middle_name_falls_back_to_short_key() {
        let checker = checker_with(vec![record("SMITH", "JOHN", "")]);
        let verdict = checker.check(&Subject::new("Smith", "John", "Quincy")).await;
        assert!(verdict.in_custody);
    }

    #[tokio::test]
    async fn roster_middle_name_matches_subject_without_one() {
        let checker = checker_with(vec![record("ADAMS", "AVERY", "ARRON")]);
        let verdict = checker.check(&Subject::new("Adams", "Avery", "")).await;
        assert!(verdict.in_custody);
        assert_eq!(verdict.matched_as.as_deref(), Some("ADAMS AVERY ARRON"));
    }

    #[tokio::test]
    async fn case_metadata_passes_through() {
        let checker = checker_with(vec![record("SMITH", "JOHN", "")]);
        let mut subject = Subject::new("Smith", "John", "");
        subject.matter_number = Some("M-77".to_string());
        subject.case_number = Some("2025GS001".to_string());

        let verdict = checker.check(&subject).await;
        assert_eq!(verdict.matter_number.as_deref(), Some("M-77"));
        assert_eq!(verdict.case_number.as_deref(), Some("2025GS001"));
    }
}
