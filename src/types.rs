//! Subjects, verdicts, and the report envelope.
//!
//! A subject is a person to check; a verdict is the always-produced outcome
//! of one check. Case metadata on the subject is opaque to the matcher and
//! passes through into the verdict unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::roster::{name_key, RosterRecord};

/// A person to check against the roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    pub last_name: String,
    pub first_name: String,
    #[serde(default)]
    pub middle_name: String,
    #[serde(default)]
    pub matter_number: Option<String>,
    #[serde(default)]
    pub case_number: Option<String>,
    #[serde(default)]
    pub charges: Option<String>,
    #[serde(default)]
    pub incident_date: Option<String>,
    #[serde(default)]
    pub case_status: Option<String>,
}

impl Subject {
    pub fn new(last: impl Into<String>, first: impl Into<String>, middle: impl Into<String>) -> Self {
        Self {
            last_name: last.into(),
            first_name: first.into(),
            middle_name: middle.into(),
            matter_number: None,
            case_number: None,
            charges: None,
            incident_date: None,
            case_status: None,
        }
    }

    /// Formatted as "Last, First Middle".
    pub fn full_name(&self) -> String {
        let middle = self.middle_name.trim();
        if middle.is_empty() {
            format!("{}, {}", self.last_name, self.first_name)
        } else {
            format!("{}, {} {middle}", self.last_name, self.first_name)
        }
    }

    /// Lookup keys in priority order: full triple, then without middle.
    pub fn lookup_keys(&self) -> Vec<String> {
        let full = name_key(&self.last_name, &self.first_name, &self.middle_name);
        let short = name_key(&self.last_name, &self.first_name, "");
        if full == short {
            vec![full]
        } else {
            vec![full, short]
        }
    }
}

/// Outcome of one custody check. Always produced, never thrown: a failed
/// acquisition yields a verdict carrying an error description instead of a
/// fault.
#[derive(Debug, Clone, Serialize)]
pub struct CustodyVerdict {
    pub subject_name: String,
    pub matter_number: Option<String>,
    pub case_number: Option<String>,
    pub in_custody: bool,
    /// Roster display name the subject matched, when in custody.
    pub matched_as: Option<String>,
    pub booking_number: Option<String>,
    pub booking_date: Option<String>,
    pub custody_location: Option<String>,
    pub charges_at_booking: Option<String>,
    pub bond_amount: Option<String>,
    pub mugshot_url: Option<String>,
    pub checked_at: DateTime<Utc>,
    /// Set when roster acquisition failed; `in_custody` is false.
    pub error: Option<String>,
}

impl CustodyVerdict {
    fn base(subject: &Subject) -> Self {
        Self {
            subject_name: subject.full_name(),
            matter_number: subject.matter_number.clone(),
            case_number: subject.case_number.clone(),
            in_custody: false,
            matched_as: None,
            booking_number: None,
            booking_date: None,
            custody_location: None,
            charges_at_booking: None,
            bond_amount: None,
            mugshot_url: None,
            checked_at: Utc::now(),
            error: None,
        }
    }

    /// Positive verdict with booking detail copied from the matched record.
    pub fn matched(subject: &Subject, record: &RosterRecord, facility: &str) -> Self {
        Self {
            in_custody: true,
            matched_as: Some(record.full_name.clone()),
            booking_number: record.booking_number.clone(),
            booking_date: record.booking_date.clone(),
            custody_location: Some(facility.to_string()),
            charges_at_booking: record.charges.clone(),
            bond_amount: record.bond_amount.clone(),
            mugshot_url: record.mugshot_url.clone(),
            ..Self::base(subject)
        }
    }

    /// Negative verdict: neither lookup key was present.
    pub fn unmatched(subject: &Subject) -> Self {
        Self::base(subject)
    }

    /// Negative verdict carrying the acquisition error description.
    pub fn acquisition_failed(subject: &Subject, error: String) -> Self {
        Self {
            error: Some(error),
            ..Self::base(subject)
        }
    }

    /// Human-readable one-line status.
    pub fn status_summary(&self) -> String {
        if let Some(error) = &self.error {
            return format!("ERROR: {error}");
        }
        if self.in_custody {
            if let Some(booked) = &self.booking_date {
                return format!("IN CUSTODY - Booked: {booked}");
            }
            return "IN CUSTODY".to_string();
        }
        "NOT IN CUSTODY".to_string()
    }
}

/// A complete custody-check run over a list of subjects.
#[derive(Debug, Serialize)]
pub struct CustodyReport {
    pub generated_at: DateTime<Utc>,
    pub source_file: Option<String>,
    pub subjects: Vec<Subject>,
    pub verdicts: Vec<CustodyVerdict>,
}

impl CustodyReport {
    pub fn new(
        source_file: Option<String>,
        subjects: Vec<Subject>,
        verdicts: Vec<CustodyVerdict>,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            source_file,
            subjects,
            verdicts,
        }
    }

    pub fn total(&self) -> usize {
        self.verdicts.len()
    }

    pub fn matched_count(&self) -> usize {
        self.verdicts.iter().filter(|v| v.in_custody).count()
    }

    pub fn unmatched_count(&self) -> usize {
        self.verdicts
            .iter()
            .filter(|v| !v.in_custody && v.error.is_none())
            .count()
    }

    pub fn error_count(&self) -> usize {
        self.verdicts.iter().filter(|v| v.error.is_some()).count()
    }

    /// Verdicts for subjects currently in custody.
    pub fn in_custody(&self) -> Vec<&CustodyVerdict> {
        self.verdicts.iter().filter(|v| v.in_custody).collect()
    }

    /// Multi-line text summary with aggregate counts.
    pub fn summary(&self) -> String {
        format!(
            "Custody Check Summary\n\
             {}\n\
             Date: {}\n\
             Source: {}\n\
             \n\
             Total Subjects Checked: {}\n\
             In Custody: {}\n\
             Not in Custody: {}\n\
             Errors: {}\n",
            "=".repeat(50),
            self.generated_at.format("%Y-%m-%d %H:%M:%S"),
            self.source_file.as_deref().unwrap_or("N/A"),
            self.total(),
            self.matched_count(),
            self.unmatched_count(),
            self.error_count(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_name_formats() {
        assert_eq!(Subject::new("Smith", "John", "").full_name(), "Smith, John");
        assert_eq!(
            Subject::new("Johnson", "Jane", "Marie").full_name(),
            "Johnson, Jane Marie"
        );
    }

    #[test]
    fn full_name_trims_padded_middle() {
        assert_eq!(
            Subject::new("Johnson", "Jane", " Marie ").full_name(),
            "Johnson, Jane Marie"
        );
        assert_eq!(Subject::new("Smith", "John", "   ").full_name(), "Smith, John");
    }

    #[test]
    fn lookup_keys_priority_order() {
        let subject = Subject::new("Doe", "John", "Q");
        assert_eq!(subject.lookup_keys(), vec!["doe john q", "doe john"]);

        let no_middle = Subject::new("Doe", "John", "");
        assert_eq!(no_middle.lookup_keys(), vec!["doe john"]);
    }

    #[test]
    fn status_summary_variants() {
        let subject = Subject::new("Doe", "Jane", "");

        let mut matched = CustodyVerdict::unmatched(&subject);
        matched.in_custody = true;
        matched.booking_date = Some("10/27/2025".to_string());
        assert_eq!(matched.status_summary(), "IN CUSTODY - Booked: 10/27/2025");

        matched.booking_date = None;
        assert_eq!(matched.status_summary(), "IN CUSTODY");

        let unmatched = CustodyVerdict::unmatched(&subject);
        assert_eq!(unmatched.status_summary(), "NOT IN CUSTODY");

        let errored = CustodyVerdict::acquisition_failed(&subject, "timeout".to_string());
        assert_eq!(errored.status_summary(), "ERROR: timeout");
    }

    #[test]
    fn report_counts() {
        let a = Subject::new("A", "B", "");
        let c = Subject::new("C", "D", "");
        let e = Subject::new("E", "F", "");

        let mut in_custody = CustodyVerdict::unmatched(&a);
        in_custody.in_custody = true;
        let out = CustodyVerdict::unmatched(&c);
        let errored = CustodyVerdict::acquisition_failed(&e, "down".to_string());

        let report = CustodyReport::new(
            Some("input.csv".to_string()),
            vec![a, c, e],
            vec![in_custody, out, errored],
        );

        assert_eq!(report.total(), 3);
        assert_eq!(report.matched_count(), 1);
        assert_eq!(report.unmatched_count(), 1);
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.in_custody().len(), 1);
        assert!(report.summary().contains("Total Subjects Checked: 3"));
        assert!(report.summary().contains("In Custody: 1"));
    }
}
