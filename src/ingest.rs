//! Subject-list ingestion from CSV.
//!
//! Column discovery is by header name so exports with extra columns still
//! load; the only required column is the defendant name. Name cells come in
//! two shapes: "Last, First Middle" and "First [Middle] Last".

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::warn;

use crate::types::Subject;

/// Split a name string into (first, middle, last).
///
/// "Last, First Middle" takes precedence; otherwise tokens are read as
/// first [middle...] last. A single bare token is treated as a last name
/// with no first name, which the loader then rejects.
pub fn parse_subject_name(name: &str) -> (String, String, String) {
    let name = name.trim();

    if let Some((last, rest)) = name.split_once(',') {
        let mut parts = rest.split_whitespace();
        let first = parts.next().unwrap_or("").to_string();
        let middle = parts.collect::<Vec<_>>().join(" ");
        return (first, middle, last.trim().to_string());
    }

    let tokens: Vec<&str> = name.split_whitespace().collect();
    match tokens.as_slice() {
        [] => (String::new(), String::new(), String::new()),
        [last] => (String::new(), String::new(), last.to_string()),
        [first, last] => (first.to_string(), String::new(), last.to_string()),
        [first, middle @ .., last] => (first.to_string(), middle.join(" "), last.to_string()),
    }
}

/// Load subjects from a CSV file.
///
/// Requires a header row containing a defendant/name column; rows whose name
/// cannot produce both a first and last name are skipped with a warning.
pub fn load_subjects(path: &Path) -> Result<Vec<Subject>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read subject list: {}", path.display()))?;
    let rows = parse_rows(&text);

    let Some((header, data)) = rows.split_first() else {
        bail!("subject list is empty: {}", path.display());
    };

    let columns: Vec<String> = header.iter().map(|h| normalize_header(h)).collect();
    let find = |names: &[&str]| -> Option<usize> {
        columns
            .iter()
            .position(|c| names.iter().any(|n| c == n))
    };

    let Some(name_col) = find(&["defendants", "defendant", "defendantname", "name"]) else {
        bail!("no defendant name column found in {}", path.display());
    };
    let case_col = find(&["casenumbers", "casenumber"]);
    let matter_col = find(&["matternumber", "matterno"]);
    let charges_col = find(&["charges", "title"]);
    let incident_col = find(&["initiatedon", "incidentdate"]);
    let status_col = find(&["casestatus", "status"]);

    let cell = |row: &[String], col: Option<usize>| -> Option<String> {
        col.and_then(|i| row.get(i))
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let mut subjects = Vec::new();
    for row in data {
        let Some(name) = cell(row, Some(name_col)) else {
            continue;
        };
        let (first, middle, last) = parse_subject_name(&name);
        if first.is_empty() || last.is_empty() {
            warn!("skipping row with unusable name {name:?}");
            continue;
        }

        let mut subject = Subject::new(last, first, middle);
        subject.case_number = cell(row, case_col);
        subject.matter_number = cell(row, matter_col);
        subject.charges = cell(row, charges_col);
        subject.incident_date = cell(row, incident_col);
        subject.case_status = cell(row, status_col);
        subjects.push(subject);
    }

    Ok(subjects)
}

fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}

/// Minimal CSV parser: quoted fields, doubled-quote escapes, CRLF tolerant.
fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            ',' if !in_quotes => row.push(std::mem::take(&mut field)),
            '\r' | '\n' if !in_quotes => {
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                row.push(std::mem::take(&mut field));
                if !(row.len() == 1 && row[0].is_empty()) {
                    rows.push(std::mem::take(&mut row));
                }
                row.clear();
            }
            _ => field.push(ch),
        }
    }

    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_comma_name_form() {
        assert_eq!(
            parse_subject_name("Smith, John Michael"),
            (
                "John".to_string(),
                "Michael".to_string(),
                "Smith".to_string()
            )
        );
        assert_eq!(
            parse_subject_name("Doe, Jane M."),
            ("Jane".to_string(), "M.".to_string(), "Doe".to_string())
        );
        assert_eq!(
            parse_subject_name("Johnson, Bob"),
            ("Bob".to_string(), String::new(), "Johnson".to_string())
        );
    }

    #[test]
    fn parses_plain_name_form() {
        assert_eq!(
            parse_subject_name("John Michael Smith"),
            (
                "John".to_string(),
                "Michael".to_string(),
                "Smith".to_string()
            )
        );
        assert_eq!(
            parse_subject_name("Jane Doe"),
            ("Jane".to_string(), String::new(), "Doe".to_string())
        );
        assert_eq!(
            parse_subject_name("Cher"),
            (String::new(), String::new(), "Cher".to_string())
        );
    }

    #[test]
    fn loads_subjects_with_metadata_columns() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "CaseNumbers,Title,Defendants,InitiatedOn,CaseStatus").unwrap();
        writeln!(file, "2024GS001,Theft,\"Smith, John Michael\",01/15/2024,Open").unwrap();
        writeln!(file, "2024GS002,Assault,Jane Doe,02/20/2024,Pending").unwrap();
        writeln!(file, "2024GS003,Fraud,Cher,03/01/2024,Open").unwrap();

        let subjects = load_subjects(file.path()).unwrap();
        assert_eq!(subjects.len(), 2);

        assert_eq!(subjects[0].last_name, "Smith");
        assert_eq!(subjects[0].first_name, "John");
        assert_eq!(subjects[0].middle_name, "Michael");
        assert_eq!(subjects[0].case_number.as_deref(), Some("2024GS001"));
        assert_eq!(subjects[0].charges.as_deref(), Some("Theft"));
        assert_eq!(subjects[0].incident_date.as_deref(), Some("01/15/2024"));
        assert_eq!(subjects[0].case_status.as_deref(), Some("Open"));

        assert_eq!(subjects[1].last_name, "Doe");
        assert_eq!(subjects[1].first_name, "Jane");
    }

    #[test]
    fn missing_name_column_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "CaseNumbers,Title").unwrap();
        writeln!(file, "2024GS001,Theft").unwrap();
        assert!(load_subjects(file.path()).is_err());
    }

    #[test]
    fn quoted_fields_keep_commas() {
        let rows = parse_rows("a,\"b, c\",d\n1,\"x\"\"y\",2\n");
        assert_eq!(rows[0], vec!["a", "b, c", "d"]);
        assert_eq!(rows[1], vec!["1", "x\"y", "2"]);
    }
}
