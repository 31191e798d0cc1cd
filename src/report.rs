//! Report rendering: JSON and CSV files for downstream consumers.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::types::CustodyReport;

/// Write the full report (subjects, verdicts, counts derivable) as pretty
/// JSON.
pub fn write_json_report(report: &CustodyReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("failed to serialize report")?;
    fs::write(path, json)
        .with_context(|| format!("failed to write JSON report: {}", path.display()))?;
    Ok(())
}

const CSV_COLUMNS: [&str; 10] = [
    "defendant_name",
    "matter_number",
    "case_number",
    "status",
    "booking_number",
    "booking_date",
    "custody_location",
    "charges_at_booking",
    "bond_amount",
    "mugshot_url",
];

/// Write one CSV row per verdict, with enough fields for a consumer to render
/// booking date, charges, bond, and a mugshot reference without re-querying.
pub fn write_csv_report(report: &CustodyReport, path: &Path) -> Result<()> {
    let mut out = Vec::new();
    write_row(&mut out, CSV_COLUMNS.iter().copied())?;
    for verdict in &report.verdicts {
        let status = verdict.status_summary();
        let row = [
            verdict.subject_name.as_str(),
            verdict.matter_number.as_deref().unwrap_or(""),
            verdict.case_number.as_deref().unwrap_or(""),
            status.as_str(),
            verdict.booking_number.as_deref().unwrap_or(""),
            verdict.booking_date.as_deref().unwrap_or(""),
            verdict.custody_location.as_deref().unwrap_or(""),
            verdict.charges_at_booking.as_deref().unwrap_or(""),
            verdict.bond_amount.as_deref().unwrap_or(""),
            verdict.mugshot_url.as_deref().unwrap_or(""),
        ];
        write_row(&mut out, row.iter().copied())?;
    }
    fs::write(path, out)
        .with_context(|| format!("failed to write CSV report: {}", path.display()))?;
    Ok(())
}

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

fn write_row<'a, W: Write>(mut w: W, row: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut first = true;
    for cell in row {
        if !first {
            write!(w, ",")?;
        }
        first = false;
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            write!(w, "{cell}")?;
        }
    }
    writeln!(w)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CustodyReport, CustodyVerdict, Subject};

    fn sample_report() -> CustodyReport {
        let subject = Subject::new("Smith", "John", "");
        let mut verdict = CustodyVerdict::unmatched(&subject);
        verdict.in_custody = true;
        verdict.booking_date = Some("10/27/2025".to_string());
        verdict.charges_at_booking = Some("Burglary, 2nd Degree".to_string());
        CustodyReport::new(Some("input.csv".to_string()), vec![subject], vec![verdict])
    }

    #[test]
    fn json_report_round_trips_counts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        write_json_report(&sample_report(), &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["verdicts"][0]["in_custody"], true);
        assert_eq!(value["source_file"], "input.csv");
    }

    #[test]
    fn csv_report_quotes_embedded_commas() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        write_csv_report(&sample_report(), &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("defendant_name,"));
        let row = lines.next().unwrap();
        assert!(row.contains("\"Smith, John\""));
        assert!(row.contains("\"Burglary, 2nd Degree\""));
        assert!(row.contains("IN CUSTODY - Booked: 10/27/2025"));
    }
}
