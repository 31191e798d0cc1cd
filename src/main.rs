// Copyright 2026 Rollcall Contributors
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rollcall::config::JailConfig;
use rollcall::custody::CustodyChecker;
use rollcall::ingest;
use rollcall::report::{write_csv_report, write_json_report};
use rollcall::types::CustodyReport;

#[derive(Parser)]
#[command(
    name = "rollcall",
    about = "Check defendant custody status against the county jail roster",
    version
)]
struct Cli {
    /// CSV file with the defendant list
    input_file: PathBuf,

    /// Output directory for reports
    #[arg(long, short, default_value = "output")]
    output: PathBuf,

    /// Delay in seconds between roster requests
    #[arg(long, short, default_value_t = 1.5)]
    delay: f64,

    /// Request timeout in seconds
    #[arg(long, short, default_value_t = 30)]
    timeout: u64,

    /// Maximum transport retry attempts per page
    #[arg(long, short = 'r', default_value_t = 3)]
    max_retries: u32,

    /// Enable verbose logging
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    info!("parsing input file: {}", cli.input_file.display());
    let subjects = ingest::load_subjects(&cli.input_file)?;
    if subjects.is_empty() {
        bail!("no subjects found in {}", cli.input_file.display());
    }
    info!("found {} subjects", subjects.len());

    std::fs::create_dir_all(&cli.output)
        .with_context(|| format!("failed to create output dir: {}", cli.output.display()))?;

    let config = JailConfig {
        delay: Duration::from_secs_f64(cli.delay),
        timeout: Duration::from_secs(cli.timeout),
        max_retries: cli.max_retries,
        ..JailConfig::default()
    };

    let checker = CustodyChecker::new(config);
    let verdicts = checker.check_all(&subjects).await;

    let report = CustodyReport::new(
        Some(cli.input_file.display().to_string()),
        subjects,
        verdicts,
    );

    println!("\n{}", "=".repeat(70));
    println!("{}", report.summary());
    println!("{}\n", "=".repeat(70));

    let stem = cli
        .input_file
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("subjects");
    let timestamp = report.generated_at.format("%Y%m%d_%H%M%S");
    let json_path = cli.output.join(format!("{stem}_custody_{timestamp}.json"));
    let csv_path = cli.output.join(format!("{stem}_custody_{timestamp}.csv"));

    write_json_report(&report, &json_path)?;
    write_csv_report(&report, &csv_path)?;

    let in_custody = report.in_custody();
    if in_custody.is_empty() {
        println!("*** NO SUBJECTS CURRENTLY IN CUSTODY ***\n");
    } else {
        println!("*** SUBJECTS IN CUSTODY ({}) ***", in_custody.len());
        println!("{}", "-".repeat(70));
        for verdict in in_custody {
            println!("  {}", verdict.subject_name);
            if let Some(booked) = &verdict.booking_date {
                println!("    Booked: {booked}");
            }
            if let Some(charges) = &verdict.charges_at_booking {
                println!("    Charges: {charges}");
            }
            if let Some(bond) = &verdict.bond_amount {
                println!("    Bond: {bond}");
            }
            println!();
        }
    }

    println!("Reports saved to:");
    println!("  JSON: {}", json_path.display());
    println!("  CSV:  {}", csv_path.display());

    Ok(())
}
