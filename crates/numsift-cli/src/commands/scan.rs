use crate::commands::print_json;
use crate::csv;
use crate::error::invalid_input;
use anyhow::{Context as _, Result};
use clap::Args;
use numsift_config::AppConfig;
use numsift_core::Extractor;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const NO_PHONE_FOUND: &str = "No phone number found";

#[derive(Debug, Args)]
pub struct ScanArgs {
    /// CSV file to scan cell by cell
    pub file: PathBuf,
    /// Output path (default: <export_dir>/<stem>_phones.csv)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct ScanReport {
    rows: usize,
    rows_with_numbers: usize,
    numbers_found: usize,
    output: PathBuf,
}

pub fn run(config: &AppConfig, json: bool, args: ScanArgs) -> Result<()> {
    let raw = fs::read(&args.file).with_context(|| format!("read {}", args.file.display()))?;
    let text = String::from_utf8(raw)
        .map_err(|_| invalid_input(format!("{} is not valid UTF-8", args.file.display())))?;

    let extractor = Extractor::with_std_codes(config.landlines.std_codes.clone());
    let rows = csv::parse(&text);

    let mut out = String::new();
    let mut rows_with_numbers = 0;
    let mut numbers_found = 0;

    for row in &rows {
        let mut phones = BTreeSet::new();
        for cell in row {
            if !cell.trim().is_empty() {
                phones.extend(extractor.extract(cell));
            }
        }

        let note = if phones.is_empty() {
            NO_PHONE_FOUND.to_string()
        } else {
            rows_with_numbers += 1;
            numbers_found += phones.len();
            phones
                .iter()
                .map(|number| number.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };

        let mut annotated = row.clone();
        annotated.push(note);
        csv::write_row(&mut out, &annotated);
    }

    let output = resolve_output(config, &args.file, args.output)?;
    ensure_parent_dir(&output)?;
    fs::write(&output, out).with_context(|| format!("write {}", output.display()))?;
    debug!(rows = rows.len(), numbers = numbers_found, "scan complete");

    let report = ScanReport {
        rows: rows.len(),
        rows_with_numbers,
        numbers_found,
        output,
    };
    if json {
        return print_json(&report);
    }
    println!(
        "Scanned {} rows: {} numbers found, wrote {}",
        report.rows,
        report.numbers_found,
        report.output.display()
    );
    Ok(())
}

fn resolve_output(config: &AppConfig, input: &Path, custom: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = custom {
        return Ok(path);
    }
    let stem = input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| invalid_input(format!("cannot derive output name from {}", input.display())))?;
    Ok(config.export_dir.join(format!("{stem}_phones.csv")))
}

pub(crate) fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create directory {}", parent.display()))?;
        }
    }
    Ok(())
}
