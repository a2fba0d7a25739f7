use crate::commands::{print_json, Context};
use crate::csv;
use crate::error::invalid_input;
use crate::util::now_utc;
use anyhow::{Context as _, Result};
use clap::Args;
use numsift_core::Extractor;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// CSV file to load into the store
    pub file: PathBuf,
    /// Zero-based index of the column holding the city name
    #[arg(long)]
    pub city_column: Option<usize>,
}

#[derive(Debug, Serialize)]
struct ImportReport {
    filename: String,
    rows: usize,
    numbers_found: usize,
    people_created: usize,
    people_existing: usize,
}

pub fn run(ctx: &Context<'_>, args: ImportArgs) -> Result<()> {
    let raw = fs::read(&args.file).with_context(|| format!("read {}", args.file.display()))?;
    let text = String::from_utf8(raw)
        .map_err(|_| invalid_input(format!("{} is not valid UTF-8", args.file.display())))?;

    let filename = args
        .file
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| invalid_input(format!("invalid file name {}", args.file.display())))?;

    let now = now_utc();
    let source = ctx.store.source_files().register(now, filename)?;
    let extractor = Extractor::with_std_codes(ctx.config.landlines.std_codes.clone());
    let rows = csv::parse(&text);

    let mut report = ImportReport {
        filename: filename.to_string(),
        rows: rows.len(),
        numbers_found: 0,
        people_created: 0,
        people_existing: 0,
    };

    for (index, row) in rows.iter().enumerate() {
        let row_number = (index + 1) as i64;

        let city_id = match args.city_column.and_then(|column| row.get(column)) {
            Some(cell) if !cell.trim().is_empty() => {
                Some(ctx.store.cities().get_or_create(now, cell)?.id)
            }
            _ => None,
        };

        let mut phones = BTreeSet::new();
        for cell in row {
            if !cell.trim().is_empty() {
                phones.extend(extractor.extract(cell));
            }
        }
        if phones.is_empty() {
            continue;
        }

        let raw_text = row.join(", ");
        for phone in &phones {
            let (person, created) = ctx.store.people().record(now, phone, city_id)?;
            if created {
                report.people_created += 1;
            } else {
                report.people_existing += 1;
            }
            ctx.store
                .source_files()
                .link(person.id, source.id, row_number, &raw_text)?;
            report.numbers_found += 1;
        }
    }

    debug!(
        rows = report.rows,
        created = report.people_created,
        "import complete"
    );

    if ctx.json {
        return print_json(&report);
    }
    println!(
        "Imported {}: {} numbers across {} rows, {} people created, {} already known",
        report.filename,
        report.numbers_found,
        report.rows,
        report.people_created,
        report.people_existing
    );
    Ok(())
}
