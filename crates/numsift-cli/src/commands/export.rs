use crate::commands::{print_json, Context};
use crate::csv;
use crate::error::not_found;
use crate::util::format_timestamp_date;
use anyhow::{Context as _, Result};
use clap::Args;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// City to export (case-insensitive)
    pub city: String,
    /// Output path (default: <export_dir>/<city>_export.csv)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct ExportReport {
    city: String,
    people: usize,
    output: PathBuf,
}

pub fn run(ctx: &Context<'_>, args: ExportArgs) -> Result<()> {
    let city = ctx
        .store
        .cities()
        .get_by_name(&args.city)?
        .ok_or_else(|| not_found(format!("city {}", args.city)))?;

    let rows = ctx.store.people().export_rows(city.id)?;

    let mut out = String::new();
    csv::write_row(
        &mut out,
        &[
            "phone".to_string(),
            "city".to_string(),
            "source_file".to_string(),
            "row_number".to_string(),
            "imported_on".to_string(),
        ],
    );
    for row in &rows {
        csv::write_row(
            &mut out,
            &[
                row.phone.as_str().to_string(),
                row.city.clone(),
                row.filename.clone().unwrap_or_default(),
                row.row_number.map(|n| n.to_string()).unwrap_or_default(),
                row.imported_at.map(format_timestamp_date).unwrap_or_default(),
            ],
        );
    }

    let output = match args.output {
        Some(path) => path,
        None => ctx
            .config
            .export_dir
            .join(format!("{}_export.csv", city_slug(&city.name))),
    };
    super::scan::ensure_parent_dir(&output)?;
    fs::write(&output, out).with_context(|| format!("write {}", output.display()))?;

    let report = ExportReport {
        city: city.name,
        people: rows.len(),
        output,
    };
    if ctx.json {
        return print_json(&report);
    }
    println!(
        "Exported {} people from {} to {}",
        report.people,
        report.city,
        report.output.display()
    );
    Ok(())
}

fn city_slug(name: &str) -> String {
    name.trim()
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() {
                ch.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}
