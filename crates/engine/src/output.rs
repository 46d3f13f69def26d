//! Output table and summary writers.
//!
//! The table is the input user table plus four list columns, `::`-delimited
//! like the input files:
//!
//! ```text
//! id::name::age::latitude::longitude::tags::recommended::midpoint_lats::midpoint_lons::suggested_locations
//! ```
//!
//! List columns are `|`-joined and aligned by position; users without
//! recommendations get empty strings. Text entries are percent-encoded for
//! `%`, `|` and `:` (`%25`, `%7C`, `%3A`), so neither separator can occur
//! inside an entry and splitting on `|` yields one entry per recommendation.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use data_loader::{User, UserStore};
use tracing::info;

use crate::batch::{EvaluationRow, EvaluationSummary};

pub const OUTPUT_HEADER: &str = "id::name::age::latitude::longitude::tags::recommended::midpoint_lats::midpoint_lons::suggested_locations";

fn escape_entry(entry: &str) -> String {
    let mut escaped = String::with_capacity(entry.len());
    for c in entry.chars() {
        match c {
            '%' => escaped.push_str("%25"),
            '|' => escaped.push_str("%7C"),
            ':' => escaped.push_str("%3A"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn join_entries(entries: &[String]) -> String {
    entries
        .iter()
        .map(|e| escape_entry(e))
        .collect::<Vec<_>>()
        .join("|")
}

fn join_coords(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| format!("{:.6}", v))
        .collect::<Vec<_>>()
        .join("|")
}

/// Render one user's line; `row` is `None` for users that were not evaluated
pub fn format_row(user: &User, row: Option<&EvaluationRow>) -> String {
    let empty = EvaluationRow::empty(user.id as i64);
    let row = row.unwrap_or(&empty);

    format!(
        "{}::{}::{}::{:.6}::{:.6}::{}::{}::{}::{}::{}",
        user.id,
        user.name,
        user.age,
        user.latitude,
        user.longitude,
        user.interests.join("|"),
        join_entries(&row.recommended_names),
        join_coords(&row.midpoint_lats),
        join_coords(&row.midpoint_lons),
        join_entries(&row.suggested_locations),
    )
}

/// Write the augmented user table, one line per user in id order
pub fn write_output_table(path: &Path, store: &UserStore, rows: &[EvaluationRow]) -> Result<()> {
    let by_user: HashMap<i64, &EvaluationRow> = rows.iter().map(|r| (r.user_id, r)).collect();

    let file = File::create(path)
        .with_context(|| format!("Failed to create output table {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "{}", OUTPUT_HEADER)?;
    for user in store.users() {
        let row = by_user.get(&(user.id as i64)).copied();
        writeln!(writer, "{}", format_row(user, row))?;
    }
    writer.flush()?;

    info!("Wrote output table for {} users to {}", store.len(), path.display());
    Ok(())
}

/// Write the batch summary as pretty-printed JSON
pub fn write_summary_json(path: &Path, summary: &EvaluationSummary) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create summary file {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), summary)
        .context("Failed to serialize evaluation summary")?;
    Ok(())
}
