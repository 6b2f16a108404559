//! File writing utilities for table backups.
//!
//! Each table snapshot is written as a pretty-printed JSON array (two-space
//! indent) into a flat directory, one file per table per run.

use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::Row;

/// File name for a table snapshot: `{table}_{timestamp}.json`
#[must_use]
pub fn backup_file_name(table: &str, timestamp: &str) -> String {
    format!("{table}_{timestamp}.json")
}

/// Write `rows` to `output_dir/{table}_{timestamp}.json`.
///
/// The directory is created if needed. Returns the path of the written file.
pub fn write_table_snapshot(rows: &[Row], output_dir: &Path, table: &str, timestamp: &str) -> Result<PathBuf> {
    create_dir_all(output_dir)?;
    let file_path = output_dir.join(backup_file_name(table, timestamp));
    write_json_file(rows, &file_path)?;
    Ok(file_path)
}

/// Write rows to a JSON file as an array of objects.
fn write_json_file(rows: &[Row], file_path: &Path) -> Result<()> {
    let file = File::create(file_path)?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, rows)?;
    writer.flush()?;
    Ok(())
}
