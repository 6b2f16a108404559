//! Table backups: dump every configured table to timestamped JSON files.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::Result;
use crate::file_writer::write_table_snapshot;
use crate::metrics::MetricsCollector;
use crate::repository::{FamilyRepository, TableStore};
use crate::utils::{rule, RULE_WIDTH};

/// Outcome for one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableExport {
    pub table: String,
    /// Rows written; 0 when the fetch failed
    pub rows: usize,
    /// Written file, `None` when the fetch failed
    pub file: Option<PathBuf>,
}

impl TableExport {
    /// Console line for this table, newline included
    #[must_use]
    pub fn render_line(&self) -> String {
        format!("  {}: {} rows exported\n", self.table, self.rows)
    }
}

/// Outcome of a whole backup run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupSummary {
    pub output_dir: PathBuf,
    pub timestamp: String,
    pub tables: Vec<TableExport>,
}

impl BackupSummary {
    /// Rows exported across all tables
    #[must_use]
    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(|t| t.rows).sum()
    }

    /// Tables whose fetch failed
    pub fn failed_tables(&self) -> impl Iterator<Item = &str> {
        self.tables
            .iter()
            .filter(|t| t.file.is_none())
            .map(|t| t.table.as_str())
    }

    /// Per-table lines followed by the closing rule and grand total
    #[must_use]
    pub fn render(&self) -> String {
        let mut out: String = self.tables.iter().map(TableExport::render_line).collect();
        out.push_str(&self.render_footer());
        out
    }

    /// Closing rule and grand total, printed once every table is done
    #[must_use]
    pub fn render_footer(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", rule('-', RULE_WIDTH));
        let _ = writeln!(
            out,
            "Backup complete. {} total rows across {} tables.",
            self.total_rows(),
            self.tables.len()
        );
        out
    }
}

/// Banner printed before any table is fetched
#[must_use]
pub fn render_header(table_count: usize, output_dir: &Path, timestamp: &str) -> String {
    format!(
        "Backing up {table_count} tables to: {}\nTimestamp: {timestamp}\n{}\n",
        output_dir.display(),
        rule('-', RULE_WIDTH)
    )
}

/// Export every table in `tables` to `output_dir`.
///
/// A table that cannot be fetched is logged and counted as zero rows; the
/// remaining tables are still exported. Failing to write a file aborts the run.
pub async fn backup_tables(
    store: &dyn TableStore,
    tables: &[String],
    output_dir: &Path,
    timestamp: &str,
    metrics: &MetricsCollector,
) -> Result<BackupSummary> {
    backup_tables_with(store, tables, output_dir, timestamp, metrics, |_| Ok(())).await
}

/// Like [`backup_tables`], calling `on_export` as soon as each table is done.
pub async fn backup_tables_with<F>(
    store: &dyn TableStore,
    tables: &[String],
    output_dir: &Path,
    timestamp: &str,
    metrics: &MetricsCollector,
    mut on_export: F,
) -> Result<BackupSummary>
where
    F: FnMut(&TableExport) -> Result<()>,
{
    std::fs::create_dir_all(output_dir)?;
    let repo = FamilyRepository::new(store);
    let mut exports = Vec::with_capacity(tables.len());

    for table in tables {
        let rows = match repo.all_rows(table).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!(table = %table, error = %e, "Could not fetch '{}': {}", table, e);
                metrics.record_table_export(table, false);
                let export = TableExport {
                    table: table.clone(),
                    rows: 0,
                    file: None,
                };
                on_export(&export)?;
                exports.push(export);
                continue;
            }
        };

        let file = write_table_snapshot(&rows, output_dir, table, timestamp)?;
        info!(table = %table, rows = rows.len(), file = %file.display(), "Table exported");
        metrics.record_table_export(table, true);
        let export = TableExport {
            table: table.clone(),
            rows: rows.len(),
            file: Some(file),
        };
        on_export(&export)?;
        exports.push(export);
    }

    Ok(BackupSummary {
        output_dir: output_dir.to_path_buf(),
        timestamp: timestamp.to_string(),
        tables: exports,
    })
}
