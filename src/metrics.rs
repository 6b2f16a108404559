use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use metrics::{counter, histogram};

/// Metric names published through the `metrics` facade
pub mod names {
    pub const REQUESTS_TOTAL: &str = "family_board_requests_total";
    pub const REQUEST_DURATION: &str = "family_board_request_duration_seconds";
    pub const ROWS_FETCHED_TOTAL: &str = "family_board_rows_fetched_total";
    pub const ROWS_UPDATED_TOTAL: &str = "family_board_rows_updated_total";
    pub const TABLES_EXPORTED_TOTAL: &str = "family_board_tables_exported_total";
    pub const ERRORS_TOTAL: &str = "family_board_errors_total";
}

#[derive(Debug, Default)]
struct Tallies {
    requests: AtomicU64,
    failed_requests: AtomicU64,
    rows_fetched: AtomicU64,
    rows_updated: AtomicU64,
    tables_exported: AtomicU64,
    tables_failed: AtomicU64,
}

/// Per-run counters, mirrored into the global `metrics` recorder.
///
/// Clones share the same tallies. Without an installed recorder the facade
/// calls are no-ops and only the local tallies are kept.
#[derive(Debug, Clone, Default)]
pub struct MetricsCollector {
    tallies: Arc<Tallies>,
}

/// Point-in-time copy of the run tallies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    pub requests: u64,
    pub failed_requests: u64,
    pub rows_fetched: u64,
    pub rows_updated: u64,
    pub tables_exported: u64,
    pub tables_failed: u64,
}

fn as_u64(count: usize) -> u64 {
    u64::try_from(count).unwrap_or(u64::MAX)
}

impl MetricsCollector {
    /// Record one backend request
    pub fn record_request(&self, operation: &'static str, table: &str, duration: Duration, success: bool) {
        let status = if success { "success" } else { "error" };

        self.tallies.requests.fetch_add(1, Ordering::Relaxed);
        counter!(names::REQUESTS_TOTAL, "operation" => operation, "table" => table.to_string(), "status" => status)
            .increment(1);
        histogram!(names::REQUEST_DURATION, "operation" => operation).record(duration.as_secs_f64());

        if !success {
            self.tallies.failed_requests.fetch_add(1, Ordering::Relaxed);
            counter!(names::ERRORS_TOTAL, "type" => "request").increment(1);
        }
    }

    pub fn record_rows_fetched(&self, table: &str, rows: usize) {
        self.tallies.rows_fetched.fetch_add(as_u64(rows), Ordering::Relaxed);
        counter!(names::ROWS_FETCHED_TOTAL, "table" => table.to_string()).increment(as_u64(rows));
    }

    pub fn record_rows_updated(&self, table: &str, rows: usize) {
        self.tallies.rows_updated.fetch_add(as_u64(rows), Ordering::Relaxed);
        counter!(names::ROWS_UPDATED_TOTAL, "table" => table.to_string()).increment(as_u64(rows));
    }

    /// Record the outcome of exporting one table to disk
    pub fn record_table_export(&self, table: &str, success: bool) {
        let status = if success { "success" } else { "error" };
        counter!(names::TABLES_EXPORTED_TOTAL, "table" => table.to_string(), "status" => status).increment(1);

        if success {
            self.tallies.tables_exported.fetch_add(1, Ordering::Relaxed);
        } else {
            self.tallies.tables_failed.fetch_add(1, Ordering::Relaxed);
            counter!(names::ERRORS_TOTAL, "type" => "export").increment(1);
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        let t = &self.tallies;
        MetricsSnapshot {
            requests: t.requests.load(Ordering::Relaxed),
            failed_requests: t.failed_requests.load(Ordering::Relaxed),
            rows_fetched: t.rows_fetched.load(Ordering::Relaxed),
            rows_updated: t.rows_updated.load(Ordering::Relaxed),
            tables_exported: t.tables_exported.load(Ordering::Relaxed),
            tables_failed: t.tables_failed.load(Ordering::Relaxed),
        }
    }
}
