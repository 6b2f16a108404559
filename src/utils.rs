//! Time and formatting helpers shared by the tools.

use chrono::{DateTime, Local, TimeZone, Utc};

/// Width of the report section banners
pub const BANNER_WIDTH: usize = 55;
/// Width of the rules around the backup summary
pub const RULE_WIDTH: usize = 50;

/// Timestamp used in backup file names (`YYYYMMDD_HHMMSS`).
#[must_use]
pub fn backup_timestamp<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    at.format("%Y%m%d_%H%M%S").to_string()
}

/// Backup timestamp for the current local time
#[must_use]
pub fn backup_timestamp_now() -> String {
    backup_timestamp(&Local::now())
}

/// Calendar date of `at` as `YYYY-MM-DD`
#[must_use]
pub fn format_day(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

/// A horizontal rule of `width` copies of `ch`
#[must_use]
pub fn rule(ch: char, width: usize) -> String {
    std::iter::repeat(ch).take(width).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backup_timestamp_format() {
        let at = Utc.with_ymd_and_hms(2024, 1, 5, 9, 3, 7).unwrap();
        assert_eq!(backup_timestamp(&at), "20240105_090307");
        assert_eq!(backup_timestamp_now().len(), 15);
    }

    #[test]
    fn test_rule() {
        assert_eq!(rule('=', 3), "===");
        assert_eq!(rule('-', RULE_WIDTH).len(), 50);
    }
}
