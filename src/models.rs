//! Data models for family board rows
//!
//! Rows come back from the backend as loosely typed JSON objects. The typed
//! views in this module decode only the fields the tools need and tolerate
//! missing or null values the same way the web app does.

use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{BoardError, Result};

/// A raw table row: field name to JSON value
pub type Row = Map<String, Value>;

/// Table holding household members
pub const FAMILY_MEMBERS: &str = "family_members";
/// Table holding chores
pub const CHORES: &str = "chores";
/// Table holding planned meals
pub const MEAL_PLANS: &str = "meal_plans";

/// Opaque row identifier.
///
/// Tables use either UUID strings or integer keys, so the id is kept as the
/// text the backend would accept in an `eq` filter.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct RecordId(String);

impl RecordId {
    /// Create an id from its textual form
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the textual form
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<Value> for RecordId {
    type Error = String;

    fn try_from(value: Value) -> std::result::Result<Self, Self::Error> {
        match value {
            Value::String(s) if !s.is_empty() => Ok(Self(s)),
            Value::Number(n) => Ok(Self(n.to_string())),
            other => Err(format!("expected a string or numeric id, got {other}")),
        }
    }
}

impl From<RecordId> for Value {
    fn from(id: RecordId) -> Self {
        Self::String(id.0)
    }
}

/// A household participant
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FamilyMember {
    /// Row id
    pub id: RecordId,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Current point total
    #[serde(default)]
    pub points: Option<i64>,
}

impl FamilyMember {
    /// Name to show in reports
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown")
    }

    /// Point total, treating a missing value as zero
    #[must_use]
    pub fn points(&self) -> i64 {
        self.points.unwrap_or(0)
    }
}

/// A chore record with completion state and optional recurrence
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Chore {
    /// Row id
    pub id: RecordId,
    /// Chore title (older rows)
    #[serde(default)]
    pub title: Option<String>,
    /// Chore name (rows written by the web app)
    #[serde(default)]
    pub name: Option<String>,
    /// Member the chore is assigned to
    #[serde(default, deserialize_with = "optional_id")]
    pub assigned_to: Option<RecordId>,
    /// Completion flag
    #[serde(default)]
    pub is_completed: Option<bool>,
    /// Completion timestamp as stored by the backend
    #[serde(default)]
    pub completed_at: Option<String>,
    /// Recurrence schedule: a list of weekdays, a string, or null
    #[serde(default)]
    pub recurring_days: Option<Value>,
}

impl Chore {
    /// Title to show in console output
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("Untitled")
    }

    /// True when the recurrence field holds an actual schedule.
    ///
    /// The column is loosely typed, so null, `""` and `[]` all count as
    /// "not recurring".
    #[must_use]
    pub fn is_recurring(&self) -> bool {
        match &self.recurring_days {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Array(days)) => !days.is_empty(),
            Some(_) => true,
        }
    }
}

/// A scheduled meal entry
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MealPlan {
    /// Row id, when the table exposes one
    #[serde(default, deserialize_with = "optional_id")]
    pub id: Option<RecordId>,
    /// Calendar date (`YYYY-MM-DD`)
    #[serde(default)]
    pub date: Option<String>,
    /// Breakfast, lunch, dinner, snack...
    #[serde(default)]
    pub meal_type: Option<String>,
    /// Meal title
    #[serde(default)]
    pub title: Option<String>,
    /// Meal name, used when no title is set
    #[serde(default)]
    pub name: Option<String>,
}

impl MealPlan {
    /// Date to show, `N/A` when missing
    #[must_use]
    pub fn display_date(&self) -> &str {
        self.date.as_deref().unwrap_or("N/A")
    }

    /// Meal type to show, `meal` when missing
    #[must_use]
    pub fn display_type(&self) -> &str {
        self.meal_type.as_deref().unwrap_or("meal")
    }

    /// Title, falling back to the name and then to `Untitled`
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("Untitled")
    }
}

/// Trailing time window used by the progress report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    /// Window start (inclusive)
    pub since: DateTime<Utc>,
    /// Window end, the moment the report was requested
    pub now: DateTime<Utc>,
    /// Window length in days
    pub days: u32,
}

impl DateWindow {
    /// Window of `days` days ending at `now`
    #[must_use]
    pub fn trailing(days: u32, now: DateTime<Utc>) -> Self {
        Self {
            since: now - Duration::days(i64::from(days)),
            now,
            days,
        }
    }

    /// Window start truncated to a calendar date
    #[must_use]
    pub fn since_date(&self) -> NaiveDate {
        self.since.date_naive()
    }
}

/// Decode a raw row into one of the typed views.
pub fn decode_row<T>(table: &str, row: Row) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    serde_json::from_value(Value::Object(row)).map_err(|e| BoardError::InvalidRow {
        table: table.to_string(),
        message: e.to_string(),
    })
}

/// Decode every row of a result set.
pub fn decode_rows<T>(table: &str, rows: Vec<Row>) -> Result<Vec<T>>
where
    T: for<'de> Deserialize<'de>,
{
    rows.into_iter().map(|row| decode_row(table, row)).collect()
}

// Nullable id columns also show up as "" in rows edited by hand.
fn optional_id<'de, D>(deserializer: D) -> std::result::Result<Option<RecordId>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(other) => RecordId::try_from(other)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
