//! Query builder for the table store.
//!
//! Queries are plain values: they are built with chained calls, rendered to
//! PostgREST query parameters by [`Filter::to_param`], and run through any
//! [`TableStore`] with `execute`.

use std::fmt;

use serde_json::Value;

use crate::error::Result;
use crate::models::Row;
use crate::repository::TableStore;

/// Comparison operators understood by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `column = value`
    Eq,
    /// `column <> value`
    Neq,
    /// `column >= value`
    Gte,
    /// `column <= value`
    Lte,
}

impl Operator {
    /// PostgREST operator keyword
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Neq => "neq",
            Self::Gte => "gte",
            Self::Lte => "lte",
        }
    }
}

/// A single row filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Compare a column against a literal
    Compare {
        /// Column name
        column: String,
        /// Operator
        op: Operator,
        /// Literal in its textual form
        value: String,
    },
    /// Column is not null
    NotNull(String),
}

impl Filter {
    /// Column this filter applies to
    #[must_use]
    pub fn column(&self) -> &str {
        match self {
            Self::Compare { column, .. } | Self::NotNull(column) => column,
        }
    }

    /// Render as a `(column, "op.value")` query parameter
    #[must_use]
    pub fn to_param(&self) -> (String, String) {
        match self {
            Self::Compare { column, op, value } => {
                (column.clone(), format!("{}.{value}", op.keyword()))
            }
            Self::NotNull(column) => (column.clone(), "not.is.null".to_string()),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (column, expr) = self.to_param();
        write!(f, "{column}={expr}")
    }
}

fn compare(column: &str, op: Operator, value: impl ToString) -> Filter {
    Filter::Compare {
        column: column.to_string(),
        op,
        value: value.to_string(),
    }
}

/// A `select` against one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectQuery {
    table: String,
    columns: String,
    filters: Vec<Filter>,
}

impl SelectQuery {
    /// Select every column of `table`
    #[must_use]
    pub fn table(table: &str) -> Self {
        Self {
            table: table.to_string(),
            columns: "*".to_string(),
            filters: Vec::new(),
        }
    }

    /// Restrict the returned columns (`"id,name"`)
    #[must_use]
    pub fn columns(mut self, columns: &str) -> Self {
        self.columns = columns.to_string();
        self
    }

    /// Keep rows where `column = value`
    #[must_use]
    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.filters.push(compare(column, Operator::Eq, value));
        self
    }

    /// Keep rows where `column <> value`
    #[must_use]
    pub fn neq(mut self, column: &str, value: impl ToString) -> Self {
        self.filters.push(compare(column, Operator::Neq, value));
        self
    }

    /// Keep rows where `column >= value`
    #[must_use]
    pub fn gte(mut self, column: &str, value: impl ToString) -> Self {
        self.filters.push(compare(column, Operator::Gte, value));
        self
    }

    /// Keep rows where `column <= value`
    #[must_use]
    pub fn lte(mut self, column: &str, value: impl ToString) -> Self {
        self.filters.push(compare(column, Operator::Lte, value));
        self
    }

    /// Keep rows where `column` is not null
    #[must_use]
    pub fn not_null(mut self, column: &str) -> Self {
        self.filters.push(Filter::NotNull(column.to_string()));
        self
    }

    /// Target table
    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// Requested column list
    #[must_use]
    pub fn column_list(&self) -> &str {
        &self.columns
    }

    /// Filters in the order they were added
    #[must_use]
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Run the query
    pub async fn execute(&self, store: &dyn TableStore) -> Result<Vec<Row>> {
        store.select(self).await
    }
}

/// An `update` of selected rows in one table
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateQuery {
    table: String,
    patch: Row,
    filters: Vec<Filter>,
}

impl UpdateQuery {
    /// Start an update on `table`
    #[must_use]
    pub fn table(table: &str) -> Self {
        Self {
            table: table.to_string(),
            patch: Row::new(),
            filters: Vec::new(),
        }
    }

    /// Set `column` to `value` on every matching row
    #[must_use]
    pub fn set(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.patch.insert(column.to_string(), value.into());
        self
    }

    /// Only touch rows where `column = value`
    #[must_use]
    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.filters.push(compare(column, Operator::Eq, value));
        self
    }

    /// Target table
    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// Column values to write
    #[must_use]
    pub const fn patch(&self) -> &Row {
        &self.patch
    }

    /// Filters in the order they were added
    #[must_use]
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Run the update
    pub async fn execute(&self, store: &dyn TableStore) -> Result<()> {
        store.update(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_defaults_to_all_columns() {
        let query = SelectQuery::table("chores");
        assert_eq!(query.table_name(), "chores");
        assert_eq!(query.column_list(), "*");
        assert!(query.filters().is_empty());
    }

    #[test]
    fn test_filter_params() {
        let query = SelectQuery::table("chores")
            .eq("is_completed", true)
            .gte("completed_at", "2024-01-01")
            .lte("points", 20)
            .neq("title", "x")
            .not_null("recurring_days");

        let params: Vec<_> = query.filters().iter().map(Filter::to_param).collect();
        assert_eq!(
            params,
            vec![
                ("is_completed".to_string(), "eq.true".to_string()),
                ("completed_at".to_string(), "gte.2024-01-01".to_string()),
                ("points".to_string(), "lte.20".to_string()),
                ("title".to_string(), "neq.x".to_string()),
                ("recurring_days".to_string(), "not.is.null".to_string()),
            ]
        );
    }

    #[test]
    fn test_update_patch() {
        let update = UpdateQuery::table("chores")
            .set("is_completed", false)
            .set("completed_at", Value::Null)
            .eq("id", 9);

        assert_eq!(update.patch().get("is_completed"), Some(&Value::Bool(false)));
        assert_eq!(update.patch().get("completed_at"), Some(&Value::Null));
        assert_eq!(update.filters()[0].to_string(), "id=eq.9");
    }
}
