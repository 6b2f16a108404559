//! In-memory table store shared by the integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use family_board_tools::query::{Filter, Operator, SelectQuery, UpdateQuery};
use family_board_tools::{BoardError, Result, Row, TableStore};

/// Build a row from a `json!` object literal
pub fn row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

pub fn rows(values: Vec<Value>) -> Vec<Row> {
    values.into_iter().map(row).collect()
}

#[derive(Default)]
struct State {
    tables: HashMap<String, Vec<Row>>,
    failing_tables: HashSet<String>,
    updates: Vec<UpdateQuery>,
    updates_before_failure: Option<usize>,
}

/// A `TableStore` that evaluates filters the way the backend does, on rows
/// held in memory.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(self, table: &str, values: Vec<Value>) -> Self {
        self.state
            .lock()
            .unwrap()
            .tables
            .insert(table.to_string(), rows(values));
        self
    }

    /// Make every select on `table` fail
    pub fn failing(self, table: &str) -> Self {
        self.state.lock().unwrap().failing_tables.insert(table.to_string());
        self
    }

    /// Let `n` updates succeed, then fail every following one
    pub fn fail_updates_after(self, n: usize) -> Self {
        self.state.lock().unwrap().updates_before_failure = Some(n);
        self
    }

    pub fn table(&self, table: &str) -> Vec<Row> {
        self.state
            .lock()
            .unwrap()
            .tables
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    pub fn update_count(&self) -> usize {
        self.state.lock().unwrap().updates.len()
    }

    /// Row of `table` whose `id` renders as `id`
    pub fn find(&self, table: &str, id: &str) -> Option<Row> {
        self.table(table)
            .into_iter()
            .find(|r| r.get("id").and_then(text).as_deref() == Some(id))
    }
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn matches(row: &Row, filter: &Filter) -> bool {
    match filter {
        Filter::NotNull(column) => row.get(column).is_some_and(|v| !v.is_null()),
        Filter::Compare { column, op, value } => {
            let Some(actual) = row.get(column).and_then(text) else {
                return false;
            };
            match op {
                Operator::Eq => &actual == value,
                Operator::Neq => &actual != value,
                Operator::Gte => actual.as_str() >= value.as_str(),
                Operator::Lte => actual.as_str() <= value.as_str(),
            }
        }
    }
}

fn project(row: &Row, columns: &str) -> Row {
    if columns == "*" {
        return row.clone();
    }
    columns
        .split(',')
        .map(str::trim)
        .filter_map(|c| row.get(c).map(|v| (c.to_string(), v.clone())))
        .collect()
}

#[async_trait]
impl TableStore for MemoryStore {
    async fn select(&self, query: &SelectQuery) -> Result<Vec<Row>> {
        let state = self.state.lock().unwrap();
        if state.failing_tables.contains(query.table_name()) {
            return Err(BoardError::Status {
                status: 404,
                body: format!("relation \"{}\" does not exist", query.table_name()),
            });
        }

        Ok(state
            .tables
            .get(query.table_name())
            .map(|rows| {
                rows.iter()
                    .filter(|r| query.filters().iter().all(|f| matches(r, f)))
                    .map(|r| project(r, query.column_list()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn update(&self, query: &UpdateQuery) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(limit) = state.updates_before_failure {
            if state.updates.len() >= limit {
                return Err(BoardError::Status {
                    status: 503,
                    body: "service unavailable".to_string(),
                });
            }
        }
        if query.filters().is_empty() {
            return Err(BoardError::UnfilteredUpdate(query.table_name().to_string()));
        }

        if let Some(rows) = state.tables.get_mut(query.table_name()) {
            for row in rows.iter_mut() {
                if query.filters().iter().all(|f| matches(row, f)) {
                    for (column, value) in query.patch() {
                        row.insert(column.clone(), value.clone());
                    }
                }
            }
        }
        state.updates.push(query.clone());
        Ok(())
    }
}
