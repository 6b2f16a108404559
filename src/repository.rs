//! Data access for the family board tables.
//!
//! [`TableStore`] is the seam between the tools and the backend;
//! [`FamilyRepository`] builds the typed queries each tool runs on top of it.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::models::{decode_rows, Chore, FamilyMember, MealPlan, RecordId, Row, CHORES, FAMILY_MEMBERS, MEAL_PLANS};
use crate::query::{SelectQuery, UpdateQuery};

/// Access to the backend's named tables.
///
/// Implemented over HTTP by [`crate::client::PostgrestClient`]; tests plug in
/// in-memory stores.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Fetch every row matching the query
    async fn select(&self, query: &SelectQuery) -> Result<Vec<Row>>;
    /// Apply the query's patch to every matching row
    async fn update(&self, query: &UpdateQuery) -> Result<()>;
}

/// Typed queries over the family board tables
pub struct FamilyRepository<'a> {
    store: &'a dyn TableStore,
}

impl<'a> FamilyRepository<'a> {
    /// Wrap a table store
    #[must_use]
    pub fn new(store: &'a dyn TableStore) -> Self {
        Self { store }
    }

    /// Every row of `table`, untouched
    pub async fn all_rows(&self, table: &str) -> Result<Vec<Row>> {
        SelectQuery::table(table).execute(self.store).await
    }

    /// Every family member with name and points
    pub async fn family_members(&self) -> Result<Vec<FamilyMember>> {
        let rows = SelectQuery::table(FAMILY_MEMBERS).execute(self.store).await?;
        decode_rows(FAMILY_MEMBERS, rows)
    }

    /// Chores flagged complete with a completion time at or after `since`
    pub async fn completed_chores_since(&self, since: DateTime<Utc>) -> Result<Vec<Chore>> {
        let since_iso = since.to_rfc3339_opts(SecondsFormat::Secs, true);
        let rows = SelectQuery::table(CHORES)
            .eq("is_completed", true)
            .gte("completed_at", &since_iso)
            .execute(self.store)
            .await?;
        debug!(since = %since_iso, rows = rows.len(), "Fetched completed chores");
        decode_rows(CHORES, rows)
    }

    /// Meals planned on or after `since` (date-only comparison)
    pub async fn meal_plans_since(&self, since: NaiveDate) -> Result<Vec<MealPlan>> {
        let rows = SelectQuery::table(MEAL_PLANS)
            .gte("date", since.format("%Y-%m-%d"))
            .execute(self.store)
            .await?;
        decode_rows(MEAL_PLANS, rows)
    }

    /// Chores with a non-empty recurrence schedule.
    ///
    /// The `not null` filter runs server side; `""` and `[]` are dropped here
    /// because the column is not consistently typed.
    pub async fn recurring_chores(&self) -> Result<Vec<Chore>> {
        let rows = SelectQuery::table(CHORES)
            .not_null("recurring_days")
            .execute(self.store)
            .await?;
        let chores: Vec<Chore> = decode_rows(CHORES, rows)?;
        Ok(chores.into_iter().filter(Chore::is_recurring).collect())
    }

    /// Clear the completion state of one chore
    pub async fn reset_chore(&self, id: &RecordId) -> Result<()> {
        UpdateQuery::table(CHORES)
            .set("is_completed", false)
            .set("completed_at", Value::Null)
            .eq("id", id)
            .execute(self.store)
            .await
    }

    /// Member ids and names, without points
    pub async fn member_ids(&self) -> Result<Vec<FamilyMember>> {
        let rows = SelectQuery::table(FAMILY_MEMBERS)
            .columns("id,name")
            .execute(self.store)
            .await?;
        decode_rows(FAMILY_MEMBERS, rows)
    }

    /// Set one member's points back to zero
    pub async fn reset_points(&self, id: &RecordId) -> Result<()> {
        UpdateQuery::table(FAMILY_MEMBERS)
            .set("points", 0)
            .eq("id", id)
            .execute(self.store)
            .await
    }
}
