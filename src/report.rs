//! Progress report: completed chores, point standings, planned meals and the
//! top performer over a trailing window.
//!
//! Fetching ([`run_report`]) is kept apart from aggregation
//! ([`ProgressReport::build`]) and formatting ([`ProgressReport::render`]) so
//! the latter two can be exercised on plain rows.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::Result;
use crate::models::{Chore, DateWindow, FamilyMember, MealPlan, RecordId};
use crate::repository::{FamilyRepository, TableStore};
use crate::utils::{format_day, rule, BANNER_WIDTH};

/// Completed-chore count for one assignee
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberCount {
    pub member_id: RecordId,
    /// Member name, or the raw id when the member is unknown
    pub name: String,
    pub count: usize,
    /// Current points, 0 when the member is unknown
    pub points: i64,
}

/// Current point total for one member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberPoints {
    pub member_id: RecordId,
    pub name: String,
    pub points: i64,
}

/// One planned meal, ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealLine {
    pub date: String,
    pub meal_type: String,
    pub title: String,
}

/// Aggregated report for one window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressReport {
    pub window: DateWindow,
    /// Members with at least one completion, most completions first
    pub completions: Vec<MemberCount>,
    /// All members, highest points first
    pub standings: Vec<MemberPoints>,
    /// Meals in the window, earliest first
    pub meals: Vec<MealLine>,
}

impl ProgressReport {
    /// Aggregate fetched rows.
    ///
    /// Chores without an assignee are ignored. Ties are ordered by name and
    /// then by id so the output, and the top performer, is stable.
    #[must_use]
    pub fn build(window: DateWindow, members: &[FamilyMember], chores: &[Chore], meals: &[MealPlan]) -> Self {
        let mut directory: HashMap<&RecordId, &FamilyMember> = HashMap::new();
        for member in members {
            directory.insert(&member.id, member);
        }

        let mut counts: HashMap<&RecordId, usize> = HashMap::new();
        for assignee in chores.iter().filter_map(|c| c.assigned_to.as_ref()) {
            *counts.entry(assignee).or_insert(0) += 1;
        }

        let mut completions: Vec<MemberCount> = counts
            .into_iter()
            .map(|(id, count)| {
                let member = directory.get(id);
                MemberCount {
                    member_id: id.clone(),
                    name: member.map_or_else(|| id.to_string(), |m| m.display_name().to_string()),
                    count,
                    points: member.map_or(0, |m| m.points()),
                }
            })
            .collect();
        completions.sort_by(|a, b| completion_rank(a).cmp(&completion_rank(b)));

        let mut standings: Vec<MemberPoints> = directory
            .values()
            .map(|m| MemberPoints {
                member_id: m.id.clone(),
                name: m.display_name().to_string(),
                points: m.points(),
            })
            .collect();
        standings.sort_by(|a, b| {
            b.points
                .cmp(&a.points)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.member_id.cmp(&b.member_id))
        });

        let mut planned: Vec<&MealPlan> = meals.iter().collect();
        planned.sort_by(|a, b| a.date.as_deref().unwrap_or("").cmp(b.date.as_deref().unwrap_or("")));
        let meals = planned
            .into_iter()
            .map(|m| MealLine {
                date: m.display_date().to_string(),
                meal_type: m.display_type().to_string(),
                title: m.display_title().to_string(),
            })
            .collect();

        Self {
            window,
            completions,
            standings,
            meals,
        }
    }

    /// Chores completed by assigned members in the window
    #[must_use]
    pub fn total_chores(&self) -> usize {
        self.completions.iter().map(|c| c.count).sum()
    }

    /// Member with the most completions, if anyone completed anything
    #[must_use]
    pub fn top_performer(&self) -> Option<&MemberCount> {
        self.completions.first()
    }

    /// Chore count for a member id, 0 when absent
    #[must_use]
    pub fn count_for(&self, id: &RecordId) -> usize {
        self.completions
            .iter()
            .find(|c| &c.member_id == id)
            .map_or(0, |c| c.count)
    }

    /// Fixed-width console rendering
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        let w = &self.window;

        header(&mut out, &format!("FAMILY BOARD PROGRESS REPORT  ({}-day window)", w.days));
        let _ = writeln!(out, "  Period: {} to {}", format_day(&w.since), format_day(&w.now));

        header(&mut out, "CHORES COMPLETED PER MEMBER");
        if self.completions.is_empty() {
            let _ = writeln!(out, "  No chores completed in this period.");
        } else {
            for entry in &self.completions {
                let _ = writeln!(out, "  {:<25} {:>4} chore(s)", entry.name, entry.count);
            }
        }
        let _ = writeln!(out, "\n  Total: {} chore(s) completed", self.total_chores());

        header(&mut out, "POINTS PER MEMBER (current totals)");
        if self.standings.is_empty() {
            let _ = writeln!(out, "  No family members found.");
        } else {
            for entry in &self.standings {
                let _ = writeln!(out, "  {:<25} {:>6} pts", entry.name, entry.points);
            }
        }

        header(&mut out, "MEALS PLANNED THIS PERIOD");
        if self.meals.is_empty() {
            let _ = writeln!(out, "  No meals planned in this period.");
        } else {
            for meal in &self.meals {
                let _ = writeln!(out, "  {}  [{:<10}]  {}", meal.date, meal.meal_type, meal.title);
            }
            let _ = writeln!(out, "\n  Total: {} meal(s) planned", self.meals.len());
        }

        header(&mut out, "TOP PERFORMER");
        match self.top_performer() {
            Some(top) => {
                let _ = writeln!(
                    out,
                    "  {} -- {} chore(s) completed, {} pts",
                    top.name, top.count, top.points
                );
            }
            None => {
                let _ = writeln!(out, "  Not enough data to determine a top performer.");
            }
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "{}", rule('-', BANNER_WIDTH));
        let _ = writeln!(out, "  Report generated at {}", w.now.format("%Y-%m-%d %H:%M:%S UTC"));
        let _ = writeln!(out, "{}", rule('-', BANNER_WIDTH));
        let _ = writeln!(out);
        out
    }
}

// Most completions first, then name, then id.
fn completion_rank(entry: &MemberCount) -> (Reverse<usize>, &str, &RecordId) {
    (Reverse(entry.count), entry.name.as_str(), &entry.member_id)
}

fn header(out: &mut String, title: &str) {
    let banner = rule('=', BANNER_WIDTH);
    let _ = write!(out, "\n{banner}\n  {title}\n{banner}\n");
}

/// Fetch members, completed chores and planned meals for a `days`-long window
/// ending at `now`, and aggregate them.
pub async fn run_report(store: &dyn TableStore, days: u32, now: DateTime<Utc>) -> Result<ProgressReport> {
    let window = DateWindow::trailing(days, now);
    let repo = FamilyRepository::new(store);

    let members = repo.family_members().await?;
    let chores = repo.completed_chores_since(window.since).await?;
    let meals = repo.meal_plans_since(window.since_date()).await?;
    info!(
        members = members.len(),
        chores = chores.len(),
        meals = meals.len(),
        days,
        "Report data fetched"
    );

    Ok(ProgressReport::build(window, &members, &chores, &meals))
}
