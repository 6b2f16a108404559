//! Weekly reset of recurring chores and member points.
//!
//! Each row is updated with its own request, in order. A failed update stops
//! the loop and is returned; rows already reset stay reset, and running the
//! reset again finishes the job.

use tracing::{debug, info};

use crate::error::Result;
use crate::repository::{FamilyRepository, TableStore};

/// Clear `is_completed` and `completed_at` on every recurring chore.
///
/// Returns the number of chores updated.
pub async fn reset_recurring_chores(store: &dyn TableStore) -> Result<usize> {
    let repo = FamilyRepository::new(store);
    let chores = repo.recurring_chores().await?;

    if chores.is_empty() {
        info!("No recurring chores found");
        return Ok(0);
    }

    for chore in &chores {
        repo.reset_chore(&chore.id).await?;
        debug!(id = %chore.id, title = chore.display_title(), "Chore reset");
    }

    info!(count = chores.len(), "Recurring chores reset");
    Ok(chores.len())
}

/// Set every member's points to 0.
///
/// Returns the number of members updated.
pub async fn reset_member_points(store: &dyn TableStore) -> Result<usize> {
    let repo = FamilyRepository::new(store);
    let members = repo.member_ids().await?;

    if members.is_empty() {
        info!("No family members found");
        return Ok(0);
    }

    for member in &members {
        repo.reset_points(&member.id).await?;
        debug!(id = %member.id, name = member.display_name(), "Points reset");
    }

    info!(count = members.len(), "Member points reset");
    Ok(members.len())
}
