use anyhow::Result;
use clap::Parser;

use family_board_tools::cli::{emit, CommonArgs, Session};
use family_board_tools::logging::OperationTimer;
use family_board_tools::reset::{reset_member_points, reset_recurring_chores};

/// Reset recurring chores for a new week.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    /// Also reset all family member points to 0
    #[arg(long)]
    reset_points: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let session = Session::start(&cli.common)?;
    let timer = OperationTimer::new("weekly_reset");

    emit("Resetting recurring chores...\n")?;
    let chore_count = reset_recurring_chores(&session.client).await?;
    if chore_count == 0 {
        emit("No recurring chores found.\n")?;
    }
    emit(&format!(
        "  {chore_count} recurring chore(s) reset (is_completed=false, completed_at=null).\n"
    ))?;

    if cli.reset_points {
        emit("Resetting family member points...\n")?;
        let member_count = reset_member_points(&session.client).await?;
        if member_count == 0 {
            emit("No family members found.\n")?;
        }
        emit(&format!("  {member_count} member(s) points reset to 0.\n"))?;
    }

    timer.finish();
    emit("Done.\n")?;
    Ok(())
}
