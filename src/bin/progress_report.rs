use anyhow::Result;
use chrono::Utc;
use clap::Parser;

use family_board_tools::cli::{emit, CommonArgs, Session};
use family_board_tools::logging::OperationTimer;
use family_board_tools::report::run_report;
use family_board_tools::validation::InputValidator;

/// Generate a weekly family board progress report.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    /// Number of days to look back (default: `report.default_days`, 7)
    #[arg(long)]
    days: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let session = Session::start(&cli.common)?;

    let days = cli.days.unwrap_or(session.config.report.default_days);
    InputValidator::validate_window_days(days)?;

    let timer = OperationTimer::new("progress_report");
    let report = run_report(&session.client, days, Utc::now()).await?;
    timer.finish();

    emit(&report.render())?;
    Ok(())
}
