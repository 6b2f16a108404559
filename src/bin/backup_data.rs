use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::warn;

use family_board_tools::backup::{backup_tables_with, render_header};
use family_board_tools::cli::{emit, CommonArgs, Session};
use family_board_tools::logging::OperationTimer;
use family_board_tools::utils::backup_timestamp_now;
use family_board_tools::validation::InputValidator;

/// Export all backend tables to timestamped JSON files.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    /// Directory to store backup files (default: `backup.output_directory`,
    /// else `backups/` next to this executable)
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let session = Session::start(&cli.common)?;

    let output_dir = session.config.backup.resolve_output_dir(cli.output_dir)?;
    InputValidator::validate_output_dir(&output_dir)?;

    let tables = &session.config.backup.tables;
    let timestamp = backup_timestamp_now();
    emit(&render_header(tables.len(), &output_dir, &timestamp))?;

    let timer = OperationTimer::new("backup");
    let summary = backup_tables_with(
        &session.client,
        tables,
        &output_dir,
        &timestamp,
        session.client.metrics(),
        |export| emit(&export.render_line()),
    )
    .await?;
    timer.finish();

    for table in summary.failed_tables() {
        warn!(table, "Table skipped; no backup file written");
    }
    emit(&summary.render_footer())?;

    Ok(())
}
