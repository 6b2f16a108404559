//! Start-up shared by the binaries: common flags, configuration, logging and
//! the backend client.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

use crate::client::PostgrestClient;
use crate::config::{default_env_file, AppConfig, Credentials};
use crate::error::Result;
use crate::logging::init_logging;

/// Flags accepted by every tool
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Env file holding VITE_SUPABASE_URL and VITE_SUPABASE_ANON_KEY
    #[arg(long, default_value_os_t = default_env_file())]
    pub env_file: PathBuf,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long)]
    pub log_level: Option<String>,
}

/// Everything a tool needs once configuration has been validated
pub struct Session {
    pub config: AppConfig,
    pub client: PostgrestClient,
    _log_guard: Option<WorkerGuard>,
}

impl Session {
    /// Load configuration and credentials, install logging, build the client.
    ///
    /// Any error here is a configuration error: the tool has not contacted
    /// the backend yet.
    pub fn start(args: &CommonArgs) -> Result<Self> {
        let config = AppConfig::load()?;
        let credentials = Credentials::from_env_file(&args.env_file)?;
        let log_guard = init_logging(args.log_level.as_deref(), &config.logging)?;
        info!(env_file = %args.env_file.display(), url = %credentials.url, "Configuration loaded");

        let client = PostgrestClient::new(&config.backend, &credentials)?;
        Ok(Self {
            config,
            client,
            _log_guard: log_guard,
        })
    }
}

/// Write console output to stdout in one go
pub fn emit(text: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
