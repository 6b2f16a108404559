use std::collections::HashMap;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{BoardError, Result};
use crate::validation::InputValidator;

/// Env var holding the backend base URL
pub const URL_VAR: &str = "VITE_SUPABASE_URL";
/// Env var holding the backend API key
pub const KEY_VAR: &str = "VITE_SUPABASE_ANON_KEY";

/// Directory name used when no backup directory is configured
pub const BACKUP_DIR_NAME: &str = "backups";

/// Tables exported by the backup tool, in export order
pub const DEFAULT_TABLES: [&str; 9] = [
    "family_members",
    "chores",
    "app_settings",
    "saved_meals",
    "freezer_meals",
    "meal_plans",
    "schedule_events",
    "fun_ideas",
    "planned_activities",
];

/// Application configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub logging: LoggingConfig,
    pub backup: BackupConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: Option<String>,
    pub format: String, // "json" or "text"
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackupConfig {
    /// Unset means `backups` next to the running executable
    pub output_directory: Option<String>,
    pub tables: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub default_days: u32,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file_path: None,
            format: "text".to_string(),
        }
    }
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            output_directory: None,
            tables: DEFAULT_TABLES.iter().map(ToString::to_string).collect(),
        }
    }
}

impl BackupConfig {
    /// Pick the backup directory: the command-line value, then the configured
    /// one, then [`default_backup_dir`].
    pub fn resolve_output_dir(&self, cli_dir: Option<PathBuf>) -> Result<PathBuf> {
        match (cli_dir, &self.output_directory) {
            (Some(dir), _) => Ok(dir),
            (None, Some(dir)) => Ok(PathBuf::from(dir)),
            (None, None) => default_backup_dir(),
        }
    }
}

/// `backups/` beside the running executable, independent of the working
/// directory.
pub fn default_backup_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    let base = exe.parent().unwrap_or_else(|| Path::new("."));
    Ok(base.join(BACKUP_DIR_NAME))
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { default_days: 7 }
    }
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence
    pub fn load() -> Result<Self> {
        let config = Config::builder()
            // Add config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables with prefix
            .add_source(
                Environment::with_prefix("FAMILY_BOARD")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("backup.tables")
                    .try_parsing(true),
            )
            .build()?;

        let app_config: Self = config.try_deserialize()?;

        // Validate configuration
        app_config.validate()?;

        Ok(app_config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.backend.timeout_secs == 0 {
            return Err(BoardError::InvalidConfig(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        // Validate logging config
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(BoardError::InvalidConfig(format!(
                "Invalid log level: {}. Must be one of: {:?}",
                self.logging.level, valid_levels
            )));
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(BoardError::InvalidConfig(format!(
                "Invalid log format: {}. Must be one of: {:?}",
                self.logging.format, valid_formats
            )));
        }

        // Validate backup config
        if self.backup.tables.is_empty() {
            return Err(BoardError::InvalidConfig(
                "backup.tables must list at least one table".to_string(),
            ));
        }
        for table in &self.backup.tables {
            InputValidator::validate_identifier(table)?;
        }
        if let Some(dir) = &self.backup.output_directory {
            InputValidator::validate_output_dir(Path::new(dir))?;
        }

        InputValidator::validate_window_days(self.report.default_days)?;

        Ok(())
    }
}

/// Backend URL and API key
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub url: String,
    pub api_key: String,
}

// Keep the key out of logs and panic messages.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("url", &self.url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Read credentials from `env_file`, letting the process environment win.
    pub fn from_env_file(env_file: &Path) -> Result<Self> {
        let file_vars = read_env_file(env_file)?;
        Self::resolve(&file_vars, |key| std::env::var(key).ok())
    }

    /// Pick each value from the environment lookup first, then from the file.
    ///
    /// Empty values count as missing.
    pub fn resolve<F>(file_vars: &HashMap<String, String>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &'static str| {
            env(key)
                .filter(|v| !v.trim().is_empty())
                .or_else(|| file_vars.get(key).filter(|v| !v.trim().is_empty()).cloned())
                .ok_or(BoardError::MissingCredential(key))
        };

        let url = lookup(URL_VAR)?.trim().to_string();
        let api_key = lookup(KEY_VAR)?.trim().to_string();

        InputValidator::validate_base_url(&url)?;
        InputValidator::validate_api_key(&api_key)?;

        Ok(Self { url, api_key })
    }
}

/// Parse `KEY=value` pairs from an env file without touching the process
/// environment.
pub fn read_env_file(path: &Path) -> Result<HashMap<String, String>> {
    if !path.exists() {
        return Err(BoardError::EnvFileNotFound(path.to_path_buf()));
    }

    let env_error = |e: dotenvy::Error| BoardError::EnvFile {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    dotenvy::from_path_iter(path)
        .map_err(env_error)?
        .map(|item| item.map_err(env_error))
        .collect()
}

/// Default env file location: `.env` in the working directory
#[must_use]
pub fn default_env_file() -> PathBuf {
    PathBuf::from(".env")
}
