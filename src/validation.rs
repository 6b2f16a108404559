use std::path::Path;

use crate::error::{BoardError, Result};

/// Longest window the progress report accepts (ten years)
pub const MAX_WINDOW_DAYS: u32 = 3650;

fn invalid(message: impl Into<String>) -> BoardError {
    BoardError::InvalidConfig(message.into())
}

/// Validation utilities for configuration values and command-line input
#[derive(Debug, Copy, Clone)]
pub struct InputValidator;

impl InputValidator {
    /// Validate the backend base URL
    pub fn validate_base_url(url: &str) -> Result<()> {
        if url.trim().is_empty() {
            return Err(invalid("Backend URL cannot be empty"));
        }

        let parsed = url::Url::parse(url)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid(format!(
                "Backend URL must use http or https, got {}",
                parsed.scheme()
            )));
        }
        if parsed.host_str().map_or(true, str::is_empty) {
            return Err(invalid("Backend URL must include a host"));
        }

        Ok(())
    }

    /// Validate the backend API key
    pub fn validate_api_key(key: &str) -> Result<()> {
        if key.is_empty() {
            return Err(invalid("API key cannot be empty"));
        }

        if key.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(invalid("API key contains whitespace or control characters"));
        }

        Ok(())
    }

    /// Validate a table or column name
    pub fn validate_identifier(name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(invalid("Table name cannot be empty"));
        }

        // Postgres truncates identifiers at 63 bytes
        if name.len() > 63 {
            return Err(invalid(format!("Table name too long (max 63 characters): {name}")));
        }

        let mut chars = name.chars();
        let starts_ok = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        if !starts_ok || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(invalid(format!("Table name contains invalid characters: {name}")));
        }

        Ok(())
    }

    /// Validate the report window length.
    ///
    /// Zero is a same-day window: it starts at the moment the report is run.
    pub fn validate_window_days(days: u32) -> Result<()> {
        if days > MAX_WINDOW_DAYS {
            return Err(invalid(format!(
                "Window too large ({days} days). Maximum supported window is {MAX_WINDOW_DAYS} days"
            )));
        }

        if days > 365 {
            tracing::warn!("Large window ({} days) may produce a long report", days);
        }

        Ok(())
    }

    /// Validate the backup output directory
    pub fn validate_output_dir(path: &Path) -> Result<()> {
        let path_str = path.to_string_lossy();
        if path_str.trim().is_empty() {
            return Err(invalid("Output directory cannot be empty"));
        }

        if path_str.len() > 4096 {
            return Err(invalid("Output directory path too long (max 4096 characters)"));
        }

        if path.exists() && !path.is_dir() {
            return Err(invalid(format!(
                "Output path exists and is not a directory: {}",
                path.display()
            )));
        }

        Ok(())
    }
}
