//! Family Board - Backend Maintenance Tools
//!
//! A Rust library behind the family board's command-line tools. It talks to
//! the board's hosted REST backend and powers three binaries:
//!
//! - `backup-data`: export every table to timestamped JSON files
//! - `progress-report`: print chores, points, meals and the top performer
//!   for a trailing window
//! - `reset-weekly-chores`: clear recurring chores and optionally points

/// Table backups
pub mod backup;
/// Binary start-up helpers
pub mod cli;
/// HTTP client for the REST backend
pub mod client;
/// Configuration management
pub mod config;
/// Error types
pub mod error;
/// Backup file output
pub mod file_writer;
/// Logging setup and utilities
pub mod logging;
/// Metrics collection
pub mod metrics;
/// Data models and structures
pub mod models;
/// Query builder
pub mod query;
/// Progress report
pub mod report;
/// Repository pattern for data access
pub mod repository;
/// Weekly resets
pub mod reset;
/// Time and formatting helpers
pub mod utils;
/// Input validation
pub mod validation;

// Re-export key components for easier access
pub use client::PostgrestClient;
pub use config::{AppConfig, Credentials};
pub use error::{BoardError, Result};
pub use models::{Chore, FamilyMember, MealPlan, RecordId, Row};
pub use repository::TableStore;
