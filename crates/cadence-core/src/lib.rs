//! Core types, configuration, and error handling for Cadence.
//!
//! This crate provides the shared foundation used by the analytics engine
//! and the CLI:
//! - [`CadenceError`]: unified error type using `thiserror`
//! - [`CadenceConfig`]: configuration store loaded from `.cadence.toml`
//! - [`Thresholds`]: every heuristic boundary in one table
//! - Shared types: [`Severity`], [`WeekStart`], [`OutputFormat`]

mod config;
mod error;
pub mod logging;
mod types;

pub use config::{AuthorGroup, CadenceConfig, ProjectConfig, Settings, Thresholds};
pub use error::CadenceError;
pub use types::{OutputFormat, Severity, WeekStart};

/// A convenience `Result` type for Cadence operations.
pub type Result<T> = std::result::Result<T, CadenceError>;
