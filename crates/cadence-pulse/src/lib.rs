//! Team analytics from commit history.
//!
//! Turns raw commit records into contributor metrics, a project health
//! score, detected risks, narrative insights, and a time-series analysis
//! of daily activity. The stages can be used individually, or all at once
//! through [`pipeline::analyze`].

pub mod aggregate;
pub mod commits;
pub mod contributors;
pub mod health;
pub mod insights;
pub mod issues;
pub mod normalize;
pub mod pipeline;
pub mod provider;
mod report;
pub mod stats;
pub mod trends;

pub use pipeline::{analyze, AnalysisOptions, AnalyticsResult};
