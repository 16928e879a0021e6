//! # Search Demo
//!
//! Demo client for a search cluster: it checks cluster health, creates and
//! seeds an index, scrolls through an age range query, deletes a document by
//! field match and queries again.
//!
//! The flow lives in [`run`]; configuration loading in [`config`].

pub mod config;
pub mod run;

pub use config::{DemoSettings, PropertyReader};
pub use run::{run_and_close, run_demo, RunReport};

use thiserror::Error;

/// Errors that can occur while configuring or running the demo.
#[derive(Error, Debug)]
pub enum DemoError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Search error.
    #[error("Search error: {0}")]
    SearchError(#[from] search_demo_repository::SearchError),

    /// The run was cancelled by a shutdown signal.
    #[error("Interrupted before the run completed")]
    Interrupted,
}

impl DemoError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
