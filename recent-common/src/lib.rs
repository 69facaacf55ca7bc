//! Common types and utilities shared across RecentNews crates.
//!
//! This crate defines the shared error type and observability helpers used
//! throughout the RecentNews workspace. It is intentionally lightweight so
//! that every crate can depend on it without heavy transitive costs.
//!
//! # Overview
//!
//! - [`observability`]: Centralised tracing/logging initialisation
//! - [`RecentError`] and [`Result`]: Shared error handling
//!
//! # Examples
//!
//! ```rust
//! use recent_common::RecentError;
//!
//! let err = RecentError::Config("EXA_API_KEY not set".to_string());
//! assert_eq!(err.to_string(), "Configuration error: EXA_API_KEY not set");
//! assert!(err.is_config());
//! ```

pub mod observability;

/// Error types used across the RecentNews system.
#[derive(thiserror::Error, Debug)]
pub enum RecentError {
    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The search API rejected or failed a request.
    #[error("Search error: {0}")]
    Search(String),

    /// The completion API rejected or failed a request.
    #[error("LLM error: {0}")]
    Llm(String),

    /// Reading or writing report files failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding the raw bundle failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RecentError {
    /// True for errors that must abort a run before any network call.
    pub fn is_config(&self) -> bool {
        matches!(self, RecentError::Config(_))
    }
}

/// Convenient alias for results that use [`RecentError`].
pub type Result<T> = std::result::Result<T, RecentError>;
