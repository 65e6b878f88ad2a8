//! Typed error handling for the lista core
//!
//! Every failure the crate can produce falls into one of three categories:
//!
//! - [`QueryError`]: the backend query capability failed or was aborted
//! - [`PersistenceError`]: the storage side channel failed
//! - [`ConfigError`]: configuration parsing or validation failed
//!
//! The filter/cache core never throws across its own boundary: query errors
//! are captured into list snapshots, persistence errors degrade to logged
//! no-ops, and only configuration loading returns a `Result` to the caller.
//!
//! # Example
//!
//! ```rust,ignore
//! match snapshot.error {
//!     Some(QueryError::Backend { .. }) => show_retry_panel(snapshot.error_message()),
//!     Some(other) => show_retry_panel(Some(other.to_string())),
//!     None => render_list(&snapshot.items),
//! }
//! ```

use thiserror::Error;

/// The main error type for the lista core
///
/// Each variant wraps a more specific error type for that category.
#[derive(Debug, Error)]
pub enum ListError {
    /// Backend query errors
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Storage side-channel errors
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ListError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ListError::Query(e) => e.error_code(),
            ListError::Persistence(_) => "PERSISTENCE_ERROR",
            ListError::Config(_) => "CONFIG_ERROR",
        }
    }
}

/// Errors surfaced by the backend query capability
///
/// These are captured at the query binding and exposed through snapshots,
/// never returned from the binding's driving methods. All variants are
/// equally retryable by the user; no transient/permanent distinction is made.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    /// The backend rejected the query with one or more messages
    #[error("{}", .messages.join(" "))]
    Backend { messages: Vec<String> },

    /// The transport failed before the backend produced a response
    #[error("transport error: {0}")]
    Transport(String),

    /// The request was cancelled before completion
    #[error("request aborted")]
    Aborted,
}

impl QueryError {
    /// Build a backend error from a list of messages
    pub fn backend<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        QueryError::Backend {
            messages: messages.into_iter().map(Into::into).collect(),
        }
    }

    /// Human-readable message for the UI, with backend messages joined
    /// into a single string
    pub fn joined_message(&self) -> String {
        self.to_string()
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            QueryError::Backend { .. } => "BACKEND_ERROR",
            QueryError::Transport(_) => "TRANSPORT_ERROR",
            QueryError::Aborted => "REQUEST_ABORTED",
        }
    }
}

/// Errors from the persistence side channel
///
/// These never reach the user: filter persistence is an optimization, not a
/// correctness requirement, so callers log these at `warn` and move on.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The underlying store could not be accessed (quota, disabled storage)
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The stored value could not be serialized or deserialized
    #[error("snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors from configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration could not be parsed
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The configuration parsed but contains out-of-range values
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
