//! Error types for the goal planner

use thiserror::Error;

/// Result type alias for planner operations
pub type Result<T> = std::result::Result<T, PlanningError>;

/// Everything that can go wrong during a planning attempt.
///
/// Each variant is terminal for the current attempt and surfaced verbatim to
/// the caller; nothing is persisted until the caller explicitly commits the
/// resulting schedule, so no variant leaves partial state behind.
#[derive(Error, Debug)]
pub enum PlanningError {

    // =============================
    // Pre-flight Errors
    // =============================

    /// No provider selected, or the selected provider's URL/key is missing.
    /// Raised before any network activity.
    #[error("Configuration error: {0}")]
    Configuration(String),

    // =============================
    // Request Errors
    // =============================

    /// Transport-level failure (connection, timeout, DNS). Not retried.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx HTTP status from the provider.
    #[error("Provider error {status}: {body}")]
    Provider { status: u16, body: String },

    /// The provider returned a 2xx response with an empty body.
    #[error("Provider returned an empty response body")]
    EmptyResponse,

    // =============================
    // Response Parse Errors
    // =============================

    /// The outer chat-completion envelope did not parse, or carried no
    /// usable message content.
    #[error("Malformed response envelope: {detail} | fragment: {fragment}")]
    MalformedEnvelope { detail: String, fragment: String },

    /// The inner message content did not parse as the expected task list.
    #[error("Malformed task list: {detail} | fragment: {fragment}")]
    MalformedTaskList { detail: String, fragment: String },

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
