//! Recorder error types.

/// Errors from recorder configuration and log export.
#[derive(Debug, thiserror::Error)]
pub enum DebugError {
    /// A preset name in the config is not known.
    #[error("unknown log preset: {0}")]
    UnknownPreset(String),

    /// A category name is not known.
    #[error("unknown log category: {0}")]
    UnknownCategory(String),

    /// Writing the exported log failed.
    #[error("failed to write log export: {0}")]
    Io(#[from] std::io::Error),

    /// The buffer could not be rendered as JSON.
    #[error("failed to serialize log: {0}")]
    Json(#[from] serde_json::Error),
}
