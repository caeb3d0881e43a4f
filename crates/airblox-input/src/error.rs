//! Input error types.

/// Errors raised while persisting or overriding key aliases.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// An override named an action that does not exist.
    #[error("unknown flight action: {0}")]
    UnknownAction(String),

    /// Reading or writing the alias file failed.
    #[error("alias file i/o failed: {0}")]
    Io(#[from] std::io::Error),

    /// The alias table could not be serialized.
    #[error("failed to serialize aliases: {0}")]
    Serialize(#[from] ron::Error),

    /// The alias file is not valid RON.
    #[error("failed to parse aliases: {0}")]
    Parse(#[from] ron::error::SpannedError),
}
