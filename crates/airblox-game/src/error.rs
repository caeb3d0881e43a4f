//! Session setup errors.

use airblox_debug::DebugError;
use airblox_flight::ProfileError;
use airblox_input::InputError;

/// Anything that can stop a flight session from starting or saving its log.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Recorder(#[from] DebugError),
}
