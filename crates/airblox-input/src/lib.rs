//! Input abstraction: held keys mapped through layout-tolerant aliases to
//! discrete pitch/roll intent.

pub mod action;
pub mod adapter;
pub mod error;
pub mod state;

pub use action::{Conflict, FlightAction, KeyAliasTable, normalize_key};
pub use adapter::{RawKeyEvent, key_name};
pub use error::InputError;
pub use state::{ControlIntent, InputState};
