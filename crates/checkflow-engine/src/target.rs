//! The target collaborator consumed by check bodies
//!
//! A [`Target`] is the device-like object a check interrogates: can it be
//! reached, and what does a command return. The engine itself never
//! touches a target; bodies capture one and its failures surface as
//! ordinary [`CheckFailure`]s, caught and recorded like any other.

use checkflow_types::CheckFailure;

/// Errors raised by a target while a check body interrogates it
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TargetError {
    #[error("target unreachable")]
    Unreachable,

    #[error("command '{command}' failed: {message}")]
    CommandFailed { command: String, message: String },

    #[error("could not parse output of '{command}': {message}")]
    ParseFailed { command: String, message: String },
}

impl From<TargetError> for CheckFailure {
    fn from(err: TargetError) -> Self {
        CheckFailure::new(err.to_string())
    }
}

/// A device-like collaborator exposing reachability and command execution.
///
/// Implementations own any timeout or retry discipline; the engine imposes
/// none of its own.
pub trait Target: Send + Sync {
    /// Whether the target can currently be reached
    fn reachable(&self) -> bool;

    /// Execute a command and return its parsed output
    fn execute(&self, command: &str) -> Result<String, TargetError>;
}
