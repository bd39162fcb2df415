// src/simulation/error.rs

use thiserror::Error;

use crate::model::role::{ParseRoleError, Role};

/// Why a submission was rejected. A rejected submission leaves the game
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("order must be a non-negative integer, got {0}")]
    InvalidQuantity(String),

    #[error("{0} already submitted this round")]
    DuplicateSubmission(Role),

    #[error("game not started yet")]
    NotStarted,

    #[error("game already finished")]
    AlreadyCompleted,

    #[error(transparent)]
    UnknownRole(#[from] ParseRoleError),

    #[error("round {requested} is not open yet (current round is {current})")]
    RoundNotOpen { requested: u32, current: u32 },
}

/// Lifecycle transitions that are only valid before the game starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("game already started")]
    AlreadyStarted,

    #[error("cannot change settings after game start")]
    SettingsLocked,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            SubmitError::DuplicateSubmission(Role::Distributor).to_string(),
            "Distributor already submitted this round"
        );
        assert_eq!(
            SubmitError::from(ParseRoleError("Brewery".into())).to_string(),
            "unknown role: \"Brewery\""
        );
        assert_eq!(
            LifecycleError::SettingsLocked.to_string(),
            "cannot change settings after game start"
        );
    }
}
