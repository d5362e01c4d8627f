//! Error types for the history engine.
//!
//! Every [`HistoryError`] except [`HistoryError::Action`] and
//! [`HistoryError::Codec`] is a contract violation by the caller (or, for
//! [`HistoryError::InvalidExecutionState`], a bug in the engine or in an
//! [`Action`](crate::core::Action) implementation). Contract violations are
//! detected before anything is mutated. An action failure stops the cursor
//! right at the failing action.

use thiserror::Error;

use crate::core::ActionId;

/// Failure reported by an action's own `execute` or `undo`.
///
/// An action returning an error must not have applied any part of its effect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("action is already executed")]
    AlreadyExecuted,

    #[error("action is not executed")]
    NotExecuted,

    #[error("action rejected: {0}")]
    Rejected(String),
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("cannot modify turn {current}: only the tail turn {last} can be modified, once fully executed")]
    StaleTurnMutation { current: usize, last: usize },

    #[error("action not found: {0}")]
    ActionNotFound(ActionId),

    #[error("action '{action}' cannot be inserted or dropped (insertable: {insertable}, auto-executable: {auto_executable})")]
    IneligibleAction {
        action: String,
        insertable: bool,
        auto_executable: bool,
    },

    #[error("replacement kind mismatch: expected {expected}, found {found}")]
    KindMismatch { expected: String, found: String },

    #[error("invalid execution state: {0}")]
    InvalidExecutionState(String),

    #[error("{id} failed")]
    Action {
        id: ActionId,
        #[source]
        source: ActionError,
    },

    #[error(transparent)]
    Codec(#[from] bincode::Error),
}

impl HistoryError {
    pub(crate) fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidExecutionState(message.into())
    }
}

pub type Result<T> = std::result::Result<T, HistoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stale_turn_message() {
        let err = HistoryError::StaleTurnMutation { current: 1, last: 3 };
        assert_eq!(
            err.to_string(),
            "cannot modify turn 1: only the tail turn 3 can be modified, once fully executed"
        );
    }

    #[test]
    fn test_action_error_is_source() {
        use std::error::Error as _;

        let err = HistoryError::Action {
            id: ActionId::new(7),
            source: ActionError::Rejected("bag is empty".to_string()),
        };
        assert_eq!(err.to_string(), "Action(7) failed");
        let source = err.source().map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("action rejected: bag is empty"));
    }
}
