use crate::error::{ErrorSeverity, GameError};
use crate::state::{CardId, EnemyId};

/// Validation failures raised while resolving caller-supplied operations.
///
/// Messages are user-actionable and stable; presentation layers may show them
/// verbatim.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OperationError {
    #[error("Operation requires a numeric enemy id")]
    MissingEnemyId,

    #[error("Enemy {0} not found")]
    EnemyNotFound(EnemyId),

    #[error("Enemy {id} is not selectable: {reason}")]
    EnemyNotSelectable { id: EnemyId, reason: String },

    #[error("Operation requires a numeric card id")]
    MissingCardId,

    #[error("Card {0} not found in hand")]
    CardNotInHand(CardId),

    #[error("Card {id} is not selectable: {reason}")]
    CardNotSelectable { id: CardId, reason: String },

    #[error("Operation \"{0}\" is required but missing")]
    Missing(String),

    #[error("Operation \"{0}\" has already been completed")]
    AlreadyCompleted(String),
}

impl GameError for OperationError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        use OperationError::*;
        match self {
            MissingEnemyId => "OPERATION_MISSING_ENEMY_ID",
            EnemyNotFound(_) => "OPERATION_ENEMY_NOT_FOUND",
            EnemyNotSelectable { .. } => "OPERATION_ENEMY_NOT_SELECTABLE",
            MissingCardId => "OPERATION_MISSING_CARD_ID",
            CardNotInHand(_) => "OPERATION_CARD_NOT_IN_HAND",
            CardNotSelectable { .. } => "OPERATION_CARD_NOT_SELECTABLE",
            Missing(_) => "OPERATION_MISSING",
            AlreadyCompleted(_) => "OPERATION_ALREADY_COMPLETED",
        }
    }
}
