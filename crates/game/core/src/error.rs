//! Common error infrastructure for battle-core.
//!
//! Errors fall into three families:
//!
//! - **Validation**: malformed or out-of-range caller input (missing operation,
//!   unknown card/enemy id). Raised before any state is mutated.
//! - **Recoverable**: well-formed input that cannot run right now (not enough
//!   mana, not the player's turn). The caller may retry later.
//! - **Internal**: invariant violations inside the engine. These indicate a bug
//!   and are never swallowed.
//!
//! Skip conditions (healing at full HP, cleansing with nothing to remove) are
//! not errors at all; they are recorded as `skipReason` metadata on the log.

use crate::operation::OperationError;
use crate::state::{CardId, EnemyId};

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorSeverity {
    /// Input was valid but the command cannot run in the current state.
    Recoverable,

    /// Invalid input, should not retry without changes.
    Validation,

    /// Unexpected state inconsistency. Indicates a bug.
    Internal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all battle-core errors.
///
/// - All error enums implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Errors surfaced by battle commands (`play_card`, `play_relic`, enemy turns).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BattleError {
    /// An operation failed to resolve against the current battle state.
    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error("Card {0} not found in hand")]
    CardNotInHand(CardId),

    #[error("Card {0} is a status card and cannot be played")]
    CardNotPlayable(CardId),

    #[error("Not enough mana: requires {required}, has {available}")]
    NotEnoughMana { required: u32, available: u32 },

    #[error("Relic '{0}' not found")]
    RelicNotFound(String),

    #[error("Relic '{0}' cannot be activated again")]
    RelicExhausted(String),

    #[error("Enemy {0} not found")]
    EnemyNotFound(EnemyId),

    #[error("Commands are only accepted during the player's main phase")]
    NotPlayerTurn,

    #[error("Enemies only act during the enemy's main phase")]
    NotEnemyTurn,

    #[error("The battle is already over")]
    BattleOver,

    /// Internal consistency bug. Never expected at runtime.
    #[error("invariant violated: {0}")]
    Invariant(String),
}

impl BattleError {
    pub(crate) fn invariant(message: impl Into<String>) -> Self {
        Self::Invariant(message.into())
    }
}

impl GameError for BattleError {
    fn severity(&self) -> ErrorSeverity {
        use BattleError::*;
        match self {
            Operation(error) => error.severity(),
            CardNotInHand(_) | CardNotPlayable(_) | RelicNotFound(_) | EnemyNotFound(_) => {
                ErrorSeverity::Validation
            }
            NotEnoughMana { .. }
            | RelicExhausted(_)
            | NotPlayerTurn
            | NotEnemyTurn
            | BattleOver => ErrorSeverity::Recoverable,
            Invariant(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        use BattleError::*;
        match self {
            Operation(error) => error.error_code(),
            CardNotInHand(_) => "BATTLE_CARD_NOT_IN_HAND",
            CardNotPlayable(_) => "BATTLE_CARD_NOT_PLAYABLE",
            NotEnoughMana { .. } => "BATTLE_NOT_ENOUGH_MANA",
            RelicNotFound(_) => "BATTLE_RELIC_NOT_FOUND",
            RelicExhausted(_) => "BATTLE_RELIC_EXHAUSTED",
            EnemyNotFound(_) => "BATTLE_ENEMY_NOT_FOUND",
            NotPlayerTurn => "BATTLE_NOT_PLAYER_TURN",
            NotEnemyTurn => "BATTLE_NOT_ENEMY_TURN",
            BattleOver => "BATTLE_OVER",
            Invariant(_) => "BATTLE_INVARIANT_VIOLATED",
        }
    }
}
