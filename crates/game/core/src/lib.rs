//! Deterministic turn-based card battle rules.
//!
//! `battle-core` owns every battle rule: the damage pipeline, statuses, enemy
//! scheduling, card piles, and the command pipeline. It performs no I/O and
//! draws all randomness from an injected [`env::RngOracle`]. All state
//! mutation flows through [`engine::Battle`], which emits plain-data
//! snapshots, patches, and log entries for presentation layers to replay.
pub mod action;
pub mod blueprint;
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod log;
pub mod operation;
pub mod queue;
pub mod snapshot;
pub mod state;
pub mod status;

pub use action::{
    Action, ActionContext, ActionKind, ActionSource, ActionTag, AttackAction, AttackTarget,
    CardDestination, OperationAvailability, SkillAction, SkillEffect, SkipTurnAction,
};
pub use blueprint::{
    CardBlueprint, EnemyBlueprint, OpeningRule, PlayerBlueprint, QueueBlueprint, RelicBlueprint,
    StatusBlueprint,
};
pub use combat::{DamageKind, DamageProfile, DamageValues, Damages};
pub use config::BattleConfig;
pub use engine::{AttackReport, Battle, BattleBuilder};
pub use env::{BattleEnv, FixedRng, FnRng, PcgRng, RngOracle};
pub use error::{BattleError, ErrorSeverity, GameError};
pub use log::{ActionLog, ActionLogEntry, AnimationBatch, AnimationStage, LogKind};
pub use operation::{CardOperation, Metadata, OperationError};
pub use queue::{ActionQueue, QueuePolicy, QueueStatus};
pub use snapshot::{
    BattleSnapshot, BattleSnapshotPatch, CardView, EnemySnapshot, PlayerSnapshot,
    SnapshotSections, apply_snapshot_patch,
};
pub use state::{
    ActorRef, BattleOutcome, Card, CardBody, CardId, CardPiles, EnemyId, EnemyLife, EnemyState,
    HandInsert, PlayerState, Relic, Side, TurnPhase, TurnPosition,
};
pub use status::{StatusEffect, StatusEffects, StatusKind};
