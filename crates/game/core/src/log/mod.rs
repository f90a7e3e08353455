//! Append-only battle log.
//!
//! Every command appends one [`ActionLogEntry`]. Entries may carry
//! [`AnimationBatch`]es: one per visual beat of the command, each holding the
//! snapshot patch for exactly the sections that beat changed. A presentation
//! layer replays the batches in order without re-running any rule.

use std::sync::Arc;

use crate::operation::Metadata;
use crate::snapshot::{BattleSnapshotPatch, SnapshotSections};

/// What kind of event an entry records.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum LogKind {
    BattleStart,
    TurnStart,
    TurnEnd,
    CardPlay,
    RelicActivate,
    EnemyAction,
    /// Informational entries, e.g. an enemy asked to act twice.
    Notice,
    BattleEnd,
}

/// Visual sequence a batch belongs to.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum AnimationStage {
    TurnStart,
    Draw,
    CardPlay,
    CardResolve,
    CardTrash,
    RelicActivate,
    RelicEffect,
    EnemyAction,
    TurnEnd,
}

/// Changes of one visual beat.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationBatch {
    pub stage: AnimationStage,
    /// Sections present in `patch`.
    pub sections: SnapshotSections,
    pub patch: BattleSnapshotPatch,
}

impl AnimationBatch {
    pub fn new(stage: AnimationStage, patch: BattleSnapshotPatch) -> Self {
        Self {
            stage,
            sections: patch.sections(),
            patch,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionLogEntry {
    pub sequence: u64,
    #[serde(rename = "type")]
    pub kind: LogKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub animation_batches: Vec<AnimationBatch>,
}

impl ActionLogEntry {
    /// Skip reason recorded for this entry, if any.
    pub fn skip_reason(&self) -> Option<&str> {
        self.metadata.get("skipReason").and_then(|value| value.as_str())
    }

    /// First batch of the given stage.
    pub fn batch(&self, stage: AnimationStage) -> Option<&AnimationBatch> {
        self.animation_batches.iter().find(|batch| batch.stage == stage)
    }
}

/// Ordered history of a battle.
///
/// Entries are shared with snapshots; appending after a snapshot was taken
/// copies the list once.
#[derive(Clone, Debug, Default)]
pub struct ActionLog {
    entries: Arc<Vec<ActionLogEntry>>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        kind: LogKind,
        message: impl Into<String>,
        metadata: Metadata,
        animation_batches: Vec<AnimationBatch>,
    ) -> &ActionLogEntry {
        let entries = Arc::make_mut(&mut self.entries);
        let sequence = entries.len() as u64;
        let message = message.into();
        tracing::debug!(sequence, kind = %kind, %message, "log entry");
        entries.push(ActionLogEntry {
            sequence,
            kind,
            message,
            metadata,
            animation_batches,
        });
        &entries[entries.len() - 1]
    }

    pub fn entries(&self) -> &[ActionLogEntry] {
        &self.entries
    }

    pub fn shared(&self) -> Arc<Vec<ActionLogEntry>> {
        Arc::clone(&self.entries)
    }

    pub fn last(&self) -> Option<&ActionLogEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
