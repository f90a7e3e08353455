use crate::log::{AnimationBatch, AnimationStage};
use crate::snapshot::{BattleSnapshot, BattleSnapshotPatch};

use super::Battle;

/// Records one animation batch per visual beat of a command.
///
/// Each call to [`Stager::stage`] diffs the battle against the previous beat,
/// so a batch carries exactly the sections that beat touched.
pub(crate) struct Stager {
    last: BattleSnapshot,
    batches: Vec<AnimationBatch>,
}

impl Stager {
    pub(crate) fn begin(battle: &Battle) -> Self {
        Self {
            last: battle.capture_snapshot(),
            batches: Vec::new(),
        }
    }

    /// Closes a beat. Beats that changed nothing produce no batch.
    pub(crate) fn stage(&mut self, battle: &Battle, stage: AnimationStage) {
        let next = battle.capture_snapshot();
        let patch = BattleSnapshotPatch::between(&self.last, &next);
        if !patch.is_empty() {
            tracing::trace!(stage = %stage, sections = ?patch.sections().names(), "animation batch");
            self.batches.push(AnimationBatch::new(stage, patch));
        }
        self.last = next;
    }

    pub(crate) fn finish(self) -> Vec<AnimationBatch> {
        self.batches
    }
}
