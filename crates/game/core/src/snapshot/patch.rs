//! Snapshot patches.
//!
//! A patch mirrors the snapshot's top-level shape. Absent keys mean
//! "unchanged": applying the patch takes them from the previous snapshot by
//! reference, and the same holds for absent fields inside a changed section.

use std::sync::Arc;

use serde::{Deserialize, Deserializer};

use crate::queue::QueueStatus;
use crate::state::{BattleOutcome, EnemyId, EnemyLife, TurnPosition};
use crate::status::StatusEffect;

use super::collection::diff_collection;
use super::{
    BattleSnapshot, CardView, CollectionDelta, EnemySnapshot, IntentView, PlayerSnapshot,
    RelicView, SnapshotSections,
};

/// Partial update against a previous [`BattleSnapshot`].
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleSnapshotPatch {
    pub changes: SnapshotChanges,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<PlayerPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enemies: Option<EnemiesPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hand: Option<Arc<Vec<CardView>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deck: Option<Arc<Vec<CardView>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discard_pile: Option<Arc<Vec<CardView>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exile_pile: Option<Arc<Vec<CardView>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turn: Option<TurnPosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<BattleOutcome>,
}

pub type EnemiesPatch = CollectionDelta<EnemyId, Arc<EnemySnapshot>, EnemyPatch>;

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_hp: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_hp: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shield: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mana: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_mana: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statuses: Option<Arc<Vec<StatusEffect>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relics: Option<Arc<Vec<RelicView>>>,
}

impl PlayerPatch {
    fn between(prev: &PlayerSnapshot, next: &PlayerSnapshot) -> Option<Self> {
        let patch = Self {
            current_hp: changed(prev.current_hp, next.current_hp),
            max_hp: changed(prev.max_hp, next.max_hp),
            shield: changed(prev.shield, next.shield),
            mana: changed(prev.mana, next.mana),
            max_mana: changed(prev.max_mana, next.max_mana),
            statuses: changed_arc(&prev.statuses, &next.statuses),
            relics: changed_arc(&prev.relics, &next.relics),
        };
        (patch != Self::default()).then_some(patch)
    }

    fn apply(&self, prev: &PlayerSnapshot) -> PlayerSnapshot {
        PlayerSnapshot {
            current_hp: self.current_hp.unwrap_or(prev.current_hp),
            max_hp: self.max_hp.unwrap_or(prev.max_hp),
            shield: self.shield.unwrap_or(prev.shield),
            mana: self.mana.unwrap_or(prev.mana),
            max_mana: self.max_mana.unwrap_or(prev.max_mana),
            statuses: pick_arc(&self.statuses, &prev.statuses),
            relics: pick_arc(&self.relics, &prev.relics),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyPatch {
    pub id: EnemyId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_hp: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_hp: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shield: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statuses: Option<Arc<Vec<StatusEffect>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub life: Option<EnemyLife>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue: Option<QueueStatus>,
    /// `Some(None)` clears the intent.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_option"
    )]
    pub intent: Option<Option<IntentView>>,
}

impl EnemyPatch {
    fn between(prev: &EnemySnapshot, next: &EnemySnapshot) -> Option<Self> {
        if prev == next {
            return None;
        }
        Some(Self {
            id: next.id,
            current_hp: changed(prev.current_hp, next.current_hp),
            max_hp: changed(prev.max_hp, next.max_hp),
            shield: changed(prev.shield, next.shield),
            statuses: changed_arc(&prev.statuses, &next.statuses),
            life: changed(prev.life, next.life),
            queue: changed(prev.queue, next.queue),
            intent: (prev.intent != next.intent).then(|| next.intent.clone()),
        })
    }

    fn apply(&self, prev: &EnemySnapshot) -> EnemySnapshot {
        EnemySnapshot {
            id: prev.id,
            name: prev.name.clone(),
            current_hp: self.current_hp.unwrap_or(prev.current_hp),
            max_hp: self.max_hp.unwrap_or(prev.max_hp),
            shield: self.shield.unwrap_or(prev.shield),
            statuses: pick_arc(&self.statuses, &prev.statuses),
            life: self.life.unwrap_or(prev.life),
            queue: self.queue.unwrap_or(prev.queue),
            intent: match &self.intent {
                Some(intent) => intent.clone(),
                None => prev.intent.clone(),
            },
        }
    }
}

impl BattleSnapshotPatch {
    /// Minimal patch turning `prev` into `next` (ignoring the log).
    pub fn between(prev: &BattleSnapshot, next: &BattleSnapshot) -> Self {
        let enemies = if Arc::ptr_eq(&prev.enemies, &next.enemies) {
            None
        } else {
            let delta = diff_collection(
                prev.enemies.as_slice(),
                next.enemies.as_slice(),
                |enemy| enemy.id,
                |before, after| EnemyPatch::between(before, after),
            );
            (!delta.is_empty()).then_some(delta)
        };

        Self {
            changes: SnapshotChanges {
                player: PlayerPatch::between(&prev.player, &next.player),
                enemies,
                hand: changed_arc(&prev.hand, &next.hand),
                deck: changed_arc(&prev.deck, &next.deck),
                discard_pile: changed_arc(&prev.discard_pile, &next.discard_pile),
                exile_pile: changed_arc(&prev.exile_pile, &next.exile_pile),
                turn: changed(prev.turn, next.turn),
                outcome: changed(prev.outcome, next.outcome),
            },
        }
    }

    /// Sections present in this patch.
    pub fn sections(&self) -> SnapshotSections {
        let changes = &self.changes;
        let mut sections = SnapshotSections::empty();
        sections.set(SnapshotSections::PLAYER, changes.player.is_some());
        sections.set(SnapshotSections::ENEMIES, changes.enemies.is_some());
        sections.set(SnapshotSections::HAND, changes.hand.is_some());
        sections.set(SnapshotSections::DECK, changes.deck.is_some());
        sections.set(SnapshotSections::DISCARD_PILE, changes.discard_pile.is_some());
        sections.set(SnapshotSections::EXILE_PILE, changes.exile_pile.is_some());
        sections.set(SnapshotSections::TURN, changes.turn.is_some());
        sections.set(SnapshotSections::OUTCOME, changes.outcome.is_some());
        sections
    }

    pub fn is_empty(&self) -> bool {
        self.sections().is_empty()
    }
}

/// Produces the snapshot `patch` describes on top of `previous`.
///
/// Every section and field the patch does not mention is shared with
/// `previous` by reference.
pub fn apply_snapshot_patch(previous: &BattleSnapshot, patch: &BattleSnapshotPatch) -> BattleSnapshot {
    let changes = &patch.changes;

    let player = match &changes.player {
        Some(player) => Arc::new(player.apply(&previous.player)),
        None => Arc::clone(&previous.player),
    };

    let enemies = match &changes.enemies {
        Some(delta) => {
            let mut enemies: Vec<Arc<EnemySnapshot>> = previous
                .enemies
                .iter()
                .filter(|enemy| !delta.removed.contains(&enemy.id))
                .map(|enemy| {
                    match delta.updated.iter().find(|update| update.id == enemy.id) {
                        Some(update) => Arc::new(update.apply(enemy)),
                        None => Arc::clone(enemy),
                    }
                })
                .collect();
            enemies.extend(delta.added.iter().cloned());
            Arc::new(enemies)
        }
        None => Arc::clone(&previous.enemies),
    };

    BattleSnapshot {
        player,
        enemies,
        hand: pick_arc(&changes.hand, &previous.hand),
        deck: pick_arc(&changes.deck, &previous.deck),
        discard_pile: pick_arc(&changes.discard_pile, &previous.discard_pile),
        exile_pile: pick_arc(&changes.exile_pile, &previous.exile_pile),
        turn: changes.turn.unwrap_or(previous.turn),
        outcome: changes.outcome.unwrap_or(previous.outcome),
        log: Arc::clone(&previous.log),
    }
}

fn changed<T: PartialEq + Copy>(prev: T, next: T) -> Option<T> {
    (prev != next).then_some(next)
}

fn changed_arc<T: PartialEq>(prev: &Arc<T>, next: &Arc<T>) -> Option<Arc<T>> {
    if Arc::ptr_eq(prev, next) || prev == next {
        None
    } else {
        Some(Arc::clone(next))
    }
}

fn pick_arc<T>(patched: &Option<Arc<T>>, prev: &Arc<T>) -> Arc<T> {
    Arc::clone(patched.as_ref().unwrap_or(prev))
}

/// Deserializes a present field (even `null`) as `Some`.
fn present_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
