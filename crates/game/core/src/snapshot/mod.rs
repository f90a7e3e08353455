//! Plain-data projection of a battle, and minimal patches between projections.
//!
//! A [`BattleSnapshot`] holds no behavior and no reference into live state.
//! Sub-trees are reference counted so that [`apply_snapshot_patch`] can pass
//! every untouched section through by pointer instead of rebuilding it.

mod collection;
mod patch;
mod sections;

pub use collection::CollectionDelta;
pub use patch::{
    BattleSnapshotPatch, EnemiesPatch, EnemyPatch, PlayerPatch, SnapshotChanges,
    apply_snapshot_patch,
};
pub use sections::SnapshotSections;

use std::sync::Arc;

use crate::action::ActionTag;
use crate::combat::DamageValues;
use crate::log::ActionLogEntry;
use crate::queue::QueueStatus;
use crate::state::{
    BattleOutcome, Card, CardBody, CardId, EnemyId, EnemyLife, PlayerState, Relic, TurnPosition,
};
use crate::status::StatusEffect;

/// Complete, renderable state of a battle at one point in time.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleSnapshot {
    pub player: Arc<PlayerSnapshot>,
    pub enemies: Arc<Vec<Arc<EnemySnapshot>>>,
    pub hand: Arc<Vec<CardView>>,
    pub deck: Arc<Vec<CardView>>,
    pub discard_pile: Arc<Vec<CardView>>,
    pub exile_pile: Arc<Vec<CardView>>,
    pub turn: TurnPosition,
    pub outcome: BattleOutcome,
    pub log: Arc<Vec<ActionLogEntry>>,
}

impl BattleSnapshot {
    pub fn enemy(&self, id: EnemyId) -> Option<&EnemySnapshot> {
        self.enemies
            .iter()
            .find(|enemy| enemy.id == id)
            .map(Arc::as_ref)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    pub current_hp: u32,
    pub max_hp: u32,
    pub shield: u32,
    pub mana: u32,
    pub max_mana: u32,
    pub statuses: Arc<Vec<StatusEffect>>,
    pub relics: Arc<Vec<RelicView>>,
}

impl PlayerSnapshot {
    pub fn capture(player: &PlayerState) -> Self {
        Self {
            current_hp: player.combatant.current_hp,
            max_hp: player.combatant.max_hp,
            shield: player.combatant.shield,
            mana: player.mana,
            max_mana: player.max_mana,
            statuses: Arc::new(player.combatant.statuses.iter().copied().collect()),
            relics: Arc::new(player.relics.iter().map(RelicView::from).collect()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelicView {
    pub id: String,
    pub name: String,
    pub charges: Option<u32>,
    pub ready: bool,
    pub uses: u32,
}

impl From<&Relic> for RelicView {
    fn from(relic: &Relic) -> Self {
        Self {
            id: relic.id.clone(),
            name: relic.name.clone(),
            charges: relic.charges,
            ready: relic.is_ready(),
            uses: relic.uses,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemySnapshot {
    pub id: EnemyId,
    pub name: String,
    pub current_hp: u32,
    pub max_hp: u32,
    pub shield: u32,
    pub statuses: Arc<Vec<StatusEffect>>,
    pub life: EnemyLife,
    pub queue: QueueStatus,
    /// Telegraphed next action.
    pub intent: Option<IntentView>,
}

/// What an enemy is about to do.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentView {
    pub name: String,
    pub kind: ActionTag,
    /// Damage against the player if it landed right now.
    pub damage: Option<DamageValues>,
}

/// Variant of a card, as shown to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CardViewKind {
    Attack,
    Skill,
    SkipTurn,
    Status,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardView {
    pub id: CardId,
    pub name: String,
    pub kind: CardViewKind,
    pub cost: u32,
    pub description: String,
    pub playable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<StatusEffect>,
}

impl From<&Card> for CardView {
    fn from(card: &Card) -> Self {
        match card.body() {
            CardBody::Action(action) => Self {
                id: card.id(),
                name: action.name.clone(),
                kind: match action.tag() {
                    ActionTag::Attack => CardViewKind::Attack,
                    ActionTag::Skill => CardViewKind::Skill,
                    ActionTag::SkipTurn => CardViewKind::SkipTurn,
                },
                cost: action.cost,
                description: action.description.clone(),
                playable: true,
                status: None,
            },
            CardBody::Status(status) => Self {
                id: card.id(),
                name: status.id().to_owned(),
                kind: CardViewKind::Status,
                cost: 0,
                description: String::new(),
                playable: false,
                status: Some(*status),
            },
        }
    }
}

/// Defensive copy of a pile.
pub fn pile_view(cards: &[Card]) -> Arc<Vec<CardView>> {
    Arc::new(cards.iter().map(CardView::from).collect())
}
