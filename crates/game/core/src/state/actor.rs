//! Player and enemy state.

use crate::action::Action;
use crate::combat::{HitOutcome, apply_damage};
use crate::error::BattleError;
use crate::queue::ActionQueue;
use crate::status::StatusEffects;

use super::{EnemyId, Relic};

/// HP, shield and statuses shared by every actor.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Combatant {
    pub current_hp: u32,
    pub max_hp: u32,
    /// Absorbs damage before HP. Cleared at the start of the holder's turn.
    pub shield: u32,
    pub statuses: StatusEffects,
}

impl Combatant {
    pub fn new(max_hp: u32) -> Self {
        Self {
            current_hp: max_hp,
            max_hp,
            shield: 0,
            statuses: StatusEffects::new(),
        }
    }

    pub fn with_hp(current_hp: u32, max_hp: u32) -> Self {
        Self {
            current_hp: current_hp.min(max_hp),
            ..Self::new(max_hp)
        }
    }

    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    pub fn is_at_full_hp(&self) -> bool {
        self.current_hp >= self.max_hp
    }

    /// Applies damage through the shield.
    pub fn take_damage(&mut self, amount: u32) -> HitOutcome {
        let (shield, hp, outcome) = apply_damage(self.shield, self.current_hp, amount);
        self.shield = shield;
        self.current_hp = hp;
        outcome
    }

    /// Loses HP directly, ignoring shield. Returns HP actually lost.
    pub fn lose_hp(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.current_hp);
        self.current_hp -= lost;
        lost
    }

    /// Heals up to max HP. Returns HP actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let healed = amount.min(self.max_hp.saturating_sub(self.current_hp));
        self.current_hp += healed;
        healed
    }

    pub fn gain_shield(&mut self, amount: u32) {
        self.shield = self.shield.saturating_add(amount);
    }

    /// Raises shield to at least `amount`.
    pub fn restore_shield(&mut self, amount: u32) {
        self.shield = self.shield.max(amount);
    }

    pub fn clear_shield(&mut self) {
        self.shield = 0;
    }
}

/// The player: a combatant with mana and relics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerState {
    pub combatant: Combatant,
    pub mana: u32,
    pub max_mana: u32,
    pub relics: Vec<Relic>,
}

impl PlayerState {
    pub fn new(max_hp: u32, max_mana: u32) -> Self {
        Self {
            combatant: Combatant::new(max_hp),
            mana: max_mana,
            max_mana,
            relics: Vec::new(),
        }
    }

    pub fn relic(&self, id: &str) -> Option<&Relic> {
        self.relics.iter().find(|relic| relic.id == id)
    }

    pub fn relic_mut(&mut self, id: &str) -> Option<&mut Relic> {
        self.relics.iter_mut().find(|relic| relic.id == id)
    }

    pub fn ensure_mana(&self, cost: u32) -> Result<(), BattleError> {
        if self.mana < cost {
            return Err(BattleError::NotEnoughMana {
                required: cost,
                available: self.mana,
            });
        }
        Ok(())
    }

    pub fn spend_mana(&mut self, cost: u32) -> Result<(), BattleError> {
        self.ensure_mana(cost)?;
        self.mana -= cost;
        Ok(())
    }

    pub fn refill_mana(&mut self) {
        self.mana = self.max_mana;
    }
}

/// Whether an enemy still takes part in the battle.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum EnemyLife {
    #[default]
    Alive,
    Defeated,
    Escaped,
}

/// An enemy: a combatant with declared actions and its own scheduler.
#[derive(Clone, Debug)]
pub struct EnemyState {
    id: EnemyId,
    pub name: String,
    pub combatant: Combatant,
    pub actions: Vec<Action>,
    pub queue: ActionQueue,
    pub life: EnemyLife,
}

impl EnemyState {
    pub fn id(&self) -> EnemyId {
        self.id
    }

    /// Alive and still on the field.
    pub fn is_active(&self) -> bool {
        self.life == EnemyLife::Alive && self.combatant.is_alive()
    }

    /// Moves a dead enemy to `Defeated`. Returns true when it changed.
    pub(crate) fn settle_life(&mut self) -> bool {
        if self.life == EnemyLife::Alive && !self.combatant.is_alive() {
            self.life = EnemyLife::Defeated;
            return true;
        }
        false
    }
}

/// Owning collection of enemies.
///
/// Assigns ids in spawn order; removal is never needed because defeated and
/// escaped enemies keep their slot and their id.
#[derive(Clone, Debug)]
pub struct EnemyRoster {
    enemies: Vec<EnemyState>,
    next_id: u32,
}

impl EnemyRoster {
    pub fn new() -> Self {
        Self {
            enemies: Vec::new(),
            next_id: 1,
        }
    }

    /// Adds an enemy and returns its freshly assigned id.
    pub fn spawn(
        &mut self,
        name: impl Into<String>,
        combatant: Combatant,
        actions: Vec<Action>,
        queue: ActionQueue,
    ) -> EnemyId {
        let id = EnemyId(self.next_id);
        self.next_id += 1;
        self.enemies.push(EnemyState {
            id,
            name: name.into(),
            combatant,
            actions,
            queue,
            life: EnemyLife::Alive,
        });
        id
    }

    pub fn get(&self, id: EnemyId) -> Option<&EnemyState> {
        self.enemies.iter().find(|enemy| enemy.id == id)
    }

    pub fn get_mut(&mut self, id: EnemyId) -> Option<&mut EnemyState> {
        self.enemies.iter_mut().find(|enemy| enemy.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EnemyState> {
        self.enemies.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut EnemyState> {
        self.enemies.iter_mut()
    }

    /// Ids of enemies still on the field, in spawn order.
    pub fn active_ids(&self) -> Vec<EnemyId> {
        self.enemies
            .iter()
            .filter(|enemy| enemy.is_active())
            .map(EnemyState::id)
            .collect()
    }

    pub fn any_active(&self) -> bool {
        self.enemies.iter().any(EnemyState::is_active)
    }

    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }
}

impl Default for EnemyRoster {
    fn default() -> Self {
        Self::new()
    }
}
