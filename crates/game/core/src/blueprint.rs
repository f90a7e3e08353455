//! Plain-data descriptions used to set up a battle.
//!
//! Blueprints carry no ids and no runtime state. Content loaders deserialize
//! them, and [`BattleBuilder`](crate::engine::BattleBuilder) turns them into
//! live cards, enemies, and relics.

use crate::action::Action;
use crate::error::BattleError;
use crate::queue::{ActionQueue, BeamPolicy, DefaultPolicy, QueuePolicy};
use crate::state::{Card, CardBody, Combatant, Relic};
use crate::status::{StatusEffect, StatusEffects};

/// A status referenced by its string id.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StatusBlueprint {
    pub id: String,
    #[serde(default = "StatusBlueprint::default_magnitude")]
    pub magnitude: u32,
}

impl StatusBlueprint {
    fn default_magnitude() -> u32 {
        1
    }

    pub fn restore(&self) -> Result<StatusEffect, BattleError> {
        StatusEffect::restore(&self.id, self.magnitude)
    }
}

impl From<StatusEffect> for StatusBlueprint {
    fn from(status: StatusEffect) -> Self {
        Self {
            id: status.id().to_owned(),
            magnitude: status.magnitude,
        }
    }
}

fn restore_all(statuses: &[StatusBlueprint]) -> Result<StatusEffects, BattleError> {
    statuses.iter().map(StatusBlueprint::restore).collect()
}

/// A card before it receives an id.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardBlueprint {
    Action(Action),
    Status(StatusBlueprint),
}

impl CardBlueprint {
    pub fn body(&self) -> Result<CardBody, BattleError> {
        match self {
            CardBlueprint::Action(action) => Ok(CardBody::Action(action.clone())),
            CardBlueprint::Status(status) => status.restore().map(CardBody::Status),
        }
    }
}

/// Plain copy of a live card, e.g. for persisting a deck after a battle.
impl From<&Card> for CardBlueprint {
    fn from(card: &Card) -> Self {
        match card.body() {
            CardBody::Action(action) => CardBlueprint::Action(action.clone()),
            CardBody::Status(status) => CardBlueprint::Status((*status).into()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerBlueprint {
    pub max_hp: u32,
    /// Starts at `max_hp` when absent.
    #[serde(default)]
    pub current_hp: Option<u32>,
    #[serde(default)]
    pub statuses: Vec<StatusBlueprint>,
}

impl PlayerBlueprint {
    pub fn new(max_hp: u32) -> Self {
        Self {
            max_hp,
            current_hp: None,
            statuses: Vec::new(),
        }
    }

    pub(crate) fn combatant(&self) -> Result<Combatant, BattleError> {
        let mut combatant =
            Combatant::with_hp(self.current_hp.unwrap_or(self.max_hp), self.max_hp);
        combatant.statuses = restore_all(&self.statuses)?;
        Ok(combatant)
    }
}

/// First pick of a default queue.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OpeningRule {
    #[default]
    Any,
    /// The opening action is drawn among attacks only.
    AttacksOnly,
}

impl OpeningRule {
    fn filter(self) -> fn(&Action) -> bool {
        match self {
            OpeningRule::Any => |_| true,
            OpeningRule::AttacksOnly => |action| action.as_attack().is_some(),
        }
    }
}

/// Scheduling policy of an enemy.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QueueBlueprint {
    /// Random opening, then alternation through the declared actions.
    #[default]
    Default,
    DefaultWith { opening: OpeningRule },
    /// Fixed cycle of indices into the declared actions.
    Beam { cycle: Vec<usize> },
}

impl QueueBlueprint {
    /// Checks that a beam cycle only names declared actions.
    pub fn check(&self, actions: &[Action]) -> Result<(), BattleError> {
        if let QueueBlueprint::Beam { cycle } = self {
            if cycle.is_empty() {
                return Err(BattleError::invariant("beam cycle is empty"));
            }
            if let Some(index) = cycle.iter().find(|index| **index >= actions.len()) {
                return Err(BattleError::invariant(format!(
                    "beam cycle index {index} out of range for {} actions",
                    actions.len()
                )));
            }
        }
        Ok(())
    }

    pub(crate) fn build(&self, actions: &[Action]) -> Result<ActionQueue, BattleError> {
        self.check(actions)?;
        let policy = match self {
            QueueBlueprint::Default => QueuePolicy::Default(DefaultPolicy::default()),
            QueueBlueprint::DefaultWith { opening } => {
                QueuePolicy::Default(DefaultPolicy::new(opening.filter()))
            }
            QueueBlueprint::Beam { cycle } => QueuePolicy::Beam(BeamPolicy::new(cycle.clone())),
        };
        Ok(ActionQueue::new(policy))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyBlueprint {
    pub name: String,
    pub max_hp: u32,
    #[serde(default)]
    pub current_hp: Option<u32>,
    pub actions: Vec<Action>,
    #[serde(default)]
    pub queue: QueueBlueprint,
    #[serde(default)]
    pub statuses: Vec<StatusBlueprint>,
}

impl EnemyBlueprint {
    pub fn new(name: impl Into<String>, max_hp: u32, actions: Vec<Action>) -> Self {
        Self {
            name: name.into(),
            max_hp,
            current_hp: None,
            actions,
            queue: QueueBlueprint::Default,
            statuses: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_queue(mut self, queue: QueueBlueprint) -> Self {
        self.queue = queue;
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: StatusEffect) -> Self {
        self.statuses.push(status.into());
        self
    }

    /// Checks statuses and the queue without building anything.
    pub fn check(&self) -> Result<(), BattleError> {
        restore_all(&self.statuses)?;
        self.queue.check(&self.actions)
    }

    pub(crate) fn combatant(&self) -> Result<Combatant, BattleError> {
        let mut combatant =
            Combatant::with_hp(self.current_hp.unwrap_or(self.max_hp), self.max_hp);
        combatant.statuses = restore_all(&self.statuses)?;
        Ok(combatant)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelicBlueprint {
    pub id: String,
    pub name: String,
    pub action: Action,
    #[serde(default)]
    pub charges: Option<u32>,
    #[serde(default)]
    pub once_per_turn: bool,
}

impl RelicBlueprint {
    pub fn new(id: impl Into<String>, name: impl Into<String>, action: Action) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            action,
            charges: None,
            once_per_turn: false,
        }
    }

    pub(crate) fn build(&self) -> Relic {
        Relic {
            charges: self.charges,
            once_per_turn: self.once_per_turn,
            ..Relic::new(self.id.clone(), self.name.clone(), self.action.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::DamageProfile;
    use crate::status::StatusKind;

    #[test]
    fn status_card_blueprint_restores_by_id() {
        let blueprint = CardBlueprint::Status(StatusBlueprint {
            id: "corrosion".into(),
            magnitude: 2,
        });
        assert_eq!(
            blueprint.body().unwrap(),
            CardBody::Status(StatusEffect::new(StatusKind::Corrosion, 2))
        );

        let unknown = CardBlueprint::Status(StatusBlueprint {
            id: "glitter".into(),
            magnitude: 1,
        });
        assert!(matches!(unknown.body(), Err(BattleError::Invariant(_))));
    }

    #[test]
    fn beam_cycle_indices_are_checked() {
        let actions = vec![
            Action::skip("Charge", "charging"),
            Action::attack("Beam", 0, DamageProfile::single(20)),
        ];
        assert!(QueueBlueprint::Beam { cycle: vec![0, 0, 1] }.build(&actions).is_ok());
        assert!(QueueBlueprint::Beam { cycle: vec![0, 2] }.build(&actions).is_err());
        assert!(QueueBlueprint::Beam { cycle: vec![] }.build(&actions).is_err());
    }

    #[test]
    fn enemy_starts_wounded_with_statuses() {
        let enemy = EnemyBlueprint {
            current_hp: Some(12),
            ..EnemyBlueprint::new("Moth", 20, Vec::new())
        }
        .with_status(StatusEffect::new(StatusKind::Flight, 1));

        let combatant = enemy.combatant().unwrap();
        assert_eq!(combatant.current_hp, 12);
        assert!(combatant.statuses.has(StatusKind::Flight));
    }
}
