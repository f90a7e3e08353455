//! Action domain: playable units of battle behavior.
//!
//! An [`Action`] is plain data: name, cost, where its card goes after play,
//! and a closed [`ActionKind`] variant (`Attack`, `Skill`, `SkipTurn`).
//! Dispatch is an exhaustive `match` on the variant.
//!
//! # Module Structure
//!
//! - `context`: declared operations and context preparation (validation)
//! - `resolve`: effect execution against a live battle

mod context;
mod resolve;

pub use context::{
    ActionContext, ActionSource, OperationAvailability, RequiredOperation, describe_operations,
    prepare_context,
};

pub(crate) use resolve::execute;

use crate::combat::DamageProfile;
use crate::operation::{SelectHandCardOperation, TargetEnemyOperation, TargetRestriction};
use crate::state::CardId;
use crate::status::StatusEffect;

/// A polymorphic unit of battle behavior.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Action {
    pub name: String,
    /// Mana paid by the player. Ignored for enemies.
    #[serde(default)]
    pub cost: u32,
    /// Pile the card moves to after being played.
    #[serde(default)]
    pub destination: CardDestination,
    pub kind: ActionKind,
    #[serde(default)]
    pub description: String,
}

impl Action {
    pub fn new(name: impl Into<String>, cost: u32, kind: ActionKind) -> Self {
        Self {
            name: name.into(),
            cost,
            destination: CardDestination::Discard,
            kind,
            description: String::new(),
        }
    }

    pub fn attack(name: impl Into<String>, cost: u32, damages: DamageProfile) -> Self {
        Self::new(name, cost, ActionKind::Attack(AttackAction::new(damages)))
    }

    pub fn skill(name: impl Into<String>, cost: u32, effects: Vec<SkillEffect>) -> Self {
        Self::new(name, cost, ActionKind::Skill(SkillAction { effects }))
    }

    /// No-op action. `reason` ends up as the log's skip reason.
    pub fn skip(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(
            name,
            0,
            ActionKind::SkipTurn(SkipTurnAction {
                reason: reason.into(),
            }),
        )
    }

    #[must_use]
    pub fn with_destination(mut self, destination: CardDestination) -> Self {
        self.destination = destination;
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn tag(&self) -> ActionTag {
        self.kind.tag()
    }

    pub fn as_attack(&self) -> Option<&AttackAction> {
        match &self.kind {
            ActionKind::Attack(attack) => Some(attack),
            _ => None,
        }
    }

    /// Operations this action declares, whether or not a given source needs them.
    ///
    /// `card` is the card being played, excluded from hand-card selection.
    pub fn required_operations(&self, card: Option<CardId>) -> Vec<RequiredOperation> {
        let mut operations = Vec::new();
        match &self.kind {
            ActionKind::Attack(attack) => {
                if attack.target == AttackTarget::Single {
                    operations.push(RequiredOperation::TargetEnemy(TargetEnemyOperation::new()));
                }
            }
            ActionKind::Skill(skill) => {
                if skill.effects.iter().any(SkillEffect::targets_enemy) {
                    let mut target = TargetEnemyOperation::new();
                    if skill
                        .effects
                        .iter()
                        .any(|effect| matches!(effect, SkillEffect::CaptureMemory { .. }))
                    {
                        target = target.with_restriction(TargetRestriction::new(
                            "no attack planned",
                            |enemy| enemy.queue.peek().is_some_and(|next| next.as_attack().is_some()),
                        ));
                    }
                    operations.push(RequiredOperation::TargetEnemy(target));
                }
                if skill.effects.iter().any(SkillEffect::selects_hand_card) {
                    operations.push(RequiredOperation::SelectHandCard(
                        SelectHandCardOperation::excluding(card),
                    ));
                }
            }
            ActionKind::SkipTurn(_) => {}
        }
        operations
    }
}

/// Closed set of action variants.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionKind {
    Attack(AttackAction),
    Skill(SkillAction),
    SkipTurn(SkipTurnAction),
}

impl ActionKind {
    pub fn tag(&self) -> ActionTag {
        match self {
            ActionKind::Attack(_) => ActionTag::Attack,
            ActionKind::Skill(_) => ActionTag::Skill,
            ActionKind::SkipTurn(_) => ActionTag::SkipTurn,
        }
    }
}

/// Discriminant of [`ActionKind`], used in views and logs.
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
pub enum ActionTag {
    Attack,
    Skill,
    SkipTurn,
}

/// Pile a played card moves to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CardDestination {
    #[default]
    Discard,
    Exile,
}

/// Who an attack hits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttackTarget {
    /// The selected enemy; for enemies, the player.
    #[default]
    Single,
    /// Every enemy on the field; for enemies, the player.
    All,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AttackAction {
    pub damages: DamageProfile,
    #[serde(default)]
    pub target: AttackTarget,
    /// Statuses applied to each target that took at least one hit.
    #[serde(default)]
    pub riders: Vec<StatusEffect>,
}

impl AttackAction {
    pub fn new(damages: DamageProfile) -> Self {
        Self {
            damages,
            target: AttackTarget::Single,
            riders: Vec::new(),
        }
    }

    /// Copy of this attack with a different base profile. The original is untouched.
    pub fn clone_with_damages(&self, damages: DamageProfile) -> Self {
        Self {
            damages,
            ..self.clone()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SkillAction {
    pub effects: Vec<SkillEffect>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SkipTurnAction {
    pub reason: String,
}

/// One step of a skill, applied in declaration order.
///
/// "User" is whoever performs the action. "Opponent" is the selected enemy
/// when the player acts, and the player when an enemy acts.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SkillEffect {
    /// User gains a status.
    GainStatus(StatusEffect),
    /// Opponent gains a status.
    InflictStatus(StatusEffect),
    /// User heals. Skipped at full HP.
    Heal { amount: u32 },
    /// User gains shield.
    GainShield { amount: u32 },
    /// User loses every debuff. Skipped when there is none.
    Cleanse,
    /// Player draws cards.
    Draw { count: u32 },
    /// Player gains mana.
    GainMana { amount: u32 },
    /// Target enemy loses its next turn; its planned action resumes afterwards.
    HeavenChain,
    /// Target enemy's next scheduled action is discarded.
    Interrupt,
    /// Move the selected hand card to discard.
    DiscardSelected,
    /// Move the selected hand card to exile.
    ExileSelected,
    /// Copy the target's planned attack, at its current damage, into a new hand card.
    CaptureMemory { cost: u32 },
    /// Another enemy on the field gains a status. Skipped without one.
    BuffAlly(StatusEffect),
    /// A status card is added to the player's hand.
    Curse(StatusEffect),
    /// User enemy leaves the battle.
    Escape,
}

impl SkillEffect {
    /// True when a player-sourced effect needs a selected enemy.
    pub fn targets_enemy(&self) -> bool {
        matches!(
            self,
            SkillEffect::InflictStatus(_)
                | SkillEffect::HeavenChain
                | SkillEffect::Interrupt
                | SkillEffect::CaptureMemory { .. }
        )
    }

    pub fn selects_hand_card(&self) -> bool {
        matches!(self, SkillEffect::DiscardSelected | SkillEffect::ExileSelected)
    }

    /// Stable name used in log metadata.
    pub fn label(&self) -> &'static str {
        match self {
            SkillEffect::GainStatus(_) => "gain-status",
            SkillEffect::InflictStatus(_) => "inflict-status",
            SkillEffect::Heal { .. } => "heal",
            SkillEffect::GainShield { .. } => "gain-shield",
            SkillEffect::Cleanse => "cleanse",
            SkillEffect::Draw { .. } => "draw",
            SkillEffect::GainMana { .. } => "gain-mana",
            SkillEffect::HeavenChain => "heaven-chain",
            SkillEffect::Interrupt => "interrupt",
            SkillEffect::DiscardSelected => "discard-selected",
            SkillEffect::ExileSelected => "exile-selected",
            SkillEffect::CaptureMemory { .. } => "capture-memory",
            SkillEffect::BuffAlly(_) => "buff-ally",
            SkillEffect::Curse(_) => "curse",
            SkillEffect::Escape => "escape",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::StatusKind;

    #[test]
    fn clone_with_damages_leaves_original_untouched() {
        let mut attack = AttackAction::new(DamageProfile::multi(3, 2));
        attack.riders.push(StatusEffect::new(StatusKind::Poison, 1));

        let copy = attack.clone_with_damages(DamageProfile::multi(5, 2));
        assert_eq!(attack.damages, DamageProfile::multi(3, 2));
        assert_eq!(copy.damages, DamageProfile::multi(5, 2));
        assert_eq!(copy.riders, attack.riders);
    }

    #[test]
    fn declared_operations_follow_effects() {
        let strike = Action::attack("Strike", 1, DamageProfile::single(6));
        assert!(matches!(
            strike.required_operations(None).as_slice(),
            [RequiredOperation::TargetEnemy(_)]
        ));

        let mut sweep = AttackAction::new(DamageProfile::single(4));
        sweep.target = AttackTarget::All;
        let sweep = Action::new("Sweep", 1, ActionKind::Attack(sweep));
        assert!(sweep.required_operations(None).is_empty());

        let recycle = Action::skill(
            "Recycle",
            0,
            vec![SkillEffect::DiscardSelected, SkillEffect::Draw { count: 1 }],
        );
        assert!(matches!(
            recycle.required_operations(Some(CardId(4))).as_slice(),
            [RequiredOperation::SelectHandCard(SelectHandCardOperation {
                exclude: Some(CardId(4))
            })]
        ));
    }

    #[test]
    fn tags_are_kebab_case() {
        assert_eq!(Action::skip("Rest", "resting").tag().to_string(), "skip-turn");
        assert_eq!(ActionTag::Attack.to_string(), "attack");
    }
}
