//! Attack sequences and status callbacks.

use serde_json::{Value, json};

use crate::action::AttackAction;
use crate::combat::Damages;
use crate::error::BattleError;
use crate::state::ActorRef;
use crate::status::{HitReport, SequenceReport, StatusEffect, StatusKind, StatusReaction};

use super::Battle;

/// What one attack did to one target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackReport {
    pub target: ActorRef,
    /// Per-hit amount after modifiers.
    pub amount: u32,
    /// Planned hit count after modifiers.
    pub count: u32,
    pub hits_landed: u32,
    pub absorbed: u32,
    pub hp_loss: u32,
    pub target_alive: bool,
}

impl AttackReport {
    pub fn to_metadata(&self) -> Value {
        json!({
            "target": self.target.to_string(),
            "amount": self.amount,
            "count": self.count,
            "hitsLanded": self.hits_landed,
            "absorbed": self.absorbed,
            "hpLoss": self.hp_loss,
            "targetAlive": self.target_alive,
        })
    }
}

impl Battle {
    /// Resolves `attack` from `attacker` against a single `defender`.
    ///
    /// Damage is computed once, then applied hit by hit. The sequence stops
    /// early when either side dies. Riders land only if at least one hit did
    /// and the defender survived.
    pub(crate) fn resolve_attack(
        &mut self,
        attacker: ActorRef,
        defender: ActorRef,
        attack: &AttackAction,
    ) -> Result<AttackReport, BattleError> {
        let damages = Damages::new(
            attack.damages,
            self.effective_statuses(attacker)?,
            self.effective_statuses(defender)?,
        );
        let mut report = AttackReport {
            target: defender,
            amount: damages.amount(),
            count: damages.count(),
            hits_landed: 0,
            absorbed: 0,
            hp_loss: 0,
            target_alive: true,
        };

        for hit_index in 0..damages.count() {
            let target = self.combatant_mut(defender)?;
            if !target.is_alive() {
                break;
            }
            let outcome = target.take_damage(damages.amount());
            report.hits_landed += 1;
            report.absorbed += outcome.absorbed;
            report.hp_loss += outcome.hp_loss;

            let hit = HitReport {
                attacker,
                hit_index,
                absorbed: outcome.absorbed,
                hp_loss: outcome.hp_loss,
            };
            for status in self.statuses_of(defender)? {
                if let Some(hook) = status.hooks().on_hit_resolved {
                    self.apply_reactions(defender, status.kind, Some(attacker), hook(&status, &hit))?;
                }
            }

            if !self.combatant(attacker)?.is_alive() {
                break;
            }
        }

        report.target_alive = self.combatant(defender)?.is_alive();
        if report.hits_landed > 0 && report.target_alive {
            let target = self.combatant_mut(defender)?;
            for rider in &attack.riders {
                target.statuses.add(*rider);
            }
        }

        let sequence = SequenceReport {
            attacker,
            hits_landed: report.hits_landed,
            total_hp_loss: report.hp_loss,
            target_alive: report.target_alive,
        };
        for status in self.statuses_of(defender)? {
            if let Some(hook) = status.hooks().on_damage_sequence_resolved {
                self.apply_reactions(defender, status.kind, Some(attacker), hook(&status, &sequence))?;
            }
        }

        tracing::debug!(
            %attacker,
            %defender,
            amount = report.amount,
            hits = report.hits_landed,
            hp_loss = report.hp_loss,
            "attack resolved"
        );
        Ok(report)
    }

    /// Start-of-turn upkeep for one actor: shield expires, then turn-start
    /// statuses tick in application order.
    pub(crate) fn run_turn_start(&mut self, holder: ActorRef) -> Result<(), BattleError> {
        self.combatant_mut(holder)?.clear_shield();
        for status in self.statuses_of(holder)? {
            if !self.combatant(holder)?.is_alive() {
                break;
            }
            if let Some(hook) = status.hooks().on_turn_start {
                self.apply_reactions(holder, status.kind, None, hook(&status))?;
            }
        }
        Ok(())
    }

    /// Applies what a status callback asked for.
    ///
    /// `source` is the reacting status; `counterpart` receives reflected damage.
    pub(crate) fn apply_reactions(
        &mut self,
        holder: ActorRef,
        source: StatusKind,
        counterpart: Option<ActorRef>,
        reactions: Vec<StatusReaction>,
    ) -> Result<(), BattleError> {
        for reaction in reactions {
            tracing::trace!(%holder, status = %source, ?reaction, "status reaction");
            match reaction {
                StatusReaction::LoseHp(amount) => {
                    self.combatant_mut(holder)?.lose_hp(amount);
                }
                StatusReaction::Heal(amount) => {
                    self.combatant_mut(holder)?.heal(amount);
                }
                StatusReaction::RestoreShield(amount) => {
                    self.combatant_mut(holder)?.restore_shield(amount);
                }
                StatusReaction::Reflect(amount) => {
                    if let Some(other) = counterpart {
                        self.combatant_mut(other)?.take_damage(amount);
                    }
                }
                StatusReaction::Gain(status) => {
                    self.combatant_mut(holder)?.statuses.add(status);
                }
                StatusReaction::Decay(amount) => {
                    self.combatant_mut(holder)?.statuses.decay(source, amount);
                }
            }
        }
        Ok(())
    }

    /// Copy of an actor's own statuses, safe to iterate while mutating.
    fn statuses_of(&self, actor: ActorRef) -> Result<Vec<StatusEffect>, BattleError> {
        Ok(self.combatant(actor)?.statuses.iter().copied().collect())
    }
}
