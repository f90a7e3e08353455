//! Effect execution against a live battle.
//!
//! Runs after [`prepare_context`](super::prepare_context) succeeded, so every
//! operation an effect relies on is present in the context. A missing one here
//! is an invariant violation, not a user error.

use serde_json::Value;

use crate::combat::Damages;
use crate::engine::Battle;
use crate::error::BattleError;
use crate::operation::Metadata;
use crate::state::{ActorRef, CardBody, EnemyId, EnemyLife};

use super::{Action, ActionContext, ActionKind, AttackTarget, CardDestination, SkillEffect};

/// Result of one skill effect.
enum EffectOutcome {
    Applied,
    Skipped(&'static str),
}

/// Executes `action` for `ctx.source` and returns metadata for the log.
///
/// Only the first skip reason of a skill is recorded.
pub(crate) fn execute(
    battle: &mut Battle,
    action: &Action,
    ctx: &ActionContext,
) -> Result<Metadata, BattleError> {
    let user = ctx.source.actor();
    let mut metadata = Metadata::new();
    metadata.insert("action".into(), action.name.clone().into());
    metadata.insert("actionType".into(), action.tag().to_string().into());

    match &action.kind {
        ActionKind::Attack(attack) => {
            let targets: Vec<ActorRef> = match user {
                ActorRef::Enemy(_) => vec![ActorRef::Player],
                ActorRef::Player => match attack.target {
                    AttackTarget::Single => vec![ActorRef::Enemy(required_target(ctx)?)],
                    AttackTarget::All => battle
                        .enemies
                        .active_ids()
                        .into_iter()
                        .map(ActorRef::Enemy)
                        .collect(),
                },
            };
            let mut hits = Vec::with_capacity(targets.len());
            for target in targets {
                if !battle.combatant(user)?.is_alive() {
                    break;
                }
                hits.push(battle.resolve_attack(user, target, attack)?.to_metadata());
            }
            metadata.insert("hits".into(), Value::Array(hits));
        }
        ActionKind::Skill(skill) => {
            let mut applied = Vec::new();
            let mut skip_reason = None;
            for effect in &skill.effects {
                match apply_effect(battle, user, effect, ctx)? {
                    EffectOutcome::Applied => applied.push(Value::from(effect.label())),
                    EffectOutcome::Skipped(reason) => {
                        tracing::debug!(effect = effect.label(), reason, "effect skipped");
                        skip_reason.get_or_insert(reason);
                    }
                }
            }
            metadata.insert("effects".into(), Value::Array(applied));
            if let Some(reason) = skip_reason {
                metadata.insert("skipReason".into(), reason.into());
            }
        }
        ActionKind::SkipTurn(skip) => {
            metadata.insert("skipReason".into(), skip.reason.clone().into());
        }
    }

    Ok(metadata)
}

fn required_target(ctx: &ActionContext) -> Result<EnemyId, BattleError> {
    ctx.target
        .ok_or_else(|| BattleError::invariant("target-enemy was not resolved"))
}

/// The selected enemy for the player, the player for an enemy.
fn opponent(user: ActorRef, ctx: &ActionContext) -> Result<ActorRef, BattleError> {
    match user {
        ActorRef::Player => required_target(ctx).map(ActorRef::Enemy),
        ActorRef::Enemy(_) => Ok(ActorRef::Player),
    }
}

fn apply_effect(
    battle: &mut Battle,
    user: ActorRef,
    effect: &SkillEffect,
    ctx: &ActionContext,
) -> Result<EffectOutcome, BattleError> {
    use EffectOutcome::*;

    match effect {
        SkillEffect::GainStatus(status) => {
            battle.combatant_mut(user)?.statuses.add(*status);
            Ok(Applied)
        }
        SkillEffect::InflictStatus(status) => {
            let target = opponent(user, ctx)?;
            battle.combatant_mut(target)?.statuses.add(*status);
            Ok(Applied)
        }
        SkillEffect::Heal { amount } => {
            let combatant = battle.combatant_mut(user)?;
            if combatant.is_at_full_hp() {
                return Ok(Skipped("already at full hp"));
            }
            combatant.heal(*amount);
            Ok(Applied)
        }
        SkillEffect::GainShield { amount } => {
            battle.combatant_mut(user)?.gain_shield(*amount);
            Ok(Applied)
        }
        SkillEffect::Cleanse => {
            if battle.combatant_mut(user)?.statuses.remove_debuffs().is_empty() {
                return Ok(Skipped("no debuff to cleanse"));
            }
            Ok(Applied)
        }
        SkillEffect::Draw { count } => {
            if !user.is_player() {
                return Ok(Skipped("only the player draws"));
            }
            battle.draw_cards(*count);
            Ok(Applied)
        }
        SkillEffect::GainMana { amount } => {
            if !user.is_player() {
                return Ok(Skipped("only the player has mana"));
            }
            battle.player.mana = battle.player.mana.saturating_add(*amount);
            Ok(Applied)
        }
        SkillEffect::HeavenChain => {
            let ActorRef::Enemy(id) = opponent(user, ctx)? else {
                return Ok(Skipped("no enemy to bind"));
            };
            battle
                .enemy_mut(id)?
                .queue
                .insert_immediate(Action::skip("Heaven Chain", "bound by heaven chain"));
            Ok(Applied)
        }
        SkillEffect::Interrupt => {
            let ActorRef::Enemy(id) = opponent(user, ctx)? else {
                return Ok(Skipped("nothing to interrupt"));
            };
            if battle.enemy_mut(id)?.queue.discard_next().is_none() {
                return Ok(Skipped("nothing to interrupt"));
            }
            battle.plan_enemy(id)?;
            Ok(Applied)
        }
        SkillEffect::DiscardSelected | SkillEffect::ExileSelected => {
            let id = match (ctx.selected_card, user) {
                (Some(id), _) => id,
                // Enemies never select hand cards.
                (None, ActorRef::Enemy(_)) => return Ok(Skipped("no card selected")),
                (None, ActorRef::Player) => {
                    return Err(BattleError::invariant("select-hand-card was not resolved"));
                }
            };
            // An earlier effect of the same skill may have evicted it.
            let Some(card) = battle.piles.take_from_hand(id) else {
                return Ok(Skipped("selected card left the hand"));
            };
            let destination = match effect {
                SkillEffect::ExileSelected => CardDestination::Exile,
                _ => CardDestination::Discard,
            };
            battle.piles.put(card, destination);
            Ok(Applied)
        }
        SkillEffect::CaptureMemory { cost } => {
            let ActorRef::Enemy(id) = opponent(user, ctx)? else {
                return Ok(Skipped("no attack planned"));
            };
            let Some(memory) = capture_memory(battle, id, *cost)? else {
                return Ok(Skipped("no attack planned"));
            };
            battle.give_card(CardBody::Action(memory))?;
            Ok(Applied)
        }
        SkillEffect::BuffAlly(status) => {
            let ActorRef::Enemy(own) = user else {
                return Ok(Skipped("no eligible ally"));
            };
            let Some(ally) = battle.enemies.active_ids().into_iter().find(|id| *id != own) else {
                return Ok(Skipped("no eligible ally"));
            };
            battle.enemy_mut(ally)?.combatant.statuses.add(*status);
            Ok(Applied)
        }
        SkillEffect::Curse(status) => {
            battle.give_card(CardBody::Status(*status))?;
            Ok(Applied)
        }
        SkillEffect::Escape => {
            let ActorRef::Enemy(id) = user else {
                return Ok(Skipped("cannot escape"));
            };
            let enemy = battle.enemy_mut(id)?;
            enemy.life = EnemyLife::Escaped;
            tracing::debug!(enemy = %id, name = %enemy.name, "enemy escaped");
            Ok(Applied)
        }
    }
}

/// Freezes the target's planned attack, as it would land on the player now,
/// into a new exile-on-play attack.
fn capture_memory(battle: &Battle, id: EnemyId, cost: u32) -> Result<Option<Action>, BattleError> {
    let enemy = battle.enemies.get(id).ok_or(BattleError::EnemyNotFound(id))?;
    let Some(planned) = enemy.queue.peek() else {
        return Ok(None);
    };
    let Some(attack) = planned.as_attack() else {
        return Ok(None);
    };

    let damages = Damages::new(
        attack.damages,
        battle.effective_statuses(ActorRef::Enemy(id))?,
        battle.effective_statuses(ActorRef::Player)?,
    );
    let observed = damages.observed_profile();
    tracing::debug!(
        enemy = %id,
        attack = %planned.name,
        amount = observed.base_amount,
        count = observed.base_count,
        "memory captured"
    );

    Ok(Some(
        Action::new(
            format!("Memory: {}", planned.name),
            cost,
            ActionKind::Attack(attack.clone_with_damages(observed)),
        )
        .with_destination(CardDestination::Exile)
        .with_description(format!("Replays {}'s {}", enemy.name, planned.name)),
    ))
}
