//! Battle orchestration.
//!
//! [`Battle`] owns every piece of live state and is the only place that
//! mutates it. Each public command follows the same three phases:
//!
//! 1. **pre-validate**: check phase, ownership, mana, and resolve operations
//!    into an [`ActionContext`](crate::action::ActionContext). Nothing mutates
//!    until this succeeds, so a rejected command leaves the battle untouched.
//! 2. **apply**: mutate state, recording an animation batch per visual beat.
//! 3. **post-validate**: check card conservation and append the log entry.
//!
//! Command methods are spread over `impl Battle` blocks in sibling modules.

mod builder;
mod combat;
mod commands;
mod stage;
mod turns;

pub use builder::BattleBuilder;
pub use combat::AttackReport;

use crate::action::ActionTag;
use crate::combat::Damages;
use crate::config::BattleConfig;
use crate::env::{BattleEnv, compute_seed};
use crate::error::BattleError;
use crate::log::{ActionLog, ActionLogEntry, LogKind};
use crate::operation::{Metadata, OperationContext};
use crate::snapshot::{BattleSnapshot, EnemySnapshot, IntentView, PlayerSnapshot, pile_view};
use crate::state::{
    ActorRef, BattleOutcome, CardPiles, CardRepository, Combatant, EnemyId, EnemyRoster,
    EnemyState, PlayerState, TurnPosition,
};
use crate::status::StatusEffect;

use std::sync::Arc;

/// Distinguishes RNG rolls made within one command.
pub(crate) mod seed_context {
    pub const QUEUE_PLAN: u32 = 1;
    pub const RESHUFFLE: u32 = 2;
    pub const DECK_SHUFFLE: u32 = 3;
}

/// A running battle.
#[derive(Clone, Debug)]
pub struct Battle {
    pub(crate) env: BattleEnv,
    pub(crate) turn: TurnPosition,
    pub(crate) player: PlayerState,
    pub(crate) enemies: EnemyRoster,
    pub(crate) piles: CardPiles,
    pub(crate) cards: CardRepository,
    pub(crate) log: ActionLog,
    /// Command counter mixed into every RNG seed.
    pub(crate) nonce: u64,
    pub(crate) outcome: BattleOutcome,
    concluded: bool,
}

impl Battle {
    pub fn builder(env: BattleEnv) -> BattleBuilder {
        BattleBuilder::new(env)
    }

    pub(crate) fn from_parts(
        env: BattleEnv,
        player: PlayerState,
        enemies: EnemyRoster,
        piles: CardPiles,
        cards: CardRepository,
    ) -> Self {
        Self {
            env,
            turn: TurnPosition::new(),
            player,
            enemies,
            piles,
            cards,
            log: ActionLog::new(),
            nonce: 0,
            outcome: BattleOutcome::Ongoing,
            concluded: false,
        }
    }

    // ========================================================================
    // Read access
    // ========================================================================

    pub fn env(&self) -> &BattleEnv {
        &self.env
    }

    pub fn config(&self) -> &BattleConfig {
        self.env.config()
    }

    pub fn turn(&self) -> TurnPosition {
        self.turn
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn enemies(&self) -> &EnemyRoster {
        &self.enemies
    }

    pub fn enemy(&self, id: EnemyId) -> Option<&EnemyState> {
        self.enemies.get(id)
    }

    pub fn piles(&self) -> &CardPiles {
        &self.piles
    }

    pub fn log(&self) -> &ActionLog {
        &self.log
    }

    pub fn outcome(&self) -> BattleOutcome {
        self.outcome
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Projects the current state into plain data.
    pub fn capture_snapshot(&self) -> BattleSnapshot {
        let player_statuses = self.player_statuses();
        let enemies = self
            .enemies
            .iter()
            .map(|enemy| Arc::new(self.enemy_snapshot(enemy, &player_statuses)))
            .collect();

        BattleSnapshot {
            player: Arc::new(PlayerSnapshot::capture(&self.player)),
            enemies: Arc::new(enemies),
            hand: pile_view(self.piles.hand()),
            deck: pile_view(self.piles.deck()),
            discard_pile: pile_view(self.piles.discard()),
            exile_pile: pile_view(self.piles.exile()),
            turn: self.turn,
            outcome: self.outcome,
            log: self.log.shared(),
        }
    }

    /// Statuses that count for `actor` in damage resolution.
    ///
    /// For the player this includes status cards held in hand.
    pub fn effective_statuses(&self, actor: ActorRef) -> Result<Vec<StatusEffect>, BattleError> {
        match actor {
            ActorRef::Player => Ok(self.player_statuses()),
            ActorRef::Enemy(_) => Ok(self.combatant(actor)?.statuses.iter().copied().collect()),
        }
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    fn player_statuses(&self) -> Vec<StatusEffect> {
        self.player
            .combatant
            .statuses
            .merged(self.piles.hand_statuses())
            .iter()
            .copied()
            .collect()
    }

    fn enemy_snapshot(&self, enemy: &EnemyState, player_statuses: &[StatusEffect]) -> EnemySnapshot {
        let intent = enemy.is_active().then(|| enemy.queue.peek()).flatten().map(|action| {
            IntentView {
                name: action.name.clone(),
                kind: action.tag(),
                damage: match action.tag() {
                    ActionTag::Attack => action.as_attack().map(|attack| {
                        Damages::new(
                            attack.damages,
                            enemy.combatant.statuses.iter().copied(),
                            player_statuses.iter().copied(),
                        )
                        .values()
                    }),
                    _ => None,
                },
            }
        });

        EnemySnapshot {
            id: enemy.id(),
            name: enemy.name.clone(),
            current_hp: enemy.combatant.current_hp,
            max_hp: enemy.combatant.max_hp,
            shield: enemy.combatant.shield,
            statuses: Arc::new(enemy.combatant.statuses.iter().copied().collect()),
            life: enemy.life,
            queue: enemy.queue.status(),
            intent,
        }
    }

    pub(crate) fn operation_context(&self) -> OperationContext<'_> {
        OperationContext {
            enemies: &self.enemies,
            hand: self.piles.hand(),
        }
    }

    pub(crate) fn combatant(&self, actor: ActorRef) -> Result<&Combatant, BattleError> {
        match actor {
            ActorRef::Player => Ok(&self.player.combatant),
            ActorRef::Enemy(id) => self
                .enemies
                .get(id)
                .map(|enemy| &enemy.combatant)
                .ok_or(BattleError::EnemyNotFound(id)),
        }
    }

    pub(crate) fn combatant_mut(&mut self, actor: ActorRef) -> Result<&mut Combatant, BattleError> {
        match actor {
            ActorRef::Player => Ok(&mut self.player.combatant),
            ActorRef::Enemy(id) => self
                .enemies
                .get_mut(id)
                .map(|enemy| &mut enemy.combatant)
                .ok_or(BattleError::EnemyNotFound(id)),
        }
    }

    pub(crate) fn enemy_mut(&mut self, id: EnemyId) -> Result<&mut EnemyState, BattleError> {
        self.enemies.get_mut(id).ok_or(BattleError::EnemyNotFound(id))
    }

    pub(crate) fn seed(&self, actor: ActorRef, context: u32) -> u64 {
        compute_seed(
            self.env.config().seed,
            self.nonce,
            actor.seed_component(),
            context,
        )
    }

    pub(crate) fn ensure_ongoing(&self) -> Result<(), BattleError> {
        if self.outcome.is_over() {
            return Err(BattleError::BattleOver);
        }
        Ok(())
    }

    /// Marks dead enemies as defeated and recomputes the outcome.
    pub(crate) fn settle(&mut self) {
        for enemy in self.enemies.iter_mut() {
            if enemy.settle_life() {
                tracing::debug!(enemy = %enemy.id(), name = %enemy.name, "enemy defeated");
            }
        }
        if self.outcome.is_over() {
            return;
        }
        self.outcome = if !self.player.combatant.is_alive() {
            BattleOutcome::Defeat
        } else if !self.enemies.any_active() {
            BattleOutcome::Victory
        } else {
            BattleOutcome::Ongoing
        };
    }

    /// Appends the closing entry once the battle is decided.
    pub(crate) fn conclude(&mut self) {
        if self.concluded || !self.outcome.is_over() {
            return;
        }
        self.concluded = true;
        let mut metadata = Metadata::new();
        metadata.insert("outcome".into(), self.outcome.to_string().into());
        metadata.insert("turn".into(), self.turn.turn.into());
        tracing::debug!(outcome = %self.outcome, turn = self.turn.turn, "battle concluded");
        self.log.push(
            LogKind::BattleEnd,
            format!("Battle ends in {}", self.outcome),
            metadata,
            Vec::new(),
        );
    }

    /// Post-validation shared by every command.
    pub(crate) fn check_invariants(&self) -> Result<(), BattleError> {
        if let Some(id) = self.piles.duplicated_card() {
            return Err(BattleError::invariant(format!("card {id} is in two piles")));
        }
        let issued = self.cards.issued() as usize;
        if self.piles.total() != issued {
            return Err(BattleError::invariant(format!(
                "{} cards in piles, {issued} issued",
                self.piles.total()
            )));
        }
        Ok(())
    }

    /// Runs the apply phase of a command.
    ///
    /// On error the battle is restored to where it stood before `apply`, so
    /// a failed command never leaves a card outside every pile or mana spent.
    pub(crate) fn transact<T>(
        &mut self,
        apply: impl FnOnce(&mut Self) -> Result<T, BattleError>,
    ) -> Result<T, BattleError> {
        let checkpoint = self.clone();
        let result = apply(self);
        if let Err(error) = &result {
            tracing::warn!(%error, "command failed mid-apply, battle rolled back");
            *self = checkpoint;
        }
        result
    }

    pub(crate) fn push_entry(
        &mut self,
        kind: LogKind,
        message: String,
        metadata: Metadata,
        batches: Vec<crate::log::AnimationBatch>,
    ) -> ActionLogEntry {
        let entry = self.log.push(kind, message, metadata, batches).clone();
        self.conclude();
        entry
    }
}
