//! Turn flow: battle start, player turns, enemy turns.

use crate::action::{Action, ActionSource, execute, prepare_context};
use crate::error::BattleError;
use crate::log::{AnimationStage, LogKind};
use crate::operation::Metadata;
use crate::queue::QueueOrigin;
use crate::state::{ActorRef, EnemyId, Side, TurnPhase, TurnPosition};

use super::stage::Stager;
use super::{Battle, seed_context};

impl Battle {
    /// Opens the battle: schedules every enemy, draws the opening hand, and
    /// starts turn 1.
    pub fn start_battle(&mut self) -> Result<(), BattleError> {
        if self.turn.turn != 0 || !self.log.is_empty() {
            return Err(BattleError::invariant("battle already started"));
        }
        self.ensure_ongoing()?;

        let mut metadata = Metadata::new();
        metadata.insert("enemies".into(), self.enemies.len().into());
        metadata.insert("deck".into(), self.piles.deck().len().into());
        self.log
            .push(LogKind::BattleStart, "Battle begins", metadata, Vec::new());

        for id in self.enemies.active_ids() {
            self.plan_enemy(id)?;
        }
        let initial = self.env.config().initial_draw;
        self.draw_cards(initial);
        self.start_player_turn()
    }

    /// Begins the next player turn: upkeep, mana refill, draw.
    pub fn start_player_turn(&mut self) -> Result<(), BattleError> {
        self.ensure_ongoing()?;
        self.nonce += 1;
        let mut stager = Stager::begin(self);

        self.turn = TurnPosition {
            turn: self.turn.turn + 1,
            side: Side::Player,
            phase: TurnPhase::Start,
        };
        for relic in &mut self.player.relics {
            relic.reset_turn();
        }
        self.player.refill_mana();
        self.run_turn_start(ActorRef::Player)?;
        self.settle();
        stager.stage(self, AnimationStage::TurnStart);

        let mut drawn = 0;
        if !self.outcome.is_over() {
            drawn = self.draw_cards(self.env.config().draw_per_turn);
            for id in self.enemies.active_ids() {
                self.plan_enemy(id)?;
            }
            self.turn.phase = TurnPhase::Main;
            stager.stage(self, AnimationStage::Draw);
        }

        self.check_invariants()?;
        let mut metadata = Metadata::new();
        metadata.insert("turn".into(), self.turn.turn.into());
        metadata.insert("drawn".into(), drawn.into());
        tracing::debug!(turn = self.turn.turn, drawn, "player turn started");
        self.push_entry(
            LogKind::TurnStart,
            format!("Turn {} begins", self.turn.turn),
            metadata,
            stager.finish(),
        );
        Ok(())
    }

    /// Ends the player's turn, discarding every non-status card in hand.
    pub fn end_player_turn(&mut self) -> Result<(), BattleError> {
        self.ensure_ongoing()?;
        if !self.turn.is_player_main() {
            return Err(BattleError::NotPlayerTurn);
        }
        self.nonce += 1;
        let mut stager = Stager::begin(self);

        let discarded = self.piles.discard_hand();
        self.turn.phase = TurnPhase::End;
        stager.stage(self, AnimationStage::TurnEnd);

        let mut metadata = Metadata::new();
        metadata.insert("turn".into(), self.turn.turn.into());
        metadata.insert("discarded".into(), discarded.into());
        self.push_entry(
            LogKind::TurnEnd,
            format!("Player ends turn {}", self.turn.turn),
            metadata,
            stager.finish(),
        );
        Ok(())
    }

    /// Hands the turn to the enemies and runs their upkeep.
    pub fn start_enemy_turn(&mut self) -> Result<(), BattleError> {
        self.ensure_ongoing()?;
        self.nonce += 1;
        let mut stager = Stager::begin(self);

        self.turn.side = Side::Enemy;
        self.turn.phase = TurnPhase::Start;
        for id in self.enemies.active_ids() {
            self.enemy_mut(id)?.queue.reset_turn();
            self.run_turn_start(ActorRef::Enemy(id))?;
        }
        self.settle();
        self.turn.phase = TurnPhase::Main;
        stager.stage(self, AnimationStage::TurnStart);

        let mut metadata = Metadata::new();
        metadata.insert("turn".into(), self.turn.turn.into());
        self.push_entry(
            LogKind::TurnStart,
            format!("Enemy turn {}", self.turn.turn),
            metadata,
            stager.finish(),
        );
        Ok(())
    }

    /// Runs one enemy's next queued action.
    ///
    /// Asking an enemy that already acted this turn is a logged no-op.
    pub fn enemy_act(&mut self, id: EnemyId) -> Result<(), BattleError> {
        self.ensure_ongoing()?;
        if !self.turn.is_enemy_main() {
            return Err(BattleError::NotEnemyTurn);
        }
        let enemy = self.enemies.get(id).ok_or(BattleError::EnemyNotFound(id))?;
        let name = enemy.name.clone();
        if !enemy.is_active() {
            return Err(BattleError::EnemyNotFound(id));
        }
        if enemy.queue.has_acted() {
            let mut metadata = Metadata::new();
            metadata.insert("enemyId".into(), id.0.into());
            metadata.insert("skipReason".into(), "already acted".into());
            tracing::debug!(enemy = %id, %name, "enemy already acted this turn");
            self.log.push(
                LogKind::Notice,
                format!("{name} has already acted this turn"),
                metadata,
                Vec::new(),
            );
            return Ok(());
        }

        self.transact(|battle| {
            battle.nonce += 1;
            battle.plan_enemy(id)?;
            let mut stager = Stager::begin(battle);

            let queued = {
                let enemy = battle.enemy_mut(id)?;
                enemy.queue.mark_acted();
                enemy.queue.next()
            };
            let (action, origin) = match queued {
                Some(queued) => (queued.action, Some(queued.origin)),
                None => (Action::skip("Idle", "no action available"), None),
            };
            let ctx = prepare_context(
                &action,
                &battle.operation_context(),
                ActionSource::Enemy(id),
                None,
                &[],
            )?;

            let mut metadata = execute(battle, &action, &ctx)?;
            battle.settle();
            if battle.enemies.get(id).is_some_and(|enemy| enemy.is_active()) {
                battle.plan_enemy(id)?;
            }
            stager.stage(battle, AnimationStage::EnemyAction);

            battle.check_invariants()?;
            metadata.insert("enemyId".into(), id.0.into());
            if let Some(origin) = origin {
                let origin = match origin {
                    QueueOrigin::Scheduled { .. } => "scheduled",
                    QueueOrigin::Inserted => "inserted",
                };
                metadata.insert("origin".into(), origin.into());
            }
            tracing::debug!(enemy = %id, %name, action = %action.name, "enemy acted");
            battle.push_entry(
                LogKind::EnemyAction,
                format!("{name} uses {}", action.name),
                metadata,
                stager.finish(),
            );
            Ok(())
        })
    }

    /// Closes the enemy phase.
    pub fn end_enemy_turn(&mut self) -> Result<(), BattleError> {
        self.ensure_ongoing()?;
        self.turn.phase = TurnPhase::End;
        let mut metadata = Metadata::new();
        metadata.insert("turn".into(), self.turn.turn.into());
        self.push_entry(
            LogKind::TurnEnd,
            format!("Enemies end turn {}", self.turn.turn),
            metadata,
            Vec::new(),
        );
        Ok(())
    }

    /// Every active enemy acts once, in spawn order.
    pub fn run_enemy_turn(&mut self) -> Result<(), BattleError> {
        self.start_enemy_turn()?;
        for id in self.enemies.active_ids() {
            if self.outcome.is_over() {
                return Ok(());
            }
            // An earlier action may have removed this enemy.
            if self.enemies.get(id).is_some_and(|enemy| enemy.is_active()) {
                self.enemy_act(id)?;
            }
        }
        if self.outcome.is_over() {
            return Ok(());
        }
        self.end_enemy_turn()
    }

    /// Ends the player turn, plays the enemy turn, and opens the next player
    /// turn unless the battle ended.
    pub fn end_turn(&mut self) -> Result<(), BattleError> {
        self.end_player_turn()?;
        if self.outcome.is_over() {
            return Ok(());
        }
        self.run_enemy_turn()?;
        if self.outcome.is_over() {
            return Ok(());
        }
        self.start_player_turn()
    }

    /// Schedules an enemy's next action if its queue is empty.
    pub(crate) fn plan_enemy(&mut self, id: EnemyId) -> Result<bool, BattleError> {
        let seed = self.seed(ActorRef::Enemy(id), seed_context::QUEUE_PLAN);
        let rng = self.env.rng();
        let enemy = self
            .enemies
            .get_mut(id)
            .ok_or(BattleError::EnemyNotFound(id))?;
        Ok(enemy.queue.plan(&enemy.actions, rng, seed))
    }
}
