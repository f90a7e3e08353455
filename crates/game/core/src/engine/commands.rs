//! Player commands and card movement.

use crate::action::{ActionSource, OperationAvailability, describe_operations, execute, prepare_context};
use crate::blueprint::CardBlueprint;
use crate::error::BattleError;
use crate::log::{ActionLogEntry, AnimationStage, LogKind};
use crate::operation::CardOperation;
use crate::state::{ActorRef, CardBody, CardId, DrawResult, HandInsert};

use super::stage::Stager;
use super::{Battle, seed_context};

impl Battle {
    // ========================================================================
    // Cards
    // ========================================================================

    /// Plays a card from hand.
    ///
    /// Validation happens before anything moves: a rejected play leaves hand,
    /// mana and enemies exactly as they were. The returned entry carries
    /// `card-play`, `card-resolve` and `card-trash` batches.
    pub fn play_card(
        &mut self,
        card_id: CardId,
        operations: &[CardOperation],
    ) -> Result<ActionLogEntry, BattleError> {
        // pre-validate
        self.ensure_ongoing()?;
        if !self.turn.is_player_main() {
            return Err(BattleError::NotPlayerTurn);
        }
        let card = self
            .piles
            .hand_card(card_id)
            .ok_or(BattleError::CardNotInHand(card_id))?;
        let action = card
            .action()
            .cloned()
            .ok_or(BattleError::CardNotPlayable(card_id))?;
        self.player.ensure_mana(action.cost)?;
        let ctx = prepare_context(
            &action,
            &self.operation_context(),
            ActionSource::Player,
            Some(card_id),
            operations,
        )?;

        self.transact(|battle| {
            // apply
            battle.nonce += 1;
            tracing::debug!(card = %card_id, action = %action.name, cost = action.cost, "card played");
            let mut stager = Stager::begin(battle);

            let card = battle.piles.take_from_hand(card_id).ok_or_else(|| {
                BattleError::invariant(format!("card {card_id} vanished from hand"))
            })?;
            battle.player.spend_mana(action.cost)?;
            stager.stage(battle, AnimationStage::CardPlay);

            let mut metadata = ctx.metadata.clone();
            metadata.extend(execute(battle, &action, &ctx)?);
            battle.settle();
            stager.stage(battle, AnimationStage::CardResolve);

            battle.piles.put(card, action.destination);
            stager.stage(battle, AnimationStage::CardTrash);

            // post-validate
            battle.check_invariants()?;
            metadata.insert("cardId".into(), card_id.0.into());
            metadata.insert("cost".into(), action.cost.into());
            Ok(battle.push_entry(
                LogKind::CardPlay,
                format!("Player plays {}", action.name),
                metadata,
                stager.finish(),
            ))
        })
    }

    /// Candidates for every operation the card in hand declares.
    pub fn describe_card_operations(
        &self,
        card_id: CardId,
    ) -> Result<Vec<OperationAvailability>, BattleError> {
        let card = self
            .piles
            .hand_card(card_id)
            .ok_or(BattleError::CardNotInHand(card_id))?;
        let action = card.action().ok_or(BattleError::CardNotPlayable(card_id))?;
        Ok(describe_operations(
            action,
            &self.operation_context(),
            Some(card_id),
        ))
    }

    /// Draws up to `count` cards, reshuffling the discard pile into the deck
    /// when it runs dry. Returns how many were drawn.
    pub fn draw_cards(&mut self, count: u32) -> u32 {
        let mut drawn = 0;
        while drawn < count {
            match self.piles.draw() {
                DrawResult::Drawn(_) => drawn += 1,
                DrawResult::HandFull => {
                    tracing::debug!(drawn, requested = count, "hand full, draw stopped");
                    break;
                }
                DrawResult::DeckEmpty => {
                    if self.piles.discard().is_empty() || self.piles.is_hand_full() {
                        break;
                    }
                    self.reshuffle_discard();
                }
            }
        }
        drawn
    }

    /// Creates a new card and puts it in hand, evicting if needed.
    pub fn add_card_to_hand(
        &mut self,
        blueprint: &CardBlueprint,
    ) -> Result<(CardId, HandInsert), BattleError> {
        self.give_card(blueprint.body()?)
    }

    /// Shuffles the draw pile with the battle RNG.
    pub fn shuffle_deck(&mut self) {
        let base = self.seed(ActorRef::Player, seed_context::DECK_SHUFFLE);
        let rng = self.env.rng();
        let mut roll = 0u64;
        self.piles.shuffle_deck(|len| {
            roll += 1;
            rng.pick_index(base.wrapping_add(roll), len)
        });
    }

    pub(crate) fn give_card(&mut self, body: CardBody) -> Result<(CardId, HandInsert), BattleError> {
        let card = self.cards.register(body);
        let id = card.id();
        let name = card.name().to_owned();
        let insert = self.piles.add_to_hand(card);
        match insert {
            HandInsert::Added => tracing::debug!(card = %id, %name, "card added to hand"),
            HandInsert::Evicted(evicted) => {
                tracing::warn!(card = %id, %name, %evicted, "hand full, oldest card discarded")
            }
            HandInsert::Rejected => {
                tracing::warn!(card = %id, %name, "hand full of status cards, new card discarded")
            }
        }
        Ok((id, insert))
    }

    fn reshuffle_discard(&mut self) {
        let base = self.seed(ActorRef::Player, seed_context::RESHUFFLE);
        let rng = self.env.rng();
        let mut roll = 0u64;
        let moved = self.piles.reshuffle_discard(|len| {
            roll += 1;
            rng.pick_index(base.wrapping_add(roll), len)
        });
        tracing::debug!(moved, "discard pile reshuffled into deck");
    }

    // ========================================================================
    // Relics
    // ========================================================================

    /// Activates a relic through the same pipeline as cards.
    ///
    /// The `relic-activate` batch only touches the player section; effects
    /// follow in `relic-effect`.
    pub fn play_relic(
        &mut self,
        relic_id: &str,
        operations: &[CardOperation],
    ) -> Result<ActionLogEntry, BattleError> {
        // pre-validate
        self.ensure_ongoing()?;
        if !self.turn.is_player_main() {
            return Err(BattleError::NotPlayerTurn);
        }
        let relic = self
            .player
            .relic(relic_id)
            .ok_or_else(|| BattleError::RelicNotFound(relic_id.to_owned()))?;
        relic.ensure_ready()?;
        let action = relic.action.clone();
        let name = relic.name.clone();
        let source = ActionSource::Relic(relic_id.to_owned());
        let ctx = prepare_context(
            &action,
            &self.operation_context(),
            source,
            None,
            operations,
        )?;

        self.transact(|battle| {
            // apply
            battle.nonce += 1;
            tracing::debug!(relic = relic_id, action = %action.name, "relic activated");
            let mut stager = Stager::begin(battle);

            battle
                .player
                .relic_mut(relic_id)
                .ok_or_else(|| BattleError::RelicNotFound(relic_id.to_owned()))?
                .consume();
            stager.stage(battle, AnimationStage::RelicActivate);

            let mut metadata = ctx.metadata.clone();
            metadata.extend(execute(battle, &action, &ctx)?);
            battle.settle();
            stager.stage(battle, AnimationStage::RelicEffect);

            // post-validate
            battle.check_invariants()?;
            metadata.insert("relicId".into(), relic_id.into());
            Ok(battle.push_entry(
                LogKind::RelicActivate,
                format!("Player activates {name}"),
                metadata,
                stager.finish(),
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::action::Action;
    use crate::blueprint::{EnemyBlueprint, PlayerBlueprint};
    use crate::combat::DamageProfile;
    use crate::config::BattleConfig;
    use crate::env::{BattleEnv, FixedRng};

    fn strike() -> CardBlueprint {
        CardBlueprint::Action(Action::attack("Strike", 1, DamageProfile::single(6)))
    }

    fn battle(deck: usize, config: BattleConfig) -> Battle {
        let env = BattleEnv::with_defaults()
            .with_config(config)
            .with_rng(Arc::new(FixedRng(0)));
        Battle::builder(env)
            .player(PlayerBlueprint::new(30))
            .cards(std::iter::repeat_with(strike).take(deck))
            .enemy(EnemyBlueprint::new(
                "Slime",
                20,
                vec![Action::attack("Bite", 0, DamageProfile::single(5))],
            ))
            .build()
            .unwrap()
    }

    #[test]
    fn draw_reshuffles_discard_when_deck_runs_out() {
        let mut battle = battle(3, BattleConfig::new());
        assert_eq!(battle.draw_cards(3), 3);
        battle.piles.discard_hand();
        assert_eq!(battle.piles.deck().len(), 0);

        assert_eq!(battle.draw_cards(2), 2);
        assert_eq!(battle.piles.hand().len(), 2);
        assert_eq!(battle.piles.deck().len(), 1);
        battle.check_invariants().unwrap();
    }

    #[test]
    fn draw_stops_at_hand_limit() {
        let config = BattleConfig {
            hand_limit: 2,
            ..BattleConfig::new()
        };
        let mut battle = battle(5, config);
        assert_eq!(battle.draw_cards(4), 2);
        assert_eq!(battle.piles.deck().len(), 3);
    }

    #[test]
    fn add_card_to_full_hand_evicts_oldest() {
        let config = BattleConfig {
            hand_limit: 2,
            ..BattleConfig::new()
        };
        let mut battle = battle(2, config);
        battle.draw_cards(2);
        let oldest = battle.piles.hand()[0].id();

        let (_, insert) = battle.add_card_to_hand(&strike()).unwrap();
        assert_eq!(insert, HandInsert::Evicted(oldest));
        assert_eq!(battle.piles.discard()[0].id(), oldest);
        battle.check_invariants().unwrap();
    }
}
