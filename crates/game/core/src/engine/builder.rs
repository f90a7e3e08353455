use crate::blueprint::{CardBlueprint, EnemyBlueprint, PlayerBlueprint, RelicBlueprint};
use crate::env::BattleEnv;
use crate::error::BattleError;
use crate::state::{CardPiles, CardRepository, EnemyRoster, PlayerState};

use super::Battle;

/// Assembles a [`Battle`] from blueprints.
///
/// Deck cards are drawn in the order they were added.
#[derive(Clone, Debug)]
pub struct BattleBuilder {
    env: BattleEnv,
    player: PlayerBlueprint,
    deck: Vec<CardBlueprint>,
    enemies: Vec<EnemyBlueprint>,
    relics: Vec<RelicBlueprint>,
}

impl BattleBuilder {
    pub fn new(env: BattleEnv) -> Self {
        Self {
            env,
            player: PlayerBlueprint::new(1),
            deck: Vec::new(),
            enemies: Vec::new(),
            relics: Vec::new(),
        }
    }

    #[must_use]
    pub fn player(mut self, player: PlayerBlueprint) -> Self {
        self.player = player;
        self
    }

    #[must_use]
    pub fn card(mut self, card: CardBlueprint) -> Self {
        self.deck.push(card);
        self
    }

    #[must_use]
    pub fn cards(mut self, cards: impl IntoIterator<Item = CardBlueprint>) -> Self {
        self.deck.extend(cards);
        self
    }

    #[must_use]
    pub fn enemy(mut self, enemy: EnemyBlueprint) -> Self {
        self.enemies.push(enemy);
        self
    }

    #[must_use]
    pub fn relic(mut self, relic: RelicBlueprint) -> Self {
        self.relics.push(relic);
        self
    }

    pub fn build(self) -> Result<Battle, BattleError> {
        let config = self.env.config();

        let mut player = PlayerState::new(self.player.max_hp, config.max_mana);
        player.combatant = self.player.combatant()?;
        player.relics = self.relics.iter().map(RelicBlueprint::build).collect();

        let mut enemies = EnemyRoster::new();
        for blueprint in &self.enemies {
            let queue = blueprint.queue.build(&blueprint.actions)?;
            enemies.spawn(
                blueprint.name.clone(),
                blueprint.combatant()?,
                blueprint.actions.clone(),
                queue,
            );
        }

        let mut cards = CardRepository::new();
        let mut piles = CardPiles::new(config.effective_hand_limit());
        let mut deck = Vec::with_capacity(self.deck.len());
        for blueprint in &self.deck {
            deck.push(cards.register(blueprint.body()?));
        }
        // The top of the deck is its last element.
        for card in deck.into_iter().rev() {
            piles.push_deck(card);
        }

        tracing::debug!(
            enemies = enemies.len(),
            deck = piles.deck().len(),
            relics = player.relics.len(),
            "battle assembled"
        );
        Ok(Battle::from_parts(self.env, player, enemies, piles, cards))
    }
}
