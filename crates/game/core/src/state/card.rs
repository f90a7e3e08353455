//! Cards and the four piles they move between.
//!
//! A card lives in exactly one of deck, hand, discard or exile. Every move is
//! a transfer of ownership: the card value is taken out of one pile and pushed
//! into another, so duplication cannot happen by construction.

use arrayvec::ArrayVec;

use crate::action::{Action, CardDestination};
use crate::config::BattleConfig;
use crate::status::StatusEffect;

use super::CardId;

/// What a card wraps.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardBody {
    /// Playable card.
    Action(Action),
    /// Status card. Never playable; its status applies to the holder while in hand.
    Status(StatusEffect),
}

/// Immutable card identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Card {
    id: CardId,
    body: CardBody,
}

impl Card {
    pub fn id(&self) -> CardId {
        self.id
    }

    pub fn body(&self) -> &CardBody {
        &self.body
    }

    pub fn action(&self) -> Option<&Action> {
        match &self.body {
            CardBody::Action(action) => Some(action),
            CardBody::Status(_) => None,
        }
    }

    pub fn status(&self) -> Option<StatusEffect> {
        match &self.body {
            CardBody::Action(_) => None,
            CardBody::Status(status) => Some(*status),
        }
    }

    pub fn is_status(&self) -> bool {
        matches!(self.body, CardBody::Status(_))
    }

    pub fn name(&self) -> &str {
        match &self.body {
            CardBody::Action(action) => &action.name,
            CardBody::Status(status) => status.id(),
        }
    }
}

/// Issues card ids. Every card of a battle is created through here.
#[derive(Clone, Debug)]
pub struct CardRepository {
    next_id: u32,
}

impl CardRepository {
    pub fn new() -> Self {
        Self { next_id: 1 }
    }

    pub fn register(&mut self, body: CardBody) -> Card {
        let id = CardId(self.next_id);
        self.next_id += 1;
        Card { id, body }
    }

    /// Number of cards issued so far.
    pub fn issued(&self) -> u32 {
        self.next_id - 1
    }
}

impl Default for CardRepository {
    fn default() -> Self {
        Self::new()
    }
}

/// Named pile, used for lookups and invariant checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Pile {
    Deck,
    Hand,
    Discard,
    Exile,
}

/// Result of putting a card into the hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandInsert {
    Added,
    /// The hand was full; this card was evicted to the discard pile.
    Evicted(CardId),
    /// The hand held only status cards; the incoming card went to discard.
    Rejected,
}

/// Result of drawing one card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawResult {
    Drawn(CardId),
    /// Hand is full; the card stays on top of the deck.
    HandFull,
    DeckEmpty,
}

/// Deck, hand, discard and exile piles.
///
/// The top of the deck is the last element. The hand is ordered oldest first.
#[derive(Clone, Debug)]
pub struct CardPiles {
    deck: Vec<Card>,
    hand: ArrayVec<Card, { BattleConfig::MAX_HAND_SIZE }>,
    discard: Vec<Card>,
    exile: Vec<Card>,
    hand_limit: usize,
}

impl CardPiles {
    pub fn new(hand_limit: usize) -> Self {
        Self {
            deck: Vec::new(),
            hand: ArrayVec::new(),
            discard: Vec::new(),
            exile: Vec::new(),
            hand_limit: hand_limit.clamp(1, BattleConfig::MAX_HAND_SIZE),
        }
    }

    pub fn deck(&self) -> &[Card] {
        &self.deck
    }

    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    pub fn discard(&self) -> &[Card] {
        &self.discard
    }

    pub fn exile(&self) -> &[Card] {
        &self.exile
    }

    pub fn hand_limit(&self) -> usize {
        self.hand_limit
    }

    pub fn is_hand_full(&self) -> bool {
        self.hand.len() >= self.hand_limit
    }

    pub fn hand_card(&self, id: CardId) -> Option<&Card> {
        self.hand.iter().find(|card| card.id == id)
    }

    /// Statuses of the status cards currently held.
    pub fn hand_statuses(&self) -> impl Iterator<Item = StatusEffect> + '_ {
        self.hand.iter().filter_map(Card::status)
    }

    /// Places a card on top of the deck.
    pub fn push_deck(&mut self, card: Card) {
        self.deck.push(card);
    }

    /// Adds a card to the hand, evicting when at the limit.
    ///
    /// Eviction takes the oldest non-status card to discard. When every held
    /// card is a status card the incoming card is discarded instead.
    pub fn add_to_hand(&mut self, card: Card) -> HandInsert {
        if !self.is_hand_full() {
            self.hand.push(card);
            return HandInsert::Added;
        }

        match self.hand.iter().position(|held| !held.is_status()) {
            Some(index) => {
                let evicted = self.hand.remove(index);
                let evicted_id = evicted.id;
                self.discard.push(evicted);
                self.hand.push(card);
                HandInsert::Evicted(evicted_id)
            }
            None => {
                self.discard.push(card);
                HandInsert::Rejected
            }
        }
    }

    /// Moves the top deck card into the hand.
    pub fn draw(&mut self) -> DrawResult {
        if self.is_hand_full() {
            return if self.deck.is_empty() {
                DrawResult::DeckEmpty
            } else {
                DrawResult::HandFull
            };
        }
        match self.deck.pop() {
            Some(card) => {
                let id = card.id;
                self.hand.push(card);
                DrawResult::Drawn(id)
            }
            None => DrawResult::DeckEmpty,
        }
    }

    /// Shuffles the discard pile under the deck.
    ///
    /// `pick(n)` must return an index in `0..n`; it drives a Fisher-Yates
    /// shuffle so the order is fully determined by the caller's RNG.
    pub fn reshuffle_discard(&mut self, mut pick: impl FnMut(usize) -> usize) -> usize {
        let mut cards = std::mem::take(&mut self.discard);
        for i in (1..cards.len()).rev() {
            let j = pick(i + 1).min(i);
            cards.swap(i, j);
        }
        let moved = cards.len();
        cards.append(&mut self.deck);
        self.deck = cards;
        moved
    }

    /// Shuffles the deck in place, driven by `pick` like [`Self::reshuffle_discard`].
    pub fn shuffle_deck(&mut self, mut pick: impl FnMut(usize) -> usize) {
        for i in (1..self.deck.len()).rev() {
            let j = pick(i + 1).min(i);
            self.deck.swap(i, j);
        }
    }

    pub fn take_from_hand(&mut self, id: CardId) -> Option<Card> {
        let index = self.hand.iter().position(|card| card.id == id)?;
        Some(self.hand.remove(index))
    }

    /// Removes every non-status card from the hand into the discard pile.
    pub fn discard_hand(&mut self) -> usize {
        let (kept, discarded): (Vec<Card>, Vec<Card>) =
            self.hand.drain(..).partition(Card::is_status);
        let count = discarded.len();
        self.discard.extend(discarded);
        self.hand.extend(kept);
        count
    }

    pub fn put(&mut self, card: Card, destination: CardDestination) {
        match destination {
            CardDestination::Discard => self.discard.push(card),
            CardDestination::Exile => self.exile.push(card),
        }
    }

    pub fn locate(&self, id: CardId) -> Option<Pile> {
        let piles: [(Pile, &[Card]); 4] = [
            (Pile::Deck, self.deck.as_slice()),
            (Pile::Hand, self.hand.as_slice()),
            (Pile::Discard, self.discard.as_slice()),
            (Pile::Exile, self.exile.as_slice()),
        ];
        piles
            .into_iter()
            .find(|(_, cards)| cards.iter().any(|card| card.id == id))
            .map(|(pile, _)| pile)
    }

    /// Returns the first card id found in more than one place.
    pub fn duplicated_card(&self) -> Option<CardId> {
        let mut seen = std::collections::HashSet::new();
        self.deck
            .iter()
            .chain(self.hand.iter())
            .chain(self.discard.iter())
            .chain(self.exile.iter())
            .map(Card::id)
            .find(|id| !seen.insert(*id))
    }

    pub fn total(&self) -> usize {
        self.deck.len() + self.hand.len() + self.discard.len() + self.exile.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::StatusKind;

    fn action_card(repo: &mut CardRepository, name: &str) -> Card {
        repo.register(CardBody::Action(Action::skip(name, "test")))
    }

    fn status_card(repo: &mut CardRepository) -> Card {
        repo.register(CardBody::Status(StatusEffect::new(StatusKind::Weak, 1)))
    }

    #[test]
    fn full_hand_evicts_oldest_non_status_card() {
        let mut repo = CardRepository::new();
        let mut piles = CardPiles::new(10);

        let status = status_card(&mut repo);
        let status_id = status.id();
        piles.add_to_hand(status);
        let oldest_action = action_card(&mut repo, "oldest");
        let oldest_id = oldest_action.id();
        piles.add_to_hand(oldest_action);
        for i in 0..8 {
            piles.add_to_hand(action_card(&mut repo, &format!("filler {i}")));
        }
        assert!(piles.is_hand_full());

        let incoming = action_card(&mut repo, "incoming");
        let incoming_id = incoming.id();
        assert_eq!(piles.add_to_hand(incoming), HandInsert::Evicted(oldest_id));

        assert_eq!(piles.locate(oldest_id), Some(Pile::Discard));
        assert_eq!(piles.locate(status_id), Some(Pile::Hand));
        assert_eq!(piles.locate(incoming_id), Some(Pile::Hand));
        assert_eq!(piles.hand().len(), 10);
    }

    #[test]
    fn hand_of_status_cards_rejects_incoming() {
        let mut repo = CardRepository::new();
        let mut piles = CardPiles::new(3);
        for _ in 0..3 {
            piles.add_to_hand(status_card(&mut repo));
        }
        let incoming = action_card(&mut repo, "incoming");
        let id = incoming.id();
        assert_eq!(piles.add_to_hand(incoming), HandInsert::Rejected);
        assert_eq!(piles.locate(id), Some(Pile::Discard));
    }

    #[test]
    fn drawing_into_full_hand_keeps_card_on_deck() {
        let mut repo = CardRepository::new();
        let mut piles = CardPiles::new(1);
        piles.push_deck(action_card(&mut repo, "bottom"));
        let top = action_card(&mut repo, "top");
        let top_id = top.id();
        piles.push_deck(top);

        assert_eq!(piles.draw(), DrawResult::Drawn(top_id));
        assert_eq!(piles.draw(), DrawResult::HandFull);
        assert_eq!(piles.deck().len(), 1);
        assert_eq!(piles.total(), 2);
    }

    #[test]
    fn reshuffle_moves_discard_under_deck() {
        let mut repo = CardRepository::new();
        let mut piles = CardPiles::new(10);
        for i in 0..4 {
            piles.put(action_card(&mut repo, &format!("{i}")), CardDestination::Discard);
        }
        let moved = piles.reshuffle_discard(|_| 0);
        assert_eq!(moved, 4);
        assert!(piles.discard().is_empty());
        assert_eq!(piles.deck().len(), 4);
        assert_eq!(piles.duplicated_card(), None);
    }

    #[test]
    fn discarding_hand_keeps_status_cards() {
        let mut repo = CardRepository::new();
        let mut piles = CardPiles::new(10);
        piles.add_to_hand(action_card(&mut repo, "strike"));
        piles.add_to_hand(status_card(&mut repo));
        assert_eq!(piles.discard_hand(), 1);
        assert_eq!(piles.hand().len(), 1);
        assert!(piles.hand()[0].is_status());
    }
}
