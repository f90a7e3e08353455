//! Catalog structures: the on-disk shape of content files.
//!
//! Every entry is keyed by a string id that encounters refer to. Catalogs
//! hold blueprints only; nothing here carries runtime ids or state.

use battle_core::{CardBlueprint, EnemyBlueprint, PlayerBlueprint, RelicBlueprint};

/// Entries addressable by a string id.
pub trait Keyed {
    fn key(&self) -> &str;
}

/// Returns the first id that appears twice.
pub fn duplicate_key<T: Keyed>(entries: &[T]) -> Option<&str> {
    entries
        .iter()
        .enumerate()
        .find(|(index, entry)| entries[..*index].iter().any(|prior| prior.key() == entry.key()))
        .map(|(_, entry)| entry.key())
}

fn find<'a, T: Keyed>(entries: &'a [T], id: &str) -> Option<&'a T> {
    entries.iter().find(|entry| entry.key() == id)
}

// ============================================================================
// Cards
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardEntry {
    pub id: String,
    pub card: CardBlueprint,
}

impl Keyed for CardEntry {
    fn key(&self) -> &str {
        &self.id
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardCatalog {
    pub cards: Vec<CardEntry>,
}

impl CardCatalog {
    pub fn get(&self, id: &str) -> Option<&CardBlueprint> {
        find(&self.cards, id).map(|entry| &entry.card)
    }
}

// ============================================================================
// Enemies
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyEntry {
    pub id: String,
    pub enemy: EnemyBlueprint,
}

impl Keyed for EnemyEntry {
    fn key(&self) -> &str {
        &self.id
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyCatalog {
    pub enemies: Vec<EnemyEntry>,
}

impl EnemyCatalog {
    pub fn get(&self, id: &str) -> Option<&EnemyBlueprint> {
        find(&self.enemies, id).map(|entry| &entry.enemy)
    }
}

// ============================================================================
// Relics
// ============================================================================

impl Keyed for RelicBlueprint {
    fn key(&self) -> &str {
        &self.id
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RelicCatalog {
    pub relics: Vec<RelicBlueprint>,
}

impl RelicCatalog {
    pub fn get(&self, id: &str) -> Option<&RelicBlueprint> {
        find(&self.relics, id)
    }
}

// ============================================================================
// Encounters
// ============================================================================

/// A battle setup: the player's loadout and the enemies faced, by id.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Encounter {
    pub id: String,
    pub name: String,
    pub player: PlayerBlueprint,
    /// Card ids, drawn in this order unless `shuffle` is set.
    pub deck: Vec<String>,
    pub enemies: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub relics: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub shuffle: bool,
    /// Overrides the configured battle seed.
    #[cfg_attr(feature = "serde", serde(default))]
    pub seed: Option<u64>,
}

impl Keyed for Encounter {
    fn key(&self) -> &str {
        &self.id
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncounterCatalog {
    pub encounters: Vec<Encounter>,
}

impl EncounterCatalog {
    pub fn get(&self, id: &str) -> Option<&Encounter> {
        find(&self.encounters, id)
    }
}
