//! Data-driven battle content and loaders.
//!
//! This crate houses static battle content and the loaders for its data files:
//! - Card catalogs (RON)
//! - Enemy catalogs (RON)
//! - Relic catalogs (RON)
//! - Encounters tying a player loadout to enemies (RON)
//! - Battle configuration (TOML)
//!
//! Content is plain blueprint data from `battle-core`; it never carries
//! runtime ids or state. [`ContentFactory`] resolves an encounter into a
//! ready-to-start [`battle_core::Battle`].

pub mod catalog;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalog::{
    CardCatalog, CardEntry, Encounter, EncounterCatalog, EnemyCatalog, EnemyEntry, Keyed,
    RelicCatalog, duplicate_key,
};

#[cfg(feature = "loaders")]
pub use loaders::{
    CardLoader, ConfigLoader, ContentFactory, EncounterLoader, EnemyLoader, LoadResult,
    RelicLoader,
};
