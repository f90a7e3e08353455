//! Content factory for building battles from data files.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use battle_core::{Battle, BattleBuilder, BattleConfig, BattleEnv, RngOracle};

use crate::catalog::{CardCatalog, Encounter, EncounterCatalog, EnemyCatalog, RelicCatalog};
use crate::loaders::{
    CardLoader, ConfigLoader, EncounterLoader, EnemyLoader, LoadResult, RelicLoader,
};

/// Content factory that loads all battle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── cards.ron
/// ├── enemies.ron
/// ├── relics.ron
/// └── encounters.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Factory over the content shipped with this crate.
    pub fn bundled() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
    }

    /// Load battle configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<BattleConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load the card catalog from `cards.ron`.
    pub fn load_cards(&self) -> LoadResult<CardCatalog> {
        CardLoader::load(&self.data_dir.join("cards.ron"))
    }

    /// Load the enemy catalog from `enemies.ron`.
    pub fn load_enemies(&self) -> LoadResult<EnemyCatalog> {
        EnemyLoader::load(&self.data_dir.join("enemies.ron"))
    }

    /// Load the relic catalog from `relics.ron`.
    pub fn load_relics(&self) -> LoadResult<RelicCatalog> {
        RelicLoader::load(&self.data_dir.join("relics.ron"))
    }

    /// Load the encounter catalog from `encounters.ron`.
    pub fn load_encounters(&self) -> LoadResult<EncounterCatalog> {
        EncounterLoader::load(&self.data_dir.join("encounters.ron"))
    }

    /// Builds an unstarted battle for the named encounter.
    ///
    /// Every id the encounter mentions must exist in its catalog. When the
    /// encounter asks for it, the deck is shuffled with the battle's own
    /// seeded randomness, so the same seed always deals the same hands.
    pub fn build_battle(&self, encounter_id: &str, rng: Arc<dyn RngOracle>) -> LoadResult<Battle> {
        let encounters = self.load_encounters()?;
        let encounter = encounters
            .get(encounter_id)
            .with_context(|| format!("Unknown encounter '{}'", encounter_id))?;

        let mut config = self.load_config()?;
        if let Some(seed) = encounter.seed {
            config.seed = seed;
        }

        let builder = self.resolve(encounter, BattleEnv::new(config, rng))?;
        let mut battle = builder
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build encounter '{}': {}", encounter_id, e))?;
        if encounter.shuffle {
            battle.shuffle_deck();
        }

        tracing::info!(
            encounter = encounter_id,
            deck = battle.piles().deck().len(),
            enemies = battle.enemies().len(),
            "battle built from content"
        );
        Ok(battle)
    }

    /// Looks up every id of an encounter and feeds the blueprints to a builder.
    pub fn resolve(&self, encounter: &Encounter, env: BattleEnv) -> LoadResult<BattleBuilder> {
        let cards = self.load_cards()?;
        let enemies = self.load_enemies()?;
        let relics = self.load_relics()?;

        let mut builder = Battle::builder(env).player(encounter.player.clone());
        for id in &encounter.deck {
            let card = cards
                .get(id)
                .with_context(|| format!("Encounter '{}' uses unknown card '{}'", encounter.id, id))?;
            builder = builder.card(card.clone());
        }
        for id in &encounter.enemies {
            let enemy = enemies.get(id).with_context(|| {
                format!("Encounter '{}' uses unknown enemy '{}'", encounter.id, id)
            })?;
            builder = builder.enemy(enemy.clone());
        }
        for id in &encounter.relics {
            let relic = relics.get(id).with_context(|| {
                format!("Encounter '{}' uses unknown relic '{}'", encounter.id, id)
            })?;
            builder = builder.relic(relic.clone());
        }
        Ok(builder)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
