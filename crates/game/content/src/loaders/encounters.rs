//! Encounter catalog loader.

use std::path::Path;

use crate::catalog::EncounterCatalog;
use crate::loaders::{LoadResult, ensure_unique, read_file};

/// Loader for encounter catalogs from RON files.
///
/// Only the shape is checked here. Card, enemy and relic ids are resolved
/// against their catalogs by [`crate::ContentFactory`].
pub struct EncounterLoader;

impl EncounterLoader {
    pub fn load(path: &Path) -> LoadResult<EncounterCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<EncounterCatalog> {
        let catalog: EncounterCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse encounter catalog RON: {}", e))?;

        ensure_unique(&catalog.encounters, "encounter")?;
        for encounter in &catalog.encounters {
            if encounter.enemies.is_empty() {
                anyhow::bail!("Encounter '{}' has no enemies", encounter.id);
            }
            if encounter.player.max_hp == 0 {
                anyhow::bail!("Encounter '{}' has a player without hp", encounter.id);
            }
        }
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_fields_have_defaults() {
        let content = r#"(
            encounters: [
                (
                    id: "first",
                    name: "First Steps",
                    player: (maxHp: 40),
                    deck: ["strike", "strike"],
                    enemies: ["slime"],
                ),
            ],
        )"#;

        let catalog = EncounterLoader::parse(content).unwrap();
        let first = catalog.get("first").unwrap();
        assert!(first.relics.is_empty());
        assert!(!first.shuffle);
        assert_eq!(first.seed, None);
        assert_eq!(first.player.current_hp, None);
    }

    #[test]
    fn an_encounter_needs_enemies() {
        let content = r#"(
            encounters: [
                (id: "empty", name: "Empty", player: (maxHp: 40), deck: [], enemies: []),
            ],
        )"#;

        let err = EncounterLoader::parse(content).unwrap_err();
        assert!(err.to_string().contains("has no enemies"));
    }
}
