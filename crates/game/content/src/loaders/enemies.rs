//! Enemy catalog loader.

use std::path::Path;

use crate::catalog::EnemyCatalog;
use crate::loaders::{LoadResult, ensure_unique, read_file};

/// Loader for enemy catalogs from RON files.
pub struct EnemyLoader;

impl EnemyLoader {
    /// Load an enemy catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<EnemyCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<EnemyCatalog> {
        let catalog: EnemyCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse enemy catalog RON: {}", e))?;

        ensure_unique(&catalog.enemies, "enemy")?;
        for entry in &catalog.enemies {
            if entry.enemy.max_hp == 0 {
                anyhow::bail!("Enemy '{}' has no hp", entry.id);
            }
            entry
                .enemy
                .check()
                .map_err(|e| anyhow::anyhow!("Invalid enemy '{}': {}", entry.id, e))?;
        }
        Ok(catalog)
    }
}
