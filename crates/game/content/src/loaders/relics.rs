//! Relic catalog loader.

use std::path::Path;

use crate::catalog::RelicCatalog;
use crate::loaders::{LoadResult, ensure_unique, read_file};

/// Loader for relic catalogs from RON files.
pub struct RelicLoader;

impl RelicLoader {
    /// Load a relic catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<RelicCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<RelicCatalog> {
        let catalog: RelicCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse relic catalog RON: {}", e))?;

        ensure_unique(&catalog.relics, "relic")?;
        Ok(catalog)
    }
}
