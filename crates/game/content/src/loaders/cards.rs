//! Card catalog loader.

use std::path::Path;

use crate::catalog::CardCatalog;
use crate::loaders::{LoadResult, ensure_unique, read_file};

/// Loader for card catalogs from RON files.
pub struct CardLoader;

impl CardLoader {
    /// Load a card catalog from a RON file.
    ///
    /// Status cards are checked against the known status ids here, so a
    /// typo fails at load time instead of when the card is dealt.
    pub fn load(path: &Path) -> LoadResult<CardCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<CardCatalog> {
        let catalog: CardCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse card catalog RON: {}", e))?;

        ensure_unique(&catalog.cards, "card")?;
        for entry in &catalog.cards {
            entry
                .card
                .body()
                .map_err(|e| anyhow::anyhow!("Invalid card '{}': {}", entry.id, e))?;
        }
        Ok(catalog)
    }
}
