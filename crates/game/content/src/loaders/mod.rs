//! Content loaders for reading battle data from files.
//!
//! Each loader parses one file into a catalog from [`crate::catalog`] and
//! rejects duplicate ids, so lookups by id are unambiguous.

pub mod cards;
pub mod config;
pub mod encounters;
pub mod enemies;
pub mod factory;
pub mod relics;

pub use cards::CardLoader;
pub use config::ConfigLoader;
pub use encounters::EncounterLoader;
pub use enemies::EnemyLoader;
pub use factory::ContentFactory;
pub use relics::RelicLoader;

use std::path::Path;

use crate::catalog::{Keyed, duplicate_key};

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Fails on the first id declared twice in one catalog.
pub(crate) fn ensure_unique<T: Keyed>(entries: &[T], what: &str) -> LoadResult<()> {
    if let Some(id) = duplicate_key(entries) {
        anyhow::bail!("Duplicate {} id '{}'", what, id);
    }
    Ok(())
}
