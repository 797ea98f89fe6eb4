//! Content loaders for reading game data from files.
//!
//! Catalog tables are RON, the game configuration is TOML and the meta
//! progression save is JSON. Every loader parses from a string first, so the
//! same code serves files on disk and the data embedded in the binary.

pub mod catalog;
pub mod config;
pub mod factory;
pub mod save;

pub use catalog::{CatalogLoader, CatalogSources};
pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use save::SaveLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
